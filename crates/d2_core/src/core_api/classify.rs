use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Item;

/// Mutually exclusive display buckets used by the category filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Unique,
    Set,
    Gem,
    Rune,
    Socketed,
    Plain,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Unique,
        Self::Set,
        Self::Gem,
        Self::Rune,
        Self::Socketed,
        Self::Plain,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Unique => "Unique",
            Self::Set => "Set",
            Self::Gem => "Gem",
            Self::Rune => "Rune",
            Self::Socketed => "Socketed",
            Self::Plain => "Plain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ClassificationRule {
    pub category: Category,
    pub matches: fn(&Item) -> bool,
}

/// Substrings of `type_name` that mark a gem. "Skull" is matched exactly
/// in [`is_gem`] since it is also part of non-gem names.
pub const GEM_MARKERS: &[&str] = &[
    "Chipped", "Flawed", "Flawless", "Perfect", "Amethyst", "Sapphire", "Ruby", "Topaz", "Emerald",
    "Diamond",
];

// Evaluated top to bottom; the first matching rule decides the category.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: Category::Unique,
        matches: |item| item.unique_name.is_some(),
    },
    ClassificationRule {
        category: Category::Set,
        matches: |item| item.set_name.is_some(),
    },
    ClassificationRule {
        category: Category::Gem,
        matches: is_gem,
    },
    ClassificationRule {
        category: Category::Rune,
        matches: |item| item.type_name.contains("Rune"),
    },
    ClassificationRule {
        category: Category::Socketed,
        matches: Item::is_socketed,
    },
];

pub fn is_gem(item: &Item) -> bool {
    item.type_name == "Skull"
        || GEM_MARKERS
            .iter()
            .any(|marker| item.type_name.contains(marker))
}

pub fn classify(item: &Item) -> Category {
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.matches)(item))
        .map(|rule| rule.category)
        .unwrap_or(Category::Plain)
}
