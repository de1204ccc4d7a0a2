use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::classify::{Category, classify};
use super::types::{Item, ItemWithSource};

/// Search text plus category toggles. The serialized shape is the one kept in
/// the preference store, so field names follow the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterPreferences {
    pub search_term: String,
    pub checkboxes: Checkboxes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Checkboxes {
    pub show_unique: bool,
    pub show_sets: bool,
    pub show_gems: bool,
    pub show_runes: bool,
    pub show_socketed: bool,
    pub only_show_filters: bool,
}

impl Default for Checkboxes {
    fn default() -> Self {
        Self {
            show_unique: true,
            show_sets: true,
            show_gems: false,
            show_runes: false,
            show_socketed: false,
            only_show_filters: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterToggle {
    ShowUnique,
    ShowSets,
    ShowGems,
    ShowRunes,
    ShowSocketed,
    OnlyShowFilters,
}

impl FilterToggle {
    pub const ALL: [FilterToggle; 6] = [
        Self::ShowUnique,
        Self::ShowSets,
        Self::ShowGems,
        Self::ShowRunes,
        Self::ShowSocketed,
        Self::OnlyShowFilters,
    ];

    pub fn key(&self) -> &'static str {
        match *self {
            Self::ShowUnique => "showUnique",
            Self::ShowSets => "showSets",
            Self::ShowGems => "showGems",
            Self::ShowRunes => "showRunes",
            Self::ShowSocketed => "showSocketed",
            Self::OnlyShowFilters => "onlyShowFilters",
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::ShowUnique => "Unique",
            Self::ShowSets => "Sets",
            Self::ShowGems => "Gems",
            Self::ShowRunes => "Runes",
            Self::ShowSocketed => "Socketed",
            Self::OnlyShowFilters => "Only show Filters",
        }
    }
}

impl fmt::Display for FilterToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterToggle {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|toggle| toggle.key() == raw)
            .ok_or_else(|| format!("unknown filter toggle '{raw}'"))
    }
}

impl Checkboxes {
    pub fn get(&self, toggle: FilterToggle) -> bool {
        match toggle {
            FilterToggle::ShowUnique => self.show_unique,
            FilterToggle::ShowSets => self.show_sets,
            FilterToggle::ShowGems => self.show_gems,
            FilterToggle::ShowRunes => self.show_runes,
            FilterToggle::ShowSocketed => self.show_socketed,
            FilterToggle::OnlyShowFilters => self.only_show_filters,
        }
    }

    pub fn set(&mut self, toggle: FilterToggle, value: bool) {
        let slot = match toggle {
            FilterToggle::ShowUnique => &mut self.show_unique,
            FilterToggle::ShowSets => &mut self.show_sets,
            FilterToggle::ShowGems => &mut self.show_gems,
            FilterToggle::ShowRunes => &mut self.show_runes,
            FilterToggle::ShowSocketed => &mut self.show_socketed,
            FilterToggle::OnlyShowFilters => &mut self.only_show_filters,
        };
        *slot = value;
    }

    /// Whether items of `category` survive the category stage. Plain items
    /// are the inverse of "only show filters".
    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::Unique => self.show_unique,
            Category::Set => self.show_sets,
            Category::Gem => self.show_gems,
            Category::Rune => self.show_runes,
            Category::Socketed => self.show_socketed,
            Category::Plain => !self.only_show_filters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetSearchTerm(String),
    SetCheckbox(FilterToggle, bool),
}

pub fn reduce_filters(state: &FilterPreferences, action: FilterAction) -> FilterPreferences {
    let mut next = state.clone();
    match action {
        FilterAction::SetSearchTerm(search_term) => next.search_term = search_term,
        FilterAction::SetCheckbox(toggle, value) => next.checkboxes.set(toggle, value),
    }
    next
}

/// Case-insensitive substring match against type, unique and set names.
/// `needle` must already be trimmed and lowercased.
pub fn matches_search(item: &Item, needle: &str) -> bool {
    [
        Some(item.type_name.as_str()),
        item.unique_name.as_deref(),
        item.set_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

pub fn apply_filters(items: &[ItemWithSource], prefs: &FilterPreferences) -> Vec<ItemWithSource> {
    let needle = prefs.search_term.trim().to_lowercase();

    items
        .iter()
        .filter(|entry| needle.is_empty() || matches_search(&entry.item, &needle))
        .filter(|entry| prefs.checkboxes.allows(classify(&entry.item)))
        .cloned()
        .collect()
}
