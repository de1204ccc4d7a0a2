use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::types::ItemWithSource;

/// Sortable columns, named after the item fields they read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    ItemSource,
    Level,
    TotalSockets,
    FilledSockets,
    TypeName,
    TypeId,
    UniqueName,
    SetName,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        Self::ItemSource,
        Self::Level,
        Self::TotalSockets,
        Self::FilledSockets,
        Self::TypeName,
        Self::TypeId,
        Self::UniqueName,
        Self::SetName,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::ItemSource => "itemSource",
            Self::Level => "level",
            Self::TotalSockets => "total_nr_of_sockets",
            Self::FilledSockets => "nr_of_items_in_sockets",
            Self::TypeName => "type_name",
            Self::TypeId => "type_id",
            Self::UniqueName => "unique_name",
            Self::SetName => "set_name",
        }
    }

    /// Ascending comparison on this key. Absent names order after present ones.
    pub fn compare(&self, a: &ItemWithSource, b: &ItemWithSource) -> Ordering {
        match *self {
            Self::ItemSource => a.item_source.cmp(&b.item_source),
            Self::Level => a.item.level.cmp(&b.item.level),
            Self::TotalSockets => a.item.total_nr_of_sockets.cmp(&b.item.total_nr_of_sockets),
            Self::FilledSockets => a
                .item
                .nr_of_items_in_sockets
                .cmp(&b.item.nr_of_items_in_sockets),
            Self::TypeName => a.item.type_name.cmp(&b.item.type_name),
            Self::TypeId => a.item.type_id.cmp(&b.item.type_id),
            Self::UniqueName => {
                compare_optional(a.item.unique_name.as_deref(), b.item.unique_name.as_deref())
            }
            Self::SetName => {
                compare_optional(a.item.set_name.as_deref(), b.item.set_name.as_deref())
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // Column-header aliases.
        match raw {
            "source" => return Ok(Self::ItemSource),
            "sockets" => return Ok(Self::TotalSockets),
            "name" => return Ok(Self::TypeName),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == raw)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(SortKey::as_str).collect();
                format!(
                    "unknown sort key '{raw}'; expected one of: {}",
                    known.join(", ")
                )
            })
    }
}

fn compare_optional(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Active sort keys, most significant first. Never holds a key twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.keys.iter().map(SortKey::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Clicking the leading key drops it; clicking any other key makes it
    /// the leading key.
    pub fn toggle(&mut self, key: SortKey) {
        if self.keys.first() == Some(&key) {
            self.keys.remove(0);
            return;
        }
        self.keys.retain(|existing| *existing != key);
        self.keys.insert(0, key);
    }
}

/// Stable ascending sort by every key in `spec`, in priority order.
pub fn order(items: &[ItemWithSource], spec: &SortSpec) -> Vec<ItemWithSource> {
    let mut out = items.to_vec();
    if spec.is_empty() {
        return out;
    }

    out.sort_by(|a, b| {
        spec.keys()
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    out
}
