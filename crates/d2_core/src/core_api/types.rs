use serde::{Deserialize, Deserializer, Serialize};

/// Full inventory payload as produced by the save watcher: every character
/// plus the shared stash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub characters: Option<Vec<Character>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_stash: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub header: CharacterHeader,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterHeader {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// A single item record. Optional names that arrive empty are stored as
/// `None` so "present" always means "has text".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: u64,
    pub type_name: String,
    pub type_id: i64,
    pub quality: u32,
    pub level: u32,
    pub identified: u8,
    pub socketed: u8,
    pub ethereal: u8,
    pub total_nr_of_sockets: u32,
    pub nr_of_items_in_sockets: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rare_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rare_name2: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_prefix_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_suffix_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runeword_name: Option<String>,
}

impl Item {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn is_socketed(&self) -> bool {
        self.socketed != 0
    }

    /// Set name wins over unique name, matching how the wiki link is chosen.
    pub fn unique_or_set_name(&self) -> Option<&str> {
        self.set_name.as_deref().or(self.unique_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWithSource {
    #[serde(flatten)]
    pub item: Item,
    #[serde(rename = "itemSource")]
    pub item_source: String,
}

impl ItemWithSource {
    pub fn new(item: Item, item_source: impl Into<String>) -> Self {
        Self {
            item,
            item_source: item_source.into(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}
