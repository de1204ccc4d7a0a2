use super::types::{ItemWithSource, Snapshot};

pub const SHARED_STASH_SOURCE: &str = "SharedStash";

/// Flattens a snapshot into one source-tagged list: every character's items
/// in character order, then the shared stash. A missing snapshot or missing
/// character list contributes nothing.
pub fn flatten(snapshot: Option<&Snapshot>) -> Vec<ItemWithSource> {
    let Some(snapshot) = snapshot else {
        return Vec::new();
    };

    let characters = snapshot.characters.as_deref().unwrap_or_default();
    let character_items = characters.iter().flat_map(|character| {
        character
            .items
            .iter()
            .map(|item| ItemWithSource::new(item.clone(), character.header.name.clone()))
    });
    let stash_items = snapshot
        .shared_stash
        .iter()
        .map(|item| ItemWithSource::new(item.clone(), SHARED_STASH_SOURCE));

    character_items.chain(stash_items).collect()
}
