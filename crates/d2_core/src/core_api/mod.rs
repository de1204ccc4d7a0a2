mod classify;
mod engine;
mod error;
mod filter;
mod flatten;
mod sort;
mod store;
mod types;

pub use classify::{CLASSIFICATION_RULES, Category, ClassificationRule, GEM_MARKERS, classify, is_gem};
pub use engine::{ConnectionState, Engine, InventoryView, PREFERENCES_KEY, Session};
pub use error::{CoreError, CoreErrorCode};
pub use filter::{
    Checkboxes, FilterAction, FilterPreferences, FilterToggle, apply_filters, matches_search,
    reduce_filters,
};
pub use flatten::{SHARED_STASH_SOURCE, flatten};
pub use sort::{SortKey, SortSpec, order};
pub use store::{FileStore, LoadState, MemoryStore, PreferenceStore, StoredReducer};
pub use types::{Character, CharacterHeader, Item, ItemWithSource, Snapshot};
