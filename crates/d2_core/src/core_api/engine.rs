use super::error::{CoreError, CoreErrorCode};
use super::filter::{FilterAction, FilterPreferences, apply_filters, reduce_filters};
use super::flatten::flatten;
use super::sort::{SortKey, SortSpec, order};
use super::store::{LoadState, PreferenceStore, StoredReducer};
use super::types::{ItemWithSource, Snapshot};

/// Store key for the combined search and filter preferences.
pub const PREFERENCES_KEY: &str = "searchAndFilter";

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn decode_snapshot(&self, text: &str) -> Result<Snapshot, CoreError> {
        serde_json::from_str(text).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Decode,
                format!("failed to decode snapshot: {e}"),
            )
        })
    }

    /// Builds a session whose preferences are backed by `store` and
    /// hydrated immediately.
    pub fn open_session(&self, store: Box<dyn PreferenceStore>) -> Session {
        let mut session = Session::new(store);
        session.preferences.hydrate();
        session
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    NotConnected,
    Connected,
}

/// The items currently on screen plus what produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView {
    pub items: Vec<ItemWithSource>,
    pub total: usize,
    pub preferences: FilterPreferences,
    pub sort: SortSpec,
    pub connection: ConnectionState,
    pub has_snapshot: bool,
}

impl InventoryView {
    pub fn visible(&self) -> usize {
        self.items.len()
    }
}

/// Application context: the latest snapshot, stored filter preferences,
/// sort order and feed connection state.
pub struct Session {
    snapshot: Option<Snapshot>,
    all_items: Vec<ItemWithSource>,
    preferences: StoredReducer<FilterPreferences, FilterAction>,
    sort: SortSpec,
    connection: ConnectionState,
}

impl Session {
    /// Creates a session with default preferences that are not yet
    /// hydrated; nothing is written to `store` until `hydrate_preferences`.
    pub fn new(store: Box<dyn PreferenceStore>) -> Self {
        Self {
            snapshot: None,
            all_items: Vec::new(),
            preferences: StoredReducer::new(
                reduce_filters,
                FilterPreferences::default(),
                store,
                PREFERENCES_KEY,
            ),
            sort: SortSpec::new(),
            connection: ConnectionState::NotConnected,
        }
    }

    pub fn hydrate_preferences(&mut self) {
        self.preferences.hydrate();
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn all_items(&self) -> &[ItemWithSource] {
        &self.all_items
    }

    pub fn preferences(&self) -> &FilterPreferences {
        self.preferences.state()
    }

    pub fn preferences_loaded(&self) -> bool {
        self.preferences.load_state() == LoadState::Loaded
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Replaces the whole snapshot; nothing from the previous one survives.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.all_items = flatten(Some(&snapshot));
        self.snapshot = Some(snapshot);
    }

    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
        self.all_items.clear();
    }

    pub fn set_connection(&mut self, connection: ConnectionState) {
        self.connection = connection;
    }

    pub fn dispatch(&mut self, action: FilterAction) -> &FilterPreferences {
        self.preferences.dispatch(action)
    }

    pub fn toggle_sort(&mut self, key: SortKey) -> &SortSpec {
        self.sort.toggle(key);
        &self.sort
    }

    pub fn visible_items(&self) -> Vec<ItemWithSource> {
        let filtered = apply_filters(&self.all_items, self.preferences.state());
        order(&filtered, &self.sort)
    }

    pub fn view(&self) -> InventoryView {
        InventoryView {
            items: self.visible_items(),
            total: self.all_items.len(),
            preferences: self.preferences.state().clone(),
            sort: self.sort.clone(),
            connection: self.connection,
            has_snapshot: self.snapshot.is_some(),
        }
    }
}
