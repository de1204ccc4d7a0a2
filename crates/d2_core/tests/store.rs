use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use d2_core::core_api::{
    CoreError, CoreErrorCode, FileStore, FilterAction, FilterPreferences, FilterToggle,
    LoadState, MemoryStore, PREFERENCES_KEY, PreferenceStore, StoredReducer, reduce_filters,
};

struct BrokenStore;

impl PreferenceStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
        Err(CoreError::new(CoreErrorCode::Io, "disk on fire"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), CoreError> {
        Err(CoreError::new(CoreErrorCode::Io, "disk on fire"))
    }
}

fn temp_dir_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos))
}

fn stored_prefs(store: &MemoryStore) -> Option<FilterPreferences> {
    store
        .get(PREFERENCES_KEY)
        .expect("memory store read")
        .map(|raw| serde_json::from_str(&raw).expect("stored preferences should decode"))
}

fn reducer(store: &MemoryStore) -> StoredReducer<FilterPreferences, FilterAction> {
    StoredReducer::new(
        reduce_filters,
        FilterPreferences::default(),
        Box::new(store.clone()),
        PREFERENCES_KEY,
    )
}

#[test]
fn writes_are_suppressed_until_hydrated() {
    let store = MemoryStore::new();
    let mut prefs = reducer(&store);

    assert_eq!(prefs.load_state(), LoadState::NotLoaded);
    prefs.dispatch(FilterAction::SetSearchTerm("ist".to_string()));
    assert_eq!(prefs.state().search_term, "ist");
    assert_eq!(stored_prefs(&store), None);
}

#[test]
fn hydrate_without_stored_value_keeps_state_and_loads() {
    let store = MemoryStore::new();
    let mut prefs = reducer(&store);

    prefs.hydrate();
    assert_eq!(prefs.load_state(), LoadState::Loaded);
    assert_eq!(prefs.state(), &FilterPreferences::default());
    assert_eq!(stored_prefs(&store), Some(FilterPreferences::default()));
}

#[test]
fn hydrate_replaces_state_with_stored_value() {
    let stored = r#"{"searchTerm":"rune","checkboxes":{"showUnique":false,"showSets":true,"showGems":true,"showRunes":true,"showSocketed":false,"onlyShowFilters":true}}"#;
    let store = MemoryStore::with_entry(PREFERENCES_KEY, stored);
    let mut prefs = reducer(&store);

    prefs.dispatch(FilterAction::SetSearchTerm("lost".to_string()));
    prefs.hydrate();

    assert_eq!(prefs.state().search_term, "rune");
    assert!(!prefs.state().checkboxes.show_unique);
    assert!(prefs.state().checkboxes.only_show_filters);
}

#[test]
fn dispatch_after_hydrate_persists_every_change() {
    let store = MemoryStore::new();
    let mut prefs = reducer(&store);
    prefs.hydrate();

    prefs.dispatch(FilterAction::SetCheckbox(FilterToggle::ShowRunes, true));
    prefs.dispatch(FilterAction::SetSearchTerm("rune".to_string()));

    let persisted = stored_prefs(&store).expect("preferences should be stored");
    assert_eq!(persisted.search_term, "rune");
    assert!(persisted.checkboxes.show_runes);
}

#[test]
fn hydrate_runs_only_once() {
    let store = MemoryStore::new();
    let mut prefs = reducer(&store);
    prefs.hydrate();
    prefs.dispatch(FilterAction::SetSearchTerm("jah".to_string()));

    store
        .set(PREFERENCES_KEY, r#"{"searchTerm":"ber"}"#)
        .expect("memory store write");
    prefs.hydrate();
    assert_eq!(prefs.state().search_term, "jah");
}

#[test]
fn undecodable_stored_value_still_completes_load() {
    let store = MemoryStore::with_entry(PREFERENCES_KEY, "{not json");
    let mut prefs = reducer(&store);
    prefs.hydrate();

    assert_eq!(prefs.load_state(), LoadState::Loaded);
    assert_eq!(prefs.state(), &FilterPreferences::default());
}

#[test]
fn store_failures_are_not_surfaced() {
    let mut prefs = StoredReducer::new(
        reduce_filters,
        FilterPreferences::default(),
        Box::new(BrokenStore),
        PREFERENCES_KEY,
    );
    prefs.hydrate();
    assert_eq!(prefs.load_state(), LoadState::Loaded);

    let next = prefs.dispatch(FilterAction::SetCheckbox(FilterToggle::ShowGems, true));
    assert!(next.checkboxes.show_gems);
}

#[test]
fn preferences_round_trip_through_file_store_sessions() {
    let dir = temp_dir_path("d2_store");
    {
        let mut prefs = StoredReducer::new(
            reduce_filters,
            FilterPreferences::default(),
            Box::new(FileStore::new(&dir)),
            PREFERENCES_KEY,
        );
        prefs.hydrate();
        prefs.dispatch(FilterAction::SetSearchTerm("rune".to_string()));
        prefs.dispatch(FilterAction::SetCheckbox(FilterToggle::ShowRunes, true));
    }

    let mut fresh = StoredReducer::new(
        reduce_filters,
        FilterPreferences::default(),
        Box::new(FileStore::new(&dir)),
        PREFERENCES_KEY,
    );
    fresh.hydrate();

    let mut expected = FilterPreferences::default();
    expected.search_term = "rune".to_string();
    expected.checkboxes.show_runes = true;
    assert_eq!(fresh.state(), &expected);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn file_store_reports_missing_key_as_absent() {
    let store = FileStore::new(temp_dir_path("d2_store_missing"));
    assert_eq!(store.get("searchAndFilter").expect("missing is not an error"), None);
}

#[test]
fn file_store_rejects_path_like_keys() {
    let store = FileStore::new(temp_dir_path("d2_store_keys"));
    for key in ["", "../escape", "a/b", ".hidden"] {
        let err = store.set(key, "{}").expect_err("path-like key should fail");
        assert_eq!(err.code, CoreErrorCode::Storage);
    }
}
