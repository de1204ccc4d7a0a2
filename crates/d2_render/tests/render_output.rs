use std::path::PathBuf;

use d2_core::core_api::{
    ConnectionState, Engine, FilterAction, FilterToggle, InventoryView, Item, ItemWithSource,
    MemoryStore, Session, SortKey,
};
use d2_render::{
    ItemRow, JsonStyle, LinkKind, format_display_name, format_rare_names, format_sockets,
    render_json, render_text, wiki_url,
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_session() -> Session {
    let text = std::fs::read_to_string(workspace_root().join("tests/fixtures/TotalState.json"))
        .expect("fixture should be readable");
    let engine = Engine::new();
    let mut session = engine.open_session(Box::new(MemoryStore::new()));
    session.replace_snapshot(engine.decode_snapshot(&text).expect("fixture should decode"));
    session
}

fn view_of(session: &Session) -> InventoryView {
    session.view()
}

#[test]
fn gull_row_matches_expected_columns() {
    let entry = ItemWithSource::new(
        Item {
            unique_name: Some("Gull".to_string()),
            ..Item::new("Short Sword")
        },
        "Hero",
    );
    let row = ItemRow::from_item(&entry);

    assert_eq!(row.source, "Hero");
    assert_eq!(row.name, "Short Sword");
    assert_eq!(row.sockets, "");
    assert_eq!(row.rare_names, "");
    let link = row.link.expect("unique item should link");
    assert_eq!(link.name, "Gull");
    assert_eq!(link.url, "https://diablo.fandom.com/wiki/Gull");
    assert_eq!(link.kind, LinkKind::Unique);
}

#[test]
fn set_name_takes_precedence_for_link() {
    let entry = ItemWithSource::new(
        Item {
            unique_name: Some("Gull".to_string()),
            set_name: Some("Sigon's Guard".to_string()),
            ..Item::new("Large Shield")
        },
        "SharedStash",
    );
    let link = ItemRow::from_item(&entry).link.expect("set item should link");
    assert_eq!(link.name, "Sigon's Guard");
    assert_eq!(link.url, wiki_url("Sigon's Guard"));
    assert_eq!(link.kind, LinkKind::Set);
}

#[test]
fn formats_sockets_names_and_rare_names() {
    let entry = ItemWithSource::new(
        Item {
            total_nr_of_sockets: 2,
            nr_of_items_in_sockets: 1,
            magic_prefix_name: Some("Jeweler's".to_string()),
            magic_suffix_name: Some("the Magus".to_string()),
            rare_name: Some("Havoc".to_string()),
            rare_name2: Some("Grasp".to_string()),
            ..Item::new("Shako")
        },
        "Hero",
    );
    assert_eq!(format_sockets(&entry), "1/2");
    assert_eq!(format_display_name(&entry), "Jeweler's Shako of the Magus");
    assert_eq!(format_rare_names(&entry), "Havoc Grasp");

    let suffix_only = ItemWithSource::new(
        Item {
            magic_suffix_name: Some("Life".to_string()),
            rare_name2: Some("Grasp".to_string()),
            ..Item::new("Ring")
        },
        "Hero",
    );
    assert_eq!(format_display_name(&suffix_only), "Ring of Life");
    assert_eq!(format_rare_names(&suffix_only), "Grasp");
}

#[test]
fn text_table_contains_count_filters_and_rows() {
    let session = fixture_session();
    let rendered = render_text(&view_of(&session));

    assert!(rendered.starts_with("Showing 4/7 items\n"));
    assert!(rendered.contains("Filters: [x] Unique  [x] Sets  [ ] Gems"));
    assert!(rendered.contains("[ ] Only show Filters"));
    assert!(rendered.contains("Sort: none"));
    assert!(rendered.contains("Item Source"));
    assert!(rendered.contains("Unique/Set Name"));
    assert!(rendered.contains("Gull <https://diablo.fandom.com/wiki/Gull>"));
    assert!(rendered.contains("Havoc Grasp"));
    assert!(!rendered.contains("Perfect Ruby"));
}

#[test]
fn text_table_marks_sorted_headers() {
    let mut session = fixture_session();
    session.toggle_sort(SortKey::TypeName);
    session.toggle_sort(SortKey::Level);
    let rendered = render_text(&view_of(&session));

    assert!(rendered.contains("Sort: level, type_name"));
    assert!(rendered.contains("Item Level (1)"));
    assert!(rendered.contains("Name (2)"));
}

#[test]
fn placeholder_without_snapshot() {
    let mut session = Session::new(Box::new(MemoryStore::new()));
    assert_eq!(
        render_text(&session.view()),
        "Not connected to the inventory feed.\n"
    );
    session.set_connection(ConnectionState::Connected);
    assert!(render_text(&session.view()).contains("waiting for the first snapshot"));
}

#[test]
fn json_uses_canonical_top_level_order() {
    let mut session = fixture_session();
    session.dispatch(FilterAction::SetCheckbox(FilterToggle::ShowSocketed, true));
    let value = render_json(&view_of(&session), JsonStyle::CanonicalV1);
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec!["visible", "total", "connected", "preferences", "sort", "items"]
    );

    assert_eq!(value["visible"], 5);
    assert_eq!(value["total"], 7);
    assert_eq!(value["preferences"]["checkboxes"]["showSocketed"], true);
    assert_eq!(value["items"][0]["unique_or_set_name"], "Gull");
    assert_eq!(value["items"][0]["link_kind"], "unique");
    assert_eq!(value["items"][0]["category"], "Unique");
    assert_eq!(value["items"][1]["sockets"], "1/2");
    assert_eq!(value["items"][1]["name"], "Jeweler's Shako of the Magus");
    assert!(value["items"][1].get("wiki_url").is_none());
}
