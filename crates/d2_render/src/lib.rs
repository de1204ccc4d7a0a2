use std::fmt::Write as _;

use d2_core::core_api::{
    Category, ConnectionState, FilterPreferences, FilterToggle, InventoryView, ItemWithSource,
    SortKey, SortSpec, classify,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

pub const WIKI_BASE_URL: &str = "https://diablo.fandom.com/wiki/";

const SOURCE_COL_WIDTH: usize = 18;
const LEVEL_COL_WIDTH: usize = 16;
const SOCKETS_COL_WIDTH: usize = 13;
const RARE_COL_WIDTH: usize = 20;
const NAME_COL_WIDTH: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Unique,
    Set,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Unique => "unique",
            Self::Set => "set",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLink {
    pub name: String,
    pub url: String,
    pub kind: LinkKind,
}

/// Display-ready cells for one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub source: String,
    pub level: u32,
    pub sockets: String,
    pub rare_names: String,
    pub name: String,
    pub link: Option<ItemLink>,
    pub category: Category,
}

impl ItemRow {
    pub fn from_item(entry: &ItemWithSource) -> Self {
        let item = &entry.item;
        let link = if let Some(set_name) = item.set_name.as_deref() {
            Some(ItemLink {
                name: set_name.to_string(),
                url: wiki_url(set_name),
                kind: LinkKind::Set,
            })
        } else {
            item.unique_name.as_deref().map(|unique_name| ItemLink {
                name: unique_name.to_string(),
                url: wiki_url(unique_name),
                kind: LinkKind::Unique,
            })
        };

        Self {
            source: entry.item_source.clone(),
            level: item.level,
            sockets: format_sockets(entry),
            rare_names: format_rare_names(entry),
            name: format_display_name(entry),
            link,
            category: classify(item),
        }
    }
}

/// `"{filled}/{total}"`, or empty for items without sockets.
pub fn format_sockets(entry: &ItemWithSource) -> String {
    let item = &entry.item;
    if item.total_nr_of_sockets == 0 {
        return String::new();
    }
    format!(
        "{}/{}",
        item.nr_of_items_in_sockets, item.total_nr_of_sockets
    )
}

pub fn format_rare_names(entry: &ItemWithSource) -> String {
    [
        entry.item.rare_name.as_deref(),
        entry.item.rare_name2.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|name| !name.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Magic prefix, base type and " of " suffix, skipping absent parts.
pub fn format_display_name(entry: &ItemWithSource) -> String {
    let item = &entry.item;
    let mut out = String::new();
    if let Some(prefix) = item.magic_prefix_name.as_deref() {
        out.push_str(prefix);
        out.push(' ');
    }
    out.push_str(&item.type_name);
    if let Some(suffix) = item.magic_suffix_name.as_deref() {
        out.push_str(" of ");
        out.push_str(suffix);
    }
    out
}

pub fn wiki_url(name: &str) -> String {
    format!("{WIKI_BASE_URL}{name}")
}

pub fn render_count_line(view: &InventoryView) -> String {
    format!("Showing {}/{} items", view.visible(), view.total)
}

pub fn render_text(view: &InventoryView) -> String {
    if !view.has_snapshot {
        return render_placeholder(view.connection);
    }

    let mut out = String::new();
    writeln!(&mut out, "{}", render_count_line(view)).expect("writing to String cannot fail");
    writeln!(&mut out, "{}", render_filter_line(&view.preferences))
        .expect("writing to String cannot fail");
    let search = view.preferences.search_term.trim();
    if !search.is_empty() {
        writeln!(&mut out, "Search: \"{search}\"").expect("writing to String cannot fail");
    }
    writeln!(&mut out, "{}", render_sort_line(&view.sort)).expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let header = format_row(
        &header_label("Item Source", SortKey::ItemSource, &view.sort),
        &header_label("Item Level", SortKey::Level, &view.sort),
        &header_label("Sockets", SortKey::TotalSockets, &view.sort),
        "Rare Names",
        &header_label("Name", SortKey::TypeName, &view.sort),
        "Unique/Set Name",
    );
    writeln!(&mut out, "{header}").expect("writing to String cannot fail");
    writeln!(&mut out, "{}", "-".repeat(header.chars().count()))
        .expect("writing to String cannot fail");

    for entry in &view.items {
        let row = ItemRow::from_item(entry);
        let link = row
            .link
            .as_ref()
            .map(|link| format!("{} <{}>", link.name, link.url))
            .unwrap_or_default();
        let line = format_row(
            &row.source,
            &row.level.to_string(),
            &row.sockets,
            &row.rare_names,
            &row.name,
            &link,
        );
        writeln!(&mut out, "{line}").expect("writing to String cannot fail");
    }

    out
}

pub fn render_placeholder(connection: ConnectionState) -> String {
    match connection {
        ConnectionState::NotConnected => "Not connected to the inventory feed.\n".to_string(),
        ConnectionState::Connected => "Connected; waiting for the first snapshot.\n".to_string(),
    }
}

pub fn render_filter_line(preferences: &FilterPreferences) -> String {
    let toggles: Vec<String> = FilterToggle::ALL
        .iter()
        .map(|toggle| {
            let mark = if preferences.checkboxes.get(*toggle) {
                'x'
            } else {
                ' '
            };
            format!("[{mark}] {}", toggle.label())
        })
        .collect();
    format!("Filters: {}", toggles.join("  "))
}

pub fn render_sort_line(sort: &SortSpec) -> String {
    if sort.is_empty() {
        return "Sort: none".to_string();
    }
    format!("Sort: {}", sort.names().join(", "))
}

pub fn render_json(view: &InventoryView, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(canonical_json(view)),
    }
}

fn canonical_json(view: &InventoryView) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert("visible".to_string(), JsonValue::from(view.visible()));
    out.insert("total".to_string(), JsonValue::from(view.total));
    out.insert(
        "connected".to_string(),
        JsonValue::Bool(view.connection == ConnectionState::Connected),
    );
    out.insert("preferences".to_string(), preferences_to_json(&view.preferences));
    out.insert(
        "sort".to_string(),
        JsonValue::Array(
            view.sort
                .names()
                .into_iter()
                .map(|name| JsonValue::String(name.to_string()))
                .collect(),
        ),
    );
    out.insert(
        "items".to_string(),
        JsonValue::Array(view.items.iter().map(item_to_json).collect()),
    );
    out
}

fn preferences_to_json(preferences: &FilterPreferences) -> JsonValue {
    let mut checkboxes = JsonMap::new();
    for toggle in FilterToggle::ALL {
        checkboxes.insert(
            toggle.key().to_string(),
            JsonValue::Bool(preferences.checkboxes.get(toggle)),
        );
    }

    let mut m = JsonMap::new();
    m.insert(
        "searchTerm".to_string(),
        JsonValue::String(preferences.search_term.clone()),
    );
    m.insert("checkboxes".to_string(), JsonValue::Object(checkboxes));
    JsonValue::Object(m)
}

fn item_to_json(entry: &ItemWithSource) -> JsonValue {
    let row = ItemRow::from_item(entry);
    let mut m = JsonMap::new();
    m.insert("source".to_string(), JsonValue::String(row.source));
    m.insert("level".to_string(), JsonValue::from(row.level));
    m.insert("sockets".to_string(), JsonValue::String(row.sockets));
    m.insert("rare_names".to_string(), JsonValue::String(row.rare_names));
    m.insert("name".to_string(), JsonValue::String(row.name));
    m.insert(
        "category".to_string(),
        JsonValue::String(row.category.as_str().to_string()),
    );
    if let Some(link) = row.link {
        m.insert("unique_or_set_name".to_string(), JsonValue::String(link.name));
        m.insert("wiki_url".to_string(), JsonValue::String(link.url));
        m.insert(
            "link_kind".to_string(),
            JsonValue::String(link.kind.as_str().to_string()),
        );
    }
    JsonValue::Object(m)
}

fn header_label(title: &str, key: SortKey, sort: &SortSpec) -> String {
    match sort.keys().iter().position(|k| *k == key) {
        Some(index) => format!("{title} ({})", index + 1),
        None => title.to_string(),
    }
}

fn format_row(
    source: &str,
    level: &str,
    sockets: &str,
    rare_names: &str,
    name: &str,
    link: &str,
) -> String {
    let line = format!(
        "{:<a$}{:<b$}{:<c$}{:<d$}{:<e$}{}",
        fit_column(source, SOURCE_COL_WIDTH - 1),
        fit_column(level, LEVEL_COL_WIDTH - 1),
        fit_column(sockets, SOCKETS_COL_WIDTH - 1),
        fit_column(rare_names, RARE_COL_WIDTH - 1),
        fit_column(name, NAME_COL_WIDTH - 1),
        link,
        a = SOURCE_COL_WIDTH,
        b = LEVEL_COL_WIDTH,
        c = SOCKETS_COL_WIDTH,
        d = RARE_COL_WIDTH,
        e = NAME_COL_WIDTH,
    );
    line.trim_end().to_string()
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}
