use d2_core::core_api::{
    Engine, FilterPreferences, MemoryStore, PREFERENCES_KEY, PreferenceStore, SortKey,
};
use d2_render::{JsonStyle, render_json, render_text};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebRenderOptions {
    /// Starting preferences; defaults apply when absent.
    pub preferences: Option<FilterPreferences>,
    /// Sort keys toggled in order, as with repeated `--sort` flags.
    pub sort: Vec<String>,
    pub json_output: bool,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

#[wasm_bindgen]
pub fn render_inventory(snapshot_json: &str, options: JsValue) -> Result<String, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    render_inventory_impl(snapshot_json, &parsed_options).map_err(|err| err.to_js_value())
}

fn render_inventory_impl(
    snapshot_json: &str,
    options: &WebRenderOptions,
) -> Result<String, WebError> {
    let sort_keys = parse_sort_keys(&options.sort)?;

    let store = MemoryStore::new();
    if let Some(preferences) = &options.preferences {
        let encoded = serde_json::to_string(preferences).map_err(|err| {
            WebError::new(
                "invalid_options",
                format!("failed to encode preferences: {err}"),
            )
        })?;
        store
            .set(PREFERENCES_KEY, &encoded)
            .map_err(|err| WebError::new("invalid_options", err.to_string()))?;
    }

    let engine = Engine::new();
    let mut session = engine.open_session(Box::new(store));
    for key in sort_keys {
        session.toggle_sort(key);
    }

    let snapshot = engine
        .decode_snapshot(snapshot_json)
        .map_err(|err| WebError::new("decode_failed", err.to_string()))?;
    session.replace_snapshot(snapshot);

    let view = session.view();
    if options.json_output {
        let value = render_json(&view, JsonStyle::CanonicalV1);
        return serde_json::to_string_pretty(&value).map_err(|err| {
            WebError::new(
                "render_failed",
                format!("failed to serialize rendered JSON output: {err}"),
            )
        });
    }

    Ok(render_text(&view))
}

fn parse_options(options: JsValue) -> Result<WebRenderOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebRenderOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web render options: {err}"),
        )
    })
}

fn parse_sort_keys(raw: &[String]) -> Result<Vec<SortKey>, WebError> {
    raw.iter()
        .map(|key| {
            key.trim()
                .parse::<SortKey>()
                .map_err(|err| WebError::new("invalid_options", err))
        })
        .collect()
}
