//! Engine facade
//!
//! Owns the compiled criteria snapshot, the page context and the
//! cross-payload block flag, and runs filtering passes dispatched by
//! routing key. Settings updates swap the whole snapshot; there is no
//! partial reconfiguration.

use serde_json::Value;

use crate::actions::index_target;
use crate::criteria::{CriteriaSnapshot, Settings, SettingsError};
use crate::dispatch::resolve_route;
use crate::filter::{ContextMenuHook, ObjectFilter};
use crate::paths::resolve;
use crate::types::{FilterOutcome, PageContext};

pub struct Engine {
    snapshot: Option<CriteriaSnapshot>,
    page: PageContext,
    /// A player response was replaced with a block error and the watch page
    /// still owes the user a way forward.
    current_block: bool,
    hook: Option<Box<dyn ContextMenuHook>>,
}

impl Engine {
    pub fn new(page: PageContext) -> Self {
        Self {
            snapshot: None,
            page,
            current_block: false,
            hook: None,
        }
    }

    pub fn set_context_menu_hook(&mut self, hook: Box<dyn ContextMenuHook>) {
        self.hook = Some(hook);
    }

    pub fn set_page(&mut self, page: PageContext) {
        self.page = page;
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn current_block(&self) -> bool {
        self.current_block
    }

    pub fn snapshot(&self) -> Option<&CriteriaSnapshot> {
        self.snapshot.as_ref()
    }

    /// Compile and install a new settings snapshot.
    ///
    /// When a surface toggle newly covers the page the user is already on
    /// (trending with the trending feed open, shorts with a short open),
    /// the returned outcome asks the embedder to navigate away immediately.
    pub fn on_settings_received(&mut self, settings: &Settings) -> FilterOutcome {
        let snap = CriteriaSnapshot::compile(settings);
        let mut outcome = FilterOutcome::default();

        if !snap.options.suggestions_only {
            let path = self.page.pathname.as_str();
            let leave = (snap.options.trending
                && matches!(path, "/feed/trending" | "/feed/explore"))
                || (snap.options.shorts && path.starts_with("/shorts/"));
            if leave {
                outcome.redirect = Some(index_target(&self.page));
            }
        }

        self.snapshot = Some(snap);
        outcome
    }

    /// Parse a raw settings blob and install it.
    pub fn update_settings_json(&mut self, blob: &str) -> Result<FilterOutcome, SettingsError> {
        let settings = Settings::from_json(blob)?;
        Ok(self.on_settings_received(&settings))
    }

    /// Filter `payload` in place according to its routing key.
    ///
    /// Payloads with no installed settings or no route entry pass through
    /// untouched. Returns the navigation/UI effects for the embedder.
    pub fn filter_payload(&mut self, routing_key: &str, payload: &mut Value) -> FilterOutcome {
        let Some(snap) = self.snapshot.as_ref() else {
            return FilterOutcome::default();
        };
        let Some(plan) = resolve_route(routing_key, self.current_block, payload) else {
            return FilterOutcome::default();
        };

        inflate_raw_player_response(routing_key, payload);

        let filter = ObjectFilter::new(
            snap,
            &self.page,
            plan.table,
            plan.context_menus,
            self.hook.as_deref(),
        );
        let (outcome, current_block) = filter.run(payload, &plan.post_actions, self.current_block);
        self.current_block = current_block;
        outcome
    }
}

/// Embed and legacy player configs carry their player response as a JSON
/// string; parse it into `raw_player_response` so the player rule paths can
/// reach inside.
fn inflate_raw_player_response(routing_key: &str, payload: &mut Value) {
    let (holder_path, source_key) = match routing_key {
        "yt.config_" => ("PLAYER_VARS", "embedded_player_response"),
        "ytplayer.config" | "player" => ("args", "player_response"),
        _ => return,
    };

    let Some(holder) = resolve(payload, holder_path) else {
        return;
    };
    let Some(raw) = holder.get(source_key).and_then(Value::as_str) else {
        return;
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => {
            if let Some(map) = payload
                .get_mut(holder_path)
                .and_then(Value::as_object_mut)
            {
                map.insert("raw_player_response".to_owned(), parsed);
            }
        }
        Err(e) => log::debug!("embedded player response did not parse: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Options, PatternEntry, RawFilterData};
    use serde_json::json;

    fn settings(channel_ids: &[&str], options: Options) -> Settings {
        Settings {
            filter_data: RawFilterData {
                channel_id: channel_ids.iter().map(|s| PatternEntry::from(*s)).collect(),
                ..Default::default()
            },
            options,
        }
    }

    fn video(id: &str, channel: &str) -> Value {
        json!({
            "videoRenderer": {
                "videoId": id,
                "title": {"simpleText": id},
                "shortBylineText": {"runs": [
                    {"text": "c", "navigationEndpoint": {"browseEndpoint": {"browseId": channel}}}
                ]}
            }
        })
    }

    #[test]
    fn test_no_settings_passthrough() {
        let mut engine = Engine::new(PageContext::new("/", "", false));
        let mut payload = json!({"items": [video("v0", "UCbad")]});
        let before = payload.clone();
        engine.filter_payload("/youtubei/v1/browse", &mut payload);
        assert_eq!(payload, before);
    }

    #[test]
    fn test_browse_route_filters() {
        let mut engine = Engine::new(PageContext::new("/", "", false));
        engine.on_settings_received(&settings(&["UCbad"], Options::default()));

        let mut payload = json!({"items": [video("v0", "UCbad"), video("v1", "UCok")]});
        engine.filter_payload("/youtubei/v1/browse", &mut payload);
        assert_eq!(payload["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_route_passthrough() {
        let mut engine = Engine::new(PageContext::new("/", "", false));
        engine.on_settings_received(&settings(&["UCbad"], Options::default()));

        let mut payload = json!({"items": [video("v0", "UCbad")]});
        let before = payload.clone();
        engine.filter_payload("/youtubei/v1/log_event", &mut payload);
        assert_eq!(payload, before);
    }

    #[test]
    fn test_current_block_carries_into_next_route() {
        let mut engine = Engine::new(PageContext::new("/watch", "?v=v1", false));
        engine.on_settings_received(&settings(&["UCbad"], Options::default()));

        let mut player = json!({
            "videoDetails": {"videoId": "v1", "channelId": "UCbad", "author": "x", "title": "t"}
        });
        engine.filter_payload("/youtubei/v1/player", &mut player);
        assert!(engine.current_block());
        assert_eq!(player["playabilityStatus"]["status"], "ERROR");

        // The follow-up next payload resolves the block by redirecting.
        let mut next = json!({
            "contents": {"twoColumnWatchNextResults": {
                "results": {"results": {"contents": []}},
                "secondaryResults": {"secondaryResults": {"results": [
                    {"compactVideoRenderer": {
                        "videoId": "next1",
                        "title": {"simpleText": "fine"},
                        "shortBylineText": {"runs": [{"text": "c",
                            "navigationEndpoint": {"browseEndpoint": {"browseId": "UCok"}}}]}
                    }}
                ]}}
            }}
        });
        let outcome = engine.filter_payload("/youtubei/v1/next", &mut next);
        assert!(!engine.current_block());
        assert!(outcome.censor_title);
    }

    #[test]
    fn test_settings_swap_replaces_criteria() {
        let mut engine = Engine::new(PageContext::new("/", "", false));
        engine.on_settings_received(&settings(&["UCbad"], Options::default()));
        engine.on_settings_received(&settings(&["UCother"], Options::default()));

        let mut payload = json!({"items": [video("v0", "UCbad")]});
        engine.filter_payload("/youtubei/v1/browse", &mut payload);
        assert_eq!(payload["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_trending_toggle_redirects_off_trending_page() {
        let mut engine = Engine::new(PageContext::new("/feed/trending", "", false));
        let outcome = engine.on_settings_received(&settings(
            &[],
            Options {
                trending: true,
                ..Default::default()
            },
        ));
        assert_eq!(outcome.redirect.as_deref(), Some("/"));

        let mut engine = Engine::new(PageContext::new("/", "", false));
        let outcome = engine.on_settings_received(&settings(
            &[],
            Options {
                trending: true,
                ..Default::default()
            },
        ));
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn test_shorts_toggle_redirects_off_short() {
        let mut engine = Engine::new(PageContext::new("/shorts/abc123", "", true));
        let outcome = engine.on_settings_received(&settings(
            &[],
            Options {
                shorts: true,
                ..Default::default()
            },
        ));
        assert_eq!(outcome.redirect.as_deref(), Some("/"));
    }

    #[test]
    fn test_update_settings_json() {
        let mut engine = Engine::new(PageContext::new("/", "", false));
        assert!(engine.update_settings_json("not json").is_err());

        let blob = r#"{"filterData": {"channelId": ["UCbad"]}, "options": {}}"#;
        engine.update_settings_json(blob).unwrap();
        let mut payload = json!({"items": [video("v0", "UCbad")]});
        engine.filter_payload("/youtubei/v1/browse", &mut payload);
        assert!(payload["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_embed_config_inflation() {
        let mut engine = Engine::new(PageContext::new("/embed/v1", "", false));
        engine.on_settings_received(&settings(&["UCbad"], Options::default()));

        let embedded = json!({
            "embedPreview": {"thumbnailPreviewRenderer": {
                "title": {"simpleText": "t"},
                "videoDetails": {"embeddedPlayerOverlayVideoDetailsRenderer": {
                    "expandedRenderer": {"embeddedPlayerOverlayVideoDetailsExpandedRenderer": {
                        "subscribeButton": {"subscribeButtonRenderer": {"channelId": "UCbad"}}
                    }}
                }}
            }}
        });
        let mut payload = json!({
            "PLAYER_VARS": {
                "video_id": "v1",
                "embedded_player_response": embedded.to_string()
            }
        });
        let outcome = engine.filter_payload("yt.config_", &mut payload);
        // The blocked embed config is removed and the title censored.
        assert!(payload.get("PLAYER_VARS").is_none());
        assert!(outcome.censor_title);
    }
}
