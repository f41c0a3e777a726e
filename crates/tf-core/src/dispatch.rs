//! Routing-key dispatch
//!
//! Maps the source of a payload (an innertube endpoint path, a legacy SPF
//! endpoint, or a global page-data slot name) to the rule table, post
//! actions and context-menu flag for the pass. Keys with no route entry
//! pass through unfiltered.

use serde_json::Value;

use crate::rules::{RuleTable, COMMENT_RULES, GUIDE_RULES, MAIN_RULES, MERGED_RULES, PLAYER_RULES};
use crate::types::ActionKind;

/// Everything one filtering pass needs to know about its payload source.
pub struct RoutePlan {
    pub table: &'static RuleTable,
    pub post_actions: Vec<ActionKind>,
    pub context_menus: bool,
}

impl RoutePlan {
    fn new(table: &'static RuleTable, context_menus: bool) -> Self {
        Self {
            table,
            post_actions: Vec::new(),
            context_menus,
        }
    }

    fn with_posts(mut self, posts: &[ActionKind]) -> Self {
        self.post_actions = posts.to_vec();
        self
    }
}

/// Post actions for watch-page payloads: repair autoplay, and when a
/// whole-page block is pending, move on to the next suggestion.
fn watch_posts(current_block: bool) -> Vec<ActionKind> {
    let mut posts = vec![ActionKind::FixAutoplay];
    if current_block {
        posts.push(ActionKind::RedirectToNext);
    }
    posts
}

/// Resolve a routing key. `payload` is consulted only for keys whose post
/// actions depend on payload shape.
pub fn resolve_route(key: &str, current_block: bool, payload: &Value) -> Option<RoutePlan> {
    let plan = match key {
        // Innertube endpoints
        "/youtubei/v1/search" | "/youtubei/v1/browse" => RoutePlan::new(&MAIN_RULES, true),
        "/youtubei/v1/next" => {
            RoutePlan::new(&MERGED_RULES, true).with_posts(&watch_posts(current_block))
        }
        "/youtubei/v1/guide" => RoutePlan::new(&GUIDE_RULES, true),
        "/youtubei/v1/player" => {
            RoutePlan::new(&PLAYER_RULES, false).with_posts(&[ActionKind::PlayerMiscFilters])
        }

        // Legacy SPF endpoints
        "/guide_ajax" => RoutePlan::new(&GUIDE_RULES, true),
        "/comment_service_ajax" | "/live_chat/get_live_chat" => {
            RoutePlan::new(&COMMENT_RULES, true)
        }
        "/watch" => RoutePlan::new(&MAIN_RULES, true).with_posts(&watch_posts(current_block)),

        // Global page-data slots
        "ytInitialData" => {
            // The pending block only resolves against a full watch payload.
            let block_here = current_block && payload.get("contents").is_some();
            RoutePlan::new(&MERGED_RULES, true).with_posts(&watch_posts(block_here))
        }
        "ytInitialPlayerResponse" => RoutePlan::new(&PLAYER_RULES, false),
        "ytInitialGuideData" => RoutePlan::new(&GUIDE_RULES, false),
        "ytplayer.config" | "yt.config_" => {
            RoutePlan::new(&PLAYER_RULES, false).with_posts(&[ActionKind::PlayerMiscFilters])
        }

        // SPF response parts
        "player" => {
            RoutePlan::new(&PLAYER_RULES, false).with_posts(&[ActionKind::PlayerMiscFilters])
        }
        "playerResponse" => RoutePlan::new(&PLAYER_RULES, false),

        _ => return None,
    };
    Some(plan)
}
