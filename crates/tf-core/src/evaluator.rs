//! Per-node match evaluation
//!
//! Given a candidate node and its rule descriptor, decide whether the
//! compiled criteria block it. Deterministic criteria (pattern lists, the
//! duration window, the watched-percent threshold) are checked field by
//! field in descriptor order; when none match and a user predicate is
//! enabled, the predicate gets the final say over a friendly summary of the
//! values seen along the way.

use serde_json::{Map, Value};

use crate::criteria::{CriteriaSnapshot, VidLengthType};
use crate::paths::{resolve, resolve_flattened};
use crate::rules::{RuleDescriptor, COMMENT_ENTITY_ID, LOCKUP_MIX_BADGE};
use crate::text::{parse_time, parse_view_count, SHORTS_LENGTH};
use crate::types::{FilterField, PageContext};

/// Paths where the watched-percent threshold is suspended; hiding there
/// would empty the user's own library views.
const PERCENT_WATCHED_EXEMPT_PATHS: &[&str] = &["/feed/history", "/feed/library", "/playlist"];

/// Result of evaluating one node.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub block: bool,
    /// Comment id to remember for cascading thread removal, set when a
    /// comment-entity node is blocked.
    pub blocked_comment: Option<String>,
}

/// Evaluates nodes against one criteria snapshot within one page context.
pub struct Evaluator<'a> {
    snap: &'a CriteriaSnapshot,
    page: &'a PageContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(snap: &'a CriteriaSnapshot, page: &'a PageContext) -> Self {
        Self { snap, page }
    }

    /// Evaluate `obj` (the node of kind `object_type`) against the
    /// descriptor's field set.
    pub fn matches(&self, desc: &RuleDescriptor, obj: &Value, object_type: &str) -> MatchOutcome {
        let options = &self.snap.options;

        if self.page.pathname == "/feed/history" && options.disable_on_history {
            return MatchOutcome::default();
        }

        let mut friendly = Map::new();
        let mut block = false;

        for (field, path) in desc.properties {
            let field = *field;

            let patterns = self.snap.patterns_for(field);
            if field.is_regex_field() && patterns.is_empty() && !self.snap.js_enabled() {
                continue;
            }

            let Some(mut value) = resolve_flattened(obj, path) else {
                continue;
            };

            if field == FilterField::PercentWatched
                && self.percent_threshold_hit(&value, object_type)
            {
                block = true;
                break;
            }

            if field.is_regex_field() {
                if let Some(text) = scalar_to_string(&value) {
                    if patterns.iter().any(|re| re.is_match(&text)) {
                        block = true;
                        break;
                    }
                }
            }

            if field == FilterField::VidLength {
                let seconds = scalar_to_string(&value)
                    .map(|text| parse_time(&text))
                    .unwrap_or(-1);
                if seconds == SHORTS_LENGTH && options.shorts {
                    block = true;
                    break;
                }
                if seconds > 0 && self.length_window_blocks(seconds) {
                    block = true;
                    break;
                }
                value = Value::from(seconds);
            }

            if self.snap.js_enabled() {
                let value = match field {
                    FilterField::ViewCount => scalar_to_string(&value)
                        .and_then(|text| parse_view_count(&text))
                        .map(Value::from)
                        .unwrap_or(Value::Null),
                    FilterField::Badges | FilterField::ChannelBadges => decode_badges(&value),
                    _ => value,
                };
                friendly.insert(field.as_str().to_owned(), value);
            }
        }

        if !block {
            if let Some(pred) = self.snap.predicate() {
                block = pred.invoke(&Value::Object(friendly), object_type);
            }
        }

        let blocked_comment = if block && object_type == "commentEntityPayload" {
            resolve(obj, COMMENT_ENTITY_ID)
                .and_then(Value::as_str)
                .map(str::to_owned)
        } else {
            None
        };

        MatchOutcome {
            block,
            blocked_comment,
        }
    }

    /// Option-driven matches that need no field data: movie, shorts and mix
    /// surfaces recognized by node kind alone, plus cascading removal of
    /// comment threads whose inner comment entity was already blocked.
    pub fn extended_match(&self, obj: &Value, tag: &str, blocked_comments: &[String]) -> bool {
        let options = &self.snap.options;

        if options.movies {
            if tag == "movieRenderer" || tag == "compactMovieRenderer" {
                return true;
            }
            // Movies sometimes arrive as plain video renderers without a
            // channel endpoint.
            if tag == "videoRenderer"
                && resolve(obj, "shortBylineText.runs.navigationEndpoint.browseEndpoint").is_none()
                && obj.get("longBylineText").is_some()
                && obj.get("badges").is_some()
            {
                return true;
            }
        }

        if options.shorts
            && matches!(tag, "shortsLockupViewModel" | "reelItemRenderer" | "gridShelfViewModel")
        {
            return true;
        }

        if options.mixes {
            if matches!(tag, "radioRenderer" | "compactRadioRenderer") {
                return true;
            }
            if tag == "lockupViewModel"
                && resolve(obj, LOCKUP_MIX_BADGE).and_then(Value::as_str) == Some("MIX")
            {
                return true;
            }
        }

        let referenced_comment = match tag {
            "commentThreadRenderer" => resolve(obj, crate::rules::COMMENT_THREAD_COMMENT_ID),
            "commentViewModel" => resolve(obj, crate::rules::COMMENT_VIEW_MODEL_ID),
            _ => None,
        };
        if let Some(id) = referenced_comment.and_then(Value::as_str) {
            if blocked_comments.iter().any(|c| c == id) {
                return true;
            }
        }

        false
    }

    fn percent_threshold_hit(&self, value: &Value, object_type: &str) -> bool {
        let Some(threshold) = self.snap.options.percent_watched_hide.filter(|t| *t > 0) else {
            return false;
        };
        if object_type == "playlistPanelVideoRenderer" {
            return false;
        }
        if PERCENT_WATCHED_EXEMPT_PATHS.contains(&self.page.pathname.as_str()) {
            return false;
        }
        let Some(watched) = value
            .as_f64()
            .or_else(|| scalar_to_string(value).and_then(|s| leading_number(&s)))
        else {
            return false;
        };
        watched >= threshold as f64
    }

    fn length_window_blocks(&self, seconds: i64) -> bool {
        let [min, max] = self.snap.vid_length;
        match self.snap.options.vid_length_type {
            VidLengthType::Block => matches!((min, max), (Some(lo), Some(hi)) if seconds >= lo && seconds <= hi),
            VidLengthType::Allow => {
                min.is_some_and(|lo| seconds < lo) || max.is_some_and(|hi| seconds > hi)
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Decode a badge renderer list into friendly badge names.
fn decode_badges(value: &Value) -> Value {
    let Some(items) = value.as_array() else {
        return Value::Array(Vec::new());
    };
    let badges: Vec<Value> = items
        .iter()
        .filter_map(|badge| {
            let style = resolve(badge, "metadataBadgeRenderer.style")?.as_str()?;
            let name = match style {
                "BADGE_STYLE_TYPE_VERIFIED" => "verified",
                "BADGE_STYLE_TYPE_VERIFIED_ARTIST" => "artist",
                "BADGE_STYLE_TYPE_LIVE_NOW" => "live",
                "BADGE_STYLE_TYPE_MEMBERS_ONLY" => "members",
                _ => return None,
            };
            Some(Value::from(name))
        })
        .collect();
    Value::Array(badges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Options, PatternEntry, RawFilterData, Settings};
    use crate::rules::MAIN_RULES;
    use serde_json::json;

    fn snap(data: RawFilterData, options: Options) -> CriteriaSnapshot {
        CriteriaSnapshot::compile(&Settings {
            filter_data: data,
            options,
        })
    }

    fn strings(items: &[&str]) -> Vec<PatternEntry> {
        items.iter().map(|s| PatternEntry::from(*s)).collect()
    }

    fn video(channel_id: &str, title: &str, length: &str) -> Value {
        json!({
            "videoId": "vid01",
            "title": {"simpleText": title},
            "shortBylineText": {"runs": [
                {"text": "Channel", "navigationEndpoint": {"browseEndpoint": {"browseId": channel_id}}}
            ]},
            "thumbnailOverlays": [
                {"thumbnailOverlayTimeStatusRenderer": {"text": {"simpleText": length}}}
            ],
            "viewCountText": {"simpleText": "1,234 views"}
        })
    }

    fn desktop() -> PageContext {
        PageContext::new("/", "", false)
    }

    #[test]
    fn test_channel_id_exact_match() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UC123"]),
                ..Default::default()
            },
            Options::default(),
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();

        assert!(eval.matches(desc, &video("UC123", "t", "2:05"), "videoRenderer").block);
        assert!(!eval.matches(desc, &video("UC456", "t", "2:05"), "videoRenderer").block);
        assert!(!eval.matches(desc, &video("UC1234", "t", "2:05"), "videoRenderer").block);
    }

    #[test]
    fn test_title_keyword() {
        let snap = snap(
            RawFilterData {
                title: strings(&["foo"]),
                ..Default::default()
            },
            Options::default(),
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();

        assert!(eval.matches(desc, &video("UC1", "Foo Bar", "2:05"), "videoRenderer").block);
        assert!(!eval.matches(desc, &video("UC1", "Foobarred", "2:05"), "videoRenderer").block);
    }

    #[test]
    fn test_length_window_block_mode() {
        let snap = snap(
            RawFilterData {
                vid_length: [Some(60), Some(600)],
                ..Default::default()
            },
            Options::default(),
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();

        assert!(eval.matches(desc, &video("UC1", "t", "2:00"), "videoRenderer").block);
        assert!(!eval.matches(desc, &video("UC1", "t", "0:30"), "videoRenderer").block);
        assert!(!eval.matches(desc, &video("UC1", "t", "11:00"), "videoRenderer").block);
    }

    #[test]
    fn test_length_window_allow_mode() {
        let snap = snap(
            RawFilterData {
                vid_length: [Some(60), Some(600)],
                ..Default::default()
            },
            Options {
                vid_length_type: VidLengthType::Allow,
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();

        assert!(!eval.matches(desc, &video("UC1", "t", "2:00"), "videoRenderer").block);
        assert!(eval.matches(desc, &video("UC1", "t", "0:30"), "videoRenderer").block);
        assert!(eval.matches(desc, &video("UC1", "t", "11:00"), "videoRenderer").block);
    }

    #[test]
    fn test_unknown_length_never_blocks() {
        let snap = snap(
            RawFilterData {
                vid_length: [Some(0), Some(600)],
                ..Default::default()
            },
            Options::default(),
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();
        // Unparseable badge text resolves to -1 and falls outside any window.
        assert!(!eval.matches(desc, &video("UC1", "t", "LIVE"), "videoRenderer").block);
    }

    #[test]
    fn test_shorts_length_sentinel() {
        let snap = snap(
            RawFilterData::default(),
            Options {
                shorts: true,
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();
        assert!(eval.matches(desc, &video("UC1", "t", "SHORTS"), "videoRenderer").block);
    }

    #[test]
    fn test_history_page_opt_out() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UC123"]),
                ..Default::default()
            },
            Options {
                disable_on_history: true,
                ..Default::default()
            },
        );
        let page = PageContext::new("/feed/history", "", false);
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();
        assert!(!eval.matches(desc, &video("UC123", "t", "2:05"), "videoRenderer").block);
    }

    #[test]
    fn test_percent_watched_threshold() {
        let snap = snap(
            RawFilterData::default(),
            Options {
                percent_watched_hide: Some(80),
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();

        let mut watched = video("UC1", "t", "2:05");
        watched["thumbnailOverlays"]
            .as_array_mut()
            .unwrap()
            .push(json!({"thumbnailOverlayResumePlaybackRenderer": {"percentDurationWatched": 90}}));
        assert!(eval.matches(desc, &watched, "videoRenderer").block);

        // Suspended on library-style pages.
        let history = PageContext::new("/feed/history", "", false);
        let eval = Evaluator::new(&snap, &history);
        assert!(!eval.matches(desc, &watched, "videoRenderer").block);
    }

    #[test]
    fn test_predicate_sees_friendly_values() {
        let snap = snap(
            RawFilterData {
                javascript: Some(
                    "(function(video, objectType) { return video.viewCount < 2000; })".to_owned(),
                ),
                ..Default::default()
            },
            Options {
                enable_javascript: true,
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = MAIN_RULES.get("videoRenderer").unwrap();
        // viewCountText is "1,234 views" so the decoded count is 1234.
        assert!(eval.matches(desc, &video("UC1", "t", "2:05"), "videoRenderer").block);
    }

    #[test]
    fn test_blocked_comment_recorded() {
        let snap = snap(
            RawFilterData {
                comment: strings(&["spam"]),
                ..Default::default()
            },
            Options::default(),
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);
        let desc = crate::rules::COMMENT_RULES.get("commentEntityPayload").unwrap();

        let comment = json!({
            "author": {"channelId": "UC9", "displayName": "someone"},
            "properties": {
                "commentId": "c-42",
                "content": {"content": "this is SPAM, really"}
            }
        });
        let outcome = eval.matches(desc, &comment, "commentEntityPayload");
        assert!(outcome.block);
        assert_eq!(outcome.blocked_comment.as_deref(), Some("c-42"));
    }

    #[test]
    fn test_extended_match_mix_lockup() {
        let snap = snap(
            RawFilterData::default(),
            Options {
                mixes: true,
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);

        let mix = json!({
            "contentId": "RDx",
            "contentImage": {"collectionThumbnailViewModel": {"primaryThumbnail": {"thumbnailViewModel": {"overlays": [
                {"thumbnailOverlayBadgeViewModel": {"thumbnailBadges": [
                    {"thumbnailBadgeViewModel": {"icon": {"sources": [
                        {"clientResource": {"imageName": "MIX"}}
                    ]}}}
                ]}}
            ]}}}}
        });
        assert!(eval.extended_match(&mix, "lockupViewModel", &[]));
        assert!(!eval.extended_match(&json!({"contentId": "x"}), "lockupViewModel", &[]));
        assert!(eval.extended_match(&json!({}), "radioRenderer", &[]));
    }

    #[test]
    fn test_extended_match_movies() {
        let off = snap(RawFilterData::default(), Options::default());
        let snap = snap(
            RawFilterData::default(),
            Options {
                movies: true,
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);

        assert!(eval.extended_match(&json!({}), "movieRenderer", &[]));
        assert!(eval.extended_match(&json!({}), "compactMovieRenderer", &[]));

        // Movie shipped as a plain video renderer: byline without a channel
        // endpoint, long byline and badge fields present.
        let movie = json!({
            "videoId": "m1",
            "shortBylineText": {"runs": [{"text": "Studio"}]},
            "longBylineText": {"runs": [{"text": "Studio"}]},
            "badges": [{"metadataBadgeRenderer": {"style": "BADGE_STYLE_TYPE_YPC"}}]
        });
        assert!(eval.extended_match(&movie, "videoRenderer", &[]));

        // A regular video keeps its channel endpoint.
        let regular = json!({
            "videoId": "v1",
            "shortBylineText": {"runs": [{"text": "c",
                "navigationEndpoint": {"browseEndpoint": {"browseId": "UC1"}}}]},
            "longBylineText": {"runs": [{"text": "c"}]},
            "badges": []
        });
        assert!(!eval.extended_match(&regular, "videoRenderer", &[]));

        let eval = Evaluator::new(&off, &page);
        assert!(!eval.extended_match(&json!({}), "movieRenderer", &[]));
    }

    #[test]
    fn test_extended_match_shorts_kinds() {
        let snap = snap(
            RawFilterData::default(),
            Options {
                shorts: true,
                ..Default::default()
            },
        );
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);

        assert!(eval.extended_match(&json!({}), "shortsLockupViewModel", &[]));
        assert!(eval.extended_match(&json!({}), "reelItemRenderer", &[]));
        assert!(eval.extended_match(&json!({}), "gridShelfViewModel", &[]));
        assert!(!eval.extended_match(&json!({}), "videoRenderer", &[]));
    }

    #[test]
    fn test_extended_match_comment_cascade() {
        let snap = snap(RawFilterData::default(), Options::default());
        let page = desktop();
        let eval = Evaluator::new(&snap, &page);

        let thread = json!({
            "commentViewModel": {"commentViewModel": {"commentId": "c-42"}}
        });
        let blocked = vec!["c-42".to_owned()];
        assert!(eval.extended_match(&thread, "commentThreadRenderer", &blocked));
        assert!(!eval.extended_match(&thread, "commentThreadRenderer", &[]));
    }
}
