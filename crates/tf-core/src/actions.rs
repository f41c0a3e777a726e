//! Side-effect actions
//!
//! Two flavors. Custom actions run when a rule with an attached action
//! matches; they receive the matched node's parent and return whether the
//! node should still be deleted. Post actions run once per pass after
//! traversal, against the payload root. Actions that would navigate or
//! rewrite root-level regions mid-traversal are instead queued from their
//! custom form and executed in the post phase.

use serde_json::{json, Value};

use crate::filter::ObjectFilter;
use crate::paths::{resolve, resolve_mut};
use crate::types::{ActionKind, FilterOutcome, PageContext};

const ERROR_THUMB_URL: &str = "//s.ytimg.com/yts/img/meh7-vflGevej7.png";
const PLACEHOLDER_THUMB_URL: &str = "https://s.ytimg.com/yts/img/meh_mini-vfl0Ugnu3.png";

/// Run a rule's custom action. Returns true when the matched node should
/// still be removed from its parent.
pub(crate) fn run_custom(
    f: &mut ObjectFilter<'_>,
    kind: ActionKind,
    obj: &mut Value,
    tag: &str,
) -> bool {
    match kind {
        ActionKind::DisablePlayer => disable_player(f, obj),
        ActionKind::DisableEmbedPlayer => disable_embed_player(f),
        ActionKind::BlockPlaylistVid => {
            block_playlist_vid(f, obj, tag);
            false
        }
        ActionKind::MarkAutoplay => mark_autoplay(f, obj, tag),
        ActionKind::RedirectToIndex => redirect_to_index(f),
        ActionKind::RedirectToNext | ActionKind::RedirectToNextMobile => {
            defer_redirect_to_next(f, kind)
        }
        // Post-only kinds never appear in rule tables.
        ActionKind::FixAutoplay | ActionKind::PlayerMiscFilters => true,
    }
}

/// Run a post action against the payload root.
pub(crate) fn run_post(f: &mut ObjectFilter<'_>, kind: ActionKind, root: &mut Value) {
    match kind {
        ActionKind::FixAutoplay => {
            if root.get("playerOverlays").is_none() {
                return;
            }
            if f.page.is_mobile {
                fix_autoplay_mobile(root);
            } else {
                fix_autoplay(root);
            }
        }
        ActionKind::RedirectToNext => {
            if f.page.is_mobile {
                redirect_to_next_mobile(f, root);
            } else {
                redirect_to_next(f, root);
            }
        }
        ActionKind::RedirectToNextMobile => redirect_to_next_mobile(f, root),
        ActionKind::PlayerMiscFilters => player_misc_filters(f, root),
        ActionKind::RedirectToIndex => {
            redirect_to_index(f);
        }
        _ => {}
    }
}

fn queue(f: &mut ObjectFilter<'_>, kind: ActionKind) {
    if !f.pending_posts.contains(&kind) {
        f.pending_posts.push(kind);
    }
}

fn redirect(f: &mut ObjectFilter<'_>, target: String) {
    f.outcome.merge(FilterOutcome {
        redirect: Some(target),
        censor_title: false,
    });
}

/// True when the query string carries a `list` parameter (playlist pages
/// keep their surroundings even when the current video is blocked).
fn has_list_param(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .any(|pair| pair.split('=').next() == Some("list"))
}

/// Index redirect target: strip everything from `&list=` onward when
/// leaving a playlist, otherwise go home.
pub(crate) fn index_target(page: &PageContext) -> String {
    match page.search.find("&list=") {
        Some(idx) => format!("{}{}", page.pathname, &page.search[..idx]),
        None => "/".to_owned(),
    }
}

// =============================================================================
// Custom Actions
// =============================================================================

/// Replace an entire player response with a playability error carrying the
/// user's block message. The response shape must stay valid for the player
/// UI, hence the error-screen renderer.
fn disable_player(f: &mut ObjectFilter<'_>, obj: &mut Value) -> bool {
    if f.snap.options.suggestions_only {
        return false;
    }
    let message = f.snap.options.block_message().to_owned();

    if let Some(map) = obj.as_object_mut() {
        map.clear();
        map.insert(
            "playabilityStatus".to_owned(),
            json!({
                "status": "ERROR",
                "reason": message,
                "errorScreen": {
                    "playerErrorMessageRenderer": {
                        "reason": {"simpleText": message},
                        "thumbnail": {"thumbnails": [
                            {"url": ERROR_THUMB_URL, "width": 140, "height": 100}
                        ]},
                        "icon": {"iconType": "ERROR_OUTLINE"}
                    }
                }
            }),
        );
    }
    f.current_block = true;
    false
}

fn disable_embed_player(f: &mut ObjectFilter<'_>) -> bool {
    if f.snap.options.suggestions_only {
        return false;
    }
    f.outcome.censor_title = true;
    true
}

/// Playlist panels break when an entry vanishes, so a blocked entry is
/// rewritten into an unplayable placeholder instead of removed.
fn block_playlist_vid(f: &mut ObjectFilter<'_>, obj: &mut Value, tag: &str) {
    let message = f.snap.options.block_message().to_owned();
    let Some(vid) = obj.get_mut(tag).and_then(Value::as_object_mut) else {
        return;
    };

    vid.insert("videoId".to_owned(), Value::from("undefined"));
    vid.insert("unplayableText".to_owned(), json!({"simpleText": message}));
    vid.insert(
        "thumbnail".to_owned(),
        json!({"thumbnails": [{"url": PLACEHOLDER_THUMB_URL}]}),
    );
    vid.remove("title");
    vid.remove("longBylineText");
    vid.remove("shortBylineText");
    vid.remove("thumbnailOverlays");
}

/// On mobile the autoplay overlay cannot be removed outright without
/// breaking the player; it is tagged for the repair pass instead.
fn mark_autoplay(f: &mut ObjectFilter<'_>, obj: &mut Value, tag: &str) -> bool {
    if f.page.is_mobile {
        if let Some(overlay) = obj.get_mut(tag).and_then(Value::as_object_mut) {
            overlay.insert("_deleted".to_owned(), Value::Bool(true));
        }
        return false;
    }
    true
}

fn redirect_to_index(f: &mut ObjectFilter<'_>) -> bool {
    if f.snap.options.suggestions_only {
        return false;
    }
    let target = index_target(f.page);
    redirect(f, target);
    false
}

/// Blocked watch-page node: clear the page-block flag, then queue the
/// root-level rewrite for after traversal.
fn defer_redirect_to_next(f: &mut ObjectFilter<'_>, kind: ActionKind) -> bool {
    f.current_block = false;
    if f.snap.options.suggestions_only {
        return false;
    }
    if f.page.is_mobile || kind == ActionKind::RedirectToNextMobile {
        queue(f, ActionKind::RedirectToNextMobile);
    } else {
        f.outcome.censor_title = true;
        queue(f, ActionKind::RedirectToNext);
    }
    false
}

// =============================================================================
// Post Actions
// =============================================================================

/// First suggested video on a desktop watch page, looking inside the chip
/// section when one is present.
fn find_next_video(root: &Value) -> Option<String> {
    let mut results = resolve(
        root,
        "contents.twoColumnWatchNextResults.secondaryResults.secondaryResults.results",
    )?
    .as_array()?;

    if let Some(section) = results.iter().find(|x| x.get("itemSectionRenderer").is_some()) {
        results = resolve(section, "itemSectionRenderer.contents")?.as_array()?;
    }

    if let Some(id) = results
        .iter()
        .find_map(|x| resolve(x, "compactVideoRenderer.videoId"))
    {
        return id.as_str().map(str::to_owned);
    }
    results
        .iter()
        .find_map(|x| resolve(x, "lockupViewModel.contentId"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Clear the primary watch-page column and move on to the next suggestion.
fn redirect_to_next(f: &mut ObjectFilter<'_>, root: &mut Value) {
    f.current_block = false;
    if f.snap.options.suggestions_only {
        return;
    }
    f.outcome.censor_title = true;

    let Some(primary) = resolve_mut(root, "contents.twoColumnWatchNextResults.results.results")
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    primary.insert("contents".to_owned(), json!([]));

    if let Some(two) = resolve_mut(root, "contents.twoColumnWatchNextResults")
        .and_then(Value::as_object_mut)
    {
        two.remove("conversationBar");
    }

    if has_list_param(&f.page.search) {
        return;
    }

    if f.snap.options.autoplay {
        if let Some(id) = find_next_video(root) {
            redirect(f, format!("watch?v={id}"));
        }
    }
    if let Some(secondary) = resolve_mut(root, "contents.twoColumnWatchNextResults.secondaryResults")
        .and_then(Value::as_object_mut)
    {
        secondary.remove("secondaryResults");
    }
}

/// The up-next renderer on a mobile watch page: the last watch-next-feed
/// item section when present. The raw contents list is consulted only when
/// `flat_fallback` is set; the redirect path tolerates sectionless payload
/// shapes, the autoplay repair requires the feed section.
fn mobile_next_renderer(root: &Value, flat_fallback: bool) -> Option<&Value> {
    let contents = resolve(
        root,
        "contents.singleColumnWatchNextResults.results.results.contents",
    )?;

    let section = contents
        .as_array()?
        .iter()
        .filter(|v| {
            resolve(v, "itemSectionRenderer.targetId").and_then(Value::as_str)
                == Some("watch-next-feed")
        })
        .last()
        .and_then(|v| v.get("itemSectionRenderer"));

    match section {
        Some(section) => resolve(section, "contents.videoWithContextRenderer"),
        None if flat_fallback => resolve(contents, "contents.videoWithContextRenderer"),
        None => None,
    }
}

fn redirect_to_next_mobile(f: &mut ObjectFilter<'_>, root: &mut Value) {
    f.current_block = false;
    if f.snap.options.suggestions_only {
        return;
    }
    if has_list_param(&f.page.search) {
        return;
    }
    if resolve(
        root,
        "contents.singleColumnWatchNextResults.results.results.contents",
    )
    .is_none()
    {
        return;
    }

    if !f.snap.options.autoplay {
        if let Some(map) = root.as_object_mut() {
            map.remove("contents");
        }
        return;
    }

    let Some(id) = mobile_next_renderer(root, true)
        .and_then(|r| r.get("videoId"))
        .and_then(Value::as_str)
        .map(str::to_owned)
    else {
        return;
    };
    redirect(f, format!("watch?v={id}"));
    if let Some(map) = root.as_object_mut() {
        map.remove("contents");
    }
}

/// Point the autoplay queue at the first surviving suggestion after the
/// original autoplay target was filtered out. Any repair failure deletes
/// the queue instead, which the player treats as "autoplay unavailable".
fn fix_autoplay(root: &mut Value) {
    if resolve(root, "playerOverlays.playerOverlayRenderer.autoplay").is_none() {
        return;
    }
    // Overlay intact means its target survived filtering.
    if resolve(
        root,
        "playerOverlays.playerOverlayRenderer.autoplay.playerOverlayAutoplayRenderer",
    )
    .is_some()
    {
        return;
    }
    if resolve(
        root,
        "contents.twoColumnWatchNextResults.autoplay.autoplay.sets[0].autoplayVideo",
    )
    .is_none()
    {
        return;
    }

    let repaired = find_next_video(root)
        .and_then(|id| repoint_autoplay(root, &id))
        .and_then(|()| clear_prefetch(root))
        .is_some();

    if !repaired {
        if let Some(two) = resolve_mut(root, "contents.twoColumnWatchNextResults")
            .and_then(Value::as_object_mut)
        {
            two.remove("autoplay");
        }
    }
}

fn repoint_autoplay(root: &mut Value, id: &str) -> Option<()> {
    let video = resolve_mut(
        root,
        "contents.twoColumnWatchNextResults.autoplay.autoplay.sets[0].autoplayVideo",
    )?
    .as_object_mut()?;
    video.insert("videoId".to_owned(), Value::from(id));
    video
        .get_mut("watchEndpoint")?
        .as_object_mut()?
        .insert("videoId".to_owned(), Value::from(id));
    Some(())
}

fn clear_prefetch(root: &mut Value) -> Option<()> {
    resolve_mut(
        root,
        "responseContext.webResponseContextExtensionData.webPrefetchData",
    )?
    .as_object_mut()?
    .insert("navigationEndpoints".to_owned(), json!([]));
    Some(())
}

/// Mobile repair: copy the next suggestion's fields over the tagged
/// autoplay overlay and repoint the autoplay set at it.
fn fix_autoplay_mobile(root: &mut Value) {
    const OVERLAY_PATH: &str =
        "playerOverlays.playerOverlayRenderer.autoplay.playerOverlayAutoplayRenderer";

    let tagged = resolve(root, OVERLAY_PATH)
        .and_then(|o| o.get("_deleted"))
        .and_then(Value::as_bool)
        == Some(true);
    if !tagged {
        return;
    }

    let Some(renderer) = mobile_next_renderer(root, false).cloned() else {
        return;
    };

    if let Some(overlay) = resolve_mut(root, OVERLAY_PATH).and_then(Value::as_object_mut) {
        let copy = |key: &str| renderer.get(key).cloned().unwrap_or(Value::Null);
        overlay.insert("videoTitle".to_owned(), copy("headline"));
        overlay.insert("byline".to_owned(), copy("shortBylineText"));
        overlay.insert("background".to_owned(), copy("thumbnail"));
        overlay.insert("thumbnailOverlays".to_owned(), copy("thumbnailOverlays"));
        overlay.insert("videoId".to_owned(), copy("videoId"));
        overlay.insert("shortViewCountText".to_owned(), copy("shortViewCountText"));
    }
    if let Some(button) = resolve_mut(root, OVERLAY_PATH)
        .and_then(|o| resolve_mut(o, "nextButton.buttonRenderer"))
        .and_then(Value::as_object_mut)
    {
        button.insert(
            "navigationEndpoint".to_owned(),
            renderer.get("navigationEndpoint").cloned().unwrap_or(Value::Null),
        );
    }

    if let Some(set) = resolve_mut(
        root,
        "contents.singleColumnWatchNextResults.autoplay.autoplay.sets.autoplayVideo",
    )
    .and_then(Value::as_object_mut)
    {
        set.insert(
            "commandMetadata".to_owned(),
            resolve(&renderer, "navigationEndpoint.commandMetadata")
                .cloned()
                .unwrap_or(Value::Null),
        );
        set.insert(
            "watchEndpoint".to_owned(),
            resolve(&renderer, "navigationEndpoint.watchEndpoint")
                .cloned()
                .unwrap_or(Value::Null),
        );
    }
}

/// Player response normalizations driven by option toggles. Legacy embed
/// configs nest the response under `args.raw_player_response`.
fn player_misc_filters(f: &mut ObjectFilter<'_>, root: &mut Value) {
    let prefix = if resolve(root, "args.raw_player_response").is_some() {
        Some("args.raw_player_response")
    } else {
        None
    };
    let at = |p: &str| match prefix {
        Some(pre) => format!("{pre}.{p}"),
        None => p.to_owned(),
    };

    if f.snap.options.disable_you_there {
        if let Some(messages) = resolve_mut(root, &at("messages")).and_then(Value::as_array_mut) {
            messages.retain(|m| m.get("youThereRenderer").is_none());
        }
    }

    if f.snap.options.disable_db_normalize {
        if let Some(audio) = resolve_mut(root, &at("playerConfig.audioConfig"))
            .and_then(Value::as_object_mut)
        {
            audio.insert("loudnessDb".to_owned(), Value::Null);
            audio.insert("perceptualLoudnessDb".to_owned(), Value::Null);
            audio.insert("enablePerFormatLoudness".to_owned(), Value::Bool(false));
        }
        if let Some(formats) = resolve_mut(root, &at("streamingData.adaptiveFormats"))
            .and_then(Value::as_array_mut)
        {
            for format in formats {
                if let Some(map) = format.as_object_mut() {
                    if map.contains_key("loudnessDb") {
                        map.insert("loudnessDb".to_owned(), json!(0.0));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CriteriaSnapshot, Options, PatternEntry, RawFilterData, Settings};
    use crate::rules::{MAIN_RULES, PLAYER_RULES};
    use crate::types::PageContext;

    fn snap(data: RawFilterData, options: Options) -> CriteriaSnapshot {
        CriteriaSnapshot::compile(&Settings {
            filter_data: data,
            options,
        })
    }

    fn strings(items: &[&str]) -> Vec<PatternEntry> {
        items.iter().map(|s| PatternEntry::from(*s)).collect()
    }

    fn player_response(channel: &str) -> Value {
        json!({
            "videoDetails": {
                "videoId": "v1",
                "channelId": channel,
                "author": "Someone",
                "title": "A Video",
                "lengthSeconds": "120"
            },
            "streamingData": {"adaptiveFormats": [{"itag": 1, "loudnessDb": -3.5}]}
        })
    }

    #[test]
    fn test_disable_player_replaces_response() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UCbad"]),
                ..Default::default()
            },
            Options {
                block_message: Some("gone".to_owned()),
                ..Default::default()
            },
        );
        let page = PageContext::new("/watch", "?v=v1", false);
        let mut root = player_response("UCbad");

        let (_, current_block) = ObjectFilter::new(&snap, &page, &PLAYER_RULES, false, None)
            .run(&mut root, &[], false);

        assert!(current_block);
        let map = root.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(root["playabilityStatus"]["status"], "ERROR");
        assert_eq!(root["playabilityStatus"]["reason"], "gone");
        assert_eq!(
            root["playabilityStatus"]["errorScreen"]["playerErrorMessageRenderer"]["icon"]
                ["iconType"],
            "ERROR_OUTLINE"
        );
    }

    #[test]
    fn test_suggestions_only_keeps_player() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UCbad"]),
                ..Default::default()
            },
            Options {
                suggestions_only: true,
                ..Default::default()
            },
        );
        let page = PageContext::new("/watch", "?v=v1", false);
        let mut root = player_response("UCbad");
        let before = root.clone();

        let (_, current_block) = ObjectFilter::new(&snap, &page, &PLAYER_RULES, false, None)
            .run(&mut root, &[], false);

        assert!(!current_block);
        assert_eq!(root, before);
    }

    fn watch_next(primary_channel: &str) -> Value {
        json!({
            "contents": {"twoColumnWatchNextResults": {
                "results": {"results": {"contents": [
                    {"videoPrimaryInfoRenderer": {"title": {"simpleText": "Current Video"}}}
                ]}},
                "conversationBar": {"liveChatRenderer": {}},
                "secondaryResults": {"secondaryResults": {"results": [
                    {"compactVideoRenderer": {
                        "videoId": "next1",
                        "title": {"simpleText": "ok"},
                        "shortBylineText": {"runs": [{"text": "c",
                            "navigationEndpoint": {"browseEndpoint": {"browseId": primary_channel}}}]}
                    }}
                ]}}
            }}
        })
    }

    #[test]
    fn test_redirect_to_next_desktop() {
        let snap = snap(
            RawFilterData {
                title: strings(&["current"]),
                ..Default::default()
            },
            Options {
                autoplay: true,
                ..Default::default()
            },
        );
        let page = PageContext::new("/watch", "?v=blocked", false);
        let mut root = watch_next("UCok");

        let (outcome, _) = ObjectFilter::new(&snap, &page, &MAIN_RULES, false, None)
            .run(&mut root, &[], false);

        assert_eq!(outcome.redirect.as_deref(), Some("watch?v=next1"));
        assert!(outcome.censor_title);
        assert_eq!(
            root["contents"]["twoColumnWatchNextResults"]["results"]["results"]["contents"],
            json!([])
        );
        assert!(root["contents"]["twoColumnWatchNextResults"]
            .get("conversationBar")
            .is_none());
        assert!(root["contents"]["twoColumnWatchNextResults"]["secondaryResults"]
            .get("secondaryResults")
            .is_none());
    }

    #[test]
    fn test_redirect_to_next_playlist_keeps_suggestions() {
        let snap = snap(
            RawFilterData {
                title: strings(&["current"]),
                ..Default::default()
            },
            Options {
                autoplay: true,
                ..Default::default()
            },
        );
        let page = PageContext::new("/watch", "?v=blocked&list=PL123", false);
        let mut root = watch_next("UCok");

        let (outcome, _) = ObjectFilter::new(&snap, &page, &MAIN_RULES, false, None)
            .run(&mut root, &[], false);

        assert!(outcome.redirect.is_none());
        assert!(root["contents"]["twoColumnWatchNextResults"]["secondaryResults"]
            .get("secondaryResults")
            .is_some());
    }

    #[test]
    fn test_fix_autoplay_repoints_queue() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UCbad"]),
                ..Default::default()
            },
            Options::default(),
        );
        let page = PageContext::new("/watch", "?v=x", false);

        let mut root = json!({
            "responseContext": {"webResponseContextExtensionData": {"webPrefetchData": {
                "navigationEndpoints": [{"watchEndpoint": {"videoId": "blockedNext"}}]
            }}},
            "playerOverlays": {"playerOverlayRenderer": {"autoplay": {
                "playerOverlayAutoplayRenderer": {
                    "videoId": "blockedNext",
                    "byline": {"runs": [{"text": "c",
                        "navigationEndpoint": {"browseEndpoint": {"browseId": "UCbad"}}}]}
                }
            }}},
            "contents": {"twoColumnWatchNextResults": {
                "autoplay": {"autoplay": {"sets": [
                    {"autoplayVideo": {"videoId": "blockedNext", "watchEndpoint": {"videoId": "blockedNext"}}}
                ]}},
                "secondaryResults": {"secondaryResults": {"results": [
                    {"compactVideoRenderer": {
                        "videoId": "survivor",
                        "title": {"simpleText": "ok"},
                        "shortBylineText": {"runs": [{"text": "c",
                            "navigationEndpoint": {"browseEndpoint": {"browseId": "UCok"}}}]}
                    }}
                ]}}
            }}
        });

        ObjectFilter::new(&snap, &page, &MAIN_RULES, false, None).run(
            &mut root,
            &[ActionKind::FixAutoplay],
            false,
        );

        // The blocked overlay is gone and the queue points at the survivor.
        let video = &root["contents"]["twoColumnWatchNextResults"]["autoplay"]["autoplay"]["sets"]
            [0]["autoplayVideo"];
        assert_eq!(video["videoId"], "survivor");
        assert_eq!(video["watchEndpoint"]["videoId"], "survivor");
        assert_eq!(
            root["responseContext"]["webResponseContextExtensionData"]["webPrefetchData"]
                ["navigationEndpoints"],
            json!([])
        );
    }

    #[test]
    fn test_fix_autoplay_drops_queue_without_replacement() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UCbad"]),
                ..Default::default()
            },
            Options::default(),
        );
        let page = PageContext::new("/watch", "?v=x", false);

        // Every suggestion is blocked, so no replacement exists.
        let mut root = json!({
            "playerOverlays": {"playerOverlayRenderer": {"autoplay": {
                "playerOverlayAutoplayRenderer": {
                    "videoId": "blockedNext",
                    "byline": {"runs": [{"text": "c",
                        "navigationEndpoint": {"browseEndpoint": {"browseId": "UCbad"}}}]}
                }
            }}},
            "contents": {"twoColumnWatchNextResults": {
                "autoplay": {"autoplay": {"sets": [
                    {"autoplayVideo": {"videoId": "blockedNext", "watchEndpoint": {"videoId": "blockedNext"}}}
                ]}},
                "secondaryResults": {"secondaryResults": {"results": []}}
            }}
        });

        ObjectFilter::new(&snap, &page, &MAIN_RULES, false, None).run(
            &mut root,
            &[ActionKind::FixAutoplay],
            false,
        );

        assert!(root["contents"]["twoColumnWatchNextResults"]
            .get("autoplay")
            .is_none());
    }

    #[test]
    fn test_mobile_autoplay_repair_requires_feed_section() {
        let page = PageContext::new("/watch", "?v=x", true);

        // Sectionless shape: the renderer is reachable by scanning the raw
        // contents list, but only the redirect path may use it.
        let contents = json!([
            {"contents": [{"videoWithContextRenderer": {
                "videoId": "flat1",
                "headline": {"simpleText": "t"},
                "navigationEndpoint": {"watchEndpoint": {"videoId": "flat1"}}
            }}]}
        ]);

        let quiet = snap(RawFilterData::default(), Options::default());
        let mut root = json!({
            "playerOverlays": {"playerOverlayRenderer": {"autoplay": {
                "playerOverlayAutoplayRenderer": {"_deleted": true, "videoId": "old"}
            }}},
            "contents": {"singleColumnWatchNextResults": {"results": {"results": {
                "contents": contents.clone()
            }}}}
        });
        ObjectFilter::new(&quiet, &page, &MAIN_RULES, false, None).run(
            &mut root,
            &[ActionKind::FixAutoplay],
            false,
        );
        // No watch-next-feed section: the tagged overlay stays as is.
        assert_eq!(
            root["playerOverlays"]["playerOverlayRenderer"]["autoplay"]
                ["playerOverlayAutoplayRenderer"]["videoId"],
            "old"
        );

        let autoplay = snap(
            RawFilterData::default(),
            Options {
                autoplay: true,
                ..Default::default()
            },
        );
        let mut root = json!({
            "contents": {"singleColumnWatchNextResults": {"results": {"results": {
                "contents": contents
            }}}}
        });
        let (outcome, _) = ObjectFilter::new(&autoplay, &page, &MAIN_RULES, false, None).run(
            &mut root,
            &[ActionKind::RedirectToNextMobile],
            false,
        );
        assert_eq!(outcome.redirect.as_deref(), Some("watch?v=flat1"));
    }

    #[test]
    fn test_player_misc_filters() {
        let snap = snap(
            RawFilterData::default(),
            Options {
                disable_you_there: true,
                disable_db_normalize: true,
                ..Default::default()
            },
        );
        let page = PageContext::new("/watch", "?v=x", false);

        let mut root = json!({
            "messages": [
                {"youThereRenderer": {}},
                {"mealbarPromoRenderer": {}}
            ],
            "playerConfig": {"audioConfig": {"loudnessDb": -4.2, "enablePerFormatLoudness": true}},
            "streamingData": {"adaptiveFormats": [
                {"itag": 1, "loudnessDb": -3.5},
                {"itag": 2}
            ]}
        });

        ObjectFilter::new(&snap, &page, &PLAYER_RULES, false, None).run(
            &mut root,
            &[ActionKind::PlayerMiscFilters],
            false,
        );

        assert_eq!(root["messages"].as_array().unwrap().len(), 1);
        assert_eq!(root["playerConfig"]["audioConfig"]["loudnessDb"], Value::Null);
        assert_eq!(
            root["playerConfig"]["audioConfig"]["enablePerFormatLoudness"],
            false
        );
        assert_eq!(root["streamingData"]["adaptiveFormats"][0]["loudnessDb"], 0.0);
        assert!(root["streamingData"]["adaptiveFormats"][1]
            .get("loudnessDb")
            .is_none());
    }

    #[test]
    fn test_block_playlist_vid_placeholder() {
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UCbad"]),
                ..Default::default()
            },
            Options {
                block_message: Some("blocked".to_owned()),
                ..Default::default()
            },
        );
        let page = PageContext::new("/watch", "?v=x&list=PL1", false);

        let mut root = json!({"playlist": {"contents": [
            {"playlistPanelVideoRenderer": {
                "videoId": "v1",
                "title": {"simpleText": "bad"},
                "shortBylineText": {"runs": [{"text": "c",
                    "navigationEndpoint": {"browseEndpoint": {"browseId": "UCbad"}}}]},
                "thumbnailOverlays": []
            }}
        ]}});

        ObjectFilter::new(&snap, &page, &MAIN_RULES, false, None).run(&mut root, &[], false);

        // Entry survives as a placeholder, keeping playlist indices stable.
        let entry = &root["playlist"]["contents"][0]["playlistPanelVideoRenderer"];
        assert_eq!(entry["videoId"], "undefined");
        assert_eq!(entry["unplayableText"]["simpleText"], "blocked");
        assert!(entry.get("title").is_none());
        assert!(entry.get("shortBylineText").is_none());
    }

    #[test]
    fn test_mark_autoplay_desktop_vs_mobile() {
        let overlay = || {
            json!({"playerOverlays": {"playerOverlayRenderer": {"autoplay": {
                "playerOverlayAutoplayRenderer": {
                    "videoId": "v1",
                    "byline": {"runs": [{"text": "c",
                        "navigationEndpoint": {"browseEndpoint": {"browseId": "UCbad"}}}]}
                }
            }}}})
        };
        let snap = snap(
            RawFilterData {
                channel_id: strings(&["UCbad"]),
                ..Default::default()
            },
            Options::default(),
        );

        let desktop = PageContext::new("/watch", "?v=x", false);
        let mut root = overlay();
        ObjectFilter::new(&snap, &desktop, &MAIN_RULES, false, None).run(&mut root, &[], false);
        assert!(root["playerOverlays"]["playerOverlayRenderer"]["autoplay"]
            .get("playerOverlayAutoplayRenderer")
            .is_none());

        let mobile = PageContext::new("/watch", "?v=x", true);
        let mut root = overlay();
        ObjectFilter::new(&snap, &mobile, &MAIN_RULES, false, None).run(&mut root, &[], false);
        assert_eq!(
            root["playerOverlays"]["playerOverlayRenderer"]["autoplay"]
                ["playerOverlayAutoplayRenderer"]["_deleted"],
            true
        );
    }

    #[test]
    fn test_index_target_strips_playlist_suffix() {
        let page = PageContext::new("/watch", "?v=abc&list=PL1&index=2", false);
        assert_eq!(index_target(&page), "/watch?v=abc");
        let page = PageContext::new("/channel/UCx", "", false);
        assert_eq!(index_target(&page), "/");
    }
}
