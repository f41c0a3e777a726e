//! Rule tables: node-kind tags mapped to field paths and side effects
//!
//! A renderer node's kind is identified by which well-known key its parent
//! object carries. Each kind maps to a descriptor: the data paths for its
//! filterable fields, an optional named side effect, and an optional sibling
//! key that is purged together with it. Descriptors are plain data; side
//! effects are referenced symbolically through [`ActionKind`].
//!
//! When the host site restructures its payloads, only the path constants
//! here should need changes.

use once_cell::sync::Lazy;

use crate::types::{ActionKind, FieldPath, FilterField};

use FilterField::*;

// =============================================================================
// Renderer Data Paths
// =============================================================================

// Common
const VIDEO_ID: FieldPath = &["videoId"];
const TITLE: FieldPath = &["title"];
const CHANNEL_ID_BROWSE: FieldPath =
    &["shortBylineText.runs.navigationEndpoint.browseEndpoint.browseId"];
const CHANNEL_NAME_BYLINE: FieldPath = &["shortBylineText", "longBylineText"];
const THUMBNAIL_OVERLAYS_TIME: FieldPath =
    &["thumbnailOverlays.thumbnailOverlayTimeStatusRenderer.text"];
const THUMBNAIL_OVERLAYS_RESUME: FieldPath =
    &["thumbnailOverlays.thumbnailOverlayResumePlaybackRenderer.percentDurationWatched"];
const OWNER_BADGES: FieldPath = &["ownerBadges"];
const BADGES: FieldPath = &["badges"];
const VIEW_COUNT_TEXT: FieldPath = &["viewCountText"];
const PUBLISHED_TIME_TEXT: FieldPath = &["publishedTimeText"];

// Post
const POST_AUTHOR_ID: FieldPath = &["authorEndpoint.browseEndpoint.browseId"];
const POST_AUTHOR_NAME: FieldPath = &["authorText"];

// Watch card
const WATCH_CARD_VIDEO_ID: FieldPath = &["navigationEndpoint.watchEndpoint.videoId"];
const WATCH_CARD_CHANNEL_ID: FieldPath =
    &["subtitles.runs.navigationEndpoint.browseEndpoint.browseId"];
const WATCH_CARD_CHANNEL_NAME: FieldPath = &["subtitles"];

// Shelf
const SHELF_CHANNEL_ID: FieldPath = &["endpoint.browseEndpoint.browseId"];

// Video info renderers
const PRIMARY_INFO_TITLE: FieldPath = &["title"];
const SECONDARY_INFO_CHANNEL_ID: FieldPath =
    &["owner.videoOwnerRenderer.navigationEndpoint.browseEndpoint.browseId"];
const SECONDARY_INFO_CHANNEL_NAME: FieldPath = &["owner.videoOwnerRenderer.title"];

// Channel metadata
const CHANNEL_META_ID: FieldPath = &["externalId"];
const CHANNEL_META_NAME: FieldPath = &["title"];

// Grid/mini channel
const GRID_CHANNEL_ID: FieldPath = &["channelId"];
const GRID_CHANNEL_NAME: FieldPath = &["title"];

// Guide entries
const GUIDE_CHANNEL_ID: FieldPath = &["navigationEndpoint.browseEndpoint.browseId"];
const GUIDE_CHANNEL_NAME: FieldPath = &["title", "formattedTitle"];
const GUIDE_ENTRY_CHANNEL_ID: FieldPath =
    &["navigationEndpoint.browseEndpoint.browseId", "icon.iconType"];
const PIVOT_BAR_ITEM_ID: FieldPath = &["icon.iconType"];

// Universal watch card
const UNIVERSAL_WATCH_CARD_CHANNEL_ID: FieldPath =
    &["header.watchCardRichHeaderRenderer.titleNavigationEndpoint.browseEndpoint.browseId"];
const UNIVERSAL_WATCH_CARD_CHANNEL_NAME: FieldPath =
    &["header.watchCardRichHeaderRenderer.title"];

// Playlist page
const PLAYLIST_CHANNEL_ID: FieldPath =
    &["shortBylineText.runs.navigationEndpoint.browseEndpoint.browseId"];
const PLAYLIST_CHANNEL_NAME: FieldPath = &["shortBylineText"];
const PLAYLIST_TITLE: FieldPath = &["title"];

// Compact channel recommendation
const COMPACT_CHANNEL_REC_ID: FieldPath = &["channelEndpoint.browseEndpoint.browseId"];
const COMPACT_CHANNEL_REC_NAME: FieldPath = &["channelTitle"];

// Autoplay overlay
const AUTOPLAY_CHANNEL_ID: FieldPath =
    &["byline.runs.navigationEndpoint.browseEndpoint.browseId"];
const AUTOPLAY_CHANNEL_NAME: FieldPath = &["byline"];
const AUTOPLAY_TITLE: FieldPath = &["videoTitle"];

// Reel items (shorts)
const REEL_CHANNEL_ID: FieldPath = &["navigationEndpoint.reelWatchEndpoint.overlay.reelPlayerOverlayRenderer.reelPlayerHeaderSupportedRenderers.reelPlayerHeaderRenderer.channelNavigationEndpoint.browseEndpoint.browseId"];
const REEL_CHANNEL_NAME: FieldPath = &["navigationEndpoint.reelWatchEndpoint.overlay.reelPlayerOverlayRenderer.reelPlayerHeaderSupportedRenderers.reelPlayerHeaderRenderer.channelTitleText"];
const REEL_TITLE: FieldPath = &["headline"];
const REEL_PUBLISH_TIME: FieldPath = &["navigationEndpoint.reelWatchEndpoint.overlay.reelPlayerOverlayRenderer.reelPlayerHeaderSupportedRenderers.reelPlayerHeaderRenderer.timestampText"];

// Shorts lockup view model
const SHORTS_LOCKUP_VIDEO_ID: FieldPath = &["onTap.innertubeCommand.reelWatchEndpoint.videoId"];
const SHORTS_LOCKUP_TITLE: FieldPath = &["overlayMetadata.primaryText.content"];
const SHORTS_LOCKUP_VIEW_COUNT: FieldPath = &["overlayMetadata.secondaryText.content"];

// Channel featured video
const CHANNEL_FEATURED_LENGTH: FieldPath = &["lengthText"];

// Video with context (mobile)
const VIDEO_WITH_CONTEXT_TITLE: FieldPath = &["headline"];
const VIDEO_WITH_CONTEXT_VIEW_COUNT: FieldPath = &["shortViewCountText"];

// Compact channel
const COMPACT_CHANNEL_ID: FieldPath = &["channelId"];
const COMPACT_CHANNEL_NAME: FieldPath = &["displayName"];

// Lockup view model
const LOCKUP_VIDEO_ID: FieldPath = &["contentId"];
const LOCKUP_TITLE: FieldPath = &["metadata.lockupMetadataViewModel.title.content"];
const LOCKUP_CHANNEL_NAME: FieldPath = &["metadata.lockupMetadataViewModel.metadata.contentMetadataViewModel.metadataRows.metadataParts.text.content"];
const LOCKUP_LENGTH: FieldPath = &["contentImage.thumbnailViewModel.overlays.thumbnailOverlayBadgeViewModel.thumbnailBadges.thumbnailBadgeViewModel.text"];
const LOCKUP_VIEW_COUNT: FieldPath = &["metadata.lockupMetadataViewModel.metadata.contentMetadataViewModel.metadataRows[1].metadataParts.text.content"];
const LOCKUP_CHANNEL_ID: FieldPath = &[
    "metadata.lockupMetadataViewModel.image.decoratedAvatarViewModel.rendererContext.commandContext.onTap.innertubeCommand.browseEndpoint.browseId",
    "metadata.lockupMetadataViewModel.metadata.contentMetadataViewModel.metadataRows.metadataParts.text.commandRuns.onTap.innertubeCommand.browseEndpoint.browseId",
];
const LOCKUP_PERCENT_WATCHED: FieldPath = &["contentImage.thumbnailViewModel.overlays.thumbnailBottomOverlayViewModel.progressBar.thumbnailOverlayProgressBarViewModel.startPercent"];
pub(crate) const LOCKUP_MIX_BADGE: &str = "contentImage.collectionThumbnailViewModel.primaryThumbnail.thumbnailViewModel.overlays.thumbnailOverlayBadgeViewModel.thumbnailBadges.thumbnailBadgeViewModel.icon.sources.clientResource.imageName";

// Mobile chips and slim video
const CHIP_ICON: FieldPath = &["icon.iconType"];
const SLIM_VIDEO_ID: FieldPath = &["videoId"];
const SLIM_TITLE: FieldPath = &["contents.slimVideoInformationRenderer.title"];
const SLIM_CHANNEL_ID: FieldPath =
    &["contents.slimOwnerRenderer.navigationEndpoint.browseEndpoint.browseId"];
const SLIM_CHANNEL_NAME: FieldPath = &["contents.slimOwnerRenderer.title"];

// Tab renderer
const TAB_URL: FieldPath = &["endpoint.commandMetadata.webCommandMetadata.url"];

// Player args (legacy embed config)
const PLAYER_ARGS_VIDEO_ID: FieldPath = &["video_id", "raw_player_response.videoDetails.videoId"];
const PLAYER_ARGS_CHANNEL_ID: FieldPath = &["ucid", "raw_player_response.videoDetails.channelId"];
const PLAYER_ARGS_CHANNEL_NAME: FieldPath =
    &["author", "raw_player_response.videoDetails.author"];
const PLAYER_ARGS_TITLE: FieldPath = &["title", "raw_player_response.videoDetails.title"];
const PLAYER_ARGS_LENGTH: FieldPath =
    &["length_seconds", "raw_player_response.videoDetails.lengthSeconds"];

// Player video details
const PLAYER_DETAILS_VIDEO_ID: FieldPath = &["videoId"];
const PLAYER_DETAILS_CHANNEL_ID: FieldPath = &["channelId"];
const PLAYER_DETAILS_CHANNEL_NAME: FieldPath = &["author"];
const PLAYER_DETAILS_TITLE: FieldPath = &["title"];
const PLAYER_DETAILS_LENGTH: FieldPath = &["lengthSeconds"];

// Player vars (embed)
const PLAYER_VARS_VIDEO_ID: FieldPath = &["video_id"];
const PLAYER_VARS_CHANNEL_ID: FieldPath = &["raw_player_response.embedPreview.thumbnailPreviewRenderer.videoDetails.embeddedPlayerOverlayVideoDetailsRenderer.expandedRenderer.embeddedPlayerOverlayVideoDetailsExpandedRenderer.subscribeButton.subscribeButtonRenderer.channelId"];
const PLAYER_VARS_CHANNEL_NAME: FieldPath = &["raw_player_response.embedPreview.thumbnailPreviewRenderer.videoDetails.embeddedPlayerOverlayVideoDetailsRenderer.expandedRenderer.embeddedPlayerOverlayVideoDetailsExpandedRenderer.title"];
const PLAYER_VARS_TITLE: FieldPath =
    &["raw_player_response.embedPreview.thumbnailPreviewRenderer.title"];
const PLAYER_VARS_LENGTH: FieldPath =
    &["raw_player_response.embedPreview.thumbnailPreviewRenderer.videoDurationSeconds"];

// Comments
const COMMENT_ENTITY_CHANNEL_ID: FieldPath = &["author.channelId"];
const COMMENT_ENTITY_CHANNEL_NAME: FieldPath = &["author.displayName"];
const COMMENT_ENTITY_CONTENT: FieldPath = &["properties.content.content"];
pub(crate) const COMMENT_ENTITY_ID: &str = "properties.commentId";
pub(crate) const COMMENT_THREAD_COMMENT_ID: &str = "commentViewModel.commentViewModel.commentId";
pub(crate) const COMMENT_VIEW_MODEL_ID: &str = "commentId";
const COMMENT_RENDERER_CHANNEL_ID: FieldPath = &["authorEndpoint.browseEndpoint.browseId"];
const COMMENT_RENDERER_CHANNEL_NAME: FieldPath = &["authorText"];
const COMMENT_RENDERER_CONTENT: FieldPath = &["contentText"];
const LIVE_CHAT_CHANNEL_ID: FieldPath = &["authorExternalChannelId"];
const LIVE_CHAT_CHANNEL_NAME: FieldPath = &["authorName"];
const LIVE_CHAT_MESSAGE: FieldPath = &["message"];

// =============================================================================
// Rule Descriptors
// =============================================================================

/// Rule-table entry: field paths for one node kind, plus an optional side
/// effect and an optional sibling key to purge alongside.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    pub properties: &'static [(FilterField, FieldPath)],
    pub custom_func: Option<ActionKind>,
    pub related: Option<&'static str>,
}

const fn flat(properties: &'static [(FilterField, FieldPath)]) -> RuleDescriptor {
    RuleDescriptor {
        properties,
        custom_func: None,
        related: None,
    }
}

impl RuleDescriptor {
    /// Path for one field of this node kind, if configured.
    pub fn path_for(&self, field: FilterField) -> Option<FieldPath> {
        self.properties
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, path)| *path)
    }
}

/// The common video-entry field set shared by most feed renderer kinds.
const BASE_PROPS: &[(FilterField, FieldPath)] = &[
    (VideoId, VIDEO_ID),
    (ChannelId, CHANNEL_ID_BROWSE),
    (ChannelBadges, OWNER_BADGES),
    (ChannelName, CHANNEL_NAME_BYLINE),
    (Title, TITLE),
    (VidLength, THUMBNAIL_OVERLAYS_TIME),
    (ViewCount, VIEW_COUNT_TEXT),
    (Badges, BADGES),
    (PublishTimeText, PUBLISHED_TIME_TEXT),
    (PercentWatched, THUMBNAIL_OVERLAYS_RESUME),
];

/// Base props minus title, for channel entries whose title is the channel
/// name rather than a video title.
const CHANNEL_ENTRY_PROPS: &[(FilterField, FieldPath)] = &[
    (VideoId, VIDEO_ID),
    (ChannelId, CHANNEL_ID_BROWSE),
    (ChannelBadges, OWNER_BADGES),
    (ChannelName, CHANNEL_NAME_BYLINE),
    (VidLength, THUMBNAIL_OVERLAYS_TIME),
    (ViewCount, VIEW_COUNT_TEXT),
    (Badges, BADGES),
    (PublishTimeText, PUBLISHED_TIME_TEXT),
    (PercentWatched, THUMBNAIL_OVERLAYS_RESUME),
];

const MOVIE_PROPS: &[(FilterField, FieldPath)] = &[
    (VideoId, VIDEO_ID),
    (Title, TITLE),
    (VidLength, THUMBNAIL_OVERLAYS_TIME),
    (Badges, BADGES),
    (PercentWatched, THUMBNAIL_OVERLAYS_RESUME),
];

const BASE: RuleDescriptor = flat(BASE_PROPS);

// =============================================================================
// Rule Tables
// =============================================================================

/// Ordered rule table. Entry order is load-bearing: when several kinds match
/// the same node, side effects run in table order, so tables iterate in
/// insertion order rather than hashing.
pub struct RuleTable {
    entries: Vec<(&'static str, RuleDescriptor)>,
}

impl RuleTable {
    fn new(entries: Vec<(&'static str, RuleDescriptor)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RuleDescriptor)> {
        self.entries.iter().map(|(tag, desc)| (*tag, desc))
    }

    pub fn get(&self, tag: &str) -> Option<&RuleDescriptor> {
        self.entries
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, desc)| desc)
    }

    /// Union of two tables, `self` entries first.
    fn merged(&self, other: &RuleTable) -> RuleTable {
        let mut entries = self.entries.clone();
        for (tag, desc) in &other.entries {
            if !entries.iter().any(|(name, _)| name == tag) {
                entries.push((tag, *desc));
            }
        }
        RuleTable::new(entries)
    }
}

/// Main feed / search / watch-page listings.
pub static MAIN_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(vec![
        ("compactMovieRenderer", flat(MOVIE_PROPS)),
        ("movieRenderer", flat(MOVIE_PROPS)),
        ("gridVideoRenderer", BASE),
        ("videoRenderer", BASE),
        ("radioRenderer", BASE),
        ("playlistRenderer", BASE),
        ("gridRadioRenderer", BASE),
        ("compactVideoRenderer", BASE),
        ("compactRadioRenderer", BASE),
        ("playlistVideoRenderer", BASE),
        ("endScreenVideoRenderer", BASE),
        ("endScreenPlaylistRenderer", BASE),
        ("gridPlaylistRenderer", BASE),
        (
            "postRenderer",
            flat(&[(ChannelId, POST_AUTHOR_ID), (ChannelName, POST_AUTHOR_NAME)]),
        ),
        (
            "backstagePostRenderer",
            flat(&[(ChannelId, POST_AUTHOR_ID), (ChannelName, POST_AUTHOR_NAME)]),
        ),
        (
            "watchCardCompactVideoRenderer",
            flat(&[
                (Title, PRIMARY_INFO_TITLE),
                (ChannelId, WATCH_CARD_CHANNEL_ID),
                (ChannelName, WATCH_CARD_CHANNEL_NAME),
                (VideoId, WATCH_CARD_VIDEO_ID),
            ]),
        ),
        ("shelfRenderer", flat(&[(ChannelId, SHELF_CHANNEL_ID)])),
        (
            "channelVideoPlayerRenderer",
            flat(&[(Title, PRIMARY_INFO_TITLE)]),
        ),
        (
            "channelRenderer",
            RuleDescriptor {
                properties: CHANNEL_ENTRY_PROPS,
                custom_func: None,
                related: Some("shelfRenderer"),
            },
        ),
        (
            "playlistPanelVideoRenderer",
            RuleDescriptor {
                properties: BASE_PROPS,
                custom_func: Some(ActionKind::BlockPlaylistVid),
                related: None,
            },
        ),
        (
            "videoPrimaryInfoRenderer",
            RuleDescriptor {
                properties: &[(Title, PRIMARY_INFO_TITLE)],
                custom_func: Some(ActionKind::RedirectToNext),
                related: None,
            },
        ),
        (
            "videoSecondaryInfoRenderer",
            RuleDescriptor {
                properties: &[
                    (ChannelId, SECONDARY_INFO_CHANNEL_ID),
                    (ChannelName, SECONDARY_INFO_CHANNEL_NAME),
                ],
                custom_func: Some(ActionKind::RedirectToNext),
                related: None,
            },
        ),
        (
            "channelMetadataRenderer",
            RuleDescriptor {
                properties: &[
                    (ChannelId, CHANNEL_META_ID),
                    (ChannelName, CHANNEL_META_NAME),
                ],
                custom_func: Some(ActionKind::RedirectToIndex),
                related: None,
            },
        ),
        (
            "gridChannelRenderer",
            flat(&[(ChannelId, GRID_CHANNEL_ID), (ChannelName, GRID_CHANNEL_NAME)]),
        ),
        (
            "miniChannelRenderer",
            flat(&[(ChannelId, GRID_CHANNEL_ID), (ChannelName, GRID_CHANNEL_NAME)]),
        ),
        (
            "guideEntryRenderer",
            flat(&[(ChannelId, GUIDE_CHANNEL_ID), (ChannelName, GUIDE_CHANNEL_NAME)]),
        ),
        (
            "universalWatchCardRenderer",
            flat(&[
                (ChannelId, UNIVERSAL_WATCH_CARD_CHANNEL_ID),
                (ChannelName, UNIVERSAL_WATCH_CARD_CHANNEL_NAME),
            ]),
        ),
        (
            "playlist",
            RuleDescriptor {
                properties: &[
                    (ChannelId, PLAYLIST_CHANNEL_ID),
                    (ChannelName, PLAYLIST_CHANNEL_NAME),
                    (Title, PLAYLIST_TITLE),
                ],
                custom_func: Some(ActionKind::RedirectToIndex),
                related: None,
            },
        ),
        (
            "compactChannelRecommendationCardRenderer",
            flat(&[
                (ChannelId, COMPACT_CHANNEL_REC_ID),
                (ChannelName, COMPACT_CHANNEL_REC_NAME),
            ]),
        ),
        (
            "playerOverlayAutoplayRenderer",
            RuleDescriptor {
                properties: &[
                    (VideoId, VIDEO_ID),
                    (ChannelId, AUTOPLAY_CHANNEL_ID),
                    (ChannelName, AUTOPLAY_CHANNEL_NAME),
                    (Title, AUTOPLAY_TITLE),
                    (PublishTimeText, PUBLISHED_TIME_TEXT),
                    (VidLength, THUMBNAIL_OVERLAYS_TIME),
                ],
                custom_func: Some(ActionKind::MarkAutoplay),
                related: None,
            },
        ),
        (
            "reelItemRenderer",
            flat(&[
                (VideoId, VIDEO_ID),
                (ChannelId, REEL_CHANNEL_ID),
                (ChannelName, REEL_CHANNEL_NAME),
                (Title, REEL_TITLE),
                (PublishTimeText, REEL_PUBLISH_TIME),
            ]),
        ),
        (
            "shortsLockupViewModel",
            flat(&[
                (VideoId, SHORTS_LOCKUP_VIDEO_ID),
                (Title, SHORTS_LOCKUP_TITLE),
                (ViewCount, SHORTS_LOCKUP_VIEW_COUNT),
            ]),
        ),
        ("richShelfRenderer", flat(&[(ChannelId, SHELF_CHANNEL_ID)])),
        (
            "channelFeaturedVideoRenderer",
            flat(&[
                (VideoId, VIDEO_ID),
                (ChannelId, CHANNEL_ID_BROWSE),
                (ChannelBadges, OWNER_BADGES),
                (ChannelName, CHANNEL_NAME_BYLINE),
                (Title, TITLE),
                (VidLength, CHANNEL_FEATURED_LENGTH),
                (ViewCount, VIEW_COUNT_TEXT),
                (Badges, BADGES),
                (PublishTimeText, PUBLISHED_TIME_TEXT),
                (PercentWatched, THUMBNAIL_OVERLAYS_RESUME),
            ]),
        ),
        (
            "videoWithContextRenderer",
            flat(&[
                (VideoId, VIDEO_ID),
                (ChannelId, CHANNEL_ID_BROWSE),
                (ChannelBadges, OWNER_BADGES),
                (ChannelName, CHANNEL_NAME_BYLINE),
                (Title, VIDEO_WITH_CONTEXT_TITLE),
                (VidLength, THUMBNAIL_OVERLAYS_TIME),
                (ViewCount, VIDEO_WITH_CONTEXT_VIEW_COUNT),
                (Badges, BADGES),
                (PublishTimeText, PUBLISHED_TIME_TEXT),
                (PercentWatched, THUMBNAIL_OVERLAYS_RESUME),
            ]),
        ),
        (
            "compactChannelRenderer",
            flat(&[
                (ChannelId, COMPACT_CHANNEL_ID),
                (ChannelName, COMPACT_CHANNEL_NAME),
                (ChannelBadges, OWNER_BADGES),
            ]),
        ),
        (
            "lockupViewModel",
            flat(&[
                (VideoId, LOCKUP_VIDEO_ID),
                (Title, LOCKUP_TITLE),
                (ChannelName, LOCKUP_CHANNEL_NAME),
                (VidLength, LOCKUP_LENGTH),
                (ViewCount, LOCKUP_VIEW_COUNT),
                (ChannelId, LOCKUP_CHANNEL_ID),
                (PercentWatched, LOCKUP_PERCENT_WATCHED),
            ]),
        ),
        ("chipCloudChipRenderer", flat(&[(ChannelId, CHIP_ICON)])),
        (
            "slimVideoMetadataSectionRenderer",
            RuleDescriptor {
                properties: &[
                    (VideoId, SLIM_VIDEO_ID),
                    (Title, SLIM_TITLE),
                    (ChannelId, SLIM_CHANNEL_ID),
                    (ChannelName, SLIM_CHANNEL_NAME),
                ],
                custom_func: Some(ActionKind::RedirectToNextMobile),
                related: None,
            },
        ),
        ("tabRenderer", flat(&[(ChannelId, TAB_URL)])),
        ("gridShelfViewModel", flat(&[])),
        ("richSectionRenderer", flat(&[])),
    ])
});

/// Player configs and player responses.
pub static PLAYER_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(vec![
        (
            "args",
            RuleDescriptor {
                properties: &[
                    (VideoId, PLAYER_ARGS_VIDEO_ID),
                    (ChannelId, PLAYER_ARGS_CHANNEL_ID),
                    (ChannelName, PLAYER_ARGS_CHANNEL_NAME),
                    (Title, PLAYER_ARGS_TITLE),
                    (VidLength, PLAYER_ARGS_LENGTH),
                ],
                custom_func: Some(ActionKind::DisableEmbedPlayer),
                related: None,
            },
        ),
        (
            "videoDetails",
            RuleDescriptor {
                properties: &[
                    (VideoId, PLAYER_DETAILS_VIDEO_ID),
                    (ChannelId, PLAYER_DETAILS_CHANNEL_ID),
                    (ChannelName, PLAYER_DETAILS_CHANNEL_NAME),
                    (Title, PLAYER_DETAILS_TITLE),
                    (VidLength, PLAYER_DETAILS_LENGTH),
                ],
                custom_func: Some(ActionKind::DisablePlayer),
                related: None,
            },
        ),
        (
            "PLAYER_VARS",
            RuleDescriptor {
                properties: &[
                    (VideoId, PLAYER_VARS_VIDEO_ID),
                    (ChannelId, PLAYER_VARS_CHANNEL_ID),
                    (ChannelName, PLAYER_VARS_CHANNEL_NAME),
                    (Title, PLAYER_VARS_TITLE),
                    (VidLength, PLAYER_VARS_LENGTH),
                ],
                custom_func: Some(ActionKind::DisableEmbedPlayer),
                related: None,
            },
        ),
    ])
});

/// Guide / sidebar entries.
pub static GUIDE_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(vec![
        (
            "guideEntryRenderer",
            flat(&[
                (ChannelId, GUIDE_ENTRY_CHANNEL_ID),
                (ChannelName, GUIDE_CHANNEL_NAME),
            ]),
        ),
        ("pivotBarItemRenderer", flat(&[(ChannelId, PIVOT_BAR_ITEM_ID)])),
    ])
});

/// Comment threads, comment entities and live chat.
pub static COMMENT_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(vec![
        (
            "commentEntityPayload",
            flat(&[
                (ChannelId, COMMENT_ENTITY_CHANNEL_ID),
                (ChannelName, COMMENT_ENTITY_CHANNEL_NAME),
                (Comment, COMMENT_ENTITY_CONTENT),
            ]),
        ),
        ("commentThreadRenderer", flat(&[])),
        ("commentViewModel", flat(&[])),
        (
            "commentRenderer",
            flat(&[
                (ChannelId, COMMENT_RENDERER_CHANNEL_ID),
                (ChannelName, COMMENT_RENDERER_CHANNEL_NAME),
                (Comment, COMMENT_RENDERER_CONTENT),
            ]),
        ),
        (
            "liveChatTextMessageRenderer",
            flat(&[
                (ChannelId, LIVE_CHAT_CHANNEL_ID),
                (ChannelName, LIVE_CHAT_CHANNEL_NAME),
                (Comment, LIVE_CHAT_MESSAGE),
            ]),
        ),
    ])
});

/// Main + comments, for payloads that mix feed items with comment threads
/// (the page's initial data blob and `/next` responses).
pub static MERGED_RULES: Lazy<RuleTable> = Lazy::new(|| MAIN_RULES.merged(&COMMENT_RULES));

// =============================================================================
// Structural Key Lists
// =============================================================================

/// Wrapper keys that may be deleted outright once their content is gone.
pub const DELETE_ALLOWED: &[&str] = &[
    "richItemRenderer",
    "content",
    "horizontalListRenderer",
    "verticalListRenderer",
    "shelfRenderer",
    "richShelfRenderer",
    "gridRenderer",
    "expandedShelfContentsRenderer",
    "comment",
    "commentThreadRenderer",
    "reelShelfRenderer",
    "richSectionRenderer",
];

/// Node kinds that receive context-menu block actions.
pub const CONTEXT_MENU_KINDS: &[&str] = &[
    "backstagePostRenderer",
    "postRenderer",
    "movieRenderer",
    "compactMovieRenderer",
    "videoRenderer",
    "gridVideoRenderer",
    "compactVideoRenderer",
    "videoPrimaryInfoRenderer",
    "commentRenderer",
    "playlistPanelVideoRenderer",
    "playlistVideoRenderer",
    "lockupViewModel",
    // Mobile
    "reelItemRenderer",
    "slimVideoMetadataSectionRenderer",
    "videoWithContextRenderer",
];
