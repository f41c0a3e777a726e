//! Core type definitions for TubeFilter
//!
//! These types are shared between the criteria compiler, the predicate
//! evaluator and the traversal engine.

// =============================================================================
// Filter Fields
// =============================================================================

/// A filterable field of a renderer node.
///
/// Each rule-table entry maps a subset of these to data paths inside the
/// node. The regex-class fields carry user pattern lists; the rest only feed
/// the user predicate's friendly object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    VideoId,
    ChannelId,
    ChannelName,
    Title,
    Comment,
    VidLength,
    ViewCount,
    Badges,
    ChannelBadges,
    PublishTimeText,
    PercentWatched,
}

impl FilterField {
    /// The key used for this field in the friendly object handed to the
    /// user predicate, matching the settings-blob naming.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VideoId => "videoId",
            Self::ChannelId => "channelId",
            Self::ChannelName => "channelName",
            Self::Title => "title",
            Self::Comment => "comment",
            Self::VidLength => "vidLength",
            Self::ViewCount => "viewCount",
            Self::Badges => "badges",
            Self::ChannelBadges => "channelBadges",
            Self::PublishTimeText => "publishTimeText",
            Self::PercentWatched => "percentWatched",
        }
    }

    /// Fields matched against compiled regex lists.
    pub fn is_regex_field(self) -> bool {
        matches!(
            self,
            Self::VideoId | Self::ChannelId | Self::ChannelName | Self::Title | Self::Comment
        )
    }
}

/// An ordered list of candidate paths; the first one that resolves wins.
pub type FieldPath = &'static [&'static str];

// =============================================================================
// Deletion Signal
// =============================================================================

/// Result of filtering a child node, propagated to its parent.
///
/// Replaces the original `false`/`true`/sibling-key-string return with an
/// explicit tagged type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteSignal {
    /// Nothing below this node was removed.
    Keep,
    /// This node should be removed from its parent.
    Node,
    /// This node should be removed, and if the following array element
    /// carries the named key it goes too (header + content sibling pairs).
    AlsoSibling(&'static str),
}

impl DeleteSignal {
    pub fn is_delete(self) -> bool {
        !matches!(self, Self::Keep)
    }
}

// =============================================================================
// Side-Effect Actions
// =============================================================================

/// Named side effects referenced from rule descriptors and post-action lists.
///
/// Descriptors carry these symbolically instead of function values so rule
/// tables stay plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Strip a player response and replace it with a playability error.
    DisablePlayer,
    /// Kill an embed player config and censor the page title.
    DisableEmbedPlayer,
    /// Rewrite a playlist panel entry into a stable-shaped placeholder.
    BlockPlaylistVid,
    /// Mark an autoplay overlay for deferred deletion (mobile layout).
    MarkAutoplay,
    /// Navigate back to the site root when a page-level node is blocked.
    RedirectToIndex,
    /// Navigate to the next suggested video when the current one is blocked.
    RedirectToNext,
    /// Mobile variant of [`ActionKind::RedirectToNext`].
    RedirectToNextMobile,
    /// Repair the autoplay queue after its target entry was removed.
    FixAutoplay,
    /// Misc player normalizations (you-there prompt, loudness defeat).
    PlayerMiscFilters,
}

// =============================================================================
// Match Result
// =============================================================================

/// One matched rule-table entry at a node. A single parent object may yield
/// several of these when it carries more than one recognized kind key.
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule {
    /// The node-kind tag that matched (the key on the parent object).
    pub name: &'static str,
    /// Side effect to run before deletion, if any.
    pub custom_func: Option<ActionKind>,
    /// Sibling key to purge along with this node.
    pub related: Option<&'static str>,
}

// =============================================================================
// Page Context
// =============================================================================

/// Where the host page currently is. The engine never reads the DOM; the
/// embedder hands this in once per page load.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Location pathname, e.g. `/watch` or `/feed/history`.
    pub pathname: String,
    /// Location search string including the leading `?`, possibly empty.
    pub search: String,
    /// Mobile interface (`m.` host) layout.
    pub is_mobile: bool,
}

impl PageContext {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>, is_mobile: bool) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
            is_mobile,
        }
    }
}

// =============================================================================
// Filter Outcome
// =============================================================================

/// Navigation and UI effects requested by side-effect functions during a
/// filtering pass. The engine cannot touch `document.location` itself, so
/// the embedder performs these after the call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Target the host page should navigate to, if any.
    pub redirect: Option<String>,
    /// The page title should be reset to the site default.
    pub censor_title: bool,
}

impl FilterOutcome {
    pub(crate) fn merge(&mut self, other: FilterOutcome) {
        if self.redirect.is_none() {
            self.redirect = other.redirect;
        }
        self.censor_title |= other.censor_title;
    }
}
