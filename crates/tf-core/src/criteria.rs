//! Settings blob parsing and criteria compilation
//!
//! The embedder hands the engine a JSON settings blob: raw pattern-entry
//! lists per field, a duration window, option toggles and an optional JS
//! predicate source. Compilation turns that into a [`CriteriaSnapshot`] of
//! anchored regexes. Snapshots are immutable; a settings update builds a new
//! one and swaps it in wholesale.
//!
//! Entry forms, in precedence order:
//! - exact-id fields (`videoId`, `channelId`): the line is anchored verbatim
//!   as `^line$`
//! - `/pattern/flags`: a raw regex
//! - anything else: a case-insensitive keyword match bounded by separator
//!   characters or the string edges
//!
//! An entry may also arrive as an already-derived `[pattern, flags]` pair,
//! which compiles directly without line processing.
//!
//! A pattern that fails to compile is logged and dropped, never fatal.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::jsfilter::JsPredicate;
use crate::types::FilterField;

/// Separator class for keyword matches: whitespace and ASCII punctuation,
/// one or more.
const UNICODE_BOUNDARY: &str = r#"[ \n\r\t!@#$%^&*()_\-=+\[\]\\|;:'",\./<>?`~:]+"#;

static RAW_REGEX_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(.*)/(.*)$").unwrap_or_else(|e| panic!("raw-regex line matcher: {e}"))
});

// =============================================================================
// Raw Settings
// =============================================================================

/// Errors from parsing a settings blob.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The persisted settings blob, as the embedder stores it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(rename = "filterData", default)]
    pub filter_data: RawFilterData,
    #[serde(default)]
    pub options: Options,
}

impl Settings {
    pub fn from_json(blob: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(blob)?)
    }
}

/// One uncompiled pattern entry. Settings blobs carry either raw editor
/// lines (keyword, `/regex/flags`, or an id, depending on field) or
/// already-derived `[pattern, flags]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternEntry {
    Line(String),
    Pair(String, String),
}

impl From<&str> for PatternEntry {
    fn from(line: &str) -> Self {
        Self::Line(line.to_owned())
    }
}

/// Uncompiled pattern-entry lists, one per filterable field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilterData {
    #[serde(rename = "videoId", default)]
    pub video_id: Vec<PatternEntry>,
    #[serde(rename = "channelId", default)]
    pub channel_id: Vec<PatternEntry>,
    #[serde(rename = "channelName", default)]
    pub channel_name: Vec<PatternEntry>,
    #[serde(default)]
    pub title: Vec<PatternEntry>,
    #[serde(default)]
    pub comment: Vec<PatternEntry>,
    /// `[min, max]` duration window in seconds; `null` ends are open.
    #[serde(rename = "vidLength", default)]
    pub vid_length: [Option<i64>; 2],
    /// Source of the user predicate function, if any.
    #[serde(default)]
    pub javascript: Option<String>,
}

/// How the duration window is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VidLengthType {
    /// Block videos whose length falls inside the window.
    #[default]
    Block,
    /// Allow only videos inside the window; block everything outside it.
    Allow,
}

/// Option toggles. Field names match the persisted blob.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub mixes: bool,
    #[serde(default)]
    pub shorts: bool,
    #[serde(default)]
    pub movies: bool,
    /// Keep autoplay running past blocked entries.
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub suggestions_only: bool,
    #[serde(default)]
    pub enable_javascript: bool,
    #[serde(default)]
    pub disable_on_history: bool,
    #[serde(default)]
    pub disable_you_there: bool,
    #[serde(default)]
    pub disable_db_normalize: bool,
    #[serde(default)]
    pub block_message: Option<String>,
    /// Hide entries watched at least this far, in percent.
    #[serde(default)]
    pub percent_watched_hide: Option<u32>,
    #[serde(rename = "vidLength_type", default)]
    pub vid_length_type: VidLengthType,
}

impl Options {
    pub fn block_message(&self) -> &str {
        self.block_message.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Pattern Compilation
// =============================================================================

/// Translate JS regex flags to an inline-flag prefix. `g`, `u` and `y` have
/// no matching concept here and are dropped; unknown letters are ignored.
fn translate_flags(flags: &str) -> String {
    let kept: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
    if kept.is_empty() {
        String::new()
    } else {
        format!("(?{kept})")
    }
}

fn compile_pattern(pattern: &str, flags: &str) -> Option<Regex> {
    let source = format!("{}{}", translate_flags(flags), pattern);
    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("dropping uncompilable pattern /{pattern}/{flags}: {e}");
            None
        }
    }
}

/// Compile one field's entry list. Raw lines go through the entry-form
/// precedence above; `[pattern, flags]` pairs compile as-is. Empty lines and
/// `//` comment lines are skipped, duplicates collapse to the first
/// occurrence.
fn compile_entries(entries: &[PatternEntry], field: FilterField) -> Vec<Regex> {
    let mut seen = HashSet::new();
    let mut compiled = Vec::new();

    for entry in entries {
        let regex = match entry {
            PatternEntry::Pair(pattern, flags) => {
                if !seen.insert(format!("/{pattern}/{flags}")) {
                    continue;
                }
                compile_pattern(pattern, flags)
            }
            PatternEntry::Line(line) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with("//") || !seen.insert(line.to_owned()) {
                    continue;
                }

                let is_id_field =
                    matches!(field, FilterField::VideoId | FilterField::ChannelId);
                if is_id_field {
                    compile_pattern(&format!("^{line}$"), "")
                } else if let Some(caps) = RAW_REGEX_LINE.captures(line) {
                    compile_pattern(&caps[1], &caps[2])
                } else {
                    compile_pattern(
                        &format!(
                            "(^|{UNICODE_BOUNDARY})({})({UNICODE_BOUNDARY}|$)",
                            regex::escape(line)
                        ),
                        "i",
                    )
                }
            }
        };

        compiled.extend(regex);
    }

    compiled
}

fn builtin(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::error!("builtin pattern {pattern} failed to compile: {e}");
            None
        }
    }
}

// =============================================================================
// Criteria Snapshot
// =============================================================================

/// Compiled, immutable filtering criteria.
#[derive(Debug)]
pub struct CriteriaSnapshot {
    video_id: Vec<Regex>,
    channel_id: Vec<Regex>,
    channel_name: Vec<Regex>,
    title: Vec<Regex>,
    comment: Vec<Regex>,
    pub vid_length: [Option<i64>; 2],
    pub options: Options,
    js: Option<JsPredicate>,
}

impl CriteriaSnapshot {
    /// Compile a settings blob into a snapshot.
    ///
    /// Option toggles expand into built-in patterns: trending and shorts
    /// surfaces block via pseudo channel ids, mixes via the synthetic
    /// channel name carried by mix entries. A broken user predicate is
    /// logged and disabled rather than failing the whole snapshot.
    pub fn compile(settings: &Settings) -> Self {
        let data = &settings.filter_data;
        let options = settings.options.clone();

        let mut channel_id = compile_entries(&data.channel_id, FilterField::ChannelId);
        let mut channel_name = compile_entries(&data.channel_name, FilterField::ChannelName);

        if options.trending {
            channel_id.extend(builtin("^FEtrending$"));
            channel_id.extend(builtin("^FEexplore$"));
            channel_id.extend(builtin("^EXPLORE_DESTINATION$"));
        }
        if options.shorts {
            channel_id.extend(builtin("^TAB_SHORTS$"));
            channel_id.extend(builtin("^TAB_SHORTS_CAIRO$"));
            channel_id.extend(builtin("^.+/shorts$"));
        }
        if options.mixes {
            channel_name.extend(builtin("^YouTube$"));
        }

        let js = if options.enable_javascript {
            data.javascript
                .as_deref()
                .filter(|src| !src.is_empty())
                .and_then(|src| match JsPredicate::compile(src) {
                    Ok(pred) => Some(pred),
                    Err(e) => {
                        log::error!("user predicate disabled: {e}");
                        None
                    }
                })
        } else {
            None
        };

        Self {
            video_id: compile_entries(&data.video_id, FilterField::VideoId),
            channel_id,
            channel_name,
            title: compile_entries(&data.title, FilterField::Title),
            comment: compile_entries(&data.comment, FilterField::Comment),
            vid_length: data.vid_length,
            options,
            js,
        }
    }

    /// The compiled patterns for a regex-class field.
    pub fn patterns_for(&self, field: FilterField) -> &[Regex] {
        match field {
            FilterField::VideoId => &self.video_id,
            FilterField::ChannelId => &self.channel_id,
            FilterField::ChannelName => &self.channel_name,
            FilterField::Title => &self.title,
            FilterField::Comment => &self.comment,
            _ => &[],
        }
    }

    pub fn js_enabled(&self) -> bool {
        self.js.is_some()
    }

    pub fn predicate(&self) -> Option<&JsPredicate> {
        self.js.as_ref()
    }

    /// True when no criterion can ever match. Traversal is skipped entirely
    /// for empty snapshots so payloads pass through untouched.
    pub fn is_empty(&self) -> bool {
        if self.options.shorts || self.options.movies || self.options.mixes {
            return false;
        }
        if self.options.percent_watched_hide.is_some() {
            return false;
        }
        if self.vid_length.iter().any(Option::is_some) {
            return false;
        }
        if [
            &self.video_id,
            &self.channel_id,
            &self.channel_name,
            &self.title,
            &self.comment,
        ]
        .iter()
        .any(|list| !list.is_empty())
        {
            return false;
        }
        !self.js_enabled()
    }
}
