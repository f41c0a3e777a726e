//! TubeFilter Core Library
//!
//! This crate implements the filtering engine for TubeFilter, a content
//! filter for the renderer-data payloads a video site ships to its own
//! frontend. The embedder intercepts payloads (API responses, global data
//! slots, legacy SPF responses), hands them to the engine keyed by their
//! source, and applies the returned navigation/UI effects; the engine
//! mutates each payload in place so blocked entries never render.
//!
//! # Architecture
//!
//! Filtering criteria arrive as a settings blob and are compiled into an
//! immutable snapshot of anchored regexes plus an optional user-supplied
//! JS predicate. Payloads are walked bottom-up against per-context rule
//! tables that map renderer node kinds to field paths; blocked nodes are
//! removed with structure-preserving cascades, and a small catalog of side
//! effects handles the nodes that must be rewritten rather than removed.
//!
//! # Modules
//!
//! - `paths`: dotted-path resolution over payload trees
//! - `text`: duration and view-count string parsing
//! - `types`: shared type definitions
//! - `rules`: node-kind rule tables and field paths
//! - `criteria`: settings parsing and pattern compilation
//! - `jsfilter`: user JS predicate
//! - `evaluator`: per-node match evaluation
//! - `filter`: recursive traversal and deletion
//! - `actions`: side-effect catalog
//! - `dispatch`: routing-key lookup
//! - `engine`: top-level facade

mod actions;

pub mod criteria;
pub mod dispatch;
pub mod engine;
pub mod evaluator;
pub mod filter;
pub mod jsfilter;
pub mod paths;
pub mod rules;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use criteria::{
    CriteriaSnapshot, Options, PatternEntry, RawFilterData, Settings, SettingsError,
};
pub use engine::Engine;
pub use filter::{ContextMenuHook, ObjectFilter};
pub use rules::RuleDescriptor;
pub use types::{ActionKind, DeleteSignal, FilterField, FilterOutcome, PageContext};
