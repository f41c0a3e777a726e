//! Recursive payload traversal and deletion
//!
//! [`ObjectFilter`] walks a payload tree bottom-up, matches every parent
//! object against its rule table and removes blocked nodes in place.
//! Children are visited in descending index/key order so removals never
//! shift an element the loop has yet to visit. Deletion cascades upward
//! through three channels: array elements are spliced out directly, empty
//! arrays propagate the signal without being removed themselves, and
//! whitelisted wrapper keys are deleted so headers do not outlive their
//! content.

use serde_json::Value;

use crate::actions;
use crate::criteria::CriteriaSnapshot;
use crate::evaluator::Evaluator;
use crate::rules::{RuleDescriptor, RuleTable, CONTEXT_MENU_KINDS, DELETE_ALLOWED, MERGED_RULES};
use crate::types::{ActionKind, DeleteSignal, FilterOutcome, MatchedRule, PageContext};

/// Embedder hook for decorating blockable nodes with block-menu entries.
///
/// Called once per traversed parent object that carries a recognized node
/// kind, after the node's subtree has been filtered. `rule` carries the
/// field paths for that kind so the hook can pull out the channel and video
/// identifiers it needs. Implementations mutate the node in place (the
/// browser build injects menu-item renderers).
pub trait ContextMenuHook {
    fn annotate(&self, tag: &'static str, rule: &RuleDescriptor, node: &mut Value);
}

/// JS truthiness for a node slot; rule tags only fire on truthy values.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One filtering pass over one payload.
pub struct ObjectFilter<'a> {
    pub(crate) snap: &'a CriteriaSnapshot,
    pub(crate) page: &'a PageContext,
    table: &'a RuleTable,
    context_menus: bool,
    hook: Option<&'a dyn ContextMenuHook>,

    /// Comment ids blocked during this pass, consulted by wrapper kinds
    /// that reference comments by id.
    blocked_comments: Vec<String>,
    /// Cached criteria emptiness; an empty snapshot skips matching so the
    /// payload passes through byte-identical.
    empty: bool,

    /// A whole-page block (player response stripped) is in effect.
    pub(crate) current_block: bool,
    /// Navigation/UI effects accumulated for the embedder.
    pub(crate) outcome: FilterOutcome,
    /// Root-level actions requested mid-traversal, run in the post phase.
    pub(crate) pending_posts: Vec<ActionKind>,
}

impl<'a> ObjectFilter<'a> {
    pub fn new(
        snap: &'a CriteriaSnapshot,
        page: &'a PageContext,
        table: &'a RuleTable,
        context_menus: bool,
        hook: Option<&'a dyn ContextMenuHook>,
    ) -> Self {
        Self {
            snap,
            page,
            table,
            context_menus,
            hook,
            blocked_comments: Vec::new(),
            empty: snap.is_empty(),
            current_block: false,
            outcome: FilterOutcome::default(),
            pending_posts: Vec::new(),
        }
    }

    /// Filter `root` in place, then run the post-action phase: actions
    /// deferred from traversal first, then the route's own post actions.
    /// Returns the accumulated embedder effects and the page-block flag.
    pub fn run(
        mut self,
        root: &mut Value,
        post_actions: &[ActionKind],
        current_block: bool,
    ) -> (FilterOutcome, bool) {
        self.current_block = current_block;
        self.filter_node(root);

        let mut posts = std::mem::take(&mut self.pending_posts);
        for kind in post_actions {
            if !posts.contains(kind) {
                posts.push(*kind);
            }
        }
        for kind in posts {
            actions::run_post(&mut self, kind, root);
        }

        (self.outcome, self.current_block)
    }

    fn filter_node(&mut self, obj: &mut Value) -> DeleteSignal {
        let mut delete_prev = DeleteSignal::Keep;
        if !obj.is_object() && !obj.is_array() {
            return delete_prev;
        }

        for rule in self.match_rules(obj) {
            let mut custom_ret = true;
            if let Some(kind) = rule.custom_func {
                custom_ret = actions::run_custom(self, kind, obj, rule.name);
            }
            if custom_ret {
                if let Some(map) = obj.as_object_mut() {
                    map.remove(rule.name);
                }
                delete_prev = match rule.related {
                    Some(key) => DeleteSignal::AlsoSibling(key),
                    None => DeleteSignal::Node,
                };
            }
        }

        match obj {
            Value::Array(items) => {
                for i in (0..items.len()).rev() {
                    // A sibling splice below may have shortened the array.
                    if i >= items.len() {
                        continue;
                    }
                    let child_del = self.filter_node(&mut items[i]);
                    if child_del.is_delete() {
                        delete_prev = DeleteSignal::Node;
                        items.remove(i);
                        if let DeleteSignal::AlsoSibling(key) = child_del {
                            // The element that shifted into this slot is the
                            // deleted node's header/content pair.
                            if items.get(i).is_some_and(|next| next.get(key).is_some()) {
                                items.remove(i);
                            }
                        }
                    }
                }
            }
            Value::Object(map) => {
                let keys: Vec<String> = map.keys().cloned().collect();
                for key in keys.iter().rev() {
                    // Rule deletion above may have removed this key already.
                    let Some(child) = map.get_mut(key) else {
                        continue;
                    };
                    let child_del = self.filter_node(child);
                    if !child_del.is_delete() {
                        continue;
                    }
                    if child.as_array().is_some_and(|a| a.is_empty()) {
                        // Keep the empty array but keep cascading.
                        delete_prev = DeleteSignal::Node;
                    } else if DELETE_ALLOWED.contains(&key.as_str()) {
                        map.remove(key);
                        delete_prev = DeleteSignal::Node;
                    }
                }
            }
            _ => unreachable!(),
        }

        if self.context_menus {
            self.annotate_node(obj);
        }

        delete_prev
    }

    /// Collect the rule-table entries matching `obj`, in table order.
    fn match_rules(&mut self, obj: &Value) -> Vec<MatchedRule> {
        if self.empty {
            return Vec::new();
        }
        let Some(map) = obj.as_object() else {
            return Vec::new();
        };

        let eval = Evaluator::new(self.snap, self.page);
        let mut matched = Vec::new();

        for (tag, desc) in self.table.iter() {
            let Some(node) = map.get(tag) else {
                continue;
            };
            if !truthy(node) {
                continue;
            }

            let hit = eval.extended_match(node, tag, &self.blocked_comments) || {
                let outcome = eval.matches(desc, node, tag);
                if let Some(id) = outcome.blocked_comment {
                    self.blocked_comments.push(id);
                }
                outcome.block
            };
            if hit {
                matched.push(MatchedRule {
                    name: tag,
                    custom_func: desc.custom_func,
                    related: desc.related,
                });
            }
        }

        matched
    }

    fn annotate_node(&self, obj: &mut Value) {
        let Some(hook) = self.hook else {
            return;
        };
        let Some(map) = obj.as_object() else {
            return;
        };
        let Some(tag) = CONTEXT_MENU_KINDS
            .iter()
            .copied()
            .find(|tag| map.contains_key(*tag))
        else {
            return;
        };
        // Every menu kind has an entry in the merged table.
        let Some(rule) = MERGED_RULES.get(tag) else {
            return;
        };
        hook.annotate(tag, rule, obj);
    }
}
