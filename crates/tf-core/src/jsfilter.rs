//! User-supplied JavaScript predicate
//!
//! Power users can ship a JS function that receives a friendly summary of
//! each candidate node and returns truthy to block it. The script is
//! evaluated once at settings time; the resulting function value is invoked
//! per candidate. Any failure, at compile time or per call, fails open.

use std::cell::RefCell;

use boa_engine::{Context, JsObject, JsString, JsValue, Source};
use serde_json::Value;

/// Errors from evaluating the predicate source.
#[derive(Debug, thiserror::Error)]
pub enum JsCompileError {
    #[error("predicate script failed to evaluate: {0}")]
    Eval(String),
    #[error("predicate script did not evaluate to a function")]
    NotAFunction,
}

/// A compiled user predicate bound to its own interpreter context.
///
/// The context is single-threaded by construction; the whole snapshot lives
/// on one thread (the page's main thread in the wasm build).
pub struct JsPredicate {
    ctx: RefCell<Context>,
    func: JsObject,
}

impl JsPredicate {
    /// Evaluate `source`; the script's completion value must be callable.
    pub fn compile(source: &str) -> Result<Self, JsCompileError> {
        let mut ctx = Context::default();
        let value = ctx
            .eval(Source::from_bytes(source.as_bytes()))
            .map_err(|e| JsCompileError::Eval(e.to_string()))?;
        let func = value
            .as_callable()
            .cloned()
            .ok_or(JsCompileError::NotAFunction)?;
        Ok(Self {
            ctx: RefCell::new(ctx),
            func,
        })
    }

    /// Call the predicate with `(friendly, objectType)`. The return value is
    /// coerced to boolean; a thrown exception or conversion failure counts
    /// as "no match".
    pub fn invoke(&self, friendly: &Value, object_type: &str) -> bool {
        let mut ctx = self.ctx.borrow_mut();

        let arg = match JsValue::from_json(friendly, &mut ctx) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("predicate argument conversion failed: {e}");
                return false;
            }
        };
        let kind = JsValue::from(JsString::from(object_type));

        match self.func.call(&JsValue::undefined(), &[arg, kind], &mut ctx) {
            Ok(v) => v.to_boolean(),
            Err(e) => {
                log::warn!("predicate threw for {object_type}: {e}");
                false
            }
        }
    }
}

impl std::fmt::Debug for JsPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsPredicate").finish_non_exhaustive()
    }
}
