//! Built-in assignments and the [`Assignment`] trait.
//!
//! An assignment is a named mutation primitive applied to a path inside the
//! subject. Both built-ins probe the subject for an override capability
//! first and fall back to the generic path engine.

use std::sync::Arc;

use serde_json::Value;

use crate::eval::Eval;
use crate::path;
use crate::registry::Registry;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;

/// A named mutation primitive with the same two-phase shape as an
/// operation, except `apply` returns no value and mutates the subject.
pub trait Assignment: Send + Sync {
    fn name(&self) -> &str;

    /// Internalize the raw config value at build time.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidOperand`] naming this assignment.
    fn prepare(&self, raw: &Value) -> Result<Value, BuildError> {
        Ok(raw.clone())
    }

    /// Mutate the subject at `key`.
    ///
    /// # Errors
    ///
    /// Path and type failures surface as [`EvalError`]; they are never
    /// silently dropped.
    fn apply(
        &self,
        ev: &Eval<'_>,
        subject: &mut dyn Subject,
        key: &str,
        value: &Value,
    ) -> Result<(), EvalError>;
}

/// `=`: write a value at a path, or delegate to the subject's setter.
struct Set;

impl Assignment for Set {
    fn name(&self) -> &str {
        "="
    }

    fn apply(
        &self,
        ev: &Eval<'_>,
        subject: &mut dyn Subject,
        key: &str,
        value: &Value,
    ) -> Result<(), EvalError> {
        if let Some(setter) = subject.setter() {
            return setter.assign(ev.request(), key, value);
        }
        path::write(subject.as_value_mut(), key, value.clone())?;
        Ok(())
    }
}

/// `del`: remove a map key, or delegate to the subject's deleter.
struct Delete;

impl Assignment for Delete {
    fn name(&self) -> &str {
        "del"
    }

    fn apply(
        &self,
        ev: &Eval<'_>,
        subject: &mut dyn Subject,
        key: &str,
        value: &Value,
    ) -> Result<(), EvalError> {
        if let Some(deleter) = subject.deleter() {
            return deleter.remove(ev.request(), key, value);
        }
        path::delete(subject.as_value_mut(), key)?;
        Ok(())
    }
}

/// Install `=`/`set` and `del`/`delete`.
pub(crate) fn register_builtins(registry: &mut Registry) {
    let set: Arc<dyn Assignment> = Arc::new(Set);
    registry.register_assignment("=", Arc::clone(&set));
    registry.register_assignment("set", set);

    let delete: Arc<dyn Assignment> = Arc::new(Delete);
    registry.register_assignment("del", Arc::clone(&delete));
    registry.register_assignment("delete", delete);
}
