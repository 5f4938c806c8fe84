//! Built-in operations and the [`Operation`] trait.
//!
//! An operation is a named binary predicate over a variable's resolved value
//! and a rule-declared target. Each has two phases: `prepare` internalizes
//! the raw config value once at build time (parsing lists, compiling
//! regexes, expanding CIDRs), and `test` applies the predicate per
//! evaluation. Several names may map to one behavior (`>` and `gt`).

mod cmp;
mod ip;
mod list;
mod pattern;
mod version;

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde_json::Value;

use crate::eval::Eval;
use crate::registry::Registry;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;
use crate::vars::Variable;

pub use pattern::Pattern;
pub use version::Component;

/// A named binary predicate with a build-time preparation phase.
pub trait Operation: Send + Sync {
    fn name(&self) -> &str;

    /// Internalize the raw config value. Runs once per rule at build time;
    /// failure aborts the whole rule build.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidOperand`] naming this operation.
    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError>;

    /// Resolve the variable and apply the predicate.
    ///
    /// # Errors
    ///
    /// Variable-resolution errors propagate verbatim; a runtime value the
    /// predicate cannot use yields [`EvalError::Operand`].
    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError>;
}

/// An operation's internalized comparison value.
#[derive(Debug, Clone)]
pub enum Prepared {
    /// The raw value as-is (equality family).
    Value(Value),
    /// An element list (`between`, `in`, `any`, ...).
    List(Vec<Value>),
    /// Compiled match targets (`~*` family).
    Patterns(Vec<Pattern>),
    /// Inclusive IPv4 ranges (`iir`/`niir`).
    IpRanges(Vec<RangeInclusive<u32>>),
    /// Parsed version components (`vgt` family).
    Version(Vec<Component>),
}

/// Runtime guard for a prepared value of the wrong shape. Unreachable when
/// the tree was built through [`Operation::prepare`].
fn shape_error(operation: &str) -> EvalError {
    EvalError::Operand {
        operation: operation.to_owned(),
        detail: "prepared value has unexpected shape".to_owned(),
    }
}

/// View a value as a list: arrays yield their elements, anything else a
/// single-element list of itself.
fn as_list(v: &Value) -> Vec<Value> {
    match v {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Install the standard operation set with its aliases.
pub(crate) fn register_builtins(registry: &mut Registry) {
    let table: &[(cmp::CmpKind, &[&str])] = &[
        (cmp::CmpKind::Eq, &["=", "eq"]),
        (cmp::CmpKind::Neq, &["!=", "<>", "neq"]),
        (cmp::CmpKind::Lt, &["<", "lt"]),
        (cmp::CmpKind::Lte, &["<=", "lte"]),
        (cmp::CmpKind::Gt, &[">", "gt"]),
        (cmp::CmpKind::Gte, &[">=", "gte"]),
    ];
    for (kind, names) in table {
        let op: Arc<dyn Operation> = Arc::new(cmp::Compare::new(*kind));
        for name in *names {
            registry.register_operation(name, Arc::clone(&op));
        }
    }
    registry.register_operation("between", Arc::new(cmp::Between));

    registry.register_operation("in", Arc::new(list::In));
    registry.register_operation("nin", Arc::new(list::Disjoint::new("nin")));
    registry.register_operation("any", Arc::new(list::AnyOf));
    registry.register_operation("has", Arc::new(list::HasAll));
    registry.register_operation("not", Arc::new(list::Disjoint::new("not")));

    registry.register_operation("~*", Arc::new(pattern::Matches::new("~*", false)));
    registry.register_operation("!~*", Arc::new(pattern::Matches::new("!~*", true)));
    registry.register_operation("!~", Arc::new(pattern::Matches::new("!~", true)));

    registry.register_operation("iir", Arc::new(ip::IpWithin::new("iir", false)));
    registry.register_operation("niir", Arc::new(ip::IpWithin::new("niir", true)));

    registry.register_operation("vgt", Arc::new(version::VersionCmp::new(version::VerKind::Gt)));
    registry.register_operation(
        "vgte",
        Arc::new(version::VersionCmp::new(version::VerKind::Gte)),
    );
    registry.register_operation("vlt", Arc::new(version::VersionCmp::new(version::VerKind::Lt)));
    registry.register_operation(
        "vlte",
        Arc::new(version::VersionCmp::new(version::VerKind::Lte)),
    );
}
