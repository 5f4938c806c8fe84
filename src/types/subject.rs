//! The caller-supplied data object and its optional capabilities.
//!
//! The engine reads and mutates a [`Subject`] through its underlying JSON
//! value by default. A subject may expose capabilities that override or
//! extend that generic path: its own assignment/deletion logic, calc-factor
//! resolution, or frequency counters. Each probe defaults to `None`, so a
//! plain `serde_json::Value` is already a complete subject.

use serde_json::Value;

use super::context::RequestContext;
use super::error::EvalError;

/// Assignment override for targets the path engine cannot address.
pub trait Setter {
    /// Apply `key = value` in the subject's own terms.
    fn assign(&mut self, ctx: &RequestContext, key: &str, value: &Value) -> Result<(), EvalError>;
}

/// Deletion override, mirroring [`Setter`].
pub trait Deleter {
    /// Remove whatever `key` addresses. `value` carries the action's operand
    /// for implementations that need it.
    fn remove(&mut self, ctx: &RequestContext, key: &str, value: &Value) -> Result<(), EvalError>;
}

/// Resolves free identifiers for the `calc.<expr>` variable family.
pub trait CalcFactors {
    fn calc_value(&self, ctx: &RequestContext, name: &str) -> Result<f64, EvalError>;
}

/// Backing store for the `freq.<key>` variable family.
pub trait Frequencies {
    fn frequency_value(&self, ctx: &RequestContext, name: &str) -> Value;
}

/// Generic fallback lookup by key.
pub trait Valuer {
    fn value(&self, ctx: &RequestContext, key: &str) -> Option<Value>;
}

/// The data object a rule evaluation reads from and mutates.
pub trait Subject {
    /// The underlying value, for path-engine reads.
    fn as_value(&self) -> &Value;

    /// The underlying value, for path-engine mutation.
    fn as_value_mut(&mut self) -> &mut Value;

    /// Probe for an assignment override.
    fn setter(&mut self) -> Option<&mut dyn Setter> {
        None
    }

    /// Probe for a deletion override.
    fn deleter(&mut self) -> Option<&mut dyn Deleter> {
        None
    }

    /// Probe for calc-factor resolution.
    fn calc_factors(&self) -> Option<&dyn CalcFactors> {
        None
    }

    /// Probe for frequency counters.
    fn frequencies(&self) -> Option<&dyn Frequencies> {
        None
    }

    /// Probe for generic key/value lookup.
    fn valuer(&self) -> Option<&dyn Valuer> {
        None
    }
}

impl Subject for Value {
    fn as_value(&self) -> &Value {
        self
    }

    fn as_value_mut(&mut self) -> &mut Value {
        self
    }
}
