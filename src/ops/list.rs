//! List-set operations: `in`, `nin`, `any`, `has`, `not`.
//!
//! The variable's value is viewed as a list (a scalar is its own
//! single-element list); the prepared target is always a non-empty list.

use serde_json::Value;

use super::{as_list, shape_error, Operation, Prepared};
use crate::eval::Eval;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;
use crate::types::value::equal;
use crate::vars::Variable;

fn prepare_list(operation: &str, raw: &Value) -> Result<Prepared, BuildError> {
    match raw.as_array() {
        Some(items) if !items.is_empty() => Ok(Prepared::List(items.clone())),
        _ => Err(BuildError::InvalidOperand {
            operation: operation.to_owned(),
            detail: "expected a non-empty array".to_owned(),
        }),
    }
}

fn contains(list: &[Value], needle: &Value) -> bool {
    list.iter().any(|item| equal(item, needle))
}

/// `in`: every element of the variable's value is found in the target list.
/// An all-match, not an any-match, when the variable is array-valued.
pub(crate) struct In;

impl Operation for In {
    fn name(&self) -> &str {
        "in"
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        prepare_list(self.name(), raw)
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::List(targets) = prepared else {
            return Err(shape_error(self.name()));
        };
        Ok(as_list(&value).iter().all(|e| contains(targets, e)))
    }
}

/// `nin`/`not`: no element of the variable's value equals any target element.
pub(crate) struct Disjoint {
    name: &'static str,
}

impl Disjoint {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Operation for Disjoint {
    fn name(&self) -> &str {
        self.name
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        prepare_list(self.name, raw)
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::List(targets) = prepared else {
            return Err(shape_error(self.name));
        };
        Ok(!as_list(&value).iter().any(|e| contains(targets, e)))
    }
}

/// `any`: some variable element equals some target element.
pub(crate) struct AnyOf;

impl Operation for AnyOf {
    fn name(&self) -> &str {
        "any"
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        prepare_list(self.name(), raw)
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::List(targets) = prepared else {
            return Err(shape_error(self.name()));
        };
        Ok(as_list(&value).iter().any(|e| contains(targets, e)))
    }
}

/// `has`: every target element is present among the variable's elements.
pub(crate) struct HasAll;

impl Operation for HasAll {
    fn name(&self) -> &str {
        "has"
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        prepare_list(self.name(), raw)
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::List(targets) = prepared else {
            return Err(shape_error(self.name()));
        };
        let elements = as_list(&value);
        Ok(targets.iter().all(|t| contains(&elements, t)))
    }
}
