//! The equality/ordering family and `between`.

use std::cmp::Ordering;

use serde_json::Value;

use super::{shape_error, Operation, Prepared};
use crate::eval::Eval;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;
use crate::types::value::compare;
use crate::vars::Variable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpKind {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// `=`, `!=`, `<`, `<=`, `>`, `>=` via the cross-type comparator.
pub(crate) struct Compare {
    kind: CmpKind,
}

impl Compare {
    pub(crate) fn new(kind: CmpKind) -> Self {
        Self { kind }
    }
}

impl Operation for Compare {
    fn name(&self) -> &str {
        match self.kind {
            CmpKind::Eq => "=",
            CmpKind::Neq => "!=",
            CmpKind::Lt => "<",
            CmpKind::Lte => "<=",
            CmpKind::Gt => ">",
            CmpKind::Gte => ">=",
        }
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        Ok(Prepared::Value(raw.clone()))
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::Value(target) = prepared else {
            return Err(shape_error(self.name()));
        };
        let ord = compare(&value, target);
        Ok(match self.kind {
            CmpKind::Eq => ord == Ordering::Equal,
            CmpKind::Neq => ord != Ordering::Equal,
            CmpKind::Lt => ord == Ordering::Less,
            CmpKind::Lte => ord != Ordering::Greater,
            CmpKind::Gt => ord == Ordering::Greater,
            CmpKind::Gte => ord != Ordering::Less,
        })
    }
}

/// `between`: true iff `lo <= value <= hi`, bounds inclusive.
pub(crate) struct Between;

impl Operation for Between {
    fn name(&self) -> &str {
        "between"
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        match raw.as_array() {
            Some(pair) if pair.len() == 2 => Ok(Prepared::List(pair.clone())),
            _ => Err(BuildError::InvalidOperand {
                operation: "between".to_owned(),
                detail: "expected a [lo, hi] pair".to_owned(),
            }),
        }
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::List(bounds) = prepared else {
            return Err(shape_error(self.name()));
        };
        let [lo, hi] = bounds.as_slice() else {
            return Err(shape_error(self.name()));
        };
        Ok(compare(lo, &value) != Ordering::Greater && compare(&value, hi) != Ordering::Greater)
    }
}
