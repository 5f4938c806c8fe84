//! Prefix-parametrized variable families.
//!
//! `data.<path>`, `ctx.<key>`, `freq.<key>`, and `calc.<expr>` all depend on
//! per-call state, so none of them is cacheable.

use std::sync::Arc;

use serde_json::{json, Value};

use super::Variable;
use crate::calc::Calculator;
use crate::eval::Eval;
use crate::path;
use crate::types::error::EvalError;
use crate::types::subject::Subject;
use crate::types::value::to_f64;

/// `data.<path>`: reads `<path>` out of the subject via the path engine.
pub(crate) struct DataVariable {
    name: String,
    path: String,
}

impl DataVariable {
    pub(crate) fn new(name: impl Into<String>, path: String) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }
}

impl Variable for DataVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn cacheable(&self) -> bool {
        false
    }

    fn resolve(&self, _ev: &Eval<'_>, subject: &dyn Subject) -> Result<Value, EvalError> {
        path::read(subject.as_value(), &self.path)
            .cloned()
            .ok_or_else(|| EvalError::MissingData {
                path: self.path.clone(),
            })
    }
}

/// `ctx.<key>`: reads a raw key from the request context's extra map.
pub(crate) struct CtxVariable {
    name: String,
    key: String,
}

impl CtxVariable {
    pub(crate) fn new(name: impl Into<String>, key: String) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }
}

impl Variable for CtxVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn cacheable(&self) -> bool {
        false
    }

    fn resolve(&self, ev: &Eval<'_>, _subject: &dyn Subject) -> Result<Value, EvalError> {
        ev.request()
            .extra(&self.key)
            .cloned()
            .ok_or_else(|| EvalError::MissingContext {
                name: self.key.clone(),
            })
    }
}

/// `freq.<key>`: asks the subject's frequency capability; `0` when the
/// subject does not carry one.
pub(crate) struct FreqVariable {
    name: String,
    key: String,
}

impl FreqVariable {
    pub(crate) fn new(name: impl Into<String>, key: String) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }
}

impl Variable for FreqVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn cacheable(&self) -> bool {
        false
    }

    fn resolve(&self, ev: &Eval<'_>, subject: &dyn Subject) -> Result<Value, EvalError> {
        Ok(subject
            .frequencies()
            .map(|f| f.frequency_value(ev.request(), &self.key))
            .unwrap_or_else(|| json!(0)))
    }
}

/// `calc.<expr>`: evaluates an arithmetic expression through the delegated
/// calculator. Free identifiers resolve through the subject's calc-factor
/// capability when present (its answer, including errors, is authoritative),
/// then the subject's generic valuer, then the variable registry.
pub(crate) struct CalcVariable {
    name: String,
    expr: String,
    calculator: Arc<dyn Calculator>,
}

impl CalcVariable {
    pub(crate) fn new(
        name: impl Into<String>,
        expr: String,
        calculator: Arc<dyn Calculator>,
    ) -> Self {
        Self {
            name: name.into(),
            expr,
            calculator,
        }
    }
}

impl Variable for CalcVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn cacheable(&self) -> bool {
        false
    }

    fn resolve(&self, ev: &Eval<'_>, subject: &dyn Subject) -> Result<Value, EvalError> {
        let mut resolver = |ident: &str| -> Result<f64, EvalError> {
            if let Some(factors) = subject.calc_factors() {
                return factors.calc_value(ev.request(), ident);
            }
            if let Some(valuer) = subject.valuer() {
                if let Some(v) = valuer.value(ev.request(), ident) {
                    return Ok(to_f64(&v));
                }
            }
            let value = ev.resolve_name(ident, subject)?;
            Ok(to_f64(&value))
        };
        let result = self.calculator.eval(&self.expr, &mut resolver)?;
        Ok(json!(result))
    }
}
