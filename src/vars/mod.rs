//! Built-in variables and the [`Variable`] trait.
//!
//! A variable is a named value producer evaluated against the request
//! context and the subject. Fixed-name variables are registered directly;
//! the `data.`/`ctx.`/`freq.`/`calc.` families are constructed on demand
//! from the registry's prefix table.

mod context;
mod geo;
mod prefix;
mod time;

use std::sync::Arc;

use rand::Rng;
use serde_json::{json, Value};

use crate::calc::DefaultCalculator;
use crate::eval::Eval;
use crate::registry::{PrefixKind, Registry};
use crate::types::error::EvalError;
use crate::types::subject::Subject;

pub use geo::{GeoInfo, GeoLookup};

pub(crate) use context::ContextVariable;
pub(crate) use prefix::{CalcVariable, CtxVariable, DataVariable, FreqVariable};
pub(crate) use time::TimeVariable;

/// A named value producer.
pub trait Variable: Send + Sync {
    /// The variable's identity, also its cache key.
    fn name(&self) -> &str;

    /// Whether the resolved value may be memoized for one evaluation pass.
    /// Anything depending on per-call state (wall clock, randomness,
    /// subject contents) must say no.
    fn cacheable(&self) -> bool;

    /// Produce the value for this evaluation.
    ///
    /// # Errors
    ///
    /// Reports whatever the underlying source reports; the engine surfaces
    /// it instead of guessing a default.
    fn resolve(&self, ev: &Eval<'_>, subject: &dyn Subject) -> Result<Value, EvalError>;
}

/// Constant `1`.
struct Success;

impl Variable for Success {
    fn name(&self) -> &str {
        "success"
    }

    fn cacheable(&self) -> bool {
        true
    }

    fn resolve(&self, _ev: &Eval<'_>, _subject: &dyn Subject) -> Result<Value, EvalError> {
        Ok(json!(1))
    }
}

/// Uniform random integer in `[1, 100]`, drawn fresh on every resolution.
struct Random;

impl Variable for Random {
    fn name(&self) -> &str {
        "rand"
    }

    fn cacheable(&self) -> bool {
        false
    }

    fn resolve(&self, _ev: &Eval<'_>, _subject: &dyn Subject) -> Result<Value, EvalError> {
        Ok(json!(rand::rng().random_range(1..=100)))
    }
}

/// Install the standard variable set and prefix families.
pub(crate) fn register_builtins(registry: &mut Registry) {
    for field in context::ContextField::ALL {
        registry.register_variable(Arc::new(ContextVariable::new(field)));
    }
    for unit in time::TimeUnit::ALL {
        registry.register_variable(Arc::new(TimeVariable::new(unit)));
    }
    registry.register_variable(Arc::new(Success));
    registry.register_variable(Arc::new(Random));

    registry.register_prefix("data.", PrefixKind::Data);
    registry.register_prefix("ctx.", PrefixKind::Ctx);
    registry.register_prefix("freq.", PrefixKind::Freq);
    registry.register_prefix("calc.", PrefixKind::Calc(Arc::new(DefaultCalculator::new())));
}

/// Install `country`/`province`/`city` backed by the given lookup.
pub fn register_geo(registry: &mut Registry, lookup: Arc<dyn GeoLookup>) {
    for field in geo::GeoField::ALL {
        registry.register_variable(Arc::new(geo::GeoVariable::new(field, Arc::clone(&lookup))));
    }
}
