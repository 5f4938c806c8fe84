//! `sift` is a data-driven rule and targeting engine.
//!
//! Rules arrive as nested JSON arrays: a list of `[variable, operation,
//! value]` conditions followed by a list of `[path, assignment, value]`
//! actions. A rule is built once into a [`Filter`] against a [`Registry`]
//! of pluggable variables, operations, and assignments, then evaluated per
//! request against a caller-supplied data object (any [`Subject`], a plain
//! `serde_json::Value` included). [`GroupFilter`] schedules many rules by
//! priority, weight-shuffling ties.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sift::{build_filter, Cache, Eval, Registry, RequestContext};
//!
//! let registry = Registry::with_builtins();
//! let filter = build_filter(
//!     &registry,
//!     &json!([["data.age", ">", 17], [["segment", "=", "adult"]]]),
//! )
//! .unwrap();
//!
//! let request = RequestContext::new();
//! let cache = Cache::new();
//! let ev = Eval::new(&registry, &request, &cache);
//! let mut data = json!({"age": 18});
//! assert!(filter.run(&ev, &mut data).unwrap());
//! assert_eq!(data["segment"], json!("adult"));
//! ```

mod assign;
mod build;
mod calc;
mod config;
mod error;
mod eval;
mod ops;
pub mod path;
mod registry;
mod types;
mod vars;

pub use assign::Assignment;
pub use build::{build_condition, build_executor, build_filter};
pub use calc::{Calculator, DefaultCalculator};
pub use config::{build_group, FilterConfig, GroupConfig};
pub use error::SiftError;
pub use eval::Eval;
pub use ops::{Operation, Pattern, Prepared};
pub use path::PathError;
pub use registry::{PrefixKind, Registry};
pub use types::{
    compare, equal, kind, to_bool, to_f64, to_i64, to_text, to_u64, BaseCondition, BaseExecutor,
    BuildError, CalcFactors, Cache, Condition, Deleter, EvalError, Executor, Filter, FilterPack,
    Frequencies, GroupFilter, GroupOutcome, Kind, Logic, RequestContext, Setter, Subject, Valuer,
};
pub use vars::{register_geo, GeoInfo, GeoLookup, Variable};
