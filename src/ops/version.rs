//! Dotted version comparison: `vgt`, `vgte`, `vlt`, `vlte`.
//!
//! Versions compare component by component. Missing trailing components are
//! zero (`1.1.1` equals `1.1.1.0`); a component that does not parse as a
//! number orders below every numeric one.

use std::cmp::Ordering;

use serde_json::Value;

use super::{shape_error, Operation, Prepared};
use crate::eval::Eval;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;
use crate::types::value::to_text;
use crate::vars::Variable;

/// One parsed version component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Num(i64),
    Malformed,
}

fn cmp_components(a: Component, b: Component) -> Ordering {
    match (a, b) {
        (Component::Num(x), Component::Num(y)) => x.cmp(&y),
        (Component::Malformed, Component::Num(_)) => Ordering::Less,
        (Component::Num(_), Component::Malformed) => Ordering::Greater,
        (Component::Malformed, Component::Malformed) => Ordering::Equal,
    }
}

pub(crate) fn parse_version(s: &str) -> Vec<Component> {
    s.trim()
        .split('.')
        .map(|part| {
            part.trim()
                .parse()
                .map(Component::Num)
                .unwrap_or(Component::Malformed)
        })
        .collect()
}

pub(crate) fn compare_versions(a: &[Component], b: &[Component]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(Component::Num(0));
        let y = b.get(i).copied().unwrap_or(Component::Num(0));
        match cmp_components(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerKind {
    Gt,
    Gte,
    Lt,
    Lte,
}

pub(crate) struct VersionCmp {
    kind: VerKind,
}

impl VersionCmp {
    pub(crate) fn new(kind: VerKind) -> Self {
        Self { kind }
    }
}

impl Operation for VersionCmp {
    fn name(&self) -> &str {
        match self.kind {
            VerKind::Gt => "vgt",
            VerKind::Gte => "vgte",
            VerKind::Lt => "vlt",
            VerKind::Lte => "vlte",
        }
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        if !matches!(raw, Value::String(_) | Value::Number(_)) {
            return Err(BuildError::InvalidOperand {
                operation: self.name().to_owned(),
                detail: "expected a version string".to_owned(),
            });
        }
        let text = to_text(raw);
        if text.trim().is_empty() {
            return Err(BuildError::InvalidOperand {
                operation: self.name().to_owned(),
                detail: "empty version".to_owned(),
            });
        }
        Ok(Prepared::Version(parse_version(&text)))
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::Version(target) = prepared else {
            return Err(shape_error(self.name()));
        };
        let ours = parse_version(&to_text(&value));
        let ord = compare_versions(&ours, target);
        Ok(match self.kind {
            VerKind::Gt => ord == Ordering::Greater,
            VerKind::Gte => ord != Ordering::Less,
            VerKind::Lt => ord == Ordering::Less,
            VerKind::Lte => ord != Ordering::Greater,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::run_op;
    use super::*;
    use crate::Registry;
    use serde_json::json;

    #[test]
    fn component_comparison() {
        assert_eq!(
            compare_versions(&parse_version("1.2.3"), &parse_version("1.2.4")),
            Ordering::Less
        );
        assert_eq!(
            compare_versions(&parse_version("2.0"), &parse_version("1.9.9")),
            Ordering::Greater
        );
        assert_eq!(
            compare_versions(&parse_version("1.10"), &parse_version("1.9")),
            Ordering::Greater
        );
    }

    #[test]
    fn missing_trailing_components_are_zero() {
        assert_eq!(
            compare_versions(&parse_version("1.1.1"), &parse_version("1.1.1.0")),
            Ordering::Equal
        );
        assert_eq!(
            compare_versions(&parse_version("1.1"), &parse_version("1.1.0.0")),
            Ordering::Equal
        );
    }

    #[test]
    fn malformed_components_order_below_numeric() {
        assert_eq!(
            compare_versions(&parse_version("1.beta"), &parse_version("1.0")),
            Ordering::Less
        );
        assert_eq!(
            compare_versions(&parse_version("1.beta"), &parse_version("1.beta")),
            Ordering::Equal
        );
    }

    #[test]
    fn operations_against_context_version() {
        let data = json!({"v": "2.4.1"});
        assert!(run_op("vgt", "v", json!("2.4"), data.clone()).unwrap());
        assert!(!run_op("vgt", "v", json!("2.4.1"), data.clone()).unwrap());
        assert!(run_op("vgte", "v", json!("2.4.1"), data.clone()).unwrap());
        assert!(run_op("vlt", "v", json!("2.10"), data.clone()).unwrap());
        assert!(run_op("vlte", "v", json!("2.4.1.0"), data).unwrap());
    }

    #[test]
    fn prepare_rejects_non_versions() {
        let registry = Registry::with_builtins();
        let op = registry.operation("vgt").unwrap();
        assert!(op.prepare(&json!([1, 2])).is_err());
        assert!(op.prepare(&json!("")).is_err());
        assert!(op.prepare(&json!("1.2.3")).is_ok());
        assert!(op.prepare(&json!(2)).is_ok());
    }
}
