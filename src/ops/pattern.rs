//! String matching: `~*` (match-any), `!~*` and `!~` (match-none).
//!
//! A target delimited by a leading and trailing `/` compiles to a regular
//! expression at prepare time; anything else is substring containment.

use regex::Regex;
use serde_json::Value;

use super::{shape_error, Operation, Prepared};
use crate::eval::Eval;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;
use crate::types::value::to_text;
use crate::vars::Variable;

/// One compiled match target.
#[derive(Debug, Clone)]
pub enum Pattern {
    Regex(Regex),
    Substring(String),
}

impl Pattern {
    fn compile(operation: &str, target: &str) -> Result<Self, BuildError> {
        if target.len() >= 2 && target.starts_with('/') && target.ends_with('/') {
            Regex::new(&target[1..target.len() - 1])
                .map(Pattern::Regex)
                .map_err(|e| BuildError::InvalidOperand {
                    operation: operation.to_owned(),
                    detail: e.to_string(),
                })
        } else {
            Ok(Pattern::Substring(target.to_owned()))
        }
    }

    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            Pattern::Regex(re) => re.is_match(haystack),
            Pattern::Substring(s) => haystack.contains(s.as_str()),
        }
    }
}

/// Applies a pattern list with any-match (`~*`) or no-match (`!~*`, `!~`)
/// semantics.
pub(crate) struct Matches {
    name: &'static str,
    negate: bool,
}

impl Matches {
    pub(crate) fn new(name: &'static str, negate: bool) -> Self {
        Self { name, negate }
    }
}

impl Operation for Matches {
    fn name(&self) -> &str {
        self.name
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        let targets: Vec<&str> = match raw {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => {
                let mut targets = Vec::with_capacity(items.len());
                for item in items {
                    targets.push(item.as_str().ok_or_else(|| BuildError::InvalidOperand {
                        operation: self.name.to_owned(),
                        detail: "targets must be strings".to_owned(),
                    })?);
                }
                targets
            }
            _ => {
                return Err(BuildError::InvalidOperand {
                    operation: self.name.to_owned(),
                    detail: "expected a string or an array of strings".to_owned(),
                })
            }
        };
        if targets.is_empty() {
            return Err(BuildError::InvalidOperand {
                operation: self.name.to_owned(),
                detail: "expected at least one target".to_owned(),
            });
        }
        let patterns = targets
            .into_iter()
            .map(|t| Pattern::compile(self.name, t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Prepared::Patterns(patterns))
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::Patterns(patterns) = prepared else {
            return Err(shape_error(self.name));
        };
        let text = to_text(&value);
        let hit = patterns.iter().any(|p| p.matches(&text));
        Ok(hit != self.negate)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::run_op;
    use crate::types::error::BuildError;
    use crate::Registry;
    use serde_json::json;

    #[test]
    fn substring_containment() {
        let data = json!({"ua": "Mozilla/5.0 (iPhone; CPU iPhone OS 17)"});
        assert!(run_op("~*", "ua", json!("iPhone"), data.clone()).unwrap());
        assert!(!run_op("~*", "ua", json!("Android"), data).unwrap());
    }

    #[test]
    fn regex_delimited_by_slashes() {
        let data = json!({"path": "/api/v2/users"});
        assert!(run_op("~*", "path", json!("/^\\/api\\/v[0-9]+\\//"), data.clone()).unwrap());
        assert!(!run_op("~*", "path", json!("/^\\/admin\\//"), data).unwrap());
    }

    #[test]
    fn any_match_across_list() {
        let data = json!({"channel": "appstore"});
        assert!(run_op("~*", "channel", json!(["play", "appstore"]), data.clone()).unwrap());
        assert!(!run_op("~*", "channel", json!(["play", "huawei"]), data).unwrap());
    }

    #[test]
    fn match_none_family() {
        let data = json!({"channel": "appstore"});
        assert!(!run_op("!~*", "channel", json!(["play", "appstore"]), data.clone()).unwrap());
        assert!(run_op("!~*", "channel", json!(["play", "huawei"]), data.clone()).unwrap());
        assert!(run_op("!~", "channel", json!("play"), data.clone()).unwrap());
        assert!(!run_op("!~", "channel", json!("appstore"), data).unwrap());
    }

    #[test]
    fn bad_regex_fails_at_prepare() {
        let registry = Registry::with_builtins();
        let op = registry.operation("~*").unwrap();
        let err = op.prepare(&json!("/([unclosed/")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOperand { .. }));
    }

    #[test]
    fn non_string_targets_rejected() {
        let registry = Registry::with_builtins();
        let op = registry.operation("~*").unwrap();
        assert!(matches!(
            op.prepare(&json!([1, 2])),
            Err(BuildError::InvalidOperand { .. })
        ));
        assert!(matches!(
            op.prepare(&json!(42)),
            Err(BuildError::InvalidOperand { .. })
        ));
    }
}
