//! Builders turning JSON rule configs into condition/executor/filter trees.
//!
//! A rule is a nested array: conditions (implicitly ANDed), then an action
//! list as the final element. A condition is `[variable, operation, value]`,
//! or one of the reserved heads `"and"`/`"or"`/`"not"` whose third element
//! is an array of sibling condition arrays. An action is
//! `[path, assignment, value]`; action nesting is expressed purely by
//! arrays, never by keywords.

use serde_json::Value;

use crate::registry::Registry;
use crate::types::condition::{BaseCondition, Condition, Logic};
use crate::types::error::BuildError;
use crate::types::executor::{BaseExecutor, Executor};
use crate::types::filter::Filter;

/// A short rendering of a config fragment for error messages.
fn describe(v: &Value) -> String {
    let text = v.to_string();
    if text.chars().count() > 60 {
        let prefix: String = text.chars().take(57).collect();
        format!("{prefix}...")
    } else {
        text
    }
}

/// Build a condition tree from `items` under the given group logic.
///
/// If `items[0]` is itself an array, `items` is a list of sibling condition
/// arrays combined with `logic`; otherwise it must be a triple.
///
/// # Errors
///
/// Malformed shapes and unknown variable/operation names are build errors
/// naming the offending token; an operation may also reject its value.
pub fn build_condition(
    registry: &Registry,
    items: &[Value],
    logic: Logic,
) -> Result<Condition, BuildError> {
    if items.is_empty() {
        return Err(BuildError::EmptyGroup {
            logic: logic.as_str().to_owned(),
        });
    }
    if items[0].is_array() {
        return build_condition_group(registry, items, logic);
    }
    if items.len() != 3 {
        return Err(BuildError::MalformedCondition {
            got: format!("{} elements", items.len()),
        });
    }
    let head = items[0].as_str().ok_or_else(|| BuildError::MalformedCondition {
        got: describe(&items[0]),
    })?;
    if let Some(group_logic) = Logic::from_keyword(head) {
        let siblings = items[2]
            .as_array()
            .ok_or_else(|| BuildError::MalformedCondition {
                got: format!("'{head}' group with non-array body {}", describe(&items[2])),
            })?;
        return build_condition_group(registry, siblings, group_logic);
    }
    let variable = registry
        .variable(head)
        .ok_or_else(|| BuildError::UnknownVariable {
            name: head.to_owned(),
        })?;
    let op_name = items[1].as_str().ok_or_else(|| BuildError::MalformedCondition {
        got: describe(&items[1]),
    })?;
    let operation = registry
        .operation(op_name)
        .ok_or_else(|| BuildError::UnknownOperation {
            name: op_name.to_owned(),
        })?;
    let prepared = operation.prepare(&items[2])?;
    Ok(Condition::Base(BaseCondition::new(
        variable, operation, prepared,
    )))
}

fn build_condition_group(
    registry: &Registry,
    siblings: &[Value],
    logic: Logic,
) -> Result<Condition, BuildError> {
    if siblings.is_empty() {
        return Err(BuildError::EmptyGroup {
            logic: logic.as_str().to_owned(),
        });
    }
    let children = siblings
        .iter()
        .map(|item| {
            let sub = item.as_array().ok_or_else(|| BuildError::MalformedCondition {
                got: describe(item),
            })?;
            build_condition(registry, sub, Logic::And)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Condition::Group { logic, children })
}

/// Build an executor tree from `items`.
///
/// If `items[0]` is an array, `items` is a list of sibling actions; an
/// empty list is a no-op group. Otherwise it must be a
/// `[path, assignment, value]` triple.
///
/// # Errors
///
/// Malformed shapes and unknown assignment names are build errors.
pub fn build_executor(registry: &Registry, items: &[Value]) -> Result<Executor, BuildError> {
    if items.is_empty() {
        return Ok(Executor::Group(Vec::new()));
    }
    if items[0].is_array() {
        let children = items
            .iter()
            .map(|item| {
                let sub = item.as_array().ok_or_else(|| BuildError::MalformedAction {
                    got: describe(item),
                })?;
                build_executor(registry, sub)
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Executor::Group(children));
    }
    if items.len() != 3 {
        return Err(BuildError::MalformedAction {
            got: format!("{} elements", items.len()),
        });
    }
    let key = items[0].as_str().ok_or_else(|| BuildError::MalformedAction {
        got: describe(&items[0]),
    })?;
    let name = items[1].as_str().ok_or_else(|| BuildError::MalformedAction {
        got: describe(&items[1]),
    })?;
    let assignment = registry
        .assignment(name)
        .ok_or_else(|| BuildError::UnknownAssignment {
            name: name.to_owned(),
        })?;
    let prepared = assignment.prepare(&items[2])?;
    Ok(Executor::Base(BaseExecutor::new(
        key.to_owned(),
        assignment,
        prepared,
    )))
}

/// Build a filter from a whole rule: every element but the last is a
/// condition (combined with AND), the last is the action list.
///
/// # Errors
///
/// Propagates condition and executor build errors; a rule that is not a
/// non-empty array is malformed.
pub fn build_filter(registry: &Registry, rule: &Value) -> Result<Filter, BuildError> {
    let items = rule.as_array().ok_or_else(|| BuildError::MalformedRule {
        got: describe(rule),
    })?;
    let Some((actions, conditions)) = items.split_last() else {
        return Err(BuildError::MalformedRule {
            got: "0 elements".to_owned(),
        });
    };
    let condition = match conditions {
        [] => Condition::Group {
            logic: Logic::And,
            children: Vec::new(),
        },
        [single] => {
            let sub = single.as_array().ok_or_else(|| BuildError::MalformedCondition {
                got: describe(single),
            })?;
            build_condition(registry, sub, Logic::And)?
        }
        _ => build_condition_group(registry, conditions, Logic::And)?,
    };
    let action_items = actions.as_array().ok_or_else(|| BuildError::MalformedAction {
        got: describe(actions),
    })?;
    let executor = build_executor(registry, action_items)?;
    Ok(Filter::new(condition, executor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::with_builtins()
    }

    #[test]
    fn build_simple_rule() {
        let rule = json!([["success", "=", 1], [["name", "=", "adult"]]]);
        assert!(build_filter(&registry(), &rule).is_ok());
    }

    #[test]
    fn build_rule_with_reserved_group() {
        let rule = json!([
            ["and", "=>", [["data.a", "=", 1], ["data.b", "=", 2]]],
            [["c", "=", "x"]]
        ]);
        assert!(build_filter(&registry(), &rule).is_ok());
    }

    #[test]
    fn unknown_variable_names_the_token() {
        let rule = json!([["no_such_var", "=", 1], [["k", "=", 1]]]);
        let err = build_filter(&registry(), &rule).unwrap_err();
        assert_eq!(err.to_string(), "unknown variable 'no_such_var'");
    }

    #[test]
    fn unknown_operation_names_the_token() {
        let rule = json!([["success", "===", 1], [["k", "=", 1]]]);
        let err = build_filter(&registry(), &rule).unwrap_err();
        assert_eq!(err.to_string(), "unknown operation '==='");
    }

    #[test]
    fn unknown_assignment_names_the_token() {
        let rule = json!([["success", "=", 1], [["k", "append", 1]]]);
        let err = build_filter(&registry(), &rule).unwrap_err();
        assert_eq!(err.to_string(), "unknown assignment 'append'");
    }

    #[test]
    fn wrong_arity_condition_is_malformed() {
        let err = build_condition(&registry(), &[json!("success"), json!("=")], Logic::And)
            .unwrap_err();
        assert!(matches!(err, BuildError::MalformedCondition { .. }));
    }

    #[test]
    fn reserved_group_requires_array_body() {
        let err = build_condition(
            &registry(),
            &[json!("and"), json!("=>"), json!(5)],
            Logic::And,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::MalformedCondition { .. }));
    }

    #[test]
    fn empty_reserved_group_is_rejected() {
        let err = build_condition(
            &registry(),
            &[json!("or"), json!("=>"), json!([])],
            Logic::And,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::EmptyGroup { .. }));
        assert_eq!(
            err.to_string(),
            "'or' group requires a non-empty array of conditions"
        );
    }

    #[test]
    fn operand_rejection_aborts_the_build() {
        let rule = json!([["data.age", "between", [1]], [["k", "=", 1]]]);
        let err = build_filter(&registry(), &rule).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOperand { .. }));
    }

    #[test]
    fn non_array_rule_is_malformed() {
        let err = build_filter(&registry(), &json!("rule")).unwrap_err();
        assert!(matches!(err, BuildError::MalformedRule { .. }));
    }

    #[test]
    fn rule_with_only_actions_builds() {
        // No conditions: the implicit AND group is empty and vacuously true.
        let rule = json!([[["k", "=", 1]]]);
        assert!(build_filter(&registry(), &rule).is_ok());
    }

    #[test]
    fn nested_executor_groups() {
        let items = [json!([["a", "=", 1], ["b", "=", 2]]), json!(["c", "=", 3])];
        let executor = build_executor(&registry(), &items).unwrap();
        match executor {
            Executor::Group(children) => assert_eq!(children.len(), 2),
            Executor::Base(_) => panic!("expected a group"),
        }
    }
}
