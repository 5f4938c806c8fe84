use std::fmt;
use std::sync::Arc;

use crate::eval::Eval;
use crate::ops::{Operation, Prepared};
use crate::types::error::EvalError;
use crate::types::subject::Subject;
use crate::vars::Variable;

/// Combinator applied to a group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
    Not,
}

impl Logic {
    /// The reserved rule-config keyword for this logic, and back.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Logic> {
        match word {
            "and" => Some(Logic::And),
            "or" => Some(Logic::Or),
            "not" => Some(Logic::Not),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "and",
            Logic::Or => "or",
            Logic::Not => "not",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `[variable, operation, value]` predicate with its prepared operand.
pub struct BaseCondition {
    pub(crate) variable: Arc<dyn Variable>,
    pub(crate) operation: Arc<dyn Operation>,
    pub(crate) prepared: Prepared,
}

impl BaseCondition {
    pub(crate) fn new(
        variable: Arc<dyn Variable>,
        operation: Arc<dyn Operation>,
        prepared: Prepared,
    ) -> Self {
        Self {
            variable,
            operation,
            prepared,
        }
    }
}

/// A boolean expression tree over predicates.
///
/// Built once per rule config by [`build_condition`](crate::build_condition)
/// and immutable afterwards.
pub enum Condition {
    Base(BaseCondition),
    Group { logic: Logic, children: Vec<Condition> },
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Base(_) => f.write_str("Condition::Base(..)"),
            Condition::Group { logic, children } => f
                .debug_struct("Condition::Group")
                .field("logic", logic)
                .field("children", children)
                .finish(),
        }
    }
}

impl Condition {
    /// Evaluate the tree. Children are visited in order with the usual
    /// short-circuits: a false child ends an `and` group, a true child ends
    /// an `or` group (true) or a `not` group (false). A group the loop runs
    /// off the end of (an empty one included) is true.
    ///
    /// # Errors
    ///
    /// A child's resolution error short-circuits and propagates; the truth
    /// value is indeterminate, not false.
    pub fn is_ok(&self, ev: &Eval<'_>, subject: &dyn Subject) -> Result<bool, EvalError> {
        match self {
            Condition::Base(base) => {
                base.operation
                    .test(ev, subject, base.variable.as_ref(), &base.prepared)
            }
            Condition::Group { logic, children } => {
                for child in children {
                    let ok = child.is_ok(ev, subject)?;
                    match logic {
                        Logic::And if !ok => return Ok(false),
                        Logic::Or if ok => return Ok(true),
                        Logic::Not if ok => return Ok(false),
                        _ => {}
                    }
                }
                Ok(true)
            }
        }
    }
}
