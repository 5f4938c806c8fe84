use std::fmt;

use crate::eval::Eval;
use crate::types::condition::Condition;
use crate::types::error::EvalError;
use crate::types::executor::Executor;
use crate::types::subject::Subject;

/// One rule: a condition paired with the actions to run when it holds.
///
/// Built once per rule config by [`build_filter`](crate::build_filter) and
/// immutable afterwards; safe to share behind `Arc`.
pub struct Filter {
    condition: Condition,
    executor: Executor,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

impl Filter {
    #[must_use]
    pub fn new(condition: Condition, executor: Executor) -> Self {
        Self {
            condition,
            executor,
        }
    }

    /// Evaluate the condition and, only if it holds, run the actions
    /// against the subject. Returns whether the filter fired.
    ///
    /// # Errors
    ///
    /// Both a condition that cannot be resolved and an action that fails to
    /// apply surface here; a mutation failure is never silently dropped.
    pub fn run(&self, ev: &Eval<'_>, subject: &mut dyn Subject) -> Result<bool, EvalError> {
        if !self.condition.is_ok(ev, &*subject)? {
            return Ok(false);
        }
        self.executor.execute(ev, subject)?;
        Ok(true)
    }
}
