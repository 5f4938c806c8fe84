use std::sync::Arc;

use serde_json::Value;

use crate::assign::Assignment;
use crate::eval::Eval;
use crate::types::error::EvalError;
use crate::types::subject::Subject;

/// One `[path, assignment, value]` action with its prepared operand.
pub struct BaseExecutor {
    pub(crate) key: String,
    pub(crate) assignment: Arc<dyn Assignment>,
    pub(crate) prepared: Value,
}

impl BaseExecutor {
    pub(crate) fn new(key: String, assignment: Arc<dyn Assignment>, prepared: Value) -> Self {
        Self {
            key,
            assignment,
            prepared,
        }
    }
}

/// An ordered tree of actions, run when a filter's condition holds.
pub enum Executor {
    Base(BaseExecutor),
    Group(Vec<Executor>),
}

impl Executor {
    /// Run the actions strictly in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first failing action's error; later siblings do not run.
    pub fn execute(&self, ev: &Eval<'_>, subject: &mut dyn Subject) -> Result<(), EvalError> {
        match self {
            Executor::Base(base) => {
                base.assignment
                    .apply(ev, subject, &base.key, &base.prepared)
            }
            Executor::Group(children) => {
                for child in children {
                    child.execute(ev, subject)?;
                }
                Ok(())
            }
        }
    }
}
