use thiserror::Error;

use crate::path::PathError;

/// Errors raised while building condition/executor trees from rule configs.
///
/// A build error means the rule must not be installed; nothing here is
/// recoverable at evaluation time.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("rule must be a non-empty array of conditions followed by an action list, got {got}")]
    MalformedRule { got: String },

    #[error("condition must be a [variable, operation, value] triple, got {got}")]
    MalformedCondition { got: String },

    #[error("action must be a [path, assignment, value] triple, got {got}")]
    MalformedAction { got: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },

    #[error("unknown assignment '{name}'")]
    UnknownAssignment { name: String },

    #[error("'{logic}' group requires a non-empty array of conditions")]
    EmptyGroup { logic: String },

    #[error("operation '{operation}' rejects its value: {detail}")]
    InvalidOperand { operation: String, detail: String },

    #[error("filter '{id}' failed to build: {source}")]
    Filter {
        id: String,
        #[source]
        source: Box<BuildError>,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while evaluating a built filter against a subject.
///
/// A variable that fails to resolve makes the rule's truth value
/// indeterminate; the error propagates instead of defaulting to false.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("'{name}' not found in context")]
    MissingContext { name: String },

    #[error("variable '{name}' failed to resolve: {detail}")]
    Resolve { name: String, detail: String },

    #[error("'{path}' not found in data")]
    MissingData { path: String },

    #[error("calc expression '{expr}' failed: {detail}")]
    Calc { expr: String, detail: String },

    #[error("operation '{operation}' got an unusable value: {detail}")]
    Operand { operation: String, detail: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variable_message() {
        let err = BuildError::UnknownVariable {
            name: "speed".into(),
        };
        assert_eq!(err.to_string(), "unknown variable 'speed'");
    }

    #[test]
    fn unknown_operation_message() {
        let err = BuildError::UnknownOperation { name: "=~=".into() };
        assert_eq!(err.to_string(), "unknown operation '=~='");
    }

    #[test]
    fn empty_group_message() {
        let err = BuildError::EmptyGroup { logic: "or".into() };
        assert_eq!(
            err.to_string(),
            "'or' group requires a non-empty array of conditions"
        );
    }

    #[test]
    fn invalid_operand_message() {
        let err = BuildError::InvalidOperand {
            operation: "between".into(),
            detail: "expected [lo, hi]".into(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'between' rejects its value: expected [lo, hi]"
        );
    }

    #[test]
    fn filter_message_carries_id() {
        let err = BuildError::Filter {
            id: "rule-7".into(),
            source: Box::new(BuildError::UnknownVariable { name: "x".into() }),
        };
        assert_eq!(
            err.to_string(),
            "filter 'rule-7' failed to build: unknown variable 'x'"
        );
    }

    #[test]
    fn missing_context_message() {
        let err = EvalError::MissingContext { name: "ip".into() };
        assert_eq!(err.to_string(), "'ip' not found in context");
    }

    #[test]
    fn missing_data_message() {
        let err = EvalError::MissingData {
            path: "user.age".into(),
        };
        assert_eq!(err.to_string(), "'user.age' not found in data");
    }
}
