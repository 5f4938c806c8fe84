//! The plugin registry: variables, operations, assignments, and the prefix
//! table for parametrized variable families.
//!
//! A registry is built once at process start and shared immutably afterwards
//! (`&Registry` or `Arc<Registry>`); lookups need no synchronization.
//! Registering a duplicate or empty name panics: that is a build
//! misconfiguration, not a runtime condition.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::assign::{self, Assignment};
use crate::calc::Calculator;
use crate::ops::{self, Operation};
use crate::vars::{self, Variable};

/// The closed set of prefix-parametrized variable families.
///
/// A name like `data.user.age` matches the `data.` prefix; the remainder
/// becomes the constructed variable's sub-key.
#[derive(Clone)]
pub enum PrefixKind {
    /// `data.<path>`: read `<path>` out of the subject via the path engine.
    Data,
    /// `ctx.<key>`: read a raw key from the request context's extra map.
    Ctx,
    /// `freq.<key>`: ask the subject's frequency capability, default `0`.
    Freq,
    /// `calc.<expr>`: evaluate an arithmetic expression via the calculator.
    Calc(Arc<dyn Calculator>),
}

impl PrefixKind {
    fn build(&self, full_name: &str, prefix: &str) -> Arc<dyn Variable> {
        let key = full_name[prefix.len()..].to_owned();
        match self {
            PrefixKind::Data => Arc::new(vars::DataVariable::new(full_name, key)),
            PrefixKind::Ctx => Arc::new(vars::CtxVariable::new(full_name, key)),
            PrefixKind::Freq => Arc::new(vars::FreqVariable::new(full_name, key)),
            PrefixKind::Calc(calculator) => Arc::new(vars::CalcVariable::new(
                full_name,
                key,
                Arc::clone(calculator),
            )),
        }
    }
}

impl fmt::Debug for PrefixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrefixKind::Data => "Data",
            PrefixKind::Ctx => "Ctx",
            PrefixKind::Freq => "Freq",
            PrefixKind::Calc(_) => "Calc",
        };
        write!(f, "PrefixKind::{s}")
    }
}

#[derive(Default)]
pub struct Registry {
    variables: HashMap<String, Arc<dyn Variable>>,
    prefixes: HashMap<String, PrefixKind>,
    operations: HashMap<String, Arc<dyn Operation>>,
    assignments: HashMap<String, Arc<dyn Assignment>>,
}

impl Registry {
    /// An empty registry. Most callers want [`Registry::with_builtins`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry carrying the standard variables, operations, assignments,
    /// and prefix families.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        vars::register_builtins(&mut registry);
        ops::register_builtins(&mut registry);
        assign::register_builtins(&mut registry);
        registry
    }

    /// Register a fixed-name variable under its own name.
    ///
    /// # Panics
    ///
    /// Panics on an empty or duplicate name.
    pub fn register_variable(&mut self, variable: Arc<dyn Variable>) {
        let name = variable.name().to_owned();
        assert!(!name.is_empty(), "variable name must not be empty");
        let prev = self.variables.insert(name.clone(), variable);
        assert!(prev.is_none(), "duplicate variable '{name}'");
    }

    /// Register a prefix family. The prefix must end in `'.'`.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or duplicate prefix.
    pub fn register_prefix(&mut self, prefix: &str, kind: PrefixKind) {
        assert!(
            prefix.len() > 1 && prefix.ends_with('.'),
            "prefix '{prefix}' must be non-empty and end with '.'"
        );
        let prev = self.prefixes.insert(prefix.to_owned(), kind);
        assert!(prev.is_none(), "duplicate prefix '{prefix}'");
    }

    /// Register an operation under `name`. Aliases are separate
    /// registrations of the same instance.
    ///
    /// # Panics
    ///
    /// Panics on an empty or duplicate name.
    pub fn register_operation(&mut self, name: &str, operation: Arc<dyn Operation>) {
        assert!(!name.is_empty(), "operation name must not be empty");
        let prev = self.operations.insert(name.to_owned(), operation);
        assert!(prev.is_none(), "duplicate operation '{name}'");
    }

    /// Register an assignment under `name`.
    ///
    /// # Panics
    ///
    /// Panics on an empty or duplicate name.
    pub fn register_assignment(&mut self, name: &str, assignment: Arc<dyn Assignment>) {
        assert!(!name.is_empty(), "assignment name must not be empty");
        let prev = self.assignments.insert(name.to_owned(), assignment);
        assert!(prev.is_none(), "duplicate assignment '{name}'");
    }

    /// Look up a variable: exact name first, then the prefix table keyed on
    /// the substring before the first `'.'` (plus the dot). A prefix match
    /// constructs a fresh parametrized instance carrying the remainder.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<Arc<dyn Variable>> {
        if let Some(variable) = self.variables.get(name) {
            return Some(Arc::clone(variable));
        }
        let head = name.split('.').next()?;
        if head.len() == name.len() {
            return None;
        }
        let prefix = format!("{head}.");
        let kind = self.prefixes.get(&prefix)?;
        Some(kind.build(name, &prefix))
    }

    #[must_use]
    pub fn operation(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).map(Arc::clone)
    }

    #[must_use]
    pub fn assignment(&self, name: &str) -> Option<Arc<dyn Assignment>> {
        self.assignments.get(name).map(Arc::clone)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registry({} variables, {} prefixes, {} operations, {} assignments)",
            self.variables.len(),
            self.prefixes.len(),
            self.operations.len(),
            self.assignments.len(),
        )
    }
}
