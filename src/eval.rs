//! The per-evaluation environment threaded through conditions and actions.

use serde_json::Value;

use crate::registry::Registry;
use crate::types::cache::Cache;
use crate::types::context::RequestContext;
use crate::types::error::EvalError;
use crate::types::subject::Subject;
use crate::vars::Variable;

/// Everything one evaluation pass needs: the plugin registry, the request's
/// attributes, and a fresh [`Cache`].
///
/// Construct one per logical evaluation (typically per inbound request) and
/// pass it to [`Filter::run`](crate::Filter::run) or
/// [`GroupFilter::run`](crate::GroupFilter::run).
#[derive(Clone, Copy)]
pub struct Eval<'a> {
    registry: &'a Registry,
    request: &'a RequestContext,
    cache: &'a Cache,
}

impl<'a> Eval<'a> {
    #[must_use]
    pub fn new(registry: &'a Registry, request: &'a RequestContext, cache: &'a Cache) -> Self {
        Self {
            registry,
            request,
            cache,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[must_use]
    pub fn request(&self) -> &'a RequestContext {
        self.request
    }

    #[must_use]
    pub fn cache(&self) -> &'a Cache {
        self.cache
    }

    /// Resolve a variable's value, memoizing through the cache.
    ///
    /// A cacheable variable is invoked at most once per cache instance; its
    /// later resolutions are served from the memo. Non-cacheable variables
    /// (wall clock, randomness, per-call externals) are invoked every time.
    ///
    /// # Errors
    ///
    /// Propagates whatever the variable's source reports.
    pub fn resolve(
        &self,
        variable: &dyn Variable,
        subject: &dyn Subject,
    ) -> Result<Value, EvalError> {
        let cacheable = variable.cacheable();
        if cacheable {
            if let Some(hit) = self.cache.get(variable.name()) {
                return Ok(hit);
            }
        }
        let value = variable.resolve(self, subject)?;
        if cacheable {
            self.cache.put(variable.name(), value.clone());
        }
        Ok(value)
    }

    /// Look a variable up by name and resolve it.
    ///
    /// Used by variables that depend on other variables (geo lookups resolve
    /// `ip` first; calc expressions resolve free identifiers).
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Resolve`] for a name the registry does not know.
    pub fn resolve_name(&self, name: &str, subject: &dyn Subject) -> Result<Value, EvalError> {
        let variable = self
            .registry
            .variable(name)
            .ok_or_else(|| EvalError::Resolve {
                name: name.to_owned(),
                detail: "not registered".to_owned(),
            })?;
        self.resolve(variable.as_ref(), subject)
    }
}
