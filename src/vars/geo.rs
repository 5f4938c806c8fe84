//! Geolocation variables: `country`, `province`, `city`.
//!
//! The actual reverse lookup is a caller-injected collaborator; these
//! variables resolve the `ip` variable first and hand its value to the
//! lookup. They are cacheable, so one evaluation performs at most one
//! lookup per field even when several conditions reference it.

use std::sync::Arc;

use serde_json::Value;

use super::Variable;
use crate::eval::Eval;
use crate::types::error::EvalError;
use crate::types::subject::Subject;
use crate::types::value::to_text;

/// The result of a reverse IP lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: String,
    pub province: String,
    pub city: String,
}

/// Reverse IP geolocation, supplied by the caller.
pub trait GeoLookup: Send + Sync {
    /// Locate an IP address.
    ///
    /// # Errors
    ///
    /// Reports lookup failure; the engine propagates it unchanged.
    fn locate(&self, ip: &str) -> Result<GeoInfo, EvalError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeoField {
    Country,
    Province,
    City,
}

impl GeoField {
    pub(crate) const ALL: [GeoField; 3] = [GeoField::Country, GeoField::Province, GeoField::City];

    fn name(self) -> &'static str {
        match self {
            GeoField::Country => "country",
            GeoField::Province => "province",
            GeoField::City => "city",
        }
    }
}

pub(crate) struct GeoVariable {
    field: GeoField,
    lookup: Arc<dyn GeoLookup>,
}

impl GeoVariable {
    pub(crate) fn new(field: GeoField, lookup: Arc<dyn GeoLookup>) -> Self {
        Self { field, lookup }
    }
}

impl Variable for GeoVariable {
    fn name(&self) -> &str {
        self.field.name()
    }

    fn cacheable(&self) -> bool {
        true
    }

    fn resolve(&self, ev: &Eval<'_>, subject: &dyn Subject) -> Result<Value, EvalError> {
        let ip = ev.resolve_name("ip", subject)?;
        let info = self.lookup.locate(&to_text(&ip))?;
        Ok(Value::from(match self.field {
            GeoField::Country => info.country,
            GeoField::Province => info.province,
            GeoField::City => info.city,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::cache::Cache;
    use crate::types::context::RequestContext;
    use crate::vars::register_geo;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TableLookup {
        calls: AtomicUsize,
    }

    impl GeoLookup for TableLookup {
        fn locate(&self, ip: &str) -> Result<GeoInfo, EvalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match ip {
                "203.0.113.9" => Ok(GeoInfo {
                    country: "CN".into(),
                    province: "zhejiang".into(),
                    city: "hangzhou".into(),
                }),
                other => Err(EvalError::Resolve {
                    name: "country".into(),
                    detail: format!("no geo record for {other}"),
                }),
            }
        }
    }

    fn geo_registry() -> (Registry, Arc<TableLookup>) {
        let mut registry = Registry::with_builtins();
        let lookup = Arc::new(TableLookup {
            calls: AtomicUsize::new(0),
        });
        register_geo(&mut registry, Arc::clone(&lookup) as Arc<dyn GeoLookup>);
        (registry, lookup)
    }

    #[test]
    fn resolves_through_ip_variable() {
        let (registry, _) = geo_registry();
        let request = RequestContext::new().with_ip("203.0.113.9");
        let cache = Cache::new();
        let ev = Eval::new(&registry, &request, &cache);
        let subject = json!({});
        assert_eq!(ev.resolve_name("country", &subject).unwrap(), json!("CN"));
        assert_eq!(ev.resolve_name("city", &subject).unwrap(), json!("hangzhou"));
    }

    #[test]
    fn missing_ip_propagates() {
        let (registry, _) = geo_registry();
        let request = RequestContext::new();
        let cache = Cache::new();
        let ev = Eval::new(&registry, &request, &cache);
        let subject = json!({});
        let err = ev.resolve_name("province", &subject).unwrap_err();
        assert_eq!(err.to_string(), "'ip' not found in context");
    }

    #[test]
    fn lookup_failure_propagates() {
        let (registry, _) = geo_registry();
        let request = RequestContext::new().with_ip("198.51.100.1");
        let cache = Cache::new();
        let ev = Eval::new(&registry, &request, &cache);
        let subject = json!({});
        assert!(ev.resolve_name("country", &subject).is_err());
    }

    #[test]
    fn cached_within_one_evaluation() {
        let (registry, lookup) = geo_registry();
        let request = RequestContext::new().with_ip("203.0.113.9");
        let cache = Cache::new();
        let ev = Eval::new(&registry, &request, &cache);
        let subject = json!({});
        ev.resolve_name("country", &subject).unwrap();
        ev.resolve_name("country", &subject).unwrap();
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}
