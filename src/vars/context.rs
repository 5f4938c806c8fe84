//! Variables that read fixed request attributes.

use serde_json::{json, Value};

use super::Variable;
use crate::eval::Eval;
use crate::types::error::EvalError;
use crate::types::subject::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextField {
    Ip,
    Uid,
    Device,
    Platform,
    Channel,
    UserAgent,
    Referer,
    Version,
    UserTag,
    IsLogin,
}

impl ContextField {
    pub(crate) const ALL: [ContextField; 10] = [
        ContextField::Ip,
        ContextField::Uid,
        ContextField::Device,
        ContextField::Platform,
        ContextField::Channel,
        ContextField::UserAgent,
        ContextField::Referer,
        ContextField::Version,
        ContextField::UserTag,
        ContextField::IsLogin,
    ];

    fn name(self) -> &'static str {
        match self {
            ContextField::Ip => "ip",
            ContextField::Uid => "uid",
            ContextField::Device => "device",
            ContextField::Platform => "platform",
            ContextField::Channel => "channel",
            ContextField::UserAgent => "ua",
            ContextField::Referer => "referer",
            ContextField::Version => "version",
            ContextField::UserTag => "user_tag",
            ContextField::IsLogin => "is_login",
        }
    }
}

/// Reads one attribute off the request context. Absent attributes are an
/// error, except `is_login`, which treats a missing or empty user id as
/// "not logged in".
pub(crate) struct ContextVariable {
    field: ContextField,
}

impl ContextVariable {
    pub(crate) fn new(field: ContextField) -> Self {
        Self { field }
    }
}

impl Variable for ContextVariable {
    fn name(&self) -> &str {
        self.field.name()
    }

    fn cacheable(&self) -> bool {
        true
    }

    fn resolve(&self, ev: &Eval<'_>, _subject: &dyn Subject) -> Result<Value, EvalError> {
        let ctx = ev.request();
        let missing = || EvalError::MissingContext {
            name: self.field.name().to_owned(),
        };
        match self.field {
            ContextField::Ip => ctx.ip().map(Value::from).ok_or_else(missing),
            ContextField::Uid => ctx.user_id().map(Value::from).ok_or_else(missing),
            ContextField::Device => ctx.device().map(Value::from).ok_or_else(missing),
            ContextField::Platform => ctx.platform().map(Value::from).ok_or_else(missing),
            ContextField::Channel => ctx.channel().map(Value::from).ok_or_else(missing),
            ContextField::UserAgent => ctx.user_agent().map(Value::from).ok_or_else(missing),
            ContextField::Referer => ctx.referer().map(Value::from).ok_or_else(missing),
            ContextField::Version => ctx.version().map(Value::from).ok_or_else(missing),
            ContextField::UserTag => ctx
                .user_tags()
                .map(|tags| json!(tags))
                .ok_or_else(missing),
            ContextField::IsLogin => Ok(Value::Bool(
                ctx.user_id().is_some_and(|id| !id.is_empty()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::cache::Cache;
    use crate::types::context::RequestContext;

    fn resolve(ctx: &RequestContext, name: &str) -> Result<Value, EvalError> {
        let registry = Registry::with_builtins();
        let cache = Cache::disabled();
        let ev = Eval::new(&registry, ctx, &cache);
        let subject = json!({});
        ev.resolve_name(name, &subject)
    }

    #[test]
    fn reads_present_attributes() {
        let ctx = RequestContext::new()
            .with_ip("203.0.113.9")
            .with_platform("ios")
            .with_user_tags(["beta"]);
        assert_eq!(resolve(&ctx, "ip").unwrap(), json!("203.0.113.9"));
        assert_eq!(resolve(&ctx, "platform").unwrap(), json!("ios"));
        assert_eq!(resolve(&ctx, "user_tag").unwrap(), json!(["beta"]));
    }

    #[test]
    fn absent_attribute_is_an_error() {
        let ctx = RequestContext::new();
        let err = resolve(&ctx, "device").unwrap_err();
        assert_eq!(err.to_string(), "'device' not found in context");
    }

    #[test]
    fn is_login_defaults_to_false() {
        let ctx = RequestContext::new();
        assert_eq!(resolve(&ctx, "is_login").unwrap(), json!(false));

        let ctx = RequestContext::new().with_user_id("");
        assert_eq!(resolve(&ctx, "is_login").unwrap(), json!(false));

        let ctx = RequestContext::new().with_user_id("u1");
        assert_eq!(resolve(&ctx, "is_login").unwrap(), json!(true));
    }
}
