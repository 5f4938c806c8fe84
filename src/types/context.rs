use std::collections::HashMap;

use serde_json::Value;

/// Request attributes the built-in context variables read from.
///
/// Callers populate what they know about the request up front; anything not
/// covered by a typed field goes into the raw `extra` map, where the
/// `ctx.<key>` variable family finds it.
///
/// # Example
///
/// ```
/// use sift::RequestContext;
///
/// let ctx = RequestContext::new()
///     .with_user_id("u-1001")
///     .with_ip("203.0.113.7")
///     .with_platform("ios")
///     .with_extra("ab_bucket", 3);
/// assert_eq!(ctx.user_id(), Some("u-1001"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    user_id: Option<String>,
    device: Option<String>,
    ip: Option<String>,
    version: Option<String>,
    platform: Option<String>,
    channel: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
    user_tags: Option<Vec<String>>,
    extra: HashMap<String, Value>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    #[must_use]
    pub fn with_user_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.user_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a raw key/value pair for `ctx.<key>` lookups.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    #[must_use]
    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    #[must_use]
    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    #[must_use]
    pub fn user_tags(&self) -> Option<&[String]> {
        self.user_tags.as_deref()
    }

    /// Raw lookup into the `extra` map.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_chaining() {
        let ctx = RequestContext::new()
            .with_user_id("u1")
            .with_ip("10.0.0.1")
            .with_device("pixel-9")
            .with_platform("android")
            .with_channel("organic")
            .with_version("2.4.0")
            .with_user_agent("Mozilla/5.0")
            .with_referer("https://example.com")
            .with_user_tags(["beta", "vip"]);

        assert_eq!(ctx.user_id(), Some("u1"));
        assert_eq!(ctx.ip(), Some("10.0.0.1"));
        assert_eq!(ctx.device(), Some("pixel-9"));
        assert_eq!(ctx.platform(), Some("android"));
        assert_eq!(ctx.channel(), Some("organic"));
        assert_eq!(ctx.version(), Some("2.4.0"));
        assert_eq!(ctx.user_agent(), Some("Mozilla/5.0"));
        assert_eq!(ctx.referer(), Some("https://example.com"));
        assert_eq!(
            ctx.user_tags(),
            Some(&["beta".to_owned(), "vip".to_owned()][..])
        );
    }

    #[test]
    fn empty_context_has_nothing() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.user_id(), None);
        assert_eq!(ctx.ip(), None);
        assert_eq!(ctx.user_tags(), None);
        assert_eq!(ctx.extra("anything"), None);
    }

    #[test]
    fn extra_values() {
        let ctx = RequestContext::new()
            .with_extra("bucket", 7)
            .with_extra("flag", true);
        assert_eq!(ctx.extra("bucket"), Some(&json!(7)));
        assert_eq!(ctx.extra("flag"), Some(&json!(true)));
    }
}
