//! Click event model for asynchronous click tracking.

use uuid::Uuid;

/// An in-memory representation of a click waiting to be recorded.
///
/// Redirects build one of these and push it onto the bounded click queue;
/// [`crate::application::click_worker::run_click_worker`] turns it into a
/// [`crate::domain::entities::ClickAnalytics`] record. The event owns all of
/// its data, so it is unaffected by the originating request being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub url_id: Uuid,
    pub ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Request metadata captured at redirect time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickContext {
    pub ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl ClickContext {
    /// Creates a context from raw header values.
    pub fn new(ip: impl Into<String>, user_agent: Option<&str>, referrer: Option<&str>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.map(str::to_string),
            referrer: referrer.map(str::to_string),
        }
    }
}

impl ClickEvent {
    /// Binds a request context to the resolved URL.
    pub fn new(url_id: Uuid, context: ClickContext) -> Self {
        Self {
            url_id,
            ip: context.ip,
            user_agent: context.user_agent,
            referrer: context.referrer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_from_context() {
        let url_id = Uuid::new_v4();
        let context = ClickContext::new("192.168.1.1", Some("Mozilla/5.0"), Some("https://google.com"));

        let event = ClickEvent::new(url_id, context);

        assert_eq!(event.url_id, url_id);
        assert_eq!(event.ip, "192.168.1.1");
        assert_eq!(event.user_agent, Some("Mozilla/5.0".to_string()));
        assert_eq!(event.referrer, Some("https://google.com".to_string()));
    }

    #[test]
    fn test_click_context_minimal() {
        let context = ClickContext::new("10.0.0.1", None, None);

        assert_eq!(context.ip, "10.0.0.1");
        assert!(context.user_agent.is_none());
        assert!(context.referrer.is_none());
    }
}
