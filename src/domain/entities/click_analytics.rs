//! Click record captured for each resolved redirect.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::EntityError;

/// Maximum length of an IP address (fits IPv6 text form).
pub const MAX_IP_ADDRESS_LENGTH: usize = 45;

/// Maximum stored length of a User-Agent header.
pub const MAX_USER_AGENT_LENGTH: usize = 512;

/// Maximum stored length of a Referer header.
pub const MAX_REFERRER_LENGTH: usize = 2048;

/// A single click on a shortened URL.
///
/// Immutable once created. `country` and `city` are part of the record but
/// are never populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickAnalytics {
    id: Uuid,
    shortened_url_id: Uuid,
    ip_address: String,
    user_agent: Option<String>,
    referrer: Option<String>,
    clicked_at: DateTime<Utc>,
    country: Option<String>,
    city: Option<String>,
}

impl ClickAnalytics {
    /// Creates a click record stamped with the current time.
    ///
    /// Oversized `user_agent` and `referrer` values are truncated to their
    /// column limits.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] if `ip_address` is empty or longer than 45
    /// characters.
    pub fn create(
        shortened_url_id: Uuid,
        ip_address: impl Into<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Result<Self, EntityError> {
        let ip_address = ip_address.into();

        if ip_address.trim().is_empty() {
            return Err(EntityError::EmptyIpAddress);
        }
        if ip_address.chars().count() > MAX_IP_ADDRESS_LENGTH {
            return Err(EntityError::TooLong {
                field: "ip_address",
                max: MAX_IP_ADDRESS_LENGTH,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            shortened_url_id,
            ip_address,
            user_agent: user_agent.map(|ua| truncate(ua, MAX_USER_AGENT_LENGTH)),
            referrer: referrer.map(|r| truncate(r, MAX_REFERRER_LENGTH)),
            clicked_at: Utc::now(),
            country: None,
            city: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn shortened_url_id(&self) -> Uuid {
        self.shortened_url_id
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    pub fn clicked_at(&self) -> DateTime<Utc> {
        self.clicked_at
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
