use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Subscriber {
    /// Expects an already normalized address (see [`normalize_email`]).
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            subscribed_at: now,
            created_at: now,
        }
    }
}

/// Trim and lower-case so uniqueness does not depend on how the address was typed.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Loose shape check: one `@`, something before it, a dotted domain after it.
pub fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ana@example.com"));
        assert!(looks_like_email("a.b+news@mail.example.org"));
        assert!(!looks_like_email("ana"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ana@localhost"));
        assert!(!looks_like_email("ana@@example.com"));
        assert!(!looks_like_email("ana@example.com."));
        assert!(!looks_like_email("an a@example.com"));
    }
}
