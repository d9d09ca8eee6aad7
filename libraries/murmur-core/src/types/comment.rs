/// Comment domain type
use super::CommentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-submitted comment with its like counter
///
/// Serializes as `{id, text, created_at, likes}` with `created_at` in
/// RFC 3339 (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,

    /// Comment body, 1-140 characters
    pub text: String,

    /// Creation timestamp (server clock)
    pub created_at: DateTime<Utc>,

    /// Number of likes, never negative
    pub likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Comment {
        Comment {
            id: CommentId::new(42),
            text: "hello, world".to_string(),
            created_at: Utc
                .timestamp_opt(1_760_000_000, 123_456_000)
                .single()
                .unwrap(),
            likes: 7,
        }
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["id"], 42);
        assert_eq!(value["text"], "hello, world");
        assert_eq!(value["likes"], 7);
        assert_eq!(value["created_at"], "2025-10-09T08:53:20.123456Z");
    }

    #[test]
    fn test_json_round_trip_preserves_instant() {
        let original = sample();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Comment = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, original.id);
        assert_eq!(parsed.text, original.text);
        assert_eq!(parsed.likes, original.likes);
        assert_eq!(parsed.created_at, original.created_at);
    }
}
