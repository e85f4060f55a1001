use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub poster: String,
    /// Creation time as sent by the server (RFC 3339).
    pub created: String,
}

impl Message {
    /// Only the author may delete a message. Guests own nothing.
    pub fn is_deletable_by(&self, username: Option<&str>) -> bool {
        username.is_some_and(|name| name == self.poster)
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created).ok()
    }
}

/// A message paired with the current user's right to delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub message: Message,
    pub deletable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(poster: &str, created: &str) -> Message {
        Message {
            id: 7,
            title: "Hello".to_owned(),
            content: "World".to_owned(),
            poster: poster.to_owned(),
            created: created.to_owned(),
        }
    }

    #[test]
    fn author_can_delete_own_message() {
        let message = msg("bucky", "2023-11-20T10:00:00.000Z");

        assert!(message.is_deletable_by(Some("bucky")));
        assert!(!message.is_deletable_by(Some("becky")));
    }

    #[test]
    fn guest_cannot_delete_anything() {
        let message = msg("bucky", "2023-11-20T10:00:00.000Z");

        assert!(!message.is_deletable_by(None));
    }

    #[test]
    fn parses_server_timestamp() {
        let message = msg("bucky", "2023-11-20T10:00:00.000Z");

        let created = message.created_at().expect("timestamp should parse");
        assert_eq!(created.timestamp(), 1_700_474_400);
    }

    #[test]
    fn malformed_timestamp_yields_none() {
        assert!(msg("bucky", "yesterday").created_at().is_none());
    }
}
