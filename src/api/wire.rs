//! JSON bodies exchanged with the chat service.

use serde::{Deserialize, Serialize};

use crate::domain::message::Message;

#[derive(Debug, Serialize)]
pub struct CredentialsBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub poster: String,
    #[serde(default)]
    pub created: String,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self {
            id: wire.id,
            title: wire.title,
            content: wire.content,
            poster: wire.poster,
            created: wire.created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewMessageBody<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    #[serde(default)]
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_message_page_ignoring_unknown_fields() {
        let raw = r#"{
            "page": 1,
            "messages": [
                {
                    "id": 1042,
                    "poster": "bucky",
                    "title": "Library hours",
                    "content": "Open till 2am tonight",
                    "chatroom": "Memorial",
                    "created": "2023-11-20T10:00:00.000Z"
                }
            ]
        }"#;

        let response: MessagesResponse = serde_json::from_str(raw).expect("must decode");
        let messages: Vec<Message> = response.messages.into_iter().map(Into::into).collect();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, 1042);
        assert_eq!(messages[0].poster, "bucky");
        assert_eq!(messages[0].title, "Library hours");
    }

    #[test]
    fn missing_messages_field_reads_as_empty_page() {
        let response: MessagesResponse = serde_json::from_str("{}").expect("must decode");

        assert!(response.messages.is_empty());
    }

    #[test]
    fn credentials_body_has_expected_shape() {
        let body = CredentialsBody {
            username: "bucky",
            password: "pw",
        };

        let value = serde_json::to_value(&body).expect("must encode");

        assert_eq!(
            value,
            serde_json::json!({ "username": "bucky", "password": "pw" })
        );
    }

    #[test]
    fn created_response_tolerates_missing_msg() {
        let created: CreatedResponse = serde_json::from_str(r#"{"id": 7}"#).expect("decode");

        assert_eq!(created.id, 7);
        assert_eq!(created.msg, "");
    }
}
