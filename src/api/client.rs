use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, RequestBuilder, Response, Url,
};
use serde::de::DeserializeOwned;

use crate::{
    api::wire::{
        CreatedResponse, CredentialsBody, MessagesResponse, NewMessageBody, TokenResponse,
    },
    domain::message::Message,
    infra::{config::ApiConfig, error::AppError, secrets::redact_text},
    usecases::{
        chatrooms::ChatroomsSource,
        contracts::ApiError,
        feed::{MessagesApi, NewMessage, PostReceipt},
        session::AuthApi,
    },
};

const CLIENT_ID_HEADER: &str = "x-cs571-id";

/// Client for the chat service's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: Url,
}

impl HttpChatApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CLIENT_ID_HEADER),
            HeaderValue::from_str(&config.client_id)
                .map_err(|error| AppError::InvalidClientId(error.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url
    }

    fn messages_url(&self, room: Option<&str>, page: Option<u32>) -> Url {
        let mut url = self.endpoint("messages");
        {
            let mut query = url.query_pairs_mut();
            if let Some(room) = room {
                query.append_pair("chatroom", room);
            }
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
        }
        url
    }

    fn message_url(&self, id: i64) -> Url {
        let mut url = self.endpoint("messages");
        url.query_pairs_mut().append_pair("id", &id.to_string());
        url
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.endpoint(path))
            .json(&CredentialsBody { username, password });

        let response: TokenResponse = decode(send(request).await?).await?;
        Ok(response.token)
    }
}

#[async_trait]
impl AuthApi for HttpChatApi {
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.authenticate("login", username, password).await
    }

    async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        self.authenticate("register", username, password).await
    }
}

#[async_trait]
impl ChatroomsSource for HttpChatApi {
    async fn list_chatrooms(&self) -> Result<Vec<String>, ApiError> {
        let request = self.client.get(self.endpoint("chatrooms"));
        decode(send(request).await?).await
    }
}

#[async_trait]
impl MessagesApi for HttpChatApi {
    async fn list_messages(&self, room: &str, page: u32) -> Result<Vec<Message>, ApiError> {
        let request = self.client.get(self.messages_url(Some(room), Some(page)));
        let response: MessagesResponse = decode(send(request).await?).await?;

        Ok(response.messages.into_iter().map(Message::from).collect())
    }

    async fn create_message(
        &self,
        room: &str,
        token: Option<&str>,
        message: &NewMessage,
    ) -> Result<PostReceipt, ApiError> {
        let request = with_bearer(
            self.client.post(self.messages_url(Some(room), None)),
            token,
        )
        .json(&NewMessageBody {
            title: &message.title,
            content: &message.content,
        });

        let created: CreatedResponse = decode(send(request).await?).await?;
        Ok(PostReceipt {
            id: created.id,
            notice: created.msg,
        })
    }

    async fn delete_message(&self, id: i64, token: Option<&str>) -> Result<(), ApiError> {
        let request = with_bearer(self.client.delete(self.message_url(id)), token);
        send(request).await?;
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw).map_err(|error| AppError::InvalidBaseUrl {
        url: raw.to_owned(),
        details: error.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(AppError::InvalidBaseUrl {
            url: raw.to_owned(),
            details: "url cannot be used as a base".to_owned(),
        });
    }

    Ok(url)
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|error| ApiError::Transport(redact_text(&error.to_string())))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(status_error(status.as_u16()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|error| ApiError::InvalidData(error.to_string()))
}

fn status_error(status: u16) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized,
        409 => ApiError::Conflict,
        other => ApiError::Status(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpChatApi {
        HttpChatApi::new(&ApiConfig {
            base_url: base_url.to_owned(),
            client_id: "bid_test".to_owned(),
            timeout_ms: 1_000,
        })
        .expect("client should build")
    }

    #[test]
    fn endpoints_extend_base_path_with_or_without_trailing_slash() {
        for base in ["https://cs571.org/api/f23/hw9", "https://cs571.org/api/f23/hw9/"] {
            assert_eq!(
                api(base).endpoint("chatrooms").as_str(),
                "https://cs571.org/api/f23/hw9/chatrooms"
            );
        }
    }

    #[test]
    fn messages_url_encodes_room_and_page() {
        let url = api("https://cs571.org/api/f23/hw9").messages_url(Some("Witte Hall"), Some(2));

        assert_eq!(
            url.as_str(),
            "https://cs571.org/api/f23/hw9/messages?chatroom=Witte+Hall&page=2"
        );
    }

    #[test]
    fn post_url_carries_only_the_room() {
        let url = api("https://cs571.org/api/f23/hw9").messages_url(Some("Bascom"), None);

        assert_eq!(url.query(), Some("chatroom=Bascom"));
    }

    #[test]
    fn delete_url_targets_message_id() {
        let url = api("https://cs571.org/api/f23/hw9").message_url(1042);

        assert_eq!(url.query(), Some("id=1042"));
    }

    #[test]
    fn status_codes_map_to_source_errors() {
        assert_eq!(status_error(401), ApiError::Unauthorized);
        assert_eq!(status_error(403), ApiError::Unauthorized);
        assert_eq!(status_error(409), ApiError::Conflict);
        assert_eq!(status_error(500), ApiError::Status(500));
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = HttpChatApi::new(&ApiConfig {
            base_url: "api/f23/hw9".to_owned(),
            ..ApiConfig::default()
        })
        .expect_err("must fail");

        assert!(matches!(err, AppError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_client_id_that_is_not_a_header_value() {
        let err = HttpChatApi::new(&ApiConfig {
            client_id: "bad\nid".to_owned(),
            ..ApiConfig::default()
        })
        .expect_err("must fail");

        assert!(matches!(err, AppError::InvalidClientId(_)));
    }
}
