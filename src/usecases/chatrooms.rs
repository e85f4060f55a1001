use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{domain::chatroom::Chatroom, usecases::contracts::ApiError};

const CHATROOMS_FETCH_FAILED: &str = "CHATROOMS_FETCH_FAILED";

#[async_trait]
pub trait ChatroomsSource: Send + Sync {
    async fn list_chatrooms(&self) -> Result<Vec<String>, ApiError>;
}

/// Chatroom names, fetched at most once per app run.
///
/// A failed fetch is logged and remembered as an empty list; there is no
/// retry.
pub struct ChatroomDirectory {
    source: Arc<dyn ChatroomsSource>,
    rooms: OnceCell<Vec<Chatroom>>,
}

impl ChatroomDirectory {
    pub fn new(source: Arc<dyn ChatroomsSource>) -> Self {
        Self {
            source,
            rooms: OnceCell::new(),
        }
    }

    pub async fn list_chatrooms(&self) -> &[Chatroom] {
        self.rooms
            .get_or_init(|| async {
                match self.source.list_chatrooms().await {
                    Ok(names) => {
                        tracing::debug!(count = names.len(), "chatrooms loaded");
                        names.into_iter().map(Chatroom::new).collect()
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = CHATROOMS_FETCH_FAILED,
                            error = %error,
                            "chatroom list unavailable"
                        );
                        Vec::new()
                    }
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct StubSource {
        result: Result<Vec<String>, ApiError>,
        calls: Mutex<usize>,
    }

    impl StubSource {
        fn with_result(result: Result<Vec<String>, ApiError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().expect("calls lock")
        }
    }

    #[async_trait]
    impl ChatroomsSource for StubSource {
        async fn list_chatrooms(&self) -> Result<Vec<String>, ApiError> {
            *self.calls.lock().expect("calls lock") += 1;
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn keeps_server_order() {
        let source = StubSource::with_result(Ok(vec![
            "Bascom".to_owned(),
            "Chadbourne".to_owned(),
            "Witte".to_owned(),
        ]));
        let directory = ChatroomDirectory::new(source);

        let names: Vec<_> = directory
            .list_chatrooms()
            .await
            .iter()
            .map(|room| room.name.as_str())
            .collect();

        assert_eq!(names, vec!["Bascom", "Chadbourne", "Witte"]);
    }

    #[tokio::test]
    async fn fetches_only_once() {
        let source = StubSource::with_result(Ok(vec!["Bascom".to_owned()]));
        let directory = ChatroomDirectory::new(source.clone());

        directory.list_chatrooms().await;
        directory.list_chatrooms().await;

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failure_yields_empty_list_without_retry() {
        let source = StubSource::with_result(Err(ApiError::Status(500)));
        let directory = ChatroomDirectory::new(source.clone());

        assert!(directory.list_chatrooms().await.is_empty());
        assert!(directory.list_chatrooms().await.is_empty());
        assert_eq!(source.calls(), 1);
    }
}
