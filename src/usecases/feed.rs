//! Paginated message feed of a single chatroom.
//!
//! [`FeedController`] is the only writer of its room's [`FeedPage`]. Every
//! fetch is an explicit [`FeedController::load_page`] call; creates and
//! deletes always end with a reload of page 1.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    domain::{
        chatroom::Chatroom,
        composer::ComposerState,
        feed_page::{is_valid_page, FeedPage, TOTAL_PAGES},
        message::{FeedEntry, Message},
        session::Session,
    },
    usecases::contracts::{ApiError, ErrorCategory},
};

const FEED_LOAD_FAILED: &str = "FEED_LOAD_FAILED";
const FEED_LOAD_SUPERSEDED: &str = "FEED_LOAD_SUPERSEDED";
const FEED_POST_FAILED: &str = "FEED_POST_FAILED";
const FEED_DELETE_FAILED: &str = "FEED_DELETE_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub title: String,
    pub content: String,
}

/// Server acknowledgement of a created message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    pub id: i64,
    pub notice: String,
}

#[async_trait]
pub trait MessagesApi: Send + Sync {
    async fn list_messages(&self, room: &str, page: u32) -> Result<Vec<Message>, ApiError>;

    /// `token` is sent as a bearer credential when present.
    async fn create_message(
        &self,
        room: &str,
        token: Option<&str>,
        message: &NewMessage,
    ) -> Result<PostReceipt, ApiError>;

    async fn delete_message(&self, id: i64, token: Option<&str>) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("You must provide both a title and content.")]
    MissingFields,
    #[error("Guests are not allowed to post!")]
    GuestsNotAllowed,
    #[error("You can only delete your own posts.")]
    NotOwner,
    #[error("Could not load messages. Please try again.")]
    LoadFailed,
    #[error("Could not create the post. Please try again.")]
    PostFailed,
    #[error("Could not delete the post. Please try again.")]
    DeleteFailed,
}

impl FeedError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFields => ErrorCategory::Validation,
            Self::GuestsNotAllowed | Self::NotOwner => ErrorCategory::Authorization,
            Self::LoadFailed | Self::PostFailed | Self::DeleteFailed => ErrorCategory::Transport,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the displayed page.
    Applied,
    /// A newer load was issued while this one was in flight; result dropped.
    Superseded,
    /// Requested page lies outside `[1, TOTAL_PAGES]`; nothing was sent.
    OutOfRange,
}

#[derive(Debug)]
struct FeedState {
    current_page: u32,
    page: Option<FeedPage>,
    latest_ticket: u64,
    composer: ComposerState,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page: None,
            latest_ticket: 0,
            composer: ComposerState::default(),
        }
    }
}

pub struct FeedController {
    room: Chatroom,
    api: Arc<dyn MessagesApi>,
    session: watch::Receiver<Session>,
    state: Mutex<FeedState>,
}

impl FeedController {
    pub fn new(
        room: Chatroom,
        api: Arc<dyn MessagesApi>,
        session: watch::Receiver<Session>,
    ) -> Self {
        Self {
            room,
            api,
            session,
            state: Mutex::new(FeedState::default()),
        }
    }

    pub fn room(&self) -> &Chatroom {
        &self.room
    }

    pub fn current_page(&self) -> u32 {
        self.state().current_page
    }

    pub fn total_pages(&self) -> u32 {
        TOTAL_PAGES
    }

    pub fn page(&self) -> Option<FeedPage> {
        self.state().page.clone()
    }

    /// Displayed messages with their deletable flag for the current user.
    pub fn entries(&self) -> Vec<FeedEntry> {
        let username = self.session.borrow().username().map(str::to_owned);
        self.state()
            .page
            .as_ref()
            .map(|page| page.entries(username.as_deref()))
            .unwrap_or_default()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page() > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page() < TOTAL_PAGES
    }

    /// Room entry: fetches the current page (page 1 for a fresh controller).
    pub async fn enter(&self) -> Result<LoadOutcome, FeedError> {
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<LoadOutcome, FeedError> {
        let page = self.current_page();
        self.load_page(page).await
    }

    pub async fn go_to_previous_page(&self) -> Result<LoadOutcome, FeedError> {
        let target = self.current_page().saturating_sub(1);
        self.load_page(target).await
    }

    pub async fn go_to_next_page(&self) -> Result<LoadOutcome, FeedError> {
        let target = self.current_page().saturating_add(1);
        self.load_page(target).await
    }

    /// Fetches `page` and makes it current. Out-of-range pages are a no-op.
    ///
    /// Only the most recently issued load may replace the displayed page;
    /// an older response arriving later is discarded.
    pub async fn load_page(&self, page: u32) -> Result<LoadOutcome, FeedError> {
        if !is_valid_page(page) {
            return Ok(LoadOutcome::OutOfRange);
        }

        let ticket = {
            let mut state = self.state();
            state.current_page = page;
            state.latest_ticket += 1;
            state.latest_ticket
        };

        let result = self.api.list_messages(&self.room.name, page).await;

        let mut state = self.state();
        if ticket != state.latest_ticket {
            tracing::debug!(
                code = FEED_LOAD_SUPERSEDED,
                room = %self.room,
                page,
                "dropping superseded page load"
            );
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(messages) => {
                state.page = Some(FeedPage {
                    room_name: self.room.name.clone(),
                    page_number: page,
                    messages,
                });
                Ok(LoadOutcome::Applied)
            }
            Err(error) => {
                tracing::warn!(
                    code = FEED_LOAD_FAILED,
                    room = %self.room,
                    page,
                    error = %error,
                    "failed to load messages"
                );
                Err(FeedError::LoadFailed)
            }
        }
    }

    /// Posts a message with the session's bearer token. On success the
    /// composer is cleared and page 1 is reloaded so the post is visible.
    pub async fn create_message(
        &self,
        title: &str,
        content: &str,
    ) -> Result<PostReceipt, FeedError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(FeedError::MissingFields);
        }

        let token = self.token();
        let message = NewMessage {
            title: title.to_owned(),
            content: content.to_owned(),
        };

        let receipt = self
            .api
            .create_message(&self.room.name, token.as_deref(), &message)
            .await
            .map_err(|error| {
                tracing::warn!(
                    code = FEED_POST_FAILED,
                    room = %self.room,
                    guest = token.is_none(),
                    error = %error,
                    "failed to create message"
                );
                match error {
                    ApiError::Unauthorized => FeedError::GuestsNotAllowed,
                    _ if token.is_none() => FeedError::GuestsNotAllowed,
                    _ => FeedError::PostFailed,
                }
            })?;

        self.state().composer.reset();
        self.reload_first_page().await;

        Ok(receipt)
    }

    /// Deletes a message. Messages on the displayed page that belong to
    /// someone else are refused without a request; the server decides for
    /// everything else. Success always returns the view to page 1.
    pub async fn delete_message(&self, id: i64) -> Result<(), FeedError> {
        let username = self.session.borrow().username().map(str::to_owned);
        let owned = self
            .state()
            .page
            .as_ref()
            .and_then(|page| page.find(id))
            .map(|message| message.is_deletable_by(username.as_deref()));
        if owned == Some(false) {
            return Err(FeedError::NotOwner);
        }

        let token = self.token();
        self.api
            .delete_message(id, token.as_deref())
            .await
            .map_err(|error| {
                tracing::warn!(
                    code = FEED_DELETE_FAILED,
                    room = %self.room,
                    id,
                    error = %error,
                    "failed to delete message"
                );
                match error {
                    ApiError::Unauthorized => FeedError::NotOwner,
                    _ => FeedError::DeleteFailed,
                }
            })?;

        self.reload_first_page().await;
        Ok(())
    }

    pub fn composer(&self) -> ComposerState {
        self.state().composer.clone()
    }

    pub fn open_composer(&self) {
        self.state().composer.open();
    }

    pub fn close_composer(&self) {
        self.state().composer.close();
    }

    pub fn set_draft_title(&self, title: &str) {
        self.state().composer.set_title(title);
    }

    pub fn set_draft_content(&self, content: &str) {
        self.state().composer.set_content(content);
    }

    /// Posts whatever the composer currently holds.
    pub async fn submit_draft(&self) -> Result<PostReceipt, FeedError> {
        let draft = self.composer();
        self.create_message(draft.title(), draft.content()).await
    }

    async fn reload_first_page(&self) {
        // The mutation already succeeded; a failed reload is logged by
        // load_page and leaves the previous page on screen.
        let _ = self.load_page(1).await;
    }

    fn token(&self) -> Option<String> {
        self.session.borrow().token().map(str::to_owned)
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
