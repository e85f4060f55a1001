use super::message::{FeedEntry, Message};

/// Number of pages every chatroom exposes. The service does not report it.
pub const TOTAL_PAGES: u32 = 4;

/// One fetched page of a chatroom's messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    pub room_name: String,
    pub page_number: u32,
    pub messages: Vec<Message>,
}

impl FeedPage {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn entries(&self, username: Option<&str>) -> Vec<FeedEntry> {
        self.messages
            .iter()
            .map(|message| FeedEntry {
                deletable: message.is_deletable_by(username),
                message: message.clone(),
            })
            .collect()
    }
}

/// Whether `page` lies in `[1, TOTAL_PAGES]`.
pub fn is_valid_page(page: u32) -> bool {
    (1..=TOTAL_PAGES).contains(&page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64, poster: &str) -> Message {
        Message {
            id,
            title: format!("title {id}"),
            content: "content".to_owned(),
            poster: poster.to_owned(),
            created: "2023-11-20T10:00:00.000Z".to_owned(),
        }
    }

    fn page() -> FeedPage {
        FeedPage {
            room_name: "Bascom".to_owned(),
            page_number: 1,
            messages: vec![message(1, "bucky"), message(2, "becky"), message(3, "bucky")],
        }
    }

    #[test]
    fn entries_flag_exactly_the_users_own_messages() {
        let entries = page().entries(Some("bucky"));

        let flags: Vec<_> = entries.iter().map(|e| (e.message.id, e.deletable)).collect();
        assert_eq!(flags, vec![(1, true), (2, false), (3, true)]);
        assert!(entries
            .iter()
            .all(|e| e.deletable == (e.message.poster == "bucky")));
    }

    #[test]
    fn entries_for_guest_are_never_deletable() {
        assert!(page().entries(None).iter().all(|e| !e.deletable));
    }

    #[test]
    fn find_locates_message_by_id() {
        let page = page();

        assert_eq!(page.find(2).map(|m| m.poster.as_str()), Some("becky"));
        assert!(page.find(99).is_none());
    }

    #[test]
    fn page_bounds_are_one_through_total() {
        assert!(!is_valid_page(0));
        assert!(is_valid_page(1));
        assert!(is_valid_page(TOTAL_PAGES));
        assert!(!is_valid_page(TOTAL_PAGES + 1));
    }
}
