//! Plain-text rendering of feed pages.

use crate::domain::message::{FeedEntry, Message};

const EMPTY_PAGE_TEXT: &str = "There's nothing here!";

pub fn page_lines(room: &str, entries: &[FeedEntry], current: u32, total: u32) -> Vec<String> {
    let mut lines = vec![format!("== {room} | Page {current} of {total} ==")];

    if entries.is_empty() {
        lines.push(EMPTY_PAGE_TEXT.to_owned());
        return lines;
    }

    for entry in entries {
        lines.extend(entry_lines(entry));
        lines.push(String::new());
    }

    lines
}

pub fn entry_lines(entry: &FeedEntry) -> Vec<String> {
    let message = &entry.message;
    let mut lines = vec![
        format!("#{} {}", message.id, message.title),
        posted_line(message),
        message.content.clone(),
    ];

    if entry.deletable {
        lines.push(format!("[d {}] Delete", message.id));
    }

    lines
}

fn posted_line(message: &Message) -> String {
    match message.created_at() {
        Some(created) => format!(
            "by {} | Posted on {} at {}",
            message.poster,
            created.format("%-m/%-d/%Y"),
            created.format("%-I:%M:%S %p")
        ),
        None => format!("by {} | Posted on {}", message.poster, message.created),
    }
}
