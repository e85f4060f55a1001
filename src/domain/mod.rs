//! Domain layer: core entities and business rules.

pub mod chatroom;
pub mod composer;
pub mod feed_page;
pub mod message;
pub mod root_mode;
pub mod session;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
