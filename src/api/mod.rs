//! Chat service integration layer: HTTP client and wire formats.

mod client;
mod wire;

pub use client::HttpChatApi;

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
