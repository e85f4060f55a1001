//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod chatrooms;
pub mod context;
pub mod contracts;
pub mod feed;
pub mod session;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
