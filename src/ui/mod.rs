//! UI layer: console views and text rendering.

pub mod console;
mod render;
pub mod terminal;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
