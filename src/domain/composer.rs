//! State of the message authoring surface.

/// Draft of a new post plus whether the authoring surface is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposerState {
    open: bool,
    title: String,
    content: String,
}

impl ComposerState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hides the surface but keeps the draft, like dismissing a dialog.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Drops the draft and hides the surface. Called after a successful post.
    pub fn reset(&mut self) {
        self.open = false;
        self.title.clear();
        self.content.clear();
    }
}
