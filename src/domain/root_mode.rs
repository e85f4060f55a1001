//! Top-level view selection.

use super::session::SessionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootView {
    Login,
    Register,
    GuestChat,
    AuthenticatedChat,
}

impl RootView {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Login => "VIEW_LOGIN",
            Self::Register => "VIEW_REGISTER",
            Self::GuestChat => "VIEW_GUEST_CHAT",
            Self::AuthenticatedChat => "VIEW_AUTHENTICATED_CHAT",
        }
    }
}

/// Picks the active view from the session mode and the registering flag.
pub fn select_view(mode: SessionMode, registering: bool) -> RootView {
    match mode {
        SessionMode::Authenticated => RootView::AuthenticatedChat,
        SessionMode::Guest => RootView::GuestChat,
        SessionMode::Registering => RootView::Register,
        SessionMode::Anonymous if registering => RootView::Register,
        SessionMode::Anonymous => RootView::Login,
    }
}

/// Finite-state machine over the top-level views.
///
/// The only state it owns is the `registering` flag toggled from the login
/// and register screens; everything else is derived from the session mode
/// observed through [`RootModeController::observe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootModeController {
    mode: SessionMode,
    registering: bool,
}

impl Default for RootModeController {
    fn default() -> Self {
        Self {
            mode: SessionMode::Anonymous,
            registering: false,
        }
    }
}

impl RootModeController {
    pub fn view(&self) -> RootView {
        select_view(self.mode, self.registering)
    }

    pub fn is_registering(&self) -> bool {
        self.registering
    }

    /// Login screen "Signup" button. Ignored outside the login view.
    pub fn show_register(&mut self) -> RootView {
        if self.view() == RootView::Login {
            self.registering = true;
        }
        self.view()
    }

    /// Register screen "Nevermind" button. Ignored outside the register view.
    pub fn show_login(&mut self) -> RootView {
        if self.view() == RootView::Register {
            self.registering = false;
        }
        self.view()
    }

    /// Applies a session transition. Any mode other than `Registering` ends
    /// the register flow, so logout and "Nevermind" both land on login.
    pub fn observe(&mut self, mode: SessionMode) -> RootView {
        let previous = self.mode;
        self.mode = mode;

        self.registering = mode == SessionMode::Registering;

        let view = self.view();
        tracing::debug!(
            from = previous.as_label(),
            to = mode.as_label(),
            view = view.as_label(),
            "root view transition"
        );
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_view_covers_every_mode() {
        assert_eq!(select_view(SessionMode::Anonymous, false), RootView::Login);
        assert_eq!(select_view(SessionMode::Anonymous, true), RootView::Register);
        assert_eq!(select_view(SessionMode::Registering, false), RootView::Register);
        assert_eq!(select_view(SessionMode::Guest, true), RootView::GuestChat);
        assert_eq!(
            select_view(SessionMode::Authenticated, true),
            RootView::AuthenticatedChat
        );
    }

    #[test]
    fn starts_on_login_view() {
        assert_eq!(RootModeController::default().view(), RootView::Login);
    }

    #[test]
    fn signup_and_nevermind_toggle_between_login_and_register() {
        let mut root = RootModeController::default();

        assert_eq!(root.show_register(), RootView::Register);
        assert_eq!(root.show_login(), RootView::Login);
    }

    #[test]
    fn successful_registration_lands_on_authenticated_chat() {
        let mut root = RootModeController::default();
        root.show_register();

        assert_eq!(root.observe(SessionMode::Authenticated), RootView::AuthenticatedChat);
        assert!(!root.is_registering());
    }

    #[test]
    fn logout_returns_to_login_even_if_register_was_open_before() {
        let mut root = RootModeController::default();
        root.show_register();
        root.observe(SessionMode::Authenticated);

        assert_eq!(root.observe(SessionMode::Anonymous), RootView::Login);
    }

    #[test]
    fn guest_sign_out_opens_register_then_nevermind_goes_to_login() {
        let mut root = RootModeController::default();
        root.observe(SessionMode::Guest);

        assert_eq!(root.observe(SessionMode::Registering), RootView::Register);
        assert_eq!(root.observe(SessionMode::Anonymous), RootView::Login);
    }

    #[test]
    fn register_button_is_ignored_inside_chat_views() {
        let mut root = RootModeController::default();
        root.observe(SessionMode::Guest);

        assert_eq!(root.show_register(), RootView::GuestChat);
        assert!(!root.is_registering());
    }
}
