//! Line-oriented console front-end.
//!
//! The console owns a [`RootModeController`] and feeds it every session
//! change it observes through the session watch channel. Each root view is a
//! small command loop; chatroom feeds get their own loop per room entered.

use std::io;

use tokio::sync::watch;

use crate::{
    domain::{
        chatroom::Chatroom,
        root_mode::{RootModeController, RootView},
        session::{Session, SessionMode},
    },
    ui::{render, terminal::Terminal},
    usecases::{
        bootstrap::Engine,
        feed::{FeedController, FeedError},
        session::SessionError,
    },
};

const POSTED_NOTICE: &str = "Successfully posted!";
const DELETED_NOTICE: &str = "Successfully deleted the post!";
const LOGGED_IN_NOTICE: &str = "Successfully logged in!";
const REGISTERED_NOTICE: &str = "Successfully registered!";
const LOGGED_OUT_NOTICE: &str = "You have been logged out!";
const NO_ROOMS_TEXT: &str = "No chatrooms available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Console<'a> {
    terminal: &'a mut dyn Terminal,
    engine: &'a Engine,
    root: RootModeController,
    session: watch::Receiver<Session>,
}

impl<'a> Console<'a> {
    pub fn new(terminal: &'a mut dyn Terminal, engine: &'a Engine) -> Self {
        let mut session = engine.sessions.subscribe();
        let mut root = RootModeController::default();
        root.observe(session.borrow_and_update().mode());

        Self {
            terminal,
            engine,
            root,
            session,
        }
    }

    pub fn view(&self) -> RootView {
        self.root.view()
    }

    /// Runs until the user quits or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            let flow = match self.root.view() {
                RootView::Login => self.login_view().await?,
                RootView::Register => self.register_view().await?,
                view @ (RootView::GuestChat | RootView::AuthenticatedChat) => {
                    self.chat_view(view).await?
                }
            };

            if flow == Flow::Quit {
                return Ok(());
            }
            self.sync_root();
        }
    }

    fn sync_root(&mut self) {
        if self.session.has_changed().unwrap_or(false) {
            let mode = self.session.borrow_and_update().mode();
            self.root.observe(mode);
        }
    }

    async fn login_view(&mut self) -> io::Result<Flow> {
        self.terminal.print_line("")?;
        self.terminal.print_line("BadgerChat Login")?;
        let Some(choice) = self
            .terminal
            .prompt_line("[l]ogin, [s]ign up, continue as [g]uest, [q]uit: ")?
        else {
            return Ok(Flow::Quit);
        };

        match choice.as_str() {
            "l" | "login" => {
                let Some(username) = self.terminal.prompt_line("Username: ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(password) = self.terminal.prompt_secret("Password: ")? else {
                    return Ok(Flow::Quit);
                };

                match self.engine.sessions.login(&username, &password).await {
                    Ok(_) => self.terminal.print_line(LOGGED_IN_NOTICE)?,
                    Err(error) => self.session_notice(error)?,
                }
            }
            "s" | "signup" => {
                self.root.show_register();
            }
            "g" | "guest" => {
                self.engine.sessions.continue_as_guest();
            }
            "q" | "quit" => return Ok(Flow::Quit),
            _ => self.terminal.print_line("Unknown choice.")?,
        }

        Ok(Flow::Continue)
    }

    async fn register_view(&mut self) -> io::Result<Flow> {
        self.terminal.print_line("")?;
        self.terminal.print_line("Join BadgerChat!")?;
        let Some(choice) = self
            .terminal
            .prompt_line("[s]ign up, [b]ack (nevermind), [q]uit: ")?
        else {
            return Ok(Flow::Quit);
        };

        match choice.as_str() {
            "s" | "signup" => {
                let Some(username) = self.terminal.prompt_line("Username: ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(password) = self.terminal.prompt_secret("Password: ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(repeat) = self.terminal.prompt_secret("Confirm password: ")? else {
                    return Ok(Flow::Quit);
                };

                match self
                    .engine
                    .sessions
                    .register(&username, &password, &repeat)
                    .await
                {
                    Ok(_) => self.terminal.print_line(REGISTERED_NOTICE)?,
                    Err(error) => self.session_notice(error)?,
                }
            }
            "b" | "back" => {
                // A guest sign-out lands here with the session in
                // `Registering`; leaving must reset the session too.
                if self.engine.sessions.mode() == SessionMode::Registering {
                    self.engine.sessions.cancel_registration();
                } else {
                    self.root.show_login();
                }
            }
            "q" | "quit" => return Ok(Flow::Quit),
            _ => self.terminal.print_line("Unknown choice.")?,
        }

        Ok(Flow::Continue)
    }

    async fn chat_view(&mut self, view: RootView) -> io::Result<Flow> {
        let rooms = self.engine.directory.list_chatrooms().await.to_vec();

        self.terminal.print_line("")?;
        match self.engine.sessions.session().username() {
            Some(username) => self
                .terminal
                .print_line(&format!("BadgerChat | signed in as {username}"))?,
            None => self.terminal.print_line("BadgerChat | browsing as guest")?,
        }
        if rooms.is_empty() {
            self.terminal.print_line(NO_ROOMS_TEXT)?;
        }
        for (index, room) in rooms.iter().enumerate() {
            self.terminal.print_line(&format!("{}. {room}", index + 1))?;
        }

        let exit_hint = match view {
            RootView::AuthenticatedChat => "l[o]gout",
            _ => "sign [u]p",
        };
        let prompt = format!("Room number, {exit_hint}, [q]uit: ");
        let Some(choice) = self.terminal.prompt_line(&prompt)? else {
            return Ok(Flow::Quit);
        };

        match (choice.as_str(), view) {
            ("q" | "quit", _) => return Ok(Flow::Quit),
            ("o" | "logout", RootView::AuthenticatedChat) => {
                match self.engine.sessions.logout().await {
                    Ok(_) => self.terminal.print_line(LOGGED_OUT_NOTICE)?,
                    Err(error) => self.session_notice(error)?,
                }
            }
            ("u" | "signup", RootView::GuestChat) => {
                self.engine.sessions.sign_out();
            }
            (other, _) => match pick_room(&rooms, other) {
                Some(room) => return self.room_view(room).await,
                None => self.terminal.print_line("Unknown choice.")?,
            },
        }

        Ok(Flow::Continue)
    }

    async fn room_view(&mut self, room: Chatroom) -> io::Result<Flow> {
        let feed = FeedController::new(
            room,
            self.engine.messages.clone(),
            self.engine.sessions.subscribe(),
        );
        self.report(feed.enter().await)?;

        loop {
            self.terminal.print_line("")?;
            for line in render::page_lines(
                &feed.room().name,
                &feed.entries(),
                feed.current_page(),
                feed.total_pages(),
            ) {
                self.terminal.print_line(&line)?;
            }

            let Some(command) = self.terminal.prompt_line(&room_prompt(&feed))? else {
                return Ok(Flow::Quit);
            };

            match RoomCommand::parse(&command) {
                Some(RoomCommand::Next) => self.report(feed.go_to_next_page().await)?,
                Some(RoomCommand::Previous) => self.report(feed.go_to_previous_page().await)?,
                Some(RoomCommand::Refresh) => self.report(feed.refresh().await)?,
                Some(RoomCommand::Create) => {
                    if self.compose(&feed).await? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                Some(RoomCommand::Delete(id)) => match feed.delete_message(id).await {
                    Ok(()) => self.terminal.print_line(DELETED_NOTICE)?,
                    Err(error) => self.feed_notice(error)?,
                },
                Some(RoomCommand::Back) => return Ok(Flow::Continue),
                None => self.terminal.print_line("Unknown command.")?,
            }
        }
    }

    async fn compose(&mut self, feed: &FeedController) -> io::Result<Flow> {
        feed.open_composer();
        let draft = feed.composer();

        let title_prompt = prefilled_prompt("Post title", draft.title());
        let Some(title) = self.terminal.prompt_line(&title_prompt)? else {
            return Ok(Flow::Quit);
        };
        if !title.is_empty() {
            feed.set_draft_title(&title);
        }

        let content_prompt = prefilled_prompt("Post content", draft.content());
        let Some(content) = self.terminal.prompt_line(&content_prompt)? else {
            return Ok(Flow::Quit);
        };
        if !content.is_empty() {
            feed.set_draft_content(&content);
        }

        match feed.submit_draft().await {
            Ok(receipt) if receipt.notice.is_empty() => self.terminal.print_line(POSTED_NOTICE)?,
            Ok(receipt) => self.terminal.print_line(&receipt.notice)?,
            Err(error) => {
                feed.close_composer();
                self.feed_notice(error)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn report<T>(&mut self, result: Result<T, FeedError>) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(error) => self.feed_notice(error),
        }
    }

    fn feed_notice(&mut self, error: FeedError) -> io::Result<()> {
        tracing::debug!(category = ?error.category(), notice = %error, "feed action rejected");
        self.terminal.print_line(&error.to_string())
    }

    fn session_notice(&mut self, error: SessionError) -> io::Result<()> {
        tracing::debug!(category = ?error.category(), notice = %error, "session action rejected");
        self.terminal.print_line(&error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomCommand {
    Next,
    Previous,
    Refresh,
    Create,
    Delete(i64),
    Back,
}

impl RoomCommand {
    fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let command = match parts.next()? {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "r" | "refresh" => Self::Refresh,
            "c" | "create" => Self::Create,
            "d" | "delete" => Self::Delete(parts.next()?.parse().ok()?),
            "b" | "back" => Self::Back,
            _ => return None,
        };

        parts.next().is_none().then_some(command)
    }
}

fn room_prompt(feed: &FeedController) -> String {
    let mut options = Vec::new();
    if feed.has_previous_page() {
        options.push("[p]revious");
    }
    if feed.has_next_page() {
        options.push("[n]ext");
    }
    options.extend(["[r]efresh", "[c]reate post", "[d <id>] delete", "[b]ack"]);
    format!("{}: ", options.join(", "))
}

fn pick_room(rooms: &[Chatroom], choice: &str) -> Option<Chatroom> {
    let index: usize = choice.parse().ok()?;
    rooms.get(index.checked_sub(1)?).cloned()
}

fn prefilled_prompt(label: &str, current: &str) -> String {
    if current.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{current}]: ")
    }
}
