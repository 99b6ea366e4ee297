//! TUI Controller - drives the chat session
//!
//! The controller owns the terminal, the application state and the keyboard
//! hub. Each step it:
//! 1. Reads one event from the event source
//! 2. Routes key presses through the hub, applying fired actions
//! 3. Hands unclaimed keys to the input
//! 4. Applies finished background work (answers, downloads)
//! 5. Mounts or unmounts the scoped shortcut tables

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyEvent, KeyEventKind, MouseEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;

use super::app::{AppState, FlashLevel, FocusedComponent, SCROLL_STEP};
use super::config::AppConfig;
use super::events::{Event, EventSource};
use super::host::{download_filename, HostActions};
use super::keybindings::{global_dispatcher, message_dispatcher, modal_dispatcher, Action};
use super::renderer::{render, RenderContext, RenderReport};
use super::shortcuts::{KeyboardHub, Subscription};
use super::theme::Theme;
use crate::backend::{sample_query, AnswerBackend};
use crate::core::{Answer, BackendError, HostError, Message};

/// Results of background work, delivered back to the controller
#[derive(Debug)]
pub enum AppEvent {
    AnswerReady {
        request_id: u64,
        result: Result<Answer, BackendError>,
    },
    DownloadFinished(Result<PathBuf, HostError>),
}

/// Presentation settings for a controller
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub app_config: AppConfig,
    pub theme: Theme,
    pub download_dir: PathBuf,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            app_config: AppConfig::default(),
            theme: Theme::default(),
            download_dir: PathBuf::from("."),
        }
    }
}

/// TUI Controller
pub struct TuiController<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    state: AppState,
    options: ControllerOptions,
    backend: Arc<dyn AnswerBackend>,
    host: Arc<dyn HostActions>,
    hub: KeyboardHub,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Global table, mounted for the whole session
    _global_keys: Subscription,
    /// Mounted while the message list has focus
    message_keys: Option<Subscription>,
    /// Mounted while the citation modal is open
    modal_keys: Option<Subscription>,
}

impl<B: Backend, E: EventSource> TuiController<B, E> {
    pub fn new(
        terminal: Terminal<B>,
        events: E,
        backend: Arc<dyn AnswerBackend>,
        host: Arc<dyn HostActions>,
        options: ControllerOptions,
    ) -> Self {
        let hub = KeyboardHub::new();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let global_keys = global_dispatcher().mount(&hub, action_tx.clone());
        let state = AppState::new(backend.name());

        Self {
            terminal,
            events,
            state,
            options,
            backend,
            host,
            hub,
            action_tx,
            action_rx,
            event_tx,
            event_rx,
            _global_keys: global_keys,
            message_keys: None,
            modal_keys: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Number of listeners currently mounted on the keyboard hub
    pub fn mounted_tables(&self) -> usize {
        self.hub.listener_count()
    }

    /// Run the main event loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(backend = self.backend.name(), "chat session started");
        loop {
            self.draw()?;
            self.step().await?;
            if self.state.should_quit {
                break;
            }
        }
        tracing::info!(
            messages = self.state.messages().len(),
            "chat session ended"
        );
        Ok(())
    }

    /// Render the current state
    pub fn draw(&mut self) -> Result<()> {
        let ctx = RenderContext {
            config: &self.options.app_config,
            theme: &self.options.theme,
            sample_query: sample_query(),
        };
        let state = &self.state;
        let mut report = RenderReport::default();
        self.terminal.draw(|frame| report = render(frame, state, &ctx))?;
        self.state.set_max_scroll(report.max_scroll);
        Ok(())
    }

    /// Process one input event and any finished background work
    pub async fn step(&mut self) -> Result<()> {
        let event = self.events.next_event()?;
        self.handle_event(event);

        // Let spawned requests make progress on single-threaded runtimes
        tokio::task::yield_now().await;
        self.drain_app_events();

        self.sync_scoped_shortcuts();
        self.state.expire_flash(Instant::now());
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if self.state.input_editable() {
                    self.state.input.insert_str(&text);
                }
            }
            Event::Mouse(mouse) => {
                if self.state.modal.is_open() {
                    return;
                }
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.state.scroll_up(SCROLL_STEP),
                    MouseEventKind::ScrollDown => self.state.scroll_down(SCROLL_STEP),
                    _ => {}
                }
            }
            // The next draw picks up the new size
            Event::Resize(_, _) => {}
            Event::Tick => self.state.tick = self.state.tick.wrapping_add(1),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let press = self.hub.emit(key);
        self.drain_actions();

        if !press.is_default_prevented() && self.state.input_editable() {
            self.state.input.handle_key(key);
        }
    }

    fn drain_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: Action) {
        tracing::debug!(?action, "shortcut");
        match action {
            Action::Submit => self.submit(),
            Action::ClearConversation => {
                self.state.clear_conversation();
                tracing::info!("conversation cleared");
            }
            Action::Dismiss => {
                if self.state.modal.is_open() {
                    self.state.close_modal();
                } else {
                    self.state.focus_input();
                }
            }
            Action::ToggleFocus => {
                if !self.state.modal.is_open() {
                    self.state.toggle_focus();
                }
            }
            Action::InsertSampleQuery => self.state.insert_sample_query(sample_query()),
            Action::Quit => self.state.should_quit = true,
            Action::SelectPrevious => self.state.select_previous(),
            Action::SelectNext => self.state.select_next(),
            Action::ScrollUp => self.state.scroll_up(SCROLL_STEP),
            Action::ScrollDown => self.state.scroll_down(SCROLL_STEP),
            Action::OpenCitation(index) => {
                if !self.state.open_citation(index) {
                    self.state.flash(
                        format!("No citation [{}] on this message", index + 1),
                        FlashLevel::Info,
                    );
                }
            }
            Action::CopyMessage => {
                if let Some(text) = self.state.selected_message().map(message_clipboard_text) {
                    self.copy(&text, "message");
                }
            }
            Action::OpenLink => self.open_link(),
            Action::DownloadDocument => self.download(),
            Action::CopyExcerpt => {
                if let Some(text) = self.state.modal.selection().map(|c| c.text.clone()) {
                    self.copy(&text, "excerpt");
                }
            }
        }
    }

    fn submit(&mut self) {
        let Some(request) = self.state.submit_input() else {
            return;
        };
        tracing::info!(request_id = request.id, "question submitted");

        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.answer(&request.question).await;
            if tx
                .send(AppEvent::AnswerReady {
                    request_id: request.id,
                    result,
                })
                .is_err()
            {
                tracing::debug!(request_id = request.id, "session closed before answer");
            }
        });
    }

    fn copy(&mut self, text: &str, what: &str) {
        match self.host.copy_text(text) {
            Ok(()) => self.state.flash(format!("Copied {}", what), FlashLevel::Info),
            Err(e) => {
                tracing::warn!(error = %e, "copy failed");
                self.state.flash(e.to_string(), FlashLevel::Error);
            }
        }
    }

    fn open_link(&mut self) {
        let Some(link) = self.state.modal.selection().map(|c| c.link.clone()) else {
            return;
        };
        match self.host.open_link(&link) {
            Ok(()) => self
                .state
                .flash("Opened original document", FlashLevel::Info),
            Err(e) => {
                tracing::warn!(error = %e, "open link failed");
                self.state.flash(e.to_string(), FlashLevel::Error);
            }
        }
    }

    fn download(&mut self) {
        let Some(citation) = self.state.modal.selection().cloned() else {
            return;
        };
        let file_name = download_filename(&citation.source);
        let dest = self.options.download_dir.join(&file_name);
        self.state.downloads_in_flight += 1;
        self.state
            .flash(format!("Downloading {}...", file_name), FlashLevel::Info);

        let host = Arc::clone(&self.host);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = host.download(&citation.link, &dest).await;
            if tx.send(AppEvent::DownloadFinished(result)).is_err() {
                tracing::debug!("session closed before download finished");
            }
        });
    }

    fn drain_app_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply_app_event(event);
        }
    }

    fn apply_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AnswerReady { request_id, result } => {
                self.state.complete_request(request_id, result);
            }
            AppEvent::DownloadFinished(result) => {
                self.state.downloads_in_flight = self.state.downloads_in_flight.saturating_sub(1);
                match result {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "document saved");
                        self.state
                            .flash(format!("Saved {}", path.display()), FlashLevel::Info);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "download failed");
                        self.state.flash(e.to_string(), FlashLevel::Error);
                    }
                }
            }
        }
    }

    /// Mount the scoped tables that match the current view, drop the rest
    fn sync_scoped_shortcuts(&mut self) {
        let modal_open = self.state.modal.is_open();
        if modal_open && self.modal_keys.is_none() {
            self.modal_keys = Some(modal_dispatcher().mount(&self.hub, self.action_tx.clone()));
        } else if !modal_open {
            self.modal_keys = None;
        }

        let messages_focused = !modal_open && self.state.focus == FocusedComponent::Messages;
        if messages_focused && self.message_keys.is_none() {
            self.message_keys =
                Some(message_dispatcher().mount(&self.hub, self.action_tx.clone()));
        } else if !messages_focused {
            self.message_keys = None;
        }
    }
}

/// Message text with its citations, as placed on the clipboard
fn message_clipboard_text(message: &Message) -> String {
    let mut text = message.content.clone();
    for (n, citation) in message.citations.iter().enumerate() {
        text.push_str(&format!(
            "\n\n[{}] {}\n\"{}\"\n{}",
            n + 1,
            citation.reference(),
            citation.text,
            citation.link
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;

    #[test]
    fn test_clipboard_text_includes_citations() {
        let message = Message::assistant(SimulatedBackend::canned_answer());
        let text = message_clipboard_text(&message);
        assert!(text.starts_with("Yes, in a motor accident claim"));
        assert!(text.contains("[1] Dani Devi v. Pritam Singh (P&H) (Para 7)"));
        assert!(text.contains("sharepoint.com"));
    }
}
