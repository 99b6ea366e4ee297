//! End-to-end chat flows driven through the controller
//!
//! Key presses are scripted, answers come from real backends with the
//! runtime clock paused where latency matters, and host side effects are
//! recorded instead of performed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use lexi_cli::backend::{sample_query, AnswerBackend, SimulatedBackend};
use lexi_cli::core::{Answer, BackendError, ConversationState, HostError};
use lexi_cli::tui::{
    AppState, ControllerOptions, Event, FocusedComponent, HostActions, ScriptedEventSource,
    TuiController,
};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

type Controller = TuiController<TestBackend, ScriptedEventSource>;

#[derive(Default)]
struct RecordingHost {
    copied: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
    downloads: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait]
impl HostActions for RecordingHost {
    fn copy_text(&self, text: &str) -> Result<(), HostError> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn open_link(&self, url: &str) -> Result<(), HostError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<PathBuf, HostError> {
        self.downloads
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(dest.to_path_buf())
    }
}

struct FailingBackend;

#[async_trait]
impl AnswerBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn answer(&self, _question: &str) -> Result<Answer, BackendError> {
        Err(BackendError::Status { code: 502 })
    }
}

fn download_dir() -> PathBuf {
    PathBuf::from("/tmp/lexi-test-downloads")
}

fn controller(backend: Arc<dyn AnswerBackend>, host: Arc<RecordingHost>) -> Controller {
    let terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    let options = ControllerOptions {
        download_dir: download_dir(),
        ..Default::default()
    };
    TuiController::new(terminal, ScriptedEventSource::default(), backend, host, options)
}

fn simulated(delay_ms: u64) -> Arc<dyn AnswerBackend> {
    Arc::new(SimulatedBackend::new(Duration::from_millis(delay_ms)))
}

fn key(c: char) -> Event {
    Event::key(KeyCode::Char(c), KeyModifiers::NONE)
}

fn ctrl(c: char) -> Event {
    Event::key(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn ctrl_enter() -> Event {
    Event::key(KeyCode::Enter, KeyModifiers::CONTROL)
}

fn plain(code: KeyCode) -> Event {
    Event::key(code, KeyModifiers::NONE)
}

/// Queue events and step until the script is used up
async fn feed(c: &mut Controller, events: impl IntoIterator<Item = Event>) {
    for event in events {
        c.events_mut().push(event);
    }
    while !c.events_mut().is_exhausted() {
        c.step().await.unwrap();
    }
}

async fn send(c: &mut Controller, text: &str) {
    c.events_mut().type_text(text);
    feed(c, [ctrl_enter()]).await;
}

/// Step (ticking) until `cond` holds
async fn step_until(c: &mut Controller, cond: impl Fn(&AppState) -> bool) {
    for _ in 0..400 {
        if cond(c.state()) {
            return;
        }
        c.step().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition never reached");
}

fn screen(c: &mut Controller) -> String {
    c.draw().unwrap();
    let buffer = c.terminal().backend().buffer();
    let mut out = String::new();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            out.push_str(buffer.cell((x, y)).unwrap().symbol());
        }
        out.push('\n');
    }
    out
}

/// Ask a question and wait for the answer
async fn answered(c: &mut Controller) {
    send(c, "Is the claimant entitled to future prospects?").await;
    step_until(c, |s| s.conversation_state() == ConversationState::Idle).await;
}

/// Answer, focus the message list and open the first citation
async fn with_open_modal(c: &mut Controller) {
    answered(c).await;
    feed(c, [plain(KeyCode::Tab), plain(KeyCode::Enter)]).await;
    assert!(c.state().modal.is_open());
}

#[tokio::test(start_paused = true)]
async fn submit_shows_loader_then_cited_answer() {
    let mut c = controller(simulated(1500), Arc::new(RecordingHost::default()));
    assert_eq!(c.state().conversation_state(), ConversationState::Empty);

    send(&mut c, "Is the claimant entitled to future prospects?").await;
    let submitted_at = tokio::time::Instant::now();

    assert!(c.state().is_loading());
    assert!(c.state().conversation_state().is_awaiting());
    assert_eq!(c.state().messages().len(), 1);
    assert!(c.state().input.is_empty());
    assert!(screen(&mut c).contains("Analyzing your query..."));

    tokio::time::sleep(Duration::from_millis(1400)).await;
    c.step().await.unwrap();
    assert!(c.state().is_loading(), "answer arrived before its latency");

    step_until(&mut c, |s| !s.is_loading()).await;
    assert!(submitted_at.elapsed() >= Duration::from_millis(1500));
    assert_eq!(c.state().conversation_state(), ConversationState::Idle);

    let messages = c.state().messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].is_user());
    assert_eq!(messages[1].citations.len(), 1);

    let screen = screen(&mut c);
    assert!(screen.contains("Dani Devi v. Pritam Singh (P&H)"));
    assert!(!screen.contains("Analyzing your query..."));
}

#[tokio::test]
async fn blank_submit_is_ignored() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));

    feed(&mut c, [ctrl_enter()]).await;
    c.events_mut().type_text("   ");
    feed(&mut c, [ctrl_enter()]).await;

    assert_eq!(c.state().conversation_state(), ConversationState::Empty);
    assert!(c.state().messages().is_empty());
}

#[tokio::test]
async fn ctrl_j_submits_like_ctrl_enter() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));

    c.events_mut().type_text("future prospects?");
    feed(&mut c, [ctrl('j')]).await;

    assert!(!c.state().messages().is_empty());
    assert_eq!(c.state().messages()[0].content, "future prospects?");
}

#[tokio::test]
async fn alt_enter_submits_and_shift_tab_returns_focus() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));

    c.events_mut().type_text("future prospects?");
    feed(&mut c, [Event::key(KeyCode::Enter, KeyModifiers::ALT)]).await;
    step_until(&mut c, |s| s.messages().len() == 2).await;
    assert_eq!(c.state().messages()[0].content, "future prospects?");
    assert!(c.state().input.is_empty());

    feed(&mut c, [plain(KeyCode::Tab)]).await;
    assert!(c.state().selected.is_some());
    feed(&mut c, [Event::key(KeyCode::BackTab, KeyModifiers::SHIFT)]).await;
    assert!(c.state().input_editable());
}

#[tokio::test(start_paused = true)]
async fn input_is_read_only_while_pending() {
    let mut c = controller(simulated(1500), Arc::new(RecordingHost::default()));

    send(&mut c, "first question").await;
    send(&mut c, "second").await;
    feed(&mut c, [Event::Paste("pasted".to_string())]).await;

    assert_eq!(c.state().messages().len(), 1);
    assert!(c.state().input.is_empty());
    assert!(screen(&mut c).contains("Waiting for the answer..."));

    step_until(&mut c, |s| !s.is_loading()).await;
    assert_eq!(c.state().messages().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn clear_drops_the_pending_answer() {
    let mut c = controller(simulated(1500), Arc::new(RecordingHost::default()));

    send(&mut c, "question").await;
    feed(&mut c, [ctrl('k')]).await;
    assert_eq!(c.state().conversation_state(), ConversationState::Empty);

    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        c.step().await.unwrap();
    }

    assert_eq!(c.state().conversation_state(), ConversationState::Empty);
    assert!(c.state().messages().is_empty());
    assert!(screen(&mut c).contains("Welcome to Lexi Legal Assistant"));
}

#[tokio::test]
async fn backend_failure_becomes_failed_turn() {
    let mut c = controller(Arc::new(FailingBackend), Arc::new(RecordingHost::default()));

    send(&mut c, "question").await;
    step_until(&mut c, |s| !s.is_loading()).await;

    assert_eq!(c.state().conversation_state(), ConversationState::Idle);
    let reply = &c.state().messages()[1];
    assert!(reply.failed);
    assert!(reply.citations.is_empty());
    assert!(reply.content.contains("HTTP 502"));

    // A new question can be asked after a failure
    send(&mut c, "again").await;
    step_until(&mut c, |s| s.messages().len() == 4).await;
    assert_eq!(c.state().conversation_state(), ConversationState::Idle);
}

#[tokio::test]
async fn citation_modal_opens_and_closes() {
    let host = Arc::new(RecordingHost::default());
    let mut c = controller(simulated(0), host.clone());

    answered(&mut c).await;
    assert_eq!(c.mounted_tables(), 1);

    feed(&mut c, [plain(KeyCode::Tab)]).await;
    assert_eq!(c.state().focus, FocusedComponent::Messages);
    assert_eq!(c.mounted_tables(), 2);

    feed(&mut c, [plain(KeyCode::Enter)]).await;
    let selection = c.state().modal.selection().cloned().unwrap();
    assert_eq!(selection.source, "Dani Devi v. Pritam Singh (P&H)");
    assert_eq!(selection.paragraph, "Para 7");
    // Global and modal tables; the message table is unmounted
    assert_eq!(c.mounted_tables(), 2);

    let shown = screen(&mut c);
    assert!(shown.contains("Highlighted Citation"));
    assert!(shown.contains("Document Preview"));

    feed(&mut c, [plain(KeyCode::Esc)]).await;
    assert!(!c.state().modal.is_open());
    assert_eq!(c.state().focus, FocusedComponent::Messages);
    assert_eq!(c.mounted_tables(), 2);
    assert!(!screen(&mut c).contains("Highlighted Citation"));

    feed(&mut c, [plain(KeyCode::Esc)]).await;
    assert_eq!(c.state().focus, FocusedComponent::Input);
    assert_eq!(c.mounted_tables(), 1);
    assert!(host.copied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn modal_actions_reach_the_host() {
    let host = Arc::new(RecordingHost::default());
    let mut c = controller(simulated(0), host.clone());
    with_open_modal(&mut c).await;
    let citation = c.state().modal.selection().cloned().unwrap();

    feed(&mut c, [key('y')]).await;
    assert_eq!(host.copied.lock().unwrap().as_slice(), [citation.text.clone()]);
    assert_eq!(c.state().flash.as_ref().unwrap().text, "Copied excerpt");

    feed(&mut c, [key('o')]).await;
    assert_eq!(host.opened.lock().unwrap().as_slice(), [citation.link.clone()]);

    feed(&mut c, [key('d')]).await;
    step_until(&mut c, |s| s.downloads_in_flight == 0).await;

    let downloads = host.downloads.lock().unwrap().clone();
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].0, citation.link);
    assert_eq!(
        downloads[0].1,
        download_dir().join("Dani_Devi_v._Pritam_Singh_(P&H).pdf")
    );
    assert!(c.state().flash.as_ref().unwrap().text.starts_with("Saved"));

    // Modal actions leave the modal open
    assert!(c.state().modal.is_open());
}

#[tokio::test]
async fn number_keys_pick_citations() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));
    answered(&mut c).await;
    feed(&mut c, [plain(KeyCode::Tab)]).await;

    feed(&mut c, [key('2')]).await;
    assert!(!c.state().modal.is_open());
    assert!(c.state().flash.as_ref().unwrap().text.contains("No citation [2]"));

    feed(&mut c, [key('1')]).await;
    assert!(c.state().modal.is_open());
}

#[tokio::test]
async fn copy_selected_message() {
    let host = Arc::new(RecordingHost::default());
    let mut c = controller(simulated(0), host.clone());
    answered(&mut c).await;

    feed(&mut c, [plain(KeyCode::Tab), key('y')]).await;

    let copied = host.copied.lock().unwrap().clone();
    assert_eq!(copied.len(), 1);
    assert!(copied[0].contains("future prospects"));
    assert!(copied[0].contains("[1] Dani Devi v. Pritam Singh (P&H) (Para 7)"));
}

#[tokio::test]
async fn clear_with_modal_open_resets_everything() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));
    with_open_modal(&mut c).await;

    feed(&mut c, [ctrl('k')]).await;

    assert_eq!(c.state().conversation_state(), ConversationState::Empty);
    assert!(!c.state().modal.is_open());
    assert_eq!(c.state().focus, FocusedComponent::Input);
    assert_eq!(c.mounted_tables(), 1);
}

#[tokio::test]
async fn ctrl_e_inserts_the_sample_query() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));

    feed(&mut c, [ctrl('e')]).await;
    assert_eq!(c.state().input.text(), sample_query());

    // An input with text is left alone
    feed(&mut c, [ctrl('e')]).await;
    assert_eq!(c.state().input.text(), sample_query());
}

#[tokio::test]
async fn typing_edits_the_input() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));

    c.events_mut().type_text("claim y");
    feed(
        &mut c,
        [
            plain(KeyCode::Backspace),
            Event::Paste("es\r\nwhy".to_string()),
        ],
    )
    .await;

    assert_eq!(c.state().input.text(), "claim es\nwhy");
}

#[tokio::test]
async fn release_events_are_ignored() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));
    let release = KeyEvent::new_with_kind(
        KeyCode::Char('a'),
        KeyModifiers::NONE,
        KeyEventKind::Release,
    );

    feed(&mut c, [Event::Key(release)]).await;
    assert!(c.state().input.is_empty());
}

#[tokio::test]
async fn held_arrow_keys_repeat_selection() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));
    answered(&mut c).await;
    feed(&mut c, [plain(KeyCode::Tab)]).await;
    assert_eq!(c.state().selected, Some(1));

    let repeat = |code: KeyCode| {
        Event::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ))
    };
    feed(&mut c, [plain(KeyCode::Up)]).await;
    assert_eq!(c.state().selected, Some(0));
    feed(&mut c, [repeat(KeyCode::Down)]).await;
    assert_eq!(c.state().selected, Some(1));
}

#[tokio::test]
async fn quit_ends_the_session() {
    let mut c = controller(simulated(0), Arc::new(RecordingHost::default()));
    c.events_mut().push(ctrl('q'));

    c.run().await.unwrap();
    assert!(c.state().should_quit);
}
