//! Chat transcript and the send/receive lifecycle
//!
//! A send is split in two so the UI loop never blocks on the network:
//! [`ChatSession::begin_send`] does everything up to the request
//! (claim the send slot, append the user message, show the typing
//! placeholder) and [`ChatSession::settle`] does everything after it
//! (drop the placeholder, append the reply or the error, release the slot).
//! [`ChatSession::submit_message`] runs both around a backend call.

use crate::api::{ApiError, Backend};
use crate::session::SessionState;
use crate::util::{panic_detail, sanitize_display};
use crate::view::ViewController;
use chrono::{DateTime, Local};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

/// One transcript entry. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub seq: u64,
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Whether a message can be sent before any business is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendPolicy {
    /// Block locally and show guidance
    #[default]
    RequireBusiness,
    /// Send anyway; the server answers with its own guidance
    AllowWithoutBusiness,
}

/// Why a send was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    Empty,
    Busy,
    NoBusiness,
}

impl SendRejected {
    /// Guidance to surface, if any. Empty and busy sends are silent no-ops.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            SendRejected::NoBusiness => {
                Some("Upload your business documents first (F4) so I can answer questions.")
            }
            SendRejected::Empty | SendRejected::Busy => None,
        }
    }
}

/// A send that has been dispatched and not yet settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub ticket: u64,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    typing: bool,
    next_seq: u64,
    /// Lines scrolled up from the newest entry; 0 follows the bottom
    scroll_from_bottom: usize,
}

impl Transcript {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn scroll_from_bottom(&self) -> usize {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    pub fn clamp_scroll(&mut self, max_top: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_top);
    }

    fn push(&mut self, sender: Sender, text: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.messages.push(Message {
            seq,
            sender,
            text: sanitize_display(text),
            at: Local::now(),
        });
        self.scroll_to_bottom();
        seq
    }

    fn show_typing(&mut self) {
        self.typing = true;
        self.scroll_to_bottom();
    }

    /// Returns whether the placeholder was showing.
    fn hide_typing(&mut self) -> bool {
        std::mem::replace(&mut self.typing, false)
    }
}

/// Message input box state
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    buffer: String,
    focused: bool,
}

impl ChatInput {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn newline(&mut self) {
        self.buffer.push('\n');
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Transcript,
    input: ChatInput,
    policy: SendPolicy,
    in_flight: Option<u64>,
}

impl ChatSession {
    pub fn new(policy: SendPolicy) -> Self {
        let mut input = ChatInput::default();
        input.focus();
        Self {
            transcript: Transcript::default(),
            input,
            policy,
            in_flight: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn input(&self) -> &ChatInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut ChatInput {
        &mut self.input
    }

    pub fn policy(&self) -> SendPolicy {
        self.policy
    }

    /// Input is disabled while a send is in flight
    pub fn input_enabled(&self, state: &SessionState) -> bool {
        !state.is_sending()
    }

    /// Append an assistant message outside the send lifecycle (greeting,
    /// upload confirmation).
    pub fn post_ai(&mut self, text: &str) {
        self.transcript.push(Sender::Ai, text);
    }

    /// Opening message, depending on whether a business is already known.
    pub fn greet(&mut self, state: &SessionState) {
        let text = match state.business_name() {
            Some(name) => format!(
                "Hi! I'm the assistant for {}. Ask me anything about the business.",
                name
            ),
            None => "Hi! Upload your business documents (F4) and I'll answer questions about them."
                .to_string(),
        };
        self.post_ai(&text);
    }

    /// Confirmation posted after a successful upload.
    pub fn announce_business(&mut self, business_name: &str) {
        self.post_ai(&format!(
            "I've processed the documents for {}. How can I help?",
            business_name
        ));
    }

    /// Steps 1-3 of a send: validate, claim the slot, append the user
    /// message, clear the input, show the typing placeholder.
    pub fn begin_send(
        &mut self,
        state: &mut SessionState,
        view: &mut ViewController,
        text: &str,
    ) -> Result<PendingSend, SendRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }
        if state.is_sending() {
            return Err(SendRejected::Busy);
        }
        if self.policy == SendPolicy::RequireBusiness && !state.has_business() {
            return Err(SendRejected::NoBusiness);
        }
        if !state.try_begin_send() {
            return Err(SendRejected::Busy);
        }

        view.show_chat(state);
        let ticket = self.transcript.push(Sender::User, text);
        self.input.clear();
        self.input.blur();
        self.transcript.show_typing();
        self.in_flight = Some(ticket);

        tracing::info!(ticket, chars = text.chars().count(), "sending chat message");
        Ok(PendingSend {
            ticket,
            text: text.to_string(),
        })
    }

    /// Send whatever is in the input box.
    pub fn begin_send_from_input(
        &mut self,
        state: &mut SessionState,
        view: &mut ViewController,
    ) -> Result<PendingSend, SendRejected> {
        let text = self.input.text().to_string();
        self.begin_send(state, view, &text)
    }

    /// Steps 5-7 of a send. Returns false (and changes nothing) if `ticket`
    /// is not the send in flight.
    pub fn settle(
        &mut self,
        state: &mut SessionState,
        ticket: u64,
        result: Result<String, ApiError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::warn!(ticket, "ignoring settle for a send that is not in flight");
            return false;
        }
        self.in_flight = None;
        self.transcript.hide_typing();

        match result {
            Ok(reply) => {
                tracing::info!(ticket, chars = reply.chars().count(), "reply received");
                self.transcript.push(Sender::Ai, &reply);
            }
            Err(err) => {
                tracing::warn!(ticket, error = %err, "chat send failed");
                self.transcript.push(Sender::Ai, &err.user_message());
            }
        }

        state.finish_send();
        self.input.focus();
        true
    }

    /// The whole round trip in one call.
    pub async fn submit_message(
        &mut self,
        state: &mut SessionState,
        view: &mut ViewController,
        backend: &dyn Backend,
        text: &str,
    ) -> Result<(), SendRejected> {
        let pending = self.begin_send(state, view, text)?;
        let result = dispatch(backend, &pending.text).await;
        self.settle(state, pending.ticket, result);
        Ok(())
    }
}

/// Call `/send_message`, turning a panic inside the request into an error
/// so the caller always gets something to settle with.
pub async fn dispatch(backend: &dyn Backend, text: &str) -> Result<String, ApiError> {
    match AssertUnwindSafe(backend.send_message(text)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(ApiError::Crashed(panic_detail(panic))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeBackend;
    use crate::session::Panel;

    fn ready_state() -> SessionState {
        let mut state = SessionState::new();
        state.set_business_name("Acme");
        state
    }

    fn entries(chat: &ChatSession) -> Vec<(Sender, String)> {
        chat.transcript()
            .messages()
            .iter()
            .map(|m| (m.sender, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_successful_round_trip_appends_two_entries() {
        let backend = FakeBackend::replying(vec![Ok("Hello".into())]);
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);

        chat.submit_message(&mut state, &mut view, &backend, "Hi")
            .await
            .unwrap();

        assert_eq!(
            entries(&chat),
            vec![(Sender::User, "Hi".to_string()), (Sender::Ai, "Hello".to_string())]
        );
        assert!(!chat.transcript().is_typing());
        assert!(!state.is_sending());
        assert!(chat.input().is_focused());
        assert_eq!(backend.sent_messages(), vec!["Hi".to_string()]);
    }

    #[test]
    fn test_second_send_while_pending_is_rejected() {
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);

        let first = chat.begin_send(&mut state, &mut view, "first").unwrap();
        assert_eq!(
            chat.begin_send(&mut state, &mut view, "second"),
            Err(SendRejected::Busy)
        );
        assert_eq!(
            chat.begin_send(&mut state, &mut view, "third"),
            Err(SendRejected::Busy)
        );
        assert_eq!(chat.transcript().len(), 1);

        assert!(chat.settle(&mut state, first.ticket, Ok("ok".into())));
        assert!(chat.begin_send(&mut state, &mut view, "fourth").is_ok());
    }

    #[test]
    fn test_placeholder_only_between_dispatch_and_settle() {
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        assert!(!chat.transcript().is_typing());

        let pending = chat.begin_send(&mut state, &mut view, "hello").unwrap();
        assert!(chat.transcript().is_typing());
        assert!(!chat.input_enabled(&state));

        chat.settle(
            &mut state,
            pending.ticket,
            Err(ApiError::Transport("refused".into())),
        );
        assert!(!chat.transcript().is_typing());
        assert!(chat.input_enabled(&state));
    }

    #[tokio::test]
    async fn test_panicking_backend_still_settles() {
        let backend = FakeBackend {
            panic_on_send: true,
            ..FakeBackend::default()
        };
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);

        chat.submit_message(&mut state, &mut view, &backend, "boom?")
            .await
            .unwrap();

        assert!(!chat.transcript().is_typing());
        assert!(!state.is_sending());
        let last = chat.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Ai);
        assert!(last.text.contains("went wrong"));
    }

    #[tokio::test]
    async fn test_failure_is_rendered_not_returned() {
        let backend = FakeBackend::replying(vec![Err(ApiError::Status {
            code: 500,
            message: Some("Sorry, an unexpected error occurred. Please try again.".into()),
        })]);
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);

        let outcome = chat
            .submit_message(&mut state, &mut view, &backend, "Hi")
            .await;
        assert!(outcome.is_ok());
        assert_eq!(
            entries(&chat)[1],
            (
                Sender::Ai,
                "Sorry, an unexpected error occurred. Please try again.".to_string()
            )
        );
    }

    #[test]
    fn test_blank_text_is_a_no_op() {
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        assert_eq!(
            chat.begin_send(&mut state, &mut view, "   \n "),
            Err(SendRejected::Empty)
        );
        assert!(chat.transcript().is_empty());
        assert!(!state.is_sending());
    }

    #[tokio::test]
    async fn test_business_required_policy_blocks_without_network() {
        let backend = FakeBackend::replying(vec![Ok("unused".into())]);
        let mut state = SessionState::new();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);

        let outcome = chat
            .submit_message(&mut state, &mut view, &backend, "Hi")
            .await;
        assert_eq!(outcome, Err(SendRejected::NoBusiness));
        assert!(SendRejected::NoBusiness.guidance().is_some());
        assert_eq!(backend.call_count(), 0);
        assert!(chat.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_permissive_policy_sends_without_business() {
        let backend = FakeBackend::replying(vec![Err(ApiError::Status {
            code: 400,
            message: Some("Please upload business documents first.".into()),
        })]);
        let mut state = SessionState::new();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::AllowWithoutBusiness);

        chat.submit_message(&mut state, &mut view, &backend, "Hi")
            .await
            .unwrap();
        assert_eq!(backend.call_count(), 1);
        assert_eq!(
            chat.transcript().last().unwrap().text,
            "Please upload business documents first."
        );
    }

    #[test]
    fn test_send_switches_to_chat_panel() {
        let mut state = ready_state();
        let mut view = ViewController::new();
        view.activate(&mut state, Panel::Products);
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);

        chat.begin_send(&mut state, &mut view, "hello").unwrap();
        assert_eq!(state.active_panel(), Some(Panel::Chat));
    }

    #[test]
    fn test_send_from_input_clears_buffer() {
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        chat.input_mut().push_str("  what are your hours?  ");

        let pending = chat.begin_send_from_input(&mut state, &mut view).unwrap();
        assert_eq!(pending.text, "what are your hours?");
        assert!(chat.input().is_empty());
        assert!(!chat.input().is_focused());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut state = ready_state();
        let mut view = ViewController::new();
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        let pending = chat.begin_send(&mut state, &mut view, "hello").unwrap();

        assert!(!chat.settle(&mut state, pending.ticket + 100, Ok("nope".into())));
        assert!(chat.transcript().is_typing());
        assert!(state.is_sending());
    }

    #[test]
    fn test_append_resets_scroll_to_newest() {
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        chat.transcript_mut().scroll_up(12);
        assert_eq!(chat.transcript().scroll_from_bottom(), 12);
        chat.post_ai("new");
        assert_eq!(chat.transcript().scroll_from_bottom(), 0);
    }

    #[test]
    fn test_greeting_depends_on_business() {
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        chat.greet(&SessionState::new());
        assert!(chat.transcript().last().unwrap().text.contains("Upload"));

        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        chat.greet(&ready_state());
        assert!(chat.transcript().last().unwrap().text.contains("Acme"));
    }

    #[test]
    fn test_sequence_numbers_follow_append_order() {
        let mut chat = ChatSession::new(SendPolicy::RequireBusiness);
        chat.post_ai("one");
        chat.post_ai("two");
        let seqs: Vec<u64> = chat.transcript().messages().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }
}
