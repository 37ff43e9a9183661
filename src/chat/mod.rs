//! AI chatbot session.
//!
//! A [`ChatSession`] owns two views of the conversation:
//!
//! - the **transcript**: user/assistant turns sent back to the backend as
//!   context on every call
//! - the **log**: everything shown to the user, including error lines that
//!   are deliberately never added to the transcript
//!
//! An exchange is split in two around the network call. [`ChatSession::begin`]
//! shows the user's message immediately and snapshots the history;
//! [`ChatSession::complete`] applies whatever the backend (or the network)
//! returned. [`ChatSession::submit`] runs both with a blocking call.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ApiError, Transport, endpoints};
use crate::modules::fields;
use crate::render::escape_html;

/// Reply shown when the backend answers without any text.
pub const FALLBACK_REPLY: &str = "I did not understand that. Please try again.";

// ---------------------------------------------------------------------------
// Transcript and log types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One remembered turn, serialized as `{role, content}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Who a visible log line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// One visible line of the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender: Sender,
    pub text: String,
}

impl ChatLine {
    /// The page markup for this line; the text is escaped.
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="chat-message {}"><span class="message-text">{}</span></div>"#,
            self.sender,
            escape_html(&self.text)
        )
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatReply {
    #[serde(default, deserialize_with = "fields::text")]
    response: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    status: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An exchange whose user turn is already displayed and remembered, waiting
/// for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingExchange {
    pub request: ChatRequest,
}

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStatus {
    /// Blank input; nothing happened.
    Ignored,
    /// The reply was shown and remembered.
    Replied,
    /// The backend flagged an error; shown, not remembered.
    BackendError,
    /// The call failed; shown, not remembered.
    ConnectionError,
}

/// In-memory chat state for one conversation.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    transcript: Vec<ChatTurn>,
    log: Vec<ChatLine>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns sent as context on the next call.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Everything shown to the user, oldest first.
    pub fn log(&self) -> &[ChatLine] {
        &self.log
    }

    /// Send one message and apply the reply. `input` is cleared unless it
    /// was blank.
    pub fn submit(&mut self, transport: &dyn Transport, input: &mut String) -> ChatStatus {
        let Some(pending) = self.begin(input) else {
            return ChatStatus::Ignored;
        };

        let result = serde_json::to_value(&pending.request)
            .map_err(|e| ApiError::Decode(e.to_string()))
            .and_then(|payload| transport.post_json(endpoints::CHAT, &payload));

        self.complete(result)
    }

    /// Start an exchange: show the message, remember it, clear `input`.
    ///
    /// Returns `None` (and changes nothing) when the trimmed input is empty.
    /// The request's history is the transcript as it was before this
    /// message.
    pub fn begin(&mut self, input: &mut String) -> Option<PendingExchange> {
        if input.trim().is_empty() {
            return None;
        }

        let message = std::mem::take(input);
        let history = self.transcript.clone();

        self.push_line(Sender::User, message.clone());
        self.transcript.push(ChatTurn::user(message.clone()));

        Some(PendingExchange {
            request: ChatRequest { message, history },
        })
    }

    /// Finish an exchange with the backend's result.
    pub fn complete(&mut self, result: Result<Value, ApiError>) -> ChatStatus {
        let body = match result {
            Ok(body) => body,
            Err(err) => {
                self.push_line(Sender::Bot, format!("Connection error: {err}"));
                return ChatStatus::ConnectionError;
            }
        };

        let reply: ChatReply = serde_json::from_value(body).unwrap_or_default();

        if reply.status.as_deref() == Some("error") {
            let detail = reply.response.as_deref().unwrap_or("unknown error");
            self.push_line(Sender::Bot, format!("Error: {detail}"));
            return ChatStatus::BackendError;
        }

        let text = reply
            .response
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());
        self.push_line(Sender::Bot, text.clone());
        self.transcript.push(ChatTurn::assistant(text));
        ChatStatus::Replied
    }

    /// The page markup for the whole log.
    pub fn log_html(&self) -> String {
        self.log.iter().map(ChatLine::to_html).collect()
    }

    fn push_line(&mut self, sender: Sender, text: String) {
        self.log.push(ChatLine { sender, text });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn turns_serialize_as_role_and_content() {
        assert_eq!(
            serde_json::to_value(ChatTurn::assistant("hi")).unwrap(),
            json!({ "role": "assistant", "content": "hi" })
        );
    }

    #[test]
    fn begin_ignores_blank_input() {
        let mut session = ChatSession::new();
        let mut input = "   \t".to_string();
        assert!(session.begin(&mut input).is_none());
        assert_eq!(input, "   \t");
        assert!(session.log().is_empty());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn begin_shows_message_and_snapshots_history() {
        let mut session = ChatSession::new();
        let mut input = "hello".to_string();
        let first = session.begin(&mut input).unwrap();
        assert!(input.is_empty());
        assert!(first.request.history.is_empty());
        session.complete(Ok(json!({ "response": "Hi there", "status": "success" })));

        let mut input = "pricing?".to_string();
        let second = session.begin(&mut input).unwrap();
        assert_eq!(second.request.message, "pricing?");
        assert_eq!(
            second.request.history,
            vec![ChatTurn::user("hello"), ChatTurn::assistant("Hi there")]
        );
        assert_eq!(session.transcript().len(), 3);
    }

    #[test]
    fn message_is_sent_untrimmed() {
        let mut session = ChatSession::new();
        let mut input = "  spaced  ".to_string();
        let pending = session.begin(&mut input).unwrap();
        assert_eq!(pending.request.message, "  spaced  ");
    }

    #[test]
    fn backend_error_is_shown_not_remembered() {
        let mut session = ChatSession::new();
        let mut input = "hi".to_string();
        session.begin(&mut input);
        let status = session.complete(Ok(json!({ "status": "error", "response": "quota" })));

        assert_eq!(status, ChatStatus::BackendError);
        assert_eq!(session.log().last().unwrap().text, "Error: quota");
        assert_eq!(session.transcript(), &[ChatTurn::user("hi")]);
    }

    #[test]
    fn missing_reply_text_uses_fallback() {
        let mut session = ChatSession::new();
        let mut input = "hi".to_string();
        session.begin(&mut input);
        session.complete(Ok(json!({ "status": "success" })));
        assert_eq!(
            session.transcript().last(),
            Some(&ChatTurn::assistant(FALLBACK_REPLY))
        );
    }

    #[test]
    fn log_html_escapes_text() {
        let mut session = ChatSession::new();
        let mut input = "<script>".to_string();
        session.begin(&mut input);
        assert_eq!(
            session.log_html(),
            r#"<div class="chat-message user"><span class="message-text">&lt;script&gt;</span></div>"#
        );
    }
}
