/// Chat session tests against a scripted backend.
mod test_utils;

use growthdash::api::ApiError;
use growthdash::chat::{ChatSession, ChatStatus, ChatTurn, FALLBACK_REPLY, Sender};
use serde_json::json;

use test_utils::{ScriptedTransport, server_error};

#[test]
fn blank_messages_never_reach_the_network() {
    let transport = ScriptedTransport::new();
    let mut session = ChatSession::new();

    for blank in ["", "   ", "\t\n"] {
        let mut input = blank.to_string();
        assert_eq!(session.submit(&transport, &mut input), ChatStatus::Ignored);
    }

    assert!(transport.calls().is_empty());
    assert!(session.transcript().is_empty());
    assert!(session.log().is_empty());
}

#[test]
fn successful_exchange_adds_one_turn_each_and_sends_prior_history() {
    let transport = ScriptedTransport::new()
        .then(Ok(json!({ "response": "Hi! How can I help?", "status": "success" })))
        .then(Ok(json!({ "response": "Try the pricing module.", "status": "success" })));
    let mut session = ChatSession::new();

    let mut input = "hello".to_string();
    assert_eq!(session.submit(&transport, &mut input), ChatStatus::Replied);
    assert!(input.is_empty());

    let before = session.transcript().to_vec();
    let mut input = "how do I price?".to_string();
    assert_eq!(session.submit(&transport, &mut input), ChatStatus::Replied);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].endpoint, "/chat");
    assert_eq!(
        calls[1].payload,
        Some(json!({
            "message": "how do I price?",
            "history": serde_json::to_value(&before).unwrap()
        }))
    );
    assert_eq!(
        calls[0].payload,
        Some(json!({ "message": "hello", "history": [] }))
    );

    assert_eq!(session.transcript().len(), before.len() + 2);
    assert_eq!(
        &session.transcript()[before.len()..],
        &[
            ChatTurn::user("how do I price?"),
            ChatTurn::assistant("Try the pricing module."),
        ]
    );
}

#[test]
fn failed_exchange_is_visible_but_not_remembered() {
    let transport = ScriptedTransport::new()
        .then(Ok(json!({ "response": "Hello", "status": "success" })))
        .then(Err(server_error()));
    let mut session = ChatSession::new();

    let mut input = "hi".to_string();
    session.submit(&transport, &mut input);
    let turns_before = session.transcript().len();

    let mut input = "are you there?".to_string();
    let status = session.submit(&transport, &mut input);

    assert_eq!(status, ChatStatus::ConnectionError);
    assert_eq!(session.transcript().len(), turns_before + 1);
    assert_eq!(
        session.transcript().last(),
        Some(&ChatTurn::user("are you there?"))
    );

    let last = session.log().last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert_eq!(last.text, "Connection error: HTTP 500: Internal Server Error");
}

#[test]
fn backend_error_status_shows_error_line() {
    let transport = ScriptedTransport::replying(json!({
        "status": "error",
        "response": "Model unavailable"
    }));
    let mut session = ChatSession::new();

    let mut input = "hi".to_string();
    let status = session.submit(&transport, &mut input);

    assert_eq!(status, ChatStatus::BackendError);
    assert_eq!(session.transcript(), &[ChatTurn::user("hi")]);
    assert_eq!(
        session.log().last().map(|l| l.text.as_str()),
        Some("Error: Model unavailable")
    );
}

#[test]
fn empty_reply_falls_back_to_default_text() {
    let transport = ScriptedTransport::replying(json!({ "response": "", "status": "success" }));
    let mut session = ChatSession::new();

    let mut input = "?".to_string();
    session.submit(&transport, &mut input);

    assert_eq!(
        session.log().last().map(|l| l.text.as_str()),
        Some(FALLBACK_REPLY)
    );
}

#[test]
fn begin_and_complete_split_the_exchange() {
    let mut session = ChatSession::new();
    let mut input = "first".to_string();

    let pending = session.begin(&mut input).unwrap();
    assert_eq!(session.log().len(), 1);
    assert_eq!(session.log()[0].sender, Sender::User);
    assert!(pending.request.history.is_empty());

    let status = session.complete(Err(ApiError::Network("connection reset".into())));
    assert_eq!(status, ChatStatus::ConnectionError);
    assert_eq!(session.log().len(), 2);
    assert_eq!(session.transcript().len(), 1);
}
