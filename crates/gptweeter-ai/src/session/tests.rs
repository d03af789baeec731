use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gptweeter_config::{ModelEntry, ProviderKind};

use super::*;
use crate::retry::RetryPolicy;
use crate::tokens::TokenCounter;
use crate::{AiError, AiResponse, ChatBackend, GenerationParams, Message, Role, TokenUsage};

/// Replays scripted results and records every transcript it was sent.
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<AiResponse, AiError>>>,
    calls: Mutex<Vec<(Vec<Message>, GenerationParams)>>,
}

impl ScriptedBackend {
    fn with(replies: Vec<Result<AiResponse, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(
        &self,
        _model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<AiResponse, AiError> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), params.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::ApiError("script exhausted".into())))
    }
}

fn reply(text: &str) -> Result<AiResponse, AiError> {
    Ok(AiResponse {
        content: text.to_string(),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 3,
        },
    })
}

fn session_with(backend: Arc<ScriptedBackend>, max_tokens: usize) -> Session {
    Session::new(
        &ModelEntry::new("test-model", ProviderKind::OpenAi, max_tokens),
        "You are a duck.",
        backend,
        TokenCounter::new().unwrap(),
        RetryPolicy::new(5, Duration::from_secs(2)),
    )
}

fn prime() -> SendOptions {
    SendOptions::new().no_response()
}

#[test]
fn new_session_holds_only_system_turn() {
    let session = session_with(ScriptedBackend::with(vec![]), 12_000);
    assert_eq!(session.messages(), &[Message::system("You are a duck.")]);
    assert_eq!(session.system_prompt(), "You are a duck.");
    assert_eq!(session.model(), "test-model");
    assert_eq!(session.provider(), ProviderKind::OpenAi);
}

#[tokio::test]
async fn no_response_appends_without_calling_provider() {
    let backend = ScriptedBackend::with(vec![]);
    let mut session = session_with(backend.clone(), 12_000);

    let result = session
        .send(Some("quack?".into()), prime().with_role(Role::Assistant))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(backend.call_count(), 0);
    assert_eq!(session.messages()[1], Message::assistant("quack?"));
}

#[tokio::test]
async fn send_appends_reply_and_records_usage() {
    let backend = ScriptedBackend::with(vec![reply("Quack!")]);
    let mut session = session_with(backend.clone(), 12_000);

    let answer = session.chat("Say hi").await.unwrap();

    assert_eq!(answer, "Quack!");
    assert_eq!(
        session.export(),
        vec![
            Message::system("You are a duck."),
            Message::user("Say hi"),
            Message::assistant("Quack!"),
        ]
    );
    assert_eq!(session.tracker().call_count(), 1);
    assert_eq!(session.tracker().total_tokens(), 13);

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls[0].0.len(), 2);
}

#[tokio::test]
async fn generation_params_are_forwarded() {
    let backend = ScriptedBackend::with(vec![reply("ok")]);
    let mut session = session_with(backend.clone(), 12_000);

    session
        .send(
            Some("hi".into()),
            SendOptions::new().with_temperature(0.2).with_max_tokens(64),
        )
        .await
        .unwrap();

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls[0].1.temperature, Some(0.2));
    assert_eq!(calls[0].1.max_tokens, Some(64));
}

#[tokio::test]
async fn send_without_text_requests_completion_of_current_transcript() {
    let backend = ScriptedBackend::with(vec![reply("first words")]);
    let mut session = session_with(backend.clone(), 12_000);

    let answer = session.send(None, SendOptions::new()).await.unwrap();

    assert_eq!(answer.as_deref(), Some("first words"));
    assert_eq!(backend.calls.lock().unwrap()[0].0.len(), 1);
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn system_turn_survives_many_sends() {
    let backend = ScriptedBackend::with(vec![]);
    let mut session = session_with(backend, 60);
    let counter = TokenCounter::new().unwrap();

    for i in 0..30 {
        session
            .send(Some(format!("message number {i} with a few words")), prime())
            .await
            .unwrap();
        assert_eq!(session.messages()[0], Message::system("You are a duck."));
        // Everything before the newest turn fit the budget when it was added.
        let earlier = &session.messages()[..session.message_count() - 1];
        assert!(counter.num_tokens_from_messages(earlier) <= 60 || earlier.len() == 1);
    }
    assert!(session.message_count() < 31);
    assert_eq!(
        session.messages().last().unwrap().content,
        "message number 29 with a few words"
    );
}

#[tokio::test]
async fn trim_is_idempotent() {
    let mut session = session_with(ScriptedBackend::with(vec![]), 80);
    for i in 0..20 {
        session
            .send(Some(format!("turn {i} says something")), prime())
            .await
            .unwrap();
    }

    session.trim();
    let before = session.export();
    assert!(session.token_count() <= 80);
    assert_eq!(session.trim(), 0);
    assert_eq!(session.export(), before);
}

#[tokio::test]
async fn evicts_oldest_non_system_turn_first() {
    let counter = TokenCounter::new().unwrap();
    let system = vec![Message::system("You are a duck.")];
    let with_two = vec![
        Message::system("You are a duck."),
        Message::user("one"),
        Message::user("two"),
    ];
    // Room for the system turn and exactly one short turn.
    let budget = counter.num_tokens_from_messages(&with_two) - 1;
    assert!(budget >= counter.num_tokens_from_messages(&system));

    let mut session = session_with(ScriptedBackend::with(vec![]), budget);
    session.send(Some("one".into()), prime()).await.unwrap();
    session.send(Some("two".into()), prime()).await.unwrap();
    // Over budget now, but nothing is evicted until the next send.
    assert_eq!(session.export(), with_two);

    session.send(Some("three".into()), prime()).await.unwrap();
    assert_eq!(
        session.export(),
        vec![
            Message::system("You are a duck."),
            Message::user("two"),
            Message::user("three"),
        ]
    );
}

#[tokio::test]
async fn oversized_turn_is_sent_then_evicted_whole() {
    let backend = ScriptedBackend::with(vec![reply("ok"), reply("ok again")]);
    let mut session = session_with(backend.clone(), 30);
    let huge = "quack ".repeat(200);

    let answer = session.chat(huge.clone()).await.unwrap();

    assert_eq!(answer, "ok");
    {
        let calls = backend.calls.lock().unwrap();
        assert_eq!(
            calls[0].0,
            vec![Message::system("You are a duck."), Message::user(huge.clone())]
        );
    }
    assert_eq!(session.messages()[1], Message::user(huge.clone()));

    session.chat("next").await.unwrap();

    let calls = backend.calls.lock().unwrap();
    assert_eq!(
        calls[1].0,
        vec![
            Message::system("You are a duck."),
            Message::assistant("ok"),
            Message::user("next"),
        ]
    );
    assert!(session.messages().iter().all(|m| m.content != huge));
}

#[tokio::test]
async fn oversized_system_prompt_is_kept() {
    let backend = ScriptedBackend::with(vec![]);
    let mut session = Session::new(
        &ModelEntry::new("tiny", ProviderKind::Groq, 5),
        "a very long system prompt that cannot possibly fit",
        backend,
        TokenCounter::new().unwrap(),
        RetryPolicy::default(),
    );

    session.send(Some("hello".into()), prime()).await.unwrap();
    session.send(Some("again".into()), prime()).await.unwrap();

    assert_eq!(session.message_count(), 2);
    assert_eq!(session.messages()[0].role, Role::System);
    assert_eq!(session.messages()[1], Message::user("again"));
}

#[tokio::test]
async fn restore_of_export_behaves_identically() {
    let mut original = session_with(ScriptedBackend::with(vec![]), 70);
    for i in 0..6 {
        original
            .send(Some(format!("turn {i} of the talk")), prime())
            .await
            .unwrap();
    }

    let mut restored = Session::restore(
        &ModelEntry::new("test-model", ProviderKind::OpenAi, 70),
        original.export(),
        ScriptedBackend::with(vec![]),
        TokenCounter::new().unwrap(),
        RetryPolicy::default(),
    )
    .unwrap();

    assert_eq!(restored.token_count(), original.token_count());
    assert_eq!(restored.system_prompt(), original.system_prompt());

    for session in [&mut original, &mut restored] {
        session
            .send(Some("one more turn to push the budget".into()), prime())
            .await
            .unwrap();
    }
    assert_eq!(restored.export(), original.export());
}

#[test]
fn restore_rejects_empty_transcript() {
    let result = Session::restore(
        &ModelEntry::new("test-model", ProviderKind::OpenAi, 100),
        vec![],
        ScriptedBackend::with(vec![]),
        TokenCounter::new().unwrap(),
        RetryPolicy::default(),
    );
    assert!(matches!(result, Err(AiError::Configuration(_))));
}

#[test]
fn restore_rejects_missing_system_turn() {
    let result = Session::restore(
        &ModelEntry::new("test-model", ProviderKind::OpenAi, 100),
        vec![Message::user("hi"), Message::assistant("hello")],
        ScriptedBackend::with(vec![]),
        TokenCounter::new().unwrap(),
        RetryPolicy::default(),
    );
    let err = result.err().unwrap();
    assert!(matches!(err, AiError::Configuration(_)));
    assert!(err.to_string().contains("system"));
}

#[tokio::test(start_paused = true)]
async fn four_failures_then_success_takes_five_attempts() {
    let backend = ScriptedBackend::with(vec![
        Err(AiError::NetworkError("reset".into())),
        Err(AiError::Timeout),
        Err(AiError::RateLimited),
        Err(AiError::ApiError("HTTP 502".into())),
        reply("finally"),
    ]);
    let mut session = session_with(backend.clone(), 12_000);

    let answer = session.chat("are you there?").await.unwrap();

    assert_eq!(answer, "finally");
    assert_eq!(backend.call_count(), 5);
    assert_eq!(session.message_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_transient_failure() {
    let backend = ScriptedBackend::with(
        (0..5)
            .map(|_| Err(AiError::NetworkError("down".into())))
            .collect(),
    );
    let mut session = session_with(backend.clone(), 12_000);

    let err = session.chat("hello?").await.unwrap_err();

    assert!(matches!(err, AiError::TransientFailure { attempts: 5, .. }));
    assert_eq!(backend.call_count(), 5);
    // The user turn stays, no assistant turn is added.
    assert_eq!(session.messages().last().unwrap(), &Message::user("hello?"));
}

#[tokio::test]
async fn configuration_errors_are_not_retried() {
    let backend = ScriptedBackend::with(vec![Err(AiError::Configuration("bad key".into()))]);
    let mut session = session_with(backend.clone(), 12_000);

    let err = session.chat("hi").await.unwrap_err();

    assert!(matches!(err, AiError::Configuration(_)));
    assert_eq!(backend.call_count(), 1);
}
