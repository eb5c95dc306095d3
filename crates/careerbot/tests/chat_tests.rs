//! End-to-end tests for the chat loop
//!
//! Drives the loop with a stub model and an in-memory history store, and
//! checks prompt contents, history bookkeeping, and credential failures.

use careerbot::CareerBotError;
use careerbot::chat::{
    ChatLoop, HistoryStore, InMemoryHistory, Outcome, Role, SessionId, TranscriptEntry, Turn,
};
use careerbot::config::ModelConfig;
use careerbot::knowledge;
use careerbot::model::ChatModel;
use careerbot::testing::StubModel;

// =============================================================================
// Test Fixtures and Helpers
// =============================================================================

fn sid(s: &str) -> SessionId {
    SessionId::try_from(s).unwrap()
}

fn chat_with(stub: StubModel, session: &str) -> ChatLoop<InMemoryHistory> {
    ChatLoop::new(
        Box::new(stub),
        InMemoryHistory::new(),
        &knowledge::load(),
        sid(session),
    )
    .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_computer_science_skills_question() {
    let stub = StubModel::replying("Learn Python and data analysis.");
    let calls = stub.calls();
    let mut chat = chat_with(stub, "s1");

    let outcome = chat
        .submit("Computer Science", "What skills should I learn?")
        .await;
    assert_eq!(
        outcome,
        Some(Outcome::Reply("Learn Python and data analysis.".to_string()))
    );

    let prompts = calls.prompts();
    assert_eq!(prompts.len(), 1);
    let system = &prompts[0].system;
    let careers = serde_json::to_string_pretty(&[
        "Software Engineer",
        "Data Scientist",
        "Cybersecurity Analyst",
    ])
    .unwrap();
    let skills =
        serde_json::to_string_pretty(&["Python", "Java", "Data Analysis", "Cybersecurity"])
            .unwrap();
    // Nested two levels deep in the table, so each line carries extra indent
    let indent = |block: &str| block.replace('\n', "\n    ");
    assert!(system.contains(&indent(&careers)), "careers missing:\n{system}");
    assert!(system.contains(&indent(&skills)), "skills missing:\n{system}");

    let history = chat.history_mut().get(&sid("s1"));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "What skills should I learn?");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "Learn Python and data analysis.");
}

#[tokio::test]
async fn test_unrecognized_major_reaches_model() {
    let stub = StubModel::replying("Consider museum curation or teaching.");
    let calls = stub.calls();
    let mut chat = chat_with(stub, "history-major");

    let outcome = chat.submit("Art History", "What jobs exist?").await;
    assert!(matches!(outcome, Some(Outcome::Reply(_))));

    let prompts = calls.prompts();
    let prompt = &prompts[0];
    assert!(prompt.system.contains(
        "If the major is not in the knowledge base, reason about related fields and provide plausible suggestions."
    ));
    assert_eq!(prompt.user, "Major: Art History\nInput: What jobs exist?");
}

#[tokio::test]
async fn test_model_failure_shows_error_without_history() {
    let mut chat = chat_with(StubModel::failing("invalid API key"), "s2");

    let outcome = chat.submit("Biology", "Is pharmacy a good path?").await;
    let Some(Outcome::Failed(message)) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("invalid API key"));

    let last = chat.transcript().last().unwrap();
    assert!(matches!(last, TranscriptEntry::Error(_)));

    let history = chat.history_mut().get(&sid("s2"));
    assert!(history.iter().all(|t| t.role != Role::Assistant));
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_history_grows_in_call_order() {
    let replies = (1..=3).map(|i| Ok(format!("answer {i}"))).collect();
    let mut chat = chat_with(StubModel::scripted(replies), "ordered");

    for i in 1..=3 {
        chat.submit("Business", &format!("question {i}")).await;
    }

    let history = chat.history_mut().get(&sid("ordered"));
    let contents: Vec<&str> = history.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "question 1",
            "answer 1",
            "question 2",
            "answer 2",
            "question 3",
            "answer 3"
        ]
    );
}

#[tokio::test]
async fn test_shared_store_isolates_sessions() {
    let mut store = InMemoryHistory::new();
    store.append(&sid("alice"), Turn::user("alice asks"));
    store.append(&sid("alice"), Turn::assistant("for alice"));

    let stub = StubModel::replying("for bob");
    let calls = stub.calls();
    let mut chat = ChatLoop::new(Box::new(stub), store, &knowledge::load(), sid("bob")).unwrap();
    chat.submit("Business", "bob asks").await;

    // Bob's request never saw Alice's turns
    let prompts = calls.prompts();
    let prompt = &prompts[0];
    assert!(prompt.history.is_empty());
    assert!(!prompt.system.contains("alice asks"));

    let store = chat.history_mut();
    let alice = store.get(&sid("alice"));
    assert_eq!(alice.len(), 2);
    assert_eq!(alice[1].content, "for alice");

    let bob = store.get(&sid("bob"));
    assert_eq!(bob.len(), 2);
    assert_eq!(bob[0].content, "bob asks");
    assert_eq!(bob[1].content, "for bob");
}

#[test]
fn test_missing_credential_halts_before_model_is_built() {
    let config = ModelConfig {
        api_key_env: "CAREERBOT_TEST_UNSET_CREDENTIAL".to_string(),
        ..ModelConfig::default()
    };
    let mut asked = 0;
    let mut built = 0;

    let result = ChatLoop::connect(
        &config,
        InMemoryHistory::new(),
        sid("s1"),
        |env_var| {
            asked += 1;
            assert_eq!(env_var, "CAREERBOT_TEST_UNSET_CREDENTIAL");
            Ok(None)
        },
        |_, _| {
            built += 1;
            Ok(Box::new(StubModel::replying("unreachable")) as Box<dyn ChatModel>)
        },
    );

    let Err(err) = result else {
        panic!("expected a missing credential error");
    };
    assert!(matches!(err, CareerBotError::MissingCredential(_)));
    assert_eq!(asked, 1);
    assert_eq!(built, 0);
}

#[tokio::test]
async fn test_entered_credential_starts_chat() {
    let config = ModelConfig {
        api_key_env: "CAREERBOT_TEST_UNSET_CREDENTIAL_ENTERED".to_string(),
        ..ModelConfig::default()
    };
    let stub = StubModel::replying("Consider product management.");
    let calls = stub.calls();
    let mut seen_key = None;

    let mut chat = ChatLoop::connect(
        &config,
        InMemoryHistory::new(),
        sid("s1"),
        |_| Ok(Some("typed-key\n".to_string())),
        |_, key| {
            seen_key = Some(key.expose().to_string());
            Ok(Box::new(stub) as Box<dyn ChatModel>)
        },
    )
    .unwrap();
    assert_eq!(seen_key.as_deref(), Some("typed-key"));
    assert!(chat.transcript().is_empty());

    chat.submit("Business", "What roles fit me?").await;
    assert_eq!(calls.count(), 1);
}
