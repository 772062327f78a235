use super::*;
use crate::history::{Role, Turn};
use crate::llm::{CompletionOptions, CompletionService, RequestError};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Completion fake: replays scripted replies and records every history it saw.
#[derive(Default)]
struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, RequestError>>>,
    seen: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedCompletion {
    fn new(replies: Vec<Result<String, RequestError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::default(),
        })
    }

    fn seen(&self) -> Vec<Vec<Turn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        turns: &[Turn],
        _options: &CompletionOptions,
    ) -> Result<String, RequestError> {
        self.seen.lock().unwrap().push(turns.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("1. padrão".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Echo(String),
    Partial(String),
    Final(String),
    Error(String),
}

#[derive(Default)]
struct RecordingPresenter {
    events: Vec<Event>,
}

impl Presenter for RecordingPresenter {
    fn echo_user(&mut self, text: &str) {
        self.events.push(Event::Echo(text.to_string()));
    }

    fn show_partial(&mut self, snapshot: &str) {
        self.events.push(Event::Partial(snapshot.to_string()));
    }

    fn show_final(&mut self, text: &str) {
        self.events.push(Event::Final(text.to_string()));
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(Event::Error(message.to_string()));
    }
}

fn controller(completion: Arc<ScriptedCompletion>) -> ConversationController {
    ConversationController::new(completion).with_renderer(IncrementalRenderer::immediate())
}

const LAJE_REPLY: &str = "1. A área {discard} é base vezes altura. \
    2. \\frac A = b × h \
    3. =A1*B1 \
    4. Laje de 4m por 5m: 20 m²";

#[tokio::test]
async fn answers_a_question_end_to_end() {
    let completion = ScriptedCompletion::new(vec![Ok(LAJE_REPLY.to_string())]);
    let controller = controller(completion.clone());
    let mut session = Session::new("aluno@coeso.com.br", "sistema");
    let mut presenter = RecordingPresenter::default();

    let outcome = controller
        .submit(&mut session, "Como calcular área de laje de 4m por 5m?", &mut presenter)
        .await
        .unwrap();

    let expected = "**1. Explicação técnica breve**\n\nA área  é base vezes altura.\n\n\
                    **2. Fórmula matemática clara**\n\nA = b × h\n\n\
                    **3. Fórmula Excel aplicável**\n\n=A1*B1\n\n\
                    **4. Exemplo numérico completo**\n\nLaje de 4m por 5m: 20 m²";

    match &outcome {
        TurnOutcome::Answered { formatted } => assert_eq!(formatted, expected),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let turns = session.history().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1], Turn::user("Como calcular área de laje de 4m por 5m?"));
    assert_eq!(turns[2], Turn::assistant(expected));
    assert_eq!(session.state(), ControllerState::Idle);

    // The completion saw system + question, nothing else.
    let seen = completion.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 2);
    assert_eq!(seen[0][0].role(), Role::System);

    assert_eq!(
        presenter.events.first(),
        Some(&Event::Echo("Como calcular área de laje de 4m por 5m?".into()))
    );
    assert_eq!(presenter.events.last(), Some(&Event::Final(expected.into())));
    let partials = presenter
        .events
        .iter()
        .filter(|e| matches!(e, Event::Partial(_)))
        .count();
    assert_eq!(partials, 8);
}

#[tokio::test]
async fn failure_records_fallback_and_recovers() {
    let completion = ScriptedCompletion::new(vec![
        Err(RequestError::Timeout),
        Ok("1. Segunda tentativa".to_string()),
    ]);
    let controller = controller(completion);
    let mut session = Session::new("aluno@coeso.com.br", "sistema");
    let mut presenter = RecordingPresenter::default();

    let outcome = controller
        .submit(&mut session, "Qual a fórmula do volume?", &mut presenter)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        TurnOutcome::Failed {
            error: RequestError::Timeout
        }
    ));
    assert_eq!(session.history().last(), &Turn::assistant(FALLBACK_MESSAGE));
    assert_eq!(session.state(), ControllerState::Idle);
    assert_eq!(
        presenter.events,
        vec![
            Event::Echo("Qual a fórmula do volume?".into()),
            Event::Error(FALLBACK_MESSAGE.into()),
        ]
    );

    let outcome = controller
        .submit(&mut session, "Tente de novo", &mut presenter)
        .await
        .unwrap();
    assert!(outcome.is_answered());
    assert_eq!(session.history().len(), 5);
}

#[tokio::test]
async fn completion_receives_truncated_history() {
    let completion = ScriptedCompletion::new(Vec::new());
    let controller = controller(completion.clone()).with_max_turns(4);
    let mut session = Session::new("aluno@coeso.com.br", "sistema");
    let mut presenter = RecordingPresenter::default();

    for i in 0..5 {
        controller
            .submit(&mut session, &format!("pergunta {i}"), &mut presenter)
            .await
            .unwrap();
    }

    for seen in completion.seen() {
        assert!(seen.len() <= 5);
        assert_eq!(seen[0], Turn::system("sistema"));
    }

    let last = completion.seen().pop().unwrap();
    assert_eq!(last.last(), Some(&Turn::user("pergunta 4")));
    // Truncation happens before the request, so the stored reply adds one more.
    assert_eq!(session.history().len(), 6);
}

#[tokio::test]
async fn empty_submission_is_rejected_without_side_effects() {
    let completion = ScriptedCompletion::new(Vec::new());
    let controller = controller(completion.clone());
    let mut session = Session::new("aluno@coeso.com.br", "sistema");
    let mut presenter = RecordingPresenter::default();

    let result = controller.submit(&mut session, "   \n", &mut presenter).await;

    assert_eq!(result.unwrap_err(), ControllerError::EmptySubmission);
    assert_eq!(session.history().len(), 1);
    assert!(presenter.events.is_empty());
    assert!(completion.seen().is_empty());
}

#[tokio::test]
async fn reply_without_markers_renders_blank() {
    let completion = ScriptedCompletion::new(vec![Ok("Sem seções aqui".to_string())]);
    let controller = controller(completion);
    let mut session = Session::new("aluno@coeso.com.br", "sistema");
    let mut presenter = RecordingPresenter::default();

    let outcome = controller
        .submit(&mut session, "Oi", &mut presenter)
        .await
        .unwrap();

    match outcome {
        TurnOutcome::Answered { formatted } => assert!(formatted.is_empty()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(session.history().last(), &Turn::assistant(""));
    assert_eq!(presenter.events.last(), Some(&Event::Final(String::new())));
}

#[tokio::test]
async fn reset_returns_to_system_turn() {
    let completion = ScriptedCompletion::new(Vec::new());
    let controller = controller(completion);
    let mut session = Session::new("aluno@coeso.com.br", "sistema");
    let mut presenter = RecordingPresenter::default();

    controller
        .submit(&mut session, "pergunta", &mut presenter)
        .await
        .unwrap();
    session.reset();

    assert_eq!(session.history().turns(), &[Turn::system("sistema")]);
    assert_eq!(session.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn renderer_waits_between_paragraphs() {
    let renderer = IncrementalRenderer::new(Duration::from_millis(200));
    let mut presenter = RecordingPresenter::default();
    let start = tokio::time::Instant::now();

    renderer.render("um\n\ndois\n\ntrês", &mut presenter).await;

    assert_eq!(start.elapsed(), Duration::from_millis(600));
    assert_eq!(
        presenter.events,
        vec![
            Event::Partial(format!("um\n\n{CURSOR}")),
            Event::Partial(format!("um\n\ndois\n\n{CURSOR}")),
            Event::Partial(format!("um\n\ndois\n\ntrês\n\n{CURSOR}")),
            Event::Final("um\n\ndois\n\ntrês".into()),
        ]
    );
}

#[test]
fn blank_paragraphs_produce_no_snapshots() {
    assert!(IncrementalRenderer::snapshots("").is_empty());
    assert_eq!(IncrementalRenderer::snapshots("a\n\n\n\nb").len(), 2);
}

#[tokio::test]
async fn sessions_are_isolated() {
    let store = SessionStore::new();
    let completion = ScriptedCompletion::new(Vec::new());
    let controller = controller(completion);

    let a = store.open("a@coeso.com.br", "sistema").await;
    let b = store.open("b@coeso.com.br", "sistema").await;
    assert_ne!(a, b);
    assert_eq!(store.len().await, 2);

    {
        let session = store.get(a).await.unwrap();
        let mut session = session.lock().await;
        controller
            .submit(&mut session, "só na sessão A", &mut RecordingPresenter::default())
            .await
            .unwrap();
        assert_eq!(session.history().len(), 3);
    }

    let other = store.get(b).await.unwrap();
    assert_eq!(other.lock().await.history().len(), 1);
    assert_eq!(other.lock().await.email(), "b@coeso.com.br");

    assert!(store.close(a).await);
    assert!(!store.close(a).await);
    assert!(store.get(a).await.is_none());
    assert_eq!(store.len().await, 1);
}
