//! High-level coordinator: question → history → completion → formatting → render.

use super::render::IncrementalRenderer;
use super::session::Session;
use super::traits::Presenter;
use super::types::{ControllerError, ControllerState, TurnOutcome};
use crate::history::DEFAULT_MAX_TURNS;
use crate::llm::{CompletionOptions, CompletionService};
use crate::postprocessing::PostProcessor;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Shown and recorded in place of an answer whenever the completion fails.
pub const FALLBACK_MESSAGE: &str =
    "⚠️ Ocorreu um erro ao processar sua pergunta. Por favor, tente novamente.";

pub struct ConversationController {
    completion: Arc<dyn CompletionService>,
    options: CompletionOptions,
    max_turns: usize,
    postprocessor: PostProcessor,
    renderer: IncrementalRenderer,
}

impl ConversationController {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            options: CompletionOptions::default(),
            max_turns: DEFAULT_MAX_TURNS,
            postprocessor: PostProcessor::default(),
            renderer: IncrementalRenderer::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_renderer(mut self, renderer: IncrementalRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_postprocessor(mut self, postprocessor: PostProcessor) -> Self {
        self.postprocessor = postprocessor;
        self
    }

    /// Idle → AwaitingInput.
    pub fn begin(&self, session: &mut Session) {
        if !session.state().accepts_input() {
            // Only reachable if a previous turn's future was dropped mid-flight.
            warn!(session = %session.id(), state = ?session.state(), "Recovering unfinished turn");
        }
        session.set_state(ControllerState::AwaitingInput);
    }

    /// Drive one question to completion. A failing completion is not an
    /// error here: the fallback message is recorded and presented instead.
    #[instrument(skip_all, fields(session = %session.id()))]
    pub async fn submit<P: Presenter + ?Sized>(
        &self,
        session: &mut Session,
        text: &str,
        presenter: &mut P,
    ) -> Result<TurnOutcome, ControllerError> {
        if text.trim().is_empty() {
            return Err(ControllerError::EmptySubmission);
        }

        self.begin(session);
        presenter.echo_user(text);

        let history = session.history_mut();
        history.push_user(text);
        history.truncate(self.max_turns);

        session.set_state(ControllerState::RequestInFlight);
        let start = Instant::now();
        let result = self
            .completion
            .complete(session.history().turns(), &self.options)
            .await;

        match result {
            Ok(raw) => {
                let formatted = self.postprocessor.process(&raw);
                session.history_mut().push_assistant(formatted.clone());
                session.set_state(ControllerState::Rendering);

                self.renderer.render(&formatted, presenter).await;
                session.set_state(ControllerState::Idle);

                info!(
                    latency_ms = start.elapsed().as_millis() as u64,
                    history_len = session.history().len(),
                    blank = formatted.is_empty(),
                    "Question answered"
                );
                Ok(TurnOutcome::Answered { formatted })
            }
            Err(e) => {
                session.set_state(ControllerState::Error);
                error!(
                    latency_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Completion failed, recording fallback answer"
                );

                session.history_mut().push_assistant(FALLBACK_MESSAGE);
                presenter.show_error(FALLBACK_MESSAGE);
                session.set_state(ControllerState::Idle);

                Ok(TurnOutcome::Failed { error: e })
            }
        }
    }
}
