//! Run Deliberation use case
//!
//! Orchestrates the full roundtable flow:
//!
//! ```text
//! idle → round1 → (round2 | skip) → (round2.5 | skip) → round3 → complete
//!          │
//!          └─ fewer than 2 successes → error
//! ```
//!
//! Every round fans out one concurrent call per participant and waits for all
//! of them to settle before the next round starts. Individual call failures
//! are recorded on that model's response and never abort the round.

use crate::config::ExecutionParams;
use crate::ports::event_sink::{EventSink, NoEvents};
use crate::ports::llm_transport::LlmTransport;
use crate::use_cases::call_model::{CallError, CallOutput, CallParams, StreamingCallClient};
use crate::use_cases::response_board::ResponseBoard;
use roundtable_domain::{
    DeliberationConfig, DeliberationEvent, DeliberationResult, DeliberationStatus, Message, Model,
    ModelRef, PromptTemplate, Round, RoundResponse, select_synthesizer,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Minimum number of participants, and of Round 1 successes, for a run.
pub const MIN_PARTICIPANTS: usize = 2;

/// Conditions that abort a whole run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunDeliberationError {
    #[error("At least 2 models are required for a roundtable.")]
    TooFewModels(usize),

    #[error("Model {0} is listed more than once")]
    DuplicateModel(ModelRef),

    #[error("Not enough models responded in Round 1. Need at least 2.")]
    NotEnoughResponses { succeeded: usize },

    #[error("No model available for synthesis")]
    NoSynthesizer,

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Deliberation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RunDeliberationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDeliberationError::Cancelled)
    }

    /// Whether the run failed before any call was made.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RunDeliberationError::TooFewModels(_) | RunDeliberationError::DuplicateModel(_)
        )
    }
}

/// One call of a round's fan-out
struct RoundCall {
    model: Model,
    messages: Vec<Message>,
    params: CallParams,
}

/// Use case for running a roundtable deliberation
pub struct RunDeliberationUseCase<T: LlmTransport + 'static> {
    client: StreamingCallClient<T>,
    params: ExecutionParams,
    cancellation_token: CancellationToken,
}

impl<T: LlmTransport + 'static> RunDeliberationUseCase<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let params = ExecutionParams::default();
        Self {
            client: StreamingCallClient::new(transport).with_timeout(params.call_timeout),
            params,
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.client = self.client.with_timeout(params.call_timeout);
        self.params = params;
        self
    }

    /// Cancel every in-flight call when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Execute the use case without event reporting
    pub async fn execute_silent(
        &self,
        config: DeliberationConfig,
    ) -> Result<DeliberationResult, RunDeliberationError> {
        self.execute(config, Arc::new(NoEvents)).await
    }

    /// Execute the use case, reporting progress to `sink`.
    ///
    /// Exactly one terminal event is emitted: `Complete` carrying the result,
    /// or `Error` carrying the message of the returned error.
    pub async fn execute(
        &self,
        config: DeliberationConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<DeliberationResult, RunDeliberationError> {
        match self.run(&config, &sink).await {
            Ok(result) => {
                info!(id = %result.id, "Deliberation complete");
                set_status(&sink, DeliberationStatus::Complete);
                sink.on_event(&DeliberationEvent::Complete {
                    result: Box::new(result.clone()),
                });
                Ok(result)
            }
            Err(e) => {
                warn!("Deliberation failed: {}", e);
                set_status(&sink, DeliberationStatus::Error);
                sink.on_event(&DeliberationEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        config: &DeliberationConfig,
        sink: &Arc<dyn EventSink>,
    ) -> Result<DeliberationResult, RunDeliberationError> {
        if config.models.len() < MIN_PARTICIPANTS {
            return Err(RunDeliberationError::TooFewModels(config.models.len()));
        }
        if let Some(duplicate) = config.find_duplicate() {
            return Err(RunDeliberationError::DuplicateModel(duplicate.clone()));
        }

        info!(
            models = config.models.len(),
            mode = %config.mode,
            "Starting roundtable"
        );

        let board = Arc::new(ResponseBoard::new());
        let mut result = DeliberationResult::new(
            config.question.content(),
            config.mode,
            config.rounds,
        );

        // Round 1: Independent answers
        let round1 = self.round_independent(config, &board, sink).await?;
        result.round1 = board.responses(Round::Independent);
        if round1.len() < MIN_PARTICIPANTS {
            return Err(RunDeliberationError::NotEnoughResponses {
                succeeded: round1.len(),
            });
        }

        // Round 2: Cross-examination (skipped in quick mode)
        let round2 = if config.mode.includes_cross_examination() {
            let round2 = self
                .round_cross_examination(config, &round1, &board, sink)
                .await?;
            result.round2 = board.responses(Round::CrossExamination);
            round2
        } else {
            debug!("Quick mode: skipping cross-examination");
            Vec::new()
        };

        // Round 2.5: Debate (debate mode, and only with Round 2 survivors)
        let round2_5 = if config.mode.includes_debate() && !round2.is_empty() {
            let round2_5 = self
                .round_debate(config, &round1, &round2, &board, sink)
                .await?;
            result.round2_5 = Some(board.responses(Round::Debate));
            round2_5
        } else {
            Vec::new()
        };

        // Round 3: Synthesis
        let final_answer = self
            .round_synthesis(config, &round1, &round2, &round2_5, &board, sink)
            .await?;
        result.synthesizer = Some(final_answer.model.clone());
        result.final_answer = Some(final_answer);

        Ok(result)
    }

    /// Round 1: every model answers the raw question
    async fn round_independent(
        &self,
        config: &DeliberationConfig,
        board: &Arc<ResponseBoard>,
        sink: &Arc<dyn EventSink>,
    ) -> Result<Vec<RoundResponse>, RunDeliberationError> {
        let question = config.question.content();
        let calls = config
            .models
            .iter()
            .map(|model| {
                let settings = config.settings_for(&model.reference);
                RoundCall {
                    model: model.clone(),
                    messages: Message::conversation(settings.system_prompt(), question),
                    params: CallParams {
                        temperature: settings.temperature,
                        max_tokens: settings.max_tokens,
                    },
                }
            })
            .collect();

        self.run_round(Round::Independent, calls, Some(MIN_PARTICIPANTS), board, sink)
            .await?;
        Ok(board.successes(Round::Independent))
    }

    /// Round 2: each Round 1 survivor reads every other survivor's answer
    async fn round_cross_examination(
        &self,
        config: &DeliberationConfig,
        round1: &[RoundResponse],
        board: &Arc<ResponseBoard>,
        sink: &Arc<dyn EventSink>,
    ) -> Result<Vec<RoundResponse>, RunDeliberationError> {
        let question = config.question.content();
        let calls = participants(config, round1)
            .into_iter()
            .map(|model| {
                let others: Vec<RoundResponse> = round1
                    .iter()
                    .filter(|r| r.model != model.reference)
                    .cloned()
                    .collect();
                let prompt =
                    PromptTemplate::cross_exam_prompt(question, &PromptTemplate::entries(&others));
                follow_up_call(config, model, prompt)
            })
            .collect();

        self.run_round(Round::CrossExamination, calls, None, board, sink)
            .await?;
        Ok(board.successes(Round::CrossExamination))
    }

    /// Round 2.5: Round 2 survivors argue over both transcripts
    async fn round_debate(
        &self,
        config: &DeliberationConfig,
        round1: &[RoundResponse],
        round2: &[RoundResponse],
        board: &Arc<ResponseBoard>,
        sink: &Arc<dyn EventSink>,
    ) -> Result<Vec<RoundResponse>, RunDeliberationError> {
        let prompt = PromptTemplate::debate_prompt(
            config.question.content(),
            &PromptTemplate::entries(round1),
            &PromptTemplate::entries(round2),
        );
        let calls = participants(config, round2)
            .into_iter()
            .map(|model| follow_up_call(config, model, prompt.clone()))
            .collect();

        self.run_round(Round::Debate, calls, None, board, sink).await?;
        Ok(board.successes(Round::Debate))
    }

    /// Round 3: a single call to the selected synthesizer
    async fn round_synthesis(
        &self,
        config: &DeliberationConfig,
        round1: &[RoundResponse],
        round2: &[RoundResponse],
        round2_5: &[RoundResponse],
        board: &Arc<ResponseBoard>,
        sink: &Arc<dyn EventSink>,
    ) -> Result<RoundResponse, RunDeliberationError> {
        let pool = if round2.is_empty() { round1 } else { round2 };
        let candidates: Vec<Model> = participants(config, pool).into_iter().cloned().collect();
        let synthesizer = select_synthesizer(&candidates, &config.synthesizer)
            .cloned()
            .ok_or(RunDeliberationError::NoSynthesizer)?;
        info!(synthesizer = %synthesizer.reference, "Synthesizer selected");

        let prompt = PromptTemplate::synthesis_prompt(
            config.question.content(),
            &PromptTemplate::entries(round1),
            &PromptTemplate::entries(round2),
            &PromptTemplate::entries(round2_5),
        );
        let reference = synthesizer.reference.clone();
        let call = RoundCall {
            model: synthesizer,
            messages: vec![Message::user(prompt)],
            params: CallParams {
                temperature: self.params.synthesis.temperature,
                max_tokens: self.params.synthesis.max_tokens,
            },
        };

        self.run_round(Round::Synthesis, vec![call], None, board, sink)
            .await?;

        match board.get(Round::Synthesis, &reference) {
            Some(response) if response.is_success() => Ok(response),
            Some(response) => Err(RunDeliberationError::SynthesisFailed(
                response.error.unwrap_or_default(),
            )),
            None => Err(RunDeliberationError::Internal(format!(
                "no synthesis response recorded for {}",
                reference
            ))),
        }
    }

    /// Fan out one call per entry and wait for all of them to settle.
    ///
    /// With a `gate`, still-running calls are cancelled as soon as fewer than
    /// `gate` successes remain possible.
    async fn run_round(
        &self,
        round: Round,
        calls: Vec<RoundCall>,
        gate: Option<usize>,
        board: &Arc<ResponseBoard>,
        sink: &Arc<dyn EventSink>,
    ) -> Result<(), RunDeliberationError> {
        if self.cancellation_token.is_cancelled() {
            return Err(RunDeliberationError::Cancelled);
        }

        info!(round = round.as_str(), calls = calls.len(), "Round started");
        set_status(sink, round.status());
        sink.on_event(&DeliberationEvent::RoundStart {
            round,
            models: calls.iter().map(|c| c.model.reference.clone()).collect(),
        });
        for call in &calls {
            board.open(round, &call.model);
        }

        let total = calls.len();
        let round_token = self.cancellation_token.child_token();
        let mut join_set = JoinSet::new();

        for call in calls {
            let client = self.client.clone();
            let board = Arc::clone(board);
            let sink = Arc::clone(sink);
            let token = round_token.clone();

            join_set.spawn(async move {
                let reference = call.model.reference.clone();
                let result = client
                    .call(&call.model, call.messages, call.params, &token, |chunk| {
                        if board.append_token(round, &reference, chunk) {
                            sink.on_event(&DeliberationEvent::Token {
                                round,
                                model: reference.clone(),
                                chunk: chunk.to_string(),
                            });
                        }
                    })
                    .await;
                settle(round, &reference, result, &board, sink.as_ref())
            });
        }

        let mut failed = 0usize;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(true) => {}
                Ok(false) => failed += 1,
                Err(e) => {
                    warn!(round = round.as_str(), "Call task join error: {}", e);
                    failed += 1;
                }
            }

            if let Some(min) = gate {
                if total.saturating_sub(failed) < min && !round_token.is_cancelled() {
                    info!(
                        round = round.as_str(),
                        failed, "Round can no longer succeed; cancelling remaining calls"
                    );
                    round_token.cancel();
                }
            }
        }

        // Tasks that died without settling their response
        for reference in board.unsettled(round) {
            settle_failure(round, &reference, "call task panicked", board, sink.as_ref());
        }

        let responses = board.responses(round);
        let succeeded = responses.iter().filter(|r| r.is_success()).count();
        info!(
            round = round.as_str(),
            succeeded,
            failed = responses.len() - succeeded,
            "Round finished"
        );
        sink.on_event(&DeliberationEvent::RoundFinished {
            round,
            succeeded,
            failed: responses.len() - succeeded,
        });

        if self.cancellation_token.is_cancelled() {
            return Err(RunDeliberationError::Cancelled);
        }
        Ok(())
    }
}

/// Participants with a response in `responses`, in configuration order
fn participants<'a>(config: &'a DeliberationConfig, responses: &[RoundResponse]) -> Vec<&'a Model> {
    config
        .models
        .iter()
        .filter(|m| responses.iter().any(|r| r.model == m.reference))
        .collect()
}

/// Call for rounds 2 and 2.5: the prompt alone, with the model's own sampling settings
fn follow_up_call(config: &DeliberationConfig, model: &Model, prompt: String) -> RoundCall {
    let settings = config.settings_for(&model.reference);
    RoundCall {
        model: model.clone(),
        messages: vec![Message::user(prompt)],
        params: CallParams {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        },
    }
}

fn set_status(sink: &Arc<dyn EventSink>, status: DeliberationStatus) {
    sink.on_event(&DeliberationEvent::StatusChanged { status });
}

/// Record a settled call and emit its terminal event. Returns whether it succeeded.
fn settle(
    round: Round,
    reference: &ModelRef,
    result: Result<CallOutput, CallError>,
    board: &ResponseBoard,
    sink: &dyn EventSink,
) -> bool {
    match result {
        Ok(CallOutput { text, usage }) => {
            debug!(round = round.as_str(), model = %reference, "Model responded");
            if board.complete(round, reference, text.clone(), usage) {
                sink.on_event(&DeliberationEvent::RoundComplete {
                    round,
                    model: reference.clone(),
                    text,
                    usage,
                });
            }
            true
        }
        Err(e) => {
            settle_failure(round, reference, &e.to_string(), board, sink);
            false
        }
    }
}

fn settle_failure(
    round: Round,
    reference: &ModelRef,
    error: &str,
    board: &ResponseBoard,
    sink: &dyn EventSink,
) {
    warn!(round = round.as_str(), model = %reference, "Model call failed: {}", error);
    if board.fail(round, reference, error) {
        sink.on_event(&DeliberationEvent::RoundError {
            round,
            model: reference.clone(),
            error: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::event_sink::ChannelEventSink;
    use crate::ports::llm_transport::{ChatRequest, GatewayError, StreamHandle};
    use async_trait::async_trait;
    use roundtable_domain::{
        ApiKey, DeliberationMode, GenerationOverrides, Question, Role, StreamEvent,
        SynthesizerChoice, TokenUsage,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    /// How the scripted transport answers one request
    #[derive(Clone)]
    enum Reply {
        /// Stream these chunks, then complete
        Chunks(Vec<&'static str>),
        /// Reject with an HTTP error
        Fail(u16),
        /// Never send anything until the receiver goes away
        Stall,
        /// Panic inside the call task
        Panic,
    }

    /// Mock transport keyed by `provider:model`. Each model has a queue of
    /// replies; once it is empty the model answers `answer from <model>`.
    struct ScriptedTransport {
        scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn script(self, model: &str, replies: Vec<Reply>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(model.to_string(), replies.into());
            self
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn requests_for(&self, model: &str) -> Vec<ChatRequest> {
            self.requests()
                .into_iter()
                .filter(|r| r.model.to_string() == model)
                .collect()
        }
    }

    #[async_trait]
    impl LlmTransport for ScriptedTransport {
        async fn stream_chat(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
            let key = request.model.to_string();
            self.requests.lock().unwrap().push(request);
            let reply = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&key)
                .and_then(|q| q.pop_front());

            let (tx, rx) = tokio::sync::mpsc::channel(16);
            match reply {
                Some(Reply::Fail(status)) => {
                    return Err(GatewayError::Http {
                        status,
                        body: "scripted failure".to_string(),
                    });
                }
                Some(Reply::Panic) => panic!("scripted panic"),
                Some(Reply::Stall) => {
                    tokio::spawn(async move { tx.closed().await });
                }
                Some(Reply::Chunks(chunks)) => {
                    tokio::spawn(async move {
                        for chunk in chunks {
                            let _ = tx.send(StreamEvent::Delta(chunk.to_string())).await;
                        }
                        let _ = tx
                            .send(StreamEvent::completed(TokenUsage::new(Some(10), Some(5))))
                            .await;
                    });
                }
                None => {
                    let text = format!("answer from {}", key);
                    tokio::spawn(async move {
                        let _ = tx.send(StreamEvent::Delta(text)).await;
                    });
                }
            }
            Ok(StreamHandle::new(rx))
        }
    }

    fn model(reference: &str, capability: u8) -> Model {
        let reference: ModelRef = reference.parse().unwrap();
        let name = reference.model_id().to_uppercase();
        Model::new(reference, ApiKey::new("key"))
            .with_name(name)
            .with_capability(capability)
    }

    fn config(models: Vec<Model>) -> DeliberationConfig {
        DeliberationConfig::new(Question::try_new("Is Rust fast?").unwrap(), models)
    }

    fn three_models() -> Vec<Model> {
        vec![
            model("openai:gpt-4o", 9),
            model("anthropic:claude", 9),
            model("groq:llama", 6),
        ]
    }

    async fn run(
        transport: Arc<ScriptedTransport>,
        config: DeliberationConfig,
    ) -> (
        Result<DeliberationResult, RunDeliberationError>,
        Vec<DeliberationEvent>,
    ) {
        let (sink, mut rx) = ChannelEventSink::channel();
        let use_case = RunDeliberationUseCase::new(transport);
        let result = use_case.execute(config, Arc::new(sink)).await;
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        (result, events)
    }

    fn round_starts(events: &[DeliberationEvent]) -> Vec<Round> {
        events
            .iter()
            .filter_map(|e| match e {
                DeliberationEvent::RoundStart { round, .. } => Some(*round),
                _ => None,
            })
            .collect()
    }

    fn user_prompt(request: &ChatRequest) -> &str {
        request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap()
    }

    #[tokio::test]
    async fn test_too_few_models_makes_no_calls() {
        let transport = Arc::new(ScriptedTransport::new());
        let (result, events) = run(transport.clone(), config(vec![model("openai:gpt-4o", 9)])).await;

        assert_eq!(result.unwrap_err(), RunDeliberationError::TooFewModels(1));
        assert!(transport.requests().is_empty());
        let last = events.last().unwrap();
        assert!(matches!(last, DeliberationEvent::Error { message }
            if message == "At least 2 models are required for a roundtable."));
        assert!(round_starts(&events).is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_models_are_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let models = vec![model("openai:gpt-4o", 9), model("openai:gpt-4o", 9)];
        let (result, _) = run(transport.clone(), config(models)).await;

        let err = result.unwrap_err();
        assert!(err.is_configuration_error());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_standard_run() {
        let transport = Arc::new(ScriptedTransport::new());
        let config = config(three_models()).with_settings(
            "groq:llama".parse().unwrap(),
            GenerationOverrides::default()
                .with_system_prompt("Be terse.")
                .with_temperature(1.1),
        );
        let (result, events) = run(transport.clone(), config).await;
        let result = result.unwrap();

        assert_eq!(
            round_starts(&events),
            vec![Round::Independent, Round::CrossExamination, Round::Synthesis]
        );
        assert!(matches!(events.last(), Some(DeliberationEvent::Complete { .. })));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert_eq!(transport.requests().len(), 7);

        assert_eq!(result.round1.len(), 3);
        assert_eq!(result.round2.len(), 3);
        assert!(result.round2_5.is_none());
        assert_eq!(result.synthesizer, Some("openai:gpt-4o".parse().unwrap()));
        assert_eq!(result.final_text(), Some("answer from openai:gpt-4o"));

        // Round 1 carries the system prompt; later rounds send the prompt alone
        let llama = transport.requests_for("groq:llama");
        assert_eq!(llama[0].messages.len(), 2);
        assert_eq!(llama[0].messages[0].role, Role::System);
        assert_eq!(llama[0].temperature, 1.1);
        assert_eq!(llama[1].messages.len(), 1);
        assert_eq!(llama[1].temperature, 1.1);

        // Synthesis overrides per-model sampling
        let synthesis = transport.requests_for("openai:gpt-4o").pop().unwrap();
        assert_eq!(synthesis.temperature, 0.5);
        assert_eq!(synthesis.max_tokens, 4096);
        assert!(user_prompt(&synthesis).starts_with("You are the final synthesizer"));
    }

    #[tokio::test]
    async fn test_single_round1_success_aborts() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("anthropic:claude", vec![Reply::Fail(500)])
                .script("groq:llama", vec![Reply::Fail(429)]),
        );
        let (result, events) = run(transport.clone(), config(three_models())).await;

        assert_eq!(
            result.unwrap_err(),
            RunDeliberationError::NotEnoughResponses { succeeded: 1 }
        );
        assert_eq!(round_starts(&events), vec![Round::Independent]);
        assert_eq!(transport.requests().len(), 3);
        assert!(matches!(events.last(), Some(DeliberationEvent::Error { message })
            if message == "Not enough models responded in Round 1. Need at least 2."));
    }

    #[tokio::test]
    async fn test_round2_uses_only_round1_survivors() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("openai:gpt-4o", vec![Reply::Chunks(vec!["alpha answer"])])
                .script("anthropic:claude", vec![Reply::Fail(500)])
                .script("groq:llama", vec![Reply::Chunks(vec!["gamma answer"])])
                .script("mistral:large", vec![Reply::Fail(401)])
                .script("xai:grok", vec![Reply::Fail(503)]),
        );
        let mut models = three_models();
        models.push(model("mistral:large", 8));
        models.push(model("xai:grok", 8));
        let (result, _) = run(transport.clone(), config(models)).await;
        let result = result.unwrap();

        assert_eq!(result.round2.len(), 2);
        assert!(transport.requests_for("anthropic:claude").len() == 1);

        let gpt = transport.requests_for("openai:gpt-4o");
        let prompt = user_prompt(&gpt[1]);
        assert!(prompt.contains("[LLAMA]: \"gamma answer\""));
        assert!(!prompt.contains("alpha answer"));

        let llama = transport.requests_for("groq:llama");
        let prompt = user_prompt(&llama[1]);
        assert!(prompt.contains("[GPT-4O]: \"alpha answer\""));
        assert!(!prompt.contains("gamma answer"));
    }

    #[tokio::test]
    async fn test_quick_mode_skips_round2() {
        let transport = Arc::new(ScriptedTransport::new());
        let config = config(three_models()).with_mode(DeliberationMode::Quick);
        let (result, events) = run(transport.clone(), config).await;
        let result = result.unwrap();

        assert_eq!(
            round_starts(&events),
            vec![Round::Independent, Round::Synthesis]
        );
        assert!(events.iter().all(|e| !matches!(
            e.round(),
            Some(Round::CrossExamination) | Some(Round::Debate)
        )));
        assert!(result.round2.is_empty());
        assert_eq!(transport.requests().len(), 4);

        let synthesis = transport.requests().pop().unwrap();
        assert!(user_prompt(&synthesis)
            .contains("Round 2 cross-examination responses:\n\n\nProduce a single"));
    }

    #[tokio::test]
    async fn test_debate_mode_runs_round2_5() {
        let transport = Arc::new(ScriptedTransport::new());
        let config = config(three_models()).with_mode(DeliberationMode::Debate);
        let (result, events) = run(transport.clone(), config).await;
        let result = result.unwrap();

        assert_eq!(
            round_starts(&events),
            vec![
                Round::Independent,
                Round::CrossExamination,
                Round::Debate,
                Round::Synthesis
            ]
        );
        assert_eq!(result.round2_5.as_ref().map(Vec::len), Some(3));

        let debate = &transport.requests_for("groq:llama")[2];
        assert!(user_prompt(debate).starts_with("You are in the debate round"));
        let synthesis = transport.requests().pop().unwrap();
        assert!(user_prompt(&synthesis).contains("Debate round responses:\n"));
    }

    #[tokio::test]
    async fn test_debate_without_round2_successes_falls_back_to_round1() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("openai:gpt-4o", vec![Reply::Chunks(vec!["a"]), Reply::Fail(500)])
                .script("anthropic:claude", vec![Reply::Chunks(vec!["b"]), Reply::Fail(500)])
                .script("groq:llama", vec![Reply::Chunks(vec!["c"]), Reply::Fail(500)]),
        );
        let config = config(three_models()).with_mode(DeliberationMode::Debate);
        let (result, events) = run(transport.clone(), config).await;
        let result = result.unwrap();

        assert_eq!(
            round_starts(&events),
            vec![Round::Independent, Round::CrossExamination, Round::Synthesis]
        );
        assert!(result.round2_5.is_none());
        assert!(result.round2.iter().all(|r| !r.is_success()));
        // Capability 9 tie goes to the first Round 1 survivor
        assert_eq!(result.synthesizer, Some("openai:gpt-4o".parse().unwrap()));
        let synthesis = transport.requests().pop().unwrap();
        assert!(!user_prompt(&synthesis).contains("Debate round responses"));
    }

    #[tokio::test]
    async fn test_preferred_synthesizer() {
        let transport = Arc::new(ScriptedTransport::new());
        let preferred = config(three_models())
            .with_synthesizer(SynthesizerChoice::Model("groq:llama".parse().unwrap()));
        let (result, _) = run(transport.clone(), preferred).await;
        assert_eq!(
            result.unwrap().synthesizer,
            Some("groq:llama".parse().unwrap())
        );

        // A preferred model that dropped out falls back to capability
        let transport = Arc::new(
            ScriptedTransport::new().script("groq:llama", vec![Reply::Fail(500)]),
        );
        let dropped_out = config(three_models())
            .with_synthesizer(SynthesizerChoice::Model("groq:llama".parse().unwrap()));
        let (result, _) = run(transport, dropped_out).await;
        assert_eq!(
            result.unwrap().synthesizer,
            Some("openai:gpt-4o".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_fatal() {
        let transport = Arc::new(ScriptedTransport::new().script(
            "openai:gpt-4o",
            vec![
                Reply::Chunks(vec!["a"]),
                Reply::Chunks(vec!["a2"]),
                Reply::Fail(502),
            ],
        ));
        let (result, events) = run(transport, config(three_models())).await;

        assert_eq!(
            result.unwrap_err(),
            RunDeliberationError::SynthesisFailed("API error: 502 - scripted failure".to_string())
        );
        assert!(events.iter().any(|e| matches!(e,
            DeliberationEvent::RoundError { round: Round::Synthesis, .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, DeliberationEvent::Complete { .. })));
    }

    #[tokio::test]
    async fn test_tokens_precede_completion_per_model() {
        let transport = Arc::new(ScriptedTransport::new().script(
            "anthropic:claude",
            vec![Reply::Chunks(vec!["Yes, ", "it ", "is."])],
        ));
        let (result, events) = run(transport, config(three_models())).await;
        let result = result.unwrap();

        let claude: ModelRef = "anthropic:claude".parse().unwrap();
        let mut streamed = String::new();
        let mut completed = None;
        for event in &events {
            match event {
                DeliberationEvent::Token { round: Round::Independent, model, chunk }
                    if *model == claude =>
                {
                    assert!(completed.is_none(), "token after completion");
                    streamed.push_str(chunk);
                }
                DeliberationEvent::RoundComplete { round: Round::Independent, model, text, .. }
                    if *model == claude =>
                {
                    completed = Some(text.clone());
                }
                _ => {}
            }
        }
        assert_eq!(completed.as_deref(), Some("Yes, it is."));
        assert_eq!(streamed, "Yes, it is.");
        assert_eq!(result.round1[1].text, "Yes, it is.");
        assert_eq!(result.round1[1].output_tokens, Some(5));
    }

    #[tokio::test]
    async fn test_round1_cancels_remaining_calls_once_gate_is_lost() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("openai:gpt-4o", vec![Reply::Stall])
                .script("anthropic:claude", vec![Reply::Fail(500)])
                .script("groq:llama", vec![Reply::Fail(500)]),
        );
        let use_case = RunDeliberationUseCase::new(transport)
            .with_params(ExecutionParams::default().with_call_timeout(None));
        let (sink, mut rx) = ChannelEventSink::channel();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            use_case.execute(config(three_models()), Arc::new(sink)),
        )
        .await
        .expect("stalled call was not cancelled");

        assert_eq!(
            result.unwrap_err(),
            RunDeliberationError::NotEnoughResponses { succeeded: 0 }
        );
        let mut cancelled = false;
        while let Ok(event) = rx.try_recv() {
            if let DeliberationEvent::RoundError { model, error, .. } = event {
                if model.to_string() == "openai:gpt-4o" {
                    cancelled = error == "Cancelled";
                }
            }
        }
        assert!(cancelled);
    }

    #[tokio::test]
    async fn test_slow_model_times_out_without_failing_round() {
        let transport = Arc::new(
            ScriptedTransport::new().script("groq:llama", vec![Reply::Stall]),
        );
        let use_case = RunDeliberationUseCase::new(transport).with_params(
            ExecutionParams::default().with_call_timeout(Some(Duration::from_millis(100))),
        );

        let result = use_case.execute_silent(config(three_models())).await.unwrap();
        let llama = &result.round1[2];
        assert_eq!(llama.error.as_deref(), Some("Request timed out after 0.1s"));
        assert_eq!(result.round2.len(), 2);
    }

    #[tokio::test]
    async fn test_panicking_call_is_recorded_as_failure() {
        let transport = Arc::new(
            ScriptedTransport::new().script("groq:llama", vec![Reply::Panic]),
        );
        let (result, _) = run(transport, config(three_models())).await;
        let result = result.unwrap();

        assert_eq!(result.round1[2].error.as_deref(), Some("call task panicked"));
        assert_eq!(result.round2.len(), 2);
    }

    #[tokio::test]
    async fn test_external_cancellation() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .script("openai:gpt-4o", vec![Reply::Stall])
                .script("anthropic:claude", vec![Reply::Stall]),
        );
        let token = CancellationToken::new();
        let use_case = RunDeliberationUseCase::new(transport)
            .with_params(ExecutionParams::default().with_call_timeout(None))
            .with_cancellation(token.clone());

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let models = vec![model("openai:gpt-4o", 9), model("anthropic:claude", 9)];
        let err = use_case.execute_silent(config(models)).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
