//! Shared round state of one deliberation run.
//!
//! Every response is keyed by `(Round, ModelRef)`. Each mutation takes the
//! lock once and touches a single key, so concurrent calls of the same round
//! never interleave on one response and never disturb each other's.

use roundtable_domain::{Model, ModelRef, Round, RoundResponse, TokenUsage};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Key = (Round, ModelRef);

#[derive(Default)]
struct BoardState {
    responses: HashMap<Key, RoundResponse>,
    order: HashMap<Round, Vec<ModelRef>>,
}

/// Mutex-guarded map from `(Round, ModelRef)` to [`RoundResponse`]
#[derive(Default)]
pub struct ResponseBoard {
    state: Mutex<BoardState>,
}

impl ResponseBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        // A panicking writer leaves a consistent map: every update is one insert or field write
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(
        &self,
        round: Round,
        model: &ModelRef,
        f: impl FnOnce(&mut RoundResponse) -> bool,
    ) -> bool {
        let mut state = self.lock();
        match state.responses.get_mut(&(round, model.clone())) {
            Some(response) => f(response),
            None => false,
        }
    }

    /// Register a pending response. Reopening an existing key resets it.
    pub fn open(&self, round: Round, model: &Model) {
        let mut state = self.lock();
        let key = (round, model.reference.clone());
        if state
            .responses
            .insert(key, RoundResponse::pending(model))
            .is_none()
        {
            state
                .order
                .entry(round)
                .or_default()
                .push(model.reference.clone());
        }
    }

    /// Append a chunk; `false` if the response is unknown or terminal.
    pub fn append_token(&self, round: Round, model: &ModelRef, chunk: &str) -> bool {
        self.update(round, model, |r| r.append(chunk))
    }

    pub fn complete(&self, round: Round, model: &ModelRef, text: String, usage: TokenUsage) -> bool {
        self.update(round, model, |r| r.complete(text, usage))
    }

    pub fn fail(&self, round: Round, model: &ModelRef, error: &str) -> bool {
        self.update(round, model, |r| r.fail(error))
    }

    pub fn get(&self, round: Round, model: &ModelRef) -> Option<RoundResponse> {
        self.lock().responses.get(&(round, model.clone())).cloned()
    }

    /// Snapshot of a round's responses in the order they were opened.
    pub fn responses(&self, round: Round) -> Vec<RoundResponse> {
        let state = self.lock();
        state
            .order
            .get(&round)
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| state.responses.get(&(round, r.clone())).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn successes(&self, round: Round) -> Vec<RoundResponse> {
        self.responses(round)
            .into_iter()
            .filter(RoundResponse::is_success)
            .collect()
    }

    /// Models whose response in `round` has not settled.
    pub fn unsettled(&self, round: Round) -> Vec<ModelRef> {
        self.responses(round)
            .into_iter()
            .filter(|r| !r.is_complete)
            .map(|r| r.model)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::ApiKey;
    use std::sync::Arc;

    fn model(provider: &str, id: &str) -> Model {
        Model::new(ModelRef::new(provider, id), ApiKey::default())
    }

    #[test]
    fn test_same_provider_models_do_not_collide() {
        let board = ResponseBoard::new();
        let a = model("openai", "gpt-4o");
        let b = model("openai", "gpt-4o-mini");
        board.open(Round::Independent, &a);
        board.open(Round::Independent, &b);

        board.append_token(Round::Independent, &a.reference, "big");
        board.append_token(Round::Independent, &b.reference, "small");

        let responses = board.responses(Round::Independent);
        assert_eq!(responses[0].text, "big");
        assert_eq!(responses[1].text, "small");
    }

    #[test]
    fn test_rounds_are_separate() {
        let board = ResponseBoard::new();
        let a = model("openai", "gpt-4o");
        board.open(Round::Independent, &a);
        board.open(Round::CrossExamination, &a);

        board.complete(Round::Independent, &a.reference, "r1".into(), TokenUsage::default());

        assert!(board.get(Round::Independent, &a.reference).unwrap().is_success());
        assert!(!board.get(Round::CrossExamination, &a.reference).unwrap().is_complete);
        assert_eq!(board.unsettled(Round::CrossExamination), vec![a.reference.clone()]);
        assert!(board.responses(Round::Debate).is_empty());
    }

    #[test]
    fn test_terminal_response_rejects_tokens() {
        let board = ResponseBoard::new();
        let a = model("groq", "gemma2-9b-it");
        board.open(Round::Independent, &a);

        assert!(board.fail(Round::Independent, &a.reference, "boom"));
        assert!(!board.append_token(Round::Independent, &a.reference, "late"));
        assert!(!board.complete(Round::Independent, &a.reference, "x".into(), TokenUsage::default()));
        assert!(!board.append_token(Round::Synthesis, &a.reference, "unknown"));

        let response = board.get(Round::Independent, &a.reference).unwrap();
        assert_eq!(response.error.as_deref(), Some("boom"));
        assert!(response.text.is_empty());
        assert!(board.successes(Round::Independent).is_empty());
    }

    #[test]
    fn test_concurrent_appends_keep_per_key_order() {
        let board = Arc::new(ResponseBoard::new());
        let models: Vec<_> = (0..4).map(|i| model("p", &format!("m{}", i))).collect();
        for m in &models {
            board.open(Round::Independent, m);
        }

        let handles: Vec<_> = models
            .iter()
            .map(|m| {
                let board = Arc::clone(&board);
                let reference = m.reference.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        board.append_token(Round::Independent, &reference, &format!("{},", i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let expected: String = (0..100).map(|i| format!("{},", i)).collect();
        for response in board.responses(Round::Independent) {
            assert_eq!(response.text, expected);
        }
    }
}
