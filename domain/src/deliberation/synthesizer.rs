//! Synthesizer selection

use super::mode::SynthesizerChoice;
use crate::core::model::Model;
use std::cmp::Reverse;

/// Pick the model that performs the final synthesis.
///
/// A preferred model or provider wins when it is among `candidates`.
/// Otherwise the highest capability wins, ties going to the earliest
/// candidate. Returns `None` only for an empty candidate list.
pub fn select_synthesizer<'a>(
    candidates: &'a [Model],
    choice: &SynthesizerChoice,
) -> Option<&'a Model> {
    let preferred = match choice {
        SynthesizerChoice::Auto => None,
        SynthesizerChoice::Model(reference) => {
            candidates.iter().find(|m| &m.reference == reference)
        }
        SynthesizerChoice::Provider(provider) => {
            candidates.iter().find(|m| m.provider_id() == provider)
        }
    };

    // min_by_key keeps the first of equal keys
    preferred.or_else(|| candidates.iter().min_by_key(|m| Reverse(m.capability)))
}
