//! Deliberation mode, round count and synthesizer choice.
//!
//! [`DeliberationMode`] decides which rounds run:
//!
//! | Mode | Round 1 | Round 2 | Round 2.5 | Round 3 |
//! |------|---------|---------|-----------|---------|
//! | `standard` | yes | yes | no | yes |
//! | `quick` | yes | no | no | yes |
//! | `debate` | yes | yes | yes | yes |

use crate::core::error::DomainError;
use crate::core::model::ModelRef;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which rounds a deliberation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliberationMode {
    /// Independent answers, cross-examination, synthesis
    #[default]
    Standard,
    /// Independent answers straight into synthesis
    Quick,
    /// Standard plus a debate round over remaining disagreements
    Debate,
}

impl DeliberationMode {
    pub const VALID_VALUES: [&'static str; 3] = ["standard", "quick", "debate"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationMode::Standard => "standard",
            DeliberationMode::Quick => "quick",
            DeliberationMode::Debate => "debate",
        }
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            DeliberationMode::Standard => "Standard: answer, cross-examine, synthesize",
            DeliberationMode::Quick => "Quick: answer, then synthesize",
            DeliberationMode::Debate => "Debate: answer, cross-examine, debate, synthesize",
        }
    }

    pub fn includes_cross_examination(&self) -> bool {
        !matches!(self, DeliberationMode::Quick)
    }

    pub fn includes_debate(&self) -> bool {
        matches!(self, DeliberationMode::Debate)
    }
}

impl fmt::Display for DeliberationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliberationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "std" => Ok(DeliberationMode::Standard),
            "quick" | "q" => Ok(DeliberationMode::Quick),
            "debate" | "d" => Ok(DeliberationMode::Debate),
            _ => Err(DomainError::InvalidValue {
                field: "mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Requested number of rounds (2 or 3).
///
/// Recorded on the result for consumers; the round sequence itself is
/// decided by [`DeliberationMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundCount {
    Two,
    #[default]
    Three,
}

impl RoundCount {
    pub fn get(&self) -> u8 {
        match self {
            RoundCount::Two => 2,
            RoundCount::Three => 3,
        }
    }
}

impl TryFrom<u8> for RoundCount {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(RoundCount::Two),
            3 => Ok(RoundCount::Three),
            other => Err(DomainError::InvalidValue {
                field: "rounds",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoundCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl Serialize for RoundCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.get())
    }
}

impl<'de> Deserialize<'de> for RoundCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        RoundCount::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Which model performs the final synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SynthesizerChoice {
    /// Highest capability among the candidates
    #[default]
    Auto,
    /// First candidate offered by this provider
    Provider(String),
    /// Exactly this model
    Model(ModelRef),
}

impl fmt::Display for SynthesizerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesizerChoice::Auto => write!(f, "auto"),
            SynthesizerChoice::Provider(p) => write!(f, "{}", p),
            SynthesizerChoice::Model(r) => write!(f, "{}", r),
        }
    }
}

impl std::str::FromStr for SynthesizerChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(SynthesizerChoice::Auto);
        }
        if s.contains(':') {
            return s.parse().map(SynthesizerChoice::Model);
        }
        Ok(SynthesizerChoice::Provider(s.to_string()))
    }
}
