/*!
 * Status Labels
 * Human-readable names for process states, kept out of the core
 */

use crate::process::ProcessState;
use serde::{Deserialize, Serialize};

/// Maps a process state to the label shown to users
pub trait StatusLabels {
    fn label(&self, state: ProcessState) -> &'static str;
}

/// Default label set
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishLabels;

impl StatusLabels for SpanishLabels {
    fn label(&self, state: ProcessState) -> &'static str {
        match state {
            ProcessState::Ready => "Listo",
            ProcessState::ReadyInPartition => "Listo en partición",
            ProcessState::Running => "En ejecución",
            ProcessState::Finished => "Finalizado",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl StatusLabels for EnglishLabels {
    fn label(&self, state: ProcessState) -> &'static str {
        match state {
            ProcessState::Ready => "Ready",
            ProcessState::ReadyInPartition => "Ready in partition",
            ProcessState::Running => "Running",
            ProcessState::Finished => "Finished",
        }
    }
}

/// Label set selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn labels(&self) -> &'static dyn StatusLabels {
        match self {
            Language::Spanish => &SpanishLabels,
            Language::English => &EnglishLabels,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "es" | "spanish" => Ok(Self::Spanish),
            "en" | "english" => Ok(Self::English),
            _ => Err(format!("Invalid language '{}'. Valid: es, en", s)),
        }
    }
}
