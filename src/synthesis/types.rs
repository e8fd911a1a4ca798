use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::OUT_OF_SCOPE_RESPONSE;

/// Where an answer came from, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Grounded in retrieved chunks.
    Documents,
    /// Refused by the scope classifier.
    OutOfScope,
    /// Refused because nothing has been ingested.
    NoDocuments,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Documents => "documents",
            Provenance::OutOfScope => "out_of_scope",
            Provenance::NoDocuments => "no_documents",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which strategy produced a grounded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Extractive,
    Generative,
    /// Generative was configured but its output was discarded.
    ExtractiveFallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Extractive => "extractive",
            Strategy::Generative => "generative",
            Strategy::ExtractiveFallback => "extractive_fallback",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured synthesis mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    #[default]
    Extractive,
    Generative,
}

impl SynthesisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisMode::Extractive => "extractive",
            SynthesisMode::Generative => "generative",
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extractive" => Ok(SynthesisMode::Extractive),
            "generative" => Ok(SynthesisMode::Generative),
            other => Err(format!(
                "unknown synthesis mode '{other}' (expected 'extractive' or 'generative')"
            )),
        }
    }
}

/// Final answer text with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub provenance: Provenance,
    /// Set for grounded answers only.
    pub strategy: Option<Strategy>,
}

impl Answer {
    pub fn grounded(text: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            text: text.into(),
            provenance: Provenance::Documents,
            strategy: Some(strategy),
        }
    }

    pub fn out_of_scope() -> Self {
        Self {
            text: OUT_OF_SCOPE_RESPONSE.to_string(),
            provenance: Provenance::OutOfScope,
            strategy: None,
        }
    }

    pub fn no_documents() -> Self {
        Self {
            text: OUT_OF_SCOPE_RESPONSE.to_string(),
            provenance: Provenance::NoDocuments,
            strategy: None,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.provenance == Provenance::Documents
    }
}
