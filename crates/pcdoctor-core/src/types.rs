//! Diagnosis wire model
//!
//! These types define the JSON contract shared with clients and with the
//! upstream model. Field names follow the client convention (camelCase for
//! the diagnosis payload, snake_case for stored history records).
//!
//! The result types are deliberately permissive: every field carries
//! `#[serde(default)]` so a partial object from the upstream model still
//! parses instead of failing the whole diagnosis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Sentinel rendered for spec fields the user left empty.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Free-text hardware description supplied by the user.
///
/// Every field is optional; [`SystemSpecs::field_or_default`] substitutes
/// [`NOT_SPECIFIED`] for absent or blank values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSpecs {
    /// Processor, e.g. "Intel i7-12700K"
    #[serde(default)]
    pub cpu: Option<String>,
    /// Graphics card
    #[serde(default)]
    pub gpu: Option<String>,
    /// Installed memory
    #[serde(default)]
    pub ram: Option<String>,
    /// Operating system
    #[serde(default)]
    pub os: Option<String>,
    /// Storage devices
    #[serde(default)]
    pub storage: Option<String>,
}

impl SystemSpecs {
    fn field_or_default(value: &Option<String>) -> &str {
        match value {
            Some(v) if !v.trim().is_empty() => v.trim(),
            _ => NOT_SPECIFIED,
        }
    }

    /// CPU description or [`NOT_SPECIFIED`]
    pub fn cpu(&self) -> &str {
        Self::field_or_default(&self.cpu)
    }

    /// GPU description or [`NOT_SPECIFIED`]
    pub fn gpu(&self) -> &str {
        Self::field_or_default(&self.gpu)
    }

    /// RAM description or [`NOT_SPECIFIED`]
    pub fn ram(&self) -> &str {
        Self::field_or_default(&self.ram)
    }

    /// OS description or [`NOT_SPECIFIED`]
    pub fn os(&self) -> &str {
        Self::field_or_default(&self.os)
    }

    /// Storage description or [`NOT_SPECIFIED`]
    pub fn storage(&self) -> &str {
        Self::field_or_default(&self.storage)
    }
}

/// Body of `POST /diagnose`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosisRequest {
    /// Hardware description
    #[serde(default, rename = "systemSpecs")]
    pub system_specs: SystemSpecs,
    /// Free-text problem description; must be non-empty after trimming
    #[serde(default)]
    pub problem: String,
}

/// Difficulty of a remediation step.
///
/// Unknown values from the upstream model fall back to `medium` rather
/// than failing the parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Safe for any user
    Easy,
    /// Involved, potential for data loss
    Hard,
    /// Requires some care; also the fallback for unrecognized values,
    /// which serde requires to be the last variant
    #[default]
    #[serde(other)]
    Medium,
}

/// OS bucket for per-platform remediation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandOs {
    /// Windows (PowerShell / cmd)
    Windows,
    /// macOS (Terminal)
    Macos,
    /// Linux (shell)
    Linux,
}

/// One ordered remediation action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisStep {
    /// 1-based position, supplied by the upstream model
    #[serde(default)]
    pub step: u32,
    /// Short title
    #[serde(default)]
    pub title: String,
    /// What to do
    #[serde(default)]
    pub description: String,
    /// How hard it is
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Free-text estimate, e.g. "10 mins"
    #[serde(default, rename = "estimatedTime")]
    pub estimated_time: String,
    /// Per-OS command lists; buckets that do not apply are omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<BTreeMap<CommandOs, Vec<String>>>,
    /// Cautions to read before running the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

/// The diagnosis returned to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Summary of the main issue
    #[serde(default)]
    pub diagnosis: String,
    /// 0-100 confidence score
    #[serde(default)]
    pub confidence: u8,
    /// Likely causes, most likely first
    #[serde(default, rename = "possibleCauses")]
    pub possible_causes: Vec<String>,
    /// Remediation steps in execution order
    #[serde(default)]
    pub steps: Vec<DiagnosisStep>,
    /// How to avoid the problem in the future
    #[serde(default, rename = "preventiveTips")]
    pub preventive_tips: Vec<String>,
}

/// One immutable history record, owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDiagnosis {
    /// Server-assigned id
    pub id: Uuid,
    /// Owner
    pub user_id: String,
    /// Specs as submitted
    pub system_specs: SystemSpecs,
    /// Problem as submitted (trimmed)
    pub problem_description: String,
    /// Normalized diagnosis
    pub diagnosis_result: DiagnosisResult,
    /// Insertion time
    pub created_at: DateTime<Utc>,
}
