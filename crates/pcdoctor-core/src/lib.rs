//! PC Doctor core - domain model and storage
//!
//! This crate provides the pieces shared by the server and the LLM layer:
//! - Types: the diagnosis request/result wire model
//! - Auth: API-key authentication store
//! - History: SQLite-backed per-user diagnosis history

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod history;
pub mod types;

pub use auth::{AuthContext, AuthError, AuthMethod, AuthStore};
pub use error::{Error, Result};
pub use history::HistoryStore;
pub use types::{
    CommandOs, DiagnosisRequest, DiagnosisResult, DiagnosisStep, Difficulty, StoredDiagnosis,
    SystemSpecs, NOT_SPECIFIED,
};
