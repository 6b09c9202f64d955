//! Nightingale — resume ingestion and structured extraction for nurse profiles.
//!
//! The pipeline ingests an uploaded resume (PDF, DOCX, or legacy DOC),
//! recovers its plain-text body, and distils a strongly typed record of the
//! candidate's professional history. Extraction runs a rule-based engine
//! first; a confidence score decides whether the LLM-backed extractor gets a
//! shot, and the higher-scoring record wins.
//!
//! Transport, storage, and the LLM backend are consumed through the traits
//! in [`store`] and [`llm`] — the pipeline itself is self-contained.

pub mod config;
pub mod decode;
pub mod errors;
pub mod extract;
pub mod hybrid;
pub mod lexicons;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod postprocess;
pub mod scoring;
pub mod store;

pub use config::Config;
pub use errors::PipelineError;
pub use models::record::ParsedRecord;
pub use pipeline::Pipeline;
