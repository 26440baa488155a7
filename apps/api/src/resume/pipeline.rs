//! Resume pipeline: extract → prompt → complete → decode → normalize.
//!
//! Runs once per upload, in sequence. The first failing stage ends the run;
//! nothing partially parsed is returned.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

use crate::config::CompletionSettings;
use crate::llm_client::{CompletionError, CompletionService};
use crate::resume::decode::{decode_reply, DecodeError};
use crate::resume::extract::TextExtractor;
use crate::resume::normalize::{normalize, NormalizedRecord};
use crate::resume::prompts::{build_request, PROMPT_VERSION};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no text could be extracted from the document")]
    ExtractionFailed,

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("reply decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl PipelineError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::ExtractionFailed => "EXTRACTION_FAILED",
            PipelineError::Completion(e) => match e {
                CompletionError::Transport(_) | CompletionError::Status { .. } => {
                    "COMPLETION_UNAVAILABLE"
                }
                CompletionError::EmptyReply => "COMPLETION_EMPTY_REPLY",
                CompletionError::InvalidEnvelope(_) => "COMPLETION_INVALID_RESPONSE",
                CompletionError::MissingContent => "COMPLETION_NO_CONTENT",
            },
            PipelineError::Decode(e) => match e {
                DecodeError::NoJsonBlock => "NO_JSON_BLOCK",
                DecodeError::UnterminatedBlock => "UNTERMINATED_JSON_BLOCK",
                DecodeError::EmptyBlock => "EMPTY_JSON_BLOCK",
                DecodeError::MalformedJson(_) => "MALFORMED_JSON",
            },
        }
    }

    /// Message shown to the person who uploaded the résumé.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::ExtractionFailed => "Failed to extract text from the resume.".to_string(),
            PipelineError::Completion(e) => match e {
                CompletionError::Transport(_) | CompletionError::Status { .. } => {
                    "Could not reach the resume parsing service. Please try again later."
                        .to_string()
                }
                CompletionError::EmptyReply => {
                    "Empty response from the resume parsing service.".to_string()
                }
                CompletionError::InvalidEnvelope(_) => {
                    "Invalid response from the resume parsing service.".to_string()
                }
                CompletionError::MissingContent => "No parsed data found in response.".to_string(),
            },
            PipelineError::Decode(e) => match e {
                DecodeError::NoJsonBlock => {
                    "No valid JSON block found in the response.".to_string()
                }
                DecodeError::UnterminatedBlock => {
                    "The parsed result was cut off before it finished.".to_string()
                }
                DecodeError::EmptyBlock => "The parsed result was empty.".to_string(),
                DecodeError::MalformedJson(err) => {
                    format!("Failed to parse JSON from API response: {err}")
                }
            },
        }
    }
}

/// Holds the read-only collaborators shared by every request.
pub struct ResumePipeline {
    extractor: Arc<TextExtractor>,
    completer: Arc<dyn CompletionService>,
    settings: CompletionSettings,
}

impl ResumePipeline {
    pub fn new(
        extractor: TextExtractor,
        completer: Arc<dyn CompletionService>,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            extractor: Arc::new(extractor),
            completer,
            settings,
        }
    }

    pub async fn run(&self, pdf: Bytes) -> Result<NormalizedRecord, PipelineError> {
        let text = self.extract(pdf).await;
        if text.trim().is_empty() {
            return Err(PipelineError::ExtractionFailed);
        }

        let request = build_request(&text, &self.settings);
        info!(
            "Requesting extraction ({PROMPT_VERSION}, model {}, {} chars of text)",
            request.model,
            text.len()
        );

        let reply = self.completer.complete(&request).await?;
        let parsed = decode_reply(&reply.content)?;

        Ok(normalize(Some(parsed)))
    }

    /// PDF parsing is CPU-bound, so it runs on the blocking pool.
    async fn extract(&self, pdf: Bytes) -> String {
        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&pdf))
            .await
            .unwrap_or_else(|e| {
                error!("Extraction task failed: {e}");
                String::new()
            })
    }
}
