use thiserror::Error;

/// Errors raised while parsing a prompt template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },

    #[error("unknown placeholder {{{0}}}, only {{text}} is supported")]
    UnknownPlaceholder(String),

    #[error("expected exactly one {{text}} placeholder, found {0}")]
    PlaceholderCount(usize),
}

/// Errors raised while building the model client at startup.
///
/// None of these are fatal: the server keeps running without a model and
/// answers summarization requests with "service unavailable".
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid prompt template: {0}")]
    InvalidTemplate(#[from] TemplateError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A failed round-trip to the model provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerationError {
    message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Everything that can go wrong while handling one summarization request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Image processing is not supported. Please provide text for summarization.")]
    ImageNotSupported,

    #[error("No query or image provided.")]
    EmptyQuery,

    #[error("Summarization service is unavailable.")]
    ServiceUnavailable,

    #[error("Error summarizing text: {0}")]
    Generation(#[from] GenerationError),
}

impl SummaryError {
    /// Whether the caller sent something we refuse to process.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SummaryError::ImageNotSupported | SummaryError::EmptyQuery)
    }
}
