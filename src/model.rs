use std::future::Future;

use crate::error::GenerationError;
use crate::template::PromptTemplate;

/// Trait for text-generation backends that can be driven by a [`ModelClient`].
///
/// Implementors send a fully rendered prompt to their provider and return the
/// generated text untouched. Calls take `&self` so a single model can serve
/// any number of in-flight requests.
pub trait TextModel: Send + Sync + 'static {
    /// The error type that can be returned during generation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `prompt` to the provider and returns the generated text.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Process-wide handle to a configured model.
///
/// Built once at startup and never mutated afterwards.
pub struct ModelClient<M: TextModel> {
    model_identifier: String,
    template: PromptTemplate,
    model: M,
}

impl<M: TextModel> ModelClient<M> {
    pub fn new(model_identifier: impl Into<String>, model: M, template: PromptTemplate) -> Self {
        Self {
            model_identifier: model_identifier.into(),
            template,
            model,
        }
    }

    pub fn model_identifier(&self) -> &str {
        &self.model_identifier
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Renders the prompt for `input_text` and makes exactly one provider call.
    ///
    /// Provider errors are converted into a [`GenerationError`] carrying the
    /// provider's message. Nothing is retried.
    pub async fn summarize(&self, input_text: &str) -> Result<String, GenerationError> {
        let prompt = self.template.render(input_text);

        log::debug!(
            "Sending {} byte prompt to {}",
            prompt.len(),
            self.model_identifier
        );

        self.model.generate(&prompt).await.map_err(|e| {
            log::warn!("Generation with {} failed: {}", self.model_identifier, e);
            GenerationError::new(e.to_string())
        })
    }
}
