use std::time::{Duration, Instant};

use crate::error::SummaryError;
use crate::model::{ModelClient, TextModel};

/// One incoming summarization request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummarizationRequest {
    /// The text to summarize. May be empty.
    pub text: String,
    /// Whether the caller attached an image.
    pub image_present: bool,
}

impl SummarizationRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_present: false,
        }
    }
}

/// A successful summarization along with how long the provider took.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub duration: Duration,
}

/// Validates requests and forwards them to the model client.
///
/// The client is optional: when the model failed to initialize at startup the
/// service is built with `None` and every valid request fails with
/// [`SummaryError::ServiceUnavailable`].
pub struct SummarizationService<M: TextModel> {
    client: Option<ModelClient<M>>,
}

impl<M: TextModel> SummarizationService<M> {
    pub fn new(client: Option<ModelClient<M>>) -> Self {
        Self { client }
    }

    /// Returns true if a model client is configured.
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Handles one request.
    ///
    /// Image rejection wins over everything else, then empty input, then a
    /// missing client. Only a request that passes all three reaches the
    /// provider, exactly once.
    pub async fn handle_request(
        &self,
        request: SummarizationRequest,
    ) -> Result<Summary, SummaryError> {
        if request.image_present {
            return Err(SummaryError::ImageNotSupported);
        }

        if request.text.is_empty() {
            return Err(SummaryError::EmptyQuery);
        }

        let Some(client) = &self.client else {
            log::warn!("Summarization requested but no model is configured");
            return Err(SummaryError::ServiceUnavailable);
        };

        let start_time = Instant::now();
        let text = client.summarize(&request.text).await?;
        let duration = start_time.elapsed();

        log::debug!(
            "Summarized {} bytes in {:?} with {}",
            request.text.len(),
            duration,
            client.model_identifier()
        );

        Ok(Summary { text, duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::template::PromptTemplate;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, thiserror::Error)]
    #[error("quota exhausted")]
    struct QuotaError;

    #[derive(Clone, Default)]
    struct RecordingModel {
        prompts: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl TextModel for RecordingModel {
        type Error = QuotaError;

        async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(QuotaError)
            } else {
                Ok("A fox jumps over a dog.".to_string())
            }
        }
    }

    fn service(model: RecordingModel) -> SummarizationService<RecordingModel> {
        SummarizationService::new(Some(ModelClient::new(
            "test-model",
            model,
            PromptTemplate::default(),
        )))
    }

    #[tokio::test]
    async fn image_wins_over_text() {
        let model = RecordingModel::default();
        let service = service(model.clone());

        for text in ["", "hello"] {
            let request = SummarizationRequest {
                text: text.to_string(),
                image_present: true,
            };
            assert_eq!(
                service.handle_request(request).await,
                Err(SummaryError::ImageNotSupported)
            );
        }
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_availability() {
        let service = SummarizationService::<RecordingModel>::new(None);
        assert_eq!(
            service.handle_request(SummarizationRequest::text("")).await,
            Err(SummaryError::EmptyQuery)
        );
    }

    #[tokio::test]
    async fn missing_client_is_unavailable() {
        let service = SummarizationService::<RecordingModel>::new(None);
        assert!(!service.is_available());
        assert_eq!(
            service.handle_request(SummarizationRequest::text("hi")).await,
            Err(SummaryError::ServiceUnavailable)
        );
    }

    #[tokio::test]
    async fn one_call_with_rendered_prompt() {
        let model = RecordingModel::default();
        let service = service(model.clone());

        let summary = service
            .handle_request(SummarizationRequest::text(" padded text "))
            .await
            .unwrap();

        assert!(!summary.text.is_empty());
        assert_eq!(
            *model.prompts.lock().unwrap(),
            vec!["Summarize the following text in one concise line:  padded text ".to_string()]
        );
    }

    #[tokio::test]
    async fn provider_failure_becomes_generation_error() {
        let model = RecordingModel {
            fail: true,
            ..Default::default()
        };
        let service = service(model.clone());

        assert_eq!(
            service.handle_request(SummarizationRequest::text("hi")).await,
            Err(SummaryError::Generation(GenerationError::new(
                "quota exhausted"
            )))
        );
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }
}
