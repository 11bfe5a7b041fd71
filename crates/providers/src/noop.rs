use crate::{GenerateRequest, GenerateResponse, LlmProvider, ProviderError};

/// Provider that never answers. Selecting it leaves only the MIME rules in play.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl LlmProvider for NoopProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
