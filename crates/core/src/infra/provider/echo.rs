use async_trait::async_trait;

use super::{GenerationProvider, GenerationRequest, ProviderError};

/// EchoProvider: ユーザーテキストをそのまま返す（オフライン動作確認用）
#[derive(Debug, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationProvider for EchoProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        // "Edit this text:" などの前置き行は落とす
        let text = request
            .user
            .split_once("\n\n")
            .filter(|(head, _)| head.trim_end().ends_with(':') && !head.contains('\n'))
            .map_or(request.user.as_str(), |(_, body)| body);
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo"
    }
}
