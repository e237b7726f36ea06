pub mod claude;
mod echo;
pub mod openai_compat;

pub use claude::ClaudeProvider;
pub use echo::EchoProvider;
pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

pub use crate::domain::error::ProviderError;
use crate::domain::settings::{AppSettings, ProviderChoice};

/// HTTP 層からの変換
impl ProviderError {
    /// reqwest のエラーを変換
    pub(crate) fn from_http(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Failed(format!("HTTP request failed: {err}"))
        }
    }

    /// 非成功ステータスを変換（401/403 は認証エラー扱い）
    pub(crate) fn from_status(provider: &str, status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Unauthorized(format!("{provider} API error: {status}"))
            }
            _ => Self::Failed(format!("{provider} API error: {status} - {body}")),
        }
    }
}

/// 1回の生成呼び出しの入力
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 生成プロバイダ trait（外部LLMが実装する）
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;

    fn name(&self) -> &str;

    fn model(&self) -> &str;
}

/// HTTP クライアントを構築する
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotAvailable(format!("Failed to create HTTP client: {e}")))
}

/// 設定からプロバイダを構築する。API キーが無ければ NotAvailable。
pub fn from_settings(settings: &AppSettings) -> Result<Arc<dyn GenerationProvider>, ProviderError> {
    let timeout = Duration::from_secs(settings.request_timeout_secs.max(1));
    let model = settings.model.clone();

    let require_key = |key: &Option<String>, env: &str| -> Result<String, ProviderError> {
        key.as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::NotAvailable(format!("API key missing (set {env})")))
    };

    let provider: Arc<dyn GenerationProvider> = match settings.provider {
        ProviderChoice::Groq => {
            let key = require_key(&settings.groq_api_key, "GROQ_API_KEY")?;
            Arc::new(OpenAiCompatProvider::groq(key, model, timeout)?)
        }
        ProviderChoice::Claude => {
            let key = require_key(&settings.claude_api_key, "ANTHROPIC_API_KEY")?;
            Arc::new(ClaudeProvider::new(key, model, timeout)?)
        }
        ProviderChoice::Echo => Arc::new(EchoProvider::new()),
    };
    Ok(provider)
}
