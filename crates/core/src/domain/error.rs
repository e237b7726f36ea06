use serde::Serialize;

/// アプリケーション共通エラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "E_VALIDATION")]
    Validation,
    #[serde(rename = "E_PROVIDER")]
    Provider,
    #[serde(rename = "E_TIMEOUT")]
    Timeout,
    #[serde(rename = "E_CONFIG")]
    Config,
    #[serde(rename = "E_INTERNAL")]
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "E_VALIDATION",
            Self::Provider => "E_PROVIDER",
            Self::Timeout => "E_TIMEOUT",
            Self::Config => "E_CONFIG",
            Self::Internal => "E_INTERNAL",
        }
    }
}

/// 入力バリデーションエラー（プロバイダ呼び出し前に検出）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Input text is empty")]
    EmptyText,
    #[error("Text is too short: {words} words (at least {min} required)")]
    TooShort { words: usize, min: usize },
    #[error("Select at least one target detector")]
    NoDetectorSelected,
    #[error("Unknown content type: {0}")]
    UnknownProfile(String),
}

/// 生成プロバイダのエラー。自動リトライはしない。
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider not available: {0}")]
    NotAvailable(String),
    #[error("Authentication rejected: {0}")]
    Unauthorized(String),
    #[error("Generation failed: {0}")]
    Failed(String),
    #[error("Provider returned an empty response")]
    EmptyResponse,
    #[error("Generation timeout")]
    Timeout,
}

/// パイプライン実行エラー。どちらも実行全体を打ち切る。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Pass {pass} failed: {source}")]
    Provider {
        pass: usize,
        #[source]
        source: ProviderError,
    },
}

impl PipelineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Provider {
                source: ProviderError::Timeout,
                ..
            } => ErrorCode::Timeout,
            Self::Provider { .. } => ErrorCode::Provider,
        }
    }
}

/// アプリケーションエラー（UI層に返すペイロード兼用）
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub recoverable: bool,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Validation,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Provider,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Timeout,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Config,
            message: msg.into(),
            recoverable: false,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: msg.into(),
            recoverable: false,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => AppError::validation(e.to_string()),
            PipelineError::Provider {
                source: ProviderError::Timeout,
                pass,
            } => AppError::timeout(format!("Pass {pass} timed out")),
            e @ PipelineError::Provider { .. } => AppError::provider(e.to_string()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_recoverable() {
        let err: AppError = PipelineError::from(ValidationError::EmptyText).into();
        assert_eq!(err.code, ErrorCode::Validation);
        assert!(err.recoverable);
        assert_eq!(err.to_string(), "[E_VALIDATION] Input text is empty");
    }

    #[test]
    fn test_provider_timeout_maps_to_timeout_code() {
        let err: AppError = PipelineError::Provider {
            pass: 3,
            source: ProviderError::Timeout,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert!(err.message.contains("Pass 3"));
    }

    #[test]
    fn test_provider_failure_keeps_message() {
        let err: AppError = PipelineError::Provider {
            pass: 2,
            source: ProviderError::Failed("HTTP 500".into()),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Provider);
        assert!(err.message.contains("HTTP 500"));
    }

    #[test]
    fn test_error_code_serializes_as_wire_name() {
        let json = serde_json::to_string(&ErrorCode::Timeout).unwrap();
        assert_eq!(json, "\"E_TIMEOUT\"");
    }
}
