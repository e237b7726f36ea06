use serde::{Deserialize, Serialize};

use super::types::{DetectorTargets, RunOptions, Tone};

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 生成プロバイダ選択
    pub provider: ProviderChoice,
    /// モデルID（None ならプロバイダ既定）
    pub model: Option<String>,
    /// デフォルトのコンテンツ種別
    pub default_profile: String,
    /// デフォルトトーン
    pub default_tone: Tone,
    /// ステルス後処理の既定値
    pub stealth: bool,
    /// 毎回ランダム化（キャッシュ無効）の既定値
    pub randomize: bool,
    /// 検出器ターゲット
    pub detectors: DetectorTargets,
    /// プロバイダ呼び出し1回あたりのタイムアウト（秒）
    pub request_timeout_secs: u64,
    /// 入力の最小語数
    pub min_words: usize,
    /// キャッシュ最大件数
    pub cache_capacity: usize,
    /// 文長変換のチューニング値
    pub burstiness: BurstinessConfig,
    /// Groq API キー
    pub groq_api_key: Option<String>,
    /// Claude API キー
    pub claude_api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderChoice {
    Groq,
    Claude,
    /// オフライン動作確認用（入力をそのまま返す）
    Echo,
}

impl ProviderChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "claude" | "anthropic" => Some(Self::Claude),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }
}

impl AppSettings {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            stealth: self.stealth,
            randomize: self.randomize,
            detectors: self.detectors,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            provider: ProviderChoice::Groq,
            model: None,
            default_profile: "blog-post".to_string(),
            default_tone: Tone::Conversational,
            stealth: true,
            randomize: true,
            detectors: DetectorTargets::default(),
            request_timeout_secs: 90,
            min_words: 15,
            cache_capacity: 256,
            burstiness: BurstinessConfig::default(),
            groq_api_key: None,
            claude_api_key: None,
        }
    }
}

/// 文長分布変換のチューニング値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstinessConfig {
    /// この語数を超える文が分割候補
    pub long_sentence_words: usize,
    pub split_probability: f64,
    /// この語数未満の文が結合候補
    pub short_sentence_words: usize,
    pub merge_probability: f64,
    /// 分割後の各部分に必要な最小語数
    pub min_part_words: usize,
}

impl Default for BurstinessConfig {
    fn default() -> Self {
        Self {
            long_sentence_words: 25,
            split_probability: 0.7,
            short_sentence_words: 6,
            merge_probability: 0.45,
            min_part_words: 5,
        }
    }
}
