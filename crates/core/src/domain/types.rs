use serde::{Deserialize, Serialize};

/// パイプライン種別（formal = 1パス / general = 4パス）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    SinglePass,
    MultiPass,
}

impl PipelineKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SinglePass => "1-pass formal",
            Self::MultiPass => "4-pass general",
        }
    }
}

/// コンテンツ種別のグループ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentGroup {
    Academic,
    Professional,
    CreativeContent,
    Personal,
    Specialized,
}

impl ContentGroup {
    pub const ALL: [ContentGroup; 5] = [
        Self::Academic,
        Self::Professional,
        Self::CreativeContent,
        Self::Personal,
        Self::Specialized,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::Professional => "Professional",
            Self::CreativeContent => "Creative & Content",
            Self::Personal => "Personal",
            Self::Specialized => "Specialized",
        }
    }
}

/// 選択可能なトーン（トーン未固定のプロファイルでのみ使用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Conversational,
    Professional,
    Storyteller,
    Opinionated,
    Witty,
    Journalistic,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Self::Conversational,
        Self::Professional,
        Self::Storyteller,
        Self::Opinionated,
        Self::Witty,
        Self::Journalistic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conversational => "Conversational & Raw",
            Self::Professional => "Professional but Natural",
            Self::Storyteller => "Storyteller / Narrative",
            Self::Opinionated => "Opinionated / First-Person",
            Self::Witty => "Witty & Sharp",
            Self::Journalistic => "Neutral & Journalistic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| {
            t.label().eq_ignore_ascii_case(s.trim())
                || serde_json::to_value(t)
                    .ok()
                    .and_then(|v| v.as_str().map(|v| v == key))
                    .unwrap_or(false)
        })
    }
}

/// 検出器ターゲット。プロンプト文面とキャッシュキーにのみ影響する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorTargets {
    pub gptzero: bool,
    pub originality: bool,
    pub turnitin: bool,
    pub zerogpt: bool,
    pub quillbot: bool,
}

impl DetectorTargets {
    pub fn none() -> Self {
        Self {
            gptzero: false,
            originality: false,
            turnitin: false,
            zerogpt: false,
            quillbot: false,
        }
    }

    pub fn count(&self) -> usize {
        self.flags().iter().filter(|f| **f).count()
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }

    /// 固定順のフラグ列（キャッシュキー用）
    pub fn flags(&self) -> [bool; 5] {
        [
            self.gptzero,
            self.originality,
            self.turnitin,
            self.zerogpt,
            self.quillbot,
        ]
    }

    /// "gptzero,turnitin" 形式のリストから構築する
    pub fn from_list(list: &str) -> Result<Self, String> {
        let mut targets = Self::none();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "gptzero" => targets.gptzero = true,
                "originality" => targets.originality = true,
                "turnitin" => targets.turnitin = true,
                "zerogpt" => targets.zerogpt = true,
                "quillbot" => targets.quillbot = true,
                "all" => targets = Self::default(),
                other => return Err(format!("unknown detector: {other}")),
            }
        }
        Ok(targets)
    }
}

impl Default for DetectorTargets {
    fn default() -> Self {
        Self {
            gptzero: true,
            originality: true,
            turnitin: true,
            zerogpt: true,
            quillbot: true,
        }
    }
}

/// 実行オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// LLM後の決定的後処理（クリシェ置換 + バースト変換）
    pub stealth: bool,
    /// 毎回新しい結果を生成する（キャッシュをバイパス）
    pub randomize: bool,
    pub detectors: DetectorTargets,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            stealth: true,
            randomize: true,
            detectors: DetectorTargets::default(),
        }
    }
}

/// パイプライン実行リクエスト
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub text: String,
    pub profile_id: String,
    pub tone: Tone,
    pub options: RunOptions,
}

/// パイプライン実行結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: String,
    pub profile_id: String,
    pub text: String,
    pub word_count: usize,
    pub pass_count: usize,
    pub detector_count: usize,
    pub stealth: bool,
    pub cache_hit: bool,
    pub created_at: String,
}

/// 空白区切りの語数
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
