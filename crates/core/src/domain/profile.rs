use serde::Serialize;

use super::types::{ContentGroup, PipelineKind};

/// パスの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// formal パイプラインの唯一の編集パス
    Edit,
    /// 構造の組み替え
    Structure,
    /// 声・トーンの人間化（システムプロンプトは実行時に合成）
    Voice,
    /// 文長リズム
    Rhythm,
    /// 最終仕上げ
    Polish,
}

impl PassKind {
    pub const ALL: [PassKind; 5] = [
        PassKind::Edit,
        PassKind::Structure,
        PassKind::Voice,
        PassKind::Rhythm,
        PassKind::Polish,
    ];
}

/// 1回のLLM呼び出しの記述子
#[derive(Debug, Clone, Serialize)]
pub struct PassSpec {
    pub kind: PassKind,
    /// システム指示。Voice パスで空の場合は選択トーンのプロンプトを使う。
    pub system: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl PassSpec {
    pub fn new(kind: PassKind, system: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            kind,
            system: system.into(),
            temperature: temperature.clamp(0.0, 2.0),
            max_tokens,
        }
    }
}

/// コンテンツ種別プロファイル（起動時に定義され、以降不変）
#[derive(Debug, Clone, Serialize)]
pub struct ContentTypeProfile {
    pub id: String,
    pub label: String,
    pub group: ContentGroup,
    pub pipeline: PipelineKind,
    pub passes: Vec<PassSpec>,
    /// 固定トーン。None ならユーザー選択のトーンを使う。
    pub tone_locked: Option<String>,
}

impl ContentTypeProfile {
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }
}

/// プロファイルカタログ（宣言順を保持）
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: Vec<ContentTypeProfile>,
}

impl ProfileCatalog {
    pub fn new(profiles: Vec<ContentTypeProfile>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, id: &str) -> Option<&ContentTypeProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentTypeProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// グループごとの一覧（空グループは除外）
    pub fn grouped(&self) -> Vec<(ContentGroup, Vec<&ContentTypeProfile>)> {
        ContentGroup::ALL
            .into_iter()
            .map(|g| (g, self.profiles.iter().filter(|p| p.group == g).collect::<Vec<_>>()))
            .filter(|(_, items)| !items.is_empty())
            .collect()
    }
}
