use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use serde::Serialize;

use crate::domain::error::ErrorCode;
use crate::domain::profile::PassKind;

/// 所要時間の集計（件数・合計・最大）
#[derive(Debug, Default, Clone, Copy)]
struct Timing {
    count: u64,
    total_ms: u64,
    max_ms: u64,
}

impl Timing {
    fn record(&mut self, ms: u64) {
        self.count += 1;
        self.total_ms += ms;
        self.max_ms = self.max_ms.max(ms);
    }

    fn avg_ms(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total_ms as f64 / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct State {
    runs_started: u64,
    cache_hits: u64,
    cache_misses: u64,
    provider_calls: u64,
    /// 完了した実行数（プロファイル別）
    completed_by_profile: BTreeMap<String, u64>,
    errors: HashMap<ErrorCode, u64>,
    passes: HashMap<PassKind, Timing>,
    /// キャッシュヒットを除いた実行全体
    runs: Timing,
}

/// 実行ごとのカウンタとパス種別ごとのレイテンシ
#[derive(Default)]
pub struct Metrics {
    state: Mutex<State>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassLatency {
    pub kind: PassKind,
    pub calls: u64,
    pub avg_ms: f64,
    pub max_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_by_profile: BTreeMap<String, u64>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// キャッシュ参照が1度も無ければ None
    pub cache_hit_ratio: Option<f64>,
    pub provider_calls: u64,
    /// エラーコード（E_xxx）別件数
    pub errors: BTreeMap<&'static str, u64>,
    /// 呼び出しのあったパス種別のみ
    pub pass_latency: Vec<PassLatency>,
    pub avg_run_ms: Option<f64>,
}

impl MetricsSummary {
    pub fn error_count(&self, code: ErrorCode) -> u64 {
        self.errors.get(code.as_str()).copied().unwrap_or(0)
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_runs_started(&self) {
        self.state.lock().runs_started += 1;
    }

    pub fn inc_cache_hit(&self) {
        self.state.lock().cache_hits += 1;
    }

    pub fn inc_cache_miss(&self) {
        self.state.lock().cache_misses += 1;
    }

    pub fn inc_provider_calls(&self) {
        self.state.lock().provider_calls += 1;
    }

    pub fn inc_error(&self, code: ErrorCode) {
        *self.state.lock().errors.entry(code).or_default() += 1;
    }

    pub fn record_pass(&self, kind: PassKind, duration_ms: u64) {
        self.state.lock().passes.entry(kind).or_default().record(duration_ms);
    }

    /// 実行の完了を記録する。キャッシュヒットは duration_ms を None で渡す。
    pub fn record_run_completed(&self, profile_id: &str, duration_ms: Option<u64>) {
        let mut state = self.state.lock();
        *state
            .completed_by_profile
            .entry(profile_id.to_string())
            .or_default() += 1;
        if let Some(ms) = duration_ms {
            state.runs.record(ms);
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let state = self.state.lock();
        let lookups = state.cache_hits + state.cache_misses;

        MetricsSummary {
            runs_started: state.runs_started,
            runs_completed: state.completed_by_profile.values().sum(),
            runs_by_profile: state.completed_by_profile.clone(),
            cache_hits: state.cache_hits,
            cache_misses: state.cache_misses,
            cache_hit_ratio: (lookups > 0).then(|| state.cache_hits as f64 / lookups as f64),
            provider_calls: state.provider_calls,
            errors: state
                .errors
                .iter()
                .map(|(code, n)| (code.as_str(), *n))
                .collect(),
            pass_latency: PassKind::ALL
                .into_iter()
                .filter_map(|kind| {
                    let t = state.passes.get(&kind)?;
                    Some(PassLatency {
                        kind,
                        calls: t.count,
                        avg_ms: t.avg_ms()?,
                        max_ms: t.max_ms,
                    })
                })
                .collect(),
            avg_run_ms: state.runs.avg_ms(),
        }
    }
}
