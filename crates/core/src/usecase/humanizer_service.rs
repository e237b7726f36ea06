use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::error::{ErrorCode, PipelineError, ValidationError};
use crate::domain::profile::{ContentTypeProfile, ProfileCatalog};
use crate::domain::settings::AppSettings;
use crate::domain::types::{word_count, PipelineKind, PipelineResult, RunRequest, Tone};
use crate::infra::burstiness::{self, BurstinessConfig};
use crate::infra::cache::{CacheKey, CacheKeyInput, ResultCache};
use crate::infra::catalog::builtin_catalog;
use crate::infra::cliche::ClicheTable;
use crate::infra::metrics::{Metrics, MetricsSummary};
use crate::infra::normalizer::Normalizer;
use crate::infra::prompts;
use crate::infra::provider::{GenerationProvider, GenerationRequest, ProviderError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_MIN_WORDS: usize = 15;

/// パイプライン実行サービス。キャッシュ以外に実行間で共有する可変状態は持たない。
pub struct HumanizerService {
    provider: Arc<dyn GenerationProvider>,
    catalog: ProfileCatalog,
    cliches: ClicheTable,
    burstiness: BurstinessConfig,
    cache: Arc<ResultCache>,
    metrics: Metrics,
    timeout: Duration,
    min_words: usize,
}

impl HumanizerService {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            catalog: builtin_catalog(),
            cliches: ClicheTable::builtin(),
            burstiness: BurstinessConfig::default(),
            cache: Arc::new(ResultCache::default()),
            metrics: Metrics::new(),
            timeout: DEFAULT_TIMEOUT,
            min_words: DEFAULT_MIN_WORDS,
        }
    }

    /// 設定値（タイムアウト・最小語数・キャッシュ容量・文長変換）を反映して構築する
    pub fn from_settings(provider: Arc<dyn GenerationProvider>, settings: &AppSettings) -> Self {
        Self::new(provider)
            .with_timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
            .with_min_words(settings.min_words)
            .with_cache(Arc::new(ResultCache::new(settings.cache_capacity)))
            .with_burstiness(settings.burstiness.clone())
    }

    pub fn with_catalog(mut self, catalog: ProfileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_cliches(mut self, cliches: ClicheTable) -> Self {
        self.cliches = cliches;
        self
    }

    pub fn with_burstiness(mut self, config: BurstinessConfig) -> Self {
        self.burstiness = config;
        self
    }

    /// 複数のサービスでキャッシュを共有する場合に使う
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    // ==================== Accessors ====================

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn get_metrics(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    // ==================== Validation ====================

    /// 入力の事前条件を検査する。プロバイダ呼び出しの前に行う。
    pub fn validate(&self, req: &RunRequest) -> Result<&ContentTypeProfile, ValidationError> {
        if req.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let words = word_count(&req.text);
        if words < self.min_words {
            return Err(ValidationError::TooShort {
                words,
                min: self.min_words,
            });
        }
        if !req.options.detectors.any() {
            return Err(ValidationError::NoDetectorSelected);
        }
        self.catalog
            .get(&req.profile_id)
            .ok_or_else(|| ValidationError::UnknownProfile(req.profile_id.clone()))
    }

    // ==================== Run ====================

    /// OS 乱数でシードした RNG で実行する
    pub async fn run(&self, req: &RunRequest) -> Result<PipelineResult, PipelineError> {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(req, &mut rng).await
    }

    /// 後処理の乱択に使う RNG を指定して実行する
    pub async fn run_with_rng<R>(
        &self,
        req: &RunRequest,
        rng: &mut R,
    ) -> Result<PipelineResult, PipelineError>
    where
        R: Rng + Send,
    {
        let start = Instant::now();
        self.metrics.inc_runs_started();

        let profile = match self.validate(req) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("Run rejected: {e}");
                self.metrics.inc_error(ErrorCode::Validation);
                return Err(e.into());
            }
        };

        // トーン固定プロファイルではユーザー選択のトーンは効かない
        let tone = profile.tone_locked.is_none().then_some(req.tone);

        let cache_key = (!req.options.randomize).then(|| {
            CacheKey::derive(&CacheKeyInput {
                text: &req.text,
                profile_id: &profile.id,
                tone,
                provider: self.provider.name(),
                model: self.provider.model(),
                stealth: req.options.stealth,
                detectors: req.options.detectors,
            })
        });

        if let Some(key) = &cache_key {
            if let Some(text) = self.cache.get(key) {
                log::info!("Cache hit: profile={} key={}", profile.id, &key.as_str()[..12]);
                self.metrics.inc_cache_hit();
                self.metrics.record_run_completed(&profile.id, None);
                return Ok(self.build_result(profile, req, text, true));
            }
            self.metrics.inc_cache_miss();
        }

        log::info!(
            "Run started: profile={} pipeline={} provider={} model={}",
            profile.id,
            profile.pipeline.label(),
            self.provider.name(),
            self.provider.model()
        );

        let text = match self.execute(profile, req, tone.unwrap_or_default(), rng).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Run aborted: {e}");
                self.metrics.inc_error(e.code());
                return Err(e);
            }
        };

        if let Some(key) = cache_key {
            self.cache.insert(key, text.clone());
        }

        let elapsed = start.elapsed().as_millis() as u64;
        self.metrics.record_run_completed(&profile.id, Some(elapsed));
        log::info!(
            "Run finished: profile={} passes={} words={} ({elapsed}ms)",
            profile.id,
            profile.pass_count(),
            word_count(&text)
        );

        Ok(self.build_result(profile, req, text, false))
    }

    /// パスを順に実行し、各出力を正規化して次のパスへ渡す
    async fn execute<R>(
        &self,
        profile: &ContentTypeProfile,
        req: &RunRequest,
        tone: Tone,
        rng: &mut R,
    ) -> Result<String, PipelineError>
    where
        R: Rng + Send,
    {
        let mut current = req.text.clone();

        for (index, pass) in profile.passes.iter().enumerate() {
            let pass_no = index + 1;
            let request = GenerationRequest {
                system: prompts::system_prompt_for(pass, tone, &req.options.detectors),
                user: prompts::user_message(pass.kind, &current),
                temperature: pass.temperature,
                max_tokens: pass.max_tokens,
            };

            let started = Instant::now();
            self.metrics.inc_provider_calls();
            let output = self
                .generate(&request)
                .await
                .map_err(|source| PipelineError::Provider {
                    pass: pass_no,
                    source,
                })?;

            current = Normalizer::normalize(&output);
            if current.is_empty() {
                return Err(PipelineError::Provider {
                    pass: pass_no,
                    source: ProviderError::EmptyResponse,
                });
            }

            let elapsed = started.elapsed().as_millis() as u64;
            self.metrics.record_pass(pass.kind, elapsed);
            log::debug!(
                "Pass {pass_no}/{} ({:?}, temperature {:.2}) done in {elapsed}ms",
                profile.pass_count(),
                pass.kind,
                pass.temperature
            );
        }

        if req.options.stealth {
            current = self.stealth(profile.pipeline, &current, rng);
        }

        Ok(current)
    }

    /// タイムアウト付きでプロバイダを呼ぶ
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, self.provider.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        }
    }

    /// 最終出力への決定的後処理。文長変換は multi-pass のみ。
    fn stealth<R: Rng + ?Sized>(&self, pipeline: PipelineKind, text: &str, rng: &mut R) -> String {
        let text = match pipeline {
            PipelineKind::MultiPass => burstiness::apply(text, &self.burstiness, rng),
            PipelineKind::SinglePass => text.to_string(),
        };
        self.cliches.declicheify(&text, rng)
    }

    fn build_result(
        &self,
        profile: &ContentTypeProfile,
        req: &RunRequest,
        text: String,
        cache_hit: bool,
    ) -> PipelineResult {
        PipelineResult {
            run_id: uuid::Uuid::new_v4().to_string(),
            profile_id: profile.id.clone(),
            word_count: word_count(&text),
            text,
            pass_count: profile.pass_count(),
            detector_count: req.options.detectors.count(),
            stealth: req.options.stealth,
            cache_hit,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::PassKind;
    use crate::domain::types::{DetectorTargets, RunOptions};
    use crate::infra::provider::EchoProvider;

    const TEXT: &str = "The quarterly review covered hiring, revenue, churn and the roadmap for next year in detail.";

    fn request(profile_id: &str) -> RunRequest {
        RunRequest {
            text: TEXT.to_string(),
            profile_id: profile_id.to_string(),
            tone: Tone::Conversational,
            options: RunOptions {
                stealth: false,
                randomize: false,
                detectors: DetectorTargets::default(),
            },
        }
    }

    fn service() -> HumanizerService {
        HumanizerService::new(Arc::new(EchoProvider::new()))
    }

    #[test]
    fn test_validation_order() {
        let svc = service();

        let mut req = request("email");
        req.text = "   ".to_string();
        assert_eq!(svc.validate(&req).unwrap_err(), ValidationError::EmptyText);

        req.text = "too short to run".to_string();
        assert_eq!(
            svc.validate(&req).unwrap_err(),
            ValidationError::TooShort { words: 4, min: 15 }
        );

        let mut req = request("email");
        req.options.detectors = DetectorTargets::none();
        assert_eq!(svc.validate(&req).unwrap_err(), ValidationError::NoDetectorSelected);

        let req = request("unknown");
        assert_eq!(
            svc.validate(&req).unwrap_err(),
            ValidationError::UnknownProfile("unknown".to_string())
        );

        assert_eq!(svc.validate(&request("email")).unwrap().id, "email");
    }

    #[test]
    fn test_min_words_configurable() {
        let svc = service().with_min_words(3);
        let mut req = request("email");
        req.text = "three words here".to_string();
        assert!(svc.validate(&req).is_ok());
    }

    #[tokio::test]
    async fn test_echo_run_single_pass() {
        let svc = service();
        let result = svc.run(&request("email")).await.unwrap();
        assert_eq!(result.text, TEXT);
        assert_eq!(result.pass_count, 1);
        assert_eq!(result.detector_count, 5);
        assert!(!result.cache_hit);
        assert_eq!(result.word_count, word_count(TEXT));
    }

    #[tokio::test]
    async fn test_echo_run_multi_pass_cached() {
        let svc = service();
        let first = svc.run(&request("blog-post")).await.unwrap();
        assert_eq!(first.pass_count, 4);
        let second = svc.run(&request("blog-post")).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(second.text, first.text);

        let m = svc.get_metrics();
        assert_eq!(m.runs_started, 2);
        assert_eq!(m.runs_completed, 2);
        assert_eq!(m.cache_hits, 1);
        assert_eq!(m.cache_misses, 1);
        assert_eq!(m.provider_calls, 4);
        assert_eq!(m.cache_hit_ratio, Some(0.5));
        assert_eq!(m.runs_by_profile.get("blog-post"), Some(&2));
        let kinds: Vec<PassKind> = m.pass_latency.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PassKind::Structure, PassKind::Voice, PassKind::Rhythm, PassKind::Polish]
        );
    }

    #[tokio::test]
    async fn test_stealth_declicheifies_final_output() {
        let svc = service().with_min_words(1);
        let mut req = request("email");
        req.text = "We leverage robust tooling in order to ship.".to_string();
        req.options.stealth = true;
        let mut rng = StdRng::seed_from_u64(5);
        let result = svc.run_with_rng(&req, &mut rng).await.unwrap();
        assert!(!result.text.contains("leverage"));
        assert!(!result.text.contains("robust"));
        assert!(!result.text.contains("in order to"));
    }

    const LONG_SENTENCE: &str = "The committee reviewed every proposal submitted during the spring term \
and the members agreed that the two strongest entries should go to the final round in order to keep the schedule.";

    fn always_split() -> BurstinessConfig {
        BurstinessConfig {
            split_probability: 1.0,
            ..BurstinessConfig::default()
        }
    }

    #[tokio::test]
    async fn test_single_pass_stealth_skips_rhythm_variation() {
        let svc = service().with_burstiness(always_split());
        let mut req = request("email");
        req.text = LONG_SENTENCE.to_string();
        req.options.stealth = true;
        let mut rng = StdRng::seed_from_u64(11);
        let result = svc.run_with_rng(&req, &mut rng).await.unwrap();
        assert_eq!(
            result.text,
            LONG_SENTENCE.replace("in order to", "to"),
            "single-pass output must stay one sentence"
        );
    }

    #[tokio::test]
    async fn test_multi_pass_stealth_varies_rhythm() {
        let svc = service().with_burstiness(always_split());
        let mut req = request("blog-post");
        req.text = LONG_SENTENCE.to_string();
        req.options.stealth = true;
        let mut rng = StdRng::seed_from_u64(11);
        let result = svc.run_with_rng(&req, &mut rng).await.unwrap();
        assert!(result.text.contains("spring term. And the members"), "{}", result.text);
        assert!(!result.text.contains("in order to"));
    }

    #[tokio::test]
    async fn test_validation_error_counted() {
        let svc = service();
        let mut req = request("email");
        req.text.clear();
        assert!(svc.run(&req).await.is_err());
        let m = svc.get_metrics();
        assert_eq!(m.error_count(ErrorCode::Validation), 1);
        assert_eq!(m.provider_calls, 0);
    }
}
