use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use ht_core::domain::error::AppError;
use ht_core::domain::profile::ProfileCatalog;
use ht_core::domain::settings::{AppSettings, ProviderChoice};
use ht_core::domain::types::{DetectorTargets, PipelineResult, RunRequest, Tone};
use ht_core::infra::catalog::builtin_catalog;
use ht_core::infra::output::{ClipboardOutput, OutputTarget};
use ht_core::infra::provider;
use ht_core::infra::settings_store::SettingsStore;
use ht_core::usecase::HumanizerService;

use crate::Cli;

/// コマンドエラー型
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    App(#[from] AppError),
    #[error("[E_INTERNAL] Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type CmdResult<T> = Result<T, CommandError>;

/// 入力1件（ファイルまたは標準入力）
struct Input {
    label: String,
    text: String,
}

pub async fn execute(cli: Cli) -> CmdResult<()> {
    if cli.list_profiles {
        print_profiles(&builtin_catalog(), cli.json);
        return Ok(());
    }

    let store = SettingsStore::default_location();
    if cli.save_defaults {
        save_defaults(&store, &cli)?;
        eprintln!("Saved defaults to {}", store.path().display());
        return Ok(());
    }

    log::debug!("Loading settings from {}", store.path().display());
    let mut settings = store.load_with_env()?;
    apply_overrides(&mut settings, &cli)?;

    let tone = match &cli.tone {
        Some(name) => parse_tone(name)?,
        None => settings.default_tone,
    };
    let profile_id = cli
        .profile
        .clone()
        .unwrap_or_else(|| settings.default_profile.clone());

    let inputs = read_inputs(&cli.files)?;

    let provider = provider::from_settings(&settings).map_err(|e| AppError::config(e.to_string()))?;
    let service = HumanizerService::from_settings(provider, &settings);
    log::info!("Using provider {}", service.provider_name());

    let mut last: Option<PipelineResult> = None;
    let multiple = inputs.len() > 1;
    for input in inputs {
        let request = RunRequest {
            text: input.text,
            profile_id: profile_id.clone(),
            tone,
            options: settings.run_options(),
        };
        let result = service.run(&request).await.map_err(AppError::from)?;
        render(&input.label, &result, cli.json, multiple)?;
        last = Some(result);
    }

    if cli.copy {
        if let Some(result) = &last {
            ClipboardOutput::new().deliver(&result.text)?;
        }
    }

    if cli.metrics {
        let summary = serde_json::to_string_pretty(&service.get_metrics())
            .map_err(|e| AppError::internal(format!("metrics serialize: {e}")))?;
        eprintln!("{summary}");
    }

    Ok(())
}

/// CLI フラグで設定を上書きする
fn apply_overrides(settings: &mut AppSettings, cli: &Cli) -> Result<(), AppError> {
    if let Some(name) = &cli.provider {
        settings.provider = ProviderChoice::parse(name)
            .ok_or_else(|| AppError::config(format!("Unknown provider: {name}")))?;
    }
    if let Some(model) = &cli.model {
        settings.model = Some(model.clone());
    }
    if let Some(secs) = cli.timeout {
        settings.request_timeout_secs = secs;
    }
    if cli.no_stealth {
        settings.stealth = false;
    }
    if cli.no_randomize {
        settings.randomize = false;
    }
    if let Some(list) = &cli.detectors {
        settings.detectors = DetectorTargets::from_list(list).map_err(AppError::validation)?;
    }
    Ok(())
}

/// フラグを既定値として設定ファイルに書き込む。環境変数の API キーは書き込まない。
fn save_defaults(store: &SettingsStore, cli: &Cli) -> Result<AppSettings, AppError> {
    let mut settings = store.load()?;
    apply_overrides(&mut settings, cli)?;
    if let Some(id) = &cli.profile {
        if builtin_catalog().get(id).is_none() {
            return Err(AppError::validation(format!("Unknown content type: {id}")));
        }
        settings.default_profile = id.clone();
    }
    if let Some(name) = &cli.tone {
        settings.default_tone = parse_tone(name)?;
    }
    store.save(&settings)?;
    Ok(settings)
}

fn parse_tone(name: &str) -> Result<Tone, AppError> {
    Tone::parse(name).ok_or_else(|| {
        let known: Vec<String> = Tone::ALL
            .iter()
            .filter_map(|t| serde_json::to_value(t).ok())
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        AppError::validation(format!("Unknown tone: {name} (expected one of {})", known.join(", ")))
    })
}

fn read_inputs(files: &[PathBuf]) -> CmdResult<Vec<Input>> {
    if files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CommandError::Read {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(vec![Input {
            label: "<stdin>".to_string(),
            text,
        }]);
    }

    files.iter().map(|path| read_file(path)).collect()
}

fn read_file(path: &Path) -> CmdResult<Input> {
    let text = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Input {
        label: path.display().to_string(),
        text,
    })
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: &'a PipelineResult,
}

fn render(label: &str, result: &PipelineResult, json: bool, multiple: bool) -> Result<(), AppError> {
    if json {
        let out = serde_json::to_string_pretty(&JsonOutput { input: label, result })
            .map_err(|e| AppError::internal(format!("result serialize: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    if multiple {
        println!("==> {label} <==");
    }
    println!("{}", result.text);
    eprintln!(
        "passes: {} | detectors: {} | words: {} | stealth: {}{}",
        result.pass_count,
        result.detector_count,
        result.word_count,
        if result.stealth { "on" } else { "off" },
        if result.cache_hit { " | cached" } else { "" }
    );
    Ok(())
}

#[derive(Serialize)]
struct ProfileListing<'a> {
    id: &'a str,
    label: &'a str,
    group: &'a str,
    pipeline: &'a str,
    tone: Option<&'a str>,
}

fn print_profiles(catalog: &ProfileCatalog, json: bool) {
    if json {
        let listing: Vec<ProfileListing<'_>> = catalog
            .iter()
            .map(|p| ProfileListing {
                id: &p.id,
                label: &p.label,
                group: p.group.label(),
                pipeline: p.pipeline.label(),
                tone: p.tone_locked.as_deref(),
            })
            .collect();
        match serde_json::to_string_pretty(&listing) {
            Ok(out) => println!("{out}"),
            Err(e) => log::warn!("Failed to serialize profile list: {e}"),
        }
        return;
    }

    for (group, profiles) in catalog.grouped() {
        println!("{}", group.label());
        for p in profiles {
            let tone = p.tone_locked.as_deref().unwrap_or("selectable");
            println!("  {:<20} {} [{}; {}]", p.id, p.label, p.pipeline.label(), tone);
        }
    }
    println!("Tones");
    for tone in Tone::ALL {
        println!("  {}", tone.label());
    }
}
