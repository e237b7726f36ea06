pub mod burstiness;
pub mod cache;
pub mod catalog;
pub mod cliche;
pub mod metrics;
pub mod normalizer;
pub mod output;
pub mod prompts;
pub mod provider;
pub mod segmenter;
pub mod settings_store;
