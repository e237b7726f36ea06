pub mod error;
pub mod profile;
pub mod settings;
pub mod types;
