pub mod humanizer_service;

pub use humanizer_service::HumanizerService;
