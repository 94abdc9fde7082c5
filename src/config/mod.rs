//! Project configuration (`.uusecret.toml`).

pub mod settings;

pub use settings::Settings;
