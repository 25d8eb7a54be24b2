//! Settings and answers file loading

mod loader;

pub use loader::{load_answers, SettingsLoader, SettingsSource};
