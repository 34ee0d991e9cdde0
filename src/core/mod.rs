pub mod config;
pub mod error;
pub mod l10n;

pub use config::EngineConfig;
pub use error::{ConfigError, ErrorKind, EvalError, LookupKind, Result};
pub use l10n::{L10nMessage, Localizer};
