use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

/// How loudly a host should surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

/// Domain errors for hotkey registration, validation and configuration.
#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error(
        "Hotkey '{hotkey}' is already registered. Use ConflictBehavior::Replace to replace \
         the existing handler, or ConflictBehavior::Allow to allow multiple registrations."
    )]
    Conflict { hotkey: String },

    #[error("Sequence must contain at least one hotkey")]
    EmptySequence,

    #[error("Invalid hotkey '{hotkey}': {}", .errors.join(", "))]
    InvalidHotkey { hotkey: String, errors: Vec<String> },

    #[error("Failed to read config '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl HotkeyError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Conflict { .. } => ErrorSeverity::Error,
            Self::EmptySequence => ErrorSeverity::Error,
            Self::InvalidHotkey { .. } => ErrorSeverity::Error,
            Self::ConfigRead { .. } => ErrorSeverity::Warning,
            Self::ConfigParse(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Conflict { hotkey } => format!("{} is already in use", hotkey),
            Self::EmptySequence => "A key sequence needs at least one key".to_string(),
            Self::InvalidHotkey { hotkey, errors } => {
                format!("'{}' is not a valid shortcut: {}", hotkey, errors.join("; "))
            }
            Self::ConfigRead { path, .. } => {
                format!("Could not read settings from {}", path.display())
            }
            Self::ConfigParse(e) => format!("Settings file is malformed: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, HotkeyError>;

/// Log-and-continue helpers with caller location.
///
/// ```
/// use hotkeys::error::ResultExt;
///
/// let parsed: Option<u32> = "12".parse::<u32>().log_err();
/// assert_eq!(parsed, Some(12));
/// ```
pub trait ResultExt<T> {
    /// Log as error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
