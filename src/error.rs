use miette::Diagnostic;
use thiserror::Error;

/// Main error type for spinex operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpinexError {
    #[error("IO error: {0}")]
    #[diagnostic(code(spinex::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(spinex::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(spinex::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Settings error: {message}")]
    #[diagnostic(code(spinex::settings))]
    Settings {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Export error: {message}")]
    #[diagnostic(code(spinex::export))]
    Export {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SpinexError>;
