use miette::Diagnostic;
use thiserror::Error;

/// Failures while loading the keycast configuration.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("configuration is not valid KDL")]
    #[diagnostic(code(keycast::config::syntax))]
    Syntax {
        #[source_code]
        src: String,
        #[label("parsing stopped here")]
        span: miette::SourceSpan,
        #[source]
        source: kdl::KdlError,
    },

    #[error("unknown log level '{value}'")]
    #[diagnostic(
        code(keycast::config::log_level),
        help("use trace, debug, info, warn, or error")
    )]
    UnknownLogLevel { value: String },

    #[error("{field} needs an integer argument (e.g., `{field} 250`)")]
    #[diagnostic(code(keycast::config::decay))]
    MissingDecay { field: &'static str },

    #[error("{field} must be a positive number of milliseconds, got {value}")]
    #[diagnostic(
        code(keycast::config::decay),
        help("a zero delay would clear switches before they are ever seen")
    )]
    InvalidDecay { field: &'static str, value: i64 },

    #[error("device filter selects nothing")]
    #[diagnostic(
        code(keycast::config::device_filter),
        help("give the filter a name (`device \"My Keyboard\"`) or a vendor-product child")
    )]
    EmptyDeviceFilter,

    #[error("could not read configuration file")]
    #[diagnostic(code(keycast::config::io))]
    Io(#[from] std::io::Error),
}
