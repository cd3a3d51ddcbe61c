use std::path::PathBuf;

/// Errors raised by the console helpers.
///
/// Clause extractors never produce these; absence of a clause is reported as `None`.
#[derive(Debug)]
pub enum ConsoleError {
    /// An argument was neither a sequence nor a key-iterable mapping.
    TypeUnsupported(String),
    /// An argument was outside the accepted domain (e.g. an empty token).
    InvalidInput(String),
    Io(std::io::Error),
    /// A vocabulary document could not be decoded.
    Vocabulary(String),
    UnknownVocabularyFormat(PathBuf),
    /// Malformed credentials file, with the 1-based line number.
    Config { line: usize, message: String },
    MissingInstance(String),
    Prompt(String),
    /// No program could be spawned to open the file.
    OpenerUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleError::TypeUnsupported(kind) => {
                write!(f, "Unsupported type: expected a list or a mapping, got {kind}")
            }
            ConsoleError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            ConsoleError::Io(err) => write!(f, "IO error: {err}"),
            ConsoleError::Vocabulary(msg) => write!(f, "Invalid vocabulary: {msg}"),
            ConsoleError::UnknownVocabularyFormat(path) => write!(
                f,
                "Unknown vocabulary format for {} (expected .json, .toml, .yaml or .yml)",
                path.display()
            ),
            ConsoleError::Config { line, message } => {
                write!(f, "Invalid config file at line {line}: {message}")
            }
            ConsoleError::MissingInstance(name) => {
                write!(f, "No [instance.{name}] section in config file")
            }
            ConsoleError::Prompt(msg) => write!(f, "Prompt failed: {msg}"),
            ConsoleError::OpenerUnavailable { path, source } => write!(
                f,
                "Couldn't find suitable opener for {}: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Io(err) => Some(err),
            ConsoleError::OpenerUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

impl From<dialoguer::Error> for ConsoleError {
    fn from(err: dialoguer::Error) -> Self {
        ConsoleError::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = ConsoleError::TypeUnsupported("number".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported type: expected a list or a mapping, got number"
        );

        let err = ConsoleError::Config {
            line: 3,
            message: "key outside of a section".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config file at line 3: key outside of a section"
        );
    }

    #[test]
    fn test_io_error_source() {
        let err: ConsoleError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ConsoleError::Io(_)));
        assert!(err.source().is_some());
        assert!(ConsoleError::InvalidInput("x".into()).source().is_none());
    }
}
