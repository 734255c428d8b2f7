use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A run is in progress; it has to be stopped before starting another.
    SessionAlreadyActive,
    UnknownAlgorithm(String),
    UnknownPalette(String),
    /// A font file could not be read or parsed.
    Font(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionAlreadyActive => write!(f, "a generation session is already active"),
            Self::UnknownAlgorithm(name) => write!(f, "unknown algorithm: {}", name),
            Self::UnknownPalette(name) => write!(f, "unknown palette: {}", name),
            Self::Font(reason) => write!(f, "failed to load font: {}", reason),
        }
    }
}

impl Error for GenerationError {}
