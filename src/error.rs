use std::fmt;

/// A form answer that is present but could not be coerced to its field type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Semantic key of the offending answer
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' for '{}': {}",
            self.value, self.key, self.reason
        )
    }
}

/// Failures talking to the form service or the directory service.
#[derive(Debug)]
pub enum TransportError {
    Request(reqwest::Error),
    Status {
        method: String,
        url: String,
        status: String,
        message: Option<String>,
    },
    Decode(String),
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(e) => write!(f, "request failed: {}", e),
            TransportError::Status {
                method,
                url,
                status,
                message,
            } => match message {
                Some(message) => write!(f, "{} {}: {} {}", method, url, status, message),
                None => write!(f, "{} {}: {}", method, url, status),
            },
            TransportError::Decode(e) => write!(f, "unexpected response body: {}", e),
            TransportError::Io(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Parse(ParseError),
    NotFound(String),
    Transport(TransportError),
    Configuration(String),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Parse(e) => write!(f, "Parse error: {}", e),
            AppError::NotFound(email) => write!(f, "Not found: couldn't find '{}' in directory", email),
            AppError::Transport(e) => write!(f, "Transport error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Transport(TransportError::Request(e)) => Some(e),
            AppError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(TransportError::Request(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Parse(err)
    }
}

impl AppError {
    pub fn parse(key: &str, value: &str, reason: impl ToString) -> Self {
        AppError::Parse(ParseError {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    }

    pub fn decode(reason: impl ToString) -> Self {
        AppError::Transport(TransportError::Decode(reason.to_string()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
