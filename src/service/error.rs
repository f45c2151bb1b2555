/// Error types for calls to the bilingual text services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No valid session; the caller should send the user to the login page
    Unauthorized,
    /// The service answered with a non-success status
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// The request never produced a response (connectivity, timeout, ...)
    Network(String),
    /// The response body could not be decoded
    Decode(String),
    /// The client could not be set up
    Config(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Unauthorized => write!(f, "Not authenticated"),
            ServiceError::Status {
                endpoint,
                status,
                message,
            } => write!(f, "{} failed with status {}: {}", endpoint, status, message),
            ServiceError::Network(msg) => write!(f, "Network error: {}", msg),
            ServiceError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            ServiceError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// Result type for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;
