use std::fmt;

pub const VALIDATION_MESSAGE: &str = "Both full name and username are required";
pub const NO_SELECTION_MESSAGE: &str = "No user selected";
pub const CREATE_FAILED_MESSAGE: &str = "Error adding user. Please try again.";
pub const UPDATE_FAILED_MESSAGE: &str = "Error updating user. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting user. Please try again.";
pub const REFRESH_FAILED_MESSAGE: &str = "Error fetching user list. Please try again.";

/// Failure talking to the user backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure or timeout; no response was received.
    Network(String),
    /// Non-2xx response. `message` is the `error` field of the body, if any.
    Backend { status: u16, message: Option<String> },
    /// 2xx response whose body could not be decoded.
    Decode(String),
}

impl ApiError {
    /// The backend-provided message, when the backend sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend { message: Some(msg), .. } => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Backend { status, message: Some(msg) } => {
                write!(f, "Backend error ({}): {}", status, msg)
            }
            ApiError::Backend { status, message: None } => write!(f, "Backend error ({})", status),
            ApiError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Failure of a single directory operation.
///
/// `Display` yields the text shown to the user: the backend message when
/// present, otherwise the generic per-operation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    Validation,
    NoSelection,
    Create(ApiError),
    Update(ApiError),
    Delete(ApiError),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Validation => f.write_str(VALIDATION_MESSAGE),
            DirectoryError::NoSelection => f.write_str(NO_SELECTION_MESSAGE),
            DirectoryError::Create(e) => {
                f.write_str(e.backend_message().unwrap_or(CREATE_FAILED_MESSAGE))
            }
            DirectoryError::Update(e) => {
                f.write_str(e.backend_message().unwrap_or(UPDATE_FAILED_MESSAGE))
            }
            DirectoryError::Delete(e) => {
                f.write_str(e.backend_message().unwrap_or(DELETE_FAILED_MESSAGE))
            }
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Create(e) | DirectoryError::Update(e) | DirectoryError::Delete(e) => Some(e),
            _ => None,
        }
    }
}
