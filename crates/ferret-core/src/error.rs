use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Invalid arguments for {capability}: {message}")]
    InvalidArguments { capability: String, message: String },

    #[error("Capability error: {capability} - {message}")]
    Capability { capability: String, message: String },

    #[error("Unexpected result shape from {capability} (call {id}): {message}")]
    Shape {
        id: String,
        capability: String,
        message: String,
    },

    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn unknown_capability(name: impl Into<String>) -> Self {
        Self::UnknownCapability(name.into())
    }

    pub fn invalid_arguments(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            capability: capability.into(),
            message: message.into(),
        }
    }

    pub fn capability(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Capability {
            capability: capability.into(),
            message: message.into(),
        }
    }

    pub fn shape(
        id: impl Into<String>,
        capability: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Shape {
            id: id.into(),
            capability: capability.into(),
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::api(400, "Bad request");
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("Bad request"));

        let err = Error::shape("call_1", "find_news", "missing field `url`");
        assert!(err.to_string().contains("call_1"));
        assert!(err.to_string().contains("find_news"));
    }
}
