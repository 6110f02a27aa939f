use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {path} failed with status {status}")]
    Status {
        path: String,
        status: u16,
        message: Option<String>,
    },
    #[error("request to {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid request url for {path}: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

impl TransportError {
    /// Message supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid json for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ActionError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ActionError::Transport(err) => err.server_message(),
            ActionError::Json { .. } => None,
        }
    }
}

/// A local precondition that stopped an action before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Only episodes from {host} are permitted.")]
    NotEpisodeLink { host: String },
    #[error("You must login to remove your link")]
    LoginRequiredToRemove,
    #[error("Error with that link")]
    MissingLinkId,
    #[error("You must login to vote")]
    LoginRequiredToVote,
}
