pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("flow endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("flow reply is not a JSON object: {0}")]
    InvalidReply(String),

    #[error("window error: {0}")]
    Gui(String),
}

impl AssistantError {
    /// True for failures of the remote call itself, as opposed to local setup.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Status { .. } | Self::InvalidReply(_)
        )
    }
}

impl From<eframe::Error> for AssistantError {
    fn from(err: eframe::Error) -> Self {
        Self::Gui(err.to_string())
    }
}
