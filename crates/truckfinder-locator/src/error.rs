use thiserror::Error;

/// Failures retrieving the raw dataset from upstream.
///
/// Every variant means the same thing to callers: upstream is unavailable
/// right now. The split exists for logs.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid dataset URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
