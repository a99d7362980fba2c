use thiserror::Error;

/// Errors returned by the catalog store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("store returned HTTP {status} for {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        /// First few hundred bytes of the response body, for diagnostics.
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A write asked for `return=representation` but the store sent back an
    /// empty row set.
    #[error("store returned no representation for {context}")]
    MissingRow { context: String },

    /// The client was constructed with an unusable base URL.
    #[error("invalid store base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
