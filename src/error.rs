//! Failure taxonomy shared by every media-source provider.
//!
//! Providers surface exactly one [`ProviderError`] kind per failure, never a
//! bare transport error, so that host logic can branch on recoverability
//! without inspecting provider-specific details. Legitimate empty results
//! (a search with no matches, a media with no episodes yet) are empty
//! sequences, not errors.

/// Error kinds a provider may surface to its caller.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// An identifier (media, translation, server) does not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transient failure reaching or parsing the upstream source.
    /// The caller may retry.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Content permanently removed or expired upstream. The caller must not
    /// retry and should re-search instead.
    #[error("upstream gone: {0}")]
    UpstreamGone(String),

    /// The requested capability (e.g. a server name) is not offered by this
    /// provider.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A malformed argument, such as a URL outside the provider's hostnames.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ProviderError {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new UpstreamUnavailable error.
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    /// Create a new UpstreamGone error.
    pub fn gone<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamGone(msg.into())
    }

    /// Create a new Unsupported error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether a caller may retry the failed call as-is.
    ///
    /// Only [`ProviderError::UpstreamUnavailable`] is retryable; every other
    /// kind reflects a condition a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }

    /// Whether the failure signals permanence: the referenced content will
    /// never resolve again and the caller should re-search.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::UpstreamGone(_))
    }
}

impl From<url::ParseError> for ProviderError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type alias using [`ProviderError`].
pub type Result<T> = std::result::Result<T, ProviderError>;
