//! Trait definition for media-source providers.
//!
//! This module defines the [`MediaSourceProvider`] trait that every concrete
//! source must implement. Different sources share no behavior, only the
//! signature contract, so there is deliberately no shared default logic here:
//! one trait, one implementation per upstream site.
//!
//! Calls are stateless from the caller's point of view. The only ordering
//! dependency is the identifier pipeline: `media_id_from_url`/`search`
//! produce a media id, `find_media` resolves it, `find_episodes` lists its
//! episodes, and `find_episode_server` turns one episode plus a translation
//! and server choice into playable streams.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Episode, EpisodeServer, Manifest, Media, Settings};

/// Async trait every media-source provider implements.
///
/// Implementations must be safe for concurrent use: a host may invoke
/// multiple operations against the same instance at once, and providers are
/// expected to be stateless or internally synchronized. Providers are
/// typically wrapped in an `Arc` and shared across tasks.
///
/// Every operation that reaches the upstream source performs I/O and may
/// fail with a [`ProviderError`](crate::ProviderError) kind; the caller is
/// responsible for bounding how long it waits and treats a timeout like a
/// transient failure. Cancellation is the caller's concern.
#[async_trait]
pub trait MediaSourceProvider: Send + Sync {
    /// Static self-description of this provider.
    ///
    /// Pure and infallible: descriptive data fixed at registration, never a
    /// network call.
    fn manifest(&self) -> Manifest;

    /// Declared runtime configuration, notably the episode servers this
    /// provider can resolve.
    ///
    /// Pure and side-effect free. Must be consistent with what
    /// [`find_episode_server`](Self::find_episode_server) accepts: a server
    /// name absent from `settings().episode_servers` is `Unsupported`.
    fn settings(&self) -> Settings;

    /// Search for titles matching a free-text query, in the provider's
    /// relevance order.
    ///
    /// An empty or nonsensical query is not an error: the result is
    /// `Ok(vec![])`. `UpstreamUnavailable` signals that the source could not
    /// be reached or its structure was unrecognized, which is distinct from
    /// "no results".
    async fn search(&self, query: &str) -> Result<Vec<Media>>;

    /// Derive the provider-scoped media id from a page URL.
    ///
    /// When the URL already encodes the id this performs no network fetch;
    /// otherwise the provider may resolve via a lookup. Fails with
    /// `InvalidInput` if the URL does not belong to this provider's
    /// hostnames and `NotFound` if it maps to no media.
    async fn media_id_from_url(&self, url: &str) -> Result<String>;

    /// Resolve a previously obtained media id to a full record.
    ///
    /// Idempotent: repeated calls with the same still-valid id return
    /// semantically equivalent records. Descriptive fields may refresh, but
    /// `provider` and `id` are stable. `NotFound` if the id is unknown or
    /// was removed upstream.
    async fn find_media(&self, media_id: &str) -> Result<Media>;

    /// List all episodes of a media, sorted by `number` ascending.
    ///
    /// A media known to have zero episodes (e.g. not yet released) yields
    /// `Ok(vec![])`; errors are reserved for genuine resolution failure.
    /// Every returned episode's `media_id` equals the queried id.
    async fn find_episodes(&self, media_id: &str) -> Result<Vec<Episode>>;

    /// Resolve playable streams and subtitles for one episode, one of its
    /// translations, and one declared server.
    ///
    /// The highest-latency, highest-failure-risk operation: it usually
    /// requires live interaction with the upstream source. Failure kinds are
    /// distinct and meaningful: `NotFound` for a translation id not in the
    /// episode's `translations`, `Unsupported` for a server name not in
    /// [`settings`](Self::settings), `UpstreamUnavailable` for transient
    /// trouble, and `UpstreamGone` when the content was permanently removed.
    /// Callers treat every failure as retryable unless the kind signals
    /// permanence.
    async fn find_episode_server(
        &self,
        episode: &Episode,
        translation_id: &str,
        server: &str,
    ) -> Result<EpisodeServer>;
}

impl std::fmt::Debug for dyn MediaSourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSourceProvider")
            .field("id", &self.manifest().id)
            .finish()
    }
}
