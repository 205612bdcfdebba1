//! Value records exchanged across the provider boundary.
//!
//! Every type here is a plain, serializable record: no record owns another by
//! reference, all cross-entity links are identifier strings, so records can
//! be serialized and transmitted independently and recombined by the caller.
//! Records are created fresh per call and are read-only once returned.
//!
//! The wire format is JSON with camelCase field names; existing callers and
//! extensions depend on those exact names, so renames here are breaking.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Provider self-description
// ---------------------------------------------------------------------------

/// What a provider supplies: metadata, playable content, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Metadata only (search and media resolution).
    Information,
    /// Playable content only (episodes and streams).
    Episode,
    /// Both metadata and playable content.
    InformationAndEpisode,
}

impl ProviderType {
    /// Whether providers of this type are expected to answer `search` and
    /// `find_media` meaningfully.
    pub fn provides_information(&self) -> bool {
        matches!(self, Self::Information | Self::InformationAndEpisode)
    }

    /// Whether providers of this type are expected to resolve episodes and
    /// episode servers.
    pub fn provides_episodes(&self) -> bool {
        matches!(self, Self::Episode | Self::InformationAndEpisode)
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Information => write!(f, "information"),
            Self::Episode => write!(f, "episode"),
            Self::InformationAndEpisode => write!(f, "information_and_episode"),
        }
    }
}

/// Static self-description of a provider extension.
///
/// Created once at provider registration and immutable thereafter; returning
/// it must never require a network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Globally unique provider identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Domains this provider claims to serve, in preference order. Used to
    /// route a page URL to the provider that can resolve it.
    pub hostnames: Vec<String>,
    /// What this provider supplies.
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
}

impl Manifest {
    /// Whether `host` falls under one of the claimed hostnames, either
    /// exactly or as a subdomain (`watch.example.com` matches a claim of
    /// `example.com`).
    pub fn claims_host(&self, host: &str) -> bool {
        self.hostnames.iter().any(|claimed| {
            host == claimed
                || (host.len() > claimed.len()
                    && host.ends_with(claimed)
                    && host.as_bytes()[host.len() - claimed.len() - 1] == b'.')
        })
    }
}

/// Provider-reported runtime configuration.
///
/// Queried per session and never mutated by the caller. A provider with no
/// stated preference reports an empty server list, which serializes as `[]`
/// rather than an absent or null value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Server names the provider can resolve, in preference order. Must be
    /// consistent with what `find_episode_server` actually accepts.
    #[serde(default)]
    pub episode_servers: Vec<String>,
}

impl Settings {
    /// Whether `server` is one of the declared episode servers.
    pub fn supports_server(&self, server: &str) -> bool {
        self.episode_servers.iter().any(|s| s == server)
    }
}

// ---------------------------------------------------------------------------
// Media and episodes
// ---------------------------------------------------------------------------

/// Open-ended extra attributes a provider attaches to a [`Media`] when the
/// common schema does not capture something it needs to round-trip.
///
/// A thin bag over an ordered string-to-JSON map; it serializes transparently
/// as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherProps(BTreeMap<String, serde_json::Value>);

impl OtherProps {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Insert a value, returning the previous one if the key was present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, serde_json::Value)> for OtherProps {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A resolved title (show or movie) as known to one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Id of the owning provider, for round-tripping back to it.
    pub provider: String,
    /// Provider-scoped slug uniquely identifying the title. Non-empty and
    /// stable across calls; required to fetch episodes.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Synopsis text, if the provider has one.
    #[serde(default)]
    pub description: Option<String>,
    /// Cover image URL, if the provider has one.
    #[serde(default)]
    pub cover: Option<String>,
    /// Canonical page URL.
    pub url: String,
    /// Provider-specific extra data the common schema does not capture.
    #[serde(default)]
    pub other_props: Option<OtherProps>,
}

/// One installment of a [`Media`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Id of the owning provider.
    pub provider: String,
    /// Opaque episode handle. Distinct from any [`Translation::id`]; server
    /// resolution always goes through an explicit translation id.
    pub id: String,
    /// Zero-based episode number, non-decreasing across an episode list.
    pub number: u32,
    /// Episode title, if the provider has one.
    #[serde(default)]
    pub title: Option<String>,
    /// Alternate sources/subbers for the same episode content, in the
    /// provider's preference order.
    pub translations: Vec<Translation>,
    /// Episode page URL.
    pub url: String,
    /// Id of the owning [`Media`], as resolved from the same provider.
    pub media_id: String,
}

impl Episode {
    /// Look up one of this episode's translations by id.
    pub fn translation(&self, translation_id: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.id == translation_id)
    }
}

/// One specific version of an episode's content, e.g. a particular
/// fansub or localization group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Id used to resolve an [`EpisodeServer`].
    pub id: String,
    /// Source/group display name, e.g. "Crunchyroll", "Erai-Raws".
    pub title: String,
    /// URL of the translation source.
    pub url: String,
}

// ---------------------------------------------------------------------------
// Resolved playback
// ---------------------------------------------------------------------------

/// Container/transport of a [`Stream`], which determines the playback and
/// demuxing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    /// Progressive MP4.
    Mp4,
    /// HLS playlist.
    M3u8,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mp4 => write!(f, "mp4"),
            Self::M3u8 => write!(f, "m3u8"),
        }
    }
}

/// One playable variant of an episode, typically a quality level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Playable URL.
    pub url: String,
    /// Container/transport of the stream.
    #[serde(rename = "type")]
    pub stream_type: StreamType,
    /// Free-form quality label, e.g. "1080p", "auto". Not guaranteed to be
    /// machine-sortable.
    pub quality: String,
}

/// One caption track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Track URL.
    pub url: String,
    /// ISO-style language/country code, e.g. "en", "fr".
    pub language: String,
}

/// The resolved, playable result for one (episode, translation, server)
/// triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeServer {
    /// Id of the owning provider.
    pub provider: String,
    /// Server/CDN name, e.g. "vidcloud".
    pub server: String,
    /// Quality variants of the same content, in the provider's order.
    pub streams: Vec<Stream>,
    /// Caption tracks. Order carries no meaning.
    pub subtitles: Vec<Subtitle>,
    /// HTTP headers required to fetch the streams, e.g. referer or origin
    /// values the upstream CDN checks.
    pub headers: HashMap<String, String>,
    /// When the stream URLs stop being valid. Absent means permanent. The
    /// contract never auto-refreshes; past this instant the caller must call
    /// `find_episode_server` again.
    #[serde(default)]
    pub expired_at: Option<DateTime<Utc>>,
}

impl EpisodeServer {
    /// Whether the streams must be considered invalid as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at.is_some_and(|at| at <= now)
    }

    /// Whether the streams must be considered invalid right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
