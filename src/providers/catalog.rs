//! In-memory reference provider backed by a fixed catalogue.
//!
//! [`CatalogProvider`] implements the full [`MediaSourceProvider`] contract
//! deterministically and without network access. Hosts use it to test their
//! pipeline handling, and this crate's integration tests drive it through
//! every operation and failure kind: per-source `gone` flags produce
//! `UpstreamGone`, an `unavailable` toggle simulates upstream outages, and
//! expiry stamps exercise stream re-resolution.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::model::{
    Episode, EpisodeServer, Manifest, Media, OtherProps, Settings, Stream, Subtitle, Translation,
};
use crate::provider::MediaSourceProvider;

// ---------------------------------------------------------------------------
// Catalogue fixtures
// ---------------------------------------------------------------------------

/// One title in the catalogue.
#[derive(Debug, Clone)]
pub struct CatalogTitle {
    /// Provider-scoped media slug.
    pub slug: String,
    /// Display title.
    pub title: String,
    pub description: Option<String>,
    pub cover: Option<String>,
    /// Extra attributes carried through to [`Media::other_props`].
    pub other_props: Option<OtherProps>,
    /// Episodes in broadcast order. May be empty for an unreleased title.
    pub episodes: Vec<CatalogEpisode>,
}

/// One episode of a catalogue title.
#[derive(Debug, Clone)]
pub struct CatalogEpisode {
    /// Zero-based episode number.
    pub number: u32,
    pub title: Option<String>,
    /// Available translations, in preference order.
    pub translations: Vec<CatalogTranslation>,
}

/// One translation of a catalogue episode, with its resolvable sources.
#[derive(Debug, Clone)]
pub struct CatalogTranslation {
    /// Translation id, as surfaced in [`Translation::id`].
    pub id: String,
    /// Source/group display name.
    pub group: String,
    /// Per-server resolvable sources.
    pub sources: Vec<CatalogSource>,
}

/// The playable payload behind one (translation, server) pair.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    /// Server name; must appear in the provider's declared settings to be
    /// reachable.
    pub server: String,
    pub streams: Vec<Stream>,
    pub subtitles: Vec<Subtitle>,
    pub headers: HashMap<String, String>,
    pub expired_at: Option<DateTime<Utc>>,
    /// When set, resolving this source fails with `UpstreamGone`.
    pub gone: bool,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// Deterministic in-memory media-source provider.
///
/// Media page URLs take the form `https://<hostname>/title/<slug>` and
/// episode URLs `https://<hostname>/title/<slug>/<number>`, so
/// `media_id_from_url` can extract ids without any lookup.
pub struct CatalogProvider {
    manifest: Manifest,
    settings: Settings,
    titles: Vec<CatalogTitle>,
    unavailable: AtomicBool,
}

impl CatalogProvider {
    /// Create a provider over a fixed catalogue.
    pub fn new(manifest: Manifest, settings: Settings, titles: Vec<CatalogTitle>) -> Self {
        Self {
            manifest,
            settings,
            titles,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate an upstream outage: while set, every operation that would
    /// reach the source fails with `UpstreamUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ProviderError::unavailable(format!(
                "{} is not reachable",
                self.manifest.id
            )))
        } else {
            Ok(())
        }
    }

    fn base_host(&self) -> &str {
        self.manifest
            .hostnames
            .first()
            .map(String::as_str)
            .unwrap_or("localhost")
    }

    fn media_url(&self, slug: &str) -> String {
        format!("https://{}/title/{slug}", self.base_host())
    }

    fn episode_url(&self, slug: &str, number: u32) -> String {
        format!("https://{}/title/{slug}/{number}", self.base_host())
    }

    fn title(&self, slug: &str) -> Option<&CatalogTitle> {
        self.titles.iter().find(|t| t.slug == slug)
    }

    fn media_record(&self, title: &CatalogTitle) -> Media {
        Media {
            provider: self.manifest.id.clone(),
            id: title.slug.clone(),
            title: title.title.clone(),
            description: title.description.clone(),
            cover: title.cover.clone(),
            url: self.media_url(&title.slug),
            other_props: title.other_props.clone(),
        }
    }

    fn episode_record(&self, slug: &str, episode: &CatalogEpisode) -> Episode {
        Episode {
            provider: self.manifest.id.clone(),
            id: format!("{slug}-{}", episode.number),
            number: episode.number,
            title: episode.title.clone(),
            translations: episode
                .translations
                .iter()
                .map(|t| Translation {
                    id: t.id.clone(),
                    title: t.group.clone(),
                    url: format!(
                        "https://{}/title/{slug}/{}/{}",
                        self.base_host(),
                        episode.number,
                        t.id
                    ),
                })
                .collect(),
            url: self.episode_url(slug, episode.number),
            media_id: slug.to_string(),
        }
    }
}

#[async_trait]
impl MediaSourceProvider for CatalogProvider {
    fn manifest(&self) -> Manifest {
        self.manifest.clone()
    }

    fn settings(&self) -> Settings {
        self.settings.clone()
    }

    async fn search(&self, query: &str) -> Result<Vec<Media>> {
        self.check_available()?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let results: Vec<Media> = self
            .titles
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .map(|t| self.media_record(t))
            .collect();
        debug!(provider = %self.manifest.id, query, hits = results.len(), "catalogue search");
        Ok(results)
    }

    async fn media_id_from_url(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ProviderError::invalid_input(format!("URL has no host: {url}")))?;
        if !self.manifest.claims_host(host) {
            return Err(ProviderError::invalid_input(format!(
                "hostname {host} does not belong to {}",
                self.manifest.id
            )));
        }

        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| ProviderError::invalid_input(format!("URL has no path: {url}")))?;
        let slug = match (segments.next(), segments.next()) {
            (Some("title"), Some(slug)) if !slug.is_empty() => slug.to_string(),
            _ => {
                return Err(ProviderError::invalid_input(format!(
                    "URL does not point at a title page: {url}"
                )))
            }
        };

        if self.title(&slug).is_none() {
            return Err(ProviderError::not_found(format!(
                "no media behind URL: {url}"
            )));
        }
        Ok(slug)
    }

    async fn find_media(&self, media_id: &str) -> Result<Media> {
        self.check_available()?;
        self.title(media_id)
            .map(|t| self.media_record(t))
            .ok_or_else(|| ProviderError::not_found(format!("unknown media id: {media_id}")))
    }

    async fn find_episodes(&self, media_id: &str) -> Result<Vec<Episode>> {
        self.check_available()?;
        let title = self
            .title(media_id)
            .ok_or_else(|| ProviderError::not_found(format!("unknown media id: {media_id}")))?;

        let mut episodes: Vec<Episode> = title
            .episodes
            .iter()
            .map(|e| self.episode_record(media_id, e))
            .collect();
        episodes.sort_by_key(|e| e.number);
        Ok(episodes)
    }

    async fn find_episode_server(
        &self,
        episode: &Episode,
        translation_id: &str,
        server: &str,
    ) -> Result<EpisodeServer> {
        self.check_available()?;

        if !self.settings.supports_server(server) {
            return Err(ProviderError::unsupported(format!(
                "server not declared by {}: {server}",
                self.manifest.id
            )));
        }
        if episode.translation(translation_id).is_none() {
            return Err(ProviderError::not_found(format!(
                "episode {} has no translation: {translation_id}",
                episode.id
            )));
        }

        let title = self.title(&episode.media_id).ok_or_else(|| {
            ProviderError::not_found(format!("unknown media id: {}", episode.media_id))
        })?;
        let entry = title
            .episodes
            .iter()
            .find(|e| e.number == episode.number)
            .ok_or_else(|| {
                ProviderError::not_found(format!("unknown episode number: {}", episode.number))
            })?;
        let translation = entry
            .translations
            .iter()
            .find(|t| t.id == translation_id)
            .ok_or_else(|| {
                ProviderError::not_found(format!("unknown translation id: {translation_id}"))
            })?;
        let source = translation
            .sources
            .iter()
            .find(|s| s.server == server)
            .ok_or_else(|| {
                ProviderError::not_found(format!(
                    "translation {translation_id} has no source on server {server}"
                ))
            })?;

        if source.gone {
            return Err(ProviderError::gone(format!(
                "content removed upstream: {}/{translation_id}/{server}",
                episode.id
            )));
        }

        debug!(
            provider = %self.manifest.id,
            episode = %episode.id,
            translation = translation_id,
            server,
            "resolved episode server"
        );
        Ok(EpisodeServer {
            provider: self.manifest.id.clone(),
            server: server.to_string(),
            streams: source.streams.clone(),
            subtitles: source.subtitles.clone(),
            headers: source.headers.clone(),
            expired_at: source.expired_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProviderType, StreamType};
    use assert_matches::assert_matches;

    fn provider() -> CatalogProvider {
        let manifest = Manifest {
            id: "demoflix".to_string(),
            name: "DemoFlix".to_string(),
            hostnames: vec!["demoflix.example".to_string()],
            provider_type: ProviderType::InformationAndEpisode,
        };
        let settings = Settings {
            episode_servers: vec!["vidcloud".to_string()],
        };
        let titles = vec![CatalogTitle {
            slug: "demo-show".to_string(),
            title: "Demo Show".to_string(),
            description: None,
            cover: None,
            other_props: None,
            episodes: vec![CatalogEpisode {
                number: 0,
                title: Some("Pilot".to_string()),
                translations: vec![CatalogTranslation {
                    id: "official".to_string(),
                    group: "Official".to_string(),
                    sources: vec![CatalogSource {
                        server: "vidcloud".to_string(),
                        streams: vec![Stream {
                            url: "https://cdn.demoflix.example/0.m3u8".to_string(),
                            stream_type: StreamType::M3u8,
                            quality: "auto".to_string(),
                        }],
                        subtitles: Vec::new(),
                        headers: HashMap::new(),
                        expired_at: None,
                        gone: false,
                    }],
                }],
            }],
        }];
        CatalogProvider::new(manifest, settings, titles)
    }

    #[tokio::test]
    async fn search_matches_case_insensitively() {
        let p = provider();
        let hits = p.search("demo").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "demo-show");
        assert_eq!(hits[0].provider, "demoflix");

        assert!(p.search("nothing here").await.unwrap().is_empty());
        assert!(p.search("").await.unwrap().is_empty());
        assert!(p.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn media_id_from_url_extracts_slug() {
        let p = provider();
        let id = p
            .media_id_from_url("https://demoflix.example/title/demo-show")
            .await
            .unwrap();
        assert_eq!(id, "demo-show");

        // Episode URLs also encode the slug.
        let id = p
            .media_id_from_url("https://demoflix.example/title/demo-show/0")
            .await
            .unwrap();
        assert_eq!(id, "demo-show");
    }

    #[tokio::test]
    async fn media_id_from_url_rejects_foreign_and_unknown() {
        let p = provider();
        assert_matches!(
            p.media_id_from_url("https://other.example/title/demo-show")
                .await
                .unwrap_err(),
            ProviderError::InvalidInput(_)
        );
        assert_matches!(
            p.media_id_from_url("https://demoflix.example/about")
                .await
                .unwrap_err(),
            ProviderError::InvalidInput(_)
        );
        assert_matches!(
            p.media_id_from_url("https://demoflix.example/title/missing")
                .await
                .unwrap_err(),
            ProviderError::NotFound(_)
        );
    }

    #[tokio::test]
    async fn unavailable_toggle() {
        let p = provider();
        p.set_unavailable(true);
        let err = p.search("demo").await.unwrap_err();
        assert!(err.is_retryable());

        p.set_unavailable(false);
        assert_eq!(p.search("demo").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolves_declared_server() {
        let p = provider();
        let episodes = p.find_episodes("demo-show").await.unwrap();
        let server = p
            .find_episode_server(&episodes[0], "official", "vidcloud")
            .await
            .unwrap();
        assert_eq!(server.provider, "demoflix");
        assert_eq!(server.server, "vidcloud");
        assert_eq!(server.streams.len(), 1);
        assert!(!server.is_expired());
    }
}
