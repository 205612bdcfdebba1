//! Host-side registry for managing multiple [`MediaSourceProvider`] instances.
//!
//! The [`ProviderRegistry`] holds one provider per registered extension and
//! answers "which provider" questions: lookup by manifest id, routing a page
//! URL to the provider whose hostnames claim it, and filtering by declared
//! capability. It deliberately does not merge, rank, or deduplicate results
//! across providers; every contract call goes to exactly one provider chosen
//! by the host.

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::model::ProviderType;
use crate::provider::MediaSourceProvider;

/// A registry of [`MediaSourceProvider`] instances, kept in registration
/// order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MediaSourceProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider.
    ///
    /// Manifest ids are globally unique, so registering a second provider
    /// with an already-known id fails with `InvalidInput` instead of
    /// silently replacing the first.
    pub fn register(&mut self, provider: Arc<dyn MediaSourceProvider>) -> Result<()> {
        let manifest = provider.manifest();
        if self.get(&manifest.id).is_some() {
            return Err(ProviderError::invalid_input(format!(
                "provider id already registered: {}",
                manifest.id
            )));
        }
        debug!(id = %manifest.id, name = %manifest.name, "registering provider");
        self.providers.push(provider);
        Ok(())
    }

    /// Look up a provider by its manifest id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn MediaSourceProvider>> {
        self.providers
            .iter()
            .find(|p| p.manifest().id == id)
            .cloned()
    }

    /// Route a page URL to the provider whose manifest hostnames claim its
    /// host. The first registered match wins; a claimed hostname matches the
    /// URL host exactly or as a parent domain.
    ///
    /// Fails with `InvalidInput` for URLs that cannot be parsed or carry no
    /// host, and `NotFound` when no registered provider claims the host.
    pub fn route_url(&self, url: &str) -> Result<Arc<dyn MediaSourceProvider>> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ProviderError::invalid_input(format!("URL has no host: {url}")))?;

        for provider in &self.providers {
            let manifest = provider.manifest();
            if manifest.claims_host(host) {
                debug!(host, provider = %manifest.id, "routed URL to provider");
                return Ok(Arc::clone(provider));
            }
        }

        Err(ProviderError::not_found(format!(
            "no registered provider claims hostname: {host}"
        )))
    }

    /// All providers whose manifest declares the given type.
    pub fn providers_of_type(&self, provider_type: ProviderType) -> Vec<Arc<dyn MediaSourceProvider>> {
        self.providers
            .iter()
            .filter(|p| p.manifest().provider_type == provider_type)
            .cloned()
            .collect()
    }

    /// Manifest ids of all registered providers, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.manifest().id).collect()
    }

    /// Iterate over all registered providers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MediaSourceProvider>> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Episode, EpisodeServer, Manifest, Media, Settings};
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    /// A minimal stub provider used for registry tests.
    struct StubProvider {
        manifest: Manifest,
    }

    impl StubProvider {
        fn new(id: &str, hostnames: &[&str], provider_type: ProviderType) -> Arc<Self> {
            Arc::new(Self {
                manifest: Manifest {
                    id: id.to_string(),
                    name: id.to_string(),
                    hostnames: hostnames.iter().map(|h| h.to_string()).collect(),
                    provider_type,
                },
            })
        }
    }

    #[async_trait]
    impl MediaSourceProvider for StubProvider {
        fn manifest(&self) -> Manifest {
            self.manifest.clone()
        }

        fn settings(&self) -> Settings {
            Settings::default()
        }

        async fn search(&self, _query: &str) -> Result<Vec<Media>> {
            Ok(Vec::new())
        }

        async fn media_id_from_url(&self, _url: &str) -> Result<String> {
            Err(ProviderError::not_found("stub"))
        }

        async fn find_media(&self, media_id: &str) -> Result<Media> {
            Err(ProviderError::not_found(media_id))
        }

        async fn find_episodes(&self, _media_id: &str) -> Result<Vec<Episode>> {
            Ok(Vec::new())
        }

        async fn find_episode_server(
            &self,
            _episode: &Episode,
            _translation_id: &str,
            server: &str,
        ) -> Result<EpisodeServer> {
            Err(ProviderError::unsupported(server))
        }
    }

    #[test]
    fn empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
        assert!(registry.ids().is_empty());
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(StubProvider::new(
                "demoflix",
                &["demoflix.example"],
                ProviderType::InformationAndEpisode,
            ))
            .unwrap();
        registry
            .register(StubProvider::new(
                "subsource",
                &["subsource.example"],
                ProviderType::Episode,
            ))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec!["demoflix", "subsource"]);
        assert!(registry.get("demoflix").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(StubProvider::new(
                "demoflix",
                &["demoflix.example"],
                ProviderType::Episode,
            ))
            .unwrap();

        let err = registry
            .register(StubProvider::new(
                "demoflix",
                &["other.example"],
                ProviderType::Episode,
            ))
            .unwrap_err();
        assert_matches!(err, ProviderError::InvalidInput(_));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn route_url_by_hostname() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(StubProvider::new(
                "demoflix",
                &["demoflix.example"],
                ProviderType::InformationAndEpisode,
            ))
            .unwrap();
        registry
            .register(StubProvider::new(
                "subsource",
                &["subsource.example", "sbs.to"],
                ProviderType::Episode,
            ))
            .unwrap();

        let routed = registry
            .route_url("https://demoflix.example/show/slug-42")
            .unwrap();
        assert_eq!(routed.manifest().id, "demoflix");

        // Subdomains of a claimed hostname route too.
        let routed = registry.route_url("https://watch.sbs.to/ep/1").unwrap();
        assert_eq!(routed.manifest().id, "subsource");
    }

    #[test]
    fn route_url_unclaimed_host() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(StubProvider::new(
                "demoflix",
                &["demoflix.example"],
                ProviderType::Episode,
            ))
            .unwrap();

        let err = registry
            .route_url("https://unrelated.example/page")
            .unwrap_err();
        assert_matches!(err, ProviderError::NotFound(_));
    }

    #[test]
    fn route_url_invalid() {
        let registry = ProviderRegistry::new();
        assert_matches!(
            registry.route_url("not a url").unwrap_err(),
            ProviderError::InvalidInput(_)
        );
        assert_matches!(
            registry.route_url("data:text/plain,hello").unwrap_err(),
            ProviderError::InvalidInput(_)
        );
    }

    #[test]
    fn filter_by_type() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(StubProvider::new(
                "meta-only",
                &["meta.example"],
                ProviderType::Information,
            ))
            .unwrap();
        registry
            .register(StubProvider::new(
                "full",
                &["full.example"],
                ProviderType::InformationAndEpisode,
            ))
            .unwrap();

        let info = registry.providers_of_type(ProviderType::Information);
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].manifest().id, "meta-only");
        assert!(registry.providers_of_type(ProviderType::Episode).is_empty());
    }
}
