//! Streamsource - Provider contract for pluggable media sources
//!
//! This crate defines the seam across which independently developed
//! media-source extensions stay interchangeable: the
//! [`MediaSourceProvider`] trait every source implements, the serializable
//! value records that cross the boundary, and the error taxonomy hosts
//! branch on.
//!
//! # Module layout
//!
//! - [`provider`] -- The [`MediaSourceProvider`] trait.
//! - [`model`] -- Value records (Manifest, Media, Episode, EpisodeServer, ...).
//! - [`error`] -- The [`ProviderError`] failure taxonomy.
//! - [`registry`] -- Host-side provider registry and URL routing.
//! - [`providers`] -- The bundled in-memory [`CatalogProvider`](providers::CatalogProvider).
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use streamsource::ProviderRegistry;
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register(Arc::new(my_provider))?;
//!
//! let provider = registry.route_url("https://demoflix.example/title/demo-show")?;
//! let media_id = provider.media_id_from_url("https://demoflix.example/title/demo-show").await?;
//! let media = provider.find_media(&media_id).await?;
//! let episodes = provider.find_episodes(&media.id).await?;
//! ```

pub mod error;
pub mod model;
pub mod provider;
pub mod providers;
pub mod registry;

pub use error::{ProviderError, Result};
pub use model::{
    Episode, EpisodeServer, Manifest, Media, OtherProps, ProviderType, Settings, Stream,
    StreamType, Subtitle, Translation,
};
pub use provider::MediaSourceProvider;
pub use registry::ProviderRegistry;
