//! devlog: content indexing and retrieval for a markdown/MDX blog
//!
//! Posts live as flat files with a YAML front-matter block. This crate
//! loads them into typed records and answers the queries a blog front end
//! needs: recency listings, lookup by slug, tag and author filters,
//! free-text search, heading outlines and pagination. A small JSON API,
//! sitemap/robots generation and a CLI sit on top.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use cache::CachedRepository;
use content::{Catalog, FsPostRepository};

/// Catalog type used by the application: filesystem posts behind a
/// revision-checked cache
pub type SiteCatalog = Catalog<CachedRepository<FsPostRepository>>;

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding post documents
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Filesystem repository configured from the site settings
    pub fn repository(&self) -> FsPostRepository {
        FsPostRepository::new(&self.content_dir)
            .with_extensions(self.config.extensions.iter().cloned())
            .with_default_author(self.config.author.clone())
    }

    /// Query catalog over the content directory.
    ///
    /// With `cache: false` in the config every read rescans the directory.
    pub fn catalog(&self) -> SiteCatalog {
        Catalog::new(CachedRepository::new(self.repository()).with_enabled(self.config.cache))
    }

    /// Write sitemap.xml, robots.txt and search.json
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
