//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::repository::DEFAULT_EXTENSIONS;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    /// URL segment posts live under (`/<post_dir>/<slug>/`)
    pub post_dir: String,
    /// URL segment tag pages live under
    pub tag_dir: String,

    // Directory
    /// Directory holding the post documents, relative to the base dir
    pub content_dir: String,
    pub public_dir: String,
    /// Post file extensions, without the dot
    pub extensions: Vec<String>,

    // Listing
    pub per_page: usize,
    pub date_format: String,

    /// Reuse parsed posts until the content directory changes
    pub cache: bool,

    // Robots
    #[serde(default)]
    pub robots_disallow: Vec<String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "devlog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),
            post_dir: "blog".to_string(),
            tag_dir: "tags".to_string(),

            content_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),

            per_page: 6,
            date_format: "YYYY-MM-DD".to_string(),

            cache: true,

            robots_disallow: Vec::new(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
        let mut config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("invalid config {:?}", path))?;

        if config.per_page == 0 {
            tracing::warn!("per_page must be positive, using 1");
            config.per_page = 1;
        }
        if !config.extra.is_empty() {
            tracing::debug!(
                "Ignoring unknown config keys: {:?}",
                config.extra.keys().collect::<Vec<_>>()
            );
        }

        Ok(config)
    }
}
