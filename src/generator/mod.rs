//! Generator - writes sitemap.xml, robots.txt and search.json

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::{query, Post, PostSummary};
use crate::helpers::{full_url_for, post_path, sitemap_date, tag_path};

/// Writes the crawler and search files for a site
pub struct Generator<'a> {
    config: &'a SiteConfig,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Generate every file into `public_dir`
    pub fn generate(&self, posts: &[Post], public_dir: &Path) -> Result<()> {
        fs::create_dir_all(public_dir)?;

        self.write(public_dir, "sitemap.xml", &self.sitemap(posts))?;
        self.write(public_dir, "robots.txt", &self.robots())?;
        self.write(public_dir, "search.json", &self.search_index(posts)?)?;

        Ok(())
    }

    fn write(&self, public_dir: &Path, name: &str, content: &str) -> Result<()> {
        let output_path = public_dir.join(name);
        fs::write(&output_path, content)?;
        tracing::info!("Generated {}", name);
        Ok(())
    }

    /// Sitemap covering the home page, every post and every tag page
    pub fn sitemap(&self, posts: &[Post]) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        // Home page changes whenever the newest post does
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&full_url_for(self.config, "/"))
        ));
        if let Some(newest) = posts.first() {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                sitemap_date(&newest.date)
            ));
        }
        xml.push_str("  </url>\n");

        for post in posts {
            let loc = full_url_for(self.config, &post_path(self.config, &post.slug));
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                sitemap_date(&post.date)
            ));
            xml.push_str("  </url>\n");
        }

        for tag in query::collect_tags(posts) {
            let loc = full_url_for(self.config, &tag_path(self.config, &tag));
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// robots.txt allowing everything except the configured paths
    pub fn robots(&self) -> String {
        let mut robots = String::from("User-agent: *\n");
        if self.config.robots_disallow.is_empty() {
            robots.push_str("Allow: /\n");
        }
        for path in &self.config.robots_disallow {
            robots.push_str(&format!("Disallow: {}\n", path));
        }
        robots.push_str(&format!(
            "\nSitemap: {}\n",
            full_url_for(self.config, "/sitemap.xml")
        ));
        robots
    }

    /// Search index (JSON) of post summaries
    pub fn search_index(&self, posts: &[Post]) -> Result<String> {
        let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
        Ok(serde_json::to_string_pretty(&summaries)?)
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
