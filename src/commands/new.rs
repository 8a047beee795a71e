//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Blog;

/// Write a post skeleton into the content directory and return its path
pub fn create_post(
    blog: &Blog,
    title: &str,
    author: Option<&str>,
    tags: &[String],
) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let extension = blog
        .config
        .extensions
        .first()
        .map(String::as_str)
        .unwrap_or("md");

    fs::create_dir_all(&blog.content_dir)?;
    let file_path = blog.content_dir.join(format!("{}.{}", slug, extension));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let author = author
        .map(str::to_string)
        .or_else(|| (!blog.config.author.is_empty()).then(|| blog.config.author.clone()));

    let front_matter = FrontMatter {
        title: Some(title.to_string()),
        date: Some(now.format("%Y-%m-%d").to_string()),
        description: Some(String::new()),
        author,
        reading_time: Some(String::new()),
        tags: tags.to_vec(),
        ..Default::default()
    };

    let yaml = serde_yaml::to_string(&front_matter)?;
    let content = format!("---\n{}---\n\n# {}\n", yaml, title);

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
