//! Generate sitemap.xml, robots.txt and search.json

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Load every post and write the generated files
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let posts = blog.catalog().list_all()?;
    tracing::info!("Loaded {} posts", posts.len());

    Generator::new(&blog.config).generate(&posts, &blog.public_dir)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
