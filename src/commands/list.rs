//! List site content

use anyhow::Result;

use crate::helpers::format_date;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let catalog = blog.catalog();

    match content_type {
        "post" | "posts" => {
            let posts = catalog.list_all()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    format_date(&post.date, &blog.config.date_format),
                    post.title,
                    post.slug
                );
            }
        }
        "tag" | "tags" => {
            let tags = catalog.tag_counts()?;
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        "author" | "authors" => {
            let posts = catalog.list_all()?;
            let authors = catalog.authors()?;
            println!("Authors ({}):", authors.len());
            for author in authors {
                let count = posts.iter().filter(|p| p.author == author).count();
                println!("  {} ({})", author, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, author",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_types() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("posts")).unwrap();
        fs::write(
            dir.path().join("posts/a.md"),
            "---\ntitle: A\ndate: 2024-01-01\nauthor: Ana\ntags: [x]\n---\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        run(&blog, "post").unwrap();
        run(&blog, "tags").unwrap();
        run(&blog, "author").unwrap();
        assert!(run(&blog, "category").is_err());
    }
}
