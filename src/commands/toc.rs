//! Print the table of contents of a post

use anyhow::Result;

use crate::content::{extract_headings, outline, TocNode};
use crate::Blog;

/// Print the heading outline of the post stored under `slug`
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let Some(post) = blog.catalog().get_by_slug(slug)? else {
        anyhow::bail!("No post with slug '{}'", slug);
    };

    let headings = extract_headings(&post.content);
    println!("{} ({} headings)", post.title, headings.len());
    print_nodes(&outline(&headings), 1);

    Ok(())
}

fn print_nodes(nodes: &[TocNode], depth: usize) {
    for node in nodes {
        println!(
            "{}- {} (#{})",
            "  ".repeat(depth),
            node.heading.text,
            node.heading.id
        );
        print_nodes(&node.children, depth + 1);
    }
}
