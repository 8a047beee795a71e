//! Search posts from the command line

use anyhow::Result;

use crate::helpers::format_date;
use crate::Blog;

/// Print posts whose title or description contains `query`
pub fn run(blog: &Blog, query: &str) -> Result<()> {
    let results = blog.catalog().by_search(Some(query))?;

    if results.is_empty() {
        println!("No posts match {:?}", query);
        return Ok(());
    }

    println!("Results ({}):", results.len());
    for post in results {
        println!(
            "  {} - {} [{}]",
            format_date(&post.date, &blog.config.date_format),
            post.title,
            post.slug
        );
        if !post.description.is_empty() {
            println!("      {}", post.description);
        }
    }

    Ok(())
}
