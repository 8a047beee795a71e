//! Content module - posts, front matter, queries and headings

mod error;
mod frontmatter;
pub mod post;
pub mod query;
pub mod repository;
pub mod toc;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use post::{Heading, Post, PostSummary, TagCount};
pub use query::Catalog;
pub use repository::{FsPostRepository, PostRepository};
pub use toc::{extract_headings, heading_id, outline, TocNode};
