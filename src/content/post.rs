//! Post models

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug (file stem of the source document)
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDateTime,

    /// Short summary shown in listings and search results
    pub description: String,

    /// Post author
    pub author: String,

    /// Display-only reading time, as written by the author
    pub reading_time: String,

    /// Cover image URL or path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Raw markdown/MDX body, without front matter
    pub content: String,

    /// Custom front-matter fields
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub extra: IndexMap<String, serde_yaml::Value>,

    /// Source file path
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: impl Into<String>, title: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            date,
            description: String::new(),
            author: String::new(),
            reading_time: String::new(),
            image: None,
            tags: Vec::new(),
            content: String::new(),
            extra: IndexMap::new(),
            source: PathBuf::new(),
        }
    }

    /// Whether the post carries `tag` (exact, case-sensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Get the newer neighbour in a recency-ordered list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        pos.checked_sub(1).map(|i| &posts[i])
    }

    /// Get the older neighbour in a recency-ordered list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary::from(self)
    }
}

/// The listing/search view of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub tags: Vec<String>,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            date: post.date,
            tags: post.tags.clone(),
        }
    }
}

/// A section heading found in a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id derived from the text
    pub id: String,
    /// Literal text of the heading
    pub text: String,
    /// Nesting depth, 1 to 6
    pub level: u8,
}

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}
