//! Retrieval operations over the post listing
//!
//! Every query starts from [`PostRepository::list_all`] and keeps its
//! newest-first order. The slice-level functions are exposed for callers
//! that already hold a listing.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::{ContentError, Post, PostRepository, TagCount};

/// Posts carrying `tag` (exact, case-sensitive)
pub fn filter_by_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.has_tag(tag)).collect()
}

/// Posts written by `author` (exact match)
pub fn filter_by_author<'a>(posts: &'a [Post], author: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.author == author).collect()
}

/// Case-insensitive substring search over title and description.
///
/// A missing, empty or blank query matches nothing. Otherwise the query is
/// matched as written, surrounding whitespace included.
pub fn search<'a>(posts: &'a [Post], query: Option<&str>) -> Vec<&'a Post> {
    let needle = match query {
        Some(q) if !q.trim().is_empty() => q.to_lowercase(),
        _ => return Vec::new(),
    };

    posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Union of every post's tags
pub fn collect_tags(posts: &[Post]) -> BTreeSet<String> {
    posts.iter().flat_map(|p| p.tags.iter().cloned()).collect()
}

/// Number of posts per tag, most used first
pub fn count_tags(posts: &[Post]) -> Vec<TagCount> {
    let mut tags: HashMap<&str, usize> = HashMap::new();

    for post in posts {
        // A tag listed twice on one post still counts once
        let unique: HashSet<&str> = post.tags.iter().map(String::as_str).collect();
        for tag in unique {
            *tags.entry(tag).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<TagCount> = tags
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

/// Query facade over a post repository
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    repository: R,
}

impl<R: PostRepository> Catalog<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Every post, newest first
    pub fn list_all(&self) -> Result<Vec<Post>, ContentError> {
        self.repository.list_all()
    }

    /// The post with `slug`, or `None` when there is no such post
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        self.repository.get_by_slug(slug)
    }

    pub fn by_tag(&self, tag: &str) -> Result<Vec<Post>, ContentError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.has_tag(tag))
            .collect())
    }

    pub fn by_author(&self, author: &str) -> Result<Vec<Post>, ContentError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.author == author)
            .collect())
    }

    pub fn by_search(&self, query: Option<&str>) -> Result<Vec<Post>, ContentError> {
        if query.map_or(true, |q| q.trim().is_empty()) {
            return Ok(Vec::new());
        }

        let posts = self.list_all()?;
        Ok(search(&posts, query).into_iter().cloned().collect())
    }

    pub fn distinct_tags(&self) -> Result<BTreeSet<String>, ContentError> {
        Ok(collect_tags(&self.list_all()?))
    }

    pub fn tag_counts(&self) -> Result<Vec<TagCount>, ContentError> {
        Ok(count_tags(&self.list_all()?))
    }

    /// Distinct non-empty authors, sorted
    pub fn authors(&self) -> Result<BTreeSet<String>, ContentError> {
        Ok(self
            .list_all()?
            .into_iter()
            .map(|p| p.author)
            .filter(|a| !a.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::fixtures::post;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory repository that counts listings
    struct MemoryRepository {
        posts: Vec<Post>,
        reads: AtomicUsize,
    }

    impl MemoryRepository {
        fn new(posts: Vec<Post>) -> Self {
            Self {
                posts,
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl PostRepository for MemoryRepository {
        fn list_all(&self) -> Result<Vec<Post>, ContentError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.posts.clone())
        }

        fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
            Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
        }
    }

    fn catalog() -> Catalog<MemoryRepository> {
        let mut newest = post("tokio-tips", 20, &["rust", "async"]);
        newest.title = "Tokio Tips".to_string();
        newest.description = "Practical notes on the async runtime".to_string();
        newest.author = "Ana".to_string();

        let mut middle = post("css-grid", 10, &["css", "web", "css"]);
        middle.title = "CSS Grid in Practice".to_string();
        middle.description = "Layouts without floats".to_string();
        middle.author = "Bo".to_string();

        let mut oldest = post("n-plus-one", 2, &["rust", "db"]);
        oldest.title = "The N+1 Problem".to_string();
        oldest.description = "Why your ORM is slow, and ASYNC won't save it".to_string();
        oldest.author = "Ana".to_string();

        Catalog::new(MemoryRepository::new(vec![newest, middle, oldest]))
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_by_tag_keeps_recency_order() {
        let catalog = catalog();
        let posts = catalog.by_tag("rust").unwrap();
        assert_eq!(slugs(&posts), vec!["tokio-tips", "n-plus-one"]);
        assert!(catalog.by_tag("Rust").unwrap().is_empty());
        assert!(catalog.by_tag("missing").unwrap().is_empty());
    }

    #[test]
    fn test_by_tag_is_exact_subset() {
        let catalog = catalog();
        let all = catalog.list_all().unwrap();
        for tag in catalog.distinct_tags().unwrap() {
            let expected: Vec<_> = all.iter().filter(|p| p.tags.contains(&tag)).collect();
            let actual = catalog.by_tag(&tag).unwrap();
            assert_eq!(actual.iter().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_by_author() {
        let catalog = catalog();
        assert_eq!(
            slugs(&catalog.by_author("Ana").unwrap()),
            vec!["tokio-tips", "n-plus-one"]
        );
        assert!(catalog.by_author("ana").unwrap().is_empty());
    }

    #[test]
    fn test_empty_search_returns_nothing() {
        let catalog = catalog();
        assert!(catalog.by_search(None).unwrap().is_empty());
        assert!(catalog.by_search(Some("")).unwrap().is_empty());
        assert!(catalog.by_search(Some("   ")).unwrap().is_empty());
        // The empty query never touches the repository
        assert_eq!(catalog.repository().reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_search_matches_title_or_description() {
        let catalog = catalog();
        assert_eq!(
            slugs(&catalog.by_search(Some("ASYNC")).unwrap()),
            vec!["tokio-tips", "n-plus-one"]
        );
        assert_eq!(
            slugs(&catalog.by_search(Some("grid")).unwrap()),
            vec!["css-grid"]
        );
        assert_eq!(
            slugs(&catalog.by_search(Some("n+1")).unwrap()),
            vec!["n-plus-one"]
        );
        assert!(catalog.by_search(Some("kubernetes")).unwrap().is_empty());
    }

    #[test]
    fn test_search_keeps_surrounding_whitespace() {
        let catalog = catalog();
        assert!(catalog.by_search(Some("tips ")).unwrap().is_empty());
        assert_eq!(
            slugs(&catalog.by_search(Some(" grid")).unwrap()),
            vec!["css-grid"]
        );

        let posts = catalog.list_all().unwrap();
        assert!(search(&posts, Some("tips ")).is_empty());
        assert_eq!(search(&posts, Some("Tokio ")).len(), 1);
    }

    #[test]
    fn test_search_title_round_trip() {
        let catalog = catalog();
        for post in catalog.list_all().unwrap() {
            let found = catalog.by_search(Some(&post.title.to_lowercase())).unwrap();
            assert!(found.iter().any(|p| p.slug == post.slug));
        }
    }

    #[test]
    fn test_distinct_tags_is_union() {
        let catalog = catalog();
        let tags: Vec<_> = catalog.distinct_tags().unwrap().into_iter().collect();
        assert_eq!(tags, vec!["async", "css", "db", "rust", "web"]);
    }

    #[test]
    fn test_tag_counts_dedupe_per_post() {
        let counts = catalog().tag_counts().unwrap();
        assert_eq!(
            counts[0],
            TagCount {
                name: "rust".to_string(),
                count: 2
            }
        );
        let css = counts.iter().find(|t| t.name == "css").unwrap();
        assert_eq!(css.count, 1);
    }

    #[test]
    fn test_authors() {
        let authors: Vec<_> = catalog().authors().unwrap().into_iter().collect();
        assert_eq!(authors, vec!["Ana", "Bo"]);
    }

    #[test]
    fn test_slice_functions_borrow() {
        let posts = catalog().list_all().unwrap();
        assert_eq!(filter_by_tag(&posts, "web").len(), 1);
        assert_eq!(filter_by_author(&posts, "Bo")[0].slug, "css-grid");
        assert_eq!(search(&posts, Some("layouts"))[0].slug, "css-grid");
        assert!(search(&posts, None).is_empty());
    }

    #[test]
    fn test_get_by_slug_not_found() {
        let catalog = catalog();
        assert!(catalog.get_by_slug("css-grid").unwrap().is_some());
        assert!(catalog.get_by_slug("nope").unwrap().is_none());
    }
}
