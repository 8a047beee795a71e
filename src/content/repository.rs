//! Post repository - loads posts from the content directory

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use super::{ContentError, FrontMatter, Post};

/// Extensions recognised as posts when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// A source of posts.
///
/// `Ok(None)` from [`get_by_slug`](PostRepository::get_by_slug) is the
/// not-found signal; `Err` is reserved for I/O failures.
pub trait PostRepository: Send + Sync {
    /// Every readable post, newest first
    fn list_all(&self) -> Result<Vec<Post>, ContentError>;

    /// The post stored under `slug`, if there is a valid one
    fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError>;

    /// A fingerprint that changes whenever the listing would change.
    /// `None` means the source cannot tell, so results must not be cached.
    fn revision(&self) -> Result<Option<u64>, ContentError> {
        Ok(None)
    }
}

/// Reads posts from a flat directory of markdown/MDX files
#[derive(Debug, Clone)]
pub struct FsPostRepository {
    content_dir: PathBuf,
    extensions: Vec<String>,
    default_author: Option<String>,
}

impl FsPostRepository {
    /// Create a repository over `content_dir`
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            default_author: None,
        }
    }

    /// Replace the recognised file extensions (without the leading dot)
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Author used for posts whose front matter has none
    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        self.default_author = (!author.is_empty()).then_some(author);
        self
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Paths of every post document, in lexical order
    fn document_paths(&self) -> Result<Vec<PathBuf>, ContentError> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Failing on the root means the directory itself is unusable
                Err(e) if e.depth() == 0 => {
                    return Err(ContentError::Walk {
                        path: self.content_dir.clone(),
                        source: e,
                    })
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.content_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && self.is_post_file(path) {
                paths.push(path.to_path_buf());
            }
        }

        Ok(paths)
    }

    fn is_post_file(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.') || n.starts_with('_'))
            .unwrap_or(true);

        !hidden
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.extensions.iter().any(|x| x == e))
                .unwrap_or(false)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let raw = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let (fm, body) = FrontMatter::parse(&raw).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

        let slug = slug_from_path(path).ok_or_else(|| ContentError::MissingField {
            field: "slug",
            path: path.to_path_buf(),
        })?;

        let title = fm.title.clone().ok_or_else(|| ContentError::MissingField {
            field: "title",
            path: path.to_path_buf(),
        })?;
        let raw_date = fm.date.as_deref().ok_or_else(|| ContentError::MissingField {
            field: "date",
            path: path.to_path_buf(),
        })?;
        let date = fm.parse_date().ok_or_else(|| ContentError::InvalidDate {
            value: raw_date.to_string(),
            path: path.to_path_buf(),
        })?;

        let author = match (fm.author, &self.default_author) {
            (Some(author), _) => author,
            (None, Some(default)) => {
                tracing::debug!("{:?} has no author, using {}", path, default);
                default.clone()
            }
            (None, None) => {
                tracing::warn!("{:?} has no author", path);
                String::new()
            }
        };
        let description = fm.description.unwrap_or_else(|| {
            tracing::warn!("{:?} has no description", path);
            String::new()
        });
        let reading_time = fm.reading_time.unwrap_or_else(|| {
            tracing::debug!("{:?} has no readingTime", path);
            String::new()
        });

        if !fm.extra.is_empty() {
            tracing::debug!(
                "{:?} has unrecognised front-matter keys: {:?}",
                path,
                fm.extra.keys().collect::<Vec<_>>()
            );
        }

        let mut post = Post::new(slug, title, date);
        post.description = description;
        post.author = author;
        post.reading_time = reading_time;
        post.image = fm.image;
        post.tags = fm.tags;
        post.content = body.to_string();
        post.extra = fm.extra;
        post.source = path.to_path_buf();

        Ok(post)
    }
}

impl PostRepository for FsPostRepository {
    fn list_all(&self) -> Result<Vec<Post>, ContentError> {
        let mut posts: Vec<Post> = Vec::new();
        let mut seen = HashSet::new();

        for path in self.document_paths()? {
            match self.load_post(&path) {
                Ok(post) => {
                    if seen.insert(post.slug.clone()) {
                        posts.push(post);
                    } else {
                        tracing::warn!("Skipping {:?}: slug '{}' already taken", path, post.slug);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.content_dir);
        Ok(posts)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        // Same precedence as the listing: first file name in lexical order
        let mut names: Vec<String> = self
            .extensions
            .iter()
            .map(|ext| format!("{}.{}", slug, ext))
            .collect();
        names.sort();
        names.dedup();

        for name in names {
            let path = self.content_dir.join(name);
            if !path.is_file() {
                continue;
            }
            match self.load_post(&path) {
                Ok(post) => return Ok(Some(post)),
                Err(ContentError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    continue
                }
                Err(e) if e.is_malformed() => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    fn revision(&self) -> Result<Option<u64>, ContentError> {
        let mut hasher = DefaultHasher::new();

        let dir_meta =
            fs::metadata(&self.content_dir).map_err(|e| ContentError::io(&self.content_dir, e))?;
        mtime_nanos(&dir_meta).hash(&mut hasher);

        for path in self.document_paths()? {
            // A file that vanished since the scan still changes the hash
            let meta = fs::metadata(&path).ok();
            path.hash(&mut hasher);
            meta.as_ref().map(|m| m.len()).hash(&mut hasher);
            meta.as_ref().map(mtime_nanos).hash(&mut hasher);
        }

        Ok(Some(hasher.finish()))
    }
}

/// Modification time with sub-second precision, as nanoseconds since the epoch
fn mtime_nanos(meta: &fs::Metadata) -> u128 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

/// The slug of a post is its file stem
fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A slug must name a file directly inside the content directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.starts_with(['.', '_'])
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, title: &str, date: &str, tags: &str) {
        let content = format!(
            "---\ntitle: {}\ndate: {}\ndescription: About {}\nauthor: Ana\nreadingTime: 4 min\ntags: {}\n---\n\n# {}\n\nBody of {}.\n",
            title, date, title, tags, title, title
        );
        fs::write(dir.join(name), content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "first.md", "First", "2023-05-01", "[rust]");
        write_post(dir.path(), "second.mdx", "Second", "2024-02-10", "[rust, web]");
        write_post(dir.path(), "third.md", "Third", "2023-11-20", "[]");
        dir
    }

    #[test]
    fn test_list_all_sorted_newest_first() {
        let dir = fixture();
        let repo = FsPostRepository::new(dir.path());
        let posts = repo.list_all().unwrap();

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "third", "first"]);
        for pair in posts.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn test_post_fields() {
        let dir = fixture();
        let repo = FsPostRepository::new(dir.path());
        let post = repo.get_by_slug("second").unwrap().unwrap();

        assert_eq!(post.title, "Second");
        assert_eq!(post.description, "About Second");
        assert_eq!(post.author, "Ana");
        assert_eq!(post.reading_time, "4 min");
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert_eq!(post.date.format("%Y-%m-%d").to_string(), "2024-02-10");
        assert!(post.content.starts_with("# Second"));
        assert!(!post.content.contains("readingTime"));
        assert_eq!(post.source, dir.path().join("second.mdx"));
    }

    #[test]
    fn test_get_by_slug_missing_is_none() {
        let dir = fixture();
        let repo = FsPostRepository::new(dir.path());
        assert!(repo.get_by_slug("nope").unwrap().is_none());
        assert!(repo.get_by_slug("").unwrap().is_none());
        assert!(repo.get_by_slug("../first").unwrap().is_none());
        assert!(repo.get_by_slug("..").unwrap().is_none());
    }

    #[test]
    fn test_malformed_document_is_skipped() {
        let dir = fixture();
        fs::write(dir.path().join("broken.md"), "---\ntitle: [oops\n---\nbody").unwrap();
        fs::write(dir.path().join("undated.md"), "---\ntitle: No date\n---\nbody").unwrap();
        fs::write(
            dir.path().join("baddate.md"),
            "---\ntitle: Bad\ndate: someday\n---\nbody",
        )
        .unwrap();

        let repo = FsPostRepository::new(dir.path());
        let posts = repo.list_all().unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.slug != "broken"));

        assert!(repo.get_by_slug("broken").unwrap().is_none());
        assert!(repo.get_by_slug("undated").unwrap().is_none());
        assert!(repo.get_by_slug("baddate").unwrap().is_none());
    }

    #[test]
    fn test_ignores_other_files_and_subdirectories() {
        let dir = fixture();
        fs::write(dir.path().join("notes.txt"), "not a post").unwrap();
        fs::write(dir.path().join("_draft.md"), "---\ntitle: D\ndate: 2024-01-01\n---\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_post(&dir.path().join("nested"), "deep.md", "Deep", "2025-01-01", "[]");

        let repo = FsPostRepository::new(dir.path());
        assert_eq!(repo.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_slug_keeps_first_path() {
        let dir = fixture();
        write_post(dir.path(), "first.mdx", "Impostor", "2025-01-01", "[]");

        let repo = FsPostRepository::new(dir.path());
        let posts = repo.list_all().unwrap();
        assert_eq!(posts.len(), 3);
        let first = posts.iter().find(|p| p.slug == "first").unwrap();
        assert_eq!(first.title, "First");
        assert_eq!(repo.get_by_slug("first").unwrap().unwrap().title, "First");
    }

    #[test]
    fn test_shared_stem_resolves_like_listing() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "a.md", "From md", "2024-01-01", "[]");
        write_post(dir.path(), "a.markdown", "From markdown", "2024-01-01", "[]");

        let repo = FsPostRepository::new(dir.path());
        let listed = repo.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "From markdown");
        assert_eq!(repo.get_by_slug("a").unwrap().unwrap().title, "From markdown");

        let cached = crate::cache::CachedRepository::new(repo.clone());
        assert_eq!(cached.get_by_slug("a").unwrap().unwrap().title, "From markdown");
    }

    #[test]
    fn test_shared_stem_skips_malformed_first_candidate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.markdown"), "---\ntitle: [oops\n---\n").unwrap();
        write_post(dir.path(), "a.md", "From md", "2024-01-01", "[]");

        let repo = FsPostRepository::new(dir.path());
        assert_eq!(repo.list_all().unwrap()[0].title, "From md");
        assert_eq!(repo.get_by_slug("a").unwrap().unwrap().title, "From md");
    }

    #[test]
    fn test_directory_named_like_post_is_not_found() {
        let dir = fixture();
        fs::create_dir(dir.path().join("folder.md")).unwrap();

        let repo = FsPostRepository::new(dir.path());
        assert_eq!(repo.list_all().unwrap().len(), 3);
        assert!(repo.get_by_slug("folder").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let repo = FsPostRepository::new(dir.path().join("missing"));
        let err = repo.list_all().unwrap_err();
        assert!(!err.is_malformed());
        assert!(repo.get_by_slug("anything").unwrap().is_none());
    }

    #[test]
    fn test_default_author_and_optional_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("bare.md"),
            "---\ntitle: Bare\ndate: 2024-03-03\nimage: /img/cover.png\n---\nText",
        )
        .unwrap();

        let repo = FsPostRepository::new(dir.path()).with_default_author("Site Owner");
        let post = repo.get_by_slug("bare").unwrap().unwrap();
        assert_eq!(post.author, "Site Owner");
        assert_eq!(post.description, "");
        assert_eq!(post.reading_time, "");
        assert!(post.tags.is_empty());
        assert_eq!(post.image.as_deref(), Some("/img/cover.png"));
    }

    #[test]
    fn test_custom_extensions() {
        let dir = fixture();
        let repo = FsPostRepository::new(dir.path()).with_extensions([".mdx"]);
        let slugs: Vec<_> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["second"]);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let dir = fixture();
        let repo = FsPostRepository::new(dir.path());
        let before = repo.revision().unwrap();
        assert!(before.is_some());
        assert_eq!(before, repo.revision().unwrap());

        write_post(dir.path(), "fourth.md", "Fourth", "2024-06-01", "[]");
        assert_ne!(before, repo.revision().unwrap());
    }
}
