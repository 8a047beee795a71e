//! Read-through cache for post listings
//!
//! The cache keeps the last listing of the wrapped repository together with
//! the repository's revision fingerprint. Every read recomputes the
//! fingerprint (a metadata scan, no file contents) and reloads only when it
//! changed, so edits to the content directory are picked up without a
//! restart.

use std::sync::{Arc, PoisonError, RwLock};

use crate::content::{ContentError, Post, PostRepository};

/// A listing and the revision it was read at
#[derive(Debug)]
struct Snapshot {
    revision: u64,
    posts: Arc<Vec<Post>>,
}

/// Caches the listing of another repository until its revision changes
#[derive(Debug)]
pub struct CachedRepository<R> {
    inner: R,
    enabled: bool,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<R: PostRepository> CachedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            enabled: true,
            snapshot: RwLock::new(None),
        }
    }

    /// A disabled cache passes every read through to the inner repository
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop the cached listing so the next read reloads
    pub fn invalidate(&self) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The current listing, reloaded if the source changed
    fn posts(&self) -> Result<Arc<Vec<Post>>, ContentError> {
        if !self.enabled {
            return Ok(Arc::new(self.inner.list_all()?));
        }
        let Some(revision) = self.inner.revision()? else {
            return Ok(Arc::new(self.inner.list_all()?));
        };

        {
            let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.revision == revision {
                    return Ok(Arc::clone(&snapshot.posts));
                }
            }
        }

        // A change racing this reload is stored under the older revision and
        // therefore replaced on the next read
        let posts = Arc::new(self.inner.list_all()?);
        tracing::debug!("Reloaded {} posts (revision {:x})", posts.len(), revision);

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Snapshot {
            revision,
            posts: Arc::clone(&posts),
        });

        Ok(posts)
    }
}

impl<R: PostRepository> PostRepository for CachedRepository<R> {
    fn list_all(&self) -> Result<Vec<Post>, ContentError> {
        Ok(self.posts()?.as_ref().clone())
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !self.enabled {
            return self.inner.get_by_slug(slug);
        }
        Ok(self.posts()?.iter().find(|p| p.slug == slug).cloned())
    }

    fn revision(&self) -> Result<Option<u64>, ContentError> {
        self.inner.revision()
    }
}
