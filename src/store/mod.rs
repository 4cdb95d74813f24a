//! Content store facade
//!
//! `ContentStore` fronts a remote record store with a local JSON snapshot.
//! Reads are served from memory. Writes are applied to memory and persisted to
//! the snapshot under the write lock, then pushed to the remote store while it
//! is reachable. A failed remote call switches the store to local mode for the
//! rest of the process lifetime.

mod collection;
mod error;
mod local;
mod remote;
mod seed;

pub use collection::PostCollection;
pub use error::{Result, StoreError};
pub use local::LocalSnapshot;
pub use remote::{decode_rows, encode_row, reconcile, Record, RemoteStore, RestStore};
pub use seed::fallback_posts;

use chrono::Utc;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::content::{Category, Post, PostFields, PostPatch, SocialDraft};

/// Where the store currently reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Local,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Remote => "remote",
            Backend::Local => "local",
        }
    }
}

/// Settings for opening a store
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub default_category: Category,
    /// Per-attempt limit for remote calls
    pub timeout: Duration,
    /// Extra attempts after a failed remote call, at most one
    pub retries: u32,
}

impl StoreOptions {
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Self {
        Self {
            data_dir: base_dir.join(&config.data_dir),
            storage_key: config.storage_key.clone(),
            default_category: config.default_category,
            timeout: config.remote.timeout(),
            retries: config.remote.retries(),
        }
    }
}

/// The content store facade
pub struct ContentStore {
    posts: RwLock<PostCollection>,
    drafts: RwLock<Vec<SocialDraft>>,
    remote: Option<Arc<dyn RemoteStore>>,
    online: AtomicBool,
    post_snapshot: LocalSnapshot,
    draft_snapshot: LocalSnapshot,
    default_category: Category,
    timeout: Duration,
    retries: u32,
}

impl ContentStore {
    /// Open the store described by the site configuration
    pub async fn open(config: &SiteConfig, base_dir: &Path) -> Result<Self> {
        let options = StoreOptions::from_config(config, base_dir);

        let remote: Option<Arc<dyn RemoteStore>> = match (&config.remote.url, &config.remote.api_key)
        {
            (Some(url), Some(key)) if !url.is_empty() => {
                Some(Arc::new(RestStore::new(url, key, options.timeout)?))
            }
            (Some(_), None) => {
                tracing::warn!("remote.url is set without remote.api_key; using local data only");
                None
            }
            _ => None,
        };

        Self::open_with(options, remote).await
    }

    /// Open the store with an explicit remote backend
    pub async fn open_with(
        options: StoreOptions,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> Result<Self> {
        let post_snapshot = LocalSnapshot::new(&options.data_dir, &options.storage_key);
        let draft_snapshot = post_snapshot.sibling("drafts");

        let store = Self {
            posts: RwLock::new(PostCollection::default()),
            drafts: RwLock::new(Vec::new()),
            online: AtomicBool::new(remote.is_some()),
            remote,
            post_snapshot,
            draft_snapshot,
            default_category: options.default_category,
            timeout: options.timeout,
            retries: options.retries.min(1),
        };

        let posts = store.load_records::<Post>(&store.post_snapshot, fallback_posts).await?;
        let mut drafts = store
            .load_records::<SocialDraft>(&store.draft_snapshot, Vec::new)
            .await?;
        drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::info!(
            "Loaded {} posts and {} drafts ({} backend)",
            posts.len(),
            drafts.len(),
            store.backend().as_str()
        );

        *store.posts.write().await = PostCollection::new(posts);
        *store.drafts.write().await = drafts;
        Ok(store)
    }

    /// Current backend
    pub fn backend(&self) -> Backend {
        if self.remote.is_some() && self.online.load(Ordering::Relaxed) {
            Backend::Remote
        } else {
            Backend::Local
        }
    }

    /// All posts, newest first
    pub async fn list(&self) -> Vec<Post> {
        self.posts.read().await.posts().to_vec()
    }

    /// Published posts, newest first
    pub async fn published(&self) -> Vec<Post> {
        self.posts.read().await.published().cloned().collect()
    }

    /// Published and featured posts, newest first
    pub async fn featured(&self) -> Vec<Post> {
        self.posts.read().await.featured().cloned().collect()
    }

    pub async fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.read().await.get(id).cloned()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Option<Post> {
        self.posts.read().await.get_by_slug(slug).cloned()
    }

    /// Create a post; assigns id, date, and read time
    pub async fn create(&self, fields: PostFields) -> Result<Post> {
        let post = {
            let mut posts = self.posts.write().await;
            let post = posts.create(fields, self.default_category, Utc::now())?;
            self.post_snapshot.save(posts.posts())?;
            post
        };
        tracing::info!("Created post {} ({})", post.slug, post.id);

        self.push_upsert(&post).await;
        Ok(post)
    }

    /// Update a post; read time is always recomputed
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post> {
        let post = {
            let mut posts = self.posts.write().await;
            let post = posts.update(id, patch, Utc::now())?;
            self.post_snapshot.save(posts.posts())?;
            post
        };
        tracing::info!("Updated post {} ({})", post.slug, post.id);

        self.push_upsert(&post).await;
        Ok(post)
    }

    /// Hard-delete a post; unknown ids are `NotFound` and change nothing
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let post = {
            let mut posts = self.posts.write().await;
            let post = posts.delete(id)?;
            self.post_snapshot.save(posts.posts())?;
            post
        };
        tracing::info!("Deleted post {} ({})", post.slug, post.id);

        self.push_delete::<Post>(id).await;
        Ok(())
    }

    pub async fn set_published(&self, id: Uuid, published: bool) -> Result<Post> {
        let post = {
            let mut posts = self.posts.write().await;
            let post = posts.set_published(id, published)?;
            self.post_snapshot.save(posts.posts())?;
            post
        };
        tracing::info!("Set published={} on {}", published, post.slug);

        self.push_upsert(&post).await;
        Ok(post)
    }

    pub async fn set_featured(&self, id: Uuid, featured: bool) -> Result<Post> {
        let post = {
            let mut posts = self.posts.write().await;
            let post = posts.set_featured(id, featured)?;
            self.post_snapshot.save(posts.posts())?;
            post
        };
        tracing::info!("Set featured={} on {}", featured, post.slug);

        self.push_upsert(&post).await;
        Ok(post)
    }

    /// Check a password for a protected post
    pub async fn verify_password(&self, id: Uuid, candidate: &str) -> bool {
        self.posts.read().await.verify_password(id, candidate)
    }

    /// Saved social drafts, newest first
    pub async fn drafts(&self) -> Vec<SocialDraft> {
        self.drafts.read().await.clone()
    }

    pub async fn save_draft(&self, draft: SocialDraft) -> Result<SocialDraft> {
        if draft.content.trim().is_empty() {
            return Err(StoreError::Validation("draft content is required".to_string()));
        }

        {
            let mut drafts = self.drafts.write().await;
            drafts.retain(|d| d.id != draft.id);
            drafts.insert(0, draft.clone());
            drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            self.draft_snapshot.save(&drafts)?;
        }

        self.push_upsert(&draft).await;
        Ok(draft)
    }

    pub async fn delete_draft(&self, id: Uuid) -> Result<()> {
        {
            let mut drafts = self.drafts.write().await;
            let index = drafts
                .iter()
                .position(|d| d.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            drafts.remove(index);
            self.draft_snapshot.save(&drafts)?;
        }

        self.push_delete::<SocialDraft>(id).await;
        Ok(())
    }

    /// Load one record kind: remote first, then the snapshot, then `seed`
    ///
    /// A reachable remote is merged with the snapshot so records written
    /// while offline are kept and pushed up.
    async fn load_records<T: Record>(
        &self,
        snapshot: &LocalSnapshot,
        seed: fn() -> Vec<T>,
    ) -> Result<Vec<T>> {
        let local = snapshot.load::<T>()?;

        if let Some(remote) = self.active_remote() {
            match self.call_remote(|| remote.fetch_all(T::TABLE)).await {
                Ok(rows) => {
                    let fetched = decode_rows::<T>(rows);
                    let local = match local {
                        Some(records) => records,
                        None if fetched.is_empty() => seed(),
                        None => Vec::new(),
                    };

                    let (records, missing) = reconcile(fetched, local);
                    if !missing.is_empty() {
                        tracing::info!(
                            "Pushing {} local {} records to the remote store",
                            missing.len(),
                            T::TABLE
                        );
                    }
                    for record in &missing {
                        self.push_upsert(record).await;
                    }

                    snapshot.save(&records)?;
                    return Ok(records);
                }
                Err(e) => self.go_offline(&format!("fetching {}", T::TABLE), &e),
            }
        }

        if let Some(records) = local {
            return Ok(records);
        }

        let records = seed();
        tracing::info!(
            "No {} snapshot at {:?}, starting from {} built-in records",
            T::TABLE,
            snapshot.path(),
            records.len()
        );
        snapshot.save(&records)?;
        Ok(records)
    }

    async fn push_upsert<T: Record>(&self, record: &T) {
        let Some(remote) = self.active_remote() else {
            return;
        };
        let row = match encode_row(record) {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Could not encode {} row: {}", T::TABLE, e);
                return;
            }
        };
        match self
            .call_remote(|| remote.upsert(T::TABLE, row.clone()))
            .await
        {
            Ok(()) => tracing::debug!("Pushed {} {}", T::TABLE, record.record_id()),
            Err(e) => self.go_offline(&format!("writing {}", T::TABLE), &e),
        }
    }

    async fn push_delete<T: Record>(&self, id: Uuid) {
        let Some(remote) = self.active_remote() else {
            return;
        };
        if let Err(e) = self.call_remote(|| remote.delete(T::TABLE, id)).await {
            self.go_offline(&format!("deleting from {}", T::TABLE), &e);
        }
    }

    fn active_remote(&self) -> Option<Arc<dyn RemoteStore>> {
        match self.backend() {
            Backend::Remote => self.remote.clone(),
            Backend::Local => None,
        }
    }

    /// Run a remote call with a per-attempt timeout and bounded retries
    async fn call_remote<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = 1 + self.retries;
        let mut last_error = StoreError::Timeout(self.timeout);

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if !e.is_remote() => return Err(e),
                Ok(Err(e)) => last_error = e,
                Err(_) => last_error = StoreError::Timeout(self.timeout),
            }
            tracing::debug!(
                "Remote attempt {}/{} failed: {}",
                attempt,
                attempts,
                last_error
            );
        }

        Err(last_error)
    }

    fn go_offline(&self, what: &str, err: &StoreError) {
        if self.online.swap(false, Ordering::Relaxed) {
            tracing::warn!(
                "Remote store failed while {}: {}; continuing with local data",
                what,
                err
            );
        }
    }
}
