//! In-memory post collection
//!
//! `PostCollection` is the explicit state behind the store. Every method is
//! synchronous and side-effect free apart from mutating `self`; persistence
//! is the caller's job.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{Result, StoreError};
use crate::content::{Category, Post, PostFields, PostPatch, Visibility};

/// Posts ordered newest first
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    /// Build a collection, sorting by date descending
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Posts visible on public listings
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.published)
    }

    /// Published posts marked as featured
    pub fn featured(&self) -> impl Iterator<Item = &Post> {
        self.published().filter(|p| p.featured)
    }

    pub fn get(&self, id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Validate `fields` and insert a new post at the front
    pub fn create(
        &mut self,
        fields: PostFields,
        default_category: Category,
        now: DateTime<Utc>,
    ) -> Result<Post> {
        require_text("title", &fields.title)?;
        require_text("content", &fields.content)?;

        let slug = match fields.slug.as_deref().map(str::trim) {
            Some(requested) if !requested.is_empty() => {
                let slug = normalize_slug(requested)?;
                if self.get_by_slug(&slug).is_some() {
                    return Err(StoreError::DuplicateSlug(slug));
                }
                slug
            }
            _ => self.unique_slug(&fields.title),
        };

        let mut post = Post {
            id: Uuid::new_v4(),
            slug,
            title: fields.title.trim().to_string(),
            excerpt: fields.excerpt.unwrap_or_default().trim().to_string(),
            content: fields.content,
            category: fields.category.unwrap_or(default_category),
            published: fields.published,
            featured: fields.featured,
            visibility: fields.visibility,
            password: fields.password.filter(|p| !p.is_empty()),
            date: now,
            updated: None,
            read_time: String::new(),
        };
        check_visibility(&post)?;
        post.refresh_derived();

        self.posts.insert(0, post.clone());
        Ok(post)
    }

    /// Apply `patch` to the post with `id`
    ///
    /// Derived fields are recomputed even when `content` is unchanged.
    pub fn update(&mut self, id: Uuid, patch: PostPatch, now: DateTime<Utc>) -> Result<Post> {
        let index = self.index_of(id)?;
        let mut post = self.posts[index].clone();

        if let Some(title) = patch.title {
            require_text("title", &title)?;
            post.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            require_text("content", &content)?;
            post.content = content;
        }
        if let Some(requested) = patch.slug {
            let slug = normalize_slug(&requested)?;
            if self.posts.iter().any(|p| p.slug == slug && p.id != id) {
                return Err(StoreError::DuplicateSlug(slug));
            }
            post.slug = slug;
        }
        if let Some(excerpt) = patch.excerpt {
            post.excerpt = excerpt.trim().to_string();
        }
        if let Some(category) = patch.category {
            post.category = category;
        }
        if let Some(published) = patch.published {
            post.published = published;
        }
        if let Some(featured) = patch.featured {
            post.featured = featured;
        }
        if let Some(password) = patch.password {
            post.password = Some(password).filter(|p| !p.is_empty());
        }
        if let Some(visibility) = patch.visibility {
            post.visibility = visibility;
            if visibility == Visibility::Public {
                post.password = None;
            }
        }
        check_visibility(&post)?;

        post.updated = Some(now);
        post.refresh_derived();

        self.posts[index] = post.clone();
        Ok(post)
    }

    /// Remove a post; unknown ids leave the collection untouched
    pub fn delete(&mut self, id: Uuid) -> Result<Post> {
        let index = self.index_of(id)?;
        Ok(self.posts.remove(index))
    }

    pub fn set_published(&mut self, id: Uuid, published: bool) -> Result<Post> {
        let index = self.index_of(id)?;
        self.posts[index].published = published;
        Ok(self.posts[index].clone())
    }

    pub fn set_featured(&mut self, id: Uuid, featured: bool) -> Result<Post> {
        let index = self.index_of(id)?;
        self.posts[index].featured = featured;
        Ok(self.posts[index].clone())
    }

    /// Check a reader-supplied password; public posts always pass
    pub fn verify_password(&self, id: Uuid, candidate: &str) -> bool {
        match self.get(id) {
            Some(post) if post.is_locked() => post.password.as_deref() == Some(candidate),
            Some(_) => true,
            None => false,
        }
    }

    fn index_of(&self, id: Uuid) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Slug derived from `title`, suffixed until no other post uses it
    fn unique_slug(&self, title: &str) -> String {
        let mut base = slug::slugify(title);
        if base.is_empty() {
            base = "post".to_string();
        }

        let taken = |candidate: &str| self.posts.iter().any(|p| p.slug == candidate);

        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn normalize_slug(requested: &str) -> Result<String> {
    let slug = slug::slugify(requested);
    if slug.is_empty() {
        return Err(StoreError::Validation(format!(
            "slug {:?} has no URL-safe characters",
            requested
        )));
    }
    Ok(slug)
}

fn check_visibility(post: &Post) -> Result<()> {
    if post.visibility == Visibility::Password && post.password.is_none() {
        return Err(StoreError::Validation(
            "password-protected posts need a password".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn fields(title: &str, content: &str) -> PostFields {
        PostFields {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    #[test]
    fn test_create_assigns_derived_fields() {
        let mut posts = PostCollection::default();
        let post = posts
            .create(fields("Hello World", &words(400)), Category::Lifestyle, now())
            .unwrap();

        assert_eq!(post.read_time, "2 min");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.date, now());
        assert_eq!(post.category, Category::Lifestyle);
        assert!(!post.excerpt.is_empty());
        assert_eq!(posts.get(post.id), Some(&post));
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let mut posts = PostCollection::default();
        let err = posts
            .create(fields("  ", "body"), Category::Career, now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = posts
            .create(fields("Title", ""), Category::Career, now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(posts.is_empty());
    }

    #[test]
    fn test_password_visibility_needs_secret() {
        let mut posts = PostCollection::default();
        let mut f = fields("Secret", "body");
        f.visibility = Visibility::Password;
        assert!(posts.create(f.clone(), Category::Career, now()).is_err());

        f.password = Some("hunter2".to_string());
        let post = posts.create(f, Category::Career, now()).unwrap();
        assert!(posts.verify_password(post.id, "hunter2"));
        assert!(!posts.verify_password(post.id, "guess"));
        assert!(!posts.verify_password(Uuid::new_v4(), "hunter2"));
    }

    #[test]
    fn test_public_post_passes_password_check() {
        let mut posts = PostCollection::default();
        let post = posts
            .create(fields("Open", "body"), Category::Career, now())
            .unwrap();
        assert!(posts.verify_password(post.id, ""));
    }

    #[test]
    fn test_derived_slugs_are_unique() {
        let mut posts = PostCollection::default();
        let a = posts.create(fields("Same", "a"), Category::Travel, now()).unwrap();
        let b = posts.create(fields("Same", "b"), Category::Travel, now()).unwrap();
        let c = posts.create(fields("Same", "c"), Category::Travel, now()).unwrap();
        assert_eq!(a.slug, "same");
        assert_eq!(b.slug, "same-2");
        assert_eq!(c.slug, "same-3");
    }

    #[test]
    fn test_explicit_duplicate_slug_rejected() {
        let mut posts = PostCollection::default();
        posts.create(fields("One", "a"), Category::Travel, now()).unwrap();
        let mut f = fields("Two", "b");
        f.slug = Some("one".to_string());
        let err = posts.create(f, Category::Travel, now()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(slug) if slug == "one"));
    }

    #[test]
    fn test_update_recomputes_read_time() {
        let mut posts = PostCollection::default();
        let post = posts
            .create(fields("Post", &words(10)), Category::Career, now())
            .unwrap();

        let patch = PostPatch {
            content: Some(words(450)),
            ..Default::default()
        };
        let updated = posts.update(post.id, patch, now()).unwrap();
        assert_eq!(updated.read_time, "3 min");
        assert_eq!(updated.date, post.date);
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.updated, Some(now()));

        // Unchanged content still yields the same recomputed value.
        posts.posts[0].read_time = "99 min".to_string();
        let again = posts
            .update(post.id, PostPatch::default(), now())
            .unwrap();
        assert_eq!(again.read_time, "3 min");
    }

    #[test]
    fn test_update_validates_before_writing() {
        let mut posts = PostCollection::default();
        let post = posts
            .create(fields("Post", "body"), Category::Career, now())
            .unwrap();
        let patch = PostPatch {
            title: Some("New title".to_string()),
            content: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(posts.update(post.id, patch, now()).is_err());
        assert_eq!(posts.get(post.id).unwrap().title, "Post");
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut posts = PostCollection::default();
        let post = posts
            .create(fields("Post", "body"), Category::Career, now())
            .unwrap();

        posts.set_featured(post.id, true).unwrap();
        assert_eq!(posts.featured().count(), 0, "unpublished posts are never featured");
        assert_eq!(posts.published().count(), 0);

        let toggled = posts.set_published(post.id, true).unwrap();
        assert!(toggled.featured);
        assert_eq!(posts.featured().count(), 1);

        posts.set_featured(post.id, false).unwrap();
        assert!(posts.get(post.id).unwrap().published);
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let mut posts = PostCollection::default();
        posts.create(fields("Keep", "body"), Category::Career, now()).unwrap();
        let err = posts.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_newest_first() {
        let mut posts = PostCollection::default();
        let old = posts
            .create(fields("Old", "a"), Category::Career, now())
            .unwrap();
        let new = posts
            .create(
                fields("New", "b"),
                Category::Career,
                now() + chrono::Duration::days(1),
            )
            .unwrap();
        assert_eq!(posts.posts()[0].id, new.id);
        assert_eq!(posts.posts()[1].id, old.id);

        let reloaded = PostCollection::new(vec![old.clone(), new.clone()]);
        assert_eq!(reloaded.posts()[0].id, new.id);
        assert_eq!(reloaded.get_by_slug("old").map(|p| p.id), Some(old.id));
    }
}
