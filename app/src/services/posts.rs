use crate::models::post;
use crate::repositories::{CategoryRepository, PostRepository, TagRepository};
use crate::services::{PaginatedMeta, PaginatedMetaService};
use async_trait::async_trait;
use plume::FrameworkError;
use std::sync::Arc;

/// One page of posts plus the heading and paging metadata the view needs.
pub struct Listing {
    pub heading: String,
    pub posts: Vec<post::Model>,
    pub meta: PaginatedMeta,
}

#[async_trait]
pub trait PostService: Send + Sync {
    async fn listing(&self, page: u64) -> Result<Listing, FrameworkError>;
    /// `None` when no category has the given slug.
    async fn listing_by_category(
        &self,
        slug: &str,
        page: u64,
    ) -> Result<Option<Listing>, FrameworkError>;
    /// `None` when no tag has the given slug.
    async fn listing_by_tag(
        &self,
        slug: &str,
        page: u64,
    ) -> Result<Option<Listing>, FrameworkError>;
    async fn by_url(&self, url: &str) -> Result<Option<post::Model>, FrameworkError>;
}

pub struct DefaultPostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    meta: Arc<dyn PaginatedMetaService>,
    posts_per_page: u64,
}

impl DefaultPostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        meta: Arc<dyn PaginatedMetaService>,
        posts_per_page: u64,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
            meta,
            posts_per_page: posts_per_page.max(1),
        }
    }

    fn skip(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.posts_per_page
    }
}

#[async_trait]
impl PostService for DefaultPostService {
    async fn listing(&self, page: u64) -> Result<Listing, FrameworkError> {
        let total = self.posts.count_published().await?;
        let meta = self.meta.meta(total, page, self.posts_per_page);
        let posts = self
            .posts
            .published(self.skip(meta.page), self.posts_per_page)
            .await?;
        Ok(Listing {
            heading: "Latest posts".to_string(),
            posts,
            meta,
        })
    }

    async fn listing_by_category(
        &self,
        slug: &str,
        page: u64,
    ) -> Result<Option<Listing>, FrameworkError> {
        let Some(category) = self.categories.by_url(slug).await? else {
            return Ok(None);
        };
        let total = self.posts.count_by_category(category.id).await?;
        let meta = self.meta.meta(total, page, self.posts_per_page);
        let posts = self
            .posts
            .by_category(category.id, self.skip(meta.page), self.posts_per_page)
            .await?;
        Ok(Some(Listing {
            heading: category.name,
            posts,
            meta,
        }))
    }

    async fn listing_by_tag(
        &self,
        slug: &str,
        page: u64,
    ) -> Result<Option<Listing>, FrameworkError> {
        let Some(tag) = self.tags.by_url(slug).await? else {
            return Ok(None);
        };
        let total = self.posts.count_by_tag(tag.id).await?;
        let meta = self.meta.meta(total, page, self.posts_per_page);
        let posts = self
            .posts
            .by_tag(tag.id, self.skip(meta.page), self.posts_per_page)
            .await?;
        Ok(Some(Listing {
            heading: tag.name,
            posts,
            meta,
        }))
    }

    async fn by_url(&self, url: &str) -> Result<Option<post::Model>, FrameworkError> {
        self.posts.by_url(url).await
    }
}
