//! Data access contracts and their sea-orm implementations. Every
//! repository is registered transiently and owns a request-scoped
//! database handle.

use crate::models::{category, post, post_tag, tag};
use async_trait::async_trait;
use plume::database::DbScope;
use plume::FrameworkError;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Published posts, newest first.
    async fn published(&self, skip: u64, take: u64) -> Result<Vec<post::Model>, FrameworkError>;
    async fn count_published(&self) -> Result<u64, FrameworkError>;
    async fn by_url(&self, url: &str) -> Result<Option<post::Model>, FrameworkError>;
    async fn by_category(
        &self,
        category_id: i32,
        skip: u64,
        take: u64,
    ) -> Result<Vec<post::Model>, FrameworkError>;
    async fn count_by_category(&self, category_id: i32) -> Result<u64, FrameworkError>;
    async fn by_tag(
        &self,
        tag_id: i32,
        skip: u64,
        take: u64,
    ) -> Result<Vec<post::Model>, FrameworkError>;
    async fn count_by_tag(&self, tag_id: i32) -> Result<u64, FrameworkError>;
    /// Every published post, for the sitemap.
    async fn all_published(&self) -> Result<Vec<post::Model>, FrameworkError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<category::Model>, FrameworkError>;
    async fn by_url(&self, url: &str) -> Result<Option<category::Model>, FrameworkError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<tag::Model>, FrameworkError>;
    async fn by_url(&self, url: &str) -> Result<Option<tag::Model>, FrameworkError>;
}

pub struct DbPostRepository {
    db: DbScope,
}

impl DbPostRepository {
    pub fn new(db: DbScope) -> Self {
        Self { db }
    }

    async fn tagged_post_ids(&self, tag_id: i32) -> Result<Vec<i32>, FrameworkError> {
        let links = post_tag::Entity::find()
            .filter(post_tag::Column::TagId.eq(tag_id))
            .all(self.db.conn())
            .await?;
        Ok(links.into_iter().map(|link| link.post_id).collect())
    }
}

#[async_trait]
impl PostRepository for DbPostRepository {
    async fn published(&self, skip: u64, take: u64) -> Result<Vec<post::Model>, FrameworkError> {
        Ok(post::Entity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::PostedOn)
            .offset(skip)
            .limit(take)
            .all(self.db.conn())
            .await?)
    }

    async fn count_published(&self) -> Result<u64, FrameworkError> {
        Ok(post::Entity::find()
            .filter(post::Column::Published.eq(true))
            .count(self.db.conn())
            .await?)
    }

    async fn by_url(&self, url: &str) -> Result<Option<post::Model>, FrameworkError> {
        Ok(post::Entity::find()
            .filter(post::Column::Url.eq(url))
            .filter(post::Column::Published.eq(true))
            .one(self.db.conn())
            .await?)
    }

    async fn by_category(
        &self,
        category_id: i32,
        skip: u64,
        take: u64,
    ) -> Result<Vec<post::Model>, FrameworkError> {
        Ok(post::Entity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::PostedOn)
            .offset(skip)
            .limit(take)
            .all(self.db.conn())
            .await?)
    }

    async fn count_by_category(&self, category_id: i32) -> Result<u64, FrameworkError> {
        Ok(post::Entity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(post::Column::Published.eq(true))
            .count(self.db.conn())
            .await?)
    }

    async fn by_tag(
        &self,
        tag_id: i32,
        skip: u64,
        take: u64,
    ) -> Result<Vec<post::Model>, FrameworkError> {
        let ids = self.tagged_post_ids(tag_id).await?;
        Ok(post::Entity::find()
            .filter(post::Column::Id.is_in(ids))
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::PostedOn)
            .offset(skip)
            .limit(take)
            .all(self.db.conn())
            .await?)
    }

    async fn count_by_tag(&self, tag_id: i32) -> Result<u64, FrameworkError> {
        let ids = self.tagged_post_ids(tag_id).await?;
        Ok(post::Entity::find()
            .filter(post::Column::Id.is_in(ids))
            .filter(post::Column::Published.eq(true))
            .count(self.db.conn())
            .await?)
    }

    async fn all_published(&self) -> Result<Vec<post::Model>, FrameworkError> {
        Ok(post::Entity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::PostedOn)
            .all(self.db.conn())
            .await?)
    }
}

pub struct DbCategoryRepository {
    db: DbScope,
}

impl DbCategoryRepository {
    pub fn new(db: DbScope) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for DbCategoryRepository {
    async fn all(&self) -> Result<Vec<category::Model>, FrameworkError> {
        Ok(category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(self.db.conn())
            .await?)
    }

    async fn by_url(&self, url: &str) -> Result<Option<category::Model>, FrameworkError> {
        Ok(category::Entity::find()
            .filter(category::Column::Url.eq(url))
            .one(self.db.conn())
            .await?)
    }
}

pub struct DbTagRepository {
    db: DbScope,
}

impl DbTagRepository {
    pub fn new(db: DbScope) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for DbTagRepository {
    async fn all(&self) -> Result<Vec<tag::Model>, FrameworkError> {
        Ok(tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(self.db.conn())
            .await?)
    }

    async fn by_url(&self, url: &str) -> Result<Option<tag::Model>, FrameworkError> {
        Ok(tag::Entity::find()
            .filter(tag::Column::Url.eq(url))
            .one(self.db.conn())
            .await?)
    }
}
