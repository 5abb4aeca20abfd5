use crate::models::{category, tag};
use crate::repositories::{CategoryRepository, TagRepository};
use async_trait::async_trait;
use plume::FrameworkError;
use std::sync::Arc;

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn all(&self) -> Result<Vec<category::Model>, FrameworkError>;
}

#[async_trait]
pub trait TagService: Send + Sync {
    async fn all(&self) -> Result<Vec<tag::Model>, FrameworkError>;
}

pub struct DefaultCategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl DefaultCategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CategoryService for DefaultCategoryService {
    async fn all(&self) -> Result<Vec<category::Model>, FrameworkError> {
        self.categories.all().await
    }
}

pub struct DefaultTagService {
    tags: Arc<dyn TagRepository>,
}

impl DefaultTagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl TagService for DefaultTagService {
    async fn all(&self) -> Result<Vec<tag::Model>, FrameworkError> {
        self.tags.all().await
    }
}
