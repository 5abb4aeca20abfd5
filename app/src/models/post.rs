use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A blog article. `url` is the slug used in links and in the `post/{id}`
/// route; only rows with `published = true` are ever rendered.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub url: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: i32,
    pub published: bool,
    pub posted_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
