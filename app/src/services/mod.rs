//! Application services sitting between the controllers and the
//! repositories.

mod contact;
mod pagination;
mod posts;
mod sitemap;
mod taxonomy;

pub use contact::{ContactMessage, ContactService, LoggingContactService};
pub use pagination::{DefaultPaginatedMetaService, PaginatedMeta, PaginatedMetaService};
pub use posts::{DefaultPostService, Listing, PostService};
pub use sitemap::{SiteMapService, XmlSiteMapService};
pub use taxonomy::{
    CategoryService, DefaultCategoryService, DefaultTagService, TagService,
};
