//! Composition root. Every contract→implementation binding lives here,
//! constructed explicitly; nothing is discovered at runtime.

use crate::identity::{DbRoleStore, DbUserStore};
use crate::repositories::{
    CategoryRepository, DbCategoryRepository, DbPostRepository, DbTagRepository, PostRepository,
    TagRepository,
};
use crate::services::{
    CategoryService, ContactService, DefaultCategoryService, DefaultPaginatedMetaService,
    DefaultPostService, DefaultTagService, LoggingContactService, PaginatedMetaService,
    PostService, SiteMapService, TagService, XmlSiteMapService,
};
use crate::settings::AppConfiguration;
use plume::database::DbConnection;
use plume::identity::{DefaultTokenProvider, Identity};
use plume::{Lifetime, Registry};
use std::sync::Arc;

/// Wire the identity layer to the database-backed stores.
pub fn build_identity(db: &DbConnection) -> Arc<Identity> {
    Arc::new(Identity::new(
        Arc::new(DbUserStore::new(db.clone())),
        Arc::new(DbRoleStore::new(db.clone())),
        Arc::new(DefaultTokenProvider::new()),
    ))
}

/// Populate the registry with every application binding. Repositories and
/// services are transient; each resolution constructs a fresh instance over
/// a request-scoped database handle.
pub fn build_registry(
    settings: &AppConfiguration,
    db: &DbConnection,
    identity: Arc<Identity>,
) -> Arc<Registry> {
    let mut registry = Registry::new();

    {
        let db = db.clone();
        registry.register::<dyn PostRepository, _>(Lifetime::Transient, move || {
            Arc::new(DbPostRepository::new(db.scope()))
        });
    }
    {
        let db = db.clone();
        registry.register::<dyn CategoryRepository, _>(Lifetime::Transient, move || {
            Arc::new(DbCategoryRepository::new(db.scope()))
        });
    }
    {
        let db = db.clone();
        registry.register::<dyn TagRepository, _>(Lifetime::Transient, move || {
            Arc::new(DbTagRepository::new(db.scope()))
        });
    }

    registry.register::<dyn PaginatedMetaService, _>(Lifetime::Transient, || {
        Arc::new(DefaultPaginatedMetaService)
    });

    {
        let db = db.clone();
        let posts_per_page = settings.posts_per_page;
        registry.register::<dyn PostService, _>(Lifetime::Transient, move || {
            let scope = db.scope();
            Arc::new(DefaultPostService::new(
                Arc::new(DbPostRepository::new(scope.clone())),
                Arc::new(DbCategoryRepository::new(scope.clone())),
                Arc::new(DbTagRepository::new(scope)),
                Arc::new(DefaultPaginatedMetaService),
                posts_per_page,
            ))
        });
    }
    {
        let db = db.clone();
        registry.register::<dyn CategoryService, _>(Lifetime::Transient, move || {
            Arc::new(DefaultCategoryService::new(Arc::new(
                DbCategoryRepository::new(db.scope()),
            )))
        });
    }
    {
        let db = db.clone();
        registry.register::<dyn TagService, _>(Lifetime::Transient, move || {
            Arc::new(DefaultTagService::new(Arc::new(DbTagRepository::new(
                db.scope(),
            ))))
        });
    }
    {
        let recipient = settings.contact_recipient.clone();
        registry.register::<dyn ContactService, _>(Lifetime::Transient, move || {
            Arc::new(LoggingContactService::new(recipient.clone()))
        });
    }
    {
        let db = db.clone();
        let base_url = settings.url.clone();
        registry.register::<dyn SiteMapService, _>(Lifetime::Transient, move || {
            Arc::new(XmlSiteMapService::new(
                Arc::new(DbPostRepository::new(db.scope())),
                base_url.clone(),
            ))
        });
    }

    registry.register_instance(identity);
    registry.register_instance(Arc::new(settings.clone()));

    Arc::new(registry)
}
