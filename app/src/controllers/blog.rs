use super::{not_found, page, render_listing};
use crate::services::PostService;
use plume::{Registry, Request, Response};
use std::sync::Arc;

/// GET /blog/{page?} — paged listing of all published posts. Also serves
/// the bare /post, /tag and /category paths.
pub async fn index(req: Request, services: Arc<Registry>) -> Response {
    let posts = services.resolve::<dyn PostService>()?;
    let requested = req.param_opt_as::<u64>("page")?.unwrap_or(1);
    let listing = posts.listing(requested).await?;
    Ok(page("Blog", &render_listing(&listing, "/blog")))
}

/// GET /category/{id}/{page?} — posts in one category, by slug.
pub async fn category(req: Request, services: Arc<Registry>) -> Response {
    let posts = services.resolve::<dyn PostService>()?;
    let slug = req.param("id")?;
    let requested = req.param_opt_as::<u64>("page")?.unwrap_or(1);
    match posts.listing_by_category(slug, requested).await? {
        Some(listing) => {
            let base = format!("/category/{slug}");
            Ok(page(&listing.heading, &render_listing(&listing, &base)))
        }
        None => Ok(not_found("No such category.")),
    }
}

/// GET /tag/{id}/{page?} — posts carrying one tag, by slug.
pub async fn tag(req: Request, services: Arc<Registry>) -> Response {
    let posts = services.resolve::<dyn PostService>()?;
    let slug = req.param("id")?;
    let requested = req.param_opt_as::<u64>("page")?.unwrap_or(1);
    match posts.listing_by_tag(slug, requested).await? {
        Some(listing) => {
            let base = format!("/tag/{slug}");
            Ok(page(&listing.heading, &render_listing(&listing, &base)))
        }
        None => Ok(not_found("No such tag.")),
    }
}
