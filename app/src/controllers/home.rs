use super::{escape, page, render_listing};
use crate::services::{CategoryService, PostService, SiteMapService, TagService};
use crate::settings::AppConfiguration;
use plume::{HttpResponse, Registry, Request, Response};
use std::sync::Arc;

/// GET / — front page: latest posts plus the category and tag indexes.
pub async fn index(_req: Request, services: Arc<Registry>) -> Response {
    let settings = services.resolve::<AppConfiguration>()?;
    let posts = services.resolve::<dyn PostService>()?;
    let categories = services.resolve::<dyn CategoryService>()?;
    let tags = services.resolve::<dyn TagService>()?;

    let listing = posts.listing(1).await?;
    let mut body = render_listing(&listing, "/blog");

    body.push_str("<aside>\n<h3>Categories</h3>\n<ul>\n");
    for category in categories.all().await? {
        body.push_str(&format!(
            "<li><a href=\"/category/{}\">{}</a></li>\n",
            escape(&category.url),
            escape(&category.name)
        ));
    }
    body.push_str("</ul>\n<h3>Tags</h3>\n<ul>\n");
    for tag in tags.all().await? {
        body.push_str(&format!(
            "<li><a href=\"/tag/{}\">{}</a></li>\n",
            escape(&tag.url),
            escape(&tag.name)
        ));
    }
    body.push_str("</ul>\n</aside>");

    Ok(page(&settings.name, &body))
}

/// GET /home/error — destination of the production exception handler.
pub async fn error(_req: Request, _services: Arc<Registry>) -> Response {
    Ok(page(
        "Something went wrong",
        "<h1>Something went wrong</h1>\n\
         <p>An unexpected error occurred. Please try again later.</p>",
    )
    .status(500))
}

/// GET /sitemap.xml
pub async fn site_map(_req: Request, services: Arc<Registry>) -> Response {
    let sitemap = services.resolve::<dyn SiteMapService>()?;
    let xml = sitemap.build().await?;
    Ok(HttpResponse::xml(xml))
}
