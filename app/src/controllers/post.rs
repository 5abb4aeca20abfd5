use super::{escape, not_found, page};
use crate::services::PostService;
use plume::{Registry, Request, Response};
use std::sync::Arc;

/// GET /post/{id} — a single article, addressed by slug.
pub async fn index(req: Request, services: Arc<Registry>) -> Response {
    let posts = services.resolve::<dyn PostService>()?;
    let slug = req.param("id")?;
    match posts.by_url(slug).await? {
        Some(post) => {
            let body = format!(
                "<article>\n\
                 <h1>{}</h1>\n\
                 <time datetime=\"{}\">{}</time>\n\
                 <div>{}</div>\n\
                 </article>",
                escape(&post.title),
                post.posted_on.format("%Y-%m-%d"),
                post.posted_on.format("%B %e, %Y"),
                post.content
            );
            Ok(page(&post.title, &body))
        }
        None => Ok(not_found("No such post.")),
    }
}
