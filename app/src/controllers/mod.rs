//! Request handlers, grouped the way the route table addresses them.

pub mod blog;
pub mod contact;
pub mod home;
pub mod post;

use crate::models::post::Model as Post;
use crate::services::Listing;
use plume::HttpResponse;

/// Shared page shell. Every server-rendered view goes through here.
fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"/css/site.css\">\n\
         </head>\n\
         <body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/blog\">Blog</a> <a href=\"/contact\">Contact</a></nav>\n\
         {}\n\
         </body>\n\
         </html>\n",
        escape(title),
        body
    ))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn post_summary(post: &Post) -> String {
    format!(
        "<article>\n\
         <h2><a href=\"/post/{}\">{}</a></h2>\n\
         <time datetime=\"{}\">{}</time>\n\
         <p>{}</p>\n\
         </article>",
        escape(&post.url),
        escape(&post.title),
        post.posted_on.format("%Y-%m-%d"),
        post.posted_on.format("%B %e, %Y"),
        escape(&post.excerpt)
    )
}

fn render_listing(listing: &Listing, base_path: &str) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(&listing.heading));
    if listing.posts.is_empty() {
        body.push_str("<p>No posts yet.</p>\n");
    }
    for post in &listing.posts {
        body.push_str(&post_summary(post));
        body.push('\n');
    }
    body.push_str("<div class=\"pagination\">");
    if listing.meta.has_previous {
        body.push_str(&format!(
            "<a href=\"{}/{}\">Newer</a> ",
            base_path,
            listing.meta.page - 1
        ));
    }
    body.push_str(&format!(
        "Page {} of {}",
        listing.meta.page, listing.meta.total_pages
    ));
    if listing.meta.has_next {
        body.push_str(&format!(
            " <a href=\"{}/{}\">Older</a>",
            base_path,
            listing.meta.page + 1
        ));
    }
    body.push_str("</div>");
    body
}

fn not_found(what: &str) -> HttpResponse {
    page("Not found", &format!("<h1>Not found</h1><p>{}</p>", escape(what))).status(404)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn titles_are_escaped_in_the_shell() {
        let response = page("<script>", "<p>ok</p>");
        assert!(response.body_str().contains("&lt;script&gt;"));
        assert!(response.body_str().contains("<p>ok</p>"));
    }

    #[test]
    fn not_found_pages_carry_a_404_status() {
        assert_eq!(not_found("no such post").status_code(), 404);
    }
}
