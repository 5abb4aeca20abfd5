use crate::repositories::PostRepository;
use async_trait::async_trait;
use plume::FrameworkError;
use std::sync::Arc;

#[async_trait]
pub trait SiteMapService: Send + Sync {
    /// Renders the full sitemap as an XML document.
    async fn build(&self) -> Result<String, FrameworkError>;
}

pub struct XmlSiteMapService {
    posts: Arc<dyn PostRepository>,
    base_url: String,
}

impl XmlSiteMapService {
    pub fn new(posts: Arc<dyn PostRepository>, base_url: String) -> Self {
        Self {
            posts,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SiteMapService for XmlSiteMapService {
    async fn build(&self) -> Result<String, FrameworkError> {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for path in ["", "/blog", "/contact"] {
            xml.push_str(&format!(
                "  <url><loc>{}{}</loc></url>\n",
                self.base_url, path
            ));
        }
        for post in self.posts.all_published().await? {
            xml.push_str(&format!(
                "  <url><loc>{}/post/{}</loc><lastmod>{}</lastmod></url>\n",
                self.base_url,
                post.url,
                post.posted_on.format("%Y-%m-%d")
            ));
        }
        xml.push_str("</urlset>\n");
        Ok(xml)
    }
}
