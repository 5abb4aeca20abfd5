//! The route table and the action map. Rules are listed in match order;
//! the first rule a path satisfies wins.

use crate::controllers;
use plume::routing::{route, ActionRegistry, RouteTable};
use plume::{Registry, StartupError};
use std::sync::Arc;

/// No admin area ships yet, so the area rule matches nothing and falls
/// through.
const AREAS: &[&str] = &[];

pub fn table() -> Result<RouteTable, StartupError> {
    RouteTable::with_areas(
        vec![
            route("areaRoute", "{area}/{controller=Home}/{action=Index}/{id?}").require_area(),
            route("Post", "post/{id}").defaults(&[("controller", "Post"), ("action", "Index")]),
            route("BlogPost", "post").defaults(&[("controller", "blog"), ("action", "Index")]),
            route("BlogTag", "tag").defaults(&[("controller", "blog"), ("action", "Index")]),
            route("BlogCategory", "category")
                .defaults(&[("controller", "blog"), ("action", "Index")]),
            route("Category", "category/{id}/{page?}")
                .defaults(&[("controller", "blog"), ("action", "Category")]),
            route("Tag", "tag/{id}/{page?}").defaults(&[("controller", "blog"), ("action", "Tag")]),
            route("Blog", "blog/{page?}").defaults(&[("controller", "blog"), ("action", "Index")]),
            route("SiteMap", "sitemap.xml")
                .defaults(&[("controller", "Home"), ("action", "SiteMap")]),
            route("default", "{controller=Home}/{action=Index}/{id?}"),
        ],
        AREAS,
    )
}

pub fn actions(services: Arc<Registry>) -> ActionRegistry {
    ActionRegistry::new(services)
        .action("home", "index", controllers::home::index)
        .action("home", "error", controllers::home::error)
        .action("home", "sitemap", controllers::home::site_map)
        .action("blog", "index", controllers::blog::index)
        .action("blog", "category", controllers::blog::category)
        .action("blog", "tag", controllers::blog::tag)
        .action("post", "index", controllers::post::index)
        .action("contact", "index", controllers::contact::index)
        .action("contact", "send", controllers::contact::send)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recognize(path: &str) -> plume::RouteMatch {
        table().unwrap().recognize(path).unwrap()
    }

    #[test]
    fn the_table_builds_with_ten_rules() {
        assert_eq!(table().unwrap().len(), 10);
    }

    #[test]
    fn post_slug_binds_to_the_post_controller() {
        let m = recognize("/post/42");
        assert_eq!(m.route, "Post");
        assert_eq!(m.controller, "Post");
        assert_eq!(m.action, "Index");
        assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn bare_post_tag_and_category_fall_back_to_the_blog_index() {
        assert_eq!(recognize("/post").route, "BlogPost");
        assert_eq!(recognize("/tag").route, "BlogTag");
        assert_eq!(recognize("/category").route, "BlogCategory");
        assert_eq!(recognize("/post").action, "Index");
    }

    #[test]
    fn category_with_page_binds_both_parameters() {
        let m = recognize("/category/5/2");
        assert_eq!(m.route, "Category");
        assert_eq!(m.action, "Category");
        assert_eq!(m.params.get("id").map(String::as_str), Some("5"));
        assert_eq!(m.params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn category_page_is_optional() {
        let m = recognize("/category/5");
        assert_eq!(m.route, "Category");
        assert_eq!(m.params.get("page"), None);
    }

    #[test]
    fn tag_routes_mirror_category_routes() {
        let m = recognize("/tag/rust/3");
        assert_eq!(m.route, "Tag");
        assert_eq!(m.action, "Tag");
        assert_eq!(m.params.get("page").map(String::as_str), Some("3"));
    }

    #[test]
    fn blog_paging_is_optional() {
        assert_eq!(recognize("/blog").route, "Blog");
        let m = recognize("/blog/4");
        assert_eq!(m.params.get("page").map(String::as_str), Some("4"));
    }

    #[test]
    fn sitemap_is_a_literal_route() {
        let m = recognize("/sitemap.xml");
        assert_eq!(m.route, "SiteMap");
        assert_eq!(m.controller, "Home");
        assert_eq!(m.action, "SiteMap");
        assert!(m.params.is_empty());
    }

    #[test]
    fn the_root_falls_through_to_the_default_rule() {
        let m = recognize("/");
        assert_eq!(m.route, "default");
        assert_eq!(m.controller, "Home");
        assert_eq!(m.action, "Index");
    }

    #[test]
    fn conventional_paths_use_the_default_rule() {
        let m = recognize("/contact/send");
        assert_eq!(m.route, "default");
        assert_eq!(m.controller, "contact");
        assert_eq!(m.action, "send");
    }

    #[test]
    fn overlong_paths_do_not_match() {
        assert!(table().unwrap().recognize("/foo/bar/baz/qux").is_none());
    }

    #[test]
    fn every_registered_action_is_reachable_from_the_table() {
        let table = table().unwrap();
        for path in [
            "/",
            "/home/error",
            "/sitemap.xml",
            "/blog",
            "/category/rust",
            "/tag/rust",
            "/post/some-slug",
            "/contact",
            "/contact/send",
        ] {
            assert!(table.recognize(path).is_some(), "no rule matched {path}");
        }
    }
}
