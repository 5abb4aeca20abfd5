/// Paging metadata for a listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedMeta {
    pub page: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

pub trait PaginatedMetaService: Send + Sync {
    fn meta(&self, total_items: u64, page: u64, per_page: u64) -> PaginatedMeta;
}

pub struct DefaultPaginatedMetaService;

impl PaginatedMetaService for DefaultPaginatedMetaService {
    fn meta(&self, total_items: u64, page: u64, per_page: u64) -> PaginatedMeta {
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);
        PaginatedMeta {
            page,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_last_page_counts_as_a_page() {
        let meta = DefaultPaginatedMetaService.meta(11, 1, 5);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_previous);
        assert!(meta.has_next);
    }

    #[test]
    fn empty_listing_still_has_one_page() {
        let meta = DefaultPaginatedMetaService.meta(0, 1, 5);
        assert_eq!(
            meta,
            PaginatedMeta {
                page: 1,
                total_pages: 1,
                has_previous: false,
                has_next: false,
            }
        );
    }

    #[test]
    fn page_is_clamped_to_the_valid_range() {
        let meta = DefaultPaginatedMetaService.meta(10, 99, 5);
        assert_eq!(meta.page, 2);
        assert!(meta.has_previous);
        assert!(!meta.has_next);

        let meta = DefaultPaginatedMetaService.meta(10, 0, 5);
        assert_eq!(meta.page, 1);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let meta = DefaultPaginatedMetaService.meta(25, 3, 5);
        assert_eq!(meta.total_pages, 5);
        assert!(meta.has_previous);
        assert!(meta.has_next);
    }
}
