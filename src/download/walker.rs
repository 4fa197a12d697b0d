//! Enumeration of collections and their listing pages.

use crate::api::{Collection, FlickrApi};
use crate::error::Result;

/// One listing page of one collection. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub collection_id: String,
    pub page: u64,
}

/// Pages needed to cover `photo_count` photos.
pub fn page_count(photo_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    photo_count.div_ceil(page_size)
}

/// Lazy, single-pass sequence of pages across a list of collections.
#[derive(Debug)]
pub struct Pages {
    collections: std::vec::IntoIter<Collection>,
    current: Option<(String, u64, u64)>,
    page_size: u64,
}

impl Pages {
    /// Plan the pages of the given collections.
    pub fn new(collections: Vec<Collection>, page_size: u64) -> Self {
        Self {
            collections: collections.into_iter(),
            current: None,
            page_size,
        }
    }
}

impl Iterator for Pages {
    type Item = PageRef;

    fn next(&mut self) -> Option<PageRef> {
        loop {
            if let Some((collection_id, next, last)) = &mut self.current {
                if *next <= *last {
                    let page = PageRef {
                        collection_id: collection_id.clone(),
                        page: *next,
                    };
                    *next += 1;
                    return Some(page);
                }
            }

            let collection = self.collections.next()?;
            let pages = page_count(collection.photo_count, self.page_size);
            tracing::debug!(
                "Collection {} ({}): {} photos in {} page(s)",
                collection.id,
                collection.display_name(),
                collection.photo_count,
                pages
            );
            self.current = Some((collection.id, 1, pages));
        }
    }
}

/// List the user's collections and plan their pages.
pub async fn walk(api: &FlickrApi, user_id: &str, page_size: u64) -> Result<(usize, Pages)> {
    let collections = api.list_collections(user_id).await?;
    tracing::info!("Found {} collections", collections.len());
    Ok((collections.len(), Pages::new(collections, page_size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(id: &str, photo_count: u64) -> Collection {
        Collection {
            id: id.to_string(),
            photo_count,
            title: None,
        }
    }

    fn pages_of(collections: Vec<Collection>, page_size: u64) -> Vec<(String, u64)> {
        Pages::new(collections, page_size)
            .map(|p| (p.collection_id, p.page))
            .collect()
    }

    #[test]
    fn test_page_count_boundaries() {
        assert_eq!(page_count(0, 500), 0);
        assert_eq!(page_count(1, 500), 1);
        assert_eq!(page_count(3, 500), 1);
        assert_eq!(page_count(499, 500), 1);
        assert_eq!(page_count(500, 500), 1);
        assert_eq!(page_count(501, 500), 2);
        assert_eq!(page_count(1000, 500), 2);
        assert_eq!(page_count(1001, 500), 3);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let pages = pages_of(vec![collection("a", 500)], 500);
        assert_eq!(pages, vec![("a".to_string(), 1)]);

        let pages = pages_of(vec![collection("a", 1000)], 500);
        assert_eq!(pages, vec![("a".to_string(), 1), ("a".to_string(), 2)]);
    }

    #[test]
    fn test_pages_cover_every_photo_once() {
        for count in [1u64, 2, 3, 4, 5, 6, 7, 9, 10, 11] {
            let pages = pages_of(vec![collection("a", count)], 3);
            let covered: u64 = pages
                .iter()
                .map(|(_, page)| (count - (page - 1) * 3).min(3))
                .sum();
            assert_eq!(covered, count, "count {}", count);
            assert_eq!(pages.first().map(|p| p.1), Some(1));
        }
    }

    #[test]
    fn test_pages_span_collections_and_skip_empty() {
        let pages = pages_of(
            vec![collection("a", 2), collection("empty", 0), collection("b", 5)],
            2,
        );
        assert_eq!(
            pages,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 1),
                ("b".to_string(), 2),
                ("b".to_string(), 3),
            ]
        );
    }
}
