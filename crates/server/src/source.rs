//! Paginated timeline data source.
//!
//! [`TimelineSource`] fetches one page of a collection for a logged-in user.
//! [`collect_pages`] fetches pages `1..=n` concurrently and turns every
//! failure into a skipped page, so the ranking pipeline always runs on
//! whatever data arrived.

use crate::auth::UserInfo;
use async_trait::async_trait;
use tweetview_core::{Collection, Item, Page};

/// Errors from the data source transport.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("timeline request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Status and decoded items of one page fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// Empty unless `status` is 200.
    pub items: Vec<Item>,
}

/// Data source collaborator.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Fetch page `page` (1-based) of `collection` on behalf of `user`.
    async fn fetch_page(
        &self,
        user: &UserInfo,
        collection: Collection,
        page: u32,
    ) -> Result<FetchedPage, SourceError>;
}

/// Timeline API over HTTP with bearer authentication.
pub struct HttpTimelineSource {
    api_base: String,
    client: reqwest::Client,
}

impl HttpTimelineSource {
    pub fn new(api_base: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// API path of a collection, relative to the base URL.
    pub fn path(collection: Collection) -> &'static str {
        match collection {
            Collection::Favorites => "favorites.json",
            Collection::HomeTimeline => "statuses/home_timeline.json",
        }
    }
}

#[async_trait]
impl TimelineSource for HttpTimelineSource {
    async fn fetch_page(
        &self,
        user: &UserInfo,
        collection: Collection,
        page: u32,
    ) -> Result<FetchedPage, SourceError> {
        let url = format!("{}/{}", self.api_base, Self::path(collection));
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&user.token)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Ok(FetchedPage {
                status,
                items: Vec::new(),
            });
        }
        let items: Vec<Item> = resp.json().await?;
        Ok(FetchedPage { status, items })
    }
}

/// Fetch pages `1..=num_pages` of `collection` concurrently, in page order.
///
/// Transport and decode errors become pages with status `0`.
pub async fn collect_pages(
    source: &dyn TimelineSource,
    user: &UserInfo,
    collection: Collection,
    num_pages: u32,
) -> Vec<Page> {
    let fetches = (1..=num_pages).map(|number| async move {
        match source.fetch_page(user, collection, number).await {
            Ok(fetched) => Page {
                collection,
                number,
                status: fetched.status,
                items: fetched.items,
            },
            Err(e) => {
                tracing::warn!(
                    collection = collection.name(),
                    page = number,
                    "Page fetch failed: {}",
                    e
                );
                Page::failed(collection, number, 0)
            }
        }
    });
    futures::future::join_all(fetches).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Returns `status` for odd pages and one item for even pages.
    struct Alternating {
        status: u16,
        calls: Mutex<Vec<(Collection, u32)>>,
    }

    #[async_trait]
    impl TimelineSource for Alternating {
        async fn fetch_page(
            &self,
            _user: &UserInfo,
            collection: Collection,
            page: u32,
        ) -> Result<FetchedPage, SourceError> {
            self.calls.lock().push((collection, page));
            if page % 2 == 1 {
                Ok(FetchedPage {
                    status: self.status,
                    items: Vec::new(),
                })
            } else {
                Ok(FetchedPage {
                    status: 200,
                    items: vec![Item::new(format!("page {page}"))],
                })
            }
        }
    }

    fn user() -> UserInfo {
        UserInfo {
            username: "alice".into(),
            token: "t".into(),
            secret: String::new(),
        }
    }

    #[tokio::test]
    async fn test_collect_pages_keeps_order_and_statuses() {
        let source = Alternating {
            status: 503,
            calls: Mutex::new(Vec::new()),
        };
        let pages = collect_pages(&source, &user(), Collection::HomeTimeline, 4).await;
        let numbers: Vec<u32> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        let statuses: Vec<u16> = pages.iter().map(|p| p.status).collect();
        assert_eq!(statuses, vec![503, 200, 503, 200]);
        assert_eq!(pages[1].items[0].text, "page 2");
        assert_eq!(source.calls.lock().len(), 4);
    }

    #[tokio::test]
    async fn test_collect_zero_pages() {
        let source = Alternating {
            status: 200,
            calls: Mutex::new(Vec::new()),
        };
        let pages = collect_pages(&source, &user(), Collection::Favorites, 0).await;
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_yields_failed_pages() {
        let source = HttpTimelineSource::new("http://127.0.0.1:1/", reqwest::Client::new());
        let pages = collect_pages(&source, &user(), Collection::Favorites, 2).await;
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.status == 0 && p.items.is_empty()));
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(HttpTimelineSource::path(Collection::Favorites), "favorites.json");
        assert_eq!(
            HttpTimelineSource::path(Collection::HomeTimeline),
            "statuses/home_timeline.json"
        );
    }
}
