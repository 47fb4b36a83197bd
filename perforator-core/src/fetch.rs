//! Windowed retrieval over a paged remote collection

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::PartialFetch;
use crate::window::{PagePlan, PageStep, Window, MAX_PER_PAGE};
use crate::Result;

/// A remote collection that serves fixed-size, 1-based pages
///
/// `F` is the filter shape of the collection (state, author, ...). One
/// client can serve several collections by implementing this trait once per
/// filter type.
#[async_trait]
pub trait PageSource<F>: Send + Sync
where
    F: Send + Sync,
{
    /// Item type of the collection
    type Item: Send;

    /// Error returned by the remote
    type Error: std::error::Error + Send + 'static;

    /// Fetch page `page` (1-based) holding at most `per_page` items
    async fn fetch_page(
        &self,
        filter: &F,
        page: u32,
        per_page: u32,
    ) -> std::result::Result<Vec<Self::Item>, Self::Error>;
}

/// Progress of a windowed fetch, reported before each page is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress<'a> {
    /// Human name of the collection being fetched
    pub label: &'a str,
    /// 1-based page about to be fetched
    pub page: u32,
    /// Total pages in the plan
    pub page_count: u32,
}

/// Receives page progress notifications
pub trait FetchObserver: Send + Sync {
    fn on_page(&self, progress: PageProgress<'_>);
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn on_page(&self, _progress: PageProgress<'_>) {}
}

impl<F> FetchObserver for F
where
    F: Fn(PageProgress<'_>) + Send + Sync,
{
    fn on_page(&self, progress: PageProgress<'_>) {
        self(progress)
    }
}

/// Outcome of [`PagedFetcher::fetch`]
pub type FetchResult<T, E> = std::result::Result<Vec<T>, PartialFetch<T, E>>;

/// Drives a [`PageSource`] through a [`PagePlan`]
pub struct PagedFetcher<'a, S> {
    source: &'a S,
    label: &'a str,
    max_page_size: u32,
    observer: &'a dyn FetchObserver,
}

impl<'a, S> PagedFetcher<'a, S> {
    /// Create a fetcher over `source` using the GitHub page size cap
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            label: "items",
            max_page_size: MAX_PER_PAGE,
            observer: &NoopObserver,
        }
    }

    /// Name the collection in progress notifications and logs
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    /// Override the remote page size cap
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Report page progress to `observer`
    pub fn with_observer(mut self, observer: &'a dyn FetchObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Plan the pages for `window` with this fetcher's page size cap
    pub fn plan(&self, window: Window) -> Result<PagePlan> {
        PagePlan::new(window, self.max_page_size)
    }

    /// Fetch exactly the items of the plan's window, in remote order
    ///
    /// Pages are requested one at a time. A page shorter than requested ends
    /// the walk, since the remote has nothing past it. The first remote error
    /// stops the walk and is returned together with the items gathered so far.
    pub async fn fetch<F>(
        &self,
        filter: &F,
        plan: PagePlan,
    ) -> FetchResult<S::Item, S::Error>
    where
        S: PageSource<F>,
        F: Send + Sync,
    {
        let page_count = plan.page_count();
        // per_page never exceeds max_page_size, which is a u32
        let per_page = plan.per_page() as u32;
        // The window can be far larger than the remote collection
        let mut items = Vec::with_capacity(plan.window().limit().min(plan.per_page()));

        for (page, step) in plan.steps() {
            self.observer.on_page(PageProgress {
                label: self.label,
                page,
                page_count,
            });

            debug!(label = self.label, page, page_count, per_page, "Fetching page");

            let raw = match self.source.fetch_page(filter, page, per_page).await {
                Ok(raw) => raw,
                Err(source) => {
                    debug!(
                        label = self.label,
                        page,
                        kept = items.len(),
                        "Page fetch failed, returning partial results"
                    );
                    return Err(PartialFetch { items, source });
                }
            };
            let exhausted = raw.len() < per_page as usize;

            match step {
                PageStep::Skipped => {
                    debug!(label = self.label, page, "Page skipped");
                }
                PageStep::Keep(bounds) => {
                    let fetched = raw.len();
                    let kept = bounds.apply(raw);
                    debug!(
                        label = self.label,
                        page,
                        fetched,
                        start = bounds.start,
                        end = bounds.end,
                        kept = kept.len(),
                        "Page sliced"
                    );
                    items.extend(kept);
                }
            }

            if exhausted && !plan.is_last(page) {
                debug!(label = self.label, page, "Remote exhausted before the window end");
                break;
            }
        }

        info!(label = self.label, count = items.len(), page_count, "Fetched window");

        Ok(items)
    }
}
