//! Page window planning
//!
//! Maps a `(skip, limit)` window over a remote ordered sequence onto the
//! 1-based, fixed-size pages the remote list API serves, and decides which
//! slice of every fetched page belongs to the window.

use std::ops::RangeInclusive;

use crate::{Error, Result};

/// Largest page the GitHub list endpoints will serve
pub const MAX_PER_PAGE: u32 = 100;

/// The logical slice of a remote sequence requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    skip: usize,
    limit: usize,
}

impl Window {
    /// Create a window that discards `skip` items and keeps the next `limit`
    ///
    /// Rejects an empty window and one whose end does not fit in `usize`.
    pub fn new(skip: usize, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidWindow(
                "limit must be at least 1".to_string(),
            ));
        }
        if skip.checked_add(limit).is_none() {
            return Err(Error::InvalidWindow(format!(
                "skip {} + limit {} overflows",
                skip, limit
            )));
        }
        Ok(Self { skip, limit })
    }

    /// Items discarded from the front of the sequence
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Items kept after the skipped prefix
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Exclusive end position of the window (`skip + limit`)
    pub fn total(&self) -> usize {
        // Checked in `new`
        self.skip + self.limit
    }
}

/// Page count and fetch size needed to cover a [`Window`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    window: Window,
    max_page_size: usize,
    page_count: u32,
    per_page: usize,
}

impl PagePlan {
    /// Plan the pages for `window` with a remote page size cap of `max_page_size`
    pub fn new(window: Window, max_page_size: u32) -> Result<Self> {
        if max_page_size == 0 {
            return Err(Error::InvalidWindow(
                "max page size must be at least 1".to_string(),
            ));
        }

        let max = max_page_size as usize;
        let total = window.total();

        let (pages, per_page) = if total <= max {
            // A single page only needs to reach the end of the window
            (1, total)
        } else {
            (total.div_ceil(max), max)
        };

        let page_count = u32::try_from(pages).map_err(|_| {
            Error::InvalidWindow(format!("window end {} needs too many pages", total))
        })?;

        Ok(Self {
            window,
            max_page_size: max,
            page_count,
            per_page,
        })
    }

    /// The window this plan covers
    pub fn window(&self) -> Window {
        self.window
    }

    /// Number of remote pages to fetch
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Page size to request on every page
    ///
    /// Multi-page plans request the page size cap. A single-page plan
    /// requests `skip + limit` so the page reaches the end of the window;
    /// this is `limit` only when `skip` is 0.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// `total mod max_page_size`, the kept end bound of the last page when non-zero
    pub fn remainder(&self) -> usize {
        self.window.total() % self.max_page_size
    }

    /// 1-based page numbers to fetch, in order
    pub fn pages(&self) -> RangeInclusive<u32> {
        1..=self.page_count
    }

    /// Whether `page` is the final page of the plan
    pub fn is_last(&self, page: u32) -> bool {
        page == self.page_count
    }

    /// Decide what to keep from `page`, given the skip still to be consumed
    ///
    /// Returns the step for this page along with the remaining skip to thread
    /// into the next call.
    pub fn step(&self, page: u32, remaining_skip: usize) -> (PageStep, usize) {
        if remaining_skip > self.per_page {
            return (PageStep::Skipped, remaining_skip - self.per_page);
        }

        let mut end = self.per_page;
        let remainder = self.remainder();
        if self.is_last(page) && remainder > 0 {
            end = remainder;
        }

        let bounds = SliceBounds {
            start: remaining_skip,
            end,
        };
        (PageStep::Keep(bounds), 0)
    }

    /// Every page's step, folding the skip through the whole plan
    ///
    /// Lazy, so plans with a very large page count cost nothing up front.
    pub fn steps(&self) -> impl Iterator<Item = (u32, PageStep)> + '_ {
        self.pages()
            .scan(self.window.skip(), move |remaining, page| {
                let (step, next) = self.step(page, *remaining);
                *remaining = next;
                Some((page, step))
            })
    }
}

/// What to do with one fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// The whole page lies before the window
    Skipped,
    /// Keep the items inside these bounds
    Keep(SliceBounds),
}

/// Local `[start, end)` bounds applied to a raw page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBounds {
    pub start: usize,
    pub end: usize,
}

impl SliceBounds {
    /// Number of items these bounds keep from a full page
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the bounds keep nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the items inside the bounds
    ///
    /// A page shorter than `end` means the remote ran out; the bounds are
    /// clamped to what was actually returned.
    pub fn apply<T>(&self, mut raw: Vec<T>) -> Vec<T> {
        let end = self.end.min(raw.len());
        let start = self.start.min(end);
        raw.truncate(end);
        raw.drain(..start);
        raw
    }
}
