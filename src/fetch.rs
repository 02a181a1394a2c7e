//! Paginated fetch engine.
//!
//! Walks a cursor-based listing one page at a time, starting from the empty
//! cursor, until the server returns an empty next cursor. Items are kept in
//! the order they were served; nothing is de-duplicated. The first failing
//! page aborts the whole fetch and the partial result is dropped.

use std::time::{Duration, Instant};

use indicatif::ProgressBar;

use crate::{
    Error, Result, config,
    google::MediaItemsSource,
    types::{MediaItem, PageCursor},
    utils,
};

/// Items requested per listing call.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub page_size: u32,
    /// Pages fetched without a terminal cursor before the listing is
    /// considered runaway.
    pub max_pages: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_pages: config::DEFAULT_MAX_PAGES,
        }
    }
}

/// Result of a completed fetch.
#[derive(Debug)]
pub struct Fetched {
    pub items: Vec<MediaItem>,
    pub pages: usize,
    pub elapsed: Duration,
}

pub fn progress_message(elapsed: Duration, count: usize) -> String {
    format!(
        "{} fetching list of Google photos... (Items: {})",
        utils::format_duration(elapsed),
        utils::format_count(count)
    )
}

/// Collects every item of the listing behind `source`.
///
/// `progress` only receives status messages; pass [`ProgressBar::hidden`]
/// when no output is wanted.
pub async fn fetch_all<S: MediaItemsSource>(
    source: &mut S,
    options: &FetchOptions,
    progress: &ProgressBar,
) -> Result<Fetched> {
    let started = Instant::now();
    let mut items: Vec<MediaItem> = Vec::new();
    let mut cursor = PageCursor::start();
    let mut pages = 0;

    loop {
        if pages >= options.max_pages {
            return Err(Error::ListingLoopSuspected { pages });
        }

        let page = source.list_page(options.page_size, &cursor).await?;
        pages += 1;
        items.extend(page.items);
        progress.set_message(progress_message(started.elapsed(), items.len()));

        if page.next.is_terminal() {
            break;
        }
        // a server handing back the cursor it was given would loop forever
        if page.next == cursor {
            return Err(Error::ListingLoopSuspected { pages });
        }
        cursor = page.next;
    }

    Ok(Fetched {
        items,
        pages,
        elapsed: started.elapsed(),
    })
}
