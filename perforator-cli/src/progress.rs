//! Console progress for windowed fetches

use std::io::Write;

use perforator_core::{FetchObserver, PageProgress};

/// Rewrites a single stderr line with the page being fetched
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    /// Print a free-form status on the progress line
    pub fn status(message: &str) {
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort
        let _ = write!(stderr, "\r\x1b[2K{}", message);
        let _ = stderr.flush();
    }

    /// Erase the progress line
    pub fn clear() {
        Self::status("");
    }
}

impl FetchObserver for ConsoleProgress {
    fn on_page(&self, progress: PageProgress<'_>) {
        Self::status(&progress_line(progress));
    }
}

fn progress_line(progress: PageProgress<'_>) -> String {
    format!(
        "Retrieving {}.. {}/{}",
        progress.label, progress.page, progress.page_count
    )
}
