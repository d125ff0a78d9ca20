// src/progress.rs
/// Lightweight progress reporting used by the run loops (scrape/upload/link).
/// The CLI implements this to surface status; tests use it to observe runs.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (a menu item, a record, a portal item).
    fn item_done(&mut self, _subject: &str) {}

    /// Called when one unit was abandoned after a recoverable fault.
    fn item_failed(&mut self, _subject: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
