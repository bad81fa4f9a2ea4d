//! Sync run statistics.

/// Outcome counts for one sync pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Books selected for download this run.
    pub new_items: u64,
    pub downloaded: u64,
    /// Books the user chose not to replace.
    pub skipped: u64,
    pub failed: u64,
    pub failed_isbns: Vec<String>,

    /// The catalog listing stopped early and the session was logged out.
    pub catalog_incomplete: bool,

    /// The service rejected the token mid-run; remaining books were left for
    /// the next run.
    pub session_expired: bool,
}

impl RunStats {
    pub fn mark_downloaded(&mut self) {
        self.downloaded += 1;
    }

    pub fn mark_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn mark_failed(&mut self, isbn: &str) {
        self.failed += 1;
        self.failed_isbns.push(isbn.to_string());
    }

    /// Books that were attempted, whatever the outcome.
    pub fn total_attempted(&self) -> u64 {
        self.downloaded + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
