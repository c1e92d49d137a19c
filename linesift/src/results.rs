/// Summary of a completed scan
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Total number of lines read from the input
    pub lines_scanned: usize,
    /// Number of lines written to the output
    pub lines_matched: usize,
}

impl ScanSummary {
    /// Creates a new empty summary
    pub fn new() -> Self {
        Default::default()
    }

    /// Records the outcome of one line
    pub fn record_line(&mut self, matched: bool) {
        self.lines_scanned += 1;
        if matched {
            self.lines_matched += 1;
        }
    }

    /// Merges another summary into this one
    pub fn merge(&mut self, other: ScanSummary) {
        self.lines_scanned += other.lines_scanned;
        self.lines_matched += other.lines_matched;
    }
}
