use sfb_types::measurements::FetchResult;

/// Counts of a single scheduler invocation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of paced-load ticks, always zero for the other load shapes.
    pub ticks: u64,
    /// Number of fetches issued.
    pub fetches: u64,
    /// Number of fetches that didn't succeed.
    pub failures: u64,
}

impl RunSummary {
    /// Accounts a fetch result, `success_code` is the status the task expects.
    pub fn record(&mut self, result: &FetchResult, success_code: Option<u16>) {
        self.fetches += 1;
        if !result.is_success(success_code) {
            self.failures += 1;
        }
    }

    /// Accounts a fetch that didn't produce any result.
    pub fn record_lost(&mut self) {
        self.fetches += 1;
        self.failures += 1;
    }
}
