/// Load shape a task asks for, derived from its `qps`/`n` fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadShape {
    /// Repeating one-second ticks, each issuing `qps` concurrent fetches.
    Paced { qps: u32 },
    /// `count` fetches issued one after another.
    FixedCount { count: u64 },
    /// Nothing to do.
    Idle,
}
