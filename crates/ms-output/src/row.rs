//! Plain data row types written by output backends.

/// Pose and inventory of one robot at the end of a step.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotSnapshotRow {
    pub episode: u32,
    pub step:    u64,
    pub time_ms: u64,
    pub robot:   String,
    pub team:    &'static str,
    pub x:       f64,
    pub y:       f64,
    pub heading: f64,
    /// Gamepieces held, summed over every kind.
    pub held:    i64,
    pub is_free: bool,
}

/// Clock and score after one scheduler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub episode:         u32,
    pub step:            u64,
    pub time_before_ms:  u64,
    pub time_after_ms:   u64,
    pub score:           i64,
    pub red_score:       i64,
    pub blue_score:      i64,
    pub invalid_actions: u64,
}

/// One receipt of the server's match log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntryRow {
    pub episode:     u32,
    pub time_ms:     u64,
    pub kind:        &'static str,
    /// Empty for rule receipts.
    pub robot:       String,
    pub description: String,
    pub changes:     u64,
}
