/// Result of one completed punch measurement
#[derive(Debug, Clone)]
pub struct PunchScore {
    pub peak_power: f64,
    pub started_at: i64,
    pub completed_at: i64,
    pub samples_seen: usize,
}

impl PunchScore {
    /// 原始力度值是小数级别的差异，显示前按比例放大
    pub fn display_points(&self, scale: f64) -> f64 {
        self.peak_power * scale
    }

    pub fn duration_ms(&self) -> i64 {
        self.completed_at - self.started_at
    }
}
