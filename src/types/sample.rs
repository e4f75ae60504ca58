/// A single 3-axis linear acceleration sample pushed by the sensor device
#[derive(serde::Deserialize, Clone, Debug)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: i64,
}

impl AccelSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp: i64) -> Self {
        Self { x, y, z, timestamp }
    }

    /// 各分量平方求和作为出拳力度的代理值
    /// 平方既消除负号又放大差异，刻意不开平方根
    pub fn power(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}
