use log::info;

use crate::config::DisplayConfig;
use crate::types::PunchScore;

/// 成绩展示模块
/// 原始力度值是小数级别的差异，展示前按 score_scale 放大再取整

pub struct ScoreBoard {
    config: DisplayConfig,
    best_points: Option<f64>,
    published: usize,
}

impl ScoreBoard {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            best_points: None,
            published: 0,
        }
    }

    /// 输出一次测量成绩
    pub fn publish(&mut self, score: &PunchScore) {
        let points = score.display_points(self.config.score_scale);

        // 控制台是成绩展示的最终出口
        println!("{:.0} {}", points, self.config.unit);
        info!(
            "Score published: {:.0} {} (peak power {:.5}, {} samples in {} ms)",
            points,
            self.config.unit,
            score.peak_power,
            score.samples_seen,
            score.duration_ms()
        );

        self.published += 1;
        if self.best_points.map_or(true, |best| points > best) {
            self.best_points = Some(points);
        }
    }

    pub fn best_points(&self) -> Option<f64> {
        self.best_points
    }

    pub fn published(&self) -> usize {
        self.published
    }
}
