use log::debug;

use crate::types::{AccelSample, PunchScore};

/// 出拳测量核心模块
/// 力度超过阈值开始测量，窗口内持续跟踪峰值，窗口结束输出唯一成绩

/// 测量参数
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// 触发测量的力度阈值，严格大于才开始
    pub trigger_power: f64,
    /// 测量窗口时长（毫秒）
    pub window_ms: i64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            trigger_power: 20.0,
            window_ms: 3000,
        }
    }
}

/// 单次测量的瞬时状态，测量结束即销毁
#[derive(Debug, Clone)]
struct MeasurementSession {
    started_at: i64,
    peak_power: f64,
    samples_seen: usize,
}

impl MeasurementSession {
    fn start(started_at: i64, power: f64) -> Self {
        Self {
            started_at,
            peak_power: power,
            samples_seen: 1,
        }
    }

    /// 峰值只增不减
    fn observe(&mut self, power: f64) {
        if self.peak_power < power {
            self.peak_power = power;
        }
        self.samples_seen += 1;
    }

    fn elapsed_ms(&self, timestamp: i64) -> i64 {
        timestamp - self.started_at
    }
}

/// 出拳测量采样器，样本通道的同步消费端逐条喂入
pub struct PunchSampler {
    config: SamplerConfig,
    session: Option<MeasurementSession>,
}

impl PunchSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// 处理一条样本，测量窗口结束时返回本次成绩
    pub fn on_sample(&mut self, sample: &AccelSample) -> Option<PunchScore> {
        let power = sample.power();

        if self.session.is_none() {
            // 空闲状态下力度超过阈值则开始测量
            if power > self.config.trigger_power {
                debug!(
                    "Measurement started: power {:.5} at {}",
                    power, sample.timestamp
                );
                self.session = Some(MeasurementSession::start(sample.timestamp, power));
            }
            return None;
        }

        // 先更新峰值再检查窗口，收尾样本同样计入峰值
        let window_elapsed = match self.session.as_mut() {
            Some(session) => {
                session.observe(power);
                session.elapsed_ms(sample.timestamp) > self.config.window_ms
            }
            None => false,
        };

        if !window_elapsed {
            return None;
        }

        self.session.take().map(|session| PunchScore {
            peak_power: session.peak_power,
            started_at: session.started_at,
            completed_at: sample.timestamp,
            samples_seen: session.samples_seen,
        })
    }

    pub fn is_measuring(&self) -> bool {
        self.session.is_some()
    }

    /// 丢弃进行中的测量，回到空闲状态
    pub fn reset(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, z: f64, timestamp: i64) -> AccelSample {
        AccelSample::new(x, y, z, timestamp)
    }

    #[test]
    fn idle_below_threshold_never_starts() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        for i in 0..100 {
            // 力度 14，低于阈值
            let result = sampler.on_sample(&sample(1.0, 2.0, 3.0, i * 10));
            assert!(result.is_none());
            assert!(!sampler.is_measuring());
        }
    }

    #[test]
    fn power_exactly_at_threshold_does_not_start() {
        // 阈值判断为严格大于
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(2.0, 0.0, 4.0, 0)).is_none());
        assert!(!sampler.is_measuring());
    }

    #[test]
    fn qualifying_sample_starts_session() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none());
        assert!(sampler.is_measuring());
    }

    #[test]
    fn score_is_peak_over_window() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none()); // 25
        assert!(sampler.on_sample(&sample(3.0, 3.0, 3.0, 100)).is_none()); // 27，新峰值
        assert!(sampler.on_sample(&sample(1.0, 0.0, 0.0, 1500)).is_none()); // 窗口内的低力度样本

        let score = sampler
            .on_sample(&sample(0.5, 0.5, 0.0, 3001))
            .expect("window elapsed");
        assert_eq!(score.peak_power, 27.0);
        assert_eq!(score.started_at, 0);
        assert_eq!(score.completed_at, 3001);
        assert_eq!(score.samples_seen, 4);
        assert!(!sampler.is_measuring());
    }

    #[test]
    fn closing_sample_counts_toward_peak() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none());

        // 结束窗口的样本先计入峰值
        let score = sampler
            .on_sample(&sample(6.0, 0.0, 0.0, 3500))
            .expect("window elapsed");
        assert_eq!(score.peak_power, 36.0);
        assert_eq!(score.samples_seen, 2);
    }

    #[test]
    fn sample_at_window_boundary_does_not_complete() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none());
        assert!(sampler.on_sample(&sample(0.1, 0.0, 0.0, 3000)).is_none());
        assert!(sampler.is_measuring());
    }

    #[test]
    fn peak_is_monotonically_non_decreasing() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(7.0, 0.0, 0.0, 0)).is_none()); // 49
        assert!(sampler.on_sample(&sample(4.0, 0.0, 0.0, 500)).is_none()); // 16
        assert!(sampler.on_sample(&sample(2.0, 0.0, 0.0, 1000)).is_none()); // 4

        let score = sampler
            .on_sample(&sample(0.0, 0.0, 0.0, 3500))
            .expect("window elapsed");
        assert_eq!(score.peak_power, 49.0);
    }

    #[test]
    fn sampler_restarts_after_completion() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none());
        assert!(sampler.on_sample(&sample(0.0, 0.0, 0.0, 3100)).is_some());

        // 成绩输出后回到空闲，可以开始新一轮测量
        assert!(sampler.on_sample(&sample(0.0, 6.0, 0.0, 10_000)).is_none());
        assert!(sampler.is_measuring());
        let score = sampler
            .on_sample(&sample(0.0, 0.0, 0.0, 13_200))
            .expect("second window elapsed");
        assert_eq!(score.peak_power, 36.0);
        assert_eq!(score.started_at, 10_000);
    }

    #[test]
    fn reset_discards_active_session() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none());
        sampler.reset();
        assert!(!sampler.is_measuring());

        // 被丢弃的会话不会再产出成绩
        assert!(sampler.on_sample(&sample(0.1, 0.0, 0.0, 4000)).is_none());
        assert!(!sampler.is_measuring());
    }

    #[test]
    fn out_of_order_timestamp_keeps_session_open() {
        let mut sampler = PunchSampler::new(SamplerConfig::default());
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 1000)).is_none());

        // 时间戳回退的样本仍计入峰值，但不会结束窗口
        assert!(sampler.on_sample(&sample(6.0, 0.0, 0.0, 500)).is_none());
        assert!(sampler.is_measuring());

        let score = sampler
            .on_sample(&sample(0.0, 0.0, 0.0, 4100))
            .expect("window elapsed");
        assert_eq!(score.peak_power, 36.0);
    }

    #[test]
    fn window_length_is_configurable() {
        let mut sampler = PunchSampler::new(SamplerConfig {
            trigger_power: 20.0,
            window_ms: 5000,
        });
        assert!(sampler.on_sample(&sample(5.0, 0.0, 0.0, 0)).is_none());
        assert!(sampler.on_sample(&sample(0.0, 0.0, 0.0, 3001)).is_none());
        assert!(sampler.is_measuring());
        assert!(sampler.on_sample(&sample(0.0, 0.0, 0.0, 5001)).is_some());
    }
}
