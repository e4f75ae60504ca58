use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use crossbeam_channel::Sender;
use log::info;
use rand::Rng;

use crate::config::SimulatorConfig;
use crate::types::AccelSample;
use crate::utils::now_millis;

/// 本地模拟数据源
/// 按固定采样率交替生成静息噪声和出拳脉冲，没有手机和 broker 也能跑通整条流水线

pub fn run_simulator(
    config: SimulatorConfig,
    sample_sender: Arc<Sender<AccelSample>>,
    shutdown_signal: Arc<AtomicBool>,
) {
    let mut rng = rand::rng();
    let interval_ms = (1000 / config.sample_rate_hz.max(1)).max(1) as u64;
    info!(
        "Simulator source started: {} punches at {} Hz",
        config.punch_count, config.sample_rate_hz
    );

    for punch in 0..config.punch_count {
        // 出拳脉冲：峰值样本加一段衰减
        for (x, y, z) in punch_burst(&mut rng) {
            if shutdown_signal.load(Ordering::Relaxed) {
                return;
            }
            if sample_sender
                .send(AccelSample::new(x, y, z, now_millis()))
                .is_err()
            {
                info!("Sample channel disconnected, simulator exiting");
                return;
            }
            thread::sleep(Duration::from_millis(interval_ms));
        }
        info!("Simulated punch {}/{}", punch + 1, config.punch_count);

        // 静息期持续到下一次出拳，让测量窗口自然结束
        let idle_samples = config.punch_interval_ms / interval_ms;
        for _ in 0..idle_samples {
            if shutdown_signal.load(Ordering::Relaxed) {
                return;
            }
            let (x, y, z) = idle_noise(&mut rng);
            if sample_sender
                .send(AccelSample::new(x, y, z, now_millis()))
                .is_err()
            {
                info!("Sample channel disconnected, simulator exiting");
                return;
            }
            thread::sleep(Duration::from_millis(interval_ms));
        }
    }

    info!("Simulator source finished");
}

/// 静息噪声，力度远低于触发阈值
fn idle_noise<R: Rng>(rng: &mut R) -> (f64, f64, f64) {
    (
        rng.random_range(-0.5..0.5),
        rng.random_range(-0.5..0.5),
        rng.random_range(-0.5..0.5),
    )
}

/// 出拳脉冲波形，主轴力度保证平方和超过触发阈值
fn punch_burst<R: Rng>(rng: &mut R) -> Vec<(f64, f64, f64)> {
    let peak = rng.random_range(8.0..15.0);
    let mut burst = vec![(
        peak,
        rng.random_range(-2.0..2.0),
        rng.random_range(-2.0..2.0),
    )];

    let mut amplitude = peak;
    while amplitude > 1.0 {
        amplitude *= 0.5;
        burst.push((amplitude, 0.0, rng.random_range(-1.0..1.0)));
    }

    burst
}
