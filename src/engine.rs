use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info};

use crate::display::ScoreBoard;
use crate::sampler::PunchSampler;
use crate::types::AccelSample;
use crate::utils::format_timestamp;

/// 测量发动机：样本通道的唯一消费者
/// 样本逐条同步喂给采样器，窗口结束的成绩交给计分板

/// 当前所处阶段，用于状态提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnginePhase {
    Idle,
    Measuring,
}

pub struct MeasurementEngine {
    sample_receiver: Receiver<AccelSample>,
    sampler: PunchSampler,
    score_board: ScoreBoard,
    shutdown_signal: Arc<AtomicBool>,
    phase: EnginePhase,
    samples_processed: usize,
}

impl MeasurementEngine {
    pub fn new(
        sample_receiver: Receiver<AccelSample>,
        sampler: PunchSampler,
        score_board: ScoreBoard,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            sample_receiver,
            sampler,
            score_board,
            shutdown_signal,
            phase: EnginePhase::Idle,
            samples_processed: 0,
        }
    }

    /// 运行主循环，数据源断开或收到关闭信号后返回
    pub fn run(&mut self) {
        info!("Hold the device and throw a punch");

        loop {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!("Engine received shutdown signal, exiting");
                break;
            }

            match self.sample_receiver.recv_timeout(Duration::from_millis(200)) {
                Ok(sample) => self.handle_sample(sample),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Sample channel disconnected, engine exiting");
                    break;
                }
            }
        }

        // 退出时丢弃未完成的测量，等同于页面离开时直接注销监听
        if self.sampler.is_measuring() {
            self.sampler.reset();
            info!("Active measurement discarded");
        }
    }

    fn handle_sample(&mut self, sample: AccelSample) {
        self.samples_processed += 1;
        debug!(
            "ACC sample - x: {:.3}, y: {:.3}, z: {:.3}, time: {}",
            sample.x,
            sample.y,
            sample.z,
            format_timestamp(sample.timestamp)
        );

        let result = self.sampler.on_sample(&sample);

        // 进入测量窗口时提示一次
        if self.phase == EnginePhase::Idle && self.sampler.is_measuring() {
            self.phase = EnginePhase::Measuring;
            info!("Measuring punch power...");
        }

        if let Some(score) = result {
            // 测量完成，输出成绩后回到等待状态
            info!("Measurement complete: power {:.5}", score.peak_power);
            self.score_board.publish(&score);
            self.phase = EnginePhase::Idle;
            info!("Hold the device and throw a punch");
        }
    }

    /// 关停后输出本次运行的统计
    pub fn log_summary(&self) {
        info!(
            "Run summary: {} samples processed, {} punches scored",
            self.samples_processed,
            self.score_board.published()
        );
        if let Some(best) = self.score_board.best_points() {
            info!("Best score of this run: {:.0}", best);
        }
    }
}
