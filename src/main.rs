mod config;
mod display;
mod engine;
mod logger;
mod mqtt;
mod sampler;
mod simulator;
mod types;
mod utils;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use crossbeam_channel::bounded;
use log::{error, info, warn};

use config::{ConfigManager, SourceMode};
use display::ScoreBoard;
use engine::MeasurementEngine;
use sampler::{PunchSampler, SamplerConfig};

const CONFIG_PATH: &str = "punchpower.toml";

fn main() {
    logger::init_logger();
    info!("Application starting");

    // 加载配置文件，缺失或非法时退回默认配置
    let config_manager = match ConfigManager::load_from_file(CONFIG_PATH) {
        Ok(manager) => {
            info!("Loaded configuration from {}", CONFIG_PATH);
            manager
        }
        Err(e) => {
            warn!("Using default configuration ({})", e);
            ConfigManager::new()
        }
    };
    let config = config_manager.get_config().clone();

    let (sample_sender, sample_receiver) = bounded(config.channels.sample_channel_capacity);
    let sample_sender = Arc::new(sample_sender);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    // 根据配置选择数据源：手机经 MQTT 推送，或本地模拟器
    let source_sender = Arc::clone(&sample_sender);
    let source_shutdown = Arc::clone(&shutdown_signal);
    let source_handle = match config.source.mode {
        SourceMode::Mqtt => {
            let mqtt_config = config.mqtt.clone();
            thread::spawn(move || {
                if let Err(e) = mqtt::run_mqtt_source(mqtt_config, source_sender, source_shutdown) {
                    error!("MQTT source thread failed: {}", e);
                }
            })
        }
        SourceMode::Simulator => {
            let sim_config = config.simulator.clone();
            thread::spawn(move || {
                simulator::run_simulator(sim_config, source_sender, source_shutdown);
            })
        }
    };

    // 释放主线程持有的发送端，数据源退出后通道才能断开
    drop(sample_sender);

    let sampler = PunchSampler::new(SamplerConfig {
        trigger_power: config.measurement.trigger_power,
        window_ms: config.measurement.window_ms,
    });
    let score_board = ScoreBoard::new(config.display.clone());
    let mut engine = MeasurementEngine::new(
        sample_receiver,
        sampler,
        score_board,
        Arc::clone(&shutdown_signal),
    );

    // 发动机在主线程上运行，数据源断开后返回
    engine.run();

    // 通知数据源线程收尾
    info!("Engine stopped, signaling source thread to shutdown");
    shutdown_signal.store(true, Ordering::Relaxed);

    match source_handle.join() {
        Ok(()) => info!("Source thread shut down gracefully"),
        Err(e) => error!("Source thread panicked: {:?}", e),
    }

    engine.log_summary();
}
