use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam_channel::Sender;
use dotenv::dotenv;
use log::{error, info, warn};
use rumqttc::{Client, Event, LastWill, MqttOptions, Packet, QoS};

use crate::config::MqttConfig;
use crate::types::AccelSample;

/// 将配置里的数字 QoS 映射为 rumqttc 的枚举
fn qos_from_config(qos: u8) -> QoS {
    match qos {
        0 => QoS::AtMostOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtLeastOnce,
    }
}

pub fn run_mqtt_source(
    config: MqttConfig,
    sample_sender: Arc<Sender<AccelSample>>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok(); // 加载 .env 文件

    // 账号口令只走环境变量，不进配置文件
    let mqtt_user = env::var("MQTT_USER")?;
    let mqtt_pass = env::var("MQTT_PASS")?;

    let mut mqtt_options = MqttOptions::new(
        config.client_id.clone(),
        config.broker.clone(),
        config.port,
    );

    mqtt_options
        .set_credentials(mqtt_user, mqtt_pass);

    mqtt_options
        .set_keep_alive(Duration::from_secs(config.keep_alive as u64))
        .set_last_will(LastWill::new(
            config.status_topic.as_str(),
            "offline",
            QoS::AtLeastOnce,
            false,
        ));

    let qos = qos_from_config(config.qos);
    let (client, mut connection) = Client::new(mqtt_options, 10);
    client.subscribe(config.topic.as_str(), qos)?;
    info!("Subscribed to {} on {}:{}", config.topic, config.broker, config.port);

    for event in connection.iter() {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT source received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == config.topic => {
                match parse_accel_sample(&publish.payload) {
                    Ok(sample) => {
                        if sample_sender.send(sample).is_err() {
                            // 通道断开表示发动机已退出，优雅收尾
                            info!("Sample channel disconnected, MQTT source exiting");
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid accelerometer payload: {}", e),
                }
            }
            // 非加速度主题的消息直接忽略
            Ok(Event::Incoming(_)) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                return Err(e.into());
            }
            _ => {}
        }
    }

    Ok(())
}

fn parse_accel_sample(payload: &[u8]) -> Result<AccelSample, String> {
    let payload_str = std::str::from_utf8(payload)
        .map_err(|e| format!("Invalid UTF-8: {}", e))?;

    serde_json::from_str::<AccelSample>(payload_str)
        .map_err(|e| format!("JSON parsing error: {}", e))
}
