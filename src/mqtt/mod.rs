pub mod client;

pub use client::run_mqtt_source;
