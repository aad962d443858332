use super::{Client, Config, Coordinator, Logs, Settings, SettingsBox, Worker};
use std::time::Duration;

/// Creates a new test configuration: loopback ephemeral ports and short timers.
pub fn new_test_config() -> Config {
    Settings {
        root: SettingsBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            coordinator: Coordinator {
                addr: "127.0.0.1:0".to_string(),
                probe_interval: Duration::from_millis(200),
                probe_timeout: Duration::from_millis(300),
                call_timeout: Duration::from_secs(2),
                dispatch_attempts: 3,
            },
            worker: Worker {
                addr: "127.0.0.1:0".to_string(),
                advertise: None,
                coordinator: "127.0.0.1:5000".to_string(),
                register_timeout: Duration::from_secs(2),
            },
            client: Client {
                coordinator: "127.0.0.1:5000".to_string(),
                rounds: 2,
                timeout: Duration::from_secs(5),
            },
        },
    }
}
