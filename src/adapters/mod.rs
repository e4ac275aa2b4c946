//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `config_file`  | ConfigPort         | JSON file + environment  |
//! | `log_render`   | RenderSink         | Log output (headless)    |
//! | `log_sink`     | EventSink          | Log output               |
//! | `mqtt`         | TransportPort      | MQTT broker (rumqttc)    |
//! |                | drives MessageHandler | Connection event pump |

pub mod config_file;
pub mod log_render;
pub mod log_sink;
#[cfg(feature = "mqtt")]
pub mod mqtt;
