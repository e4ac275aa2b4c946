//! MQTT broker adapter (`rumqttc` sync client).
//!
//! Implements [`TransportPort`] for outbound notifications and runs the
//! connection event pump that feeds inbound publishes to a
//! [`MessageHandler`].
//!
//! ```text
//!  TransportPort::publish ──▶ Client ──▶ request queue ──┐
//!                                                        ▼
//!                                         ┌──────────────────────────┐
//!  MessageHandler::on_message ◀── pump ◀──│ Connection (event loop)  │◀──▶ broker
//!                                         └──────────────────────────┘
//! ```
//!
//! Two usage shapes:
//! - [`connect`] + [`spawn_pump`]: long-running roles.  The pump thread
//!   owns the connection, re-subscribes after every (re)connect, and gives
//!   up after [`MAX_CONSECUTIVE_FAILURES`].
//! - [`OneShotPublisher`]: publish, wait for the broker's ack, disconnect.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};
use rumqttc::{Client, Connection, Event, MqttOptions, Outgoing, Packet, QoS};

use crate::app::ports::{MessageHandler, TransportPort};
use crate::config::BrokerConfig;
use crate::error::TransportError;

/// Consecutive connection errors tolerated before the pump stops.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Pause between reconnect attempts.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

fn options(broker: &BrokerConfig, role: &str) -> MqttOptions {
    let client_id = format!("{}-{}-{}", broker.client_id_prefix, role, std::process::id());
    let mut opts = MqttOptions::new(client_id, broker.host.clone(), broker.port);
    opts.set_keep_alive(Duration::from_secs(u64::from(broker.keep_alive_secs)));
    opts
}

// ───────────────────────────────────────────────────────────────
// Long-running client
// ───────────────────────────────────────────────────────────────

/// Outbound half of a broker session.  Cheap to clone.
#[derive(Clone)]
pub struct MqttTransport {
    client: Client,
}

impl TransportPort for MqttTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload.to_vec())
            .map_err(|e| {
                warn!("MQTT: publish on {} not queued: {}", topic, e);
                TransportError::Publish
            })
    }
}

/// Create a client for `role`.  Nothing touches the network until the
/// returned [`Connection`] is driven.
pub fn connect(broker: &BrokerConfig, role: &str) -> (MqttTransport, Connection) {
    let (client, connection) = Client::new(options(broker, role), broker.channel_capacity);
    info!("MQTT: client for {} targeting {}:{}", role, broker.host, broker.port);
    (MqttTransport { client }, connection)
}

/// Drive `connection` on a dedicated thread until it fails for good.
///
/// Every inbound publish goes to `handler`.  After each ConnAck the pump
/// (re)subscribes to `topics`; a rejected subscription ends the pump.
/// `handler.on_disconnect()` runs once on exit.
pub fn spawn_pump<H>(
    transport: &MqttTransport,
    mut connection: Connection,
    topics: Vec<String>,
    mut handler: H,
) -> Result<JoinHandle<()>, TransportError>
where
    H: MessageHandler + Send + 'static,
{
    let client = transport.client.clone();
    thread::Builder::new()
        .name("mqtt-pump".into())
        .spawn(move || {
            if let Err(e) = pump(&client, &mut connection, &topics, &mut handler) {
                error!("MQTT: pump stopped: {}", e);
            }
            handler.on_disconnect();
        })
        .map_err(|_| TransportError::Connect)
}

fn pump(
    client: &Client,
    connection: &mut Connection,
    topics: &[String],
    handler: &mut impl MessageHandler,
) -> Result<(), TransportError> {
    let mut failures = 0u32;
    for notification in connection.iter() {
        match notification {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                failures = 0;
                info!("MQTT: connected");
                for topic in topics {
                    if let Err(e) = client.try_subscribe(topic.as_str(), QoS::AtLeastOnce) {
                        warn!("MQTT: subscribe to {} failed: {}", topic, e);
                        return Err(TransportError::Subscribe);
                    }
                    info!("MQTT: subscribed to {}", topic);
                }
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                debug!("MQTT: suback {:?}", ack.return_codes);
            }
            Ok(Event::Incoming(Packet::Publish(p))) => {
                handler.on_message(&p.topic, &p.payload);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                info!("MQTT: disconnect requested");
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => {
                failures += 1;
                warn!(
                    "MQTT: connection error ({}/{}): {}",
                    failures, MAX_CONSECUTIVE_FAILURES, e
                );
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err(TransportError::Disconnected);
                }
                thread::sleep(RECONNECT_BACKOFF);
            }
        }
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// One-shot publisher
// ───────────────────────────────────────────────────────────────

/// Publishes on its own short-lived connection.  Each publish blocks until
/// the broker acknowledges it or the connection fails.
pub struct OneShotPublisher {
    client: Client,
    connection: Connection,
}

impl OneShotPublisher {
    pub fn new(broker: &BrokerConfig) -> Self {
        let (client, connection) = Client::new(options(broker, "publish"), broker.channel_capacity);
        Self { client, connection }
    }

    /// Close the session cleanly.
    pub fn disconnect(mut self) {
        if self.client.disconnect().is_err() {
            return;
        }
        for notification in self.connection.iter() {
            match notification {
                Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }
}

impl TransportPort for OneShotPublisher {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload.to_vec())
            .map_err(|_| TransportError::Publish)?;
        for notification in self.connection.iter() {
            match notification {
                Ok(Event::Incoming(Packet::PubAck(_))) => return Ok(()),
                Ok(_) => {}
                Err(e) => {
                    warn!("MQTT: publish connection failed: {}", e);
                    return Err(TransportError::Connect);
                }
            }
        }
        Err(TransportError::Disconnected)
    }
}
