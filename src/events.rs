//! Inbound event queue.
//!
//! Events are produced by:
//! - the broker connection pump (one [`Inbound::Message`] per publish)
//! - the binary or a test harness ([`Inbound::Shutdown`])
//!
//! Events are consumed by the display or classifier loop, one at a time
//! in arrival order.
//!
//! ```text
//! ┌──────────────┐  Inbound  ┌──────────────┐  Inbound  ┌──────────────┐
//! │ Broker pump  │──────────▶│    Inbox     │──────────▶│  Async loop  │
//! │  (thread)    │           │  (bounded)   │           │  (consumer)  │
//! └──────────────┘           └──────────────┘           └──────────────┘
//! ```
//!
//! The producer blocks when the inbox is full, which pushes back on the
//! broker connection instead of silently losing notifications.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::{String, Vec};
use log::warn;

use crate::app::ports::MessageHandler;
use crate::decoder::MAX_PAYLOAD;

/// Longest topic name carried through the inbox.
pub const MAX_TOPIC: usize = 128;

/// Inbox depth.
pub const INBOX_DEPTH: usize = 32;

/// One unit of work for an async loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A message received from the broker.
    Message {
        topic: String<MAX_TOPIC>,
        payload: Vec<u8, MAX_PAYLOAD>,
    },
    /// Stop the consumer loop.
    Shutdown,
}

impl Inbound {
    /// Copy a broker message into fixed-capacity buffers.  `None` when the
    /// topic or payload does not fit.
    pub fn message(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut t = String::new();
        t.push_str(topic).ok()?;
        let p = Vec::from_slice(payload).ok()?;
        Some(Self::Message {
            topic: t,
            payload: p,
        })
    }
}

/// Bounded MPMC queue between the broker pump and an async loop.
pub type Inbox = Channel<CriticalSectionRawMutex, Inbound, INBOX_DEPTH>;

/// [`MessageHandler`] that forwards every message into an [`Inbox`].
///
/// Runs on the producer thread.  Oversized messages are logged and
/// dropped; everything else waits for space.
pub struct InboxHandler<'a> {
    inbox: &'a Inbox,
}

impl<'a> InboxHandler<'a> {
    pub fn new(inbox: &'a Inbox) -> Self {
        Self { inbox }
    }
}

impl MessageHandler for InboxHandler<'_> {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        match Inbound::message(topic, payload) {
            Some(msg) => futures_lite::future::block_on(self.inbox.send(msg)),
            None => warn!(
                "Dropping {}-byte message on {}: exceeds inbox buffers",
                payload.len(),
                topic
            ),
        }
    }

    fn on_disconnect(&mut self) {
        futures_lite::future::block_on(self.inbox.send(Inbound::Shutdown));
    }
}
