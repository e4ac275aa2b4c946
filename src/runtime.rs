//! Async event loops for the display and classifier roles.
//!
//! Each loop runs on a single-threaded `edge-executor` driven by
//! `futures_lite::future::block_on`.  Timers come from `async-io-mini`
//! (reactor-driven, no busy-spinning), so a loop is parked until either
//! the inbox has work or its next deadline passes.
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────┐
//!  │  futures_lite::block_on                               │
//!  │  ┌─────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                   │  │
//!  │  │                                                 │  │
//!  │  │   inbox.receive()  ──or──  Timer::at(deadline)  │  │
//!  │  │          │                        │             │  │
//!  │  │          ▼                        ▼             │  │
//!  │  │     on_payload               on_tick(token)     │  │
//!  │  └─────────────────────────────────────────────────┘  │
//!  └───────────────────────────────────────────────────────┘
//! ```

use core::future::Future;
use std::time::{Duration, Instant};

use async_io_mini::Timer;
use futures_lite::future;
use log::{debug, info};

use crate::app::ports::{EventSink, RenderSink, TransportPort};
use crate::app::publisher::StatePublisher;
use crate::app::service::DisplayController;
use crate::classifier::DriveModeClassifier;
use crate::events::{Inbound, Inbox};
use crate::fsm::session::CancelToken;

/// What woke a loop.
enum Wake {
    Inbound(Inbound),
    Deadline,
}

/// Wait for the next inbox item, or for `deadline` if one is set.
async fn next_wake(inbox: &Inbox, deadline: Option<Instant>) -> Wake {
    let inbound = async { Wake::Inbound(inbox.receive().await) };
    match deadline {
        Some(at) => {
            let timer = async {
                Timer::at(at).await;
                Wake::Deadline
            };
            future::or(inbound, timer).await
        }
        None => inbound.await,
    }
}

/// Drive a [`DisplayController`] until [`Inbound::Shutdown`].
///
/// Messages on topics other than `mode_topic` are ignored.  The controller
/// must already be started.
pub async fn run_display(
    inbox: &Inbox,
    mode_topic: &str,
    controller: &mut DisplayController,
    render: &mut impl RenderSink,
    sink: &mut impl EventSink,
) {
    info!("Display loop running on {}", mode_topic);
    loop {
        let armed: Option<(Instant, CancelToken)> = controller.next_deadline();
        match next_wake(inbox, armed.map(|(at, _)| at)).await {
            Wake::Inbound(Inbound::Message { topic, payload }) => {
                if topic.as_str() != mode_topic {
                    debug!("Display ignoring message on {}", topic);
                    continue;
                }
                controller.on_payload(&payload, Instant::now(), render, sink);
            }
            Wake::Inbound(Inbound::Shutdown) => break,
            Wake::Deadline => {
                if let Some((_, token)) = armed {
                    controller.on_tick(token, Instant::now(), render, sink);
                }
            }
        }
    }
    info!("Display loop stopped");
}

/// Feed samples to a [`DriveModeClassifier`] and publish one decision per
/// `interval` until [`Inbound::Shutdown`].
pub async fn run_classifier(
    inbox: &Inbox,
    interval: Duration,
    classifier: &mut DriveModeClassifier,
    publisher: &StatePublisher,
    transport: &mut impl TransportPort,
    sink: &mut impl EventSink,
) {
    info!("Classifier loop running, analysing every {:?}", interval);
    let mut next_analysis = Instant::now() + interval;
    loop {
        match next_wake(inbox, Some(next_analysis)).await {
            Wake::Inbound(Inbound::Message { topic, payload }) => {
                classifier.on_message(&topic, &payload);
            }
            Wake::Inbound(Inbound::Shutdown) => break,
            Wake::Deadline => {
                next_analysis += interval;
                if let Some(decision) = classifier.analyze() {
                    // Failures are reported through the sink; keep running.
                    let _ = publisher.publish_state(
                        decision.state,
                        Some(decision.reason),
                        transport,
                        sink,
                    );
                }
            }
        }
    }
    info!("Classifier loop stopped");
}

/// Run `fut` to completion on a fresh local executor.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    future::block_on(executor.run(fut))
}
