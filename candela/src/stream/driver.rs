//! Session driver: performs the state machine's actions against the real
//! store, connector, and output channel.

use std::collections::VecDeque;
use std::sync::Arc;

use candela_core::connector::ExchangeConnector;
use tokio::sync::{mpsc, watch};

use super::message::StreamMessage;
use super::sm::{Action, Event, Session};
use crate::engine::ReconciliationEngine;

/// Drive one session to a terminal phase.
///
/// Every await is raced against the stop signal and (for non-emit work) the
/// downstream channel closing, so cancellation is observed between chunks
/// and between per-gap fetches; the in-flight future is simply dropped.
/// Emission on the bounded channel doubles as the acknowledgement: the next
/// chunk is not reconciled until the previous send completes.
pub(crate) async fn run_session(
    engine: ReconciliationEngine,
    connector: Arc<dyn ExchangeConnector>,
    tx: mpsc::Sender<StreamMessage>,
    mut stop_rx: watch::Receiver<bool>,
    session: Session,
) {
    let (mut session, actions) = session.handle(Event::Started);
    let mut queue: VecDeque<Action> = actions.into();

    while let Some(action) = queue.pop_front() {
        let event = match action {
            Action::Stop => break,
            Action::CheckAvailability => {
                tokio::select! {
                    _ = stop_rx.changed() => Event::CancelRequested,
                    () = async {}, if *stop_rx.borrow() => Event::CancelRequested,
                    () = tx.closed() => Event::DownstreamClosed,
                    res = connector.check_availability(&session.coin) => match res {
                        Ok(true) => Event::AvailabilityConfirmed,
                        Ok(false) => Event::AvailabilityDenied,
                        Err(e) => Event::AvailabilityFailed(e),
                    },
                }
            }
            Action::Reconcile { start, end } => {
                tokio::select! {
                    _ = stop_rx.changed() => Event::CancelRequested,
                    () = async {}, if *stop_rx.borrow() => Event::CancelRequested,
                    () = tx.closed() => Event::DownstreamClosed,
                    res = engine.reconcile(&session.exchange, &session.coin, start, end) => match res {
                        Ok(result) => Event::ChunkReady(result),
                        Err(e) => Event::ChunkFailed(e),
                    },
                }
            }
            Action::Emit(msg) => {
                // `send` fails as soon as the receiver is gone; no separate
                // closed() branch is needed here.
                tokio::select! {
                    _ = stop_rx.changed() => Event::CancelRequested,
                    () = async {}, if *stop_rx.borrow() => Event::CancelRequested,
                    res = tx.send(msg) => match res {
                        Ok(()) => Event::EmitAccepted,
                        Err(_) => Event::DownstreamClosed,
                    },
                }
            }
        };

        let (next, actions) = session.handle(event);
        session = next;
        queue.extend(actions);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        exchange = %session.exchange,
        coin = %session.coin,
        phase = ?session.phase,
        "streaming session finished"
    );
}
