//! Real-time driver: one task owns the [`Session`] and serializes the clock
//! tick, manual purchases and notification expiry onto a single queue.

use crate::session::{PurchaseReceipt, Session};
use crate::view::SessionView;
use farm_core::FarmError;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

const COMMAND_QUEUE: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("session task is no longer running")]
    SessionClosed,
    #[error(transparent)]
    Farm(#[from] FarmError),
}

enum Command {
    BuySeed {
        produce_id: String,
        quantity: u32,
        reply: oneshot::Sender<Result<PurchaseReceipt, FarmError>>,
    },
    View {
        reply: oneshot::Sender<SessionView>,
    },
    Shutdown,
}

/// Cloneable async front door to a running session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn buy_seed(
        &self,
        produce_id: &str,
        quantity: u32,
    ) -> Result<PurchaseReceipt, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::BuySeed {
            produce_id: produce_id.to_string(),
            quantity,
            reply,
        })
        .await?;
        Ok(rx.await.map_err(|_| DriverError::SessionClosed)??)
    }

    pub async fn view(&self) -> Result<SessionView, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::View { reply }).await?;
        rx.await.map_err(|_| DriverError::SessionClosed)
    }

    /// Ask the task to stop; it hands the session back through its join handle.
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, cmd: Command) -> Result<(), DriverError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| DriverError::SessionClosed)
    }
}

/// Move `session` onto its own task. The task ends on shutdown or once
/// every handle is dropped, returning the session.
pub fn spawn(session: Session) -> (SessionHandle, JoinHandle<Session>) {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let task = tokio::spawn(run(session, rx));
    (SessionHandle { tx }, task)
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn run(mut session: Session, mut rx: mpsc::Receiver<Command>) -> Session {
    let period = session.tick_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(?period, day = session.day(), "farm driver started");

    loop {
        let expiry = session.notification_expiry().map(Instant::from_std);
        tokio::select! {
            _ = ticker.tick() => {
                session.tick(now());
            }
            cmd = rx.recv() => match cmd {
                Some(Command::BuySeed { produce_id, quantity, reply }) => {
                    let result = session.buy_seed(&produce_id, quantity, now());
                    let _ = reply.send(result);
                }
                Some(Command::View { reply }) => {
                    let _ = reply.send(session.view(now()));
                }
                Some(Command::Shutdown) | None => break,
            },
            _ = time::sleep_until(expiry.unwrap_or_else(Instant::now)), if expiry.is_some() => {
                if session.expire_notification(now()) {
                    debug!("notification expired");
                }
            }
        }
    }

    info!(day = session.day(), cash = session.cash(), "farm driver stopped");
    session
}
