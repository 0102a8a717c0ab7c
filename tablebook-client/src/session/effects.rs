//! Storage effect runner
//!
//! Effects run on one background task in the order they were queued, so a
//! logout queued after a login always wins on disk. Callers never wait on
//! storage; `flush` exists for the one place that must observe the result
//! (rehydration).

use tokio::sync::{mpsc, oneshot};

use super::AuthSession;
use super::store::SessionStore;

/// Storage work implied by a session transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    Persist(AuthSession),
    Clear,
}

enum Command {
    Run(SessionEffect),
    Flush(oneshot::Sender<()>),
}

/// Handle to the effect worker. The worker stops when the handle is dropped.
#[derive(Debug)]
pub struct EffectRunner {
    tx: mpsc::UnboundedSender<Command>,
}

impl EffectRunner {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(store: SessionStore) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Run(effect) => apply(&store, effect).await,
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("Session effect runner stopped");
        });

        Self { tx }
    }

    /// Queues an effect. Fire-and-forget.
    pub fn run(&self, effect: SessionEffect) {
        if self.tx.send(Command::Run(effect)).is_err() {
            tracing::warn!("Session effect runner is gone, dropping effect");
        }
    }

    /// Waits until every effect queued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn apply(store: &SessionStore, effect: SessionEffect) {
    match effect {
        SessionEffect::Persist(auth) => match store.save(&auth).await {
            Ok(()) => tracing::debug!(user_id = %auth.user.id, "Session persisted"),
            Err(e) => tracing::warn!(error = %e, "Failed to persist session"),
        },
        SessionEffect::Clear => match store.clear().await {
            Ok(()) => tracing::debug!("Persisted session cleared"),
            Err(e) => tracing::warn!(error = %e, "Failed to clear persisted session"),
        },
    }
}
