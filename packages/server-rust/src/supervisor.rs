//! Process supervision: run the listener and the signal watcher side by side
//! and stop at whichever finishes first.
//!
//! Both tasks push exactly one [`FatalTrigger`] into a single-slot channel.
//! The supervisor takes the first, aborts the other task, and returns the
//! trigger for the caller to log. In-flight requests are not drained.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::network::LifecycleController;

/// OS termination signal that ends the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// SIGINT / ctrl-c.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("interrupt"),
            Self::Terminate => f.write_str("terminated"),
        }
    }
}

/// Event that ends supervision. Every variant is fatal; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum FatalTrigger {
    #[error("{0}")]
    Signal(TerminationSignal),
    #[error("listener: {0:#}")]
    Listener(anyhow::Error),
    #[error("install signal handler: {0}")]
    SignalHandler(#[source] std::io::Error),
}

/// Races the listener against the signal watcher.
pub struct Supervisor {
    lifecycle: Arc<LifecycleController>,
}

impl Supervisor {
    #[must_use]
    pub fn new(lifecycle: Arc<LifecycleController>) -> Self {
        Self { lifecycle }
    }

    /// Spawns `listener` and `signals` as tasks and waits for the first to finish.
    ///
    /// A listener that returns `Ok(())` is still a fault: it is expected to
    /// serve forever. On return the lifecycle is `Stopped` and both tasks
    /// have been aborted.
    pub async fn run<L, W>(self, listener: L, signals: W) -> FatalTrigger
    where
        L: Future<Output = anyhow::Result<()>> + Send + 'static,
        W: Future<Output = FatalTrigger> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<FatalTrigger>(1);

        let signal_tx = tx.clone();
        let signal_task = tokio::spawn(async move {
            let _ = signal_tx.send(signals.await).await;
        });

        let listener_task = tokio::spawn(async move {
            let trigger = match listener.await {
                Ok(()) => FatalTrigger::Listener(anyhow::anyhow!("listener exited")),
                Err(err) => FatalTrigger::Listener(err),
            };
            let _ = tx.send(trigger).await;
        });

        // None only if both tasks died (panicked) without reporting.
        let trigger = rx.recv().await.unwrap_or_else(|| {
            FatalTrigger::Listener(anyhow::anyhow!("supervised tasks exited without reporting"))
        });

        debug!(trigger = %trigger, "fatal trigger received, shutting down");
        self.lifecycle.begin_shutdown();

        signal_task.abort();
        listener_task.abort();
        debug!("supervised tasks aborted");

        self.lifecycle.set_stopped();
        trigger
    }
}

/// Waits for SIGINT or SIGTERM (ctrl-c only on non-unix targets).
pub async fn wait_for_termination() -> FatalTrigger {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut interrupt = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(err) => return FatalTrigger::SignalHandler(err),
        };
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(err) => return FatalTrigger::SignalHandler(err),
        };

        tokio::select! {
            _ = interrupt.recv() => FatalTrigger::Signal(TerminationSignal::Interrupt),
            _ = terminate.recv() => FatalTrigger::Signal(TerminationSignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => FatalTrigger::Signal(TerminationSignal::Interrupt),
            Err(err) => FatalTrigger::SignalHandler(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;
    use crate::network::LifecycleState;

    #[test]
    fn signal_display_names() {
        assert_eq!(TerminationSignal::Interrupt.to_string(), "interrupt");
        assert_eq!(
            FatalTrigger::Signal(TerminationSignal::Terminate).to_string(),
            "terminated"
        );
    }

    #[tokio::test]
    async fn signal_wins_over_idle_listener() {
        let lifecycle = Arc::new(LifecycleController::new());
        let (fire, fired) = oneshot::channel::<()>();

        let listener = std::future::pending::<anyhow::Result<()>>();
        let signals = async move {
            let _ = fired.await;
            FatalTrigger::Signal(TerminationSignal::Terminate)
        };

        let run = tokio::spawn(Supervisor::new(Arc::clone(&lifecycle)).run(listener, signals));
        fire.send(()).unwrap();

        let trigger = tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .expect("supervisor should stop promptly")
            .unwrap();
        assert!(matches!(
            trigger,
            FatalTrigger::Signal(TerminationSignal::Terminate)
        ));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn listener_fault_wins_over_waiting_signal() {
        let lifecycle = Arc::new(LifecycleController::new());
        let listener = async { Err(anyhow::anyhow!("address in use")) };
        let signals = std::future::pending::<FatalTrigger>();

        let trigger = Supervisor::new(Arc::clone(&lifecycle))
            .run(listener, signals)
            .await;

        match trigger {
            FatalTrigger::Listener(err) => assert_eq!(err.to_string(), "address in use"),
            other => panic!("unexpected trigger: {other}"),
        }
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn clean_listener_exit_is_still_fatal() {
        let trigger = Supervisor::new(Arc::new(LifecycleController::new()))
            .run(async { Ok(()) }, std::future::pending::<FatalTrigger>())
            .await;
        assert!(matches!(trigger, FatalTrigger::Listener(_)));
    }

    #[tokio::test]
    async fn shutdown_cancels_request_tokens() {
        let lifecycle = Arc::new(LifecycleController::new());
        let token = lifecycle.child_token();

        let _ = Supervisor::new(Arc::clone(&lifecycle))
            .run(
                std::future::pending::<anyhow::Result<()>>(),
                async { FatalTrigger::Signal(TerminationSignal::Interrupt) },
            )
            .await;

        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn losing_task_is_aborted() {
        let (_keep, never) = oneshot::channel::<()>();
        let (dropped_tx, dropped_rx) = oneshot::channel::<()>();

        // Sends on drop, i.e. when the listener task is aborted.
        struct NotifyOnDrop(Option<oneshot::Sender<()>>);
        impl Drop for NotifyOnDrop {
            fn drop(&mut self) {
                if let Some(tx) = self.0.take() {
                    let _ = tx.send(());
                }
            }
        }

        let guard = NotifyOnDrop(Some(dropped_tx));
        let listener = async move {
            let _guard = guard;
            let _ = never.await;
            Ok(())
        };

        let _ = Supervisor::new(Arc::new(LifecycleController::new()))
            .run(listener, async {
                FatalTrigger::Signal(TerminationSignal::Interrupt)
            })
            .await;

        tokio::time::timeout(Duration::from_secs(2), dropped_rx)
            .await
            .expect("listener task should be aborted")
            .unwrap();
    }
}
