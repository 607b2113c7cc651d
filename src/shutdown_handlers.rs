use tracing::warn;

use crate::shutdown::StopSignal;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Triggers `cancel` on Ctrl-C or SIGTERM.
///
/// The task exits on its own once `cancel` fires for any other reason.
pub fn setup_signal_shutdown_handler(cancel: &StopSignal) -> tokio::task::JoinHandle<()> {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = cancel.triggered() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, cancelling the run.");
                    cancel.trigger();
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    warn!("Terminated, cancelling the run.");
                    cancel.trigger();
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = cancel.triggered() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, cancelling the run.");
                    cancel.trigger();
                }
            }
        }
    })
}
