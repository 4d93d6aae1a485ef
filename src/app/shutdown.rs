//! Ctrl-C handling.

use log::warn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` when the process receives Ctrl-C.
///
/// In-flight requests whose contexts derive from `cancel` are abandoned and
/// finish with `Error::Cancelled`. The watcher stops by itself once `cancel`
/// is cancelled for any other reason.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        warn!("Interrupted, cancelling in-flight requests");
                        cancel.cancel();
                    }
                    Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
                }
            }
            _ = cancel.cancelled() => {}
        }
    })
}

/// Stops the Ctrl-C watcher.
pub async fn shutdown_gracefully(cancel: CancellationToken, watcher: JoinHandle<()>) {
    cancel.cancel();
    let _ = watcher.await;
}
