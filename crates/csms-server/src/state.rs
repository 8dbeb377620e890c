use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub event_tx: broadcast::Sender<()>,
    /// Held across every mutating handler so writes are applied one at a time.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(64);
        let state = Self {
            root,
            event_tx: tx.clone(),
            write_lock: Arc::new(Mutex::new(())),
        };

        // Every store write bumps .csms/state.yaml, so polling its mtime also
        // picks up changes made through the CLI.
        if tokio::runtime::Handle::try_current().is_ok() {
            let state_file = csms_core::paths::state_path(&state.root);
            tokio::spawn(async move {
                let mut last_mtime = None::<std::time::SystemTime>;
                loop {
                    tokio::time::sleep(std::time::Duration::from_millis(800)).await;
                    if let Ok(meta) = tokio::fs::metadata(&state_file).await {
                        if let Ok(mtime) = meta.modified() {
                            if last_mtime != Some(mtime) {
                                last_mtime = Some(mtime);
                                let _ = tx.send(());
                            }
                        }
                    }
                }
            });
        }

        state
    }
}
