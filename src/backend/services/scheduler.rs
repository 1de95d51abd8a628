// src/backend/services/scheduler.rs
// Periodic maintenance for an open editor: the idle watchdog.

use crate::services::editor_service::EditorSession;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Outcome of a single watchdog tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleCheck {
    StillActive,
    Locked,
    /// The editor was dropped or its lock poisoned; the watchdog stops.
    Gone,
}

/// Runs one idle check against the editor, if it is still alive.
pub fn check_idle(editor: &Weak<Mutex<EditorSession>>) -> IdleCheck {
    let Some(editor) = editor.upgrade() else {
        return IdleCheck::Gone;
    };
    let Ok(mut session) = editor.lock() else {
        tracing::warn!("⚙️ SCHEDULER: editor lock poisoned, stopping idle watchdog");
        return IdleCheck::Gone;
    };
    if session.poll_idle() {
        tracing::info!("⚙️ SCHEDULER: editor locked after inactivity");
        IdleCheck::Locked
    } else {
        IdleCheck::StillActive
    }
}

/// Polls the editor every `every` and locks it once the idle timeout passes.
///
/// Only a weak reference is held, so dropping the last `Arc` ends the task.
/// Abort the handle to stop it earlier.
pub fn spawn_idle_watchdog(editor: &Arc<Mutex<EditorSession>>, every: Duration) -> JoinHandle<()> {
    let editor = Arc::downgrade(editor);
    let every = every.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if check_idle(&editor) == IdleCheck::Gone {
                break;
            }
        }
    })
}
