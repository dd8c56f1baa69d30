//! Handle types owned by the scheduler

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Identifies one armed timer; a fired timer reports the handle it was armed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Identifies one status-bar text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusHandle(pub u64);

/// Identifies one warning prompt; its answer comes back tagged with this id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptId(pub u64);

/// Identifies one cancellable progress session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressId(pub u64);

/// A live progress session: its surface id, cancellation token and the
/// cumulative percentage reported so far
#[derive(Debug, Clone)]
pub struct ProgressSession {
    pub id: ProgressId,
    pub token: CancellationToken,
    pub reported_percent: f64,
}

impl ProgressSession {
    pub fn new(id: ProgressId, token: CancellationToken) -> Self {
        Self {
            id,
            token,
            reported_percent: 0.0,
        }
    }
}
