//! Notice board: the daemon's notification surface
//!
//! Everything the scheduler shows is logged and kept on an in-memory board
//! that the HTTP API reads. Prompt answers and progress cancellation come back
//! in through the API, never through this type.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::scheduler::{
    CancellationToken, NotificationSurface, ProgressId, PromptId, ReminderAction, StatusHandle,
    StatusLifetime,
};

/// Number of recent messages kept on the board
const MAX_MESSAGES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Info,
}

/// A warning still waiting for an answer
#[derive(Debug, Clone, Serialize)]
pub struct PromptNotice {
    pub id: PromptId,
    pub text: String,
    pub actions: Vec<String>,
    pub shown_at: DateTime<Utc>,
}

/// A progress session that has not been resolved yet
#[derive(Debug, Clone, Serialize)]
pub struct ProgressNotice {
    pub id: ProgressId,
    pub title: String,
    pub percent: f64,
    pub message: String,
    pub cancel_requested: bool,
    #[serde(skip)]
    token: CancellationToken,
}

#[derive(Debug, Clone)]
struct StatusNotice {
    handle: StatusHandle,
    text: String,
    expires: Option<Instant>,
}

impl StatusNotice {
    fn is_visible(&self, now: Instant) -> bool {
        self.expires.map_or(true, |expires| now < expires)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageNotice {
    pub level: NoticeLevel,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Serializable view of the board
#[derive(Debug, Clone, Serialize)]
pub struct NoticeSnapshot {
    pub prompt: Option<PromptNotice>,
    pub progress: Option<ProgressNotice>,
    pub status_texts: Vec<String>,
    pub messages: Vec<MessageNotice>,
}

#[derive(Debug, Default)]
struct Board {
    next_id: u64,
    prompt: Option<PromptNotice>,
    progress: Option<ProgressNotice>,
    statuses: Vec<StatusNotice>,
    messages: VecDeque<MessageNotice>,
}

impl Board {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push_message(&mut self, level: NoticeLevel, text: &str) {
        if self.messages.len() == MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(MessageNotice {
            level,
            text: text.to_string(),
            at: Utc::now(),
        });
    }
}

/// Shared handle to the notice board
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    board: Arc<Mutex<Board>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Board>, String> {
        self.board
            .lock()
            .map_err(|e| format!("Failed to lock notice board: {}", e))
    }

    /// Lock for a surface call; a poisoned board is still written to
    fn lock_for_surface(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(|poisoned| {
            warn!("Notice board lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn snapshot(&self) -> Result<NoticeSnapshot, String> {
        let board = self.lock()?;
        let now = Instant::now();

        Ok(NoticeSnapshot {
            prompt: board.prompt.clone(),
            progress: board.progress.clone(),
            status_texts: board
                .statuses
                .iter()
                .filter(|status| status.is_visible(now))
                .map(|status| status.text.clone())
                .collect(),
            messages: board.messages.iter().cloned().collect(),
        })
    }

    /// Remove the pending prompt so it can be answered exactly once
    pub fn take_prompt(&self) -> Result<Option<PromptId>, String> {
        Ok(self.lock()?.prompt.take().map(|prompt| prompt.id))
    }

    /// Request cancellation of the live progress session
    pub fn cancel_progress(&self) -> Result<Option<ProgressId>, String> {
        let mut board = self.lock()?;
        Ok(board.progress.as_mut().map(|progress| {
            progress.token.cancel();
            progress.cancel_requested = true;
            progress.id
        }))
    }
}

impl NotificationSurface for NoticeBoard {
    fn show_warning(&mut self, text: &str, actions: &[ReminderAction]) -> PromptId {
        warn!("{}", text);
        let mut board = self.lock_for_surface();
        let id = PromptId(board.next_id());

        board.prompt = Some(PromptNotice {
            id,
            text: text.to_string(),
            actions: actions.iter().map(|action| action.label().to_string()).collect(),
            shown_at: Utc::now(),
        });
        board.push_message(NoticeLevel::Warning, text);
        id
    }

    fn retract_warning(&mut self, prompt: PromptId) {
        let mut board = self.lock_for_surface();
        if board.prompt.as_ref().is_some_and(|pending| pending.id == prompt) {
            board.prompt = None;
        }
    }

    fn show_info(&mut self, text: &str) {
        info!("{}", text);
        self.lock_for_surface().push_message(NoticeLevel::Info, text);
    }

    fn set_status_text(&mut self, text: &str, lifetime: StatusLifetime) -> StatusHandle {
        let mut board = self.lock_for_surface();
        let now = Instant::now();
        board.statuses.retain(|status| status.is_visible(now));

        let handle = StatusHandle(board.next_id());
        let expires = match lifetime {
            StatusLifetime::Persistent => None,
            StatusLifetime::Transient(duration) => Some(now + duration),
        };
        board.statuses.push(StatusNotice {
            handle,
            text: text.to_string(),
            expires,
        });
        handle
    }

    fn dispose_status(&mut self, handle: StatusHandle) {
        self.lock_for_surface()
            .statuses
            .retain(|status| status.handle != handle);
    }

    fn begin_progress(&mut self, title: &str, token: CancellationToken) -> ProgressId {
        info!("{}", title);
        let mut board = self.lock_for_surface();
        let id = ProgressId(board.next_id());

        board.progress = Some(ProgressNotice {
            id,
            title: title.to_string(),
            percent: 0.0,
            message: String::new(),
            cancel_requested: false,
            token,
        });
        id
    }

    fn report_progress(&mut self, progress: ProgressId, increment: f64, message: &str) {
        let mut board = self.lock_for_surface();
        if let Some(notice) = board.progress.as_mut().filter(|notice| notice.id == progress) {
            notice.percent = (notice.percent + increment).min(100.0);
            notice.message = message.to_string();
        }
    }

    fn resolve_progress(&mut self, progress: ProgressId) {
        let mut board = self.lock_for_surface();
        if board.progress.as_ref().is_some_and(|notice| notice.id == progress) {
            board.progress = None;
        }
    }
}
