//! Last-delivery-outcome signal
//!
//! The admin surface (an external collaborator) renders the most recent
//! delivery outcome as a one-shot notice. The board keeps one success and one
//! error slot, each valid for thirty seconds and cleared on read. Slots are
//! last-write-wins: a second delivery may overwrite an unread notice.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::dispatch::outcome::DeliveryResult;

/// How long a posted notice stays readable
pub const NOTICE_TTL: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct Slot {
    text: String,
    posted_at: Instant,
}

/// One-shot success/error notice board
#[derive(Debug, Default)]
pub struct NoticeBoard {
    success: Mutex<Option<Slot>>,
    error: Mutex<Option<Slot>>,
}

impl NoticeBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a success notice
    pub fn post_success(&self, text: impl Into<String>) {
        *self.success.lock() = Some(Slot {
            text: text.into(),
            posted_at: Instant::now(),
        });
    }

    /// Post an error notice
    pub fn post_error(&self, text: impl Into<String>) {
        *self.error.lock() = Some(Slot {
            text: text.into(),
            posted_at: Instant::now(),
        });
    }

    /// Post the appropriate notice for a delivery result. `success_text` is
    /// used verbatim on success; failures post the result's detail.
    pub fn post_result(&self, result: &DeliveryResult, success_text: &str) {
        match result {
            DeliveryResult::Success { .. } => self.post_success(success_text),
            DeliveryResult::Failure { detail, .. } => self.post_error(detail.clone()),
        }
    }

    /// Take the pending success notice, if one was posted within the TTL.
    /// Reading clears the slot.
    pub fn take_success(&self) -> Option<String> {
        take(&self.success)
    }

    /// Take the pending error notice, if one was posted within the TTL.
    /// Reading clears the slot.
    pub fn take_error(&self) -> Option<String> {
        take(&self.error)
    }
}

fn take(slot: &Mutex<Option<Slot>>) -> Option<String> {
    let posted = slot.lock().take()?;
    if posted.posted_at.elapsed() <= NOTICE_TTL {
        Some(posted.text)
    } else {
        None
    }
}
