//! Capture session: acquires exactly `photo_count` photos in slot order.
//!
//! [`CaptureSession`] is the synchronous state machine; every event (start
//! request, countdown tick, shutter resolution) is a method call that either
//! transitions or is ignored. [`driver::CaptureDriver`] feeds it real timer
//! and camera events.
//!
//! ```text
//! Idle(n) --start--> CountingDown(n, 3) --tick--> .. --tick--> Capturing(n)
//! Capturing(n) --ok(uri)--> SlotFilled(n+1) --advance--> Idle(n+1) | AllCaptured
//! Capturing(n) --failure--> Idle(n)
//! ```

pub mod driver;

pub use driver::{CaptureDriver, DriverOptions};

use crate::errors::BoothError;
use crate::templates::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CaptureState {
    Idle { slot: usize },
    CountingDown { slot: usize, remaining: u32 },
    Capturing { slot: usize },
    SlotFilled { filled: usize },
    AllCaptured,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle { slot } => write!(f, "Idle({})", slot),
            CaptureState::CountingDown { slot, remaining } => {
                write!(f, "CountingDown({}, {})", slot, remaining)
            }
            CaptureState::Capturing { slot } => write!(f, "Capturing({})", slot),
            CaptureState::SlotFilled { filled } => write!(f, "SlotFilled({})", filled),
            CaptureState::AllCaptured => write!(f, "AllCaptured"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPhoto {
    pub uri: String,
    pub index: usize,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StartOutcome {
    Started,
    /// Camera permission is missing; the caller asks for it and the session
    /// stays idle.
    PermissionRequired,
    /// A countdown or capture is already in flight.
    Ignored,
    AlreadyComplete,
}

#[derive(Debug, Clone)]
pub struct CaptureSession {
    template_id: String,
    photo_count: usize,
    countdown_seconds: u32,
    state: CaptureState,
    photos: Vec<CapturedPhoto>,
}

impl CaptureSession {
    pub fn new(template: &Template, countdown_seconds: u32) -> Self {
        Self {
            template_id: template.id.clone(),
            photo_count: template.photo_count,
            countdown_seconds: countdown_seconds.max(1),
            state: CaptureState::Idle { slot: 0 },
            photos: Vec::with_capacity(template.photo_count),
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn photos(&self) -> &[CapturedPhoto] {
        &self.photos
    }

    pub fn photo_uris(&self) -> Vec<String> {
        self.photos.iter().map(|p| p.uri.clone()).collect()
    }

    /// Next slot to fill.
    pub fn current_index(&self) -> usize {
        self.photos.len()
    }

    pub fn is_complete(&self) -> bool {
        self.state == CaptureState::AllCaptured
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            CaptureState::CountingDown { .. } | CaptureState::Capturing { .. }
        )
    }

    fn transition(&mut self, next: CaptureState) {
        log::debug!("[{}] {} -> {}", self.template_id, self.state, next);
        self.state = next;
    }

    fn check_slot(&self, slot: usize) {
        crate::assert_invariant!(
            slot == self.photos.len(),
            "Session slot equals the number of captured photos",
            "session"
        );
    }

    pub fn start(&mut self, permission_granted: bool) -> StartOutcome {
        match self.state {
            CaptureState::Idle { slot } => {
                self.check_slot(slot);
                if slot >= self.photo_count {
                    return StartOutcome::AlreadyComplete;
                }
                if !permission_granted {
                    log::debug!("[{}] start blocked on camera permission", self.template_id);
                    return StartOutcome::PermissionRequired;
                }
                self.transition(CaptureState::CountingDown {
                    slot,
                    remaining: self.countdown_seconds,
                });
                StartOutcome::Started
            }
            CaptureState::AllCaptured => StartOutcome::AlreadyComplete,
            _ => {
                log::debug!("[{}] start ignored in {}", self.template_id, self.state);
                StartOutcome::Ignored
            }
        }
    }

    /// One countdown second elapsed. Stale ticks outside a countdown are
    /// ignored.
    pub fn tick(&mut self) -> CaptureState {
        if let CaptureState::CountingDown { slot, remaining } = self.state {
            let next = if remaining > 1 {
                CaptureState::CountingDown {
                    slot,
                    remaining: remaining - 1,
                }
            } else {
                CaptureState::Capturing { slot }
            };
            self.transition(next);
        }
        self.state
    }

    /// Commits the photo for the in-flight slot.
    pub fn shutter_succeeded(&mut self, uri: String) -> Result<&CapturedPhoto, BoothError> {
        let CaptureState::Capturing { slot } = self.state else {
            return Err(BoothError::Capture(format!(
                "shutter result with no capture in flight ({})",
                self.state
            )));
        };
        self.check_slot(slot);

        self.photos.push(CapturedPhoto {
            uri,
            index: slot,
            captured_at: Utc::now(),
        });
        self.transition(CaptureState::SlotFilled { filled: slot + 1 });
        crate::assert_invariant!(
            self.photos.iter().enumerate().all(|(i, p)| p.index == i),
            "Captured photos are indexed in slot order",
            "session"
        );

        self.photos
            .last()
            .ok_or_else(|| BoothError::Capture("photo list empty after commit".to_string()))
    }

    /// Drops the in-flight capture and returns to the same slot. The returned
    /// error is what the user is shown.
    pub fn shutter_failed(&mut self, reason: impl Into<String>) -> BoothError {
        let reason = reason.into();
        if let CaptureState::Capturing { slot } = self.state {
            self.transition(CaptureState::Idle { slot });
        }
        log::warn!("[{}] capture failed: {}", self.template_id, reason);
        BoothError::Capture(reason)
    }

    /// Leaves `SlotFilled`: back to idle for the next slot, or done.
    pub fn advance(&mut self) -> CaptureState {
        if let CaptureState::SlotFilled { filled } = self.state {
            if filled < self.photo_count {
                self.transition(CaptureState::Idle { slot: filled });
            } else {
                self.transition(CaptureState::AllCaptured);
            }
        }
        self.state
    }

    /// Starts over, discarding captured photos.
    pub fn reset(&mut self) {
        self.photos.clear();
        self.transition(CaptureState::Idle { slot: 0 });
    }
}
