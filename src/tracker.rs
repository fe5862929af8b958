//! Keeps the "current section" in step with the viewport.
//!
//! The tracker is the single owner of the active-section state read by the
//! sticky header and the jump menu. It reacts to visibility events for the
//! registered section anchors and performs jumps through a [`Scroller`].
//!
//! ```text
//! Idle --register--> Tracking --unregister last / clear--> Idle
//! ```
//!
//! After a jump, visibility events that disagree with the jump target are
//! treated as provisional for the settle window so the header does not flicker
//! through the sections passed during the scroll animation.

use crate::error::TrackerError;
use std::time::{Duration, Instant};

/// Default time after a jump during which the jump target wins.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// On-screen position of a section anchor.
pub struct Anchor {
    /// Offset of the anchor from the top of the content.
    pub top: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Visibility of one anchor relative to the tracking window.
///
/// The window runs from `header_offset` below the top of the viewport to the
/// bottom of the viewport.
pub struct VisibilityEvent {
    /// Section anchor id.
    pub id: String,
    /// Whether the anchor intersects the window.
    pub is_intersecting: bool,
    /// Signed distance of the anchor's top from the window's top edge.
    pub top_distance: i64,
}

/// Moves the viewport.
pub trait Scroller {
    /// Scrolls so that `offset` is at the top of the viewport.
    fn scroll_to(&mut self, offset: i64, animated: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle of the tracker.
pub enum TrackerState {
    /// No anchors registered; visibility events are ignored.
    Idle,
    /// At least one anchor registered.
    Tracking,
}

struct Registration {
    id: String,
    title: String,
    anchor: Anchor,
    /// Top distance while intersecting, from the latest event.
    visible: Option<i64>,
}

struct PendingJump {
    target: String,
    at: Instant,
}

type Listener = Box<dyn FnMut(Option<&str>)>;

/// Tracks which registered section is active.
pub struct ActiveSectionTracker {
    header_offset: i64,
    settle_window: Duration,
    /// Registrations in document order.
    sections: Vec<Registration>,
    current: Option<String>,
    jump: Option<PendingJump>,
    listeners: Vec<Listener>,
}

impl ActiveSectionTracker {
    #[must_use]
    /// Creates an idle tracker.
    ///
    /// `header_offset` is the height of the fixed headers stacked above the
    /// content; it is both the top margin of the visibility window and the
    /// amount subtracted from an anchor's offset when jumping.
    pub fn new(header_offset: i64, settle_window: Duration) -> Self {
        Self {
            header_offset,
            settle_window,
            sections: Vec::new(),
            current: None,
            jump: None,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        if self.sections.is_empty() {
            TrackerState::Idle
        } else {
            TrackerState::Tracking
        }
    }

    #[must_use]
    /// Height reserved for headers above the content.
    pub fn header_offset(&self) -> i64 {
        self.header_offset
    }

    #[must_use]
    /// The active section id, if any.
    pub fn current_active_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    /// Title registered for the active section.
    pub fn current_title(&self) -> Option<&str> {
        let current = self.current.as_deref()?;
        self.sections
            .iter()
            .find(|r| r.id == current)
            .map(|r| r.title.as_str())
    }

    /// Ids of all registered sections in document order.
    pub fn observed_section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|r| r.id.as_str())
    }

    /// Calls `listener` with the new active id every time it changes.
    pub fn subscribe(&mut self, listener: impl FnMut(Option<&str>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Registers a section anchor, or updates it if already registered.
    ///
    /// Sections must be registered in document order; re-registering keeps
    /// the original position.
    pub fn register_section(&mut self, id: &str, title: &str, anchor: Anchor) {
        if let Some(existing) = self.sections.iter_mut().find(|r| r.id == id) {
            existing.title = title.to_string();
            existing.anchor = anchor;
            return;
        }
        self.sections.push(Registration {
            id: id.to_string(),
            title: title.to_string(),
            anchor,
            visible: None,
        });
    }

    /// Removes a section anchor; unknown ids are ignored.
    pub fn unregister_section(&mut self, id: &str) {
        let before = self.sections.len();
        self.sections.retain(|r| r.id != id);
        if self.sections.len() == before {
            return;
        }

        if self.sections.is_empty() {
            self.jump = None;
        }
        if self.current.as_deref() == Some(id) {
            self.set_current(None);
        }
    }

    /// Unregisters every anchor, returning to [`TrackerState::Idle`].
    pub fn clear(&mut self) {
        self.sections.clear();
        self.jump = None;
        self.set_current(None);
    }

    /// Applies a batch of visibility changes and returns the active id.
    ///
    /// The topmost intersecting anchor wins, ties going to document order.
    /// With nothing intersecting, the previous value is kept, falling back to
    /// the first registered section.
    pub fn on_visibility_change(
        &mut self,
        events: &[VisibilityEvent],
        now: Instant,
    ) -> Option<&str> {
        if self.state() == TrackerState::Idle {
            return None;
        }

        for event in events {
            if let Some(r) = self.sections.iter_mut().find(|r| r.id == event.id) {
                r.visible = event.is_intersecting.then_some(event.top_distance);
            }
        }

        let topmost = self
            .sections
            .iter()
            .enumerate()
            .filter_map(|(order, r)| r.visible.map(|distance| (distance, order)))
            .min()
            .map(|(_, order)| self.sections[order].id.clone());

        let next = topmost
            .or_else(|| self.current.clone())
            .or_else(|| self.sections.first().map(|r| r.id.clone()));

        if let Some(jump) = &self.jump {
            if now.saturating_duration_since(jump.at) < self.settle_window {
                if next.as_deref() != Some(jump.target.as_str()) {
                    return self.current.as_deref();
                }
            } else {
                self.jump = None;
            }
        }

        self.set_current(next);
        self.current.as_deref()
    }

    /// Scrolls to a registered section and makes it active.
    ///
    /// Issues exactly one `scroll_to` at the anchor offset less the header
    /// offset.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::SectionNotFound`] without scrolling if the
    /// section is not registered.
    pub fn jump_to(
        &mut self,
        section_id: &str,
        scroller: &mut dyn Scroller,
        now: Instant,
    ) -> Result<(), TrackerError> {
        let Some(registration) = self.sections.iter().find(|r| r.id == section_id) else {
            tracing::debug!(section = section_id, "jump target not registered");
            return Err(TrackerError::SectionNotFound(section_id.to_string()));
        };

        let offset = registration.anchor.top - self.header_offset;
        scroller.scroll_to(offset, true);
        tracing::info!(section = section_id, offset, "jumped to section");

        self.jump = Some(PendingJump {
            target: section_id.to_string(),
            at: now,
        });
        self.set_current(Some(section_id.to_string()));
        Ok(())
    }

    fn set_current(&mut self, next: Option<String>) {
        if self.current == next {
            return;
        }
        self.current = next;
        for listener in &mut self.listeners {
            listener(self.current.as_deref());
        }
    }
}

#[cfg(test)]
#[path = "tests/tracker.rs"]
mod tests;
