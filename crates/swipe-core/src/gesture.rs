//! Pointer-gesture classification.
//!
//! One `GestureClassifier` tracks one card interaction:
//!
//! ```text
//! idle ──begin──▶ dragging ──move──▶ dragging
//!                    │
//!                    ├──end──▶ idle + Some(action)   (threshold crossed)
//!                    ├──end──▶ idle + None           (snap back)
//!                    └──cancel──▶ idle
//! ```
//!
//! There is no timeout: a drag that never receives `end` or `cancel` stays in
//! `dragging`.

use serde::{Deserialize, Serialize};

use crate::enums::SwipeAction;

/// A pointer position, or an offset between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distances an offset must exceed before a drag resolves to an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeThresholds {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            horizontal: 100.0,
            vertical: 100.0,
        }
    }
}

/// Resolve a final drag offset. Screen coordinates: `y` grows downward, so an
/// upward swipe has a negative `y`.
///
/// The horizontal test runs first and wins whenever it is exceeded,
/// whatever the vertical offset.
#[must_use]
pub fn classify(offset: Point, thresholds: SwipeThresholds) -> Option<SwipeAction> {
    if offset.x.abs() > thresholds.horizontal {
        if offset.x > 0.0 {
            Some(SwipeAction::Like)
        } else {
            Some(SwipeAction::Pass)
        }
    } else if offset.y < -thresholds.vertical {
        Some(SwipeAction::SuperLike)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    Dragging { start: Point, offset: Point },
}

/// Stateful per-card classifier fed with raw pointer events.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    thresholds: SwipeThresholds,
    state: GestureState,
}

impl GestureClassifier {
    #[must_use]
    pub const fn new(thresholds: SwipeThresholds) -> Self {
        Self {
            thresholds,
            state: GestureState::Idle,
        }
    }

    #[must_use]
    pub const fn thresholds(&self) -> SwipeThresholds {
        self.thresholds
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Current card offset; zero at rest.
    #[must_use]
    pub const fn offset(&self) -> Point {
        match self.state {
            GestureState::Idle => Point::ZERO,
            GestureState::Dragging { offset, .. } => offset,
        }
    }

    /// Start a drag. A second `begin` during a drag is ignored so the
    /// original anchor is kept.
    pub fn begin(&mut self, at: Point) {
        if let GestureState::Idle = self.state {
            self.state = GestureState::Dragging {
                start: at,
                offset: Point::ZERO,
            };
        }
    }

    /// Track a pointer move. Returns the new offset, or `None` when no drag is
    /// in progress.
    pub fn move_to(&mut self, at: Point) -> Option<Point> {
        match &mut self.state {
            GestureState::Idle => None,
            GestureState::Dragging { start, offset } => {
                *offset = Point::new(at.x - start.x, at.y - start.y);
                Some(*offset)
            }
        }
    }

    /// Finish the drag and return to rest, emitting at most one action.
    pub fn end(&mut self) -> Option<SwipeAction> {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        match state {
            GestureState::Idle => None,
            GestureState::Dragging { offset, .. } => classify(offset, self.thresholds),
        }
    }

    /// Record a final position, then finish the drag.
    pub fn end_at(&mut self, at: Point) -> Option<SwipeAction> {
        self.move_to(at);
        self.end()
    }

    /// Abandon the drag without emitting anything.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(SwipeThresholds::default())
    }
}
