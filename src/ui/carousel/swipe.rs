// SPDX-License-Identifier: MPL-2.0
//! Horizontal drag-swipe sub-component.
//!
//! A press anchors the gesture at the last known cursor position; the
//! release measures the horizontal travel. Drags shorter than the threshold
//! are taps and produce no navigation.

use iced::Point;

/// Minimum horizontal travel (px) for a drag to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 40.0;

/// Swipe recognizer state.
#[derive(Debug, Clone, Default)]
pub struct State {
    origin: Option<Point>,
    cursor: Option<Point>,
}

/// Messages for the swipe sub-component.
#[derive(Debug, Clone)]
pub enum Message {
    /// Cursor moved over the widget.
    Moved(Point),
    /// Primary button pressed.
    Pressed,
    /// Primary button released.
    Released,
    /// Cursor left the widget mid-gesture.
    Canceled,
}

/// Effects produced by a completed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No gesture, or travel below the threshold (tap).
    None,
    /// Drag to the right: navigate to the previous slide.
    SwipePrevious,
    /// Drag to the left: navigate to the next slide.
    SwipeNext,
}

impl State {
    /// Handle a swipe message.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::Moved(position) => {
                self.cursor = Some(position);
                Effect::None
            }
            Message::Pressed => {
                self.origin = self.cursor;
                Effect::None
            }
            Message::Released => match (self.origin.take(), self.cursor) {
                (Some(origin), Some(end)) => {
                    let dx = end.x - origin.x;
                    if dx >= SWIPE_THRESHOLD {
                        Effect::SwipePrevious
                    } else if dx <= -SWIPE_THRESHOLD {
                        Effect::SwipeNext
                    } else {
                        Effect::None
                    }
                }
                _ => Effect::None,
            },
            Message::Canceled => {
                self.origin = None;
                Effect::None
            }
        }
    }

    /// Whether a press is currently anchored.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }
}
