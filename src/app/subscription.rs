// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Native events are mapped to top-level messages here; keyboard routing by
//! input owner happens in `App::update` so the subscription stays free of
//! widget state. The periodic tick runs only while some deadline handle is
//! pending, exactly like a timer that is cleared when nothing is scheduled.

use super::Message;
use iced::{event, keyboard, time, window, Event, Subscription};
use std::time::Duration;

/// Interval of the deadline-driving tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Maps native window and keyboard events to application messages.
///
/// Key presses already captured by a focused widget are left alone; only
/// unhandled presses reach the page-level routing.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window_id| match (event, status) {
        (Event::Window(window::Event::Resized(size)), _) => {
            Some(Message::WindowResized(size))
        }
        (Event::Keyboard(keyboard::Event::KeyPressed { key, .. }), event::Status::Ignored) => {
            Some(Message::KeyPressed(key))
        }
        _ => None,
    })
}

/// Creates the periodic tick subscription while timed work is pending
/// (autoplay armed, fade or overlay transition running, debounce waiting).
pub fn create_tick_subscription(needs_tick: bool) -> Subscription<Message> {
    if needs_tick {
        time::every(TICK_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
