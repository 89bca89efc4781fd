// SPDX-License-Identifier: MPL-2.0
//! Full-screen lightbox overlay component.
//!
//! Created per activation from the page's gallery links and destroyed on
//! close. The life of an instance is the state machine
//! `Opening → Open → Closing`, with the surrounding `Closed` state expressed
//! by the application holding no instance at all. Opening applies the
//! visible styling one tick after mount so the entry transition animates
//! (styling applied in the mount frame would skip it); closing animates out
//! and defers teardown until the transition deadline elapses.

use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::page::descriptor::ImageItem;
use crate::ui::carousel::wrap_index;
use crate::ui::design_tokens::{opacity, spacing, typography};
use crate::ui::styles;
use crate::ui::theme;
use crate::ui::SlideState;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, center, mouse_area, opaque, Column, Container, Image, Row, Text};
use iced::{Background, Element, Length, Theme};
use std::time::{Duration, Instant};

/// Duration of the opening transition.
pub const OPEN_TRANSITION: Duration = Duration::from_millis(200);

/// Duration of the closing transition; teardown waits for it.
pub const CLOSE_TRANSITION: Duration = Duration::from_millis(220);

/// Overlay phase. `Closed` is the absence of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Mounted; the transition starts on the first tick after mount.
    Opening { since: Option<Instant> },
    Open,
    Closing { since: Instant },
}

/// Messages consumed by the lightbox component.
#[derive(Debug, Clone)]
pub enum Message {
    NavigateNext,
    NavigatePrevious,
    /// Escape key or the explicit close control.
    Close,
    /// Pointer press on the backdrop outside the inner content region.
    BackdropPressed,
    /// A slide decode finished.
    SlideLoaded {
        index: usize,
        generation: u64,
        result: Result<ImageData, Error>,
    },
    Tick,
}

/// Side effects the application performs on behalf of the lightbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Decode the slide at `uri` for display.
    LoadSlide {
        uri: String,
        index: usize,
        generation: u64,
    },
    /// Warm the preload cache for the given URIs.
    Preload { uris: Vec<String> },
    /// The close transition finished: drop the instance, release the
    /// keyboard owner and the scroll lock.
    Unmounted,
}

/// Lightbox component state.
#[derive(Debug)]
pub struct State {
    items: Vec<ImageItem>,
    current_index: usize,
    phase: Phase,
    slide: SlideState,
    generation: u64,
}

impl State {
    /// Activates the overlay over the captured item list, starting at the
    /// activated item. Returns `None` for an empty gallery (nothing to
    /// show, activation is a no-op).
    #[must_use]
    pub fn open(items: Vec<ImageItem>, activated_index: usize) -> Option<(Self, Vec<Effect>)> {
        if items.is_empty() {
            return None;
        }

        let mut state = Self {
            current_index: activated_index.min(items.len() - 1),
            items,
            phase: Phase::Opening { since: None },
            slide: SlideState::Loading,
            generation: 0,
        };
        let effects = state.bind_current();
        Some((state, effects))
    }

    /// Handles a message, returning the effects to perform.
    #[allow(clippy::needless_pass_by_value)]
    pub fn update(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        match message {
            Message::NavigateNext => self.navigate_to(self.current_index as i64 + 1),
            Message::NavigatePrevious => self.navigate_to(self.current_index as i64 - 1),
            Message::Close | Message::BackdropPressed => {
                match self.phase {
                    Phase::Opening { .. } | Phase::Open => {
                        self.phase = Phase::Closing { since: now };
                    }
                    // Already closing: close is idempotent.
                    Phase::Closing { .. } => {}
                }
                Vec::new()
            }
            Message::SlideLoaded {
                index,
                generation,
                result,
            } => {
                if generation != self.generation {
                    // Stale completion from an earlier navigation.
                    return Vec::new();
                }
                match result {
                    Ok(data) => self.slide = SlideState::Ready(data),
                    Err(err) => {
                        eprintln!("Lightbox: slide {} failed to load: {}", index, err);
                        self.slide = SlideState::Failed;
                    }
                }
                Vec::new()
            }
            Message::Tick => self.tick(now),
        }
    }

    /// Rebinds image, caption and preloading for a wrapped navigation over
    /// the captured item list. Navigation while closing is ignored.
    fn navigate_to(&mut self, index: i64) -> Vec<Effect> {
        if matches!(self.phase, Phase::Closing { .. }) {
            return Vec::new();
        }
        self.current_index = wrap_index(index, self.items.len());
        self.bind_current()
    }

    /// Loads the current item and warms its wrapped neighbors.
    fn bind_current(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.slide = SlideState::Loading;

        let mut effects = vec![Effect::LoadSlide {
            uri: self.items[self.current_index].best_variant().to_string(),
            index: self.current_index,
            generation: self.generation,
        }];

        let uris: Vec<String> =
            crate::media::prefetch::neighbor_indices(self.current_index, self.items.len())
                .into_iter()
                .map(|i| self.items[i].best_variant().to_string())
                .collect();
        if !uris.is_empty() {
            effects.push(Effect::Preload { uris });
        }
        effects
    }

    fn tick(&mut self, now: Instant) -> Vec<Effect> {
        match self.phase {
            Phase::Opening { since: None } => {
                // First tick after mount: begin the entry transition.
                self.phase = Phase::Opening { since: Some(now) };
                Vec::new()
            }
            Phase::Opening { since: Some(since) } => {
                if now.duration_since(since) >= OPEN_TRANSITION {
                    self.phase = Phase::Open;
                }
                Vec::new()
            }
            Phase::Open => Vec::new(),
            Phase::Closing { since } => {
                if now.duration_since(since) >= CLOSE_TRANSITION {
                    vec![Effect::Unmounted]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Backdrop opacity factor for the current transition state.
    #[must_use]
    pub fn backdrop_alpha(&self, now: Instant) -> f32 {
        match self.phase {
            Phase::Opening { since: None } => 0.0,
            Phase::Opening { since: Some(since) } => {
                let elapsed = now.duration_since(since).as_secs_f32();
                (elapsed / OPEN_TRANSITION.as_secs_f32()).clamp(0.0, 1.0)
            }
            Phase::Open => 1.0,
            Phase::Closing { since } => {
                let elapsed = now.duration_since(since).as_secs_f32();
                (1.0 - elapsed / CLOSE_TRANSITION.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    /// Whether the overlay still needs ticks (transitions in flight).
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        !matches!(self.phase, Phase::Open)
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        matches!(self.phase, Phase::Closing { .. })
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The caption text for the current item.
    #[must_use]
    pub fn caption(&self) -> &str {
        self.items[self.current_index].alt_text.as_str()
    }

    /// Renders the overlay layer stacked above the page.
    pub fn view<'a>(&'a self, i18n: &'a I18n, now: Instant) -> Element<'a, Message> {
        let alpha = self.backdrop_alpha(now);
        let text_color = theme::overlay_text_color();

        let image: Element<'a, Message> = match &self.slide {
            SlideState::Ready(data) => Image::new(data.handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            SlideState::Failed => Container::new(
                Text::new(i18n.tr("lightbox-media-error")).size(typography::BODY),
            )
            .padding(spacing::MD)
            .style(styles::broken_media)
            .into(),
            SlideState::Loading | SlideState::Empty => Container::new(
                Text::new(i18n.tr("lightbox-loading")).size(typography::BODY),
            )
            .padding(spacing::MD)
            .into(),
        };

        let previous = button(Text::new("‹").size(typography::TITLE_LG))
            .padding(spacing::SM)
            .style(styles::button_overlay(
                text_color,
                opacity::TRANSPARENT,
                opacity::OVERLAY_MEDIUM,
            ))
            .on_press(Message::NavigatePrevious);
        let next = button(Text::new("›").size(typography::TITLE_LG))
            .padding(spacing::SM)
            .style(styles::button_overlay(
                text_color,
                opacity::TRANSPARENT,
                opacity::OVERLAY_MEDIUM,
            ))
            .on_press(Message::NavigateNext);
        let close = button(Text::new("×").size(typography::TITLE_MD))
            .padding(spacing::XS)
            .style(styles::button_overlay(
                text_color,
                opacity::OVERLAY_SUBTLE,
                opacity::OVERLAY_MEDIUM,
            ))
            .on_press(Message::Close);

        let header = Row::new()
            .width(Length::Fill)
            .push(
                Container::new(
                    Text::new(format!(
                        "{}/{}",
                        self.current_index + 1,
                        self.items.len()
                    ))
                    .size(typography::CAPTION),
                )
                .padding(spacing::XXS)
                .style(styles::indicator(12.0)),
            )
            .push(
                Container::new(close)
                    .width(Length::Fill)
                    .align_x(Horizontal::Right),
            );

        let body = Row::new()
            .align_y(Vertical::Center)
            .spacing(spacing::SM)
            .push(previous)
            .push(
                Container::new(image)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Horizontal::Center)
                    .align_y(Vertical::Center),
            )
            .push(next);

        let mut content = Column::new()
            .spacing(spacing::SM)
            .push(header)
            .push(body);
        if !self.caption().is_empty() {
            content = content.push(
                Container::new(Text::new(self.caption()).size(typography::BODY))
                    .width(Length::Fill)
                    .align_x(Horizontal::Center),
            );
        }

        let inner = Container::new(content)
            .padding(spacing::LG)
            .width(Length::Fill)
            .max_width(1100.0)
            .height(Length::Fill);

        // Clicks inside the inner region stay there; clicks on the backdrop
        // close the overlay.
        let backdrop_color = theme::backdrop_color(alpha);
        opaque(
            mouse_area(
                center(opaque(inner)).style(move |_theme: &Theme| {
                    iced::widget::container::Style {
                        background: Some(Background::Color(backdrop_color)),
                        text_color: Some(text_color),
                        ..Default::default()
                    }
                }),
            )
            .on_press(Message::BackdropPressed),
        )
    }
}
