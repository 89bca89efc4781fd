// SPDX-License-Identifier: MPL-2.0
//! Carousel component encapsulating state and update logic.
//!
//! One instance per carousel discovered on the page. The component owns the
//! current index, the autoplay timer, the cross-fade, the swipe recognizer
//! and the sizing engine; side effects that need the outside world (decoding
//! slides, probing dimensions) are returned as [`Effect`]s for the
//! application to perform.

pub mod autoplay;
pub mod fade;
pub mod sizing;
pub mod swipe;

use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::media::{ImageData, NaturalSize};
use crate::page::descriptor::ImageItem;
use crate::page::{CarouselDef, CarouselOptions};
use crate::ui::design_tokens::{opacity, spacing, typography};
use crate::ui::styles;
use crate::ui::theme::{self, ThemeMode};
use crate::ui::SlideState;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{mouse_area, Column, Container, Image, Row, Space, Stack, Text};
use iced::{Element, Length};
use std::time::Instant;

/// Wraps any integer index onto `[0, n)`.
#[must_use]
pub fn wrap_index(index: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let n = len as i64;
    (((index % n) + n) % n) as usize
}

/// Messages consumed by the carousel component.
#[derive(Debug, Clone)]
pub enum Message {
    NavigateNext,
    NavigatePrevious,
    /// Jump to an arbitrary index; any integer wraps onto `[0, n)`.
    GoTo(i64),
    PointerEntered,
    PointerExited,
    FocusGained,
    FocusLost,
    Swipe(swipe::Message),
    /// A slide decode finished. Stale generations are discarded.
    SlideLoaded {
        index: usize,
        generation: u64,
        result: Result<ImageData, Error>,
    },
    /// A dimension probe resolved (successfully or not).
    ProbeResolved {
        index: usize,
        size: Option<NaturalSize>,
    },
    /// The container width changed (window resize).
    ContainerResized { width: f32 },
    /// Periodic tick driving deadlines.
    Tick,
}

/// Side effects the application performs on behalf of the carousel.
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
    /// Probe the natural dimensions of one item.
    Probe { uri: String, index: usize },
}

/// Carousel component state.
#[derive(Debug)]
pub struct State {
    id: String,
    items: Vec<ImageItem>,
    current_index: usize,
    options: CarouselOptions,
    autoplay: autoplay::State,
    swipe: swipe::State,
    fade: fade::State,
    sizing: sizing::Engine,
    slide: SlideState,
    container_width: f32,
    hovered: bool,
}

impl State {
    /// Builds the component from its page definition. An empty item list
    /// yields an inert instance: mounting and every later message are
    /// no-ops.
    #[must_use]
    pub fn new(def: CarouselDef) -> Self {
        let item_count = def.items.len();
        Self {
            id: def.id,
            autoplay: autoplay::State::new(&def.options),
            options: def.options,
            items: def.items,
            current_index: 0,
            swipe: swipe::State::default(),
            fade: fade::State::new(),
            sizing: sizing::Engine::new(item_count),
            slide: SlideState::default(),
            container_width: 0.0,
            hovered: false,
        }
    }

    /// Binds the instance: renders the first slide, starts autoplay if
    /// enabled, and requests one dimension probe per item. No-op when the
    /// item list is empty.
    pub fn mount(&mut self, now: Instant, container_width: f32) -> Vec<Effect> {
        if self.is_inert() {
            return Vec::new();
        }

        self.container_width = container_width;
        self.autoplay.start(now);

        let mut effects = self.navigate_to(now, 0);
        effects.extend(self.items.iter().enumerate().map(|(index, item)| {
            Effect::Probe {
                uri: item.best_variant().to_string(),
                index,
            }
        }));
        effects
    }

    /// Handles a message, returning the effects to perform.
    #[allow(clippy::needless_pass_by_value)]
    pub fn update(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        if self.is_inert() {
            return Vec::new();
        }

        match message {
            Message::NavigateNext => self.navigate_to(now, self.current_index as i64 + 1),
            Message::NavigatePrevious => self.navigate_to(now, self.current_index as i64 - 1),
            Message::GoTo(index) => self.navigate_to(now, index),
            Message::PointerEntered | Message::FocusGained => {
                self.hovered = true;
                if self.options.pause_on_hover {
                    self.autoplay.pause();
                }
                Vec::new()
            }
            Message::PointerExited | Message::FocusLost => {
                self.hovered = false;
                self.swipe.handle(swipe::Message::Canceled);
                if self.options.pause_on_hover {
                    self.autoplay.resume(now);
                }
                Vec::new()
            }
            Message::Swipe(swipe_message) => match self.swipe.handle(swipe_message) {
                swipe::Effect::SwipeNext => {
                    self.navigate_to(now, self.current_index as i64 + 1)
                }
                swipe::Effect::SwipePrevious => {
                    self.navigate_to(now, self.current_index as i64 - 1)
                }
                swipe::Effect::None => Vec::new(),
            },
            Message::SlideLoaded {
                index,
                generation,
                result,
            } => {
                if !self.fade.load_finished(now, generation) {
                    // Stale completion: the user has navigated on.
                    return Vec::new();
                }
                match result {
                    Ok(data) => {
                        self.slide = SlideState::Ready(data);
                        // Frame height is adjusted once the image is in.
                        self.sizing.recompute(self.container_width);
                    }
                    Err(err) => {
                        eprintln!(
                            "Carousel '{}': slide {} failed to load: {}",
                            self.id, index, err
                        );
                        self.slide = SlideState::Failed;
                    }
                }
                Vec::new()
            }
            Message::ProbeResolved { index, size } => {
                self.sizing.record_probe(index, size);
                if self.sizing.all_resolved() {
                    self.sizing.recompute(self.container_width);
                }
                Vec::new()
            }
            Message::ContainerResized { width } => {
                self.container_width = width;
                self.sizing.viewport_resized(now);
                Vec::new()
            }
            Message::Tick => self.tick(now),
        }
    }

    /// Navigates to an arbitrary (possibly out-of-range) index with
    /// wraparound, starting the cross-fade and requesting neighbor preload.
    fn navigate_to(&mut self, now: Instant, index: i64) -> Vec<Effect> {
        let target = wrap_index(index, self.items.len());
        self.current_index = target;
        self.fade.begin(now, target);
        // Manual or automatic, navigation always grants a full fresh
        // interval before the next automatic advance.
        self.autoplay.restart(now);

        let uris = crate::media::prefetch::neighbor_indices(target, self.items.len())
            .into_iter()
            .map(|i| self.display_uri(i))
            .collect::<Vec<_>>();

        if uris.is_empty() {
            Vec::new()
        } else {
            vec![Effect::Preload { uris }]
        }
    }

    fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(advance) = self.autoplay.poll(now) {
            let step = match advance {
                autoplay::Advance::Next => 1,
                autoplay::Advance::Previous => -1,
            };
            effects.extend(self.navigate_to(now, self.current_index as i64 + step));
        }

        if let fade::Effect::SwapSource { target, generation } = self.fade.poll(now) {
            self.slide = SlideState::Loading;
            effects.push(Effect::LoadSlide {
                uri: self.display_uri(target),
                index: target,
                generation,
            });
        }

        if self.sizing.poll(now) {
            self.sizing.recompute(self.container_width);
        }

        effects
    }

    /// The variant URI displayed for the item at `index` given the current
    /// container width.
    fn display_uri(&self, index: usize) -> String {
        let width = self.container_width.round().max(0.0) as u32;
        self.items[index].variant_for_width(width).to_string()
    }

    /// Whether the periodic tick is needed right now.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.autoplay.is_running() || self.fade.is_animating() || self.sizing.is_pending()
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[must_use]
    pub fn is_autoplay_running(&self) -> bool {
        self.autoplay.is_running()
    }

    /// The caption text for the current slide.
    #[must_use]
    pub fn caption(&self) -> &str {
        self.items
            .get(self.current_index)
            .map_or("", |item| item.alt_text.as_str())
    }

    /// Renders the carousel frame.
    pub fn view<'a>(
        &'a self,
        i18n: &'a I18n,
        mode: ThemeMode,
        now: Instant,
    ) -> Element<'a, Message> {
        if self.is_inert() {
            return Space::new()
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into();
        }

        let slide: Element<'a, Message> = match &self.slide {
            SlideState::Ready(data) => Image::new(data.handle.clone())
                .width(Length::Fill)
                .opacity(self.fade.opacity(now))
                .into(),
            SlideState::Failed => Container::new(
                Text::new(i18n.tr("carousel-media-error")).size(typography::BODY),
            )
            .padding(spacing::MD)
            .style(styles::broken_media)
            .into(),
            SlideState::Loading | SlideState::Empty => {
                Space::new()
                    .width(Length::Fill)
                    .height(Length::Shrink)
                    .into()
            }
        };

        let mut frame = Container::new(slide)
            .width(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center);
        if let Some(height) = self.sizing.stable_height() {
            frame = frame.height(Length::Fixed(height as f32));
        }

        let arrow_color = theme::overlay_text_color();
        let previous = iced::widget::button(Text::new("◀").size(typography::TITLE_MD))
            .padding(spacing::SM)
            .style(styles::button_overlay(
                arrow_color,
                opacity::TRANSPARENT,
                opacity::OVERLAY_MEDIUM,
            ))
            .on_press(Message::NavigatePrevious);
        let next = iced::widget::button(Text::new("▶").size(typography::TITLE_MD))
            .padding(spacing::SM)
            .style(styles::button_overlay(
                arrow_color,
                opacity::TRANSPARENT,
                opacity::OVERLAY_MEDIUM,
            ))
            .on_press(Message::NavigateNext);

        let stack = Stack::new()
            .push(
                Container::new(frame)
                    .width(Length::Fill)
                    .style(styles::frame_surface(theme::frame_surface_color(mode))),
            )
            .push(
                Container::new(previous)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Horizontal::Left)
                    .align_y(Vertical::Center)
                    .padding(spacing::XS),
            )
            .push(
                Container::new(next)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Horizontal::Right)
                    .align_y(Vertical::Center)
                    .padding(spacing::XS),
            )
            .push(
                Container::new(
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
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(spacing::XS)
                .align_x(Horizontal::Center)
                .align_y(Vertical::Bottom),
            );

        let interactive = mouse_area(stack)
            .on_enter(Message::PointerEntered)
            .on_exit(Message::PointerExited)
            .on_move(|position| Message::Swipe(swipe::Message::Moved(position)))
            .on_press(Message::Swipe(swipe::Message::Pressed))
            .on_release(Message::Swipe(swipe::Message::Released));

        let mut column = Column::new().spacing(spacing::XS).push(interactive);
        if !self.caption().is_empty() {
            column = column.push(
                Row::new().push(Text::new(self.caption()).size(typography::BODY)),
            );
        }

        column.width(Length::Fill).into()
    }
}
