// SPDX-License-Identifier: MPL-2.0
//! Application root state and page coordination.
//!
//! The `App` owns the parsed page, one carousel component per discovered
//! container, the transient lightbox instance, and the two pieces of shared
//! page-level state the widgets must not own themselves: the explicit
//! registry of bound carousel ids and the exclusive keyboard input owner.
//! Component effects are converted into Iced tasks here; nothing below this
//! layer touches the filesystem or the runtime.

mod message;
mod subscription;
mod view;

pub use message::{Flags, Message, SlideTarget};

use crate::config::{self, Config};
use crate::i18n::fluent::I18n;
use crate::media::{self, prefetch::SlideCache, ImageData};
use crate::page::{GalleryPage, WidgetRegistry};
use crate::ui::carousel;
use crate::ui::design_tokens::spacing;
use crate::ui::lightbox;
use crate::ui::theme::ThemeMode;
use iced::keyboard::key::Named;
use iced::keyboard::Key;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const WINDOW_DEFAULT_WIDTH: u32 = 1024;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 768;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 360;

/// Page document loaded when no path is given on the command line.
pub const DEFAULT_PAGE_DOCUMENT: &str = "page.json";

/// Exclusive owner of page-level keyboard input.
///
/// The open lightbox is modal: while it is mounted it takes arrow keys and
/// Escape, and the carousels behind it receive nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputOwner {
    #[default]
    Page,
    Lightbox,
}

/// Root Iced application state bridging the page document, the widget
/// components, localization and preferences.
pub struct App {
    i18n: I18n,
    theme_mode: ThemeMode,
    page: GalleryPage,
    page_dir: PathBuf,
    registry: WidgetRegistry,
    carousels: Vec<carousel::State>,
    lightbox: Option<lightbox::State>,
    input_owner: InputOwner,
    scroll_locked: bool,
    cache: SlideCache,
    thumbs: Vec<Option<ImageData>>,
    window_width: f32,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("carousels", &self.carousels.len())
            .field("lightbox_open", &self.lightbox.is_some())
            .field("input_owner", &self.input_owner)
            .finish()
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy the Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce).
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads preferences and the page document, binds one carousel per
    /// definition, and dispatches the initial decode and probe work.
    ///
    /// Every load failure degrades: a bad config falls back to defaults, a
    /// bad page document renders an empty page. Nothing here can take the
    /// application down.
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = config::load().unwrap_or_else(|err| {
            eprintln!("Failed to load config: {err:?}");
            Config::default()
        });
        let i18n = I18n::new(flags.lang, &config);
        let theme_mode = config.theme.unwrap_or_default();

        let page_path = PathBuf::from(
            flags
                .page_path
                .unwrap_or_else(|| DEFAULT_PAGE_DOCUMENT.to_string()),
        );
        let page = GalleryPage::load(&page_path).unwrap_or_else(|err| {
            eprintln!(
                "Failed to load page document {}: {}",
                page_path.display(),
                err
            );
            GalleryPage::default()
        });
        let page_dir = page_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let carousels = page
            .carousels
            .iter()
            .cloned()
            .map(carousel::State::new)
            .collect::<Vec<_>>();
        let thumb_count = page.links.len();

        let mut app = Self {
            i18n,
            theme_mode,
            page,
            page_dir,
            registry: WidgetRegistry::new(),
            carousels,
            lightbox: None,
            input_owner: InputOwner::default(),
            scroll_locked: false,
            cache: SlideCache::with_defaults(),
            thumbs: vec![None; thumb_count],
            window_width: WINDOW_DEFAULT_WIDTH as f32,
        };
        let task = app.mount(Instant::now());
        (app, task)
    }

    /// Window title from the page document.
    pub fn title(&self) -> String {
        self.page
            .title
            .clone()
            .unwrap_or_else(|| self.i18n.tr("app-title"))
    }

    pub fn theme(&self) -> Theme {
        self.theme_mode.to_iced_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(self.needs_tick()),
        ])
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            theme_mode: self.theme_mode,
            title: self.page.title.as_deref(),
            carousels: &self.carousels,
            links: &self.page.links,
            thumbs: &self.thumbs,
            lightbox: self.lightbox.as_ref(),
            scroll_locked: self.scroll_locked,
            now: Instant::now(),
        })
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Carousel { id, message } => self.update_carousel(&id, message),
            Message::Lightbox(message) => self.update_lightbox(message),
            Message::LinkActivated { index } => self.open_lightbox(index),
            Message::KeyPressed(key) => self.route_key(&key),
            Message::WindowResized(size) => {
                self.window_width = size.width;
                let width = self.content_width();
                let now = Instant::now();
                for instance in &mut self.carousels {
                    instance.update(carousel::Message::ContainerResized { width }, now);
                }
                Task::none()
            }
            Message::Tick(now) => self.tick(now),
            Message::SlideLoaded {
                target,
                index,
                generation,
                path,
                result,
            } => {
                if let Ok(data) = &result {
                    self.cache.insert(path, data.clone());
                }
                match target {
                    SlideTarget::Carousel(id) => self.update_carousel(
                        &id,
                        carousel::Message::SlideLoaded {
                            index,
                            generation,
                            result,
                        },
                    ),
                    SlideTarget::Lightbox => self.update_lightbox(
                        lightbox::Message::SlideLoaded {
                            index,
                            generation,
                            result,
                        },
                    ),
                }
            }
            Message::Probed {
                carousel_id,
                index,
                size,
            } => self.update_carousel(
                &carousel_id,
                carousel::Message::ProbeResolved { index, size },
            ),
            Message::Prefetched { path, result } => {
                // A failed preload stays quiet; the display load reports it
                // if the slide is actually navigated to.
                if let Ok(data) = result {
                    self.cache.insert(path, data);
                }
                Task::none()
            }
            Message::ThumbLoaded { index, result } => {
                match result {
                    Ok(data) => {
                        if let Some(slot) = self.thumbs.get_mut(index) {
                            *slot = Some(data);
                        }
                    }
                    Err(err) => {
                        eprintln!("Gallery link thumbnail {index} failed to load: {err}");
                    }
                }
                Task::none()
            }
        }
    }

    /// Binds each discovered carousel through the registry and dispatches
    /// the initial slide loads, probes and thumbnail decodes.
    fn mount(&mut self, now: Instant) -> Task<Message> {
        let width = self.content_width();
        let mut tasks = Vec::new();

        for index in 0..self.carousels.len() {
            let id = self.carousels[index].id().to_string();
            if !self.registry.register(&id) {
                eprintln!("Carousel '{id}' is already bound, skipping");
                continue;
            }
            let effects = self.carousels[index].mount(now, width);
            tasks.push(self.carousel_effects_task(&id, effects));
        }

        for (index, link) in self.page.links.iter().enumerate() {
            let uri = link.thumb.clone().unwrap_or_else(|| link.large.clone());
            let path = self.page_dir.join(uri);
            tasks.push(Task::perform(
                media::load_image_task(path),
                move |(_, result)| Message::ThumbLoaded { index, result },
            ));
        }

        Task::batch(tasks)
    }

    fn update_carousel(&mut self, id: &str, message: carousel::Message) -> Task<Message> {
        let now = Instant::now();
        let Some(index) = self.carousels.iter().position(|c| c.id() == id) else {
            return Task::none();
        };
        let effects = self.carousels[index].update(message, now);
        self.carousel_effects_task(id, effects)
    }

    fn update_lightbox(&mut self, message: lightbox::Message) -> Task<Message> {
        let now = Instant::now();
        let effects = match &mut self.lightbox {
            Some(overlay) => overlay.update(message, now),
            None => return Task::none(),
        };
        self.lightbox_effects_task(effects)
    }

    /// Activates the lightbox over the current gallery links.
    ///
    /// While one is mounted its backdrop captures all input, so a second
    /// activation cannot normally happen; the guard keeps the invariant
    /// explicit.
    fn open_lightbox(&mut self, index: usize) -> Task<Message> {
        if self.lightbox.is_some() {
            return Task::none();
        }

        match lightbox::State::open(self.page.lightbox_items(), index) {
            Some((state, effects)) => {
                self.lightbox = Some(state);
                self.input_owner = InputOwner::Lightbox;
                self.scroll_locked = true;
                self.lightbox_effects_task(effects)
            }
            None => Task::none(),
        }
    }

    /// Routes an uncaptured key press to the exclusive input owner.
    fn route_key(&mut self, key: &Key) -> Task<Message> {
        match self.input_owner {
            InputOwner::Lightbox => {
                let message = match key.as_ref() {
                    Key::Named(Named::ArrowRight) => Some(lightbox::Message::NavigateNext),
                    Key::Named(Named::ArrowLeft) => Some(lightbox::Message::NavigatePrevious),
                    Key::Named(Named::Escape) => Some(lightbox::Message::Close),
                    _ => None,
                };
                match message {
                    Some(message) => self.update_lightbox(message),
                    None => Task::none(),
                }
            }
            InputOwner::Page => {
                let message = match key.as_ref() {
                    Key::Named(Named::ArrowRight) => Some(carousel::Message::NavigateNext),
                    Key::Named(Named::ArrowLeft) => Some(carousel::Message::NavigatePrevious),
                    _ => None,
                };
                let Some(message) = message else {
                    return Task::none();
                };
                // Arrow keys act on the carousel the pointer is over, the
                // closest analogue of the focused widget.
                let Some(id) = self
                    .carousels
                    .iter()
                    .find(|c| c.is_hovered())
                    .map(|c| c.id().to_string())
                else {
                    return Task::none();
                };
                self.update_carousel(&id, message)
            }
        }
    }

    fn tick(&mut self, now: Instant) -> Task<Message> {
        let mut tasks = Vec::new();

        for index in 0..self.carousels.len() {
            let effects = self.carousels[index].update(carousel::Message::Tick, now);
            if !effects.is_empty() {
                let id = self.carousels[index].id().to_string();
                tasks.push(self.carousel_effects_task(&id, effects));
            }
        }

        let overlay_effects = self
            .lightbox
            .as_mut()
            .map(|overlay| overlay.update(lightbox::Message::Tick, now));
        if let Some(effects) = overlay_effects {
            tasks.push(self.lightbox_effects_task(effects));
        }

        Task::batch(tasks)
    }

    fn carousel_effects_task(
        &mut self,
        id: &str,
        effects: Vec<carousel::Effect>,
    ) -> Task<Message> {
        let mut tasks = Vec::new();
        for effect in effects {
            match effect {
                carousel::Effect::LoadSlide {
                    uri,
                    index,
                    generation,
                } => {
                    let target = SlideTarget::Carousel(id.to_string());
                    tasks.push(self.load_slide_task(target, &uri, index, generation));
                }
                carousel::Effect::Preload { uris } => {
                    tasks.push(self.preload_task(&uris));
                }
                carousel::Effect::Probe { uri, index } => {
                    let path = self.page_dir.join(&uri);
                    let carousel_id = id.to_string();
                    tasks.push(Task::perform(
                        media::probe_dimensions_task(path),
                        move |(_, size)| Message::Probed {
                            carousel_id: carousel_id.clone(),
                            index,
                            size,
                        },
                    ));
                }
            }
        }
        Task::batch(tasks)
    }

    fn lightbox_effects_task(&mut self, effects: Vec<lightbox::Effect>) -> Task<Message> {
        let mut tasks = Vec::new();
        for effect in effects {
            match effect {
                lightbox::Effect::LoadSlide {
                    uri,
                    index,
                    generation,
                } => {
                    tasks.push(self.load_slide_task(
                        SlideTarget::Lightbox,
                        &uri,
                        index,
                        generation,
                    ));
                }
                lightbox::Effect::Preload { uris } => {
                    tasks.push(self.preload_task(&uris));
                }
                lightbox::Effect::Unmounted => {
                    // Teardown: drop the overlay, return keyboard input to
                    // the page, release the scroll lock.
                    self.lightbox = None;
                    self.input_owner = InputOwner::Page;
                    self.scroll_locked = false;
                }
            }
        }
        Task::batch(tasks)
    }

    /// Dispatches one slide decode, serving it from the preload cache when
    /// possible.
    fn load_slide_task(
        &mut self,
        target: SlideTarget,
        uri: &str,
        index: usize,
        generation: u64,
    ) -> Task<Message> {
        let path = self.page_dir.join(uri);
        if let Some(data) = self.cache.get(&path) {
            return Task::done(Message::SlideLoaded {
                target,
                index,
                generation,
                path,
                result: Ok(data),
            });
        }
        Task::perform(media::load_image_task(path), move |(path, result)| {
            Message::SlideLoaded {
                target: target.clone(),
                index,
                generation,
                path,
                result,
            }
        })
    }

    /// Warms the cache for the URIs not already present.
    fn preload_task(&mut self, uris: &[String]) -> Task<Message> {
        let paths: Vec<PathBuf> = uris.iter().map(|uri| self.page_dir.join(uri)).collect();
        let tasks = self
            .cache
            .paths_to_prefetch(&paths)
            .into_iter()
            .map(|path| {
                Task::perform(media::load_image_task(path), |(path, result)| {
                    Message::Prefetched { path, result }
                })
            })
            .collect::<Vec<_>>();
        Task::batch(tasks)
    }

    /// Width available to a carousel frame inside the page padding.
    fn content_width(&self) -> f32 {
        (self.window_width - 2.0 * spacing::LG).max(0.0)
    }

    /// Whether any component has a pending deadline.
    fn needs_tick(&self) -> bool {
        self.carousels.iter().any(carousel::State::needs_tick)
            || self
                .lightbox
                .as_ref()
                .is_some_and(lightbox::State::needs_tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const PAGE: &str = r#"{
        "title": "Test Page",
        "carousels": [
            {
                "id": "hero",
                "options": { "autoplay": true, "interval_ms": 1000 },
                "payload": [
                    { "variants": { "full": "a.jpg" }, "alt": "a" },
                    { "variants": { "full": "b.jpg" }, "alt": "b" }
                ]
            }
        ],
        "links": [
            { "large": "a.jpg", "alt": "a" },
            { "large": "b.jpg", "alt": "b" },
            { "large": "c.jpg", "alt": "c" }
        ]
    }"#;

    fn app_from(page_json: &str) -> App {
        let dir = tempdir().expect("failed to create temp dir");
        let page_path = dir.path().join("page.json");
        let mut file = std::fs::File::create(&page_path).expect("create page file");
        file.write_all(page_json.as_bytes()).expect("write page");

        let (app, _task) = App::new(Flags {
            lang: Some("en-US".to_string()),
            page_path: Some(page_path.to_string_lossy().into_owned()),
        });
        app
    }

    #[test]
    fn new_binds_discovered_carousels() {
        let app = app_from(PAGE);
        assert_eq!(app.carousels.len(), 1);
        assert!(app.registry.is_bound("hero"));
        assert_eq!(app.title(), "Test Page");
    }

    #[test]
    fn missing_page_document_degrades_to_empty_page() {
        let (app, _task) = App::new(Flags {
            lang: Some("en-US".to_string()),
            page_path: Some("/nonexistent/nowhere/page.json".to_string()),
        });
        assert!(app.carousels.is_empty());
        assert!(app.page.links.is_empty());
    }

    #[test]
    fn link_activation_mounts_lightbox_and_takes_input() {
        let mut app = app_from(PAGE);
        assert_eq!(app.input_owner, InputOwner::Page);

        let _ = app.update(Message::LinkActivated { index: 1 });
        assert!(app.lightbox.is_some());
        assert_eq!(app.input_owner, InputOwner::Lightbox);
        assert!(app.scroll_locked);
        assert_eq!(app.lightbox.as_ref().unwrap().current_index(), 1);
    }

    #[test]
    fn second_activation_while_open_is_ignored() {
        let mut app = app_from(PAGE);
        let _ = app.update(Message::LinkActivated { index: 0 });
        let _ = app.update(Message::LinkActivated { index: 2 });
        assert_eq!(app.lightbox.as_ref().unwrap().current_index(), 0);
    }

    #[test]
    fn activation_with_no_links_is_a_no_op() {
        let mut app = app_from(r#"{ "carousels": [], "links": [] }"#);
        let _ = app.update(Message::LinkActivated { index: 0 });
        assert!(app.lightbox.is_none());
        assert_eq!(app.input_owner, InputOwner::Page);
        assert!(!app.scroll_locked);
    }

    #[test]
    fn escape_routes_to_the_open_lightbox() {
        let mut app = app_from(PAGE);
        let _ = app.update(Message::LinkActivated { index: 0 });

        let _ = app.update(Message::KeyPressed(Key::Named(Named::Escape)));
        assert!(app.lightbox.as_ref().unwrap().is_closing());
    }

    #[test]
    fn arrow_keys_route_to_the_open_lightbox_not_the_page() {
        let mut app = app_from(PAGE);
        let _ = app.update(Message::LinkActivated { index: 0 });

        let _ = app.update(Message::KeyPressed(Key::Named(Named::ArrowRight)));
        assert_eq!(app.lightbox.as_ref().unwrap().current_index(), 1);
        // The carousel behind the overlay did not move.
        assert_eq!(app.carousels[0].current_index(), 0);
    }

    #[test]
    fn unmount_returns_input_to_page_and_unlocks_scroll() {
        let mut app = app_from(PAGE);
        let _ = app.update(Message::LinkActivated { index: 0 });

        let _ = app.lightbox_effects_task(vec![lightbox::Effect::Unmounted]);
        assert!(app.lightbox.is_none());
        assert_eq!(app.input_owner, InputOwner::Page);
        assert!(!app.scroll_locked);

        // A further Escape has nothing to act on.
        let _ = app.update(Message::KeyPressed(Key::Named(Named::Escape)));
        assert!(app.lightbox.is_none());
    }

    #[test]
    fn page_arrow_keys_need_a_hovered_carousel() {
        let mut app = app_from(PAGE);

        let _ = app.update(Message::KeyPressed(Key::Named(Named::ArrowRight)));
        assert_eq!(app.carousels[0].current_index(), 0);

        let _ = app.update(Message::Carousel {
            id: "hero".to_string(),
            message: carousel::Message::PointerEntered,
        });
        let _ = app.update(Message::KeyPressed(Key::Named(Named::ArrowRight)));
        assert_eq!(app.carousels[0].current_index(), 1);
    }

    #[test]
    fn prefetched_slides_land_in_the_cache() {
        let mut app = app_from(PAGE);
        let path = app.page_dir.join("b.jpg");

        let _ = app.update(Message::Prefetched {
            path: path.clone(),
            result: Ok(ImageData::from_rgba(1, 1, vec![0, 0, 0, 255])),
        });
        assert!(app.cache.contains(&path));
    }
}
