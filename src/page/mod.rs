// SPDX-License-Identifier: MPL-2.0
//! Gallery page document: the declarative description of which widgets exist
//! and what they display.
//!
//! The page is a JSON document listing carousel instances (each with its
//! options and data payload) and the gallery links the lightbox navigates
//! over. It is the stand-in for the hosting markup the original widgets were
//! attached to: widget discovery happens once at load time, and an explicit
//! id registry replaces "is this container already bound" marker attributes.

pub mod descriptor;

use crate::error::Result;
use descriptor::ImageItem;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Minimum autoplay interval. Configured intervals below this are clamped.
pub const MIN_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(800);

/// Autoplay interval applied when the page does not configure one.
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(4000);

/// Direction of automatic advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoplayDirection {
    #[default]
    Forward,
    Backward,
}

/// Per-carousel configuration recognized from the page document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselOptions {
    pub autoplay: bool,
    pub interval: Duration,
    pub direction: AutoplayDirection,
    pub pause_on_hover: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            autoplay: false,
            interval: DEFAULT_AUTOPLAY_INTERVAL,
            direction: AutoplayDirection::Forward,
            pause_on_hover: true,
        }
    }
}

impl CarouselOptions {
    /// Builds validated options from raw document values, clamping the
    /// interval to [`MIN_AUTOPLAY_INTERVAL`] once at parse time.
    fn from_raw(widget_id: &str, raw: RawOptions) -> Self {
        let configured = Duration::from_millis(
            raw.interval_ms
                .unwrap_or(DEFAULT_AUTOPLAY_INTERVAL.as_millis() as u64),
        );
        let interval = if configured < MIN_AUTOPLAY_INTERVAL {
            if raw.autoplay {
                eprintln!(
                    "Carousel '{widget_id}': autoplay interval {}ms below floor, using {}ms",
                    configured.as_millis(),
                    MIN_AUTOPLAY_INTERVAL.as_millis()
                );
            }
            MIN_AUTOPLAY_INTERVAL
        } else {
            configured
        };

        Self {
            autoplay: raw.autoplay,
            interval,
            direction: raw.direction,
            pause_on_hover: raw.pause_on_hover,
        }
    }
}

/// One carousel instance discovered on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselDef {
    pub id: String,
    pub options: CarouselOptions,
    pub items: Vec<ImageItem>,
}

/// One lightbox trigger: a link to a large image with its caption text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GalleryLink {
    pub large: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub alt: String,
}

impl GalleryLink {
    /// The item the lightbox displays for this link.
    #[must_use]
    pub fn to_item(&self) -> ImageItem {
        let mut variants = std::collections::BTreeMap::new();
        variants.insert(descriptor::Breakpoint::Full, self.large.clone());
        ImageItem {
            variants,
            alt_text: self.alt.clone(),
        }
    }
}

/// The parsed page document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryPage {
    pub title: Option<String>,
    pub carousels: Vec<CarouselDef>,
    pub links: Vec<GalleryLink>,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    #[serde(default)]
    autoplay: bool,
    #[serde(default)]
    interval_ms: Option<u64>,
    #[serde(default)]
    direction: AutoplayDirection,
    #[serde(default = "default_pause_on_hover")]
    pause_on_hover: bool,
}

fn default_pause_on_hover() -> bool {
    true
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            autoplay: false,
            interval_ms: None,
            direction: AutoplayDirection::Forward,
            pause_on_hover: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCarousel {
    id: String,
    #[serde(default)]
    options: RawOptions,
    /// Inline payload (the sibling-position association form).
    #[serde(default)]
    payload: Option<serde_json::Value>,
    /// Reference into the page payload table (the id association form).
    #[serde(default)]
    payload_ref: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPage {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    payloads: HashMap<String, serde_json::Value>,
    #[serde(default)]
    carousels: Vec<RawCarousel>,
    #[serde(default)]
    links: Vec<GalleryLink>,
}

impl GalleryPage {
    /// Loads and parses a page document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and [`Error::Page`]
    /// when the document is not valid JSON. Callers degrade to an empty page
    /// rather than failing the application.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses a page document from its JSON source.
    ///
    /// Widget-level problems (missing or malformed payloads, duplicate ids)
    /// degrade the affected widget only; a document that is not valid JSON
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Page`] when `raw` is not valid JSON.
    pub fn from_json(raw: &str) -> Result<Self> {
        let page: RawPage = serde_json::from_str(raw)?;

        let mut registry = WidgetRegistry::new();
        let mut carousels = Vec::with_capacity(page.carousels.len());
        for raw_carousel in page.carousels {
            if !registry.register(&raw_carousel.id) {
                eprintln!(
                    "Skipping carousel with duplicate id '{}'",
                    raw_carousel.id
                );
                continue;
            }

            let items = resolve_payload(&raw_carousel, &page.payloads);
            let options = CarouselOptions::from_raw(&raw_carousel.id, raw_carousel.options);
            carousels.push(CarouselDef {
                id: raw_carousel.id,
                options,
                items,
            });
        }

        Ok(Self {
            title: page.title,
            carousels,
            links: page.links,
        })
    }

    /// Builds the lightbox item list from all gallery links, in document
    /// order. Captured once per activation.
    #[must_use]
    pub fn lightbox_items(&self) -> Vec<ImageItem> {
        self.links.iter().map(GalleryLink::to_item).collect()
    }
}

/// Resolves a carousel's payload: inline first, then the payload table.
/// Absent payloads are silently empty; malformed ones report and degrade.
fn resolve_payload(
    raw: &RawCarousel,
    payloads: &HashMap<String, serde_json::Value>,
) -> Vec<ImageItem> {
    if let Some(value) = &raw.payload {
        return descriptor::parse_payload(&raw.id, value);
    }
    if let Some(key) = &raw.payload_ref {
        return match payloads.get(key) {
            Some(value) => descriptor::parse_payload(&raw.id, value),
            // Missing payload: the widget is inert, nothing to report.
            None => Vec::new(),
        };
    }
    Vec::new()
}

/// Explicit registry of bound widget ids.
///
/// Replaces the original's "already initialized" marker attribute with
/// state owned by the page coordinator.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    bound: HashSet<String>,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a widget id. Returns `false` when the id is already bound.
    pub fn register(&mut self, id: &str) -> bool {
        self.bound.insert(id.to_string())
    }

    /// Whether the id has been bound.
    #[must_use]
    pub fn is_bound(&self, id: &str) -> bool {
        self.bound.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
