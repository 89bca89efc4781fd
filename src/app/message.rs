// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::Error;
use crate::media::{ImageData, NaturalSize};
use crate::ui::carousel;
use crate::ui::lightbox;
use std::path::PathBuf;
use std::time::Instant;

/// Which widget a finished slide decode belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideTarget {
    Carousel(String),
    Lightbox,
}

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Carousel {
        id: String,
        message: carousel::Message,
    },
    Lightbox(lightbox::Message),
    /// A gallery link was activated: open the lightbox on that item.
    LinkActivated { index: usize },
    /// A key press that no widget captured; routed by the input owner.
    KeyPressed(iced::keyboard::Key),
    /// The window (viewport) was resized.
    WindowResized(iced::Size),
    /// Periodic tick driving all deadline handles.
    Tick(Instant),
    /// Result of a slide decode dispatched for a widget.
    SlideLoaded {
        target: SlideTarget,
        index: usize,
        generation: u64,
        path: PathBuf,
        result: Result<ImageData, Error>,
    },
    /// Result of a natural-dimension probe for a carousel item.
    Probed {
        carousel_id: String,
        index: usize,
        size: Option<NaturalSize>,
    },
    /// Result of a background preload.
    Prefetched {
        path: PathBuf,
        result: Result<ImageData, Error>,
    },
    /// Result of a gallery link thumbnail decode.
    ThumbLoaded {
        index: usize,
        result: Result<ImageData, Error>,
    },
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Path to the gallery page document. Defaults to `page.json` in the
    /// working directory.
    pub page_path: Option<String>,
}
