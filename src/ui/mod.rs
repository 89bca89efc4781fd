// SPDX-License-Identifier: MPL-2.0
//! UI components and shared presentation state.

pub mod carousel;
pub mod design_tokens;
pub mod lightbox;
pub mod styles;
pub mod theme;

use crate::media::ImageData;

/// Display state of the slide a widget is currently showing.
///
/// Shared by the carousel and the lightbox, which are structurally parallel
/// in how they bind one visible slide at a time.
#[derive(Debug, Clone, Default)]
pub enum SlideState {
    /// Nothing requested yet (inert widgets stay here).
    #[default]
    Empty,
    /// A decode is in flight.
    Loading,
    /// Decoded and displayable.
    Ready(ImageData),
    /// The decode failed; the slide shows the broken-image fallback.
    Failed,
}

impl SlideState {
    /// Whether a decoded image is available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, SlideState::Ready(_))
    }
}
