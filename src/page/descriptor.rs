// SPDX-License-Identifier: MPL-2.0
//! Image descriptor store: parses a per-widget data payload into the ordered
//! item list the carousel and lightbox navigate over.
//!
//! A payload is a JSON array of objects, each carrying a breakpoint-keyed
//! variant map and an alt text. Malformed payloads degrade to an empty list
//! (the widget goes inert) and the error is reported on stderr; a missing
//! payload is an empty list with no report at all.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Breakpoint tag keying an image variant. Ordered smallest to largest so
/// the largest available variant is always `variants.keys().last()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Breakpoint {
    #[serde(rename = "480")]
    W480,
    #[serde(rename = "800")]
    W800,
    #[serde(rename = "full")]
    Full,
}

impl Breakpoint {
    /// The rendered width (px) up to which this variant is the preferred
    /// source. `Full` has no upper bound.
    #[must_use]
    pub fn max_width(self) -> Option<u32> {
        match self {
            Breakpoint::W480 => Some(480),
            Breakpoint::W800 => Some(800),
            Breakpoint::Full => None,
        }
    }
}

/// One logical picture with its alternate-resolution variants.
///
/// Immutable once parsed; item order matches payload order and is the sole
/// navigation axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    pub variants: BTreeMap<Breakpoint, String>,
    #[serde(default, rename = "alt")]
    pub alt_text: String,
}

impl ImageItem {
    /// Returns the largest available variant URI.
    ///
    /// # Panics
    ///
    /// Panics if the variant map is empty; `parse_payload` never yields such
    /// an item.
    #[must_use]
    pub fn best_variant(&self) -> &str {
        self.variants
            .values()
            .next_back()
            .expect("ImageItem has at least one variant")
    }

    /// Returns the smallest variant that still covers `width` rendered
    /// pixels, falling back to the largest available.
    #[must_use]
    pub fn variant_for_width(&self, width: u32) -> &str {
        self.variants
            .iter()
            .find(|(bp, _)| bp.max_width().is_none_or(|max| width <= max))
            .map_or_else(|| self.best_variant(), |(_, uri)| uri.as_str())
    }
}

/// Parses a payload value into an ordered item list.
///
/// A payload that is not an array of well-formed items yields an empty list
/// and one stderr line. Individual items with an empty variant map are
/// dropped (reported) without discarding their siblings.
#[must_use]
pub fn parse_payload(widget_id: &str, value: &serde_json::Value) -> Vec<ImageItem> {
    let items: Vec<ImageItem> = match serde_json::from_value(value.clone()) {
        Ok(items) => items,
        Err(err) => {
            eprintln!(
                "Widget '{widget_id}': {}",
                Error::Payload(err.to_string())
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter(|item| {
            if item.variants.is_empty() {
                eprintln!("Dropping variant-less item in payload for widget '{widget_id}'");
                false
            } else {
                true
            }
        })
        .collect()
}
