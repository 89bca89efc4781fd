// SPDX-License-Identifier: MPL-2.0
//! `iced_gallery` renders a marketing page's media widgets — image
//! carousels and a full-screen lightbox — with the Iced GUI framework.
//!
//! The page is described by a JSON document listing carousel instances and
//! gallery links; the widgets own all navigation, autoplay, sizing and
//! overlay state and degrade to inert when their data is missing or
//! malformed.

#![doc(html_root_url = "https://docs.rs/iced_gallery/0.2.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod media;
pub mod page;
pub mod timing;
pub mod ui;
