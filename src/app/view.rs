// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Lays out the page — title, carousels, gallery links — and stacks the
//! lightbox overlay on top while one is mounted. While the overlay is
//! mounted the page behind it does not scroll.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::page::GalleryLink;
use crate::ui::carousel;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::lightbox;
use crate::ui::theme::ThemeMode;
use iced::alignment::Horizontal;
use iced::widget::{button, Column, Container, Image, Row, Scrollable, Stack, Text};
use iced::{Element, Length};
use std::time::Instant;

const THUMB_HEIGHT: f32 = 96.0;

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub theme_mode: ThemeMode,
    pub title: Option<&'a str>,
    pub carousels: &'a [carousel::State],
    pub links: &'a [GalleryLink],
    pub thumbs: &'a [Option<ImageData>],
    pub lightbox: Option<&'a lightbox::State>,
    pub scroll_locked: bool,
    pub now: Instant,
}

/// Renders the page with the lightbox overlay stacked above it when open.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let mut page = Column::new().spacing(spacing::LG).padding(spacing::LG);

    if let Some(title) = ctx.title {
        page = page.push(Text::new(title).size(typography::TITLE_LG));
    }

    for instance in ctx.carousels {
        let id = instance.id().to_string();
        page = page.push(
            instance
                .view(ctx.i18n, ctx.theme_mode, ctx.now)
                .map(move |message| Message::Carousel {
                    id: id.clone(),
                    message,
                }),
        );
    }

    if !ctx.links.is_empty() {
        page = page.push(view_gallery_links(ctx.i18n, ctx.links, ctx.thumbs));
    }

    let page = page.width(Length::Fill);

    // Scroll lock: while the overlay is mounted the page is a plain
    // container, so wheel and drag input cannot move it.
    let page_layer: Element<'_, Message> = if ctx.scroll_locked {
        Container::new(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    } else {
        Scrollable::new(page).width(Length::Fill).into()
    };

    match ctx.lightbox {
        Some(overlay) => Stack::new()
            .push(page_layer)
            .push(overlay.view(ctx.i18n, ctx.now).map(Message::Lightbox))
            .into(),
        None => page_layer,
    }
}

/// The gallery link strip. Each link shows its thumbnail when decoded and
/// its alt text otherwise, and activates the lightbox on press.
fn view_gallery_links<'a>(
    i18n: &'a I18n,
    links: &'a [GalleryLink],
    thumbs: &'a [Option<ImageData>],
) -> Element<'a, Message> {
    let mut row = Row::new().spacing(spacing::SM);

    for (index, link) in links.iter().enumerate() {
        let content: Element<'a, Message> = match thumbs.get(index).and_then(Option::as_ref) {
            Some(data) => Image::new(data.handle.clone())
                .height(Length::Fixed(THUMB_HEIGHT))
                .into(),
            None => Text::new(if link.alt.is_empty() {
                i18n.tr("gallery-link-untitled")
            } else {
                link.alt.clone()
            })
            .size(typography::BODY)
            .into(),
        };

        row = row.push(
            button(content)
                .padding(spacing::XXS)
                .on_press(Message::LinkActivated { index }),
        );
    }

    Container::new(row)
        .width(Length::Fill)
        .align_x(Horizontal::Left)
        .into()
}
