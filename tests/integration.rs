// SPDX-License-Identifier: MPL-2.0
use iced_gallery::config::{self, Config};
use iced_gallery::i18n::fluent::I18n;
use iced_gallery::page::{GalleryPage, MIN_AUTOPLAY_INTERVAL};
use iced_gallery::ui::theme::ThemeMode;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_language_change_via_config() {
    // Create a temporary directory for the config file
    let dir = tempdir().expect("Failed to create temporary directory");
    let temp_config_file_path = dir.path().join("settings.toml");

    // 1. Initial config: en-US
    let initial_config = Config {
        language: Some("en-US".to_string()),
        theme: Some(ThemeMode::System),
    };
    config::save_to_path(&initial_config, &temp_config_file_path)
        .expect("Failed to write initial config file");

    let loaded_initial_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load initial config from path");
    let i18n_en = I18n::new(None, &loaded_initial_config);
    assert_eq!(i18n_en.current_locale().to_string(), "en-US");

    // 2. Change config to fr
    let french_config = Config {
        language: Some("fr".to_string()),
        theme: Some(ThemeMode::System),
    };
    config::save_to_path(&french_config, &temp_config_file_path)
        .expect("Failed to write french config file");

    let loaded_french_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load french config from path");
    let i18n_fr = I18n::new(None, &loaded_french_config);
    assert_eq!(i18n_fr.current_locale().to_string(), "fr");

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn test_page_document_round_trip_from_disk() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let page_path = dir.path().join("page.json");

    std::fs::write(
        &page_path,
        r#"{
            "title": "Portfolio",
            "payloads": {
                "work": [
                    { "variants": { "480": "img/deck-480.jpg", "full": "img/deck.jpg" }, "alt": "Deck" },
                    { "variants": { "full": "img/fence.jpg" }, "alt": "Fence" }
                ]
            },
            "carousels": [
                { "id": "work", "options": { "autoplay": true, "interval_ms": 250 }, "payload_ref": "work" }
            ],
            "links": [
                { "large": "img/deck.jpg", "thumb": "img/deck-480.jpg", "alt": "Deck" }
            ]
        }"#,
    )
    .expect("Failed to write page document");

    let page = GalleryPage::load(&page_path).expect("Page should load");
    assert_eq!(page.title.as_deref(), Some("Portfolio"));
    assert_eq!(page.carousels.len(), 1);
    assert_eq!(page.carousels[0].items.len(), 2);
    // The configured 250ms interval is floored.
    assert_eq!(page.carousels[0].options.interval, MIN_AUTOPLAY_INTERVAL);
    assert_eq!(MIN_AUTOPLAY_INTERVAL, Duration::from_millis(800));

    let lightbox_items = page.lightbox_items();
    assert_eq!(lightbox_items.len(), 1);
    assert_eq!(lightbox_items[0].best_variant(), "img/deck.jpg");
}

#[test]
fn test_missing_page_document_is_an_error_not_a_panic() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let missing = dir.path().join("nope.json");
    assert!(GalleryPage::load(&missing).is_err());
}

#[test]
fn test_malformed_page_payload_degrades_to_inert_widget() {
    let raw = r#"{
        "carousels": [
            { "id": "broken", "payload": { "this is": "not an array" } }
        ]
    }"#;
    let page = GalleryPage::from_json(raw).expect("Document itself is valid JSON");
    assert_eq!(page.carousels.len(), 1);
    assert!(page.carousels[0].items.is_empty());
}
