//! Print-resolution composition with real image files

use printbooth::background::{BackgroundChoice, HexColor};
use printbooth::capability::Rasterizer;
use printbooth::compositor::{render_to_file, CompositionScene, ImageCompositor};
use printbooth::config::BoothConfig;
use printbooth::export::Exporter;
use printbooth::capability::LogSharer;
use printbooth::storage::DirectoryGallery;
use printbooth::templates::TemplateRegistry;
use printbooth::testing::{synthetic_photo, FailingGallery};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

fn photos(dir: &std::path::Path, count: usize) -> Vec<String> {
    (0..count).map(|i| synthetic_photo(dir, i).unwrap()).collect()
}

#[test]
fn strip_exports_at_print_size() {
    let dir = tempfile::tempdir().unwrap();
    let registry = TemplateRegistry::builtin();
    let strip = registry.get("4-strip").unwrap();
    let config = BoothConfig::default();
    let teal = HexColor::rgb(0x1A, 0xBC, 0x9C);

    let scene = CompositionScene::build(
        strip,
        &photos(dir.path(), 4),
        &BackgroundChoice::Preset("teal".into()),
        &config.branding,
    )
    .unwrap();
    assert!(scene.is_complete());

    let out = dir.path().join("out").join("strip.png");
    render_to_file(&ImageCompositor::default(), &scene, &out, image::ImageFormat::Png).unwrap();

    let rendered = image::open(&out).unwrap().to_rgba8();
    assert_eq!(rendered.dimensions(), strip.print_size_px());
    assert_eq!(rendered.get_pixel(2, 2), &Rgba(teal.to_rgba()));

    // Centre of the first cell holds photo pixels, not background.
    let cell = &scene.slots[0].placement;
    let centre = rendered.get_pixel(
        (cell.x + cell.width / 2.0) as u32,
        (cell.y + cell.height / 2.0) as u32,
    );
    assert_ne!(centre, &Rgba(teal.to_rgba()));
}

#[test]
fn image_background_and_logo_assets_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 255]))
        .save(assets.join("bg3.png"))
        .unwrap();
    let logo = assets.join("logo.png");
    RgbaImage::from_pixel(32, 32, Rgba([250, 0, 0, 255]))
        .save(&logo)
        .unwrap();

    let mut config = BoothConfig::default();
    config.branding.assets_dir = assets.display().to_string();
    config.branding.logo_path = Some(logo.display().to_string());

    let registry = TemplateRegistry::builtin();
    let grid = registry.get("4-grid").unwrap();
    let scene = CompositionScene::build(
        grid,
        &photos(dir.path(), 4),
        &BackgroundChoice::Preset("beach".into()),
        &config.branding,
    )
    .unwrap();

    let (w, h) = scene.print_size();
    let rendered = ImageCompositor::default().rasterize(&scene, w, h).unwrap();
    assert_eq!(rendered.get_pixel(1, 1), &Rgba([10, 20, 30, 255]));

    let logo_slot = scene
        .slots
        .iter()
        .find(|s| s.placement.role == printbooth::SlotRole::Logo)
        .unwrap();
    let p = &logo_slot.placement;
    let centre = rendered.get_pixel((p.x + p.width / 2.0) as u32, (p.y + p.height / 2.0) as u32);
    assert_eq!(centre, &Rgba([250, 0, 0, 255]));
}

#[test]
fn missing_background_asset_is_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = BoothConfig::default();
    config.branding.assets_dir = dir.path().display().to_string();

    let registry = TemplateRegistry::builtin();
    let grid = registry.get("4-grid").unwrap();
    let scene = CompositionScene::build(
        grid,
        &[],
        &BackgroundChoice::Preset("nature1".into()),
        &config.branding,
    )
    .unwrap();
    assert!(matches!(
        ImageCompositor::default().rasterize(&scene, 100, 100),
        Err(printbooth::BoothError::Render(_))
    ));
}

#[test]
fn strip_download_lands_in_strip_album() {
    let dir = tempfile::tempdir().unwrap();
    let gallery_root = dir.path().join("gallery");
    let config = BoothConfig::default();

    let exporter = Exporter::new(
        Arc::new(DirectoryGallery::new(&gallery_root)),
        Arc::new(ImageCompositor::default()),
        Arc::new(LogSharer),
        config.export.clone(),
    )
    .with_work_dir(dir.path().join("work"));

    let registry = TemplateRegistry::builtin();
    let landscape = registry.get("4-landscape").unwrap();
    let scene = CompositionScene::build(
        landscape,
        &photos(dir.path(), 4),
        &BackgroundChoice::Custom(HexColor::rgb(0, 0, 0)),
        &config.branding,
    )
    .unwrap();

    exporter.download_strip(&scene).unwrap();
    assert!(!exporter.is_downloading());

    let album = gallery_root.join("JR Studio Photo Booth");
    let saved: Vec<_> = std::fs::read_dir(album).unwrap().collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn incomplete_strip_is_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let config = BoothConfig::default();
    let exporter = Exporter::new(
        Arc::new(DirectoryGallery::new(dir.path())),
        Arc::new(ImageCompositor::default()),
        Arc::new(LogSharer),
        config.export.clone(),
    );

    let registry = TemplateRegistry::builtin();
    let grid = registry.get("4-grid").unwrap();
    let scene = CompositionScene::build(
        grid,
        &photos(dir.path(), 2),
        &BackgroundChoice::Preset("blue".into()),
        &config.branding,
    )
    .unwrap();
    assert!(exporter.download_strip(&scene).is_err());
    assert!(!exporter.is_downloading());
}

#[test]
fn failed_album_write_is_surfaced_and_clears_busy_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = BoothConfig::default();
    let exporter = Exporter::new(
        Arc::new(FailingGallery),
        Arc::new(ImageCompositor::default()),
        Arc::new(LogSharer),
        config.export.clone(),
    )
    .with_work_dir(dir.path().join("work"));

    let registry = TemplateRegistry::builtin();
    let strip = registry.get("4-strip").unwrap();
    let scene = CompositionScene::build(
        strip,
        &photos(dir.path(), 4),
        &BackgroundChoice::Preset("pink".into()),
        &config.branding,
    )
    .unwrap();

    let err = exporter.download_strip(&scene).unwrap_err();
    assert!(matches!(err, printbooth::BoothError::Io(_)));
    assert!(!err.user_notice().offers_retry);
    assert!(!exporter.is_downloading());

    // The busy flag is free again, so the user can trigger another attempt.
    assert!(matches!(
        exporter.download_strip(&scene),
        Err(printbooth::BoothError::Io(_))
    ));
}
