//! Headless booth runs end to end

#[cfg(feature = "headless")]
mod headless_tests {
    use printbooth::config::BoothConfig;
    use printbooth::headless;
    use printbooth::sizing::Viewport;
    use printbooth::templates::TemplateRegistry;
    use printbooth::testing::{synthetic_photo, ScriptedCamera, ShutterOutcome};
    use printbooth::BoothError;

    fn fast_config(dir: &std::path::Path) -> BoothConfig {
        let mut config = BoothConfig::default();
        config.capture.tick_interval_ms = 1;
        config.capture.auto_advance_delay_ms = 1;
        config.storage.app_storage_dir = dir.join("storage").display().to_string();
        config.branding.assets_dir = dir.join("assets").display().to_string();
        config
    }

    #[test]
    fn test_geometry_follows_viewport_orientation() {
        let registry = TemplateRegistry::builtin();
        let config = BoothConfig::default();

        let portrait = headless::geometry(&registry, &config, "4-grid", Viewport::new(390.0, 844.0))
            .unwrap();
        assert!(portrait.max_width <= 390.0 - 100.0 + 1e-9);

        let landscape =
            headless::geometry(&registry, &config, "4-grid", Viewport::new(844.0, 390.0)).unwrap();
        assert!((landscape.max_width - 506.4).abs() < 1e-9);
    }

    #[test]
    fn test_layout_rejects_bad_scale() {
        let registry = TemplateRegistry::builtin();
        for scale in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                headless::layout(&registry, "4-strip", scale),
                Err(BoothError::MalformedParams(_))
            ));
        }
        assert_eq!(headless::layout(&registry, "4-strip", 0.5).unwrap().len(), 4);
    }

    #[test]
    fn test_compose_requires_every_photo() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::builtin();
        let config = fast_config(dir.path());
        let photos = vec![synthetic_photo(dir.path(), 0).unwrap()];

        let err = headless::compose(
            &registry,
            &config,
            "4-grid",
            "blue",
            photos,
            &dir.path().join("out.png"),
        )
        .unwrap_err();
        assert!(matches!(err, BoothError::MalformedParams(_)));
    }

    #[test]
    fn test_compose_writes_jpeg_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::builtin();
        let config = fast_config(dir.path());
        let photos = (0..5)
            .map(|i| synthetic_photo(dir.path(), i).unwrap())
            .collect();

        let out = dir.path().join("collage.jpg");
        let report =
            headless::compose(&registry, &config, "5-collage", "#336699", photos, &out).unwrap();
        assert_eq!(report.template_id, "5-collage");
        assert_eq!(
            image::ImageFormat::from_path(&report.path).unwrap(),
            image::ImageFormat::Jpeg
        );
        let written = image::open(&report.path).unwrap();
        assert_eq!((written.width(), written.height()), (report.width, report.height));
    }

    #[tokio::test]
    async fn test_capture_then_compose() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::builtin();
        let config = fast_config(dir.path());
        let camera = ScriptedCamera::new(dir.path().join("scratch"))
            .with_script([ShutterOutcome::Failure("blink".into())]);

        let uris = headless::capture(&registry, &config, "4-landscape", camera)
            .await
            .unwrap();
        assert_eq!(uris.len(), 4);
        for uri in &uris {
            assert!(uri.contains("storage"));
        }

        let report = headless::compose(
            &registry,
            &config,
            "4-landscape",
            "orange",
            uris,
            &dir.path().join("landscape.png"),
        )
        .unwrap();
        assert!(report.width > report.height);
    }
}
