//! End-to-end flows through `AppState`

#[cfg(test)]
mod tests {
    use std::fs;

    use morse_core::docs::{MISSING_FACTS, MISSING_PAGE};
    use morse_core::test_utils::ToneCapture;
    use morse_core::{
        updates, AppState, DocTopic, ExportFormat, MorseConfig, MorseError, SpeedPreset,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::time::Duration;

    use crate::default_app;

    const CONFIG: &str = r#"
[general]
log_level = "debug"

[playback]
preset = "fast"
frequency_hz = 600

[challenge]
countdown_secs = 7

[codec]
word_separator = "|"

[mappings]
"!" = "-.-.--"
"#;

    fn app_from(toml: &str, docs_dir: &std::path::Path) -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, toml).unwrap();
        let mut config = MorseConfig::load(&path).unwrap();
        config.general.docs_dir = docs_dir.display().to_string();
        let (tx, _rx) = updates::channel();
        AppState::new(config, tx).unwrap()
    }

    #[test]
    fn test_config_file_drives_state() {
        let docs = tempfile::tempdir().unwrap();
        let mut app = app_from(CONFIG, docs.path());

        assert_eq!((app.timing().dot_ms, app.timing().dash_ms), (100, 300));
        assert_eq!(app.timing().frequency_hz(), 600);
        assert_eq!(app.countdown().get(), 7);
        assert_eq!(app.table().separator(), '|');

        assert_eq!(app.convert_to_morse("hi!").as_str(), ".... .. -.-.--");
        assert_eq!(app.convert_to_text(".... .. | -.-.--"), "HI !");
    }

    #[test]
    fn test_colliding_config_mapping_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[mappings]\n\"!\" = \"...\"\n").unwrap();
        assert!(matches!(
            MorseConfig::load(&path),
            Err(MorseError::CodeCollision { existing: 'S', .. })
        ));
        // the fallback keeps the app usable
        assert_eq!(MorseConfig::load_or_default(&path), MorseConfig::default());
    }

    #[test]
    fn test_config_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let mut app = app_from(CONFIG, docs.path());
        app.set_preset(SpeedPreset::Slow);
        app.set_autoplay(true);

        let path = dir.path().join("saved").join("config.toml");
        app.config().save(&path).unwrap();
        let reloaded = MorseConfig::load(&path).unwrap();
        assert_eq!(&reloaded, app.config());
        assert_eq!(reloaded.playback.preset, Some(SpeedPreset::Slow));
        assert!(reloaded.session.autoplay);
    }

    #[test]
    fn test_docs_and_facts() {
        let docs = tempfile::tempdir().unwrap();
        let app = app_from("", docs.path());
        let mut rng = StdRng::seed_from_u64(11);

        assert_eq!(app.fun_fact(&mut rng), MISSING_FACTS);
        assert_eq!(app.docs().read(DocTopic::HowToUse), MISSING_PAGE);

        fs::write(
            docs.path().join("fun_facts.txt"),
            "Fun facts\n✅ SOS has no letter gaps in its prosign form.\nnot a fact\n",
        )
        .unwrap();
        fs::write(docs.path().join("how_to_use.txt"), "Type text to convert it.").unwrap();

        assert_eq!(
            app.fun_fact(&mut rng),
            "SOS has no letter gaps in its prosign form."
        );
        assert_eq!(app.docs().read(DocTopic::HowToUse), "Type text to convert it.");
    }

    #[test]
    fn test_session_stats_and_export() {
        let (mut app, _rx) = default_app();
        app.convert_to_morse("sos");
        app.auto_convert(".- -...");
        let stats = app.stats();
        // "... --- ..." plus "Auto: Morse→Text: AB"
        assert_eq!((stats.dots, stats.dashes), (6, 3));

        let json = app.log().export(ExportFormat::Json).unwrap();
        let lines: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(lines, ["Text→Morse: ... --- ...", "Auto: Morse→Text: AB"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverse_playback_of_last_output() {
        let (mut app, _rx) = default_app();
        app.convert_to_morse("n");
        let capture = ToneCapture::new();
        app.play_reverse(capture.clone())
            .unwrap()
            .await
            .unwrap()
            .unwrap();
        // "-." reversed
        assert_eq!(capture.to_symbols(Duration::from_millis(400)), ".-");
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_after_playback_finishes() {
        let (app, _rx) = default_app();
        for _ in 0..3 {
            let handle = app.play("..", ToneCapture::new()).unwrap();
            assert!(app.is_busy());
            handle.await.unwrap().unwrap();
            assert!(!app.is_busy());
        }
    }
}
