//! Session log export and reload

#[cfg(test)]
mod tests {
    use morse_core::{ExportFormat, SessionLog};
    use rstest::rstest;
    use tokio_test::{assert_err, assert_ok};

    fn log_with(entries: &[&str]) -> SessionLog {
        let mut log = SessionLog::new();
        for entry in entries {
            log.append(entry);
        }
        log
    }

    #[rstest]
    #[case(&[])]
    #[case(&["Text→Morse: ... --- ..."])]
    #[case(&["Auto: Text→Morse: .... ..", "Challenge: --.- .-. --..", "Answer: QRZ"])]
    fn test_json_holds_every_line(#[case] entries: &[&str]) {
        let log = log_with(entries);
        let json = log.export(ExportFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entries);
    }

    #[rstest]
    #[case(&["Morse→Text: SOS"], "Morse→Text: SOS\r\n")]
    #[case(&["a, b", "say \"hi\""], "\"a, b\"\r\n\"say \"\"hi\"\"\"\r\n")]
    fn test_csv_one_row_per_line(#[case] entries: &[&str], #[case] expected: &str) {
        let log = log_with(entries);
        let csv = log.export(ExportFormat::Csv).unwrap();
        assert_eq!(csv, expected);
        assert_eq!(csv.matches("\r\n").count(), entries.len());
    }

    #[test]
    fn test_markdown_and_text() {
        let log = log_with(&["Text→Morse: .-", "Answer: ABC"]);
        assert_eq!(
            log.export(ExportFormat::Markdown).unwrap(),
            "- Text→Morse: .-\n- Answer: ABC"
        );
        assert_eq!(
            log.export(ExportFormat::Text).unwrap(),
            "Text→Morse: .-\nAnswer: ABC"
        );
    }

    #[rstest]
    #[case("log.txt", ExportFormat::Text)]
    #[case("log.json", ExportFormat::Json)]
    #[case("log.csv", ExportFormat::Csv)]
    #[case("log.md", ExportFormat::Markdown)]
    fn test_save_to_disk(#[case] name: &str, #[case] format: ExportFormat) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(name);
        let log = log_with(&["Text→Morse: ... --- ...", "Morse→Text: SOS"]);

        assert_eq!(ExportFormat::from_path(&path), Some(format));
        assert_ok!(log.save(&path, format));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, log.export(format).unwrap());
    }

    #[test]
    fn test_text_export_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        let log = log_with(&["Text→Morse: .... ..", "Answer: HIT"]);
        log.save(&path, ExportFormat::Text).unwrap();

        let mut reloaded = log_with(&["something older"]);
        reloaded.load_file(&path).unwrap();
        assert_eq!(reloaded, log);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = SessionLog::new();
        assert_err!(log.load_file(&dir.path().join("missing.txt")));
        assert!(log.is_empty());
    }
}
