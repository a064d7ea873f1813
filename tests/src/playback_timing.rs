//! Playback timing measured on a paused clock

#[cfg(test)]
mod tests {
    use morse_core::sequencer::{layout, plan, total_duration_ms};
    use morse_core::test_utils::ToneCapture;
    use morse_core::{
        updates, Element, MorseError, PlaybackGuard, PlaybackUpdate, Sequencer, SpeedPreset,
        TimingProfile, UiUpdate,
    };
    use rstest::rstest;
    use tokio::time::Duration;

    use crate::drain;

    fn assert_close(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        let diff = if actual > expected {
            actual - expected
        } else {
            expected - actual
        };
        assert!(
            diff <= Duration::from_millis(1),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[rstest]
    #[case(SpeedPreset::Slow, 300, 900)]
    #[case(SpeedPreset::Normal, 200, 600)]
    #[case(SpeedPreset::Fast, 100, 300)]
    #[tokio::test(start_paused = true)]
    async fn test_tone_lengths_follow_preset(
        #[case] preset: SpeedPreset,
        #[case] dot_ms: u64,
        #[case] dash_ms: u64,
    ) {
        let (tx, _rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let capture = ToneCapture::new();
        let sequencer = Sequencer::new(TimingProfile::from_preset(preset, 750), '/');

        sequencer
            .spawn(".-", capture.clone(), tx, guard.try_acquire().unwrap())
            .await
            .unwrap()
            .unwrap();

        let spans = capture.spans();
        assert_eq!(spans.len(), 2);
        assert_close(spans[0].duration, dot_ms);
        assert_close(spans[1].duration, dash_ms);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sos_pattern_and_gaps() {
        let (tx, _rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let capture = ToneCapture::new();
        let sequencer = Sequencer::new(TimingProfile::default(), '/');

        sequencer
            .spawn("... --- ...", capture.clone(), tx, guard.try_acquire().unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(capture.to_symbols(Duration::from_millis(400)), "...---...");
        let gaps = capture.gaps();
        assert_eq!(gaps.len(), 8);
        // letters are separated by the letter gap, elements are back to back
        for (i, gap) in gaps.iter().enumerate() {
            assert_close(*gap, if i == 2 || i == 5 { 200 } else { 0 });
        }
        assert_close(capture.total_span(), 3 * 200 + 3 * 600 + 3 * 200 + 2 * 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_word_separator_pause() {
        let (tx, _rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let capture = ToneCapture::new();
        let sequencer = Sequencer::new(TimingProfile::default(), '/');

        sequencer
            .spawn(". / .", capture.clone(), tx, guard.try_acquire().unwrap())
            .await
            .unwrap()
            .unwrap();

        // letter gap + word gap + letter gap
        assert_eq!(capture.gaps().len(), 1);
        assert_close(capture.gaps()[0], 200 + 600 + 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_frequency_is_clamped() {
        let (tx, _rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let capture = ToneCapture::new();
        let sequencer = Sequencer::new(TimingProfile::new(200, 600, 5), '/');

        sequencer
            .spawn(".", capture.clone(), tx, guard.try_acquire().unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(capture.spans()[0].frequency_hz, 37);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_sequence() {
        let (tx, mut rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let sequencer = Sequencer::new(TimingProfile::default(), '/');

        sequencer
            .spawn(".- x", ToneCapture::new(), tx, guard.try_acquire().unwrap())
            .await
            .unwrap()
            .unwrap();

        let updates = drain(&mut rx);
        assert_eq!(
            updates,
            vec![
                UiUpdate::Playback(PlaybackUpdate::Started {
                    layout: layout(".- x", '/'),
                    total_ms: 1000,
                }),
                UiUpdate::Playback(PlaybackUpdate::Highlight { index: 0 }),
                UiUpdate::Playback(PlaybackUpdate::Highlight { index: 1 }),
                UiUpdate::Playback(PlaybackUpdate::Finished),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tone_failure_reports_and_releases() {
        let (tx, mut rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let capture = ToneCapture::fail_after(1);
        let sequencer = Sequencer::new(TimingProfile::default(), '/');

        let result = sequencer
            .spawn("..", capture.clone(), tx, guard.try_acquire().unwrap())
            .await
            .unwrap();

        assert!(matches!(result, Err(MorseError::Tone(_))));
        assert_eq!(capture.spans().len(), 1);
        assert!(!guard.is_busy());
        assert!(matches!(
            drain(&mut rx).last(),
            Some(UiUpdate::Playback(PlaybackUpdate::Failed { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_playback_rejected() {
        let (tx, _rx) = updates::channel();
        let guard = PlaybackGuard::new();
        let sequencer = Sequencer::new(TimingProfile::default(), '/');

        let first = sequencer.spawn("-", ToneCapture::new(), tx, guard.try_acquire().unwrap());
        assert!(matches!(guard.try_acquire(), Err(MorseError::Busy)));

        first.await.unwrap().unwrap();
        assert!(guard.try_acquire().is_ok());
    }

    #[test]
    fn test_plan_skips_foreign_symbols() {
        let steps = plan("?.x-", &TimingProfile::default(), '/');
        let elements: Vec<_> = steps.iter().map(|s| s.element).collect();
        assert_eq!(elements, vec![Element::Dot, Element::Dash]);
        assert_eq!(total_duration_ms(&steps), 800);
    }
}
