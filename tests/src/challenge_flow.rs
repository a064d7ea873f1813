//! Challenge rounds from start to reveal

#[cfg(test)]
mod tests {
    use morse_core::test_utils::ToneCapture;
    use morse_core::{
        decode, ChallengeUpdate, MorseError, PlaybackUpdate, SymbolTable, UiUpdate,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;
    use tokio::time::{Duration, Instant};

    use crate::{default_app, drain};

    fn challenge_updates(updates: &[UiUpdate]) -> Vec<ChallengeUpdate> {
        updates
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Challenge(c) => Some(c.clone()),
                UiUpdate::Playback(_) => None,
            })
            .collect()
    }

    #[rstest]
    #[case(5)]
    #[case(10)]
    #[case(30)]
    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_to_reveal(#[case] secs: u32) {
        let (mut app, mut rx) = default_app();
        app.set_countdown(secs).unwrap();
        let started = Instant::now();

        let handle = app
            .start_challenge(&mut StdRng::seed_from_u64(1), ToneCapture::new())
            .unwrap();
        let answer = handle.await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(secs as u64));
        let challenge = challenge_updates(&drain(&mut rx));
        assert_eq!(challenge.len(), secs as usize + 2);

        let ChallengeUpdate::Generated { morse } = &challenge[0] else {
            panic!("first update should be Generated, got {:?}", challenge[0]);
        };
        assert_eq!(decode(&SymbolTable::new(), morse), answer);

        let remaining: Vec<u32> = challenge[1..=secs as usize]
            .iter()
            .map(|u| match u {
                ChallengeUpdate::Tick { remaining, .. } => *remaining,
                other => panic!("expected tick, got {other:?}"),
            })
            .collect();
        assert_eq!(remaining, (1..=secs).rev().collect::<Vec<_>>());
        assert_eq!(
            challenge.last(),
            Some(&ChallengeUpdate::Revealed {
                answer: answer.clone()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_logged_when_applied() {
        let (mut app, mut rx) = default_app();
        app.set_countdown(5).unwrap();
        let handle = app
            .start_challenge(&mut StdRng::seed_from_u64(2), ToneCapture::new())
            .unwrap();
        let answer = handle.await.unwrap();

        let mut last_prompt = None;
        for update in drain(&mut rx) {
            if let Some(prompt) = app.apply(&update) {
                last_prompt = Some(prompt);
            }
        }

        assert_eq!(last_prompt, Some(format!("🎉 Answer: {answer} 🎉")));
        let log = app.log().lines();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], format!("Challenge: {}", app_morse(&answer)));
        assert_eq!(log[1], format!("Answer: {answer}"));
    }

    fn app_morse(answer: &str) -> String {
        morse_core::encode(&SymbolTable::new(), answer).into_string()
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_runs_alongside_countdown() {
        let (mut app, mut rx) = default_app();
        app.set_countdown(5).unwrap();
        let capture = ToneCapture::new();
        let handle = app
            .start_challenge(&mut StdRng::seed_from_u64(3), capture.clone())
            .unwrap();
        let answer = handle.await.unwrap();

        // every tone of the answer was played
        let expected = app_morse(&answer).replace(' ', "");
        assert_eq!(capture.to_symbols(Duration::from_millis(400)), expected);

        let updates = drain(&mut rx);
        assert!(updates.contains(&UiUpdate::Playback(PlaybackUpdate::Finished)));
        // the first tick goes out before playback completes
        let first_tick = updates
            .iter()
            .position(|u| matches!(u, UiUpdate::Challenge(ChallengeUpdate::Tick { .. })))
            .unwrap();
        let finished = updates
            .iter()
            .position(|u| *u == UiUpdate::Playback(PlaybackUpdate::Finished))
            .unwrap();
        assert!(first_tick < finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_playback_still_reveals() {
        let (mut app, mut rx) = default_app();
        app.set_countdown(5).unwrap();
        let handle = app
            .start_challenge(&mut StdRng::seed_from_u64(4), ToneCapture::fail_after(0))
            .unwrap();
        let answer = handle.await.unwrap();

        let updates = drain(&mut rx);
        assert!(updates
            .iter()
            .any(|u| matches!(u, UiUpdate::Playback(PlaybackUpdate::Failed { .. }))));
        assert_eq!(
            updates.last(),
            Some(&UiUpdate::Challenge(ChallengeUpdate::Revealed { answer }))
        );
        assert!(!app.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_challenge_rejected_during_playback() {
        let (mut app, _rx) = default_app();
        let playing = app.play("-", ToneCapture::new()).unwrap();
        let result = app.start_challenge(&mut StdRng::seed_from_u64(5), ToneCapture::new());
        assert!(matches!(result, Err(MorseError::Busy)));
        assert!(app.log().is_empty());
        playing.await.unwrap().unwrap();
    }
}
