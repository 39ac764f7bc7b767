//! Property tests for the tutorial sequencer timing and skip guarantees

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use proptest::prelude::*;

use arena_tutorial::tutorial::{
    FrameInput, RecordingGates, StepCatalog, StepDefinition, StepType, TutorialEvent,
    TutorialPhase, TutorialSequencer, TutorialTiming,
};

const DT: f32 = 0.25;

fn step_type() -> impl Strategy<Value = StepType> {
    prop::sample::select(StepType::ALL.to_vec())
}

/// Catalog with timeouts on a quarter-second grid so totals are exact in f32
fn catalog() -> impl Strategy<Value = Vec<StepDefinition>> {
    prop::collection::vec((step_type(), 1u32..=40), 1..8).prop_map(|steps| {
        steps
            .into_iter()
            .map(|(step_type, quarters)| {
                StepDefinition::new(step_type, step_type.display_name(), quarters as f32 * 0.25)
            })
            .collect()
    })
}

fn sequencer(steps: Vec<StepDefinition>) -> (TutorialSequencer<RecordingGates>, Arc<AtomicU32>) {
    let completions = Arc::new(AtomicU32::new(0));
    let counter = completions.clone();
    let catalog = StepCatalog::new(steps).unwrap();
    let seq = TutorialSequencer::new(catalog, TutorialTiming::default(), RecordingGates::new())
        .with_on_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    (seq, completions)
}

fn run_idle(seq: &mut TutorialSequencer<RecordingGates>, max_frames: usize) {
    for _ in 0..max_frames {
        if !seq.is_active() {
            break;
        }
        seq.tick(DT, &FrameInput::default());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn timeout_only_total_is_sum_plus_pauses(steps in catalog()) {
        let pause = TutorialTiming::default().transition_pause_secs;
        let expected = steps.iter().map(|s| s.timeout_secs).sum::<f32>()
            + (steps.len() - 1) as f32 * pause;

        let (mut seq, completions) = sequencer(steps);
        seq.start();
        run_idle(&mut seq, 10_000);

        prop_assert_eq!(seq.phase(), TutorialPhase::Completed);
        prop_assert!((seq.completed_at().unwrap() - expected).abs() < 1e-3);
        prop_assert_eq!(completions.load(Ordering::SeqCst), 1);
        prop_assert!(seq.gates().player_control_enabled);
        prop_assert!(seq.gates().game_timer_enabled);
        prop_assert!(!seq.gates().overlay_visible);
    }

    #[test]
    fn skip_at_any_instant_completes_once(steps in catalog(), skip_frame in 0usize..400) {
        let (mut seq, completions) = sequencer(steps);
        seq.start();
        for _ in 0..skip_frame {
            seq.tick(DT, &FrameInput::default());
        }
        seq.skip();
        seq.skip();
        seq.complete();
        run_idle(&mut seq, 100);
        for _ in 0..20 {
            seq.tick(DT, &FrameInput::default());
        }

        prop_assert_eq!(seq.phase(), TutorialPhase::Completed);
        prop_assert_eq!(seq.live_timer_count(), 0);
        prop_assert_eq!(completions.load(Ordering::SeqCst), 1);
        prop_assert_eq!(seq.events().count(|e| *e == TutorialEvent::Completed), 1);
    }

    #[test]
    fn repeated_fire_shoots_once(presses in 1usize..20, timeout_quarters in 8u32..40) {
        let steps = vec![
            StepDefinition::new(StepType::Shooting, "Click to shoot", timeout_quarters as f32 * 0.25),
            StepDefinition::new(StepType::Complete, "Done", 1.0),
        ];
        let (mut seq, _) = sequencer(steps);
        seq.start();
        // Resolve delay is two frames, so only the first press lands in the step
        for _ in 0..presses {
            seq.tick(DT, &FrameInput::fire());
        }
        run_idle(&mut seq, 1_000);

        prop_assert_eq!(seq.gates().shots_fired, 1);
        prop_assert_eq!(seq.phase(), TutorialPhase::Completed);
    }
}
