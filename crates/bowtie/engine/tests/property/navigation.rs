//! Property tests: progress is always derived from completed steps.

use bowtie_engine::GuidedWorkflow;
use bowtie_types::*;
use proptest::prelude::*;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Move {
    Next,
    Previous,
    GoTo(i64),
}

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        3 => Just(Move::Next),
        1 => Just(Move::Previous),
        1 => (-2i64..12).prop_map(Move::GoTo),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// After any sequence of moves, progress matches the completed set and
    /// the completed set never shrinks.
    #[test]
    fn progress_tracks_completed_steps(moves in prop::collection::vec(arb_move(), 0..40)) {
        let mut wf = GuidedWorkflow::new(Arc::new(Vocabulary::new()));
        let mut completed = 0;

        for m in moves {
            match m {
                Move::Next => {
                    wf.next_step();
                }
                Move::Previous => {
                    wf.previous_step();
                }
                Move::GoTo(n) => {
                    let result = wf.go_to_step(n);
                    prop_assert_eq!(result.is_ok(), (1..=8).contains(&n));
                }
            }

            let now = wf.state().completed_count();
            prop_assert!(now >= completed);
            completed = now;

            let expected = completed as f64 / STEP_COUNT as f64 * 100.0;
            prop_assert!((wf.progress_percentage() - expected).abs() < 1e-9);
            prop_assert!((1..=8).contains(&wf.current_step().number()));
        }
    }
}
