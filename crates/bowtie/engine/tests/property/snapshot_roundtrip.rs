//! Property tests: saving and loading a session preserves what was collected.

use bowtie_engine::GuidedWorkflow;
use bowtie_types::*;
use proptest::prelude::*;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Za-z][A-Za-z ]{0,10}[a-z]", 0..5)
        .prop_map(|set| set.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// A loaded session has the same step, completed steps, inputs and items.
    #[test]
    fn save_load_preserves_session(
        per_category in prop::collection::vec(arb_names(), 5),
        advances in 0usize..8,
        project in "[A-Za-z ]{0,20}",
        problem in "[A-Za-z ]{0,20}",
    ) {
        let mut wf = GuidedWorkflow::new(Arc::new(Vocabulary::new()));
        let now = chrono::Utc::now();
        wf.update_field(FieldKey::ProjectName, project.clone(), now);
        wf.update_field(FieldKey::CentralProblem, problem.clone(), now);

        for (category, names) in Category::ALL.iter().zip(&per_category) {
            for name in names {
                wf.add_custom_item(*category, name).unwrap();
            }
        }
        for _ in 0..advances {
            wf.next_step();
        }

        let bytes = wf.save().unwrap();
        let mut restored = GuidedWorkflow::new(Arc::new(Vocabulary::new()));
        restored.load(&bytes).unwrap();

        prop_assert_eq!(restored.current_step(), wf.current_step());
        prop_assert_eq!(&restored.state().completed_steps, &wf.state().completed_steps);
        prop_assert_eq!(&restored.state().project_name, &project);
        prop_assert_eq!(&restored.state().central_problem, &problem);
        prop_assert_eq!(restored.items(), wf.items());
    }
}
