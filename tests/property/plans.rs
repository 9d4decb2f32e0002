//! Set properties of the reconciliation plans

use curio::reconcile::{PublishPlan, ResetPlan, SavePlan, WidgetIdSet};
use proptest::prelude::*;

fn widget_ids() -> impl Strategy<Value = WidgetIdSet> {
    prop::collection::btree_set("w[a-h]", 0..8)
}

proptest! {
    #[test]
    fn save_with_unchanged_widget_set_touches_nothing(
        published in widget_ids(),
        wip in widget_ids(),
    ) {
        let plan = SavePlan::from_ids(&published, &wip, &wip);
        prop_assert!(plan.delete.is_empty());
        prop_assert!(plan.clean_wip.is_empty());
        prop_assert!(plan.is_noop());
    }

    #[test]
    fn save_plan_partitions_dropped_widgets(
        published in widget_ids(),
        wip in widget_ids(),
        edit in widget_ids(),
    ) {
        let plan = SavePlan::from_ids(&published, &wip, &edit);

        prop_assert!(plan.delete.is_disjoint(&plan.clean_wip));
        prop_assert!(plan.delete.is_disjoint(&plan.retain));
        prop_assert!(plan.delete.is_subset(&wip));
        prop_assert!(plan.clean_wip.is_subset(&published));
        prop_assert!(plan.clean_wip.is_disjoint(&edit));
        prop_assert_eq!(&plan.purge, &edit);

        // Every draft widget dropped by the edit is handled exactly once
        let dropped: WidgetIdSet = wip.difference(&edit).cloned().collect();
        let handled: WidgetIdSet = plan.delete.union(&plan.clean_wip).cloned().collect();
        prop_assert_eq!(dropped, handled);
    }

    #[test]
    fn save_never_deletes_published_widgets(
        published in widget_ids(),
        wip in widget_ids(),
        edit in widget_ids(),
    ) {
        let plan = SavePlan::from_ids(&published, &wip, &edit);
        prop_assert!(plan.delete.is_disjoint(&published));
        prop_assert!(plan.delete.is_disjoint(&edit));
    }

    #[test]
    fn publish_and_reset_cover_both_contents(
        published in widget_ids(),
        wip in widget_ids(),
    ) {
        let all: WidgetIdSet = published.union(&wip).cloned().collect();

        let publish = PublishPlan::from_ids(&published, &wip);
        prop_assert!(publish.retain.is_disjoint(&publish.delete));
        let covered: WidgetIdSet = publish.retain.union(&publish.delete).cloned().collect();
        prop_assert_eq!(&covered, &all);

        let reset = ResetPlan::from_ids(&published, &wip);
        prop_assert!(reset.retain.is_disjoint(&reset.delete));
        let covered: WidgetIdSet = reset.retain.union(&reset.delete).cloned().collect();
        prop_assert_eq!(&covered, &all);
    }
}

/// Saving after a publish with the published widget set plans nothing
#[test]
fn test_save_after_publish_is_noop() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(widget_ids(), widget_ids()), |(published, wip)| {
            let publish = PublishPlan::from_ids(&published, &wip);
            let after_publish = publish.retain.clone();
            let plan = SavePlan::from_ids(&after_publish, &after_publish, &after_publish);
            assert!(plan.is_noop());
            assert_eq!(plan.retain, after_publish);
            Ok(())
        })
        .unwrap();
}
