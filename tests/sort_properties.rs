use fundview::domain::column::ColumnDescriptor;
use fundview::domain::dataset::{Dataset, RowId, RowRecord};
use fundview::domain::sort::{
    ordered_records, ordered_rows, SortController, SortDirection, SortState,
};
use fundview::domain::table_view::{SelectionMode, TableEvent, TableView};
use proptest::prelude::*;

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::text("company", "Company"),
        ColumnDescriptor::numeric("points", "Points", 0),
    ]
}

fn dataset(points: &[i32]) -> Dataset {
    let rows = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            RowRecord::new()
                .with("company", format!("c{i}").as_str())
                .with("points", *p as f64)
        })
        .collect();
    Dataset::new(columns(), rows).unwrap()
}

fn points_of(ds: &Dataset, ids: &[RowId]) -> Vec<i32> {
    ids.iter()
        .map(|&id| ds.value(id, "points").and_then(|v| v.as_number()).unwrap() as i32)
        .collect()
}

proptest! {
    #[test]
    fn descending_is_reverse_order_with_stable_ties(points in prop::collection::vec(-5i32..5, 0..40)) {
        let ds = dataset(&points);
        let asc = ordered_rows(&ds, &SortState::by("points", SortDirection::Ascending)).unwrap();
        let desc = ordered_rows(&ds, &SortState::by("points", SortDirection::Descending)).unwrap();

        let asc_points = points_of(&ds, &asc);
        let mut desc_points = points_of(&ds, &desc);
        desc_points.reverse();
        prop_assert_eq!(asc_points, desc_points);

        // Within each group of equal values both orders keep dataset order.
        for value in -5..5 {
            let in_asc: Vec<RowId> = asc.iter().copied().filter(|&id| points[id.0] == value).collect();
            let in_desc: Vec<RowId> = desc.iter().copied().filter(|&id| points[id.0] == value).collect();
            prop_assert!(in_asc.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(in_asc, in_desc);
        }
    }

    #[test]
    fn ascending_is_non_decreasing(points in prop::collection::vec(any::<i32>(), 0..40)) {
        let ds = dataset(&points);
        let asc = ordered_rows(&ds, &SortState::by("points", SortDirection::Ascending)).unwrap();
        let values = points_of(&ds, &asc);
        prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(asc.len(), points.len());
    }

    #[test]
    fn double_flip_returns_to_ascending(points in prop::collection::vec(-3i32..3, 0..30)) {
        let ds = dataset(&points);
        let mut controller = SortController::new();
        controller.set_sort_key("points");
        let first = controller.ordered_rows(&ds).unwrap();
        controller.set_sort_key("points");
        controller.set_sort_key("points");
        prop_assert_eq!(controller.state(), &SortState::by("points", SortDirection::Ascending));
        prop_assert_eq!(controller.ordered_rows(&ds).unwrap(), first);
    }

    #[test]
    fn clearing_restores_dataset_order(points in prop::collection::vec(any::<i32>(), 0..30)) {
        let ds = dataset(&points);
        let mut controller = SortController::new();
        controller.set_sort_key("points");
        controller.set_sort_key("points");
        controller.clear();
        let ids = controller.ordered_rows(&ds).unwrap();
        prop_assert_eq!(ids, ds.row_ids().collect::<Vec<_>>());
    }

    #[test]
    fn selection_follows_row_through_sorts(
        points in prop::collection::vec(-5i32..5, 1..30),
        pick in any::<prop::sample::Index>(),
        clicks in 0usize..4,
    ) {
        let ds = dataset(&points);
        let row = RowId(pick.index(points.len()));
        let mut view = TableView::new("Companies", &ds, SelectionMode::RowClick);
        view.handle(TableEvent::RowClick(row)).unwrap();
        for _ in 0..clicks {
            view.handle(TableEvent::HeaderClick("points".into())).unwrap();
        }

        let display = view.display();
        let active: Vec<RowId> = display.rows.iter().filter(|r| r.active).map(|r| r.id).collect();
        prop_assert_eq!(active, vec![row]);
    }

    #[test]
    fn sorting_sorted_output_again_is_idempotent(
        points in prop::collection::vec(-5i32..5, 0..40),
        desc in any::<bool>(),
    ) {
        let direction = if desc { SortDirection::Descending } else { SortDirection::Ascending };
        let state = SortState::by("points", direction);
        let ds = dataset(&points);
        let once: Vec<RowRecord> = ordered_records(&ds, &state)
            .unwrap()
            .into_iter()
            .cloned()
            .collect();

        let resorted = Dataset::new(columns(), once.clone()).unwrap();
        let twice: Vec<RowRecord> = ordered_records(&resorted, &state)
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn single_row_order_never_changes(point in any::<i32>(), desc in any::<bool>()) {
        let ds = dataset(&[point]);
        let direction = if desc { SortDirection::Descending } else { SortDirection::Ascending };
        let ids = ordered_rows(&ds, &SortState::by("points", direction)).unwrap();
        prop_assert_eq!(ids, vec![RowId(0)]);
    }
}
