use proptest::prelude::*;
use weightcard::core::{
    Dataset, DeliverableType, HorizontalMetrics, PrimarySort, Row, SecondarySort, TableLine,
    TableSort, component_stacks, derive_records, donut_buckets, layout_records, table_lines,
};

const COMPONENTS: [&str; 4] = ["", "Exams", "Labs", "Projects"];

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        0usize..6,
        prop::bool::ANY,
        0usize..COMPONENTS.len(),
        0u32..=40,
        0i64..10,
    )
        .prop_map(|(base, team, component, percent, sequence)| {
            let (suffix, kind) = if team {
                ("(Team)", DeliverableType::Team)
            } else {
                ("(Ind)", DeliverableType::Individual)
            };
            let component = COMPONENTS[component];
            Row::new(
                format!("Item {base} {suffix}"),
                (!component.is_empty()).then_some(component),
                kind,
                f64::from(percent) / 100.0,
                sequence,
            )
        })
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(row_strategy(), 0..24).prop_map(Dataset::from_rows)
}

fn entry_count(lines: &[TableLine]) -> usize {
    lines.iter().filter(|line| !line.is_group_header()).count()
}

proptest! {
    #[test]
    fn unstacked_records_are_a_permutation_of_rows(
        dataset in dataset_strategy(),
        primary in prop::sample::select(PrimarySort::OPTIONS.to_vec()),
        secondary in prop::sample::select(SecondarySort::OPTIONS.to_vec()),
    ) {
        let records = derive_records(&dataset, primary, secondary, false);
        prop_assert_eq!(records.len(), dataset.len());

        let mut derived: Vec<&str> = records.iter().map(|record| record.label.as_str()).collect();
        let mut source: Vec<&str> = dataset
            .rows()
            .iter()
            .map(|row| row.deliverable.as_str())
            .collect();
        derived.sort_unstable();
        source.sort_unstable();
        prop_assert_eq!(derived, source);
    }

    #[test]
    fn weight_sort_is_descending_within_each_category(
        dataset in dataset_strategy(),
        primary in prop::sample::select(PrimarySort::OPTIONS.to_vec()),
        stacked in prop::bool::ANY,
    ) {
        let records = derive_records(&dataset, primary, SecondarySort::Weight, stacked);
        for pair in records.windows(2) {
            prop_assert!(pair[0].category(primary) <= pair[1].category(primary));
            if pair[0].category(primary) == pair[1].category(primary) {
                prop_assert!(pair[0].total() >= pair[1].total());
            }
        }
    }

    #[test]
    fn stacking_preserves_positive_weight(dataset in dataset_strategy()) {
        let single: f64 = derive_records(&dataset, PrimarySort::All, SecondarySort::Weight, false)
            .iter()
            .map(|record| record.total())
            .sum();
        let stacked: f64 = derive_records(&dataset, PrimarySort::All, SecondarySort::Weight, true)
            .iter()
            .map(|record| record.total())
            .sum();
        prop_assert!((single - stacked).abs() < 1e-9);
    }

    #[test]
    fn donut_and_component_totals_agree(dataset in dataset_strategy()) {
        let donut: f64 = donut_buckets(dataset.rows()).iter().map(|bucket| bucket.value).sum();
        let components: f64 = component_stacks(dataset.rows())
            .iter()
            .map(|stack| stack.total)
            .sum();
        prop_assert!((donut - dataset.total_weight()).abs() < 1e-9);
        prop_assert!((components - dataset.total_weight()).abs() < 1e-9);
    }

    #[test]
    fn component_stacks_are_descending(dataset in dataset_strategy()) {
        let stacks = component_stacks(dataset.rows());
        for pair in stacks.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn table_keeps_every_row_under_one_header_per_group(dataset in dataset_strategy()) {
        let lines = table_lines(dataset.rows(), TableSort::default());
        prop_assert_eq!(entry_count(&lines), dataset.len());

        let headers: Vec<&str> = lines
            .iter()
            .filter_map(|line| match line {
                TableLine::GroupHeader { component } => Some(component.as_str()),
                TableLine::Entry { .. } => None,
            })
            .collect();
        let mut sorted = headers.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(headers, sorted);
    }

    #[test]
    fn layout_places_every_record_once_in_order(
        dataset in dataset_strategy(),
        primary in prop::sample::select(PrimarySort::OPTIONS.to_vec()),
    ) {
        let records = derive_records(&dataset, primary, SecondarySort::Sequence, false);
        let layout = layout_records(&records, primary, HorizontalMetrics::default());

        let mut previous = f64::NEG_INFINITY;
        for index in 0..records.len() {
            let center = layout.bar_center(index);
            prop_assert!(center.is_some());
            let center = center.unwrap_or_default();
            prop_assert!(center > previous);
            previous = center;
        }
        if !primary.groups() {
            prop_assert_eq!(layout.headings().count(), 0);
        }
    }
}
