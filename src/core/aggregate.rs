use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::dataset::sum_weights;
use crate::core::ordering::weight_descending;
use crate::core::{DeliverableType, Row};

/// One slice of the donut chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutBucket {
    pub kind: DeliverableType,
    pub value: f64,
}

impl DonutBucket {
    /// Selection identifier of the arc drawn for this bucket.
    #[must_use]
    pub fn element_id(&self) -> &str {
        self.kind.as_str()
    }
}

/// Individual and team totals, in that order. Both buckets are always present.
#[must_use]
pub fn donut_buckets(rows: &[Row]) -> [DonutBucket; 2] {
    let total_for = |kind: &DeliverableType| {
        sum_weights(
            rows.iter()
                .filter(|row| &row.kind == kind)
                .map(|row| row.weight),
        )
    };
    [
        DonutBucket {
            value: total_for(&DeliverableType::Individual),
            kind: DeliverableType::Individual,
        },
        DonutBucket {
            value: total_for(&DeliverableType::Team),
            kind: DeliverableType::Team,
        },
    ]
}

/// What the donut center shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonutCenter {
    pub fraction: f64,
    /// `true` when the value is the sum of selected arcs rather than the
    /// individual share.
    pub showing_selection: bool,
}

/// Individual share with nothing selected, otherwise the sum of the selected
/// buckets.
#[must_use]
pub fn donut_center(buckets: &[DonutBucket], selection: &IndexSet<String>) -> DonutCenter {
    if selection.is_empty() {
        let fraction = buckets
            .iter()
            .find(|bucket| bucket.kind == DeliverableType::Individual)
            .map_or(0.0, |bucket| bucket.value);
        return DonutCenter {
            fraction,
            showing_selection: false,
        };
    }

    let fraction = selection
        .iter()
        .filter_map(|id| buckets.iter().find(|bucket| bucket.element_id() == id))
        .map(|bucket| bucket.value)
        .sum();
    DonutCenter {
        fraction,
        showing_selection: true,
    }
}

/// Per-component split used by the stacked-by-component chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStack {
    pub component: String,
    pub individual: f64,
    pub team: f64,
    pub total: f64,
}

impl ComponentStack {
    #[must_use]
    pub fn value_for(&self, kind: &DeliverableType) -> f64 {
        match kind {
            DeliverableType::Individual => self.individual,
            DeliverableType::Team => self.team,
            DeliverableType::Other(_) => 0.0,
        }
    }
}

/// Rolls rows up by component and orders components by descending total.
/// Components with equal totals keep first-appearance order.
#[must_use]
pub fn component_stacks(rows: &[Row]) -> Vec<ComponentStack> {
    let mut grouped: IndexMap<&str, Vec<&Row>> = IndexMap::new();
    for row in rows {
        grouped.entry(row.component_key()).or_default().push(row);
    }

    let mut stacks: Vec<ComponentStack> = grouped
        .into_iter()
        .map(|(component, members)| {
            let individual = sum_weights(
                members
                    .iter()
                    .filter(|row| row.kind == DeliverableType::Individual)
                    .map(|row| row.weight),
            );
            let team = sum_weights(
                members
                    .iter()
                    .filter(|row| row.kind == DeliverableType::Team)
                    .map(|row| row.weight),
            );
            ComponentStack {
                component: component.to_owned(),
                individual,
                team,
                total: individual + team,
            }
        })
        .collect();

    stacks.sort_by(|a, b| weight_descending(a.total, b.total));
    stacks
}

/// Selection identifier of one stacked-by-component segment.
#[must_use]
pub fn component_segment_id(component: &str, kind: &DeliverableType) -> String {
    format!("{component}-{kind}")
}
