//! Record derivation and vertical layout for the horizontal deliverable chart.
//!
//! Records are derived fresh from the dataset on every sort or stack change;
//! nothing here keeps state between calls.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::dataset::{base_deliverable, sum_weights};
use crate::core::ordering::weight_descending;
use crate::core::primitives::format_percent;
use crate::core::{Dataset, DeliverableType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimarySort {
    #[default]
    All,
    Component,
    Type,
}

impl PrimarySort {
    pub const OPTIONS: [Self; 3] = [Self::All, Self::Component, Self::Type];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Component => "Component",
            Self::Type => "Type",
        }
    }

    /// Whether records are bucketed under category headings.
    #[must_use]
    pub fn groups(self) -> bool {
        !matches!(self, Self::All)
    }
}

impl fmt::Display for PrimarySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SecondarySort {
    #[default]
    Weight,
    Sequence,
}

impl SecondarySort {
    pub const OPTIONS: [Self; 2] = [Self::Weight, Self::Sequence];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Weight => "Weight",
            Self::Sequence => "Sequence",
        }
    }
}

impl fmt::Display for SecondarySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stacking is offered only outside type grouping and only when both kinds
/// of deliverable exist.
#[must_use]
pub fn stacking_allowed(primary: PrimarySort, dataset: &Dataset) -> bool {
    primary != PrimarySort::Type && dataset.can_stack()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordWeights {
    Single { kind: DeliverableType, weight: f64 },
    Stacked { individual: f64, team: f64 },
}

/// One bar of the horizontal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalRecord {
    /// Deliverable name, or the base deliverable when stacked.
    pub label: String,
    pub component: Option<String>,
    /// Sequence used for ordering. Stacked records take the sequence of the
    /// first dataset row sharing their base deliverable.
    pub sequence: i64,
    pub weights: RecordWeights,
}

/// One drawn segment of a record, in weight units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSegment {
    /// Selection identifier.
    pub id: String,
    pub kind: DeliverableType,
    pub start: f64,
    pub end: f64,
}

impl RecordSegment {
    #[must_use]
    pub fn value(&self) -> f64 {
        self.end - self.start
    }
}

impl HorizontalRecord {
    #[must_use]
    pub fn total(&self) -> f64 {
        match &self.weights {
            RecordWeights::Single { weight, .. } => *weight,
            RecordWeights::Stacked { individual, team } => individual + team,
        }
    }

    #[must_use]
    pub fn is_stacked(&self) -> bool {
        matches!(self.weights, RecordWeights::Stacked { .. })
    }

    /// Value compared by a grouping primary sort; `None` for `All`.
    #[must_use]
    pub fn category(&self, primary: PrimarySort) -> Option<&str> {
        match primary {
            PrimarySort::All => None,
            PrimarySort::Component => Some(self.component.as_deref().unwrap_or("")),
            PrimarySort::Type => Some(match &self.weights {
                RecordWeights::Single { kind, .. } => kind.as_str(),
                RecordWeights::Stacked { .. } => "Stacked",
            }),
        }
    }

    /// Individual segment first, then team. Unstacked records have a single
    /// segment identified by the deliverable name.
    #[must_use]
    pub fn segments(&self) -> SmallVec<[RecordSegment; 2]> {
        let mut segments = SmallVec::new();
        match &self.weights {
            RecordWeights::Single { kind, weight } => segments.push(RecordSegment {
                id: self.label.clone(),
                kind: kind.clone(),
                start: 0.0,
                end: *weight,
            }),
            RecordWeights::Stacked { individual, team } => {
                segments.push(RecordSegment {
                    id: stacked_segment_id(&self.label, &DeliverableType::Individual),
                    kind: DeliverableType::Individual,
                    start: 0.0,
                    end: *individual,
                });
                segments.push(RecordSegment {
                    id: stacked_segment_id(&self.label, &DeliverableType::Team),
                    kind: DeliverableType::Team,
                    start: *individual,
                    end: individual + team,
                });
            }
        }
        segments
    }
}

#[must_use]
pub fn stacked_segment_id(base: &str, kind: &DeliverableType) -> String {
    format!("{base}-{kind}")
}

/// Derives the ordered records for the horizontal chart.
///
/// `stacked` is honored only when [`stacking_allowed`] holds.
#[must_use]
pub fn derive_records(
    dataset: &Dataset,
    primary: PrimarySort,
    secondary: SecondarySort,
    stacked: bool,
) -> Vec<HorizontalRecord> {
    let mut records = if stacked && stacking_allowed(primary, dataset) {
        stacked_records(dataset)
    } else {
        single_records(dataset)
    };

    records.sort_by(|a, b| compare_records(a, b, primary, secondary));
    records
}

fn single_records(dataset: &Dataset) -> Vec<HorizontalRecord> {
    dataset
        .rows()
        .iter()
        .map(|row| HorizontalRecord {
            label: row.deliverable.clone(),
            component: row.component.clone(),
            sequence: row.sequence_or_zero(),
            weights: RecordWeights::Single {
                kind: row.kind.clone(),
                weight: row.weight,
            },
        })
        .collect()
}

fn stacked_records(dataset: &Dataset) -> Vec<HorizontalRecord> {
    let mut groups: IndexMap<&str, Vec<_>> = IndexMap::new();
    for row in dataset.rows() {
        groups
            .entry(base_deliverable(&row.deliverable))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .filter_map(|(base, members)| {
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
            if individual + team <= 0.0 {
                return None;
            }
            Some(HorizontalRecord {
                label: base.to_owned(),
                component: members.first().and_then(|row| row.component.clone()),
                sequence: dataset.sequence_for_base(base),
                weights: RecordWeights::Stacked { individual, team },
            })
        })
        .collect()
}

fn compare_records(
    a: &HorizontalRecord,
    b: &HorizontalRecord,
    primary: PrimarySort,
    secondary: SecondarySort,
) -> Ordering {
    a.category(primary)
        .cmp(&b.category(primary))
        .then_with(|| match secondary {
            SecondarySort::Weight => weight_descending(a.total(), b.total()),
            SecondarySort::Sequence => a.sequence.cmp(&b.sequence),
        })
}

/// Fixed vertical metrics of the horizontal chart, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalMetrics {
    pub bar_height: f64,
    pub bar_padding: f64,
    pub heading_height: f64,
    pub category_spacing: f64,
}

impl Default for HorizontalMetrics {
    fn default() -> Self {
        Self {
            bar_height: 20.0,
            bar_padding: 5.0,
            heading_height: 30.0,
            category_spacing: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutSlot {
    Heading { label: String, center_y: f64 },
    Bar { record: usize, center_y: f64 },
}

/// Vertical placement of headings and bars, top to bottom.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HorizontalLayout {
    pub slots: Vec<LayoutSlot>,
    /// Height consumed by all slots, excluding chart margins.
    pub content_height: f64,
}

impl HorizontalLayout {
    #[must_use]
    pub fn bar_center(&self, record: usize) -> Option<f64> {
        self.slots.iter().find_map(|slot| match slot {
            LayoutSlot::Bar {
                record: index,
                center_y,
            } if *index == record => Some(*center_y),
            _ => None,
        })
    }

    pub fn headings(&self) -> impl Iterator<Item = (&str, f64)> {
        self.slots.iter().filter_map(|slot| match slot {
            LayoutSlot::Heading { label, center_y } => Some((label.as_str(), *center_y)),
            LayoutSlot::Bar { .. } => None,
        })
    }
}

/// Places records top to bottom, inserting a heading above the first record
/// of every category when `primary` groups.
#[must_use]
pub fn layout_records(
    records: &[HorizontalRecord],
    primary: PrimarySort,
    metrics: HorizontalMetrics,
) -> HorizontalLayout {
    let mut slots = Vec::with_capacity(records.len());
    let mut current_y = 0.0;
    let mut previous: Option<&str> = None;

    for (index, record) in records.iter().enumerate() {
        let category = record.category(primary);
        if primary.groups() && category != previous {
            if previous.is_some() {
                current_y += metrics.category_spacing;
            }
            slots.push(LayoutSlot::Heading {
                label: category.unwrap_or("").to_owned(),
                center_y: current_y + metrics.heading_height / 2.0,
            });
            current_y += metrics.heading_height;
        }
        slots.push(LayoutSlot::Bar {
            record: index,
            center_y: current_y + metrics.bar_height / 2.0,
        });
        current_y += metrics.bar_height + metrics.bar_padding;
        previous = category;
    }

    HorizontalLayout {
        slots,
        content_height: current_y,
    }
}

/// Percentage label for a segment, or `None` when the value is zero or the
/// text would not fit in `width_px`.
#[must_use]
pub fn fit_segment_label(value: f64, width_px: f64, char_width_px: f64) -> Option<String> {
    if value == 0.0 {
        return None;
    }
    let text = format_percent(value);
    let estimated_width = text.chars().count() as f64 * char_width_px;
    (width_px > estimated_width).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::{
        HorizontalMetrics, PrimarySort, SecondarySort, derive_records, fit_segment_label,
        layout_records,
    };
    use crate::core::{Dataset, DeliverableType, Row};

    #[test]
    fn segment_label_needs_room() {
        assert_eq!(fit_segment_label(0.15, 30.0, 7.0), Some("15%".to_owned()));
        assert_eq!(fit_segment_label(0.15, 21.0, 7.0), None);
        assert_eq!(fit_segment_label(0.0, 500.0, 7.0), None);
    }

    #[test]
    fn grouped_layout_inserts_headings_and_spacing() {
        let dataset = Dataset::from_rows(vec![
            Row::new("A", Some("X"), DeliverableType::Individual, 0.2, 1),
            Row::new("B", Some("Y"), DeliverableType::Team, 0.3, 2),
        ]);
        let records =
            derive_records(&dataset, PrimarySort::Component, SecondarySort::Weight, false);
        let layout = layout_records(&records, PrimarySort::Component, HorizontalMetrics::default());

        let headings: Vec<_> = layout.headings().collect();
        assert_eq!(headings, vec![("X", 15.0), ("Y", 85.0)]);
        assert_eq!(layout.bar_center(0), Some(40.0));
        assert_eq!(layout.bar_center(1), Some(110.0));
        assert_eq!(layout.content_height, 125.0);
    }
}
