use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ordering::weight_ascending;
use crate::core::primitives::format_percent;
use crate::core::Row;

/// Columns shown on the table face, left to right.
pub const TABLE_COLUMNS: [TableColumn; 3] =
    [TableColumn::Deliverable, TableColumn::Type, TableColumn::Weight];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableColumn {
    /// Ordered by `Sequence`, not by name.
    Deliverable,
    Type,
    Weight,
}

impl TableColumn {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Deliverable => "Deliverable",
            Self::Type => "Type",
            Self::Weight => "Weight",
        }
    }

    #[must_use]
    pub fn is_right_aligned(self) -> bool {
        matches!(self, Self::Type | Self::Weight)
    }
}

impl fmt::Display for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSort {
    pub column: TableColumn,
    pub direction: SortDirection,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            column: TableColumn::Deliverable,
            direction: SortDirection::Ascending,
        }
    }
}

impl TableSort {
    /// Sort state after a click on `column`'s header.
    #[must_use]
    pub fn clicked(self, column: TableColumn) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                column,
                direction: SortDirection::Ascending,
            }
        }
    }

    /// Header arrow for `column`, if it is the sorted one.
    #[must_use]
    pub fn indicator(self, column: TableColumn) -> Option<char> {
        (self.column == column).then_some(match self.direction {
            SortDirection::Ascending => '\u{25B2}',
            SortDirection::Descending => '\u{25BC}',
        })
    }

    #[must_use]
    pub fn compare(self, a: &Row, b: &Row) -> Ordering {
        let ordering = match self.column {
            TableColumn::Deliverable => a.sequence_or_zero().cmp(&b.sequence_or_zero()),
            TableColumn::Type => a
                .kind
                .as_str()
                .to_lowercase()
                .cmp(&b.kind.as_str().to_lowercase()),
            TableColumn::Weight => weight_ascending(a.weight, b.weight),
        };
        self.direction.apply(ordering)
    }
}

/// One line of the table body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableLine {
    GroupHeader {
        component: String,
    },
    Entry {
        deliverable: String,
        kind: String,
        weight: f64,
        /// Display-only rounding of `weight`.
        weight_label: String,
    },
}

impl TableLine {
    #[must_use]
    pub fn is_group_header(&self) -> bool {
        matches!(self, Self::GroupHeader { .. })
    }
}

/// Groups rows by component (groups in alphabetical order) and sorts each
/// group by `sort`. Ties keep dataset order.
#[must_use]
pub fn table_lines(rows: &[Row], sort: TableSort) -> Vec<TableLine> {
    let mut groups: BTreeMap<&str, Vec<&Row>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.component_key()).or_default().push(row);
    }

    let mut lines = Vec::with_capacity(rows.len() + groups.len());
    for (component, mut members) in groups {
        members.sort_by(|a, b| sort.compare(a, b));
        lines.push(TableLine::GroupHeader {
            component: component.to_owned(),
        });
        lines.extend(members.into_iter().map(|row| TableLine::Entry {
            deliverable: row.deliverable.clone(),
            kind: row.kind.as_str().to_owned(),
            weight: row.weight,
            weight_label: format_percent(row.weight),
        }));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, TableColumn, TableSort};

    #[test]
    fn clicking_same_column_flips_direction() {
        let sort = TableSort::default().clicked(TableColumn::Deliverable);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(sort.indicator(TableColumn::Deliverable), Some('\u{25BC}'));
        assert_eq!(sort.indicator(TableColumn::Weight), None);
    }

    #[test]
    fn clicking_other_column_resets_to_ascending() {
        let sort = TableSort::default()
            .clicked(TableColumn::Deliverable)
            .clicked(TableColumn::Weight);
        assert_eq!(sort.column, TableColumn::Weight);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }
}
