//! View state machine and selection store.
//!
//! All mutation happens in [`ViewState::apply`]; derivation and rendering
//! only ever read the state.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Dataset, PrimarySort, SecondarySort, TableColumn, TableSort};
use crate::error::CardError;

/// Charts on the back face, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Donut,
    Stacked,
    Horizontal,
}

impl ChartKind {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Donut => 0,
            Self::Stacked => 1,
            Self::Horizontal => 2,
        }
    }

    #[must_use]
    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Donut => "Individual versus Team",
            Self::Stacked => "Components",
            Self::Horizontal => "Deliverables",
        }
    }

    /// Target of the right arrow. The stacked chart is skipped when the
    /// dataset has no component data.
    #[must_use]
    pub fn next(self, has_component_data: bool) -> Option<Self> {
        match self {
            Self::Donut if has_component_data => Some(Self::Stacked),
            Self::Donut => Some(Self::Horizontal),
            Self::Stacked => Some(Self::Horizontal),
            Self::Horizontal => None,
        }
    }

    /// Target of the left arrow, with the same skip rule as [`ChartKind::next`].
    #[must_use]
    pub fn previous(self, has_component_data: bool) -> Option<Self> {
        match self {
            Self::Donut => None,
            Self::Stacked => Some(Self::Donut),
            Self::Horizontal if has_component_data => Some(Self::Stacked),
            Self::Horizontal => Some(Self::Donut),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveView {
    Table,
    Chart(ChartKind),
}

impl ActiveView {
    #[must_use]
    pub fn chart(self) -> Option<ChartKind> {
        match self {
            Self::Table => None,
            Self::Chart(kind) => Some(kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowVisibility {
    pub left: bool,
    pub right: bool,
}

impl ArrowVisibility {
    pub const HIDDEN: Self = Self {
        left: false,
        right: false,
    };

    #[must_use]
    pub fn for_chart(chart: ChartKind, has_component_data: bool) -> Self {
        Self {
            left: chart.previous(has_component_data).is_some(),
            right: chart.next(has_component_data).is_some()
                && !(chart == ChartKind::Stacked && !has_component_data),
        }
    }
}

/// Dataset properties the state machine depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetFacts {
    pub has_component_data: bool,
    pub can_stack: bool,
}

impl From<&Dataset> for DatasetFacts {
    fn from(dataset: &Dataset) -> Self {
        Self {
            has_component_data: dataset.has_component_data(),
            can_stack: dataset.can_stack(),
        }
    }
}

/// Per-chart sets of highlighted element identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionStore {
    donut: IndexSet<String>,
    stacked: IndexSet<String>,
    horizontal: IndexSet<String>,
}

impl SelectionStore {
    #[must_use]
    pub fn get(&self, chart: ChartKind) -> &IndexSet<String> {
        match chart {
            ChartKind::Donut => &self.donut,
            ChartKind::Stacked => &self.stacked,
            ChartKind::Horizontal => &self.horizontal,
        }
    }

    fn get_mut(&mut self, chart: ChartKind) -> &mut IndexSet<String> {
        match chart {
            ChartKind::Donut => &mut self.donut,
            ChartKind::Stacked => &mut self.stacked,
            ChartKind::Horizontal => &mut self.horizontal,
        }
    }

    /// Flips membership of `id` and returns whether it is now selected.
    pub fn toggle(&mut self, chart: ChartKind, id: &str) -> bool {
        let set = self.get_mut(chart);
        if set.shift_remove(id) {
            false
        } else {
            set.insert(id.to_owned());
            true
        }
    }

    pub fn clear_all(&mut self) {
        self.donut.clear();
        self.stacked.clear();
        self.horizontal.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.donut.is_empty() && self.stacked.is_empty() && self.horizontal.is_empty()
    }
}

/// User input understood by the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WidgetEvent {
    FlipToChart,
    FlipToTable,
    ArrowLeft,
    ArrowRight,
    SortTable(TableColumn),
    SetPrimarySort(PrimarySort),
    SetSecondarySort(SecondarySort),
    SetStacked(bool),
    /// Click on a bar, arc or segment carrying this identifier.
    SelectElement(String),
    /// Click that hit no interactive element.
    ClickOutside,
    Resize { width: u32, height: u32 },
}

impl fmt::Display for WidgetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlipToChart => f.write_str("flip-to-chart"),
            Self::FlipToTable => f.write_str("flip-to-table"),
            Self::ArrowLeft => f.write_str("arrow-left"),
            Self::ArrowRight => f.write_str("arrow-right"),
            Self::SortTable(column) => write!(f, "sort-table:{column}"),
            Self::SetPrimarySort(primary) => write!(f, "primary:{primary}"),
            Self::SetSecondarySort(secondary) => write!(f, "secondary:{secondary}"),
            Self::SetStacked(stacked) => write!(f, "stacked:{stacked}"),
            Self::SelectElement(id) => write!(f, "select:{id}"),
            Self::ClickOutside => f.write_str("click-outside"),
            Self::Resize { width, height } => write!(f, "resize:{width}x{height}"),
        }
    }
}

impl FromStr for WidgetEvent {
    type Err = CardError;

    /// Parses the textual form produced by `Display`, e.g. `arrow-right`,
    /// `sort-table:Weight`, `select:Individual`, `resize:800x600`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (name, argument) = match input.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (input, None),
        };
        let unknown = || CardError::InvalidData(format!("unknown event `{input}`"));

        let event = match (name, argument) {
            ("flip-to-chart", None) => Self::FlipToChart,
            ("flip-to-table", None) => Self::FlipToTable,
            ("arrow-left", None) => Self::ArrowLeft,
            ("arrow-right", None) => Self::ArrowRight,
            ("click-outside", None) => Self::ClickOutside,
            ("sort-table", Some(column)) => Self::SortTable(match column {
                "Deliverable" => TableColumn::Deliverable,
                "Type" => TableColumn::Type,
                "Weight" => TableColumn::Weight,
                _ => return Err(unknown()),
            }),
            ("primary", Some(primary)) => Self::SetPrimarySort(
                PrimarySort::OPTIONS
                    .into_iter()
                    .find(|option| option.label() == primary)
                    .ok_or_else(unknown)?,
            ),
            ("secondary", Some(secondary)) => Self::SetSecondarySort(
                SecondarySort::OPTIONS
                    .into_iter()
                    .find(|option| option.label() == secondary)
                    .ok_or_else(unknown)?,
            ),
            ("stacked", Some(flag)) => {
                Self::SetStacked(flag.parse().map_err(|_| unknown())?)
            }
            ("select", Some(id)) if !id.is_empty() => Self::SelectElement(id.to_owned()),
            ("resize", Some(size)) => {
                let (width, height) = size.split_once('x').ok_or_else(unknown)?;
                Self::Resize {
                    width: width.parse().map_err(|_| unknown())?,
                    height: height.parse().map_err(|_| unknown())?,
                }
            }
            _ => return Err(unknown()),
        };
        Ok(event)
    }
}

/// What the renderer has to redo after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderRequest {
    /// Nothing visible changed.
    None,
    /// Only element colors (and the donut center) changed.
    Colors,
    /// The table face needs its height readjusted.
    TableLayout,
    /// The table face must be rebuilt.
    Table,
    /// The active chart must be rebuilt.
    Chart,
}

/// Complete widget view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    active: ActiveView,
    table_sort: TableSort,
    primary_sort: PrimarySort,
    secondary_sort: SecondarySort,
    stacked: bool,
    selections: SelectionStore,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active: ActiveView::Table,
            table_sort: TableSort::default(),
            primary_sort: PrimarySort::default(),
            secondary_sort: SecondarySort::default(),
            stacked: false,
            selections: SelectionStore::default(),
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn active(&self) -> ActiveView {
        self.active
    }

    #[must_use]
    pub fn table_sort(&self) -> TableSort {
        self.table_sort
    }

    #[must_use]
    pub fn primary_sort(&self) -> PrimarySort {
        self.primary_sort
    }

    #[must_use]
    pub fn secondary_sort(&self) -> SecondarySort {
        self.secondary_sort
    }

    /// Effective stacking flag; always `false` while stacking is not allowed.
    #[must_use]
    pub fn stacked(&self) -> bool {
        self.stacked
    }

    #[must_use]
    pub fn selections(&self) -> &SelectionStore {
        &self.selections
    }

    /// Selection set of the active chart, if a chart is shown.
    #[must_use]
    pub fn active_selection(&self) -> Option<&IndexSet<String>> {
        self.active.chart().map(|chart| self.selections.get(chart))
    }

    #[must_use]
    pub fn arrows(&self, facts: DatasetFacts) -> ArrowVisibility {
        match self.active {
            ActiveView::Table => ArrowVisibility::HIDDEN,
            ActiveView::Chart(chart) => ArrowVisibility::for_chart(chart, facts.has_component_data),
        }
    }

    /// Sort dropdowns are shown on the horizontal chart only.
    #[must_use]
    pub fn sort_controls_visible(&self) -> bool {
        self.active == ActiveView::Chart(ChartKind::Horizontal)
    }

    #[must_use]
    pub fn stacked_toggle_visible(&self, facts: DatasetFacts) -> bool {
        self.sort_controls_visible() && self.stacking_allowed(facts)
    }

    fn stacking_allowed(&self, facts: DatasetFacts) -> bool {
        self.primary_sort != PrimarySort::Type && facts.can_stack
    }

    fn enforce_stacking(&mut self, facts: DatasetFacts) {
        if self.stacked && !self.stacking_allowed(facts) {
            debug!(primary = %self.primary_sort, "stacking not allowed, resetting toggle");
            self.stacked = false;
        }
    }

    fn enter_chart(&mut self, chart: ChartKind, facts: DatasetFacts) -> RenderRequest {
        self.selections.clear_all();
        self.active = ActiveView::Chart(chart);
        if chart == ChartKind::Horizontal {
            self.enforce_stacking(facts);
        }
        debug!(chart = ?chart, "active chart changed");
        RenderRequest::Chart
    }

    /// Applies one event and reports what must be redrawn.
    ///
    /// Events whose control is not visible in the current view are ignored.
    pub fn apply(&mut self, event: &WidgetEvent, facts: DatasetFacts) -> RenderRequest {
        let request = match (event, self.active) {
            (WidgetEvent::FlipToChart, ActiveView::Table) => {
                self.enter_chart(ChartKind::Donut, facts)
            }
            (WidgetEvent::FlipToTable, ActiveView::Chart(_)) => {
                self.selections.clear_all();
                self.active = ActiveView::Table;
                debug!("flipped to table");
                RenderRequest::Table
            }
            (WidgetEvent::ArrowRight, ActiveView::Chart(chart)) => {
                match chart.next(facts.has_component_data) {
                    Some(target) => self.enter_chart(target, facts),
                    None => RenderRequest::None,
                }
            }
            (WidgetEvent::ArrowLeft, ActiveView::Chart(chart)) => {
                match chart.previous(facts.has_component_data) {
                    Some(target) => self.enter_chart(target, facts),
                    None => RenderRequest::None,
                }
            }
            (WidgetEvent::SortTable(column), ActiveView::Table) => {
                self.table_sort = self.table_sort.clicked(*column);
                RenderRequest::Table
            }
            (WidgetEvent::SetPrimarySort(primary), ActiveView::Chart(ChartKind::Horizontal)) => {
                self.primary_sort = *primary;
                self.enforce_stacking(facts);
                RenderRequest::Chart
            }
            (
                WidgetEvent::SetSecondarySort(secondary),
                ActiveView::Chart(ChartKind::Horizontal),
            ) => {
                self.secondary_sort = *secondary;
                RenderRequest::Chart
            }
            (WidgetEvent::SetStacked(stacked), ActiveView::Chart(ChartKind::Horizontal)) => {
                if (*stacked && !self.stacking_allowed(facts)) || *stacked == self.stacked {
                    RenderRequest::None
                } else {
                    self.stacked = *stacked;
                    RenderRequest::Chart
                }
            }
            (WidgetEvent::SelectElement(id), ActiveView::Chart(chart)) => {
                let selected = self.selections.toggle(chart, id);
                trace!(chart = ?chart, id = %id, selected, "toggled selection");
                RenderRequest::Colors
            }
            (WidgetEvent::ClickOutside, active) => {
                if self.selections.is_empty() {
                    RenderRequest::None
                } else {
                    self.selections.clear_all();
                    match active {
                        ActiveView::Chart(_) => RenderRequest::Colors,
                        ActiveView::Table => RenderRequest::None,
                    }
                }
            }
            (WidgetEvent::Resize { .. }, ActiveView::Chart(_)) => {
                self.selections.clear_all();
                RenderRequest::Chart
            }
            (WidgetEvent::Resize { .. }, ActiveView::Table) => RenderRequest::TableLayout,
            _ => RenderRequest::None,
        };

        if request == RenderRequest::None {
            trace!(event = %event, "event produced no visible change");
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrowVisibility, ChartKind, WidgetEvent};

    #[test]
    fn arrows_skip_stacked_without_components() {
        assert_eq!(ChartKind::Donut.next(false), Some(ChartKind::Horizontal));
        assert_eq!(ChartKind::Horizontal.previous(false), Some(ChartKind::Donut));
        assert_eq!(ChartKind::Donut.next(true), Some(ChartKind::Stacked));
        assert_eq!(ChartKind::Horizontal.previous(true), Some(ChartKind::Stacked));
    }

    #[test]
    fn arrow_visibility_table() {
        let donut = ArrowVisibility::for_chart(ChartKind::Donut, true);
        assert!(!donut.left && donut.right);
        let stacked = ArrowVisibility::for_chart(ChartKind::Stacked, true);
        assert!(stacked.left && stacked.right);
        let horizontal = ArrowVisibility::for_chart(ChartKind::Horizontal, false);
        assert!(horizontal.left && !horizontal.right);
        let orphan = ArrowVisibility::for_chart(ChartKind::Stacked, false);
        assert!(!orphan.right);
    }

    #[test]
    fn events_round_trip_through_text() {
        for text in [
            "flip-to-chart",
            "arrow-right",
            "sort-table:Weight",
            "primary:Component",
            "secondary:Sequence",
            "stacked:true",
            "select:Essay-Team",
            "resize:800x600",
        ] {
            let event: WidgetEvent = text.parse().expect("parse event");
            assert_eq!(event.to_string(), text);
        }
        assert!("select:".parse::<WidgetEvent>().is_err());
        assert!("jump".parse::<WidgetEvent>().is_err());
    }
}
