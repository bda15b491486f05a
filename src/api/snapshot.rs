use serde::{Deserialize, Serialize};

use crate::core::{
    ComponentStack, DonutBucket, HorizontalLayout, HorizontalRecord, PrimarySort, SecondarySort,
    TableLine, TableSort, Viewport,
};
use crate::interaction::{ActiveView, ArrowVisibility, SelectionStore};

/// Load lifecycle as reported in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready { rows: usize },
    Failed { message: String },
}

/// Derived records of whatever the card currently shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewSnapshot {
    /// Nothing derived yet, or the load failed.
    Empty,
    Table {
        lines: Vec<TableLine>,
    },
    Donut {
        buckets: Vec<DonutBucket>,
        center_fraction: f64,
        center_label: String,
        center_caption: String,
    },
    Stacked {
        stacks: Vec<ComponentStack>,
    },
    Horizontal {
        records: Vec<HorizontalRecord>,
        layout: HorizontalLayout,
        domain_max: f64,
    },
}

/// Serializable deterministic state snapshot used by regression tests, the
/// CLI and debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    /// Card size with the height required by the active face.
    pub card: Viewport,
    pub load: LoadStatus,
    pub active: ActiveView,
    pub subtitle: Option<String>,
    pub table_sort: TableSort,
    pub primary_sort: PrimarySort,
    pub secondary_sort: SecondarySort,
    pub stacked: bool,
    pub arrows: ArrowVisibility,
    pub sort_controls_visible: bool,
    pub stacked_toggle_visible: bool,
    pub selections: SelectionStore,
    pub view: ViewSnapshot,
}
