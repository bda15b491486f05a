pub mod aggregate;
pub mod dataset;
pub mod horizontal;
pub mod ordering;
pub mod primitives;
pub mod scale;
pub mod table;
pub mod types;

pub use aggregate::{
    ComponentStack, DonutBucket, DonutCenter, component_segment_id, component_stacks,
    donut_buckets, donut_center,
};
pub use dataset::{Dataset, base_deliverable};
pub use horizontal::{
    HorizontalLayout, HorizontalMetrics, HorizontalRecord, LayoutSlot, PrimarySort,
    RecordSegment, RecordWeights, SecondarySort, derive_records, fit_segment_label,
    layout_records, stacking_allowed,
};
pub use primitives::format_percent;
pub use scale::{BandScale, LinearScale};
pub use table::{SortDirection, TABLE_COLUMNS, TableColumn, TableLine, TableSort, table_lines};
pub use types::{DeliverableType, Row, Viewport};
