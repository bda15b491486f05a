mod config;
mod donut_render_frame_builder;
mod engine;
mod face_layout;
mod horizontal_render_frame_builder;
mod json_contract;
mod snapshot;
mod stacked_render_frame_builder;
mod table_render_frame_builder;

pub use config::{
    DonutChartConfig, HorizontalChartConfig, Margins, StackedChartConfig, WidgetConfig,
};
pub use donut_render_frame_builder::{donut_center_caption, pie_angles};
pub use engine::{FlipCardWidget, LoadState};
pub use face_layout::{ChartArea, horizontal_card_height, table_card_height};
pub use horizontal_render_frame_builder::horizontal_domain_max;
pub use json_contract::{WIDGET_SNAPSHOT_JSON_SCHEMA_V1, WidgetSnapshotJsonContractV1};
pub use snapshot::{LoadStatus, ViewSnapshot, WidgetSnapshot};
