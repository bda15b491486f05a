//! weightcard: headless model and renderer for a flippable course-weight card.
//!
//! The front face is a table of deliverables grouped by component; the back
//! face cycles through a donut (individual versus team), a stacked bar per
//! component and a sortable horizontal bar chart. State changes happen only
//! through [`FlipCardWidget::handle_event`]; frames are derived from the
//! dataset and the view state and handed to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FlipCardWidget, WidgetConfig};
pub use error::{CardError, CardResult};
