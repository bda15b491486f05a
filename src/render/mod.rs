mod frame;
mod null_renderer;
mod palette;
mod primitives;
mod reconcile;

pub use frame::{HitRegion, HitShape, HitTarget, RenderFrame};
pub use null_renderer::NullRenderer;
pub use palette::{Palette, ResolvedPalette};
pub use primitives::{
    ArcPrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use reconcile::{ReconcileDiff, reconcile, replace_all};

use crate::error::CardResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`, so drawing code stays
/// isolated from view state and derivation.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> CardResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
