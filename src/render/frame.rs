use crate::core::Viewport;
use crate::error::{CardError, CardResult};
use crate::interaction::WidgetEvent;
use crate::render::{ArcPrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// What a click on a hit region means.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Selectable bar, segment or arc.
    Element(String),
    /// Icon, arrow or sort control dispatching its own event.
    Control(WidgetEvent),
}

impl HitTarget {
    /// Event dispatched when the target is clicked.
    #[must_use]
    pub fn event(&self) -> WidgetEvent {
        match self {
            Self::Element(id) => WidgetEvent::SelectElement(id.clone()),
            Self::Control(event) => event.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub target: HitTarget,
    pub shape: HitShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Rect(RectPrimitive),
    Arc(ArcPrimitive),
}

impl HitShape {
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        match self {
            Self::Rect(rect) => rect.contains(x, y),
            Self::Arc(arc) => arc.contains(x, y),
        }
    }
}

/// Backend-agnostic scene for one draw pass of the card.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub arcs: Vec<ArcPrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub hit_regions: Vec<HitRegion>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            arcs: Vec::new(),
            texts: Vec::new(),
            hit_regions: Vec::new(),
        }
    }

    /// Adds a selectable bar: drawn and registered for hit testing.
    pub fn push_selectable_rect(&mut self, id: impl Into<String>, rect: RectPrimitive) {
        self.rects.push(rect);
        self.hit_regions.push(HitRegion {
            target: HitTarget::Element(id.into()),
            shape: HitShape::Rect(rect),
        });
    }

    /// Adds a selectable donut arc: drawn and registered for hit testing.
    pub fn push_selectable_arc(&mut self, id: impl Into<String>, arc: ArcPrimitive) {
        self.arcs.push(arc);
        self.hit_regions.push(HitRegion {
            target: HitTarget::Element(id.into()),
            shape: HitShape::Arc(arc),
        });
    }

    /// Adds a clickable control with its caption centered inside `rect`.
    pub fn push_control(
        &mut self,
        event: WidgetEvent,
        rect: RectPrimitive,
        caption: TextPrimitive,
    ) {
        self.rects.push(rect);
        self.texts.push(caption);
        self.hit_regions.push(HitRegion {
            target: HitTarget::Control(event),
            shape: HitShape::Rect(rect),
        });
    }

    /// Topmost region under the point, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&HitTarget> {
        self.hit_regions
            .iter()
            .rev()
            .find(|region| region.shape.contains(x, y))
            .map(|region| &region.target)
    }

    /// Selectable element identifiers in draw order.
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.hit_regions.iter().filter_map(|region| match &region.target {
            HitTarget::Element(id) => Some(id.as_str()),
            HitTarget::Control(_) => None,
        })
    }

    pub fn validate(&self) -> CardResult<()> {
        if !self.viewport.is_valid() {
            return Err(CardError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for arc in &self.arcs {
            arc.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.rects.is_empty()
            && self.arcs.is_empty()
            && self.texts.is_empty()
    }
}
