use std::path::Path;

use indexmap::IndexSet;
use tracing::{debug, info, trace, warn};

use crate::core::{
    ComponentStack, Dataset, DonutBucket, DonutCenter, HorizontalLayout, HorizontalRecord,
    TableLine, Viewport, component_stacks, derive_records, donut_buckets, donut_center,
    format_percent, layout_records, table_lines,
};
use crate::error::{CardError, CardResult};
use crate::interaction::{
    ActiveView, ChartKind, DatasetFacts, RenderRequest, ViewState, WidgetEvent,
};
use crate::render::{
    HitShape, HitTarget, ReconcileDiff, RenderFrame, Renderer, ResolvedPalette, reconcile,
    replace_all,
};

use super::donut_render_frame_builder::{donut_center_caption, push_donut};
use super::face_layout::{
    ChartArea, card_frame, horizontal_card_height, push_arrows, push_flip_icon, push_subtitle,
    table_card_height,
};
use super::horizontal_render_frame_builder::{
    HorizontalControls, horizontal_domain_max, push_horizontal, push_horizontal_controls,
};
use super::stacked_render_frame_builder::push_component_stacks;
use super::table_render_frame_builder::{build_message_frame, build_table_frame};
use super::{LoadStatus, ViewSnapshot, WidgetConfig, WidgetSnapshot};

/// Data load lifecycle. Events are only handled once the load is `Ready`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Dataset),
    Failed { message: String },
}

/// What was drawn last, kept to classify the next render.
#[derive(Debug, Clone, PartialEq)]
struct DrawnElements {
    view: ActiveView,
    stacked: bool,
    elements: Vec<(String, HitShape)>,
}

/// Main orchestration facade consumed by host applications.
///
/// `FlipCardWidget` owns the dataset, the view state and the renderer. Hosts
/// feed it events (or raw pointer clicks) one at a time; every event that
/// changes something visible produces a new `RenderFrame`.
pub struct FlipCardWidget<R: Renderer> {
    renderer: R,
    config: WidgetConfig,
    palette: ResolvedPalette,
    card_width: u32,
    load: LoadState,
    state: ViewState,
    last_frame: Option<RenderFrame>,
    drawn: Option<DrawnElements>,
    last_diff: ReconcileDiff,
}

impl<R: Renderer> FlipCardWidget<R> {
    pub fn new(renderer: R, config: WidgetConfig) -> CardResult<Self> {
        config.validate()?;
        let palette = config.palette.resolve()?;

        Ok(Self {
            renderer,
            card_width: config.card.width,
            config,
            palette,
            load: LoadState::Loading,
            state: ViewState::default(),
            last_frame: None,
            drawn: None,
            last_diff: ReconcileDiff::default(),
        })
    }

    /// Resolves the pending load and draws the table face (or the error
    /// message). Only the first call has an effect.
    pub fn finish_load(&mut self, result: CardResult<Dataset>) -> CardResult<()> {
        if !matches!(self.load, LoadState::Loading) {
            warn!("dataset already loaded, ignoring second load result");
            return Ok(());
        }

        match result {
            Ok(dataset) => {
                info!(
                    rows = dataset.len(),
                    has_component_data = dataset.has_component_data(),
                    "dataset ready"
                );
                self.load = LoadState::Ready(dataset);
            }
            Err(err) => {
                warn!(error = %err, source = %self.config.data_source, "dataset load failed");
                self.load = LoadState::Failed {
                    message: self.config.load_error_message(),
                };
            }
        }
        self.render()
    }

    pub fn load_csv_str(&mut self, input: &str) -> CardResult<()> {
        self.finish_load(Dataset::from_csv_str(input))
    }

    pub fn load_path(&mut self, path: impl AsRef<Path>) -> CardResult<()> {
        self.finish_load(Dataset::from_path(path))
    }

    /// Applies one event and redraws what it invalidated.
    pub fn handle_event(&mut self, event: &WidgetEvent) -> CardResult<RenderRequest> {
        let LoadState::Ready(dataset) = &self.load else {
            trace!(event = %event, "ignoring event before dataset is ready");
            return Ok(RenderRequest::None);
        };
        let facts = DatasetFacts::from(dataset);

        if let WidgetEvent::Resize { width, height } = event {
            if *width == 0 || *height == 0 {
                return Err(CardError::InvalidViewport {
                    width: *width,
                    height: *height,
                });
            }
            self.card_width = *width;
        }

        let request = self.state.apply(event, facts);
        debug!(event = %event, request = ?request, "event applied");
        if request != RenderRequest::None {
            self.render()?;
        }
        Ok(request)
    }

    /// Resolves a click at card coordinates against the last frame: a control
    /// dispatches its event, an element toggles its selection, anything else
    /// counts as a click outside.
    pub fn pointer_click(&mut self, x: f64, y: f64) -> CardResult<RenderRequest> {
        let event = self
            .last_frame
            .as_ref()
            .and_then(|frame| frame.hit_test(x, y))
            .map_or(WidgetEvent::ClickOutside, HitTarget::event);
        trace!(x, y, event = %event, "pointer click resolved");
        self.handle_event(&event)
    }

    /// Builds the frame for the current state and hands it to the renderer.
    pub fn render(&mut self) -> CardResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)?;

        let drawn = DrawnElements {
            view: self.state.active(),
            stacked: self.state.stacked(),
            elements: frame
                .hit_regions
                .iter()
                .filter_map(|region| match &region.target {
                    HitTarget::Element(id) => Some((id.clone(), region.shape)),
                    HitTarget::Control(_) => None,
                })
                .collect(),
        };
        self.last_diff = match &self.drawn {
            Some(previous) if previous.view == drawn.view && previous.stacked == drawn.stacked => {
                reconcile(&previous.elements, &drawn.elements)
            }
            Some(previous) => replace_all(&previous.elements, &drawn.elements),
            None => replace_all(&[], &drawn.elements),
        };
        debug!(
            entered = self.last_diff.entered.len(),
            updated = self.last_diff.updated.len(),
            exited = self.last_diff.exited.len(),
            "frame rendered"
        );

        self.drawn = Some(drawn);
        self.last_frame = Some(frame);
        Ok(())
    }

    /// Materializes the frame for the current state without rendering it.
    pub fn build_render_frame(&self) -> CardResult<RenderFrame> {
        let dataset = match &self.load {
            LoadState::Loading => {
                let viewport = Viewport::new(self.card_width, self.config.card.height);
                return Ok(RenderFrame::new(viewport));
            }
            LoadState::Failed { message } => {
                return Ok(build_message_frame(
                    &self.config,
                    &self.palette,
                    self.card_width,
                    message,
                ));
            }
            LoadState::Ready(dataset) => dataset,
        };

        let chart = match self.state.active() {
            ActiveView::Table => {
                let lines = table_lines(dataset.rows(), self.state.table_sort());
                return Ok(build_table_frame(
                    &self.config,
                    &self.palette,
                    self.card_width,
                    &lines,
                    self.state.table_sort(),
                ));
            }
            ActiveView::Chart(chart) => chart,
        };

        let facts = DatasetFacts::from(dataset);
        let selection = self.state.selections().get(chart);
        let card_height = self.required_card_height();
        let area = self.chart_area();
        let mut frame = card_frame(&self.config, &self.palette, self.card_width, card_height);
        push_subtitle(&mut frame, &self.config, &self.palette, chart.subtitle());

        match chart {
            ChartKind::Donut => {
                let buckets = donut_buckets(dataset.rows());
                let center = donut_center(&buckets, selection);
                push_donut(
                    &mut frame,
                    &self.config,
                    &self.palette,
                    area,
                    &buckets,
                    center,
                    selection,
                );
            }
            ChartKind::Stacked => {
                let stacks = component_stacks(dataset.rows());
                push_component_stacks(
                    &mut frame,
                    &self.config,
                    &self.palette,
                    area,
                    &stacks,
                    selection,
                )?;
            }
            ChartKind::Horizontal => {
                let (records, layout) = self.horizontal_view(dataset);
                push_horizontal_controls(
                    &mut frame,
                    &self.config,
                    &self.palette,
                    area,
                    HorizontalControls {
                        primary: self.state.primary_sort(),
                        secondary: self.state.secondary_sort(),
                        stacked: self.state.stacked(),
                        stacked_toggle_visible: self.state.stacked_toggle_visible(facts),
                    },
                );
                push_horizontal(
                    &mut frame,
                    &self.config,
                    &self.palette,
                    area,
                    &records,
                    &layout,
                    selection,
                )?;
            }
        }

        push_arrows(&mut frame, &self.palette, area, self.state.arrows(facts));
        push_flip_icon(
            &mut frame,
            &self.config,
            &self.palette,
            WidgetEvent::FlipToTable,
            "Table",
        );
        Ok(frame)
    }

    /// Card height needed by the active face: the table grows to fit its
    /// rows, the horizontal chart to fit its bars, other charts use the
    /// default height.
    #[must_use]
    pub fn required_card_height(&self) -> f64 {
        let LoadState::Ready(dataset) = &self.load else {
            return self.config.default_card_height;
        };
        match self.state.active() {
            ActiveView::Table => {
                let lines = table_lines(dataset.rows(), self.state.table_sort());
                table_card_height(&self.config, lines.len())
            }
            ActiveView::Chart(ChartKind::Horizontal) => {
                let (_, layout) = self.horizontal_view(dataset);
                horizontal_card_height(&self.config, layout.content_height)
            }
            ActiveView::Chart(_) => self.config.default_card_height,
        }
    }

    /// Chart container for the current card size.
    #[must_use]
    pub fn chart_area(&self) -> ChartArea {
        ChartArea::for_card(&self.config, self.card_width, self.required_card_height())
    }

    fn horizontal_view(&self, dataset: &Dataset) -> (Vec<HorizontalRecord>, HorizontalLayout) {
        let records = derive_records(
            dataset,
            self.state.primary_sort(),
            self.state.secondary_sort(),
            self.state.stacked(),
        );
        let layout = layout_records(
            &records,
            self.state.primary_sort(),
            self.config.horizontal.metrics,
        );
        (records, layout)
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        match &self.load {
            LoadState::Ready(dataset) => Some(dataset),
            LoadState::Loading | LoadState::Failed { .. } => None,
        }
    }

    /// Card size with the height required by the active face.
    #[must_use]
    pub fn card_viewport(&self) -> Viewport {
        Viewport::new(self.card_width, self.required_card_height().ceil() as u32)
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    /// Enter/update/exit classification of the last render.
    #[must_use]
    pub fn last_diff(&self) -> &ReconcileDiff {
        &self.last_diff
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Table lines for the current sort, empty until the dataset is ready.
    #[must_use]
    pub fn table_lines(&self) -> Vec<TableLine> {
        self.dataset()
            .map(|dataset| table_lines(dataset.rows(), self.state.table_sort()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn horizontal_records(&self) -> Vec<HorizontalRecord> {
        self.dataset()
            .map(|dataset| self.horizontal_view(dataset).0)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn donut_buckets(&self) -> Option<[DonutBucket; 2]> {
        self.dataset().map(|dataset| donut_buckets(dataset.rows()))
    }

    #[must_use]
    pub fn donut_center(&self) -> Option<DonutCenter> {
        self.donut_buckets().map(|buckets| {
            donut_center(&buckets, self.state.selections().get(ChartKind::Donut))
        })
    }

    #[must_use]
    pub fn component_stacks(&self) -> Vec<ComponentStack> {
        self.dataset()
            .map(|dataset| component_stacks(dataset.rows()))
            .unwrap_or_default()
    }

    /// Selection of the active chart; empty on the table face.
    #[must_use]
    pub fn active_selection(&self) -> IndexSet<String> {
        self.state.active_selection().cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        let facts = self.dataset().map(DatasetFacts::from).unwrap_or_default();
        let load = match &self.load {
            LoadState::Loading => LoadStatus::Loading,
            LoadState::Ready(dataset) => LoadStatus::Ready {
                rows: dataset.len(),
            },
            LoadState::Failed { message } => LoadStatus::Failed {
                message: message.clone(),
            },
        };

        WidgetSnapshot {
            card: self.card_viewport(),
            load,
            active: self.state.active(),
            subtitle: self
                .state
                .active()
                .chart()
                .map(|chart| chart.subtitle().to_owned()),
            table_sort: self.state.table_sort(),
            primary_sort: self.state.primary_sort(),
            secondary_sort: self.state.secondary_sort(),
            stacked: self.state.stacked(),
            arrows: self.state.arrows(facts),
            sort_controls_visible: self.state.sort_controls_visible(),
            stacked_toggle_visible: self.state.stacked_toggle_visible(facts),
            selections: self.state.selections().clone(),
            view: self.view_snapshot(),
        }
    }

    fn view_snapshot(&self) -> ViewSnapshot {
        let Some(dataset) = self.dataset() else {
            return ViewSnapshot::Empty;
        };
        match self.state.active() {
            ActiveView::Table => ViewSnapshot::Table {
                lines: self.table_lines(),
            },
            ActiveView::Chart(ChartKind::Donut) => {
                let buckets = donut_buckets(dataset.rows());
                let center = donut_center(&buckets, self.state.selections().get(ChartKind::Donut));
                ViewSnapshot::Donut {
                    buckets: buckets.to_vec(),
                    center_fraction: center.fraction,
                    center_label: format_percent(center.fraction),
                    center_caption: donut_center_caption(center).to_owned(),
                }
            }
            ActiveView::Chart(ChartKind::Stacked) => ViewSnapshot::Stacked {
                stacks: component_stacks(dataset.rows()),
            },
            ActiveView::Chart(ChartKind::Horizontal) => {
                let (records, layout) = self.horizontal_view(dataset);
                let domain_max = horizontal_domain_max(&records, self.config.fallback_domain_max);
                ViewSnapshot::Horizontal {
                    records,
                    layout,
                    domain_max,
                }
            }
        }
    }
}
