//! Timeline panels drawn with egui_plot
//!
//! A panel is either an interval panel (horizontal bars on one row, gaps
//! between them in light gray) or an occurrence panel (points on one row
//! with a hover tooltip and an Analyse button). Every panel of a component
//! links its x axis to the component's link group.

use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, Points, Text};
use indexmap::IndexMap;
use trace_timeline::{IntervalLayout, IntervalSeries, OccurrenceSeries, TimeWindow, Timestamp};

use crate::config::ViewConfig;
use crate::interaction::{
    annotation, hit_test, nearest_point, BarElement, BarState, IntervalPanelState,
    OccurrencePanelState,
};
use crate::report;

/// Ten-colour categorical cycle, assigned in order of first appearance
const PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

const GAP_COLOR: Color32 = Color32::from_gray(211);

/// Bar thickness in plot units; bars are centred on y = 0
const BAR_WIDTH: f64 = 0.6;

/// Horizontal click slack around narrow bars, in screen points
const CLICK_SLACK_PX: f32 = 4.0;

/// Label → colour, in order of first appearance
fn assign_colors<'a>(labels: impl Iterator<Item = &'a str>) -> IndexMap<String, Color32> {
    let mut colors = IndexMap::new();
    for label in labels {
        if !colors.contains_key(label) {
            let color = PALETTE[colors.len() % PALETTE.len()];
            colors.insert(label.to_string(), color);
        }
    }
    colors
}

enum PanelBody {
    Intervals {
        layout: IntervalLayout,
        state: IntervalPanelState,
    },
    Occurrences {
        series: OccurrenceSeries,
        state: OccurrencePanelState,
    },
}

/// One row of a component surface
pub struct Panel {
    title: String,
    y_label: String,
    colors: IndexMap<String, Color32>,
    body: PanelBody,
}

impl Panel {
    pub fn intervals(
        title: impl Into<String>,
        y_label: impl Into<String>,
        series: &IntervalSeries,
        origin: Timestamp,
    ) -> Self {
        let layout = IntervalLayout::compute(series, origin);
        let colors = assign_colors(layout.intervals.iter().map(|i| i.label.as_str()));
        Self {
            title: title.into(),
            y_label: y_label.into(),
            colors,
            body: PanelBody::Intervals {
                layout,
                state: IntervalPanelState::default(),
            },
        }
    }

    pub fn occurrences(
        title: impl Into<String>,
        y_label: impl Into<String>,
        series: &OccurrenceSeries,
    ) -> Self {
        let colors = assign_colors(series.occurrences().iter().map(|o| o.label.as_str()));
        Self {
            title: title.into(),
            y_label: y_label.into(),
            colors,
            body: PanelBody::Occurrences {
                series: series.clone(),
                state: OccurrencePanelState::default(),
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Draw the panel and feed this frame's pointer input into its state
    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        pid: &str,
        index: usize,
        origin: Timestamp,
        view: &ViewConfig,
        link_group: egui::Id,
        is_last: bool,
    ) {
        let Panel {
            title,
            y_label,
            colors,
            body,
        } = self;

        let mut plot = Plot::new(("trace-panel", pid, index))
            .height(view.panel_height)
            .legend(Legend::default())
            .link_axis(link_group, [true, false])
            .link_cursor(link_group, [true, false])
            .allow_scroll(false)
            .allow_boxed_zoom(true)
            .include_y(-1.0)
            .include_y(1.0)
            .show_y(false)
            .y_axis_label(y_label.clone());
        if is_last {
            plot = plot.x_axis_label("Time in seconds");
        }

        match body {
            PanelBody::Intervals { layout, state } => {
                ui.label(RichText::new(title.as_str()).strong());
                show_intervals(ui, plot, layout, state, colors, view);
            }
            PanelBody::Occurrences { series, state } => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(title.as_str()).strong());
                    if ui
                        .button("Analyse")
                        .on_hover_text("Spacing statistics of the points currently in view")
                        .clicked()
                    {
                        let stats = state.analyse(series, origin);
                        report::print_stats(title, pid, &stats);
                    }
                    if let Some(stats) = state.last_stats() {
                        ui.label(RichText::new(report::inline_stats(stats)).monospace().small());
                    }
                });
                show_occurrences(ui, plot, series, state, colors, origin, view);
            }
        }
    }
}

fn show_intervals(
    ui: &mut egui::Ui,
    plot: Plot,
    layout: &IntervalLayout,
    state: &mut IntervalPanelState,
    colors: &IndexMap<String, Color32>,
    view: &ViewConfig,
) {
    let text_color = ui.visuals().strong_text_color();
    let half = BAR_WIDTH / 2.0;

    let response = plot.show(ui, |plot_ui| {
        let gaps: Vec<Bar> = layout
            .visible_gaps()
            .map(|gap| {
                Bar::new(0.0, gap.seconds())
                    .base_offset(gap.offset)
                    .width(BAR_WIDTH)
                    .fill(GAP_COLOR)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();
        if !gaps.is_empty() {
            plot_ui.bar_chart(BarChart::new("gap", gaps).horizontal().color(GAP_COLOR));
        }

        for (label, color) in colors {
            let bars: Vec<Bar> = layout
                .intervals
                .iter()
                .filter(|i| &i.label == label)
                .map(|i| {
                    let outline = match state.state(BarElement::Interval(i.index)) {
                        BarState::Collapsed => 1.0,
                        BarState::Expanded => 2.5,
                    };
                    Bar::new(0.0, i.duration)
                        .base_offset(i.offset)
                        .width(BAR_WIDTH)
                        .fill(*color)
                        .stroke(Stroke::new(outline, Color32::BLACK))
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(label.clone(), bars).horizontal().color(*color));

            // Zero-width bars would vanish, mark their start instead
            for open in layout
                .intervals
                .iter()
                .filter(|i| &i.label == label && i.duration == 0.0)
            {
                plot_ui.line(
                    Line::new("", vec![[open.offset, -half], [open.offset, half]])
                        .color(*color)
                        .width(3.0),
                );
            }
        }

        for (element, anchor) in state.expanded() {
            if let Some(text) = annotation(layout, element, &view.annotation_placeholder) {
                plot_ui.text(
                    Text::new("", PlotPoint::new(anchor[0], anchor[1]), RichText::new(text).small())
                        .color(text_color)
                        .anchor(Align2::LEFT_BOTTOM),
                );
            }
        }
    });

    if response.response.clicked() {
        if let Some(pos) = response.response.interact_pointer_pos() {
            let transform = &response.transform;
            let value = transform.value_from_position(pos);
            let slack = transform
                .value_from_position(pos + egui::vec2(CLICK_SLACK_PX, 0.0))
                .x
                - value.x;

            for element in hit_test(layout, value.x, value.y, half, slack.abs()) {
                let toggled = state.toggle(element, [value.x, value.y]);
                log::debug!("{:?} -> {:?}", element, toggled);
            }
        }
    }
}

fn show_occurrences(
    ui: &mut egui::Ui,
    plot: Plot,
    series: &OccurrenceSeries,
    state: &mut OccurrencePanelState,
    colors: &IndexMap<String, Color32>,
    origin: Timestamp,
    view: &ViewConfig,
) {
    let tooltip_bg = ui.visuals().extreme_bg_color;
    let tooltip_fg = ui.visuals().strong_text_color();
    let offsets: Vec<f64> = series
        .occurrences()
        .iter()
        .map(|o| o.at.seconds_since(origin))
        .collect();

    let response = plot.show(ui, |plot_ui| {
        for (label, color) in colors {
            let points: Vec<[f64; 2]> = series
                .occurrences()
                .iter()
                .zip(&offsets)
                .filter(|(o, _)| &o.label == label)
                .map(|(_, x)| [*x, 0.0])
                .collect();
            plot_ui.points(
                Points::new(label.clone(), points)
                    .radius(view.point_radius)
                    .color(*color),
            );
        }

        if let Some(idx) = state.hover.active() {
            if let (Some(occurrence), Some(x)) = (series.occurrences().get(idx), offsets.get(idx)) {
                plot_ui.text(
                    Text::new(
                        "",
                        PlotPoint::new(*x, 0.15),
                        RichText::new(occurrence.at.to_string()).background_color(tooltip_bg),
                    )
                    .color(tooltip_fg)
                    .anchor(Align2::LEFT_BOTTOM),
                );
            }
        }
    });

    let transform = &response.transform;
    let bounds = transform.bounds();
    state.observe_viewport(TimeWindow::new(bounds.min()[0], bounds.max()[0]));

    let hit = response.response.hover_pos().and_then(|pointer| {
        let screen: Vec<[f32; 2]> = offsets
            .iter()
            .map(|x| {
                let pos = transform.position_from_point(&PlotPoint::new(*x, 0.0));
                [pos.x, pos.y]
            })
            .collect();
        nearest_point(&screen, [pointer.x, pointer.y], view.hover_radius)
    });
    if state.hover.update(hit) {
        ui.ctx().request_repaint();
    }
}
