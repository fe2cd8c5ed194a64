//! Viewer application
//!
//! The root window lists every reconstructed component and the malformed
//! blocks of the run. Each open component gets its own native window
//! (an immediate viewport) titled `Component PID: {pid}` with one panel
//! per series; backends without multi-viewport support get an embedded
//! window instead.

use std::path::PathBuf;

use anyhow::Result;
use trace_timeline::{Component, Reconstruction, TimelineError, Timestamp};

use crate::config::ViewConfig;
use crate::panel::Panel;

/// Panels and window state of one component
pub struct ComponentView {
    pid: String,
    origin: std::result::Result<Timestamp, String>,
    panels: Vec<Panel>,
    open: bool,
}

impl ComponentView {
    /// Build every panel of `component`, in display order
    ///
    /// State machines first, then flows, then ports, then the events panel,
    /// which is always present and always last.
    pub fn build(component: &Component) -> Self {
        let origin = match component.base_time() {
            Ok(origin) => origin,
            Err(e) => {
                log::warn!("{}", e);
                return Self {
                    pid: component.pid.clone(),
                    origin: Err(e.to_string()),
                    panels: Vec::new(),
                    open: true,
                };
            }
        };

        let mut panels = Vec::new();
        for (machine, series) in &component.state_machines {
            panels.push(Panel::intervals(machine.as_str(), "state", series, origin));
        }
        for (owner, series) in &component.flows {
            panels.push(Panel::intervals(owner.as_str(), "flows", series, origin));
        }
        for (key, series) in &component.ports {
            let mut words = key.split_whitespace();
            let title = words.next().unwrap_or(key.as_str());
            let y_label = words.next().unwrap_or_default();
            panels.push(Panel::occurrences(title, y_label, series));
        }
        panels.push(Panel::occurrences("Events", "event", &component.events));

        log::debug!(
            "Component {}: {} panels [{}]",
            component.pid,
            panels.len(),
            panels.iter().map(Panel::title).collect::<Vec<_>>().join(", ")
        );

        Self {
            pid: component.pid.clone(),
            origin: Ok(origin),
            panels,
            open: true,
        }
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn window_title(&self) -> String {
        format!("Component PID: {}", self.pid)
    }

    /// Draw the component's panels into `ui`
    pub fn ui(&mut self, ui: &mut egui::Ui, view: &ViewConfig) {
        let origin = match &self.origin {
            Ok(origin) => *origin,
            Err(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
                return;
            }
        };

        // Panels of one component share the time axis, components never do
        let link_group = egui::Id::new(("trace-viewer-time-axis", &self.pid));
        let last = self.panels.len().saturating_sub(1);

        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            for (index, panel) in self.panels.iter_mut().enumerate() {
                panel.show(ui, &self.pid, index, origin, view, link_group, index == last);
                ui.add_space(6.0);
            }
        });
    }
}

/// Malformed block as listed in the root window
struct MalformedEntry {
    summary: String,
    block: Vec<String>,
}

impl From<&TimelineError> for MalformedEntry {
    fn from(error: &TimelineError) -> Self {
        let block = match error {
            TimelineError::MalformedRecord { block, .. } => block.clone(),
            _ => Vec::new(),
        };
        Self {
            summary: error.to_string(),
            block,
        }
    }
}

pub struct TraceViewerApp {
    source: PathBuf,
    views: Vec<ComponentView>,
    malformed: Vec<MalformedEntry>,
    filtered: usize,
    view: ViewConfig,
}

impl TraceViewerApp {
    pub fn new(source: PathBuf, outcome: Reconstruction, view: ViewConfig) -> Self {
        let views = outcome.timeline.components().map(ComponentView::build).collect();
        Self {
            source,
            views,
            malformed: outcome.malformed.iter().map(MalformedEntry::from).collect(),
            filtered: outcome.filtered,
            view,
        }
    }

    fn root_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Trace Viewer");
        ui.label(format!("Trace: {}", self.source.display()));
        ui.label(format!(
            "{} components, {} malformed blocks, {} filtered records",
            self.views.len(),
            self.malformed.len(),
            self.filtered
        ));
        ui.separator();

        for view in &mut self.views {
            let title = view.window_title();
            ui.horizontal(|ui| {
                ui.checkbox(&mut view.open, title);
                ui.weak(format!("{} panels", view.panel_count()));
            });
        }

        if !self.malformed.is_empty() {
            ui.separator();
            egui::CollapsingHeader::new(format!("Malformed blocks ({})", self.malformed.len()))
                .show(ui, |ui| {
                    for entry in &self.malformed {
                        egui::CollapsingHeader::new(&entry.summary)
                            .id_salt(&entry.summary)
                            .show(ui, |ui| {
                                for line in &entry.block {
                                    ui.monospace(line);
                                }
                            });
                    }
                });
        }
    }
}

impl eframe::App for TraceViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.root_ui(ui));
        });

        let view_config = &self.view;
        for view in self.views.iter_mut().filter(|v| v.open) {
            let viewport_id = egui::ViewportId::from_hash_of(("component", view.pid()));
            let builder = egui::ViewportBuilder::default()
                .with_title(view.window_title())
                .with_inner_size([1100.0, 900.0]);

            ctx.show_viewport_immediate(viewport_id, builder, |ctx, class| {
                if class == egui::ViewportClass::Embedded {
                    let mut open = true;
                    egui::Window::new(view.window_title())
                        .id(egui::Id::new(viewport_id))
                        .open(&mut open)
                        .default_size([900.0, 700.0])
                        .show(ctx, |ui| view.ui(ui, view_config));
                    if !open {
                        view.open = false;
                    }
                } else {
                    egui::CentralPanel::default().show(ctx, |ui| view.ui(ui, view_config));
                    if ctx.input(|i| i.viewport().close_requested()) {
                        view.open = false;
                    }
                }
            });
        }
    }
}

/// Open the viewer and block until it is closed
pub fn run(source: PathBuf, outcome: Reconstruction, view: ViewConfig) -> Result<()> {
    let app = TraceViewerApp::new(source, outcome, view);
    log::info!("Opening {} component windows", app.views.len());

    let mut options = eframe::NativeOptions::default();
    options.viewport = egui::ViewportBuilder::default()
        .with_title("Trace Viewer")
        .with_inner_size([420.0, 520.0]);

    eframe::run_native(
        "Trace Viewer",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            if let Err(e) =
                ctrlc::set_handler(move || ctx.send_viewport_cmd(egui::ViewportCommand::Close))
            {
                log::warn!("Failed to install Ctrl+C handler: {}", e);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trace_timeline::{Reconstructor, TextLogParser};

    const LOG: &str = "\
name: Sender
ts: 10:00:00:000000
pid: 7
cat: state
args: IDLE
end: 10:00:01:000000

name: burst
ts: 10:00:00:500000
pid: 7
cat: port flow
args: on_off Sender 64 10
end: 10:00:00:900000

name: out
ts: 10:00:00:600000
pid: 7
cat: port packet packet_snd
args: TCP Sender IDLE 1
end:

name: ping
ts: 10:00:00:700000
pid: 8
cat: event app snd
args:
end:
";

    fn views() -> Vec<ComponentView> {
        let outcome = Reconstructor::default().reconstruct(TextLogParser::parse_str(LOG));
        outcome.timeline.components().map(ComponentView::build).collect()
    }

    #[test]
    fn test_panel_order_ends_with_events() {
        let views = views();
        let titles: Vec<&str> = views[0].panels.iter().map(Panel::title).collect();
        assert_eq!(titles, vec!["Sender", "Sender", "out(TCP)", "Events"]);
        assert_eq!(views[0].window_title(), "Component PID: 7");
    }

    #[test]
    fn test_component_without_origin_has_no_panels() {
        let views = views();
        assert_eq!(views[1].pid(), "8");
        assert_eq!(views[1].panel_count(), 0);
        assert!(views[1].origin.is_err());
    }

    #[test]
    fn test_malformed_entry_keeps_block() {
        let outcome =
            Reconstructor::default().reconstruct(TextLogParser::parse_str("name: A\npid: 1\n"));
        let entry = MalformedEntry::from(&outcome.malformed[0]);
        assert_eq!(entry.block, vec!["name: A", "pid: 1"]);
        assert!(entry.summary.contains("line 1"));
    }
}
