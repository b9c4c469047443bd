use std::sync::mpsc::Receiver;

use egui_plot::{Legend, Line, Plot, PlotPoints};
use tracing::warn;

use pf_runtime::{PlotMessage, TraceBuffer};
use pf_settings::PlotDef;

/// One configured pen, compiled for rendering.
struct Pen {
    subplot: usize,
    name: String,
    color: egui::Color32,
}

pub struct ScopeApp {
    pens: Vec<Pen>,
    subplots: usize,
    x_label: String,
    y_label: String,
    y_min: f64,
    y_max: f64,
    trace: TraceBuffer,
    rx: Receiver<PlotMessage>,
    finished: Option<String>,
}

impl ScopeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        plot: PlotDef,
        rx: Receiver<PlotMessage>,
    ) -> Self {
        let pens: Vec<Pen> = plot
            .pens
            .iter()
            .map(|pen| Pen {
                subplot: pen.plot,
                name: pen.name.clone(),
                color: parse_colour(&pen.colour),
            })
            .collect();
        let subplots = pens.iter().map(|p| p.subplot).max().unwrap_or(1);

        Self {
            trace: TraceBuffer::new(pens.len(), plot.x_axis_length),
            pens,
            subplots,
            x_label: plot.x_axis_label,
            y_label: plot.y_axis_label,
            y_min: plot.y_axis_min,
            y_max: plot.y_axis_max,
            rx,
            finished: None,
        }
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                PlotMessage::Sample(sample) => {
                    self.trace.push(sample.elapsed_s, &sample.plot_values());
                }
                PlotMessage::Finished { reason } => self.finished = Some(reason),
            }
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(reason) = &self.finished {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    format!("Loop stopped ({reason}) — close this window to exit"),
                );
                ui.separator();
            }

            let plot_height =
                (ui.available_height() / self.subplots as f32 - 8.0).max(80.0);
            for subplot in 1..=self.subplots {
                Plot::new(("strip", subplot))
                    .legend(Legend::default())
                    .height(plot_height)
                    .include_y(self.y_min)
                    .include_y(self.y_max)
                    .x_axis_label(&self.x_label)
                    .y_axis_label(&self.y_label)
                    .show(ui, |plot_ui| {
                        for (idx, pen) in self.pens.iter().enumerate() {
                            if pen.subplot != subplot {
                                continue;
                            }
                            let points = self.trace.points(idx);
                            plot_ui.line(
                                Line::new(PlotPoints::from(points))
                                    .name(&pen.name)
                                    .color(pen.color),
                            );
                        }
                    });
            }
        });

        // Keep draining even while the mouse is idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

fn parse_colour(colour: &str) -> egui::Color32 {
    match colour {
        "red" => egui::Color32::RED,
        "green" => egui::Color32::GREEN,
        "blue" => egui::Color32::BLUE,
        "yellow" => egui::Color32::YELLOW,
        "white" => egui::Color32::WHITE,
        "black" => egui::Color32::BLACK,
        "gray" => egui::Color32::GRAY,
        "cyan" => egui::Color32::from_rgb(0, 255, 255),
        "magenta" => egui::Color32::from_rgb(255, 0, 255),
        "orange" => egui::Color32::from_rgb(255, 165, 0),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let parsed = (
                u8::from_str_radix(&hex[1..3], 16),
                u8::from_str_radix(&hex[3..5], 16),
                u8::from_str_radix(&hex[5..7], 16),
            );
            match parsed {
                (Ok(r), Ok(g), Ok(b)) => egui::Color32::from_rgb(r, g, b),
                _ => {
                    warn!(colour, "unreadable hex colour, using light gray");
                    egui::Color32::LIGHT_GRAY
                }
            }
        }
        other => {
            warn!(colour = other, "unknown pen colour, using light gray");
            egui::Color32::LIGHT_GRAY
        }
    }
}
