//! Studio window implemented with egui/eframe
//!
//! The animated background is painted on egui's background layer every
//! frame; the dashboard and the settings panel are drawn on top with
//! translucent frames.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{debug, error, info};

use super::components::project_board::ProjectBoard;
use super::components::settings_panel;
use super::constants::*;
use crate::api::{ApiWorker, MockProjectSource, Request};
use crate::render::{RenderSurface, load_noise_texture, paint_frame};
use crate::settings::{FileStorage, SettingsStore, SubscriptionId};

struct StudioApp {
    store: SettingsStore<FileStorage>,
    /// Shared with the store observer that forwards every new snapshot
    surface: Rc<RefCell<RenderSurface>>,
    subscription: SubscriptionId,
    worker: Option<ApiWorker>,
    board: ProjectBoard,
    noise_texture: egui::TextureHandle,
    show_settings: bool,
}

impl StudioApp {
    fn new(cc: &CreationContext<'_>, mut store: SettingsStore<FileStorage>) -> Self {
        info!("Initializing studio window");
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let surface = Rc::new(RefCell::new(RenderSurface::new(store.current())));
        let observer = Rc::clone(&surface);
        let subscription = store.subscribe(move |settings| {
            observer.borrow_mut().on_settings_changed(Arc::clone(settings));
        });

        let repaint_ctx = cc.egui_ctx.clone();
        let worker = match ApiWorker::spawn(MockProjectSource::default(), move || repaint_ctx.request_repaint()) {
            Ok(worker) => Some(worker),
            Err(err) => {
                error!(error = ?err, "Failed to start project source; dashboard stays empty");
                None
            }
        };

        let (board, initial_request) = ProjectBoard::new();
        let app = Self {
            store,
            surface,
            subscription,
            worker,
            board,
            noise_texture: load_noise_texture(&cc.egui_ctx),
            show_settings: true,
        };
        app.send(initial_request);
        app
    }

    fn send(&self, request: Request) {
        match &self.worker {
            Some(worker) => worker.send(request),
            None => debug!(?request, "No project source, dropping request"),
        }
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };
        let follow_ups: Vec<Request> = worker
            .poll()
            .into_iter()
            .filter_map(|reply| self.board.apply(reply))
            .collect();
        for request in follow_ups {
            self.send(request);
        }
    }

    /// Feed input to the surface, advance it and paint the background
    fn paint_background(&mut self, ctx: &egui::Context) {
        let (viewport, hover, dt) = ctx.input(|i| (i.content_rect(), i.pointer.hover_pos(), i.stable_dt));

        let frame = {
            let mut surface = self.surface.borrow_mut();
            if let Some(pos) = hover {
                surface.pointer_moved(
                    pos.x - viewport.min.x,
                    pos.y - viewport.min.y,
                    viewport.width(),
                    viewport.height(),
                );
            }
            for transition in surface.set_focus(self.board.is_focused()) {
                debug!(
                    layer = transition.layer.name(),
                    from = transition.from.name(),
                    to = transition.to.name(),
                    "Layer transition"
                );
            }
            surface.advance(dt);
            surface.frame()
        };

        let painter = ctx.layer_painter(egui::LayerId::background());
        paint_frame(&painter, viewport, &frame, Some(&self.noise_texture));
    }

    fn selected_title(&self) -> Option<&str> {
        let selected = self.board.selected()?;
        self.board
            .projects()
            .iter()
            .find(|project| project.id == selected)
            .map(|project| project.title.as_str())
    }
}

fn glass() -> egui::Frame {
    egui::Frame::new().fill(GLASS_FILL).inner_margin(PADDING)
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.paint_background(ctx);

        egui::TopBottomPanel::top("top_bar").frame(glass()).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Flux Studio");
                ui.add_space(SECTION_SPACING);
                match self.selected_title() {
                    Some(title) => ui.label(egui::RichText::new(title).strong()),
                    None => ui.weak("No project selected"),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if self.show_settings { "Hide Settings" } else { "Settings" };
                    if ui.button(label).clicked() {
                        self.show_settings = !self.show_settings;
                    }
                });
            });
        });

        if self.show_settings {
            egui::SidePanel::left("background_settings")
                .frame(glass())
                .default_width(SETTINGS_PANEL_WIDTH)
                .show(ctx, |ui| {
                    settings_panel::ui(ui, &mut self.store);
                });
        }

        let requests = egui::CentralPanel::default()
            .frame(egui::Frame::NONE.inner_margin(PADDING))
            .show(ctx, |ui| self.board.ui(ui))
            .inner;
        for request in requests {
            self.send(request);
        }

        // The background animates continuously
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.store.unsubscribe(self.subscription);
        info!(persisted = self.store.last_write_succeeded(), "Studio exiting");
    }
}

pub fn run_gui(store: SettingsStore<FileStorage>) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Flux Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Flux Studio",
        options,
        Box::new(move |cc| Ok(Box::new(StudioApp::new(cc, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch studio window: {err}"))
}
