//! Main meme studio application.
//!
//! This module contains the `MemeStudio` struct which implements the
//! `eframe::App` trait for the single-window generation workflow.

use super::settings::Settings;
use super::state::{Controller, RequestEvent};
use crate::client::MemeClient;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::export;
use crate::intake::ImageIntake;
use crate::raster;
use crate::types::{GenerationRequest, MemeStyle};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Pending export action, resolved when the viewport screenshot arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ExportKind {
    Download,
    Share,
}

/// The meme studio application window.
///
/// Owns the image intake, the view-state controller and the channel through
/// which background request threads report back.
pub struct MemeStudio {
    config: Config,
    settings: Settings,

    // Image state
    intake: ImageIntake,
    source_texture: Option<egui::TextureHandle>,
    /// Pre-converted image data awaiting texture upload on the next frame.
    pending_texture: Option<egui::ColorImage>,

    // Request state
    controller: Controller,
    rx: Receiver<RequestEvent>,
    tx: Sender<RequestEvent>,

    // Export state
    share_available: bool,
    pending_export: Option<ExportKind>,
    /// The result pane rectangle from the last rendered frame, in UI points.
    meme_rect: Option<egui::Rect>,
    /// Feedback line for intake and export outcomes.
    status: Option<String>,
}

impl MemeStudio {
    /// Creates a new studio instance.
    ///
    /// # Arguments
    /// * `config` - Application configuration (endpoint)
    /// * `initial_image` - Optional image file to preload
    pub fn new(config: Config, initial_image: Option<std::path::PathBuf>) -> Self {
        let (tx, rx) = channel();

        // Load settings; a persisted endpoint override wins over environment.
        let settings = Settings::load();
        let config = if settings.endpoint.is_empty() {
            config
        } else {
            match Config::with_endpoint(&settings.endpoint) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Ignoring saved endpoint override: {}", e);
                    config
                }
            }
        };

        let mut controller = Controller::new();
        controller.set_style(settings.style);

        let mut studio = Self {
            config,
            settings,
            intake: ImageIntake::new(),
            source_texture: None,
            pending_texture: None,
            controller,
            rx,
            tx,
            share_available: export::share_available(),
            pending_export: None,
            meme_rect: None,
            status: None,
        };

        if let Some(path) = initial_image {
            if let Err(e) = studio.load_image(&path) {
                studio.status = Some(e.to_string());
            }
        }

        studio
    }

    /// Loads an image into the intake and stages its texture for upload.
    fn load_image(&mut self, path: &std::path::Path) -> Result<()> {
        self.intake.load(path)?;

        let image = self
            .intake
            .image()
            .ok_or_else(|| AppError::ui("Intake accepted a file but holds no image"))?;
        let buffer = image.to_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        let pixels = buffer.as_flat_samples();
        self.pending_texture = Some(egui::ColorImage::from_rgba_unmultiplied(
            size,
            pixels.as_slice(),
        ));
        // The old texture handle is dropped with the replacement upload.
        self.status = None;
        Ok(())
    }

    /// Opens the native file picker and loads the chosen image.
    fn pick_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file();

        // Cancelled picker is a silent no-op.
        if let Some(path) = picked {
            if let Err(e) = self.load_image(&path) {
                self.status = Some(e.to_string());
            }
        }
    }

    /// Submits a generation request to the meme service.
    ///
    /// Spawns a background thread to handle the async API call and reports
    /// the outcome back through the channel, tagged with this request's token.
    fn submit_request(&mut self) {
        let Some(reference) = self.intake.reference().map(str::to_owned) else {
            return;
        };
        let Some(token) = self.controller.begin_request(true) else {
            return;
        };

        // Save settings before making the request
        if let Err(e) = self.settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }

        let request = GenerationRequest::new(
            reference,
            self.controller.style(),
            self.controller.context().trim(),
        );
        let config = self.config.clone();
        let tx = self.tx.clone();

        // Spawn background thread for async work
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build();

            match runtime {
                Ok(rt) => {
                    rt.block_on(async {
                        let client = MemeClient::new(&config);
                        match client.generate(&request).await {
                            Ok(result) => {
                                let _ = tx.send(RequestEvent::Completed(token, result));
                            }
                            Err(e) => {
                                let _ = tx.send(RequestEvent::Failed(token, e.to_string()));
                            }
                        }
                    });
                }
                Err(e) => {
                    let _ = tx.send(RequestEvent::Failed(
                        token,
                        format!("Failed to create async runtime: {}", e),
                    ));
                }
            }
        });
    }

    /// Drains request events from background threads into the controller.
    fn process_request_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            if self.controller.handle_event(event) {
                ctx.request_repaint();
            }
        }
    }

    /// Requests a viewport screenshot for the given export action.
    fn begin_export(&mut self, ctx: &egui::Context, kind: ExportKind) {
        self.pending_export = Some(kind);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
    }

    /// Picks up an arrived screenshot and finishes any pending export.
    fn process_screenshot_events(&mut self, ctx: &egui::Context) {
        let screenshot: Option<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.events.iter().rev().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });

        let Some(frame) = screenshot else { return };
        let Some(kind) = self.pending_export.take() else {
            return;
        };

        let outcome = self.finish_export(kind, frame.as_ref(), ctx.pixels_per_point());
        match outcome {
            Ok(Some(message)) => self.status = Some(message),
            Ok(None) => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Crops the screenshot to the result pane and runs the export action.
    ///
    /// Returns a feedback message, or `None` when the user cancelled.
    fn finish_export(
        &self,
        kind: ExportKind,
        frame: &egui::ColorImage,
        pixels_per_point: f32,
    ) -> Result<Option<String>> {
        let region = self.meme_rect.ok_or(AppError::EmptyRegion)?;
        let full = raster::frame_to_image(frame)?;
        let meme = raster::crop_region(&full, region, pixels_per_point)?;

        match kind {
            ExportKind::Download => {
                let filename = self
                    .controller
                    .result()
                    .map(|r| r.download_filename())
                    .ok_or_else(|| AppError::ui("No result to export"))?;
                let picked = rfd::FileDialog::new()
                    .set_file_name(&filename)
                    .add_filter("PNG image", &["png"])
                    .save_file();
                match picked {
                    Some(path) => {
                        export::write_png(&meme, &path)?;
                        Ok(Some(format!("Saved {}", path.display())))
                    }
                    None => Ok(None),
                }
            }
            ExportKind::Share => {
                export::share_image(&meme)?;
                Ok(Some("Meme copied to clipboard".to_string()))
            }
        }
    }

    /// Renders the upload-and-controls column.
    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload Your Image");
        ui.add_space(6.0);

        if ui.button("📁 Choose image…").clicked() {
            self.pick_image();
        }
        ui.label(
            egui::RichText::new("PNG, JPG up to 10MB")
                .small()
                .color(egui::Color32::GRAY),
        );

        if let Some(texture) = &self.source_texture {
            ui.add_space(8.0);
            let max = egui::vec2(ui.available_width(), 180.0);
            ui.add(egui::Image::new(texture).max_size(max));
            if let Some(name) = self.intake.file_name() {
                ui.label(egui::RichText::new(name).small());
            }
        }

        ui.add_space(12.0);
        ui.label(egui::RichText::new("Meme Style").strong());
        let mut selected = self.controller.style();
        ui.horizontal_wrapped(|ui| {
            for style in MemeStyle::ALL {
                if ui
                    .selectable_label(selected == style, style.label())
                    .clicked()
                {
                    selected = style;
                }
            }
        });
        if selected != self.controller.style() {
            self.controller.set_style(selected);
            self.settings.style = selected;
        }

        ui.add_space(12.0);
        ui.label(egui::RichText::new("Context (Optional)").strong());
        ui.add(
            egui::TextEdit::singleline(self.controller.context_mut())
                .desired_width(f32::INFINITY)
                .hint_text("e.g., 'This is my Monday mood' or 'My cat being dramatic'"),
        );

        ui.add_space(12.0);
        let can_generate = self.controller.can_generate(self.intake.has_image());
        if self.controller.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("AI is creating magic...");
            });
        } else if ui
            .add_enabled(can_generate, egui::Button::new("⚡ Generate Meme"))
            .clicked()
        {
            self.submit_request();
        }
    }

    /// Renders the result column: meme pane, score, export actions, tags.
    fn render_result(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(result) = self.controller.result().cloned() else {
            self.meme_rect = None;
            return;
        };

        ui.horizontal(|ui| {
            ui.heading("Your AI Meme");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "⚡ {}% Viral Potential",
                        result.confidence_percent()
                    ))
                    .color(egui::Color32::from_rgb(80, 220, 120))
                    .strong(),
                );
            });
        });
        ui.add_space(6.0);

        self.meme_rect = self.draw_meme_pane(ui, &result);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("⬇ Download").clicked() {
                self.begin_export(ctx, ExportKind::Download);
            }
            // Share is disabled outright when the platform has no capability.
            if ui
                .add_enabled(self.share_available, egui::Button::new("📋 Share"))
                .on_disabled_hover_text("Sharing is not available on this platform")
                .clicked()
            {
                self.begin_export(ctx, ExportKind::Share);
            }
            let can_regenerate = self.controller.can_generate(self.intake.has_image());
            if ui
                .add_enabled(can_regenerate, egui::Button::new("🔄"))
                .on_hover_text("Regenerate")
                .clicked()
            {
                self.submit_request();
            }
        });

        if !result.similar.is_empty() {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Similar Viral Memes:").strong());
            ui.horizontal_wrapped(|ui| {
                for label in &result.similar {
                    ui.label(
                        egui::RichText::new(label)
                            .small()
                            .background_color(egui::Color32::from_gray(60)),
                    );
                }
            });
        }
    }

    /// Draws the captioned meme and returns the pane rect for rasterization.
    fn draw_meme_pane(
        &self,
        ui: &mut egui::Ui,
        result: &crate::types::GenerationResult,
    ) -> Option<egui::Rect> {
        let texture = self.source_texture.as_ref()?;

        let texture_size = texture.size_vec2();
        let width = ui.available_width().min(480.0);
        let height = width * texture_size.y / texture_size.x;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());

        let painter = ui.painter();
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let font = egui::FontId::proportional((height * 0.09).clamp(18.0, 36.0));
        if !result.top_text.is_empty() {
            draw_caption(
                painter,
                egui::pos2(rect.center().x, rect.top() + font.size * 0.8),
                &result.top_text.to_uppercase(),
                font.clone(),
            );
        }
        if !result.bottom_text.is_empty() {
            draw_caption(
                painter,
                egui::pos2(rect.center().x, rect.bottom() - font.size * 0.8),
                &result.bottom_text.to_uppercase(),
                font,
            );
        }

        Some(rect)
    }
}

/// Draws meme-style text: white fill over a black offset outline.
fn draw_caption(painter: &egui::Painter, center: egui::Pos2, text: &str, font: egui::FontId) {
    let outline = 2.0;
    for offset in [
        egui::vec2(-outline, 0.0),
        egui::vec2(outline, 0.0),
        egui::vec2(0.0, -outline),
        egui::vec2(0.0, outline),
    ] {
        painter.text(
            center + offset,
            egui::Align2::CENTER_CENTER,
            text,
            font.clone(),
            egui::Color32::BLACK,
        );
    }
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        text,
        font,
        egui::Color32::WHITE,
    );
}

impl eframe::App for MemeStudio {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Enforce dark mode
        ctx.set_visuals(egui::Visuals::dark());

        // Process any pending background events
        self.process_request_events(ctx);
        self.process_screenshot_events(ctx);

        // Upload texture using pre-converted data
        if let Some(color_image) = self.pending_texture.take() {
            self.source_texture = Some(ctx.load_texture(
                "meme-source",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }

        // Keep polling while a request or screenshot is outstanding; channel
        // sends alone do not wake the event loop.
        if self.controller.is_loading() || self.pending_export.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("AI Meme Generator").size(28.0));
                ui.label("Upload any image → Get viral-worthy memes instantly ⚡");
            });
            ui.add_space(8.0);

            // Dismissible error banner for request failures
            if let Some(error) = self.controller.error().map(str::to_owned) {
                let mut dismissed = false;
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&error).color(egui::Color32::RED));
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
                if dismissed {
                    self.controller.dismiss_error();
                }
                ui.add_space(4.0);
            }

            if let Some(status) = self.status.clone() {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(status).color(egui::Color32::LIGHT_GRAY));
                    if ui.small_button("✕").clicked() {
                        self.status = None;
                    }
                });
                ui.add_space(4.0);
            }

            ui.columns(2, |columns| {
                self.render_controls(&mut columns[0]);
                let ctx = columns[1].ctx().clone();
                self.render_result(&mut columns[1], &ctx);
            });
        });
    }
}

/// Launches the meme studio window and returns when the user closes it.
///
/// # Arguments
/// * `config` - Application configuration
/// * `initial_image` - Optional image file to preload into the intake
pub fn run(config: Config, initial_image: Option<std::path::PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([980.0, 680.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MemeForge",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(MemeStudio::new(config, initial_image)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_without_result_reports_missing_result() {
        let config = Config::with_endpoint("http://localhost:8686/graphql").unwrap();
        let mut studio = MemeStudio::new(config, None);
        studio.meme_rect = Some(egui::Rect::from_min_size(
            egui::pos2(0.0, 0.0),
            egui::vec2(10.0, 10.0),
        ));

        let frame = egui::ColorImage::from_rgba_unmultiplied([20, 20], &[0u8; 20 * 20 * 4]);
        let outcome = studio.finish_export(ExportKind::Download, &frame, 1.0);

        // A missing result must not masquerade as an empty export region.
        assert!(matches!(outcome, Err(AppError::Ui(_))));
    }

    #[test]
    fn export_without_region_is_an_empty_region_error() {
        let config = Config::with_endpoint("http://localhost:8686/graphql").unwrap();
        let studio = MemeStudio::new(config, None);

        let frame = egui::ColorImage::from_rgba_unmultiplied([20, 20], &[0u8; 20 * 20 * 4]);
        let outcome = studio.finish_export(ExportKind::Share, &frame, 1.0);
        assert!(matches!(outcome, Err(AppError::EmptyRegion)));
    }
}
