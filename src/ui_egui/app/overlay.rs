use std::sync::Arc;

use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontFamily, FontId, Galley, Rect, ViewportClass, ViewportCommand, ViewportId};

use super::CountdownApp;
use crate::models::settings::{BackgroundImage, RgbColor, Settings, WindowBounds};
use crate::services::appearance::{
    fit_texture_side, AppearanceRenderer, BackgroundFill, OverlayStyle, PixelRect, SurfaceSize,
};

const OVERLAY_TITLE: &str = "Countdown";

pub(super) fn overlay_viewport_id() -> ViewportId {
    ViewportId::from_hash_of("countdown_overlay")
}

/// GPU copy of the current background picture.
struct BackgroundTexture {
    source: Arc<BackgroundImage>,
    handle: egui::TextureHandle,
}

/// Window state of the overlay viewport that is not part of [`Settings`].
pub struct OverlayState {
    /// Bounds and fullscreen flag the viewport was first opened with.
    opened_with: (WindowBounds, bool),
    applied_fullscreen: bool,
    texture: Option<BackgroundTexture>,
}

impl OverlayState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            opened_with: (settings.bounds, settings.fullscreen),
            applied_fullscreen: settings.fullscreen,
            texture: None,
        }
    }

    /// Kept identical across frames; later changes go out as viewport
    /// commands.
    fn viewport_builder(&self) -> egui::ViewportBuilder {
        let (bounds, fullscreen) = self.opened_with;
        egui::ViewportBuilder::default()
            .with_title(OVERLAY_TITLE)
            .with_position(egui::pos2(bounds.x as f32, bounds.y as f32))
            .with_inner_size(egui::vec2(
                bounds.width.max(1) as f32,
                bounds.height.max(1) as f32,
            ))
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_fullscreen(fullscreen)
    }

    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        image: &Arc<BackgroundImage>,
    ) -> Option<egui::TextureId> {
        if let Some(cached) = &self.texture {
            if Arc::ptr_eq(&cached.source, image) {
                return Some(cached.handle.id());
            }
        }

        let max_side = ctx.input(|i| i.max_texture_side);
        let Some(fitted) = fit_texture_side(image, max_side) else {
            log::warn!(
                "Background image buffer does not match {}x{}, not drawing it",
                image.width,
                image.height
            );
            self.texture = None;
            return None;
        };
        let pixels = egui::ColorImage::from_rgba_unmultiplied(
            [fitted.width as usize, fitted.height as usize],
            &fitted.rgba,
        );
        let handle = ctx.load_texture("overlay_background", pixels, egui::TextureOptions::LINEAR);
        log::debug!("Uploaded background texture {}x{}", fitted.width, fitted.height);
        let id = handle.id();
        self.texture = Some(BackgroundTexture {
            source: Arc::clone(image),
            handle,
        });
        Some(id)
    }
}

impl CountdownApp {
    pub(super) fn render_overlay(&mut self, ctx: &egui::Context) {
        let viewport_id = overlay_viewport_id();
        self.sync_overlay_window(ctx, viewport_id);

        let texture = match &self.renderer.style().background {
            BackgroundFill::Image(image) => {
                let image = Arc::clone(image);
                self.overlay.texture_for(ctx, &image)
            }
            _ => {
                self.overlay.texture = None;
                None
            }
        };

        let builder = self.overlay.viewport_builder();
        let renderer = &mut self.renderer;
        let close_requested = ctx.show_viewport_immediate(viewport_id, builder, |child_ctx, class| {
            match class {
                ViewportClass::Embedded => {
                    egui::Window::new(OVERLAY_TITLE)
                        .default_size([640.0, 360.0])
                        .show(child_ctx, |ui| paint_overlay(ui, renderer, texture));
                }
                _ => {
                    egui::CentralPanel::default()
                        .frame(egui::Frame::none())
                        .show(child_ctx, |ui| paint_overlay(ui, renderer, texture));
                }
            }
            child_ctx.input(|input| input.viewport().close_requested())
        });

        if close_requested {
            log::info!("Overlay window closed, shutting down");
            self.state.overlay_closed = true;
            ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::Close);
        }
    }

    /// Sends fullscreen and placement changes made in the control window.
    fn sync_overlay_window(&mut self, ctx: &egui::Context, viewport_id: ViewportId) {
        let fullscreen = self.settings.fullscreen;
        if self.overlay.applied_fullscreen == fullscreen {
            return;
        }
        log::info!("Overlay fullscreen: {}", fullscreen);
        ctx.send_viewport_cmd_to(viewport_id, ViewportCommand::Fullscreen(fullscreen));
        if !fullscreen {
            let bounds = self.settings.bounds;
            ctx.send_viewport_cmd_to(
                viewport_id,
                ViewportCommand::OuterPosition(egui::pos2(bounds.x as f32, bounds.y as f32)),
            );
            ctx.send_viewport_cmd_to(
                viewport_id,
                ViewportCommand::InnerSize(egui::vec2(
                    bounds.width.max(1) as f32,
                    bounds.height.max(1) as f32,
                )),
            );
        }
        self.overlay.applied_fullscreen = fullscreen;
    }
}

fn paint_overlay(ui: &egui::Ui, renderer: &mut AppearanceRenderer, texture: Option<egui::TextureId>) {
    let surface = ui.max_rect();
    let galley = layout_text(ui.ctx(), renderer.style(), renderer.text());
    let measured = galley.size();
    let frame = renderer.compose(
        SurfaceSize::new(surface.width(), surface.height()),
        SurfaceSize::new(measured.x.ceil(), measured.y.ceil()),
    );

    let painter = ui.painter();
    match frame.background {
        BackgroundFill::Solid(color) => {
            painter.rect_filled(surface, 0.0, to_color32(*color));
        }
        BackgroundFill::Image(_) => {
            if let Some(texture) = texture {
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture, surface, uv, Color32::WHITE);
            }
        }
        BackgroundFill::None => {}
    }

    if frame.text.is_empty() {
        return;
    }

    let clip = to_screen_rect(surface, frame.placement.clip).intersect(surface);
    let painter = painter.with_clip_rect(clip);
    let position = surface.min + egui::vec2(frame.placement.label.x, frame.placement.label.y);
    let color = to_color32(frame.style.text_color);

    // Faux bold: egui ships one weight per family
    if frame.style.font.style.is_bold() {
        let offset = (frame.style.pixel_size / 40.0).max(1.0);
        painter.galley(position + egui::vec2(offset, 0.0), Arc::clone(&galley), color);
    }
    painter.galley(position, galley, color);
}

fn layout_text(ctx: &egui::Context, style: &OverlayStyle, text: &str) -> Arc<Galley> {
    let mut job = LayoutJob::default();
    job.append(
        text,
        0.0,
        TextFormat {
            font_id: FontId::new(style.pixel_size, font_family_for(&style.font.family)),
            color: to_color32(style.text_color),
            italics: style.font.style.is_italic(),
            ..Default::default()
        },
    );
    ctx.fonts(|fonts| fonts.layout_job(job))
}

/// egui only bundles a proportional and a monospace family.
pub(super) fn font_family_for(name: &str) -> FontFamily {
    match name.to_ascii_lowercase().as_str() {
        "monospace" | "monospaced" | "dialoginput" => FontFamily::Monospace,
        _ => FontFamily::Proportional,
    }
}

pub(super) fn to_color32(color: RgbColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn to_screen_rect(surface: Rect, rect: PixelRect) -> Rect {
    Rect::from_min_size(
        surface.min + egui::vec2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}
