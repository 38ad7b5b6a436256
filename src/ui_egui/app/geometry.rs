use super::overlay::overlay_viewport_id;
use super::CountdownApp;
use crate::models::settings::WindowBounds;
use crate::utils::monitors;

/// Minimum number of pixels the overlay must overlap a monitor to count as "visible"
const MIN_VISIBLE_X: i32 = 200;
const MIN_VISIBLE_Y: i32 = 100;

const MIN_OVERLAY_SIZE: i32 = 40;

impl CountdownApp {
    /// Moves persisted overlay bounds back onto a monitor. Called on the
    /// first frame, once egui knows the monitor size.
    pub(super) fn sanitize_overlay_bounds(&mut self, ctx: &egui::Context) {
        let monitors = get_real_monitors(ctx);
        let bounds = self.settings.bounds;

        if monitors::is_visible_on_any_monitor(&monitors, &bounds, (MIN_VISIBLE_X, MIN_VISIBLE_Y)) {
            log::debug!("Persisted overlay bounds are visible on a monitor: {:?}", bounds);
            return;
        }

        let centre_x = bounds.x + bounds.width / 2;
        let centre_y = bounds.y + bounds.height / 2;
        if let Some(nearest) = monitors::nearest_monitor(&monitors, centre_x, centre_y) {
            let fitted = monitors::fit_onto(&bounds, nearest);
            log::info!(
                "Overlay bounds {:?} are not visible on any monitor; moved onto {:?} -> {:?}",
                bounds,
                nearest,
                fitted
            );
            self.settings.bounds = fitted;
        }
    }

    /// Follows the overlay window while it is not fullscreen so the saved
    /// bounds match what the user arranged.
    pub(super) fn capture_overlay_bounds(&mut self, ctx: &egui::Context) {
        if self.settings.fullscreen {
            return;
        }
        let Some(info) = viewport_info(ctx, overlay_viewport_id()) else {
            return;
        };
        if info.fullscreen == Some(true) {
            return;
        }
        if let Some(bounds) = bounds_from_viewport_info(&info) {
            if is_plausible(&bounds) && bounds_changed(self.settings.bounds, bounds) {
                log::debug!("Captured overlay bounds: {:?}", bounds);
                self.settings.bounds = bounds;
            }
        }
    }
}

pub(super) fn viewport_info(
    ctx: &egui::Context,
    viewport_id: egui::ViewportId,
) -> Option<egui::ViewportInfo> {
    ctx.input(|input| input.raw.viewports.get(&viewport_id).cloned())
}

pub(super) fn bounds_from_viewport_info(info: &egui::ViewportInfo) -> Option<WindowBounds> {
    let inner = info.inner_rect?;
    let (outer_left, outer_top) = info
        .outer_rect
        .map(|outer| (outer.left(), outer.top()))
        .unwrap_or((inner.left(), inner.top()));

    Some(WindowBounds::new(
        outer_left.round() as i32,
        outer_top.round() as i32,
        inner.width().round() as i32,
        inner.height().round() as i32,
    ))
}

pub(super) fn bounds_changed(a: WindowBounds, b: WindowBounds) -> bool {
    (a.x - b.x).abs() > 2
        || (a.y - b.y).abs() > 2
        || (a.width - b.width).abs() > 1
        || (a.height - b.height).abs() > 1
}

fn is_plausible(bounds: &WindowBounds) -> bool {
    bounds.width >= MIN_OVERLAY_SIZE && bounds.height >= MIN_OVERLAY_SIZE
}

/// Get real monitor rectangles, using the Win32 API on Windows and falling
/// back to egui's `monitor_size` on other platforms.
pub(super) fn get_real_monitors(ctx: &egui::Context) -> Vec<WindowBounds> {
    let egui_size = ctx.input(|input| {
        input
            .raw
            .viewports
            .values()
            .filter_map(|info| info.monitor_size)
            .next()
            .map(|s| (s.x, s.y))
    });

    let monitors = monitors::get_available_monitors(egui_size);
    log::debug!("Detected {} monitor(s): {:?}", monitors.len(), monitors);
    monitors
}
