//! Monitor enumeration for placing the overlay.
//!
//! On Windows the Win32 `EnumDisplayMonitors` / `GetMonitorInfoW` APIs give
//! the full rectangle of every connected monitor, in enumeration order.
//!
//! Elsewhere a single monitor is derived from egui's `monitor_size`
//! (or a 1920×1080 default).

use crate::models::settings::WindowBounds;

/// Used when no monitor information is available at all.
pub const FALLBACK_SCREEN: WindowBounds = WindowBounds::new(0, 0, 1920, 1080);

// ── Windows implementation ──────────────────────────────────────────────────

#[cfg(target_os = "windows")]
mod platform {
    use crate::models::settings::WindowBounds;

    use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
    };

    pub fn enumerate_monitors() -> Vec<WindowBounds> {
        let mut monitors: Vec<WindowBounds> = Vec::new();

        unsafe {
            let monitors_ptr = &mut monitors as *mut Vec<WindowBounds> as isize;
            let _ = EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(monitors_ptr),
            );
        }

        if monitors.is_empty() {
            log::warn!("Win32 EnumDisplayMonitors returned no monitors");
        }
        monitors
    }

    unsafe extern "system" fn monitor_enum_proc(
        hmonitor: HMONITOR,
        _hdc: HDC,
        _rect: *mut RECT,
        lparam: LPARAM,
    ) -> BOOL {
        let monitors = &mut *(lparam.0 as *mut Vec<WindowBounds>);

        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };

        if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
            // The overlay covers the taskbar too, so use rcMonitor
            let area = info.rcMonitor;
            monitors.push(WindowBounds::new(
                area.left,
                area.top,
                area.right - area.left,
                area.bottom - area.top,
            ));
        }

        BOOL(1) // continue enumeration
    }
}

// ── Non-Windows fallback ────────────────────────────────────────────────────

#[cfg(not(target_os = "windows"))]
mod platform {
    use crate::models::settings::WindowBounds;

    /// No enumeration without extra dependencies; callers fall back to
    /// egui's `monitor_size`.
    pub fn enumerate_monitors() -> Vec<WindowBounds> {
        Vec::new()
    }
}

pub use platform::enumerate_monitors;

/// Real monitor rects, or a single monitor of `egui_monitor_size` at the
/// origin when the platform reports none. Never empty.
pub fn get_available_monitors(egui_monitor_size: Option<(f32, f32)>) -> Vec<WindowBounds> {
    let mut monitors = enumerate_monitors();

    if monitors.is_empty() {
        let bounds = match egui_monitor_size {
            Some((w, h)) if w >= 1.0 && h >= 1.0 => {
                WindowBounds::new(0, 0, w.round() as i32, h.round() as i32)
            }
            _ => FALLBACK_SCREEN,
        };
        monitors.push(bounds);
    }

    monitors
}

/// Bounds of the last enumerated monitor, which is where the overlay opens
/// on first start.
pub fn default_screen_bounds(monitors: &[WindowBounds]) -> WindowBounds {
    monitors.last().copied().unwrap_or(FALLBACK_SCREEN)
}

fn overlap(a: &WindowBounds, b: &WindowBounds) -> (i32, i32) {
    let left = a.x.max(b.x);
    let right = (a.x + a.width).min(b.x + b.width);
    let top = a.y.max(b.y);
    let bottom = (a.y + a.height).min(b.y + b.height);
    (right - left, bottom - top)
}

/// True when `bounds` overlaps some monitor by at least `min_visible`
/// pixels in both directions.
pub fn is_visible_on_any_monitor(
    monitors: &[WindowBounds],
    bounds: &WindowBounds,
    min_visible: (i32, i32),
) -> bool {
    monitors.iter().any(|m| {
        let (horizontal, vertical) = overlap(m, bounds);
        horizontal >= min_visible.0 && vertical >= min_visible.1
    })
}

/// The monitor whose centre is closest to `(x, y)`.
pub fn nearest_monitor(monitors: &[WindowBounds], x: i32, y: i32) -> Option<&WindowBounds> {
    monitors.iter().min_by_key(|m| {
        let dx = i64::from(m.x + m.width / 2 - x);
        let dy = i64::from(m.y + m.height / 2 - y);
        dx * dx + dy * dy
    })
}

/// Shrinks `bounds` to fit on `monitor` and moves it fully onto it.
pub fn fit_onto(bounds: &WindowBounds, monitor: &WindowBounds) -> WindowBounds {
    let width = bounds.width.clamp(1, monitor.width.max(1));
    let height = bounds.height.clamp(1, monitor.height.max(1));
    WindowBounds::new(
        bounds.x.clamp(monitor.x, (monitor.x + monitor.width - width).max(monitor.x)),
        bounds.y.clamp(monitor.y, (monitor.y + monitor.height - height).max(monitor.y)),
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> WindowBounds {
        WindowBounds::new(x, y, w, h)
    }

    #[test]
    fn overlap_fully_inside() {
        let monitors = [rect(0, 0, 1920, 1080)];
        assert!(is_visible_on_any_monitor(&monitors, &rect(100, 100, 800, 600), (200, 100)));
    }

    #[test]
    fn overlap_partial_right() {
        // 200px left on the monitor
        let monitors = [rect(0, 0, 1920, 1080)];
        assert!(is_visible_on_any_monitor(&monitors, &rect(1720, 100, 800, 600), (200, 100)));
    }

    #[test]
    fn no_overlap_off_left() {
        let monitors = [rect(0, 0, 1920, 1080)];
        assert!(!is_visible_on_any_monitor(&monitors, &rect(-900, 100, 800, 600), (200, 100)));
    }

    #[test]
    fn visible_on_second_monitor() {
        let monitors = [rect(0, 0, 1920, 1080), rect(1920, 0, 2560, 1440)];
        assert!(is_visible_on_any_monitor(&monitors, &rect(2000, 200, 800, 600), (200, 100)));
    }

    #[test]
    fn nearest_monitor_selects_closest() {
        let monitors = [rect(0, 0, 1920, 1080), rect(1920, 0, 2560, 1440)];
        assert_eq!(nearest_monitor(&monitors, 3000, 500).map(|m| m.x), Some(1920));
        assert!(nearest_monitor(&[], 0, 0).is_none());
    }

    #[test]
    fn default_bounds_use_last_monitor() {
        let monitors = [rect(0, 0, 1920, 1080), rect(-1280, 0, 1280, 1024)];
        assert_eq!(default_screen_bounds(&monitors), rect(-1280, 0, 1280, 1024));
        assert_eq!(default_screen_bounds(&[]), FALLBACK_SCREEN);
    }

    #[test]
    fn fit_onto_pulls_window_back_on_screen() {
        let monitor = rect(0, 0, 1920, 1080);
        assert_eq!(fit_onto(&rect(5000, -300, 800, 600), &monitor), rect(1120, 0, 800, 600));
        assert_eq!(fit_onto(&rect(10, 10, 4000, 3000), &monitor), rect(0, 0, 1920, 1080));
    }

    #[test]
    #[cfg(not(target_os = "windows"))]
    fn fallback_uses_egui_monitor_size() {
        assert_eq!(get_available_monitors(Some((2560.0, 1440.0))), vec![rect(0, 0, 2560, 1440)]);
        assert_eq!(get_available_monitors(None), vec![FALLBACK_SCREEN]);
    }
}
