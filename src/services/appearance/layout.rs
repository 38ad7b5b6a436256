//! Label placement on the overlay surface.
//!
//! The label sits in a single cell covering the whole surface, shrunk by the
//! margins on every side. It keeps its natural size and is pushed towards the
//! anchor; when it does not fit on an axis it starts at the inset edge and is
//! clipped to the inset area.

use crate::models::settings::{Alignment, HorizontalAnchor, VerticalAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelPlacement {
    /// Where the label is drawn, in surface coordinates.
    pub label: PixelRect,
    /// The surface minus the margins; drawing is clipped to it.
    pub clip: PixelRect,
    pub clipped: bool,
}

/// Places a label of `label` size on `surface` according to `alignment`.
pub fn place_label(
    surface: SurfaceSize,
    label: SurfaceSize,
    alignment: Alignment,
    margin_x: i32,
    margin_y: i32,
) -> LabelPlacement {
    let inset_x = margin_x.max(0) as f32;
    let inset_y = margin_y.max(0) as f32;
    let clip = PixelRect::new(
        inset_x,
        inset_y,
        (surface.width - 2.0 * inset_x).max(0.0),
        (surface.height - 2.0 * inset_y).max(0.0),
    );

    let free_x = clip.width - label.width;
    let free_y = clip.height - label.height;

    let x = if free_x <= 0.0 {
        clip.x
    } else {
        match alignment.horizontal() {
            HorizontalAnchor::Left => clip.x,
            HorizontalAnchor::Center => clip.x + free_x / 2.0,
            HorizontalAnchor::Right => clip.right() - label.width,
        }
    };
    let y = if free_y <= 0.0 {
        clip.y
    } else {
        match alignment.vertical() {
            VerticalAnchor::Top => clip.y,
            VerticalAnchor::Middle => clip.y + free_y / 2.0,
            VerticalAnchor::Bottom => clip.bottom() - label.height,
        }
    };

    LabelPlacement {
        label: PixelRect::new(x, y, label.width, label.height),
        clip,
        clipped: free_x < 0.0 || free_y < 0.0,
    }
}
