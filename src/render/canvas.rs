//! Canvas composition
//!
//! Draws the static chrome (buttons, optional transaction summary) and
//! the final ink layer into fresh in-memory bitmaps. Each call produces
//! a new frame; nothing here is shared across sessions.

use crate::capture::geometry::{ButtonLayout, Point, Rect, BUTTON_MARGIN};
use crate::capture::strokes::StrokeRecorder;
use crate::render::text::{draw_text, text_width, LabelFont};
use crate::render::{ButtonLabels, TransferInformation};
use image::{Rgb, RgbImage};
use rusttype::Scale;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);

const BUTTON_TOP: Rgb<u8> = Rgb([236, 236, 236]);
const BUTTON_BOTTOM: Rgb<u8> = Rgb([168, 168, 168]);
const BUTTON_BORDER: Rgb<u8> = Rgb([64, 64, 64]);
const LABEL_COLOR: Rgb<u8> = Rgb([16, 16, 16]);
const OVERLAY_COLOR: Rgb<u8> = Rgb([32, 32, 32]);

const LABEL_SCALE: f32 = 18.0;
const OVERLAY_TITLE_SCALE: f32 = 20.0;
const OVERLAY_LINE_SCALE: f32 = 15.0;

/// Compose the static UI: white background, optional transaction
/// summary, and the three gradient buttons with centered labels.
pub fn compose_chrome(
    layout: &ButtonLayout,
    width: u32,
    height: u32,
    overlay: Option<&TransferInformation>,
    labels: &ButtonLabels,
    font: &LabelFont,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    if let Some(info) = overlay {
        draw_overlay(&mut img, layout, info, font);
    }

    draw_button(&mut img, layout.cancel, &labels.cancel, font);
    draw_button(&mut img, layout.clear, &labels.clear, font);
    draw_button(&mut img, layout.accept, &labels.accept, font);

    img
}

/// Compose the final signature image: ink strokes over a plain white
/// canvas, no buttons.
pub fn compose_ink(width: u32, height: u32, recorder: &StrokeRecorder) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    for stroke in recorder.strokes() {
        match stroke.as_slice() {
            [] => {}
            [only] => put_pixel_checked(&mut img, only.x as i64, only.y as i64, INK),
            points => {
                for pair in points.windows(2) {
                    draw_line(&mut img, pair[0], pair[1], INK);
                }
            }
        }
    }

    img
}

fn draw_overlay(img: &mut RgbImage, layout: &ButtonLayout, info: &TransferInformation, font: &LabelFont) {
    let Some(font) = font.get() else { return };

    let x = BUTTON_MARGIN as i32;
    let mut y = BUTTON_MARGIN as i32;
    // Keep the overlay out of the button strip
    let limit = layout.cancel.y.saturating_sub(BUTTON_MARGIN) as i32;

    if let Some(title) = &info.title {
        if y + OVERLAY_TITLE_SCALE as i32 > limit {
            return;
        }
        draw_text(img, x, y, title, font, Scale::uniform(OVERLAY_TITLE_SCALE), OVERLAY_COLOR);
        y += (OVERLAY_TITLE_SCALE * 1.4) as i32;
    }

    for line in &info.lines {
        if y + OVERLAY_LINE_SCALE as i32 > limit {
            break;
        }
        draw_text(img, x, y, line, font, Scale::uniform(OVERLAY_LINE_SCALE), OVERLAY_COLOR);
        y += (OVERLAY_LINE_SCALE * 1.4) as i32;
    }
}

fn draw_button(img: &mut RgbImage, rect: Rect, label: &str, font: &LabelFont) {
    fill_vertical_gradient(img, rect, BUTTON_TOP, BUTTON_BOTTOM);
    stroke_rect(img, rect, BUTTON_BORDER);

    if let Some(font) = font.get() {
        let scale = Scale::uniform(LABEL_SCALE);
        let w = text_width(font, label, scale);
        let x = rect.x as i32 + ((rect.width as f32 - w) / 2.0) as i32;
        let y = rect.y as i32 + ((rect.height as f32 - LABEL_SCALE) / 2.0) as i32;
        draw_text(img, x, y, label, font, scale, LABEL_COLOR);
    }
}

fn fill_vertical_gradient(img: &mut RgbImage, rect: Rect, top: Rgb<u8>, bottom: Rgb<u8>) {
    let span = rect.height.max(2) - 1;
    for row in 0..rect.height {
        let t = row as f32 / span as f32;
        let mut color = Rgb([0u8; 3]);
        for c in 0..3 {
            let a = f32::from(top.0[c]);
            let b = f32::from(bottom.0[c]);
            color.0[c] = (a + (b - a) * t) as u8;
        }
        for col in 0..rect.width {
            put_pixel_checked(img, (rect.x + col) as i64, (rect.y + row) as i64, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    for col in 0..rect.width {
        put_pixel_checked(img, (rect.x + col) as i64, rect.y as i64, color);
        put_pixel_checked(img, (rect.x + col) as i64, (rect.bottom() - 1) as i64, color);
    }
    for row in 0..rect.height {
        put_pixel_checked(img, rect.x as i64, (rect.y + row) as i64, color);
        put_pixel_checked(img, (rect.right() - 1) as i64, (rect.y + row) as i64, color);
    }
}

/// Bresenham line between two screen points
fn draw_line(img: &mut RgbImage, from: Point, to: Point, color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel_checked(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn put_pixel_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    img.put_pixel(x as u32, y as u32, color);
}
