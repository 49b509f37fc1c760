//! Overlay primitives for annotated output images.
//!
//! Shapes go through `imageproc::drawing`. Labels use a small built-in 5x7
//! bitmap font so no font file has to ship with the binary; it covers digits
//! and the letters used in marker labels, other characters render as a box.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

/// Pixel scale applied to every glyph dot.
pub const LABEL_SCALE: i32 = 2;

/// Draws a filled circle, clipped to the image.
pub fn filled_circle(image: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>) {
    draw_filled_circle_mut(image, center, radius, color);
}

/// Draws a line segment roughly two pixels wide.
pub fn thick_line(image: &mut RgbImage, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
    for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
        draw_line_segment_mut(
            image,
            (from.0 + dx, from.1 + dy),
            (to.0 + dx, to.1 + dy),
            color,
        );
    }
}

/// Draws `text` with its bottom-left corner at `origin`.
pub fn label(image: &mut RgbImage, origin: (i32, i32), text: &str, color: Rgb<u8>) {
    let top = origin.1 - GLYPH_HEIGHT * LABEL_SCALE;
    for (i, ch) in text.chars().enumerate() {
        let left = origin.0 + i as i32 * GLYPH_ADVANCE * LABEL_SCALE;
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x = left + col * LABEL_SCALE;
                let y = top + row as i32 * LABEL_SCALE;
                fill_block(image, x, y, LABEL_SCALE, color);
            }
        }
    }
}

fn fill_block(image: &mut RgbImage, x0: i32, y0: i32, size: i32, color: Rgb<u8>) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    for y in y0.max(0)..(y0 + size).min(h) {
        for x in x0.max(0)..(x0 + size).min(w) {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ' ' => [0x00; 7],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}
