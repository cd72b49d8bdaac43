//! Device pixel encoding
//!
//! The tablet display takes uncompressed 3-byte-per-pixel frames in
//! BGR order, row-major, top to bottom. A channel-order mismatch does
//! not fail; it shows up as shifted colors on the device, so the order
//! here must match the panel exactly.

use image::RgbImage;

/// Convert a composed canvas into the device's raw pixel format.
///
/// The output is exactly `width * height * 3` bytes.
pub fn encode_device_pixels(img: &RgbImage) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let mut out = Vec::with_capacity((width * height * 3) as usize);

    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        out.push(b);
        out.push(g);
        out.push(r);
    }

    out
}
