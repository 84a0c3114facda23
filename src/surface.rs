//! Rendering surface: where frames are composed and shown.
//!
//! [`FrameBuffer`] does all drawing in software on packed `0x00RRGGBB`
//! pixels (the layout minifb presents). A [`Surface`] adds `present`, which
//! for a window pushes the buffer to the screen.

use crate::Color;
use crate::error::Result;
use crate::tint::TintedImage;

/// What the animation loop draws onto.
pub trait Surface {
    /// Pixel width and height.
    fn size(&self) -> (usize, usize);

    /// Fill everything with `color`.
    fn clear(&mut self, color: Color);

    /// Alpha-blend `image` with its top-left corner at `(x, y)`. Parts
    /// outside the surface are clipped.
    fn composite(&mut self, image: &TintedImage, x: i32, y: i32);

    /// Show the composed frame.
    fn present(&mut self) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// Row-major, each entry `0x00RRGGBB`.
    pub pixels: Vec<u32>,
    /// Number of frames presented so far.
    pub presented: u64,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
            presented: 0,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_u32());
    }

    fn composite(&mut self, image: &TintedImage, x: i32, y: i32) {
        let (fb_w, fb_h) = (self.width as i64, self.height as i64);
        let src = image.pixels();

        // Visible rows/columns of the source, in source coordinates.
        let x0 = (-(x as i64)).max(0);
        let y0 = (-(y as i64)).max(0);
        let x1 = (fb_w - x as i64).min(src.width() as i64);
        let y1 = (fb_h - y as i64).min(src.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for sy in y0..y1 {
            let row = ((y as i64 + sy) * fb_w) as usize;
            for sx in x0..x1 {
                let px = src.get_pixel(sx as u32, sy as u32);
                let alpha = px[3];
                if alpha == 0 {
                    continue;
                }
                let idx = row + (x as i64 + sx) as usize;
                self.pixels[idx] = blend(self.pixels[idx], [px[0], px[1], px[2]], alpha);
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Source-over blend of an RGB color with coverage `alpha` onto `dst`.
#[inline]
fn blend(dst: u32, src: [u8; 3], alpha: u8) -> u32 {
    if alpha == 255 {
        return Color::new(src[0], src[1], src[2]).to_u32();
    }
    let a = alpha as u32;
    let mix = |d: u32, s: u8| (s as u32 * a + d * (255 - a) + 127) / 255;

    let r = mix((dst >> 16) & 0xFF, src[0]);
    let g = mix((dst >> 8) & 0xFF, src[1]);
    let b = mix(dst & 0xFF, src[2]);
    (r << 16) | (g << 8) | b
}
