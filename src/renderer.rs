use std::convert::Infallible;

use crate::{
    camera::Camera,
    raycast::{self, RayHit, Side},
    world::{GridMap, Material},
};

/// Smallest depth used for projection; a camera pressed against a wall
/// would otherwise divide by zero.
const MIN_DEPTH: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn halved(self) -> Self {
        Self::new(self.r / 2, self.g / 2, self.b / 2)
    }

    #[inline]
    pub fn pack(self) -> u32 {
        // 0RGB, the layout softbuffer expects
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }
}

/// Drawing capabilities the renderer needs from the platform.
pub trait Surface {
    type Error;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Fills the upper half with `ceiling` and the lower half with `floor`.
    fn clear(&mut self, ceiling: Rgb, floor: Rgb);
    /// Paints rows `y_start..=y_end` of column `x`.
    fn draw_vertical_line(&mut self, x: usize, y_start: usize, y_end: usize, color: Rgb);
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// A vertical wall slice ready to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    pub draw_start: usize,
    pub draw_end: usize,
    pub color: Rgb,
}

/// Projected wall height in pixels; halves when the depth doubles.
#[inline]
pub fn line_height(perp_distance: f64, screen_height: usize) -> i64 {
    (screen_height as f64 / perp_distance.max(MIN_DEPTH)) as i64
}

pub fn wall_color(hit: &RayHit) -> Rgb {
    let base = Material::from_code(hit.cell)
        .unwrap_or(Material::Fallback)
        .color();
    match hit.side {
        Side::X => base,
        Side::Y => base.halved(),
    }
}

/// Turns a hit into a strip centred on the horizon and clamped to the screen.
pub fn project(hit: &RayHit, screen_height: usize) -> Strip {
    let h = screen_height as i64;
    let height = line_height(hit.perp_distance, screen_height);
    let draw_start = (h / 2 - height / 2).max(0);
    let draw_end = (h / 2 + height / 2).min(h - 1);
    Strip {
        draw_start: draw_start as usize,
        draw_end: draw_end as usize,
        color: wall_color(hit),
    }
}

/// Clears the surface, then casts and draws one strip per column.
pub fn render_frame<S: Surface>(
    surface: &mut S,
    map: &GridMap,
    camera: &Camera,
    ceiling: Rgb,
    floor: Rgb,
) {
    let (width, height) = (surface.width(), surface.height());
    surface.clear(ceiling, floor);
    if width == 0 || height == 0 {
        return;
    }

    for (x, hit) in raycast::cast_frame(map, camera, width).iter().enumerate() {
        let strip = project(hit, height);
        surface.draw_vertical_line(x, strip.draw_start, strip.draw_end, strip.color);
    }
}

/// CPU framebuffer of packed 0RGB pixels, row-major.
pub struct FrameBuffer {
    pub pixels: Vec<u32>,
    width: usize,
    height: usize,
    frames_presented: u64,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
            frames_presented: 0,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[cfg(test)]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for FrameBuffer {
    type Error = Infallible;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self, ceiling: Rgb, floor: Rgb) {
        let mid = self.height / 2;
        let (top, bottom) = self.pixels.split_at_mut(mid * self.width);
        top.fill(ceiling.pack());
        bottom.fill(floor.pack());
    }

    fn draw_vertical_line(&mut self, x: usize, y_start: usize, y_end: usize, color: Rgb) {
        if x >= self.width || y_start > y_end {
            return;
        }
        let y_end = y_end.min(self.height - 1);
        let packed = color.pack();
        let mut idx = y_start * self.width + x;
        for _y in y_start..=y_end {
            self.pixels[idx] = packed;
            idx += self.width;
        }
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(perp_distance: f64, side: Side, cell: u8) -> RayHit {
        RayHit {
            perp_distance,
            side,
            cell,
        }
    }

    #[test]
    fn test_line_height_is_inverse_to_depth() {
        for d in [0.5, 1.0, 1.7, 3.0, 12.25] {
            let near = line_height(d, 480);
            let far = line_height(2.0 * d, 480);
            assert!((near / 2 - far).abs() <= 1, "d={d}: {near} vs {far}");
        }
    }

    #[test]
    fn test_strip_is_centred_on_horizon() {
        let strip = project(&hit(4.0, Side::X, 1), 480);
        assert_eq!(strip.draw_start, 180);
        assert_eq!(strip.draw_end, 300);
    }

    #[test]
    fn test_strip_clamped_for_tiny_and_zero_depth() {
        for d in [1e-3, 1e-9, 0.0, -0.0] {
            let strip = project(&hit(d, Side::X, 1), 480);
            assert_eq!(strip.draw_start, 0);
            assert_eq!(strip.draw_end, 479);
        }
        let strip = project(&hit(0.5, Side::Y, 2), 7);
        assert_eq!((strip.draw_start, strip.draw_end), (0, 6));
    }

    #[test]
    fn test_y_side_is_half_brightness() {
        assert_eq!(wall_color(&hit(2.0, Side::X, 4)), Rgb::new(255, 255, 255));
        assert_eq!(wall_color(&hit(2.0, Side::Y, 4)), Rgb::new(127, 127, 127));
        assert_eq!(wall_color(&hit(2.0, Side::Y, 9)), Rgb::new(127, 127, 0));
    }

    #[test]
    fn test_pack_layout() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).pack(), 0x0012_3456);
    }

    #[test]
    fn test_clear_splits_at_midline() {
        let mut fb = FrameBuffer::new(4, 6);
        let ceiling = Rgb::new(50, 50, 50);
        let floor = Rgb::new(100, 100, 100);
        fb.clear(ceiling, floor);
        assert_eq!(fb.pixel(0, 2), ceiling.pack());
        assert_eq!(fb.pixel(3, 3), floor.pack());
    }

    #[test]
    fn test_render_frame_draws_every_column() {
        let map = GridMap::builtin();
        let cam = Camera::new([22.0, 12.0], [-1.0, 0.0], 0.66);
        let mut fb = FrameBuffer::new(64, 48);
        let ceiling = Rgb::new(50, 50, 50);
        let floor = Rgb::new(100, 100, 100);
        render_frame(&mut fb, &map, &cam, ceiling, floor);

        // the horizon row is always covered by a wall strip
        for x in 0..64 {
            let px = fb.pixel(x, 24);
            assert_ne!(px, ceiling.pack());
            assert_ne!(px, floor.pack());
        }
        // center column hits the red outer wall, 21 cells away
        assert_eq!(fb.pixel(32, 24), Rgb::new(255, 0, 0).pack());
        assert_eq!(fb.pixel(32, 0), ceiling.pack());
        assert_eq!(fb.pixel(32, 47), floor.pack());
    }
}
