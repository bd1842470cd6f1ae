//! Software rasterizer for [`DrawList`]s on top of a `pixels` framebuffer.

use std::collections::HashMap;

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use aedventure::{Color, DrawCommand, DrawList, Rect, TextureHandle, Vec2};
use anyhow::{anyhow, Result};
use image::RgbaImage;
use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

const CLEAR_COLOR: Color = [0, 0, 0, 255];

pub struct Renderer {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    textures: HashMap<TextureHandle, RgbaImage>,
    font: Option<FontArc>,
    warned_missing_font: bool,
}

impl Renderer {
    /// Create a `width` x `height` framebuffer scaled onto `window`.
    pub fn new(window: &'static Window, width: u32, height: u32) -> Result<Self> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            pixels,
            width,
            height,
            textures: HashMap::new(),
            font: None,
            warned_missing_font: false,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    /// Convert a physical cursor position to framebuffer pixels, clamped to
    /// the framebuffer.
    pub fn window_to_framebuffer(&self, x: f64, y: f64) -> (f64, f64) {
        let (px, py) = match self.pixels.window_pos_to_pixel((x as f32, y as f32)) {
            Ok((px, py)) => (px as isize, py as isize),
            Err((px, py)) => (px, py),
        };
        let max_x = self.width.saturating_sub(1) as isize;
        let max_y = self.height.saturating_sub(1) as isize;
        (px.clamp(0, max_x) as f64, py.clamp(0, max_y) as f64)
    }

    pub fn insert_texture(&mut self, handle: TextureHandle, image: RgbaImage) {
        self.textures.insert(handle, image);
    }

    /// Drop every texture for which `remove` returns true.
    pub fn remove_textures(&mut self, remove: impl Fn(TextureHandle) -> bool) {
        self.textures.retain(|handle, _| !remove(*handle));
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Load a TTF/OTF font used for every text command.
    pub fn load_font_from_bytes(&mut self, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| anyhow!("failed to load font: {e}"))?;
        self.font = Some(font);
        Ok(())
    }

    /// Rasterize `draw_list` and present it.
    pub fn draw(&mut self, draw_list: &DrawList) -> Result<()> {
        let (width, height) = (self.width, self.height);
        if draw_list.texts().next().is_some() && self.font.is_none() && !self.warned_missing_font {
            log::warn!("no font loaded; text will not be drawn");
            self.warned_missing_font = true;
        }

        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        let mut canvas = Canvas {
            frame,
            width,
            height,
        };
        for command in draw_list.commands() {
            match command {
                DrawCommand::Image { texture, position } => {
                    if let Some(image) = self.textures.get(texture) {
                        canvas.blit(image, *position);
                    }
                }
                DrawCommand::Rect { rect, color } => canvas.fill_rect(*rect, *color),
                DrawCommand::Text {
                    text,
                    position,
                    size,
                    color,
                } => {
                    if let Some(font) = &self.font {
                        canvas.text(font, text, *position, *size, *color);
                    }
                }
            }
        }

        self.pixels.render()?;
        Ok(())
    }
}

/// RGBA8 frame being drawn into.
struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl Canvas<'_> {
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = (f32::from(color[3]) * coverage.clamp(0.0, 1.0)).round() as u32;
        if alpha == 0 {
            return;
        }
        let index = ((y as u32 * self.width + x as u32) * 4) as usize;
        let pixel = &mut self.frame[index..index + 4];
        for channel in 0..3 {
            let src = u32::from(color[channel]);
            let dst = u32::from(pixel[channel]);
            pixel[channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
        }
        pixel[3] = 255;
    }

    fn blit(&mut self, image: &RgbaImage, position: Vec2) {
        let left = position.x.round() as i32;
        let top = position.y.round() as i32;
        let right = left + image.width() as i32;
        let bottom = top + image.height() as i32;
        if right <= 0 || bottom <= 0 || left >= self.width as i32 || top >= self.height as i32 {
            return;
        }
        for (sx, sy, pixel) in image.enumerate_pixels() {
            self.blend(left + sx as i32, top + sy as i32, pixel.0, 1.0);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let left = rect.left().round().max(0.0) as i32;
        let top = rect.top().round().max(0.0) as i32;
        let right = (rect.right().round() as i32).min(self.width as i32);
        let bottom = (rect.bottom().round() as i32).min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn text(&mut self, font: &FontArc, text: &str, position: Vec2, size: f32, color: Color) {
        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);
        let mut caret = point(position.x, position.y + scaled.ascent());
        let mut previous = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|x, y, coverage| {
                self.blend(ox + x as i32, oy + y as i32, color, coverage);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(frame: &mut [u8]) -> Canvas<'_> {
        Canvas {
            frame,
            width: 4,
            height: 4,
        }
    }

    fn pixel(frame: &[u8], x: usize, y: usize) -> [u8; 4] {
        let i = (y * 4 + x) * 4;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        canvas(&mut frame).fill_rect(Rect::new(2.0, 2.0, 10.0, 10.0), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 3, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_colors_blend_with_frame() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = canvas(&mut frame);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [200, 200, 200, 255]);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [0, 0, 0, 128]);
        assert_eq!(pixel(&frame, 0, 0), [99, 99, 99, 255]);
    }

    #[test]
    fn blit_skips_transparent_source_pixels() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([10, 20, 30, 255]));
        let mut frame = vec![0u8; 4 * 4 * 4];
        canvas(&mut frame).blit(&image, Vec2::new(-1.0, 3.0));
        assert_eq!(pixel(&frame, 0, 3), [0, 0, 0, 0]);

        canvas(&mut frame).blit(&image, Vec2::new(1.0, 3.0));
        assert_eq!(pixel(&frame, 1, 3), [10, 20, 30, 255]);
        assert_eq!(pixel(&frame, 2, 3), [0, 0, 0, 0]);
    }
}
