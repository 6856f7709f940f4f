use std::path::Path;

use image::RgbImage;

use crate::color::Color;

use super::coordinator::Block;

/// Final colors of a render, row-major with (0, 0) at the upper left
#[derive(Clone, Debug)]
pub struct TracedImage {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl TracedImage {
    pub fn empty(width: u32, height: u32) -> TracedImage {
        TracedImage {
            width,
            height,
            pixels: vec![Color::black(); width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, c: Color) {
        let i = self.index(x, y);
        self.pixels[i] = c;
    }

    /// Copy a rendered block, colors are in block row-major order
    pub fn update_block(&mut self, block: Block, colors: &[Color]) {
        for h in 0..block.height {
            for w in 0..block.width {
                let c = colors[h as usize * block.width as usize + w as usize];
                self.set(block.left + w, block.top + h, c);
            }
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| self.get(x, y).to_pixel())
    }

    /// Format follows the file extension
    pub fn save_image(&self, path: &Path) -> Result<(), image::ImageError> {
        self.to_rgb_image().save(path)
    }
}
