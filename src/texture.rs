use std::fmt;
use std::path::Path;

use cgmath::Point2;

use image::RgbImage;

use crate::color::Color;
use crate::float::*;

/// Index into the scene texture list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

#[derive(Clone)]
pub struct Texture {
    image: RgbImage,
}

impl Texture {
    pub fn from_image(image: RgbImage) -> Self {
        Texture { image }
    }

    pub fn from_image_path(path: &Path) -> Result<Self, image::ImageError> {
        Ok(Self::from_image(image::open(path)?.to_rgb8()))
    }

    pub fn color(&self, tex_coords: Point2<Float>) -> Color {
        bilinear_interp(&self.image, tex_coords)
    }
}

// Implement debug manually because images default implementation just prints the whole image
impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Texture({}x{})", self.image.width(), self.image.height())
    }
}

/// Texture coordinates wrap around, v = 0 is the bottom row of the image
fn bilinear_interp(image: &RgbImage, tex_coords: Point2<Float>) -> Color {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Color::black();
    }
    let x = tex_coords.x.rem_euclid(1.0) * (width - 1).to_float();
    let y = (1.0 - tex_coords.y.rem_euclid(1.0)) * (height - 1).to_float();
    let x_fract = x.fract();
    let y_fract = y.fract();
    // Make sure that pixel coordinates don't overflow
    let (left, right) = if x >= (width - 1).to_float() {
        (width - 1, width - 1)
    } else {
        (x.floor() as u32, x.ceil() as u32)
    };
    let (top, bottom) = if y >= (height - 1).to_float() {
        (height - 1, height - 1)
    } else {
        (y.floor() as u32, y.ceil() as u32)
    };
    let get = |x, y| Color::from_pixel(*image.get_pixel(x, y));
    let tl = get(left, top);
    let bl = get(left, bottom);
    let tr = get(right, top);
    let br = get(right, bottom);
    let top_c = tr * x_fract + tl * (1.0 - x_fract);
    let bottom_c = br * x_fract + bl * (1.0 - x_fract);
    bottom_c * y_fract + top_c * (1.0 - y_fract)
}
