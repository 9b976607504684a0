use std::path::Path;
use time::PreciseTime;

use crate::error::TextureLoadError;
use crate::math::{Vec3, bilerp};

/// Immutable RGB bitmap sampled in parametric `[0, 1]²` coordinates.
///
/// Texture maps are loaded once and then shared between materials through an `Arc`.
#[derive(Debug, Clone)]
pub struct TextureMap {
	pub width: usize,
	pub height: usize,
	pixels: Vec<Vec3>,
}

impl TextureMap {
	/// Build a map from row-major pixels, top row first.
	///
	/// # Panics
	///
	/// Panics if a dimension is zero or if `pixels` does not hold exactly
	/// `width * height` values.
	pub fn from_pixels(width: usize, height: usize, pixels: Vec<Vec3>) -> TextureMap {
		assert!(width > 0 && height > 0, "empty texture map");
		assert_eq!(pixels.len(), width * height, "pixel count does not match dimensions");
		TextureMap { width, height, pixels }
	}

	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<TextureMap, TextureLoadError> {
		let start = PreciseTime::now();
		let img = image::open(&filepath)
			.map_err(|source| TextureLoadError { filename: filepath.as_ref().to_path_buf(), source })?
			.to_rgb8();
		let (width, height) = img.dimensions();

		let map = TextureMap {
			width: width as usize,
			height: height as usize,
			pixels: img.pixels().map(|p| to_unit(p.0)).collect(),
		};
		let end = PreciseTime::now();
		info!("Loaded texture map {} ({}x{}) in {} seconds",
			filepath.as_ref().display(), width, height, start.to(end).num_milliseconds() as f32 / 1000.0);
		Ok(map)
	}

	pub fn get(&self, x: usize, y: usize) -> Vec3 {
		self.pixels[self.width * y + x]
	}

	/// Evaluate the texture using parametric coordinates and bilinear interpolation
	pub fn eval(&self, (u, v): (f32, f32)) -> Vec3 {
		let w = self.width as isize;
		let h = self.height as isize;

		// Convert parametric coordinates to texture coordinates, accounting for
		// - the half-pixel offset due to the continuous to discrete conversion
		// - the vertical flip of texture coordinates
		let tu = w as f32 * u - 0.5;
		let tv = h as f32 * (1.0 - v) - 0.5;

		let x0 = tu.floor() as isize;
		let y0 = tv.floor() as isize;
		let x1 = x0 + 1;
		let y1 = y0 + 1;

		let dx = tu - x0 as f32;
		let dy = tv - y0 as f32;

		// Off-boundaries coordinates wrap around, repeating the texture
		let x0 = modulo(x0, w);
		let x1 = modulo(x1, w);
		let y0 = modulo(y0, h);
		let y1 = modulo(y1, h);

		let v00 = self.get(x0, y0);
		let v01 = self.get(x1, y0);
		let v10 = self.get(x0, y1);
		let v11 = self.get(x1, y1);
		bilerp(v00, v01, v10, v11, (dx, dy))
	}
}

/// Non-negative remainder of a divided by b.
fn modulo(a: isize, b: isize) -> usize {
	let r = a % b;
	(if r < 0 { r + b } else { r }) as usize
}

fn to_unit([r, g, b]: [u8; 3]) -> Vec3 {
	let f = |v: u8| v as f32 / 255.0;
	Vec3::new(f(r), f(g), f(b))
}

/// Perceived brightness of a color, used to read scalar parameters from color values
pub fn intensity(color: Vec3) -> f32 {
	0.299 * color.x + 0.587 * color.y + 0.114 * color.z
}
