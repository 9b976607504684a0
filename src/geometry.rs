use std::borrow::Cow;

use crate::material::Material;
use crate::math::*;
use crate::mesh::Mesh;

/// Weights of the three face vertices at a point of the face
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Barycentric {
	pub alpha: f32,
	pub beta: f32,
	pub gamma: f32,
}

impl Barycentric {
	pub fn blend(&self, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
		a * self.alpha + b * self.beta + c * self.gamma
	}

	pub fn blend_uv(&self, a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> (f32, f32) {
		(
			a.0 * self.alpha + b.0 * self.beta + c.0 * self.gamma,
			a.1 * self.alpha + b.1 * self.beta + c.1 * self.gamma,
		)
	}
}

/// Result of a single ray query, consumed right away by shading.
///
/// At most one of `uv` and `color` is set. When `color` is set, `material`
/// is an owned copy of the mesh material with its diffuse term replaced.
#[derive(Clone, Debug)]
pub struct Intersection<'a> {
	pub distance: f32,
	pub normal: Vec3,
	pub bary: Barycentric,
	pub uv: Option<(f32, f32)>,
	pub color: Option<Vec3>,
	pub material: Cow<'a, Material>,
	pub object: &'a Mesh,
}

impl<'a> Intersection<'a> {
	/// Texture lookup coordinates; hits without UVs sample the map origin
	pub fn tex_coords(&self) -> (f32, f32) {
		self.uv.unwrap_or((0.0, 0.0))
	}
}
