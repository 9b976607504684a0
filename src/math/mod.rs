pub mod vec3;
pub mod mat4;
pub mod ray;
pub mod aabb;

pub use self::vec3::Vec3;
pub use self::mat4::Mat4;
pub use self::ray::Ray;
pub use self::aabb::AABB;
pub use std::f32::{INFINITY, NEG_INFINITY};

/// Offset applied along a ray every time it is re-cast from a surface
pub const RAY_EPSILON: f32 = 1e-4;

pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
	(1.0 - t) * a + t * b
}

pub fn bilerp(x00: Vec3, x01: Vec3, x10: Vec3, x11: Vec3, (u, v): (f32, f32)) -> Vec3 {
	lerp(lerp(x00, x01, u), lerp(x10, x11, u), v)
}
