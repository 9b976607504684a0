//! Triangle mesh ray intersection and Phong shading with transparent shadows.
//!
//! Meshes are built through [`mesh::Mesh`], placed in a [`scene::Scene`]
//! together with lights, then queried with [`trace`] or [`trace_all`].

extern crate image;
extern crate rayon;
extern crate time;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod error;
pub mod geometry;
pub mod light;
pub mod material;
pub mod math;
pub mod mesh;
pub mod primitive;
pub mod scene;
pub mod texture;

use rayon::prelude::*;
use time::PreciseTime;

use math::*;
use scene::*;

/// Color seen along `ray`; rays escaping the scene are black
pub fn trace(scene: &Scene, ray: Ray) -> Vec3 {
	match scene.intersect(ray) {
		Some(its) => its.material.shade(scene, ray, &its),
		None => Vec3::zero(),
	}
}

/// Shade every ray of `rays`, in parallel
pub fn trace_all(scene: &Scene, rays: &[Ray]) -> Vec<Vec3> {
	info!("Start shading {} rays...", rays.len());
	let start = PreciseTime::now();

	let colors: Vec<Vec3> = rays.par_iter().map(|&ray| trace(scene, ray)).collect();

	let end = PreciseTime::now();
	info!("Shaded {} rays in {:.3}s", rays.len(), start.to(end).num_milliseconds() as f32 / 1000.0);
	colors
}
