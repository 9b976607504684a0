use std::sync::Arc;

use crate::geometry::Intersection;
use crate::math::*;
use crate::scene::Scene;
use crate::texture::{TextureMap, intensity};

/// A material coefficient, either constant or read from a shared texture map
#[derive(Clone, Debug)]
pub enum MaterialParameter {
	Constant(Vec3),
	Map(Arc<TextureMap>),
}

impl MaterialParameter {
	pub fn scalar(v: f32) -> MaterialParameter {
		MaterialParameter::Constant(Vec3::thrice(v))
	}

	pub fn value(&self, its: &Intersection) -> Vec3 {
		match *self {
			MaterialParameter::Constant(c) => c,
			MaterialParameter::Map(ref map) => map.eval(its.tex_coords()),
		}
	}

	pub fn intensity_value(&self, its: &Intersection) -> f32 {
		intensity(self.value(its))
	}

	/// Constant zero; a texture map is never considered zero
	pub fn is_zero(&self) -> bool {
		match *self {
			MaterialParameter::Constant(c) => c.is_zero(),
			MaterialParameter::Map(_) => false,
		}
	}
}

impl From<Vec3> for MaterialParameter {
	fn from(c: Vec3) -> MaterialParameter {
		MaterialParameter::Constant(c)
	}
}

impl From<Arc<TextureMap>> for MaterialParameter {
	fn from(map: Arc<TextureMap>) -> MaterialParameter {
		MaterialParameter::Map(map)
	}
}

/// Phong material
#[derive(Clone, Debug)]
pub struct Material {
	/// ambient reflectance
	pub ka: MaterialParameter,
	/// diffuse reflectance
	pub kd: MaterialParameter,
	/// specular reflectance
	pub ks: MaterialParameter,
	/// transmittance per unit distance; zero means opaque
	pub kt: MaterialParameter,
	pub shininess: MaterialParameter,
}

impl Default for Material {
	fn default() -> Material {
		Material {
			ka: MaterialParameter::scalar(0.0),
			kd: MaterialParameter::scalar(0.0),
			ks: MaterialParameter::scalar(0.0),
			kt: MaterialParameter::scalar(0.0),
			shininess: MaterialParameter::scalar(0.0),
		}
	}
}

impl Material {
	pub fn with_ambient<P: Into<MaterialParameter>>(self, ka: P) -> Material {
		Material { ka: ka.into(), ..self }
	}

	pub fn with_diffuse<P: Into<MaterialParameter>>(self, kd: P) -> Material {
		Material { kd: kd.into(), ..self }
	}

	pub fn with_specular<P: Into<MaterialParameter>>(self, ks: P, shininess: f32) -> Material {
		Material { ks: ks.into(), shininess: MaterialParameter::scalar(shininess), ..self }
	}

	pub fn with_transmittance<P: Into<MaterialParameter>>(self, kt: P) -> Material {
		Material { kt: kt.into(), ..self }
	}

	/// Whether light can pass through the material
	pub fn is_transmissive(&self) -> bool {
		!self.kt.is_zero()
	}

	pub fn shininess(&self, its: &Intersection) -> f32 {
		self.shininess.intensity_value(its)
	}

	/// Apply the Phong model at the hit `its` of `ray`.
	///
	/// The result is not clamped.
	pub fn shade(&self, scene: &Scene, ray: Ray, its: &Intersection) -> Vec3 {
		let mut color = self.ka.value(its) * scene.ambient();

		let p = ray.point_at(its.distance);
		let n = its.normal.normalized();
		let view = (-ray.direction).normalized();
		let kd = self.kd.value(its);
		let ks = self.ks.value(its);
		let shininess = self.shininess(its);
		let eps = scene.settings().ray_epsilon;

		for light in scene.lights() {
			let l = light.direction(p);
			let to_light = Ray::new(p + l * eps, l);
			let incident = light.color()
				* light.distance_attenuation(p)
				* light.shadow_attenuation(scene, to_light, p);

			color += kd * incident * Vec3::dot(n, l).max(0.0);

			let r = l.reflect(n).normalized();
			color += ks * incident * Vec3::dot(view, r).max(0.0).powf(shininess);
		}

		color
	}
}
