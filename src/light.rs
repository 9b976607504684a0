use crate::math::*;
use crate::scene::Scene;

/// Light infinitely far away, shining along `orientation`
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
	pub color: Vec3,
	pub orientation: Vec3,
}

/// Omnidirectional light with polynomial distance falloff
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
	pub color: Vec3,
	pub position: Vec3,
	pub constant: f32,
	pub linear: f32,
	pub quadratic: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
	Directional(DirectionalLight),
	Point(PointLight),
}

impl Light {
	pub fn directional(color: Vec3, orientation: Vec3) -> Light {
		Light::Directional(DirectionalLight { color, orientation: orientation.normalized() })
	}

	pub fn point(color: Vec3, position: Vec3, constant: f32, linear: f32, quadratic: f32) -> Light {
		Light::Point(PointLight { color, position, constant, linear, quadratic })
	}

	pub fn color(&self) -> Vec3 {
		match *self {
			Light::Directional(ref l) => l.color,
			Light::Point(ref l) => l.color,
		}
	}

	/// Unit direction from `p` toward the light
	pub fn direction(&self, p: Vec3) -> Vec3 {
		match *self {
			Light::Directional(ref l) => -l.orientation.normalized(),
			Light::Point(ref l) => (l.position - p).normalized(),
		}
	}

	/// Intensity falloff at `p`, never above 1
	pub fn distance_attenuation(&self, p: Vec3) -> f32 {
		match *self {
			Light::Directional(_) => 1.0,
			Light::Point(ref l) => {
				let d = Vec3::distance(l.position, p);
				let denom = l.constant + l.linear * d + l.quadratic * d * d;
				(1.0 / denom).min(1.0)
			}
		}
	}

	/// Fraction of the light reaching `p` along the shadow ray `ray`.
	///
	/// Opaque occluders block everything. Transparent ones let `kt^d` through,
	/// with `d` the distance travelled inside them.
	pub fn shadow_attenuation(&self, scene: &Scene, ray: Ray, p: Vec3) -> Vec3 {
		match *self {
			Light::Directional(_) => transmitted(scene, ray, p, &|_: Vec3, _: f32| true, 0),
			Light::Point(ref l) => {
				let position = l.position;
				transmitted(scene, ray, p, &|from: Vec3, t: f32| t < Vec3::distance(from, position), 0)
			}
		}
	}
}

/// Follow `ray` through transparent occluders, starting from `from`.
///
/// `blocks(from, t)` tells whether a hit at distance `t` lies before the light.
fn transmitted<F>(scene: &Scene, ray: Ray, from: Vec3, blocks: &F, depth: u32) -> Vec3
	where F: Fn(Vec3, f32) -> bool
{
	let settings = scene.settings();
	let entry = match scene.intersect(ray) {
		None => return Vec3::thrice(1.0),
		Some(its) => its,
	};
	if !blocks(from, entry.distance) {
		return Vec3::thrice(1.0);
	}
	if !entry.material.is_transmissive() {
		return Vec3::zero();
	}

	if depth >= settings.max_shadow_depth {
		trace!("Shadow ray gave up after {} transparent occluders", depth);
		return Vec3::zero();
	}

	// cross the volume
	let kt = entry.material.kt.value(&entry);
	let inside = ray.advanced(entry.distance, settings.ray_epsilon);
	let exit = match scene.intersect(inside) {
		// the volume is not closed; let the light through
		None => return Vec3::thrice(1.0),
		Some(its) => its,
	};

	let atten = kt.powf(exit.distance);
	if atten.max_elem() < settings.attenuation_cutoff {
		return Vec3::zero();
	}

	let rest = inside.advanced(exit.distance, settings.ray_epsilon);
	atten * transmitted(scene, rest, rest.origin, blocks, depth + 1)
}
