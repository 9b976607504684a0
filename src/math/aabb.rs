use crate::math::*;

/// Axis-Aligned Bounding Box
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct AABB {
	pub min: Vec3,
	pub max: Vec3,
}

impl AABB {
	#[inline(always)]
	pub fn intersect_fast(&self, ray: Ray, inv_dir: Vec3) -> (f32, f32) {
		let t_min = (self.min - ray.origin) * inv_dir;
		let t_max = (self.max - ray.origin) * inv_dir;
		let t1 = Vec3::min(t_min, t_max);
		let t2 = Vec3::max(t_min, t_max);
		let t_near = t1.x.max(t1.y).max(t1.z);
		let t_far  = t2.x.min(t2.y).min(t2.z);
		if t_near > t_far {
			return (-1.0, -1.0);
		}
		(t_near, t_far)
	}

	pub fn intersect(&self, ray: Ray) -> (f32, f32) {
		let inv_dir = 1.0 / ray.direction;
		self.intersect_fast(ray, inv_dir)
	}

	/// True if some non-negative part of the ray crosses the box
	pub fn hit_by(&self, ray: Ray) -> bool {
		let (_, t_far) = self.intersect(ray);
		t_far >= 0.0
	}

	pub fn empty() -> AABB {
		AABB { min: Vec3::thrice(INFINITY), max: Vec3::thrice(NEG_INFINITY) }
	}

	pub fn is_empty(&self) -> bool {
		self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
	}

	pub fn extend_point(&mut self, p: Vec3) {
		self.min = Vec3::min(self.min, p);
		self.max = Vec3::max(self.max, p);
	}

	/// Grow the box by `eps` on every side, so flat boxes keep a volume
	pub fn padded(&self, eps: f32) -> AABB {
		AABB {
			min: self.min - Vec3::thrice(eps),
			max: self.max + Vec3::thrice(eps),
		}
	}
}
