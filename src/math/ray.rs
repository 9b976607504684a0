use crate::math::Vec3;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
	pub origin: Vec3,
	pub direction: Vec3,
}

impl Ray {
	pub fn new(origin: Vec3, direction: Vec3) -> Ray {
		Ray { origin, direction }
	}

	pub fn point_at(&self, t: f32) -> Vec3 {
		self.origin + self.direction * t
	}

	/// Same direction, origin moved `eps` past the point at `t`
	pub fn advanced(&self, t: f32, eps: f32) -> Ray {
		Ray {
			origin: self.point_at(t) + self.direction * eps,
			direction: self.direction,
		}
	}
}
