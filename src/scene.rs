use crate::error::MeshError;
use crate::geometry::Intersection;
use crate::light::Light;
use crate::math::*;
use crate::mesh::Mesh;

/// Numerical knobs of the shading engine
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceSettings {
	/// Offset applied every time a ray is re-cast from a surface
	pub ray_epsilon: f32,
	/// Shadow rays dimmer than this in every channel count as blocked
	pub attenuation_cutoff: f32,
	/// Maximum number of transparent occluders a shadow ray crosses
	pub max_shadow_depth: u32,
}

impl Default for TraceSettings {
	fn default() -> TraceSettings {
		TraceSettings {
			ray_epsilon: RAY_EPSILON,
			attenuation_cutoff: 1e-6,
			max_shadow_depth: 64,
		}
	}
}

/// A mesh placed in the world
struct Instance {
	mesh: Mesh,
	inv_transform: Mat4,
}

pub struct Scene {
	instances: Vec<Instance>,
	lights: Vec<Light>,
	ambient: Vec3,
	settings: TraceSettings,
}

impl Scene {
	pub fn new(ambient: Vec3) -> Scene {
		Scene {
			instances: Vec::new(),
			lights: Vec::new(),
			ambient,
			settings: TraceSettings::default(),
		}
	}

	pub fn with_settings(self, settings: TraceSettings) -> Scene {
		Scene { settings, ..self }
	}

	/// Add a mesh whose local frame is the world frame
	pub fn add_mesh(&mut self, mesh: Mesh) -> Result<(), MeshError> {
		self.add_instance(mesh, &Mat4::identity())
	}

	/// Add a mesh placed in the world by `transform`.
	///
	/// The mesh must be complete; it is checked here and rejected if inconsistent.
	pub fn add_instance(&mut self, mesh: Mesh, transform: &Mat4) -> Result<(), MeshError> {
		mesh.double_check()?;
		debug!("Adding mesh with {} vertices and {} faces", mesh.vertices().len(), mesh.faces().len());
		self.instances.push(Instance {
			mesh,
			inv_transform: transform.inverse(),
		});
		Ok(())
	}

	pub fn add_light(&mut self, light: Light) {
		self.lights.push(light);
	}

	pub fn ambient(&self) -> Vec3 {
		self.ambient
	}

	pub fn lights(&self) -> &[Light] {
		&self.lights
	}

	pub fn settings(&self) -> &TraceSettings {
		&self.settings
	}

	/// Nearest hit over all meshes; distance and normal are in world space
	pub fn intersect(&self, ray: Ray) -> Option<Intersection> {
		let mut closest: Option<Intersection> = None;

		for instance in &self.instances {
			// the direction is not renormalized so that t is the same in both frames
			let local_ray = Ray {
				origin: instance.inv_transform.transform_point(ray.origin),
				direction: instance.inv_transform.transform_vector(ray.direction),
			};
			if let Some(mut its) = instance.mesh.intersect_local(local_ray) {
				if closest.as_ref().map_or(true, |c| its.distance < c.distance) {
					its.normal = instance.inv_transform.transform_normal(its.normal).normalized();
					closest = Some(its);
				}
			}
		}

		closest
	}
}
