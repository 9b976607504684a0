use std::borrow::Cow;
use time::PreciseTime;

use crate::error::MeshError;
use crate::geometry::*;
use crate::material::Material;
use crate::math::*;

/// Represent vertex indices in faces; 2^32 vertices should be enough
pub type Index = u32;

/// Below this `|d.n|` a ray is considered parallel to a face
const PARALLEL_EPSILON: f32 = 1e-9;

/// Relative area below which a face is dropped as degenerate
const DEGENERATE_EPSILON: f32 = 1e-7;

#[derive(Clone, Debug)]
pub struct Face {
	pub idxs: [Index; 3],
	/// Unit flat normal, counter-clockwise winding
	pub normal: Vec3,
	pub degenerate: bool,
}

impl Face {
	fn new(vertices: &[Vec3], idxs: [Index; 3]) -> Face {
		let a = vertices[idxs[0] as usize];
		let b = vertices[idxs[1] as usize];
		let c = vertices[idxs[2] as usize];

		let ab = b - a;
		let ac = c - a;
		let n = Vec3::cross(ab, ac);
		let len = n.length();
		// catches coincident vertices (zero edge), collinear ones and NaNs
		let degenerate = !(len > DEGENERATE_EPSILON * ab.length() * ac.length());

		Face {
			idxs,
			normal: if degenerate { Vec3::zero() } else { n / len },
			degenerate,
		}
	}

	/// Geometric part of the test: hit distance and barycentric coordinates
	fn hit(&self, mesh: &Mesh, ray: Ray) -> Option<(f32, Barycentric)> {
		if self.degenerate {
			return None;
		}

		let a = mesh.vertices[self.idxs[0] as usize];
		let b = mesh.vertices[self.idxs[1] as usize];
		let c = mesh.vertices[self.idxs[2] as usize];
		let n = self.normal;

		let denom = Vec3::dot(ray.direction, n);
		if denom.abs() < PARALLEL_EPSILON {
			return None;
		}
		let t = Vec3::dot(a - ray.origin, n) / denom;
		if !(t >= 0.0) {
			return None;
		}

		// p lies in the face plane; it must be on the inner side of every edge
		let p = ray.point_at(t);
		let inside = |from: Vec3, to: Vec3| Vec3::dot(Vec3::cross(to - from, p - from), n) >= 0.0;
		if !inside(a, b) || !inside(b, c) || !inside(c, a) {
			return None;
		}

		// solve p - a = beta * e1 + gamma * e2 in the least squares sense
		let e1 = b - a;
		let e2 = c - a;
		let ap = p - a;
		let d11 = Vec3::dot(e1, e1);
		let d12 = Vec3::dot(e1, e2);
		let d22 = Vec3::dot(e2, e2);
		let det = d11 * d22 - d12 * d12;
		if !(det.abs() > 0.0) || !det.is_finite() {
			return None;
		}
		let r1 = Vec3::dot(ap, e1);
		let r2 = Vec3::dot(ap, e2);
		let beta = (d22 * r1 - d12 * r2) / det;
		let gamma = (d11 * r2 - d12 * r1) / det;
		let alpha = 1.0 - beta - gamma;
		if alpha < 0.0 || beta < 0.0 || gamma < 0.0 {
			return None;
		}

		Some((t, Barycentric { alpha, beta, gamma }))
	}

	/// Intersect `ray`, given in the mesh's local frame, with this face
	pub fn intersect_local<'a>(&self, mesh: &'a Mesh, ray: Ray) -> Option<Intersection<'a>> {
		self.hit(mesh, ray).map(|(t, bary)| mesh.resolve(self, t, bary))
	}
}

// N.B. Every non-empty attribute array must have one entry per vertex,
// which `double_check` verifies once the mesh is built.
#[derive(Clone, Debug)]
pub struct Mesh {
	vertices: Vec<Vec3>,
	normals: Vec<Vec3>,
	colors: Vec<Vec3>,
	uvs: Vec<(f32, f32)>,
	faces: Vec<Face>,
	vert_norms: bool,
	bbox: AABB,
	material: Material,
}

impl Mesh {
	pub fn new(material: Material) -> Mesh {
		Mesh {
			vertices: Vec::new(),
			normals: Vec::new(),
			colors: Vec::new(),
			uvs: Vec::new(),
			faces: Vec::new(),
			vert_norms: false,
			bbox: AABB::empty(),
			material,
		}
	}

	pub fn add_vertex(&mut self, v: Vec3) {
		self.bbox.extend_point(v);
		self.vertices.push(v);
	}

	pub fn add_normal(&mut self, n: Vec3) {
		self.normals.push(n);
		self.vert_norms = true;
	}

	pub fn add_color(&mut self, c: Vec3) {
		self.colors.push(c);
	}

	pub fn add_uv(&mut self, uv: (f32, f32)) {
		self.uvs.push(uv);
	}

	/// Add the face `a, b, c`.
	///
	/// Returns `false` if one of the vertices does not exist. Degenerate faces
	/// are accepted but silently dropped.
	pub fn add_face(&mut self, a: Index, b: Index, c: Index) -> bool {
		let count = self.vertices.len();
		if [a, b, c].iter().any(|&i| i as usize >= count) {
			warn!("Rejecting face ({}, {}, {}): mesh has {} vertices", a, b, c, count);
			return false;
		}

		let face = Face::new(&self.vertices, [a, b, c]);
		if face.degenerate {
			trace!("Dropping degenerate face ({}, {}, {})", a, b, c);
		} else {
			self.faces.push(face);
		}
		true
	}

	/// Check that per-vertex attributes, when present, match the vertex count
	pub fn double_check(&self) -> Result<(), MeshError> {
		let vertices = self.vertices.len();
		if !self.colors.is_empty() && self.colors.len() != vertices {
			return Err(MeshError::WrongColorCount { vertices, colors: self.colors.len() });
		}
		if !self.uvs.is_empty() && self.uvs.len() != vertices {
			return Err(MeshError::WrongUvCount { vertices, uvs: self.uvs.len() });
		}
		if !self.normals.is_empty() && self.normals.len() != vertices {
			return Err(MeshError::WrongNormalCount { vertices, normals: self.normals.len() });
		}
		Ok(())
	}

	/// Average the flat normals of the faces around each vertex.
	///
	/// The average is unweighted and left unnormalized; vertices outside any
	/// face get a zero normal. Supplied normals are kept as they are.
	pub fn generate_normals(&mut self) {
		if self.vert_norms {
			debug!("Mesh already has {} vertex normals", self.normals.len());
			return;
		}

		let start = PreciseTime::now();
		let mut normals = vec![Vec3::zero(); self.vertices.len()];
		let mut counts = vec![0u32; self.vertices.len()];

		for face in &self.faces {
			for &i in &face.idxs {
				normals[i as usize] += face.normal;
				counts[i as usize] += 1;
			}
		}
		for (n, &count) in normals.iter_mut().zip(&counts) {
			if count > 0 {
				*n /= count as f32;
			}
		}

		self.normals = normals;
		self.vert_norms = true;
		let end = PreciseTime::now();
		debug!("Generated {} vertex normals in {} seconds",
			self.normals.len(), start.to(end).num_milliseconds() as f32 / 1000.0);
	}

	pub fn vertices(&self) -> &[Vec3] {
		&self.vertices
	}

	pub fn normals(&self) -> &[Vec3] {
		&self.normals
	}

	pub fn faces(&self) -> &[Face] {
		&self.faces
	}

	pub fn material(&self) -> &Material {
		&self.material
	}

	pub fn has_vertex_normals(&self) -> bool {
		self.vert_norms
	}

	pub fn aabb(&self) -> AABB {
		self.bbox
	}

	/// Nearest hit of `ray`, expressed in the mesh's local frame, over all faces
	pub fn intersect_local(&self, ray: Ray) -> Option<Intersection> {
		if self.faces.is_empty() || !self.bbox.padded(RAY_EPSILON).hit_by(ray) {
			return None;
		}

		let mut closest: Option<(f32, Barycentric, &Face)> = None;
		for face in &self.faces {
			if let Some((t, bary)) = face.hit(self, ray) {
				match closest {
					Some((t_min, _, _)) if t_min <= t => {}
					_ => closest = Some((t, bary, face)),
				}
			}
		}

		closest.map(|(t, bary, face)| self.resolve(face, t, bary))
	}

	/// Fill in shading attributes for a hit on `face`
	fn resolve(&self, face: &Face, t: f32, bary: Barycentric) -> Intersection {
		let [i0, i1, i2] = face.idxs;
		let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);

		let normal = if self.vert_norms && !self.normals.is_empty() {
			let n = bary.blend(self.normals[i0], self.normals[i1], self.normals[i2]);
			let len = n.length();
			if len > 0.0 { n / len } else { face.normal }
		} else {
			face.normal
		};

		let (uv, color, material) = if !self.uvs.is_empty() {
			let uv = bary.blend_uv(self.uvs[i0], self.uvs[i1], self.uvs[i2]);
			(Some(uv), None, Cow::Borrowed(&self.material))
		} else if !self.colors.is_empty() {
			let color = bary.blend(self.colors[i0], self.colors[i1], self.colors[i2]);
			(None, Some(color), Cow::Owned(self.material.clone().with_diffuse(color)))
		} else {
			(None, None, Cow::Borrowed(&self.material))
		};

		Intersection {
			distance: t,
			normal,
			bary,
			uv,
			color,
			material,
			object: self,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{Rng, SeedableRng, XorShiftRng};

	fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Mesh {
		let mut mesh = Mesh::new(Material::default());
		mesh.add_vertex(a);
		mesh.add_vertex(b);
		mesh.add_vertex(c);
		assert!(mesh.add_face(0, 1, 2));
		mesh
	}

	fn unit_triangle() -> Mesh {
		triangle(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0))
	}

	fn down(x: f32, y: f32) -> Ray {
		Ray::new(Vec3::new(x, y, 3.0), Vec3::new(0.0, 0.0, -1.0))
	}

	#[test]
	fn test_add_face_rejects_out_of_range() {
		let mut mesh = unit_triangle();
		assert!(!mesh.add_face(0, 1, 3));
		assert!(!mesh.add_face(7, 0, 1));
		assert_eq!(mesh.faces().len(), 1);
	}

	#[test]
	fn test_degenerate_faces_are_dropped() {
		let mut mesh = unit_triangle();
		mesh.add_vertex(Vec3::new(2.0, 0.0, 0.0));
		// coincident
		assert!(mesh.add_face(0, 0, 1));
		assert!(mesh.add_face(1, 1, 1));
		// collinear
		assert!(mesh.add_face(0, 1, 3));
		assert_eq!(mesh.faces().len(), 1);
		assert!(mesh.faces().iter().all(|f| !f.degenerate));
	}

	#[test]
	fn test_face_normal_follows_winding() {
		let mesh = unit_triangle();
		assert_eq!(mesh.faces()[0].normal, Vec3::new(0.0, 0.0, 1.0));

		let flipped = triangle(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
		assert_eq!(flipped.faces()[0].normal, Vec3::new(0.0, 0.0, -1.0));
	}

	#[test]
	fn test_double_check() {
		let mut mesh = unit_triangle();
		assert_eq!(mesh.double_check(), Ok(()));

		mesh.add_color(Vec3::thrice(1.0));
		let err = mesh.double_check().unwrap_err();
		assert_eq!(err, MeshError::WrongColorCount { vertices: 3, colors: 1 });
		assert_eq!(err.to_string(), "Bad Trimesh: Wrong number of vertex colors.");

		mesh.add_color(Vec3::thrice(1.0));
		mesh.add_color(Vec3::thrice(1.0));
		assert_eq!(mesh.double_check(), Ok(()));

		mesh.add_uv((0.0, 0.0));
		assert_eq!(mesh.double_check(), Err(MeshError::WrongUvCount { vertices: 3, uvs: 1 }));
	}

	#[test]
	fn test_double_check_normals() {
		let mut mesh = unit_triangle();
		mesh.add_normal(Vec3::new(0.0, 0.0, 1.0));
		let err = mesh.double_check().unwrap_err();
		assert_eq!(err.to_string(), "Bad Trimesh: Wrong number of normals.");
	}

	#[test]
	fn test_generate_normals_single_triangle() {
		let mut mesh = triangle(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
		mesh.add_vertex(Vec3::new(5.0, 5.0, 5.0));
		assert!(!mesh.has_vertex_normals());
		mesh.generate_normals();
		assert!(mesh.has_vertex_normals());

		let face_normal = mesh.faces()[0].normal;
		assert_eq!(face_normal, Vec3::new(1.0, 0.0, 0.0));
		for n in &mesh.normals()[..3] {
			assert_eq!(*n, face_normal);
		}
		// isolated vertex
		assert_eq!(mesh.normals()[3], Vec3::zero());
	}

	#[test]
	fn test_generate_normals_is_unweighted_average() {
		// a small face in the XY plane and a large one in the YZ plane sharing the Y axis edge
		let mut mesh = Mesh::new(Material::default());
		mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
		mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
		mesh.add_vertex(Vec3::new(-0.1, 0.0, 0.0));
		mesh.add_vertex(Vec3::new(0.0, 0.0, 10.0));
		assert!(mesh.add_face(0, 1, 2));
		assert!(mesh.add_face(0, 1, 3));
		mesh.generate_normals();

		let close = |a: Vec3, b: Vec3| (a - b).length() < 1e-6;
		assert!(close(mesh.faces()[0].normal, Vec3::new(0.0, 0.0, 1.0)));
		assert!(close(mesh.faces()[1].normal, Vec3::new(1.0, 0.0, 0.0)));
		assert!(close(mesh.normals()[0], Vec3::new(0.5, 0.0, 0.5)));
		assert!(close(mesh.normals()[1], Vec3::new(0.5, 0.0, 0.5)));
		assert!(close(mesh.normals()[2], Vec3::new(0.0, 0.0, 1.0)));
		assert!(close(mesh.normals()[3], Vec3::new(1.0, 0.0, 0.0)));
	}

	#[test]
	fn test_generate_normals_keeps_supplied_normals() {
		let mut mesh = unit_triangle();
		let n = Vec3::new(0.0, 1.0, 1.0).normalized();
		for _ in 0..3 {
			mesh.add_normal(n);
		}
		mesh.generate_normals();
		assert!(mesh.normals().iter().all(|&m| m == n));
	}

	#[test]
	fn test_hit_inside() {
		let mesh = unit_triangle();
		let its = mesh.intersect_local(down(0.25, 0.25)).unwrap();
		assert!((its.distance - 3.0).abs() < 1e-6);
		assert_eq!(its.normal, Vec3::new(0.0, 0.0, 1.0));
		assert!((its.bary.alpha - 0.5).abs() < 1e-6);
		assert!((its.bary.beta - 0.25).abs() < 1e-6);
		assert!((its.bary.gamma - 0.25).abs() < 1e-6);
		assert!(its.uv.is_none() && its.color.is_none());
		assert!(std::ptr::eq(its.object, &mesh));
	}

	#[test]
	fn test_misses() {
		let mesh = unit_triangle();
		// outside the hypotenuse
		assert!(mesh.intersect_local(down(0.75, 0.75)).is_none());
		// triangle behind the origin
		let away = Ray::new(Vec3::new(0.25, 0.25, 3.0), Vec3::new(0.0, 0.0, 1.0));
		assert!(mesh.intersect_local(away).is_none());
		// parallel to the face plane
		let parallel = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::new(1.0, 0.0, 0.0));
		assert!(mesh.intersect_local(parallel).is_none());
	}

	#[test]
	fn test_back_side_is_hit() {
		let mesh = unit_triangle();
		let up = Ray::new(Vec3::new(0.25, 0.25, -2.0), Vec3::new(0.0, 0.0, 1.0));
		let its = mesh.intersect_local(up).unwrap();
		assert!((its.distance - 2.0).abs() < 1e-6);
	}

	#[test]
	fn test_nearest_face_wins() {
		let mut mesh = Mesh::new(Material::default());
		for &z in &[0.0, 1.0, -1.0] {
			mesh.add_vertex(Vec3::new(0.0, 0.0, z));
			mesh.add_vertex(Vec3::new(1.0, 0.0, z));
			mesh.add_vertex(Vec3::new(0.0, 1.0, z));
		}
		for i in 0..3 {
			assert!(mesh.add_face(3 * i, 3 * i + 1, 3 * i + 2));
		}
		let its = mesh.intersect_local(down(0.2, 0.2)).unwrap();
		assert!((its.distance - 2.0).abs() < 1e-6);
	}

	#[test]
	fn test_smooth_normals_are_interpolated() {
		let mut mesh = unit_triangle();
		mesh.add_normal(Vec3::new(0.0, 0.0, 1.0));
		mesh.add_normal(Vec3::new(1.0, 0.0, 0.0));
		mesh.add_normal(Vec3::new(0.0, 1.0, 0.0));

		let its = mesh.intersect_local(down(1.0 / 3.0, 1.0 / 3.0)).unwrap();
		let expected = Vec3::thrice(1.0).normalized();
		assert!((its.normal - expected).length() < 1e-4);

		let at_vertex = mesh.intersect_local(down(0.0, 0.0)).unwrap();
		assert!((at_vertex.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
	}

	#[test]
	fn test_vertex_colors_override_diffuse() {
		let mut mesh = unit_triangle();
		mesh.add_color(Vec3::new(1.0, 0.0, 0.0));
		mesh.add_color(Vec3::new(0.0, 1.0, 0.0));
		mesh.add_color(Vec3::new(0.0, 0.0, 1.0));
		assert_eq!(mesh.double_check(), Ok(()));

		let its = mesh.intersect_local(down(0.25, 0.25)).unwrap();
		let color = its.color.unwrap();
		assert!((color - Vec3::new(0.5, 0.25, 0.25)).length() < 1e-6);
		assert!(its.uv.is_none());
		match its.material {
			Cow::Owned(ref m) => assert_eq!(m.kd.value(&its), color),
			Cow::Borrowed(_) => panic!("vertex colors must produce a material copy"),
		}
		// the mesh material is untouched
		assert_eq!(mesh.material().kd.value(&its), Material::default().kd.value(&its));
	}

	#[test]
	fn test_uvs_take_priority_over_colors() {
		let mut mesh = unit_triangle();
		for &(uv, c) in &[((0.0, 0.0), 0.1), ((1.0, 0.0), 0.2), ((0.0, 1.0), 0.3)] {
			mesh.add_uv(uv);
			mesh.add_color(Vec3::thrice(c));
		}
		let its = mesh.intersect_local(down(0.5, 0.25)).unwrap();
		let (u, v) = its.uv.unwrap();
		assert!((u - 0.5).abs() < 1e-6 && (v - 0.25).abs() < 1e-6);
		assert!(its.color.is_none());
		match its.material {
			Cow::Borrowed(m) => assert!(std::ptr::eq(m, mesh.material())),
			Cow::Owned(_) => panic!("uv hits must use the mesh material"),
		}
	}

	#[test]
	fn test_face_intersect_local_matches_mesh() {
		let mesh = unit_triangle();
		let ray = down(0.1, 0.6);
		let from_face = mesh.faces()[0].intersect_local(&mesh, ray).unwrap();
		let from_mesh = mesh.intersect_local(ray).unwrap();
		assert_eq!(from_face.distance, from_mesh.distance);
		assert_eq!(from_face.bary, from_mesh.bary);
	}

	#[test]
	fn test_random_hits_match_barycentric_point() {
		let mut rng = XorShiftRng::from_seed([7, 11, 13, 17]);
		let mut checked = 0;

		while checked < 500 {
			let mut point = || Vec3::new(rng.gen_range(-1.0, 1.0), rng.gen_range(-1.0, 1.0), rng.gen_range(-1.0, 1.0));
			let (a, b, c) = (point(), point(), point());
			let origin = point() * 4.0;
			if Vec3::cross(b - a, c - a).length() < 0.1 {
				continue;
			}

			// aim at a point well inside the triangle
			let w: Vec<f32> = (0..3).map(|_| rng.gen_range(0.05, 1.0)).collect();
			let sum: f32 = w.iter().sum();
			let target = (a * w[0] + b * w[1] + c * w[2]) / sum;
			let direction = (target - origin).normalized();

			let mesh = triangle(a, b, c);
			if Vec3::dot(direction, mesh.faces()[0].normal).abs() < 0.1 {
				continue;
			}

			let its = mesh.intersect_local(Ray::new(origin, direction)).expect("ray aimed at the triangle missed it");
			let bary = its.bary;
			assert!(bary.alpha >= 0.0 && bary.beta >= 0.0 && bary.gamma >= 0.0);
			assert!((bary.alpha + bary.beta + bary.gamma - 1.0).abs() < 1e-5);

			let on_ray = origin + direction * its.distance;
			let on_face = bary.blend(a, b, c);
			assert!((on_ray - on_face).length() < 1e-3, "{:?} != {:?}", on_ray, on_face);
			assert!((on_ray - target).length() < 1e-3);
			checked += 1;
		}
	}
}
