use crate::material::Material;
use crate::math::*;
use crate::mesh::{Index, Mesh};

/// Add a quad as two faces, `a, b, c, d` counter-clockwise seen from the front
fn add_quad(mesh: &mut Mesh, [a, b, c, d]: [Index; 4]) {
	let added = mesh.add_face(a, b, c) && mesh.add_face(a, c, d);
	debug_assert!(added, "quad refers to missing vertices");
}

/// Square of side `side_length` centered on `center`, facing `normal`
pub fn square(center: Vec3, normal: Vec3, side_length: f32, material: Material) -> Mesh {
	let normal = normal.normalized();
	let a = Vec3::new(normal.y, normal.z, -normal.x).normalized();
	let b = Vec3::cross(a, normal);
	let d1 = a * side_length;
	let d2 = b * side_length;
	let corner = center - (d1 + d2) * 0.5;

	let mut mesh = Mesh::new(material);
	mesh.add_vertex(corner);
	mesh.add_vertex(corner + d2);
	mesh.add_vertex(corner + d1 + d2);
	mesh.add_vertex(corner + d1);
	add_quad(&mut mesh, [0, 1, 2, 3]);
	mesh
}

/// Axis aligned box between `min` and `max`, faces pointing outward
pub fn cuboid(min: Vec3, max: Vec3, material: Material) -> Mesh {
	let mut mesh = Mesh::new(material);
	// corner i takes max.x if bit 0 is set, max.y for bit 1, max.z for bit 2
	for i in 0..8 {
		mesh.add_vertex(Vec3::new(
			if i & 1 == 0 { min.x } else { max.x },
			if i & 2 == 0 { min.y } else { max.y },
			if i & 4 == 0 { min.z } else { max.z },
		));
	}

	add_quad(&mut mesh, [0, 2, 3, 1]); // -z
	add_quad(&mut mesh, [4, 5, 7, 6]); // +z
	add_quad(&mut mesh, [0, 1, 5, 4]); // -y
	add_quad(&mut mesh, [2, 6, 7, 3]); // +y
	add_quad(&mut mesh, [0, 4, 6, 2]); // -x
	add_quad(&mut mesh, [1, 3, 7, 5]); // +x
	mesh
}
