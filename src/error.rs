use std::path::PathBuf;
use thiserror::Error;

/// Consistency errors reported by [`Mesh::double_check`](crate::mesh::Mesh::double_check)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
	#[error("Bad Trimesh: Wrong number of vertex colors.")]
	WrongColorCount { vertices: usize, colors: usize },

	#[error("Bad Trimesh: Wrong number of UV coordinates.")]
	WrongUvCount { vertices: usize, uvs: usize },

	#[error("Bad Trimesh: Wrong number of normals.")]
	WrongNormalCount { vertices: usize, normals: usize },
}

/// A texture map could not be read or decoded
#[derive(Debug, Error)]
#[error("Unable to load texture map '{}'.", .filename.display())]
pub struct TextureLoadError {
	pub filename: PathBuf,
	#[source]
	pub source: image::ImageError,
}
