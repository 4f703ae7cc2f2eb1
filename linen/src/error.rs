use crate::{FigureId, LayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
	LayerNotFound(LayerId),
	FigureNotFound(LayerId, FigureId),
	IndexOutOfBounds,
	/// The figure variant does not support the requested query.
	/// This is the cooperative capability signal, not a broken invariant.
	UnsupportedOperation,
	InvalidPath,
	InvalidFile(String),
}

impl std::fmt::Display for DocumentError {
	fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			DocumentError::LayerNotFound(id) => write!(formatter, "Layer {id} not found"),
			DocumentError::FigureNotFound(layer, figure) => write!(formatter, "Figure {figure} not found in layer {layer}"),
			DocumentError::IndexOutOfBounds => write!(formatter, "Index out of bounds"),
			DocumentError::UnsupportedOperation => write!(formatter, "Operation unsupported by this figure type"),
			DocumentError::InvalidPath => write!(formatter, "Invalid path"),
			DocumentError::InvalidFile(message) => write!(formatter, "Invalid file: {message}"),
		}
	}
}

impl std::error::Error for DocumentError {}
