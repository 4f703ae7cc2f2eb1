use super::style::PathStyle;
use super::FigureData;
use crate::vector::VectorPath;
use crate::DocumentError;

use glam::DAffine2;
use serde::{Deserialize, Serialize};

use std::fmt::Write;

/// A free-form bezier path figure.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PathFigure {
	pub path: VectorPath,
}

impl PathFigure {
	pub fn new(path: VectorPath) -> Self {
		Self { path }
	}
}

impl FigureData for PathFigure {
	fn render(&self, svg: &mut String, transform: DAffine2, style: &PathStyle) {
		let path = self.path.transformed(transform);
		let _ = write!(svg, r#"<path d="{}"{} />"#, path.to_svg(), style.render());
	}

	fn outline_path(&self) -> Result<VectorPath, DocumentError> {
		Ok(self.path.clone())
	}

	/// Paths absorb every affine by remapping their coordinates.
	fn transform(&mut self, transform: DAffine2) -> bool {
		self.path.apply_affine(transform);
		true
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use glam::DVec2;

	#[test]
	fn any_affine_is_absorbed() {
		let mut figure = PathFigure::new(VectorPath::new_rect(DVec2::ZERO, DVec2::splat(10.)));
		let transform = DAffine2::from_angle(std::f64::consts::FRAC_PI_2);
		assert!(figure.transform(transform));
		let bounds = figure.bounding_box(DAffine2::IDENTITY).unwrap();
		assert!((bounds[0] - DVec2::new(-10., 0.)).length() < 1e-9);
	}
}
