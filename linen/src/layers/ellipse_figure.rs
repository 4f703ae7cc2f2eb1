use super::rectangle_figure::{corner_handle, move_corner_handle};
use super::style::PathStyle;
use super::FigureData;
use crate::intersection::is_translate_and_scale;
use crate::vector::VectorPath;
use crate::DocumentError;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use std::fmt::Write;

/// An axis-aligned ellipse (a circle when the radii agree), stored as center
/// and radii in intrinsic space.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EllipseFigure {
	pub center: DVec2,
	pub radii: DVec2,
}

impl EllipseFigure {
	pub fn new(center: DVec2, radii: DVec2) -> Self {
		Self { center, radii }
	}

	pub fn circle(center: DVec2, radius: f64) -> Self {
		Self::new(center, DVec2::splat(radius))
	}

	pub fn from_corners(p1: DVec2, p2: DVec2) -> Self {
		Self {
			center: (p1 + p2) / 2.,
			radii: ((p2 - p1) / 2.).abs(),
		}
	}

	fn bounding_origin(&self) -> DVec2 {
		self.center - self.radii
	}

	pub fn normalize(&mut self) {
		self.radii = self.radii.abs();
	}
}

impl FigureData for EllipseFigure {
	fn render(&self, svg: &mut String, transform: DAffine2, style: &PathStyle) {
		let path = match self.outline_path() {
			Ok(path) => path.transformed(transform),
			Err(_) => return,
		};
		let _ = write!(svg, r#"<path d="{}"{} />"#, path.to_svg(), style.render());
	}

	fn outline_path(&self) -> Result<VectorPath, DocumentError> {
		Ok(VectorPath::new_ellipse(self.center, self.radii))
	}

	fn transform(&mut self, transform: DAffine2) -> bool {
		if !is_translate_and_scale(&transform) {
			return false;
		}
		self.center = transform.transform_point2(self.center);
		self.radii = (transform.transform_vector2(self.radii)).abs();
		true
	}

	fn handle_position(&self, index: usize) -> Option<DVec2> {
		corner_handle(self.bounding_origin(), self.radii * 2., index)
	}

	fn set_handle_position(&mut self, index: usize, position: DVec2) {
		let (origin, size) = move_corner_handle(self.bounding_origin(), self.radii * 2., index, position);
		self.center = origin + size / 2.;
		self.radii = size / 2.;
	}
}
