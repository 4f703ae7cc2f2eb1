use super::style::PathStyle;
use super::FigureData;
use crate::intersection::is_translate_and_scale;
use crate::vector::VectorPath;
use crate::DocumentError;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use std::fmt::Write;

/// An axis-aligned rectangle described by its origin corner and size, both in
/// intrinsic (pre-transform) space. A transiently negative size is legal
/// while a drag is in flight; `normalize` flips the origin afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RectangleFigure {
	pub origin: DVec2,
	pub size: DVec2,
}

impl RectangleFigure {
	pub fn new(origin: DVec2, size: DVec2) -> Self {
		Self { origin, size }
	}

	pub fn from_corners(p1: DVec2, p2: DVec2) -> Self {
		Self { origin: p1.min(p2), size: (p2 - p1).abs() }
	}

	pub fn corner(&self) -> DVec2 {
		self.origin + self.size
	}

	pub fn center(&self) -> DVec2 {
		self.origin + self.size / 2.
	}

	/// Flip the origin so the size is non-negative on both axes.
	pub fn normalize(&mut self) {
		let corner = self.corner();
		let origin = self.origin;
		self.origin = origin.min(corner);
		self.size = (corner - origin).abs();
	}
}

impl FigureData for RectangleFigure {
	fn render(&self, svg: &mut String, transform: DAffine2, style: &PathStyle) {
		let path = match self.outline_path() {
			Ok(path) => path.transformed(transform),
			Err(_) => return,
		};
		let _ = write!(svg, r#"<path d="{}"{} />"#, path.to_svg(), style.render());
	}

	fn outline_path(&self) -> Result<VectorPath, DocumentError> {
		Ok(VectorPath::new_rect(self.origin, self.corner()))
	}

	fn transform(&mut self, transform: DAffine2) -> bool {
		if !is_translate_and_scale(&transform) {
			return false;
		}
		let origin = transform.transform_point2(self.origin);
		let corner = transform.transform_point2(self.corner());
		self.origin = origin.min(corner);
		self.size = (corner - origin).abs();
		true
	}

	fn handle_position(&self, index: usize) -> Option<DVec2> {
		corner_handle(self.origin, self.size, index)
	}

	fn set_handle_position(&mut self, index: usize, position: DVec2) {
		let (origin, size) = move_corner_handle(self.origin, self.size, index, position);
		self.origin = origin;
		self.size = size;
	}
}

/// Corner positions shared by every box-shaped figure:
/// 0 = top left, 1 = top right, 2 = bottom right, 3 = bottom left.
pub fn corner_handle(origin: DVec2, size: DVec2, index: usize) -> Option<DVec2> {
	match index {
		0 => Some(origin),
		1 => Some(origin + DVec2::new(size.x, 0.)),
		2 => Some(origin + size),
		3 => Some(origin + DVec2::new(0., size.y)),
		_ => None,
	}
}

/// Move the indexed corner to `position`, keeping the opposite corner fixed.
/// The returned size may be negative while a drag crosses the fixed corner.
pub fn move_corner_handle(origin: DVec2, size: DVec2, index: usize, position: DVec2) -> (DVec2, DVec2) {
	let corner = origin + size;
	match index {
		0 => (position, corner - position),
		1 => (DVec2::new(origin.x, position.y), DVec2::new(position.x - origin.x, corner.y - position.y)),
		2 => (origin, position - origin),
		3 => (DVec2::new(position.x, origin.y), DVec2::new(corner.x - position.x, position.y - origin.y)),
		_ => (origin, size),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn dragging_the_far_corner_resizes() {
		let mut rectangle = RectangleFigure::new(DVec2::ZERO, DVec2::ZERO);
		rectangle.set_handle_position(2, DVec2::new(30., 20.));
		assert_eq!(rectangle.size, DVec2::new(30., 20.));
	}

	#[test]
	fn crossing_the_fixed_corner_then_normalizing_flips_the_origin() {
		let mut rectangle = RectangleFigure::new(DVec2::new(10., 10.), DVec2::ZERO);
		rectangle.set_handle_position(2, DVec2::new(4., 2.));
		assert_eq!(rectangle.size, DVec2::new(-6., -8.));
		rectangle.normalize();
		assert_eq!(rectangle.origin, DVec2::new(4., 2.));
		assert_eq!(rectangle.size, DVec2::new(6., 8.));
	}

	#[test]
	fn negative_scale_absorption_keeps_size_non_negative() {
		let mut rectangle = RectangleFigure::new(DVec2::new(1., 1.), DVec2::new(2., 2.));
		let flip = DAffine2::from_scale(DVec2::new(-1., 1.));
		assert!(rectangle.transform(flip));
		assert_eq!(rectangle.origin, DVec2::new(-3., 1.));
		assert_eq!(rectangle.size, DVec2::new(2., 2.));
	}
}
