use crate::consts::{CURVE_ACCURACY, F64PRECISION};

use glam::{DAffine2, DVec2};
use kurbo::{BezPath, Line, ParamCurveNearest, PathSeg, Point, Shape};

use std::ops::Mul;

/// A quadrilateral in viewport space, usually a transformed rectangle.
#[derive(Debug, Clone, Default, Copy)]
pub struct Quad([DVec2; 4]);

impl Quad {
	pub fn from_box(bbox: [DVec2; 2]) -> Self {
		let size = bbox[1] - bbox[0];
		Self([bbox[0], bbox[0] + size * DVec2::X, bbox[1], bbox[0] + size * DVec2::Y])
	}

	pub fn lines(&self) -> [Line; 4] {
		[
			Line::new(to_point(self.0[0]), to_point(self.0[1])),
			Line::new(to_point(self.0[1]), to_point(self.0[2])),
			Line::new(to_point(self.0[2]), to_point(self.0[3])),
			Line::new(to_point(self.0[3]), to_point(self.0[0])),
		]
	}

	pub fn path(&self) -> BezPath {
		let mut path = BezPath::new();
		path.move_to(to_point(self.0[0]));
		path.line_to(to_point(self.0[1]));
		path.line_to(to_point(self.0[2]));
		path.line_to(to_point(self.0[3]));
		path.close_path();
		path
	}

	pub fn bounding_box(&self) -> [DVec2; 2] {
		[
			self.0.into_iter().reduce(|a, b| a.min(b)).unwrap_or_default(),
			self.0.into_iter().reduce(|a, b| a.max(b)).unwrap_or_default(),
		]
	}

	pub fn center(&self) -> DVec2 {
		self.0.iter().sum::<DVec2>() / 4.
	}
}

impl Mul<Quad> for DAffine2 {
	type Output = Quad;

	fn mul(self, rhs: Quad) -> Self::Output {
		let mut output = Quad::default();
		for (i, point) in rhs.0.iter().enumerate() {
			output.0[i] = self.transform_point2(*point);
		}
		output
	}
}

fn to_point(vec: DVec2) -> Point {
	Point::new(vec.x, vec.y)
}

/// True when the matrix contains no rotation or shear terms, so a figure can
/// fold it into its intrinsic geometry instead of tracking it separately.
pub fn is_translate_and_scale(transform: &DAffine2) -> bool {
	transform.matrix2.x_axis.y.abs() < F64PRECISION && transform.matrix2.y_axis.x.abs() < F64PRECISION
}

/// Whether a path's outline touches the quad or either one encloses the other.
pub fn intersect_quad_bez_path(quad: Quad, shape: &BezPath, closed: bool) -> bool {
	// Outlines intersect
	if shape.segments().any(|segment| quad.lines().iter().any(|line| !segment.intersect_line(*line).is_empty())) {
		return true;
	}
	// The quad is entirely within the shape
	if closed && shape.contains(to_point(quad.0[0])) {
		return true;
	}

	// The shape is entirely within the quad
	get_arbitrary_point_on_path(shape).map(|shape_point| quad.path().contains(shape_point)).unwrap_or_default()
}

/// Exact containment: every corner of `bbox` lies inside `bounds`.
/// Partial overlap does not count, matching marquee selection semantics.
pub fn box_contains_box(bounds: [DVec2; 2], bbox: [DVec2; 2]) -> bool {
	let min = bounds[0].min(bounds[1]);
	let max = bounds[0].max(bounds[1]);
	bbox[0].x >= min.x && bbox[0].y >= min.y && bbox[1].x <= max.x && bbox[1].y <= max.y
}

/// Signed distance from `point` to the path: negative inside a closed filled
/// path, otherwise the distance to the nearest point on the outline.
pub fn bez_path_distance(shape: &BezPath, point: DVec2, filled: bool) -> f64 {
	let point = to_point(point);
	let distance = shape
		.segments()
		.map(|segment| match segment {
			PathSeg::Line(line) => line.nearest(point, CURVE_ACCURACY).distance_sq,
			PathSeg::Quad(quad) => quad.nearest(point, CURVE_ACCURACY).distance_sq,
			PathSeg::Cubic(cubic) => cubic.nearest(point, CURVE_ACCURACY).distance_sq,
		})
		.reduce(f64::min)
		.unwrap_or(f64::MAX)
		.sqrt();

	if filled && shape.contains(point) {
		-distance
	} else {
		distance
	}
}

pub fn get_arbitrary_point_on_path(path: &BezPath) -> Option<Point> {
	path.segments().next().map(|segment| match segment {
		PathSeg::Line(line) => line.p0,
		PathSeg::Quad(quad) => quad.p0,
		PathSeg::Cubic(cubic) => cubic.p0,
	})
}

#[cfg(test)]
mod test {
	use super::*;

	fn unit_rect_path() -> BezPath {
		Quad::from_box([DVec2::ZERO, DVec2::ONE]).path()
	}

	#[test]
	fn quad_transformed_by_affine() {
		let quad = DAffine2::from_translation(DVec2::new(10., 20.)) * Quad::from_box([DVec2::ZERO, DVec2::ONE]);
		assert_eq!(quad.bounding_box(), [DVec2::new(10., 20.), DVec2::new(11., 21.)]);
	}

	#[test]
	fn containment_requires_all_corners() {
		let marquee = [DVec2::ZERO, DVec2::splat(10.)];
		assert!(box_contains_box(marquee, [DVec2::splat(2.), DVec2::splat(8.)]));
		// Overlapping but sticking out on one side is not contained
		assert!(!box_contains_box(marquee, [DVec2::splat(5.), DVec2::splat(12.)]));
	}

	#[test]
	fn signed_distance_is_negative_inside() {
		let path = unit_rect_path();
		assert!(bez_path_distance(&path, DVec2::splat(0.5), true) < 0.);
		assert!((bez_path_distance(&path, DVec2::new(2., 0.5), true) - 1.).abs() < 1e-6);
		// An unfilled path is all outline, so the center is half a unit away
		assert!((bez_path_distance(&path, DVec2::splat(0.5), false) - 0.5).abs() < 1e-6);
	}

	#[test]
	fn translate_and_scale_classification() {
		assert!(is_translate_and_scale(&DAffine2::from_scale_angle_translation(DVec2::new(2., 3.), 0., DVec2::splat(4.))));
		assert!(!is_translate_and_scale(&DAffine2::from_angle(0.3)));
	}

	#[test]
	fn double_inverse_restores_a_nondegenerate_matrix() {
		let matrix = DAffine2::from_scale_angle_translation(DVec2::new(2., 0.5), 1.2, DVec2::new(-7., 13.));
		let twice = matrix.inverse().inverse();
		for (a, b) in matrix.to_cols_array().iter().zip(twice.to_cols_array().iter()) {
			assert!((a - b).abs() < 1e-9);
		}
	}
}
