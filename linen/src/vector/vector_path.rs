use super::anchor::Anchor;
use super::manipulator::ManipulatorType;
use crate::intersection::bez_path_distance;

use glam::{DAffine2, DVec2};
use kurbo::{BezPath, PathEl};
use serde::{Deserialize, Serialize};

/// A path as a sequence of typed anchors. Whether the path loops back onto
/// its first anchor is carried by `closed` rather than by a terminator
/// anchor; the closing segment is curved whenever the boundary anchors still
/// carry handles for it.
#[derive(PartialEq, Clone, Debug, Default, Serialize, Deserialize)]
pub struct VectorPath {
	pub anchors: Vec<Anchor>,
	pub closed: bool,
}

impl VectorPath {
	pub fn new() -> Self {
		Self::default()
	}

	/// A closed rectangle with `p1` and `p2` as opposite corners.
	pub fn new_rect(p1: DVec2, p2: DVec2) -> Self {
		VectorPath {
			anchors: vec![Anchor::new(p1), Anchor::new(DVec2::new(p1.x, p2.y)), Anchor::new(p2), Anchor::new(DVec2::new(p2.x, p1.y))],
			closed: true,
		}
	}

	/// A closed ellipse around `center`, approximated by four cubic arcs.
	pub fn new_ellipse(center: DVec2, radii: DVec2) -> Self {
		// Distance of the cubic control points from each cardinal anchor
		const KAPPA: f64 = 0.552_284_749_830_793_4;
		let handle = radii * KAPPA;

		let cardinal = |offset: DVec2, tangent: DVec2| {
			let anchor = center + offset;
			Anchor::new_with_handles(anchor, anchor - tangent, anchor + tangent).with_mirroring(true, true)
		};

		VectorPath {
			anchors: vec![
				cardinal(DVec2::new(radii.x, 0.), DVec2::new(0., handle.y)),
				cardinal(DVec2::new(0., radii.y), DVec2::new(-handle.x, 0.)),
				cardinal(DVec2::new(-radii.x, 0.), DVec2::new(0., -handle.y)),
				cardinal(DVec2::new(0., -radii.y), DVec2::new(handle.x, 0.)),
			],
			closed: true,
		}
	}

	pub fn new_line(p1: DVec2, p2: DVec2) -> Self {
		VectorPath {
			anchors: vec![Anchor::new(p1), Anchor::new(p2)],
			closed: false,
		}
	}

	pub fn new_poly_line(points: Vec<impl Into<DVec2>>) -> Self {
		VectorPath {
			anchors: points.into_iter().map(|point| Anchor::new(point.into())).collect(),
			closed: false,
		}
	}

	pub fn len(&self) -> usize {
		self.anchors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.anchors.is_empty()
	}

	pub fn anchor(&self, index: usize) -> Option<&Anchor> {
		self.anchors.get(index)
	}

	pub fn anchor_mut(&mut self, index: usize) -> Option<&mut Anchor> {
		self.anchors.get_mut(index)
	}

	pub fn push_anchor(&mut self, anchor: Anchor) {
		self.anchors.push(anchor);
	}

	pub fn last_anchor_mut(&mut self) -> Option<&mut Anchor> {
		self.anchors.last_mut()
	}

	pub fn first_anchor_position(&self) -> Option<DVec2> {
		self.anchors.first().map(|anchor| anchor.anchor_position())
	}

	/// Remap every control point through the affine. A pure coordinate remap,
	/// so applying a transform and its inverse round-trips the path.
	pub fn apply_affine(&mut self, transform: DAffine2) {
		for anchor in &mut self.anchors {
			anchor.transform(&transform);
		}
	}

	pub fn transformed(&self, transform: DAffine2) -> Self {
		let mut path = self.clone();
		path.apply_affine(transform);
		path
	}

	pub fn bounding_box(&self) -> Option<[DVec2; 2]> {
		if self.is_empty() {
			return None;
		}
		let kurbo::Rect { x0, y0, x1, y1 } = kurbo::Shape::bounding_box(&BezPath::from(self));
		Some([DVec2::new(x0, y0), DVec2::new(x1, y1)])
	}

	/// Signed distance from `point`: negative inside when treated as filled.
	pub fn distance(&self, point: DVec2, filled: bool) -> f64 {
		bez_path_distance(&BezPath::from(self), point, filled && self.closed)
	}

	pub fn to_svg(&self) -> String {
		BezPath::from(self).to_svg()
	}
}

impl From<&VectorPath> for BezPath {
	fn from(vector_path: &VectorPath) -> Self {
		let Some(first) = vector_path.anchors.first() else {
			return BezPath::new();
		};

		let mut elements = vec![PathEl::MoveTo(to_point(first.anchor_position()))];
		let segment = |from: &Anchor, to: &Anchor| {
			let out_handle = from.position(ManipulatorType::OutHandle);
			let in_handle = to.position(ManipulatorType::InHandle);
			match (out_handle, in_handle) {
				(None, None) => PathEl::LineTo(to_point(to.anchor_position())),
				// A one-sided cubic degenerates the absent control point onto
				// its neighboring anchor
				(Some(out), None) => PathEl::CurveTo(to_point(out), to_point(to.anchor_position()), to_point(to.anchor_position())),
				(None, Some(in_handle)) => PathEl::CurveTo(to_point(from.anchor_position()), to_point(in_handle), to_point(to.anchor_position())),
				(Some(out), Some(in_handle)) => PathEl::CurveTo(to_point(out), to_point(in_handle), to_point(to.anchor_position())),
			}
		};

		for window in vector_path.anchors.windows(2) {
			elements.push(segment(&window[0], &window[1]));
		}
		if vector_path.closed {
			if let Some(last) = vector_path.anchors.last() {
				// A curved closing segment when either boundary anchor still
				// shapes it; a bare ClosePath is already the straight edge.
				let has_curved_close = last.position(ManipulatorType::OutHandle).is_some() || first.position(ManipulatorType::InHandle).is_some();
				if vector_path.anchors.len() > 1 && has_curved_close {
					elements.push(segment(last, first));
				}
			}
			elements.push(PathEl::ClosePath);
		}
		BezPath::from_vec(elements)
	}
}

impl<T: Iterator<Item = PathEl>> From<T> for VectorPath {
	fn from(path: T) -> Self {
		let mut vector_path = VectorPath::new();
		for element in path {
			match element {
				PathEl::MoveTo(point) => vector_path.push_anchor(Anchor::new(from_point(point))),
				PathEl::LineTo(point) => vector_path.push_anchor(Anchor::new(from_point(point))),
				PathEl::QuadTo(handle, point) => {
					if let Some(last) = vector_path.last_anchor_mut() {
						last.set_point_position(ManipulatorType::OutHandle, from_point(handle));
					}
					let mut anchor = Anchor::new(from_point(point));
					anchor.set_point_position(ManipulatorType::InHandle, from_point(handle));
					vector_path.push_anchor(anchor);
				}
				PathEl::CurveTo(out_handle, in_handle, point) => {
					if let Some(last) = vector_path.last_anchor_mut() {
						last.set_point_position(ManipulatorType::OutHandle, from_point(out_handle));
					}
					let mut anchor = Anchor::new(from_point(point));
					anchor.set_point_position(ManipulatorType::InHandle, from_point(in_handle));
					vector_path.push_anchor(anchor);
				}
				PathEl::ClosePath => vector_path.closed = true,
			}
		}
		vector_path
	}
}

#[inline]
fn to_point(vec: DVec2) -> kurbo::Point {
	kurbo::Point::new(vec.x, vec.y)
}

#[inline]
fn from_point(point: kurbo::Point) -> DVec2 {
	DVec2::new(point.x, point.y)
}
