pub mod ellipse_figure;
pub mod group_figure;
pub mod layer;
pub mod path_figure;
pub mod rectangle_figure;
pub mod style;
pub mod text_figure;

pub use ellipse_figure::EllipseFigure;
pub use group_figure::GroupFigure;
pub use layer::Layer;
pub use path_figure::PathFigure;
pub use rectangle_figure::RectangleFigure;
pub use text_figure::TextFigure;

use crate::vector::VectorPath;
use crate::{DocumentError, FigureId};
use style::PathStyle;

use glam::DAffine2;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The behavior shared by every figure variant.
///
/// `transform` is a cooperative protocol, not fallible: `true` means the
/// matrix was absorbed into the intrinsic geometry, `false` means the caller
/// must keep tracking it in the figure's `transform` field.
pub trait FigureData {
	fn render(&self, svg: &mut String, transform: DAffine2, style: &PathStyle);

	/// The intrinsic outline. Variants without one (groups) report
	/// `UnsupportedOperation` instead of inventing geometry.
	fn outline_path(&self) -> Result<VectorPath, DocumentError>;

	/// Absorb the transform into intrinsic geometry, or reject it.
	fn transform(&mut self, transform: DAffine2) -> bool;

	fn bounding_box(&self, transform: DAffine2) -> Option<[DVec2; 2]> {
		self.outline_path().ok()?.transformed(transform).bounding_box()
	}

	/// Signed distance from `point` in the space `transform` maps into;
	/// at most zero means the point is inside.
	fn distance(&self, point: DVec2, transform: DAffine2, filled: bool) -> Result<f64, DocumentError> {
		Ok(self.outline_path()?.transformed(transform).distance(point, filled))
	}

	/// Corner handle positions used for drag-to-create resizing
	/// (0 = top left, continuing clockwise).
	fn handle_position(&self, _index: usize) -> Option<DVec2> {
		None
	}

	fn set_handle_position(&mut self, _index: usize, _position: DVec2) {}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum FigureDataType {
	Rectangle(RectangleFigure),
	Ellipse(EllipseFigure),
	Path(PathFigure),
	Group(GroupFigure),
	Text(TextFigure),
}

impl FigureDataType {
	pub fn inner(&self) -> &dyn FigureData {
		match self {
			FigureDataType::Rectangle(rectangle) => rectangle,
			FigureDataType::Ellipse(ellipse) => ellipse,
			FigureDataType::Path(path) => path,
			FigureDataType::Group(group) => group,
			FigureDataType::Text(text) => text,
		}
	}

	pub fn inner_mut(&mut self) -> &mut dyn FigureData {
		match self {
			FigureDataType::Rectangle(rectangle) => rectangle,
			FigureDataType::Ellipse(ellipse) => ellipse,
			FigureDataType::Path(path) => path,
			FigureDataType::Group(group) => group,
			FigureDataType::Text(text) => text,
		}
	}

	pub fn is_group(&self) -> bool {
		matches!(self, FigureDataType::Group(_))
	}
}

/// A drawable entity in a layer.
///
/// Intrinsic geometry is always pre-transform; `transform` is only present
/// when a matrix could not be absorbed (a rotated rectangle, for example) and
/// rendering composes the two.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Figure {
	pub id: FigureId,
	pub visible: bool,
	pub name: Option<String>,
	pub data: FigureDataType,
	pub transform: Option<DAffine2>,
	pub style: PathStyle,
}

impl Figure {
	pub fn new(id: FigureId, data: FigureDataType, style: PathStyle) -> Self {
		Self {
			id,
			visible: true,
			name: None,
			data,
			transform: None,
			style,
		}
	}

	pub fn local_transform(&self) -> DAffine2 {
		self.transform.unwrap_or(DAffine2::IDENTITY)
	}

	/// Apply a transform in the figure's outer space. Returns whether the
	/// intrinsic geometry absorbed it. Once a figure tracks a matrix, all
	/// further transforms compose onto that matrix: folding them beneath it
	/// would change the geometry.
	pub fn apply_transform(&mut self, transform: DAffine2) -> bool {
		match self.transform {
			Some(existing) => {
				self.transform = Some(transform * existing);
				false
			}
			None => {
				if self.data.inner_mut().transform(transform) {
					true
				} else {
					self.transform = Some(transform);
					false
				}
			}
		}
	}

	pub fn bounding_box(&self) -> Option<[DVec2; 2]> {
		self.data.inner().bounding_box(self.local_transform())
	}

	/// Bounds of the intrinsic geometry, before the tracked matrix.
	pub fn intrinsic_bounding_box(&self) -> Option<[DVec2; 2]> {
		self.data.inner().bounding_box(DAffine2::IDENTITY)
	}

	pub fn distance(&self, point: DVec2) -> Result<f64, DocumentError> {
		self.data.inner().distance(point, self.local_transform(), self.style.is_filled())
	}

	pub fn outline_path(&self) -> Result<VectorPath, DocumentError> {
		self.data.inner().outline_path()
	}

	/// The outline with the tracked matrix applied.
	pub fn viewport_outline_path(&self) -> Result<VectorPath, DocumentError> {
		Ok(self.outline_path()?.transformed(self.local_transform()))
	}

	pub fn render(&self, svg: &mut String) {
		if !self.visible {
			return;
		}
		self.data.inner().render(svg, self.local_transform(), &self.style);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layers::style::{Fill, Stroke};
	use crate::color::Color;

	fn rect_figure() -> Figure {
		Figure::new(
			1,
			FigureDataType::Rectangle(RectangleFigure::new(DVec2::new(10., 10.), DVec2::new(20., 30.))),
			PathStyle::new(Some(Stroke::new(Color::BLACK, 1.)), Some(Fill::new(Color::WHITE))),
		)
	}

	#[test]
	fn translate_and_scale_is_absorbed() {
		let mut figure = rect_figure();
		let absorbed = figure.apply_transform(DAffine2::from_translation(DVec2::new(5., 0.)));
		assert!(absorbed);
		assert!(figure.transform.is_none());
		assert_eq!(figure.bounding_box(), Some([DVec2::new(15., 10.), DVec2::new(35., 40.)]));
	}

	#[test]
	fn rotation_is_tracked_not_absorbed() {
		let mut figure = rect_figure();
		let rotation = DAffine2::from_angle(std::f64::consts::FRAC_PI_4);
		let absorbed = figure.apply_transform(rotation);
		assert!(!absorbed);
		assert_eq!(figure.transform, Some(rotation));
		// Intrinsic geometry is untouched
		assert_eq!(figure.intrinsic_bounding_box(), Some([DVec2::new(10., 10.), DVec2::new(30., 40.)]));
	}

	#[test]
	fn transforms_after_tracking_compose_onto_the_matrix() {
		let mut figure = rect_figure();
		let rotation = DAffine2::from_angle(std::f64::consts::FRAC_PI_4);
		figure.apply_transform(rotation);
		// Even a pure translation must not touch intrinsic geometry now
		let absorbed = figure.apply_transform(DAffine2::from_translation(DVec2::X));
		assert!(!absorbed);
		assert_eq!(figure.transform, Some(DAffine2::from_translation(DVec2::X) * rotation));
		assert_eq!(figure.intrinsic_bounding_box(), Some([DVec2::new(10., 10.), DVec2::new(30., 40.)]));
	}

	#[test]
	fn distance_is_negative_inside_a_filled_figure() {
		let figure = rect_figure();
		assert!(figure.distance(DVec2::new(20., 25.)).unwrap() < 0.);
		assert!(figure.distance(DVec2::new(50., 25.)).unwrap() > 0.);
	}
}
