use super::style::PathStyle;
use super::{Figure, FigureData};
use crate::vector::VectorPath;
use crate::DocumentError;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// A figure that encapsulates other figures. The children are rendered in
/// the order they are stored.
///
/// Groups participate in the figure model but deliberately not in hit testing
/// or outline extraction: `distance` and `outline_path` report
/// `UnsupportedOperation` so callers handle the gap explicitly instead of
/// receiving made-up geometry.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct GroupFigure {
	pub figures: Vec<Figure>,
}

impl GroupFigure {
	pub fn new(figures: Vec<Figure>) -> Self {
		Self { figures }
	}

	pub fn figures(&self) -> impl Iterator<Item = &Figure> {
		self.figures.iter()
	}
}

impl FigureData for GroupFigure {
	fn render(&self, svg: &mut String, transform: DAffine2, _style: &PathStyle) {
		for figure in &self.figures {
			if !figure.visible {
				continue;
			}
			figure.data.inner().render(svg, transform * figure.local_transform(), &figure.style);
		}
	}

	fn outline_path(&self) -> Result<VectorPath, DocumentError> {
		Err(DocumentError::UnsupportedOperation)
	}

	/// Groups never absorb; the caller tracks the matrix so children keep
	/// their own intrinsic geometry.
	fn transform(&mut self, _transform: DAffine2) -> bool {
		false
	}

	fn bounding_box(&self, transform: DAffine2) -> Option<[DVec2; 2]> {
		self.figures
			.iter()
			.filter_map(|figure| figure.data.inner().bounding_box(transform * figure.local_transform()))
			.reduce(|a, b| [a[0].min(b[0]), a[1].max(b[1])])
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layers::{FigureDataType, RectangleFigure};

	#[test]
	fn distance_reports_the_capability_gap() {
		let group = GroupFigure::default();
		assert_eq!(group.distance(DVec2::ZERO, DAffine2::IDENTITY, false), Err(DocumentError::UnsupportedOperation));
	}

	#[test]
	fn bounds_union_the_children() {
		let a = Figure::new(1, FigureDataType::Rectangle(RectangleFigure::new(DVec2::ZERO, DVec2::splat(5.))), Default::default());
		let b = Figure::new(2, FigureDataType::Rectangle(RectangleFigure::new(DVec2::splat(10.), DVec2::splat(5.))), Default::default());
		let group = GroupFigure::new(vec![a, b]);
		assert_eq!(group.bounding_box(DAffine2::IDENTITY), Some([DVec2::ZERO, DVec2::splat(15.)]));
	}
}
