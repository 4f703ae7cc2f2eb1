use super::{Figure, FigureDataType};
use crate::intersection::box_contains_box;
use crate::layers::style::PathStyle;
use crate::{DocumentError, FigureId, LayerId};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An ordered collection of figures. List order is z-order: the last figure
/// is topmost, and hit testing walks from the end. A figure belongs to
/// exactly one layer's list at a time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Layer {
	pub id: LayerId,
	pub name: Option<String>,
	pub visible: bool,
	figures: Vec<Figure>,
	next_figure_id: FigureId,
}

impl Layer {
	pub fn new(id: LayerId) -> Self {
		Self {
			id,
			name: None,
			visible: true,
			figures: Vec::new(),
			next_figure_id: 0,
		}
	}

	/// Add a figure on top of the stack, assigning the next monotonic id.
	/// Ids are never reused, even after deletion.
	pub fn add_figure(&mut self, data: FigureDataType, style: PathStyle) -> FigureId {
		let id = self.next_figure_id;
		self.next_figure_id += 1;
		self.figures.push(Figure::new(id, data, style));
		id
	}

	pub fn figure(&self, figure_id: FigureId) -> Result<&Figure, DocumentError> {
		self.figures.iter().find(|figure| figure.id == figure_id).ok_or(DocumentError::FigureNotFound(self.id, figure_id))
	}

	pub fn figure_mut(&mut self, figure_id: FigureId) -> Result<&mut Figure, DocumentError> {
		let layer_id = self.id;
		self.figures.iter_mut().find(|figure| figure.id == figure_id).ok_or(DocumentError::FigureNotFound(layer_id, figure_id))
	}

	pub fn remove_figure(&mut self, figure_id: FigureId) -> Result<Figure, DocumentError> {
		let index = self.position_of(figure_id).ok_or(DocumentError::FigureNotFound(self.id, figure_id))?;
		Ok(self.figures.remove(index))
	}

	pub fn position_of(&self, figure_id: FigureId) -> Option<usize> {
		self.figures.iter().position(|figure| figure.id == figure_id)
	}

	pub fn figures(&self) -> impl Iterator<Item = &Figure> {
		self.figures.iter()
	}

	pub fn figures_mut(&mut self) -> impl Iterator<Item = &mut Figure> {
		self.figures.iter_mut()
	}

	pub fn figure_ids(&self) -> Vec<FigureId> {
		self.figures.iter().map(|figure| figure.id).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.figures.is_empty()
	}

	/// The topmost visible figure within `tolerance` of `point`.
	/// Figures that opt out of hit testing (groups) are skipped.
	pub fn figure_at(&self, point: DVec2, tolerance: f64) -> Option<FigureId> {
		self.figures
			.iter()
			.rev()
			.filter(|figure| figure.visible)
			.find(|figure| figure.distance(point).map(|distance| distance <= tolerance).unwrap_or(false))
			.map(|figure| figure.id)
	}

	/// Figures entirely contained in `bounds`, bottom to top. Exact
	/// containment: partially overlapping figures are not included.
	pub fn figures_contained_in(&self, bounds: [DVec2; 2]) -> Vec<FigureId> {
		self.figures
			.iter()
			.filter(|figure| figure.visible)
			.filter(|figure| figure.bounding_box().map(|bbox| box_contains_box(bounds, bbox)).unwrap_or(false))
			.map(|figure| figure.id)
			.collect()
	}

	pub fn combined_bounding_box<'a>(&self, figure_ids: impl Iterator<Item = &'a FigureId>) -> Option<[DVec2; 2]> {
		figure_ids
			.filter_map(|id| self.figure(*id).ok())
			.filter_map(|figure| figure.bounding_box())
			.reduce(|a, b| [a[0].min(b[0]), a[1].max(b[1])])
	}

	pub fn bring_to_front(&mut self, figure_ids: &[FigureId]) {
		let (mut lifted, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.figures).into_iter().partition(|figure| figure_ids.contains(&figure.id));
		self.figures = rest;
		self.figures.append(&mut lifted);
	}

	pub fn send_to_back(&mut self, figure_ids: &[FigureId]) {
		let (lifted, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.figures).into_iter().partition(|figure| figure_ids.contains(&figure.id));
		self.figures = lifted;
		self.figures.extend(rest);
	}

	/// Move each listed figure one step towards the top, blocked by other
	/// listed figures so relative order within the set is stable.
	pub fn bring_forward(&mut self, figure_ids: &[FigureId]) {
		for index in (0..self.figures.len().saturating_sub(1)).rev() {
			if figure_ids.contains(&self.figures[index].id) && !figure_ids.contains(&self.figures[index + 1].id) {
				self.figures.swap(index, index + 1);
			}
		}
	}

	pub fn send_backward(&mut self, figure_ids: &[FigureId]) {
		for index in 1..self.figures.len() {
			if figure_ids.contains(&self.figures[index].id) && !figure_ids.contains(&self.figures[index - 1].id) {
				self.figures.swap(index, index - 1);
			}
		}
	}

	pub fn render(&self, svg: &mut String) {
		if !self.visible {
			return;
		}
		for figure in &self.figures {
			figure.render(svg);
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layers::RectangleFigure;

	fn layer_with_rects(count: usize) -> Layer {
		let mut layer = Layer::new(0);
		for i in 0..count {
			layer.add_figure(
				FigureDataType::Rectangle(RectangleFigure::new(DVec2::splat(i as f64 * 10.), DVec2::splat(5.))),
				PathStyle::default(),
			);
		}
		layer
	}

	#[test]
	fn ids_are_monotonic_and_never_reused() {
		let mut layer = layer_with_rects(3);
		layer.remove_figure(2).unwrap();
		let id = layer.add_figure(FigureDataType::Rectangle(RectangleFigure::new(DVec2::ZERO, DVec2::ONE)), PathStyle::default());
		assert_eq!(id, 3);
	}

	#[test]
	fn hit_testing_prefers_the_topmost_figure() {
		let mut layer = Layer::new(0);
		let style = PathStyle::new(None, Some(crate::layers::style::Fill::new(crate::color::Color::BLACK)));
		let bottom = layer.add_figure(FigureDataType::Rectangle(RectangleFigure::new(DVec2::ZERO, DVec2::splat(20.))), style);
		let top = layer.add_figure(FigureDataType::Rectangle(RectangleFigure::new(DVec2::splat(5.), DVec2::splat(20.))), style);

		assert_eq!(layer.figure_at(DVec2::splat(10.), 0.), Some(top));
		assert_eq!(layer.figure_at(DVec2::splat(2.), 0.), Some(bottom));
		assert_eq!(layer.figure_at(DVec2::splat(100.), 0.), None);
	}

	#[test]
	fn reordering_preserves_relative_order() {
		let mut layer = layer_with_rects(4);
		layer.bring_to_front(&[0, 1]);
		assert_eq!(layer.figure_ids(), vec![2, 3, 0, 1]);
		layer.send_backward(&[0, 1]);
		assert_eq!(layer.figure_ids(), vec![2, 0, 1, 3]);
		layer.bring_forward(&[2]);
		assert_eq!(layer.figure_ids(), vec![0, 2, 1, 3]);
	}
}
