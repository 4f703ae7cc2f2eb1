use crate::EditorError;

use glam::DAffine2;
use kurbo::BezPath;
use linen::layers::Figure;
use linen::{Document, DocumentResponse, FigureId};

use std::collections::HashMap;
use std::fmt::Write;

/// One reconciled figure: the last computed viewport path and the SVG
/// element synthesized from it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
	pub path: BezPath,
	pub svg: String,
}

/// Maps figure identity to its cached render output, updated incrementally
/// from document change events so unchanged figures are never recomputed.
///
/// Transform events remap the cached path in place instead of re-deriving it
/// from the figure; that is sound because a path transform is a pure
/// coordinate remap. Deleted figures are purged immediately: figure ids are
/// never reused, so the entry could never be referenced again, only leak.
#[derive(Debug, Default)]
pub struct FigureRenderCache {
	entries: HashMap<FigureId, CacheEntry>,
}

impl FigureRenderCache {
	pub fn entry(&self, figure_id: FigureId) -> Option<&CacheEntry> {
		self.entries.get(&figure_id)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Reconcile one change event into the cache.
	pub fn apply(&mut self, document: &Document, response: &DocumentResponse) -> Result<(), EditorError> {
		match response {
			DocumentResponse::FiguresAdded { layer_id, figure_ids } | DocumentResponse::FiguresUpdated { layer_id, figure_ids } => {
				for figure_id in figure_ids {
					let figure = document.figure(*layer_id, *figure_id)?;
					self.entries.insert(*figure_id, Self::compute_entry(figure)?);
				}
			}
			DocumentResponse::FiguresTransformed { layer_id, figure_ids, transform } => {
				let matrix = DAffine2::from_cols_array(transform);
				for figure_id in figure_ids {
					let figure = document.figure(*layer_id, *figure_id)?;
					let entry = self.entries.get_mut(figure_id).ok_or(EditorError::CacheMissing(*figure_id))?;
					entry.path.apply_affine(kurbo::Affine::new(matrix.to_cols_array()));
					entry.svg = Self::element_for(figure, &entry.path);
				}
			}
			DocumentResponse::FiguresDeleted { figure_ids, .. } => {
				for figure_id in figure_ids {
					self.entries.remove(figure_id);
				}
			}
			// Reordering only changes the z-walk, which reads the layer list
			DocumentResponse::FiguresReordered { .. } | DocumentResponse::DocumentChanged | DocumentResponse::LayerCreated { .. } => {}
			DocumentResponse::LayerDeleted { .. } => self.clear(),
		}
		Ok(())
	}

	fn compute_entry(figure: &Figure) -> Result<CacheEntry, EditorError> {
		if figure.data.is_group() {
			return Err(EditorError::UnsupportedFigure);
		}
		let outline = figure.viewport_outline_path().map_err(|_| EditorError::UnsupportedFigure)?;
		let path = BezPath::from(&outline);
		let svg = Self::element_for(figure, &path);
		Ok(CacheEntry { path, svg })
	}

	fn element_for(figure: &Figure, path: &BezPath) -> String {
		// Text cannot be re-synthesized from a path; fall back to the figure
		if matches!(figure.data, linen::layers::FigureDataType::Text(_)) {
			let mut svg = String::new();
			figure.render(&mut svg);
			return svg;
		}
		let mut svg = String::new();
		let _ = write!(svg, r#"<path d="{}"{} />"#, path.to_svg(), figure.style.render());
		svg
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use glam::DVec2;
	use linen::layers::style::PathStyle;
	use linen::layers::{FigureDataType, RectangleFigure};
	use linen::Operation;

	fn document_with_rect() -> (Document, FigureId) {
		let mut document = Document::default();
		document
			.handle_operation(&Operation::AddFigure {
				layer_id: 0,
				data: FigureDataType::Rectangle(RectangleFigure::new(DVec2::ZERO, DVec2::splat(10.))),
				style: PathStyle::default(),
			})
			.unwrap();
		(document, 0)
	}

	fn bounds_of(path: &BezPath) -> kurbo::Rect {
		kurbo::Shape::bounding_box(path)
	}

	#[test]
	fn transform_remaps_the_cached_path_in_place() {
		let (mut document, id) = document_with_rect();
		let mut cache = FigureRenderCache::default();
		cache
			.apply(&document, &DocumentResponse::FiguresAdded { layer_id: 0, figure_ids: vec![id] })
			.unwrap();

		let operation = Operation::TransformFigures {
			layer_id: 0,
			figure_ids: vec![id],
			transform: DAffine2::from_translation(DVec2::new(5., 0.)).to_cols_array(),
		};
		let responses = document.handle_operation(&operation).unwrap().unwrap();
		for response in &responses {
			cache.apply(&document, response).unwrap();
		}

		let cached = bounds_of(&cache.entry(id).unwrap().path);
		assert!((cached.x0 - 5.).abs() < 1e-9 && (cached.x1 - 15.).abs() < 1e-9);
	}

	#[test]
	fn deletion_purges_the_entry() {
		let (mut document, id) = document_with_rect();
		let mut cache = FigureRenderCache::default();
		cache
			.apply(&document, &DocumentResponse::FiguresAdded { layer_id: 0, figure_ids: vec![id] })
			.unwrap();
		assert_eq!(cache.len(), 1);

		let responses = document
			.handle_operation(&Operation::DeleteFigures { layer_id: 0, figure_ids: vec![id] })
			.unwrap()
			.unwrap();
		for response in &responses {
			cache.apply(&document, response).unwrap();
		}
		assert!(cache.is_empty());
	}

	#[test]
	fn transforming_an_uncached_figure_is_a_broken_invariant() {
		let (document, id) = document_with_rect();
		let mut cache = FigureRenderCache::default();
		let result = cache.apply(
			&document,
			&DocumentResponse::FiguresTransformed {
				layer_id: 0,
				figure_ids: vec![id],
				transform: DAffine2::IDENTITY.to_cols_array(),
			},
		);
		assert_eq!(result, Err(EditorError::CacheMissing(id)));
	}
}
