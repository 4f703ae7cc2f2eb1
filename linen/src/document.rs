use crate::layers::{Figure, FigureDataType, Layer};
use crate::{DocumentError, DocumentResponse, Operation};

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

pub type LayerId = u64;
pub type FigureId = u64;

/// The document: an ordered list of layers, each an ordered list of figures.
/// All mutation goes through [`Document::handle_operation`], which returns
/// the change events observers react to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Document {
	layers: Vec<Layer>,
	next_layer_id: LayerId,
}

impl Default for Document {
	fn default() -> Self {
		Self {
			layers: vec![Layer::new(0)],
			next_layer_id: 1,
		}
	}
}

impl Document {
	pub fn layer(&self, layer_id: LayerId) -> Result<&Layer, DocumentError> {
		self.layers.iter().find(|layer| layer.id == layer_id).ok_or(DocumentError::LayerNotFound(layer_id))
	}

	pub fn layer_mut(&mut self, layer_id: LayerId) -> Result<&mut Layer, DocumentError> {
		self.layers.iter_mut().find(|layer| layer.id == layer_id).ok_or(DocumentError::LayerNotFound(layer_id))
	}

	pub fn layers(&self) -> impl Iterator<Item = &Layer> {
		self.layers.iter()
	}

	pub fn figure(&self, layer_id: LayerId, figure_id: FigureId) -> Result<&Figure, DocumentError> {
		self.layer(layer_id)?.figure(figure_id)
	}

	pub fn serialize_document(&self) -> String {
		serde_json::to_string(self).expect("Failed to serialize the document")
	}

	pub fn with_content(serialized_content: &str) -> Result<Self, DocumentError> {
		serde_json::from_str(serialized_content).map_err(|e| DocumentError::InvalidFile(e.to_string()))
	}

	/// The topmost figure within `tolerance` of `point` on the given layer.
	pub fn figure_at(&self, layer_id: LayerId, point: DVec2, tolerance: f64) -> Result<Option<FigureId>, DocumentError> {
		Ok(self.layer(layer_id)?.figure_at(point, tolerance))
	}

	pub fn figures_contained_in(&self, layer_id: LayerId, bounds: [DVec2; 2]) -> Result<Vec<FigureId>, DocumentError> {
		Ok(self.layer(layer_id)?.figures_contained_in(bounds))
	}

	pub fn combined_bounding_box(&self, layer_id: LayerId, figure_ids: &[FigureId]) -> Option<[DVec2; 2]> {
		self.layer(layer_id).ok()?.combined_bounding_box(figure_ids.iter())
	}

	pub fn render_root(&self) -> String {
		let mut svg = String::new();
		for layer in &self.layers {
			layer.render(&mut svg);
		}
		svg
	}

	/// Mutate the document by applying the `operation` to it. The returned
	/// responses describe every change an observer could care about; `None`
	/// means the operation was a no-op.
	pub fn handle_operation(&mut self, operation: &Operation) -> Result<Option<Vec<DocumentResponse>>, DocumentError> {
		use DocumentResponse::*;

		let responses = match operation {
			Operation::AddFigure { layer_id, data, style } => {
				let layer = self.layer_mut(*layer_id)?;
				let figure_id = layer.add_figure(data.clone(), *style);

				Some(vec![
					DocumentChanged,
					FiguresAdded {
						layer_id: *layer_id,
						figure_ids: vec![figure_id],
					},
				])
			}
			Operation::TransformFigures { layer_id, figure_ids, transform } => {
				let matrix = DAffine2::from_cols_array(transform);
				let layer = self.layer_mut(*layer_id)?;
				// Validate up front so a missing id leaves the layer untouched
				for figure_id in figure_ids {
					layer.figure(*figure_id)?;
				}
				for figure_id in figure_ids {
					layer.figure_mut(*figure_id)?.apply_transform(matrix);
				}

				Some(vec![
					DocumentChanged,
					FiguresTransformed {
						layer_id: *layer_id,
						figure_ids: figure_ids.clone(),
						transform: *transform,
					},
				])
			}
			Operation::DeleteFigures { layer_id, figure_ids } => {
				let layer = self.layer_mut(*layer_id)?;
				for figure_id in figure_ids {
					layer.figure(*figure_id)?;
				}
				for figure_id in figure_ids {
					layer.remove_figure(*figure_id)?;
				}

				Some(vec![
					DocumentChanged,
					FiguresDeleted {
						layer_id: *layer_id,
						figure_ids: figure_ids.clone(),
					},
				])
			}
			Operation::SetPathGeometry { layer_id, figure_id, path } => {
				let figure = self.layer_mut(*layer_id)?.figure_mut(*figure_id)?;
				match &mut figure.data {
					FigureDataType::Path(path_figure) => path_figure.path = path.clone(),
					_ => return Err(DocumentError::UnsupportedOperation),
				}

				Some(vec![
					DocumentChanged,
					FiguresUpdated {
						layer_id: *layer_id,
						figure_ids: vec![*figure_id],
					},
				])
			}
			Operation::SetFigureStyle { layer_id, figure_id, style } => {
				self.layer_mut(*layer_id)?.figure_mut(*figure_id)?.style = *style;

				Some(vec![
					DocumentChanged,
					FiguresUpdated {
						layer_id: *layer_id,
						figure_ids: vec![*figure_id],
					},
				])
			}
			Operation::SetFigureVisibility { layer_id, figure_id, visible } => {
				self.layer_mut(*layer_id)?.figure_mut(*figure_id)?.visible = *visible;

				Some(vec![
					DocumentChanged,
					FiguresUpdated {
						layer_id: *layer_id,
						figure_ids: vec![*figure_id],
					},
				])
			}
			Operation::BringToFront { layer_id, figure_ids } => {
				self.layer_mut(*layer_id)?.bring_to_front(figure_ids);
				Some(vec![DocumentChanged, FiguresReordered { layer_id: *layer_id }])
			}
			Operation::BringForward { layer_id, figure_ids } => {
				self.layer_mut(*layer_id)?.bring_forward(figure_ids);
				Some(vec![DocumentChanged, FiguresReordered { layer_id: *layer_id }])
			}
			Operation::SendBackward { layer_id, figure_ids } => {
				self.layer_mut(*layer_id)?.send_backward(figure_ids);
				Some(vec![DocumentChanged, FiguresReordered { layer_id: *layer_id }])
			}
			Operation::SendToBack { layer_id, figure_ids } => {
				self.layer_mut(*layer_id)?.send_to_back(figure_ids);
				Some(vec![DocumentChanged, FiguresReordered { layer_id: *layer_id }])
			}
			Operation::AddLayer { name } => {
				let layer_id = self.next_layer_id;
				self.next_layer_id += 1;
				log::debug!("Creating layer {layer_id} ({name:?})");
				let mut layer = Layer::new(layer_id);
				layer.name = name.clone();
				self.layers.push(layer);

				Some(vec![DocumentChanged, LayerCreated { layer_id }])
			}
			Operation::DeleteLayer { layer_id } => {
				let index = self.layers.iter().position(|layer| layer.id == *layer_id).ok_or(DocumentError::LayerNotFound(*layer_id))?;
				self.layers.remove(index);

				Some(vec![DocumentChanged, LayerDeleted { layer_id: *layer_id }])
			}
		};
		Ok(responses)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layers::style::PathStyle;
	use crate::layers::RectangleFigure;

	fn add_rect(document: &mut Document, origin: DVec2, size: DVec2) -> FigureId {
		let responses = document
			.handle_operation(&Operation::AddFigure {
				layer_id: 0,
				data: FigureDataType::Rectangle(RectangleFigure::new(origin, size)),
				style: PathStyle::default(),
			})
			.unwrap()
			.unwrap();
		match &responses[1] {
			DocumentResponse::FiguresAdded { figure_ids, .. } => figure_ids[0],
			other => panic!("unexpected response {other}"),
		}
	}

	#[test]
	fn add_and_transform_round_trip() {
		let mut document = Document::default();
		let id = add_rect(&mut document, DVec2::ZERO, DVec2::splat(10.));

		let translate = DAffine2::from_translation(DVec2::new(5., 5.));
		let responses = document
			.handle_operation(&Operation::TransformFigures {
				layer_id: 0,
				figure_ids: vec![id],
				transform: translate.to_cols_array(),
			})
			.unwrap()
			.unwrap();
		assert!(matches!(responses[1], DocumentResponse::FiguresTransformed { .. }));

		let bounds = document.figure(0, id).unwrap().bounding_box().unwrap();
		assert_eq!(bounds, [DVec2::splat(5.), DVec2::splat(15.)]);
	}

	#[test]
	fn unknown_layer_is_an_error() {
		let mut document = Document::default();
		let result = document.handle_operation(&Operation::DeleteFigures { layer_id: 7, figure_ids: vec![] });
		assert_eq!(result, Err(DocumentError::LayerNotFound(7)));
	}

	#[test]
	fn failed_transform_leaves_the_document_untouched() {
		let mut document = Document::default();
		let id = add_rect(&mut document, DVec2::ZERO, DVec2::splat(10.));
		let before = document.clone();

		let result = document.handle_operation(&Operation::TransformFigures {
			layer_id: 0,
			figure_ids: vec![id, 999],
			transform: DAffine2::from_translation(DVec2::ONE).to_cols_array(),
		});
		assert!(result.is_err());
		assert_eq!(document, before);
	}

	#[test]
	fn serialization_round_trips() {
		let mut document = Document::default();
		add_rect(&mut document, DVec2::new(1., 2.), DVec2::new(3., 4.));
		let serialized = document.serialize_document();
		let deserialized = Document::with_content(&serialized).unwrap();
		assert_eq!(document, deserialized);
	}

	#[test]
	fn delete_emits_the_deleted_ids() {
		let mut document = Document::default();
		let a = add_rect(&mut document, DVec2::ZERO, DVec2::ONE);
		let b = add_rect(&mut document, DVec2::ONE, DVec2::ONE);

		let responses = document
			.handle_operation(&Operation::DeleteFigures {
				layer_id: 0,
				figure_ids: vec![a, b],
			})
			.unwrap()
			.unwrap();
		assert!(matches!(&responses[1], DocumentResponse::FiguresDeleted { figure_ids, .. } if figure_ids == &vec![a, b]));
		assert!(document.layer(0).unwrap().is_empty());
	}
}
