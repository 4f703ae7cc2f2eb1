use super::overlays::OverlayDocument;
use super::render_cache::FigureRenderCache;
use super::selection::SelectionModel;
use crate::message_prelude::*;

use glam::{DAffine2, DVec2};
use linen::vector::VectorPath;
use linen::{Document, DocumentResponse, FigureId, LayerId, Operation};

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum DocumentMessage {
	DispatchOperation(Box<Operation>),
	SetSelectedFigures(Vec<FigureId>),
	AddSelectedFigures(Vec<FigureId>),
	DeselectAllFigures,
	DeleteSelectedFigures,
	/// The single commit entry for drag gestures: apply the matrix to every
	/// selected figure.
	TransformSelection { transform: [f64; 6] },
	RenderDocument,
}

impl From<DocumentMessage> for Message {
	fn from(message: DocumentMessage) -> Self {
		Message::Document(message)
	}
}

impl From<Operation> for DocumentMessage {
	fn from(operation: Operation) -> DocumentMessage {
		DocumentMessage::DispatchOperation(Box::new(operation))
	}
}

impl From<Operation> for Message {
	fn from(operation: Operation) -> Message {
		DocumentMessage::DispatchOperation(Box::new(operation)).into()
	}
}

/// The figure editor: owns the document, the selection and the render cache,
/// routes operations into the model and reconciles their change events.
#[derive(Debug, Default)]
pub struct DocumentMessageHandler {
	pub document: Document,
	pub active_layer: LayerId,
	selection: SelectionModel,
	render_cache: FigureRenderCache,
}

impl DocumentMessageHandler {
	pub fn process_message(&mut self, message: DocumentMessage, overlays: &OverlayDocument, responses: &mut VecDeque<Message>) {
		match message {
			DocumentMessage::DispatchOperation(operation) => self.dispatch_operation(&operation, responses),
			DocumentMessage::SetSelectedFigures(figure_ids) => {
				self.selection.lock();
				let _ = self.selection.clear();
				for figure_id in self.existing_figures(figure_ids) {
					let _ = self.selection.add(figure_id);
				}
				if self.selection.unlock() {
					self.notify_selection_changed(responses);
				}
			}
			DocumentMessage::AddSelectedFigures(figure_ids) => {
				self.selection.lock();
				for figure_id in self.existing_figures(figure_ids) {
					let _ = self.selection.add(figure_id);
				}
				if self.selection.unlock() {
					self.notify_selection_changed(responses);
				}
			}
			DocumentMessage::DeselectAllFigures => {
				if self.selection.clear() {
					self.notify_selection_changed(responses);
				}
			}
			DocumentMessage::DeleteSelectedFigures => {
				let figure_ids = self.selection.selected_figures().to_vec();
				if figure_ids.is_empty() {
					return;
				}
				let operation = Operation::DeleteFigures {
					layer_id: self.active_layer,
					figure_ids,
				};
				self.dispatch_operation(&operation, responses);
				responses.push_back(DocumentMessage::RenderDocument.into());
			}
			DocumentMessage::TransformSelection { transform } => {
				let figure_ids = self.selection.selected_figures().to_vec();
				if figure_ids.is_empty() {
					log::warn!("TransformSelection with an empty selection");
					return;
				}
				let operation = Operation::TransformFigures {
					layer_id: self.active_layer,
					figure_ids,
					transform,
				};
				self.dispatch_operation(&operation, responses);
			}
			DocumentMessage::RenderDocument => {
				let svg = self.render(overlays);
				responses.push_back(FrontendMessage::UpdateDocument { svg }.into());
			}
		}
	}

	/// Apply one operation to the model. An error means a broken invariant
	/// (unknown layer or figure id); the operation is aborted, the model is
	/// untouched and the failure is surfaced in the log.
	fn dispatch_operation(&mut self, operation: &Operation, responses: &mut VecDeque<Message>) {
		match self.document.handle_operation(operation) {
			Ok(Some(document_responses)) => self.process_document_responses(document_responses, responses),
			Ok(None) => {}
			Err(error) => log::error!("Operation aborted by the document: {error}"),
		}
	}

	fn process_document_responses(&mut self, document_responses: Vec<DocumentResponse>, responses: &mut VecDeque<Message>) {
		for document_response in &document_responses {
			if let Err(error) = self.render_cache.apply(&self.document, document_response) {
				log::error!("Render cache failed to reconcile {document_response}: {error}");
			}
			if let DocumentResponse::FiguresDeleted { figure_ids, .. } = document_response {
				if self.selection.retain(|id| !figure_ids.contains(&id)) {
					self.notify_selection_changed(responses);
				}
			}
		}
		responses.push_back(ToolMessage::DocumentIsDirty.into());
	}

	fn notify_selection_changed(&self, responses: &mut VecDeque<Message>) {
		responses.push_back(ToolMessage::SelectionChanged.into());
		responses.push_back(
			FrontendMessage::UpdateSelection {
				figure_ids: self.selection.selected_figures().to_vec(),
			}
			.into(),
		);
	}

	fn existing_figures(&self, figure_ids: Vec<FigureId>) -> Vec<FigureId> {
		figure_ids
			.into_iter()
			.filter(|figure_id| {
				let exists = self.document.figure(self.active_layer, *figure_id).is_ok();
				if !exists {
					log::warn!("Tried to select nonexistent figure {figure_id}");
				}
				exists
			})
			.collect()
	}

	pub fn selected_figures(&self) -> &[FigureId] {
		self.selection.selected_figures()
	}

	pub fn is_selected(&self, figure_id: FigureId) -> bool {
		self.selection.is_selected(figure_id)
	}

	pub fn selected_figures_bounding_box(&self) -> Option<[DVec2; 2]> {
		self.document.combined_bounding_box(self.active_layer, self.selection.selected_figures())
	}

	/// The boundary the transform cage is built around.
	///
	/// A single selected figure with a tracked matrix keeps that matrix as
	/// the boundary transform, so the handles sit rotated around the figure.
	/// With several figures selected the boundary transform resets to the
	/// identity and the bounds become the union of viewport bounds, a known
	/// approximation that loses per-figure rotation context.
	pub fn selection_boundary(&self) -> Option<([DVec2; 2], DAffine2)> {
		let selected = self.selection.selected_figures();
		if selected.len() == 1 {
			let figure = self.document.figure(self.active_layer, selected[0]).ok()?;
			if let Some(matrix) = figure.transform {
				return figure.intrinsic_bounding_box().map(|bounds| (bounds, matrix));
			}
		}
		self.selected_figures_bounding_box().map(|bounds| (bounds, DAffine2::IDENTITY))
	}

	/// Viewport-space outlines of the selected figures, used for drag
	/// previews. Groups have no outline; their bounds stand in.
	pub fn selected_figure_outlines(&self) -> Vec<(FigureId, VectorPath)> {
		self.selection
			.selected_figures()
			.iter()
			.filter_map(|figure_id| {
				let figure = self.document.figure(self.active_layer, *figure_id).ok()?;
				let outline = figure
					.viewport_outline_path()
					.ok()
					.or_else(|| figure.bounding_box().map(|bounds| VectorPath::new_rect(bounds[0], bounds[1])))?;
				Some((*figure_id, outline))
			})
			.collect()
	}

	pub fn figure_at(&self, point: DVec2, tolerance: f64) -> Option<FigureId> {
		self.document.figure_at(self.active_layer, point, tolerance).ok().flatten()
	}

	pub fn figures_contained_in(&self, bounds: [DVec2; 2]) -> Vec<FigureId> {
		self.document.figures_contained_in(self.active_layer, bounds).unwrap_or_default()
	}

	pub fn render_cache(&self) -> &FigureRenderCache {
		&self.render_cache
	}

	fn render(&self, overlays: &OverlayDocument) -> String {
		let mut svg = String::new();
		for layer in self.document.layers() {
			if !layer.visible {
				continue;
			}
			for figure in layer.figures() {
				if !figure.visible {
					continue;
				}
				match self.render_cache.entry(figure.id) {
					Some(entry) => svg.push_str(&entry.svg),
					None => {
						log::warn!("Figure {} has no cache entry; rendering it directly", figure.id);
						figure.render(&mut svg);
					}
				}
			}
		}
		// Decoration and outlines always sit above the content
		svg.push_str(&overlays.render());
		svg
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use linen::layers::style::PathStyle;
	use linen::layers::{FigureDataType, RectangleFigure};

	fn handler_with_rect() -> (DocumentMessageHandler, OverlayDocument, VecDeque<Message>) {
		let mut handler = DocumentMessageHandler::default();
		let overlays = OverlayDocument::default();
		let mut responses = VecDeque::new();
		let operation = Operation::AddFigure {
			layer_id: 0,
			data: FigureDataType::Rectangle(RectangleFigure::new(DVec2::ZERO, DVec2::splat(10.))),
			style: PathStyle::default(),
		};
		handler.process_message(operation.into(), &overlays, &mut responses);
		(handler, overlays, responses)
	}

	#[test]
	fn operations_populate_the_render_cache() {
		let (handler, _, _) = handler_with_rect();
		assert_eq!(handler.render_cache().len(), 1);
	}

	#[test]
	fn render_assembles_cached_elements() {
		let (mut handler, overlays, _) = handler_with_rect();
		let mut responses = VecDeque::new();
		handler.process_message(DocumentMessage::RenderDocument, &overlays, &mut responses);
		let Some(Message::Frontend(FrontendMessage::UpdateDocument { svg })) = responses.pop_front() else {
			panic!("RenderDocument should produce an UpdateDocument");
		};
		assert!(svg.contains("<path"));
	}

	#[test]
	fn deleting_selected_figures_clears_the_selection() {
		let (mut handler, overlays, _) = handler_with_rect();
		let mut responses = VecDeque::new();
		handler.process_message(DocumentMessage::SetSelectedFigures(vec![0]), &overlays, &mut responses);
		assert_eq!(handler.selected_figures(), &[0]);

		handler.process_message(DocumentMessage::DeleteSelectedFigures, &overlays, &mut responses);
		assert!(handler.selected_figures().is_empty());
		assert!(handler.document.layer(0).unwrap().is_empty());
		assert!(handler.render_cache().is_empty());
	}

	#[test]
	fn selecting_an_unknown_figure_is_ignored() {
		let (mut handler, overlays, _) = handler_with_rect();
		let mut responses = VecDeque::new();
		handler.process_message(DocumentMessage::SetSelectedFigures(vec![42]), &overlays, &mut responses);
		assert!(handler.selected_figures().is_empty());
	}
}
