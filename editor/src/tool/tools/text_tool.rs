use crate::document::overlays::OverlayDocument;
use crate::input::mouse::ViewportPosition;
use crate::message_prelude::*;
use crate::tool::{Fsm, ToolActionHandler, ToolActionHandlerData};

use linen::layers::style::{Fill, PathStyle};
use linen::layers::{FigureData, FigureDataType, TextFigure};
use linen::{FigureId, Operation};
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct TextTool {
	fsm_state: TextToolFsmState,
	data: TextToolData,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum TextToolMessage {
	DragStart,
	PointerMove,
	DragStop,
	Abort,
}

impl From<TextToolMessage> for ToolMessage {
	fn from(message: TextToolMessage) -> Self {
		ToolMessage::Text(message)
	}
}

impl From<TextToolMessage> for Message {
	fn from(message: TextToolMessage) -> Self {
		ToolMessage::Text(message).into()
	}
}

impl ToolActionHandler for TextTool {
	fn process_message(&mut self, message: ToolMessage, data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) {
		self.fsm_state = self.fsm_state.transition(message, &mut self.data, data, responses);
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum TextToolFsmState {
	#[default]
	Ready,
	Drawing,
}

#[derive(Default)]
struct TextToolData {
	drag_start: ViewportPosition,
	figure: Option<TextFigure>,
	outline: Option<FigureId>,
}

impl TextToolData {
	fn update_outline(&mut self, overlays: &mut OverlayDocument) {
		let Some(figure) = &self.figure else { return };
		let Ok(path) = figure.outline_path() else { return };
		match self.outline {
			Some(outline) => overlays.set_path(outline, path),
			None => self.outline = Some(overlays.add_path(path, OverlayDocument::outline_style())),
		}
	}

	fn cleanup(&mut self, overlays: &mut OverlayDocument) {
		if let Some(outline) = self.outline.take() {
			overlays.delete(outline);
		}
		self.figure = None;
	}
}

impl Fsm for TextToolFsmState {
	type ToolData = TextToolData;

	fn transition(self, message: ToolMessage, data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) -> Self {
		use TextToolFsmState::*;
		use TextToolMessage::*;

		let ToolMessage::Text(message) = message else {
			return self;
		};
		match (self, message) {
			(Ready, DragStart) => {
				data.drag_start = transition_data.input.mouse.position;
				data.figure = Some(TextFigure::new(data.drag_start, glam::DVec2::ZERO, "Text"));
				data.update_outline(transition_data.overlays);
				Drawing
			}
			(Drawing, PointerMove) => {
				if let Some(figure) = &mut data.figure {
					figure.set_handle_position(2, transition_data.input.mouse.position);
				}
				data.update_outline(transition_data.overlays);
				Drawing
			}
			(Drawing, DragStop) => {
				let figure = data.figure.take();
				data.cleanup(transition_data.overlays);
				if let Some(mut figure) = figure {
					figure.normalize();
					if figure.size != glam::DVec2::ZERO {
						let style = PathStyle::new(None, Some(Fill::new(transition_data.global_tool_data.primary_color)));
						responses.push_back(
							Operation::AddFigure {
								layer_id: transition_data.document.active_layer,
								data: FigureDataType::Text(figure),
								style,
							}
							.into(),
						);
					}
				}
				Ready
			}
			(_, Abort) => {
				data.cleanup(transition_data.overlays);
				Ready
			}
			_ => self,
		}
	}
}
