pub mod tools;
pub mod transformation_cage;

use crate::document::{DocumentMessageHandler, OverlayDocument};
use crate::input::InputPreprocessor;
use crate::message_prelude::*;

use linen::color::Color;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// Everything a tool may touch while handling an event: the document
/// (read-only; mutation goes through messages), the overlay document it
/// draws its outline and decoration into, the shared tool colors, and the
/// live input state.
pub struct ToolActionHandlerData<'a> {
	pub document: &'a DocumentMessageHandler,
	pub overlays: &'a mut OverlayDocument,
	pub global_tool_data: &'a DocumentToolData,
	pub input: &'a InputPreprocessor,
}

pub trait ToolActionHandler {
	fn process_message(&mut self, message: ToolMessage, data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>);
}

/// A tool is a state machine: each event maps the current state to the next,
/// with side effects limited to overlay mutation and queued messages.
pub trait Fsm {
	type ToolData;

	#[must_use]
	fn transition(self, message: ToolMessage, tool_data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) -> Self;
}

#[derive(Debug, Clone)]
pub struct DocumentToolData {
	pub primary_color: Color,
	pub secondary_color: Color,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum ToolMessage {
	ActivateTool { tool_type: ToolType },
	SelectionChanged,
	DocumentIsDirty,

	Select(SelectToolMessage),
	Pen(PenToolMessage),
	Path(PathToolMessage),
	Shape(ShapeToolMessage),
	Text(TextToolMessage),
}

impl From<ToolMessage> for Message {
	fn from(message: ToolMessage) -> Self {
		Message::Tool(message)
	}
}

pub struct ToolData {
	pub active_tool_type: ToolType,
	pub tools: HashMap<ToolType, Box<dyn ToolActionHandler>>,
}

impl fmt::Debug for ToolData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ToolData").field("active_tool_type", &self.active_tool_type).field("tools", &"[…]").finish()
	}
}

impl ToolData {
	pub fn tool_mut(&mut self, tool_type: ToolType) -> Option<&mut Box<dyn ToolActionHandler>> {
		self.tools.get_mut(&tool_type)
	}
}

#[derive(Debug)]
pub struct ToolFsmState {
	pub document_tool_data: DocumentToolData,
	pub tool_data: ToolData,
}

impl Default for ToolFsmState {
	fn default() -> Self {
		ToolFsmState {
			tool_data: ToolData {
				active_tool_type: ToolType::Select,
				tools: [
					(ToolType::Select, Box::<tools::select_tool::SelectTool>::default() as Box<dyn ToolActionHandler>),
					(ToolType::Pen, Box::<tools::pen_tool::PenTool>::default() as Box<dyn ToolActionHandler>),
					(ToolType::Path, Box::<tools::path_tool::PathTool>::default() as Box<dyn ToolActionHandler>),
					(ToolType::Shape, Box::<tools::shape_tool::ShapeTool>::default() as Box<dyn ToolActionHandler>),
					(ToolType::Text, Box::<tools::text_tool::TextTool>::default() as Box<dyn ToolActionHandler>),
				]
				.into_iter()
				.collect(),
			},
			document_tool_data: DocumentToolData {
				primary_color: Color::BLACK,
				secondary_color: Color::WHITE,
			},
		}
	}
}

impl ToolFsmState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn swap_colors(&mut self) {
		std::mem::swap(&mut self.document_tool_data.primary_color, &mut self.document_tool_data.secondary_color);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum ToolType {
	Select,
	Pen,
	Path,
	Shape,
	Text,
}

impl fmt::Display for ToolType {
	fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			ToolType::Select => "Select",
			ToolType::Pen => "Pen",
			ToolType::Path => "Path",
			ToolType::Shape => "Shape",
			ToolType::Text => "Text",
		};
		formatter.write_str(name)
	}
}

pub enum StandardToolMessageType {
	Abort,
	SelectionChanged,
	DocumentIsDirty,
}

/// The per-tool spelling of the tool-independent lifecycle messages.
pub fn standard_tool_message(tool: ToolType, message_type: StandardToolMessageType) -> Option<ToolMessage> {
	match message_type {
		StandardToolMessageType::Abort => match tool {
			ToolType::Select => Some(SelectToolMessage::Abort.into()),
			ToolType::Pen => Some(PenToolMessage::Abort.into()),
			ToolType::Path => Some(PathToolMessage::Abort.into()),
			ToolType::Shape => Some(ShapeToolMessage::Abort.into()),
			ToolType::Text => Some(TextToolMessage::Abort.into()),
		},
		StandardToolMessageType::SelectionChanged => match tool {
			ToolType::Select => Some(SelectToolMessage::SelectionChanged.into()),
			ToolType::Path => Some(PathToolMessage::SelectionChanged.into()),
			_ => None,
		},
		StandardToolMessageType::DocumentIsDirty => match tool {
			ToolType::Select => Some(SelectToolMessage::DocumentIsDirty.into()),
			ToolType::Path => Some(PathToolMessage::DocumentIsDirty.into()),
			_ => None,
		},
	}
}

pub fn message_to_tool_type(message: &ToolMessage) -> Option<ToolType> {
	match message {
		ToolMessage::Select(_) => Some(ToolType::Select),
		ToolMessage::Pen(_) => Some(ToolType::Pen),
		ToolMessage::Path(_) => Some(ToolType::Path),
		ToolMessage::Shape(_) => Some(ToolType::Shape),
		ToolMessage::Text(_) => Some(ToolType::Text),
		_ => None,
	}
}
