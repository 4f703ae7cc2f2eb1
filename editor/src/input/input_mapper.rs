use super::keyboard::Key;
use crate::message_prelude::*;
use crate::tool::tools::shape_tool::ShapeType;

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum InputMapperMessage {
	PointerDown,
	PointerMove,
	PointerUp,
	KeyDown(Key),
	KeyUp(Key),
	Blur,
}

impl From<InputMapperMessage> for Message {
	fn from(message: InputMapperMessage) -> Self {
		Message::InputMapper(message)
	}
}

/// Translate a mapper event into the messages for the active tool. Pointer
/// events always end with a re-render so overlay mutations become visible.
pub fn map(message: InputMapperMessage, active_tool: ToolType) -> Vec<Message> {
	use InputMapperMessage::*;

	match message {
		PointerDown => with_render(tool_event(active_tool, ToolEvent::DragStart)),
		PointerMove => with_render(tool_event(active_tool, ToolEvent::PointerMove)),
		PointerUp => with_render(tool_event(active_tool, ToolEvent::DragStop)),
		Blur => with_render(tool_event(active_tool, ToolEvent::Abort)),
		KeyDown(key) => map_key_down(key, active_tool),
		KeyUp(key) => match (key, active_tool) {
			// The pen's sharp-corner mode follows the Alt key, so releasing
			// it must re-evaluate the in-flight anchor
			(Key::KeyAlt, ToolType::Pen) => with_render(tool_event(active_tool, ToolEvent::PointerMove)),
			_ => Vec::new(),
		},
	}
}

fn map_key_down(key: Key, active_tool: ToolType) -> Vec<Message> {
	match (key, active_tool) {
		(Key::KeyEscape, _) => with_render(tool_event(active_tool, ToolEvent::Abort)),
		(Key::KeyEnter, ToolType::Pen) => with_render(Some(PenToolMessage::Confirm.into())),
		(Key::KeyDelete | Key::KeyBackspace, ToolType::Select | ToolType::Path) => {
			vec![DocumentMessage::DeleteSelectedFigures.into()]
		}
		(Key::KeyAlt, ToolType::Pen) => with_render(tool_event(active_tool, ToolEvent::PointerMove)),
		(Key::KeyV, _) => vec![ToolMessage::ActivateTool { tool_type: ToolType::Select }.into()],
		(Key::KeyP, _) => vec![ToolMessage::ActivateTool { tool_type: ToolType::Pen }.into()],
		(Key::KeyA, _) => vec![ToolMessage::ActivateTool { tool_type: ToolType::Path }.into()],
		(Key::KeyS, _) => vec![ToolMessage::ActivateTool { tool_type: ToolType::Shape }.into()],
		(Key::KeyT, _) => vec![ToolMessage::ActivateTool { tool_type: ToolType::Text }.into()],
		(Key::KeyR, ToolType::Shape) => vec![ShapeToolMessage::SetShape(ShapeType::Rectangle).into()],
		(Key::KeyE, ToolType::Shape) => vec![ShapeToolMessage::SetShape(ShapeType::Ellipse).into()],
		_ => Vec::new(),
	}
}

enum ToolEvent {
	DragStart,
	PointerMove,
	DragStop,
	Abort,
}

fn tool_event(tool_type: ToolType, event: ToolEvent) -> Option<Message> {
	let message: ToolMessage = match (tool_type, event) {
		(ToolType::Select, ToolEvent::DragStart) => SelectToolMessage::DragStart.into(),
		(ToolType::Select, ToolEvent::PointerMove) => SelectToolMessage::PointerMove.into(),
		(ToolType::Select, ToolEvent::DragStop) => SelectToolMessage::DragStop.into(),
		(ToolType::Select, ToolEvent::Abort) => SelectToolMessage::Abort.into(),
		(ToolType::Pen, ToolEvent::DragStart) => PenToolMessage::DragStart.into(),
		(ToolType::Pen, ToolEvent::PointerMove) => PenToolMessage::PointerMove.into(),
		(ToolType::Pen, ToolEvent::DragStop) => PenToolMessage::DragStop.into(),
		(ToolType::Pen, ToolEvent::Abort) => PenToolMessage::Abort.into(),
		(ToolType::Path, ToolEvent::DragStart) => PathToolMessage::DragStart.into(),
		(ToolType::Path, ToolEvent::PointerMove) => PathToolMessage::PointerMove.into(),
		(ToolType::Path, ToolEvent::DragStop) => PathToolMessage::DragStop.into(),
		(ToolType::Path, ToolEvent::Abort) => PathToolMessage::Abort.into(),
		(ToolType::Shape, ToolEvent::DragStart) => ShapeToolMessage::DragStart.into(),
		(ToolType::Shape, ToolEvent::PointerMove) => ShapeToolMessage::PointerMove.into(),
		(ToolType::Shape, ToolEvent::DragStop) => ShapeToolMessage::DragStop.into(),
		(ToolType::Shape, ToolEvent::Abort) => ShapeToolMessage::Abort.into(),
		(ToolType::Text, ToolEvent::DragStart) => TextToolMessage::DragStart.into(),
		(ToolType::Text, ToolEvent::PointerMove) => TextToolMessage::PointerMove.into(),
		(ToolType::Text, ToolEvent::DragStop) => TextToolMessage::DragStop.into(),
		(ToolType::Text, ToolEvent::Abort) => TextToolMessage::Abort.into(),
	};
	Some(message.into())
}

fn with_render(message: Option<Message>) -> Vec<Message> {
	let mut messages: Vec<Message> = message.into_iter().collect();
	messages.push(DocumentMessage::RenderDocument.into());
	messages
}
