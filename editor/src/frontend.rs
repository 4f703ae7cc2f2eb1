use crate::message_prelude::*;

use linen::FigureId;
use serde::{Deserialize, Serialize};

/// Messages surfaced to whatever embeds the editor core: the rendered SVG,
/// the active tool, and selection changes for external widgets.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum FrontendMessage {
	UpdateDocument { svg: String },
	UpdateActiveTool { tool_type: ToolType },
	UpdateSelection { figure_ids: Vec<FigureId> },
}

impl From<FrontendMessage> for Message {
	fn from(message: FrontendMessage) -> Self {
		Message::Frontend(message)
	}
}
