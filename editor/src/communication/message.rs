use crate::document::DocumentMessage;
use crate::frontend::FrontendMessage;
use crate::input::{InputMapperMessage, InputPreprocessorMessage};
use crate::tool::ToolMessage;

use serde::{Deserialize, Serialize};

/// The root of the message tree. Every mutation of editor state travels
/// through one of these; handlers may enqueue follow-up messages, which the
/// dispatcher drains before returning to the embedder.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Message {
	NoOp,
	InputPreprocessor(InputPreprocessorMessage),
	InputMapper(InputMapperMessage),
	Tool(ToolMessage),
	Document(DocumentMessage),
	Frontend(FrontendMessage),
}
