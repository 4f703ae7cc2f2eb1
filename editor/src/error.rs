use linen::DocumentError;

use thiserror::Error;

/// The error type used by the Easel editor core.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EditorError {
	#[error("Failed to execute operation:\n{0}")]
	InvalidOperation(String),

	#[error("The requested tool does not exist")]
	UnknownTool,

	#[error("The render cache has no entry for figure {0}")]
	CacheMissing(linen::FigureId),

	#[error("This figure type cannot be reconciled by the render cache")]
	UnsupportedFigure,

	#[error("The operation caused a document error:\n{0:?}")]
	Document(String),

	#[error("{0}")]
	Misc(String),
}

macro_rules! derive_from {
	($type:ty, $kind:ident) => {
		impl From<$type> for EditorError {
			fn from(error: $type) -> Self {
				EditorError::$kind(format!("{error:?}"))
			}
		}
	};
}

derive_from!(&str, Misc);
derive_from!(String, Misc);
derive_from!(DocumentError, Document);
