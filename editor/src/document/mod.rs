pub mod document_message_handler;
pub mod overlays;
pub mod render_cache;
pub mod selection;

#[doc(inline)]
pub use document_message_handler::{DocumentMessage, DocumentMessageHandler};
#[doc(inline)]
pub use overlays::OverlayDocument;
#[doc(inline)]
pub use render_cache::FigureRenderCache;
#[doc(inline)]
pub use selection::SelectionModel;
