use crate::{FigureId, LayerId};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured change events emitted by the document when an operation is
/// applied. Observers (the editor's render cache, selection widgets) key off
/// the affected figure ids; `FiguresTransformed` also carries the matrix so
/// caches can remap their geometry without recomputing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DocumentResponse {
	/// A coarse signal that a full re-render is required.
	DocumentChanged,
	FiguresAdded {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	FiguresTransformed {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
		transform: [f64; 6],
	},
	/// Figure geometry or style changed in place.
	FiguresUpdated {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	FiguresDeleted {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	FiguresReordered {
		layer_id: LayerId,
	},
	LayerCreated {
		layer_id: LayerId,
	},
	LayerDeleted {
		layer_id: LayerId,
	},
}

impl fmt::Display for DocumentResponse {
	fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			DocumentResponse::DocumentChanged => "DocumentChanged",
			DocumentResponse::FiguresAdded { .. } => "FiguresAdded",
			DocumentResponse::FiguresTransformed { .. } => "FiguresTransformed",
			DocumentResponse::FiguresUpdated { .. } => "FiguresUpdated",
			DocumentResponse::FiguresDeleted { .. } => "FiguresDeleted",
			DocumentResponse::FiguresReordered { .. } => "FiguresReordered",
			DocumentResponse::LayerCreated { .. } => "LayerCreated",
			DocumentResponse::LayerDeleted { .. } => "LayerDeleted",
		};

		formatter.write_str(name)
	}
}
