use crate::layers::style::PathStyle;
use crate::layers::FigureDataType;
use crate::vector::VectorPath;
use crate::{FigureId, LayerId};

use serde::{Deserialize, Serialize};

/// Operations that can be performed to mutate the document. Applying one is
/// the only way the document changes; each application emits
/// [`DocumentResponse`](crate::DocumentResponse) change events.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Operation {
	AddFigure {
		layer_id: LayerId,
		data: FigureDataType,
		style: PathStyle,
	},
	TransformFigures {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
		transform: [f64; 6],
	},
	DeleteFigures {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	/// Replace a path figure's anchors; the edit tool's commit.
	SetPathGeometry {
		layer_id: LayerId,
		figure_id: FigureId,
		path: VectorPath,
	},
	SetFigureStyle {
		layer_id: LayerId,
		figure_id: FigureId,
		style: PathStyle,
	},
	SetFigureVisibility {
		layer_id: LayerId,
		figure_id: FigureId,
		visible: bool,
	},
	BringToFront {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	BringForward {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	SendBackward {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	SendToBack {
		layer_id: LayerId,
		figure_ids: Vec<FigureId>,
	},
	AddLayer {
		name: Option<String>,
	},
	DeleteLayer {
		layer_id: LayerId,
	},
}
