use crate::consts::{BOUNDS_EPSILON, HANDLE_HIT_RADIUS, RESIZE_HANDLE_SIZE, ROTATE_HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET};
use crate::document::overlays::{marker_transform, transform_from_box, OverlayDocument};

use glam::{DAffine2, DVec2};
use linen::FigureId;

/// The edges being dragged during a resize, along with the original bounds
/// in boundary-local space.
#[derive(Clone, Debug, Default)]
pub struct SelectedEdges {
	bounds: [DVec2; 2],
	top: bool,
	bottom: bool,
	left: bool,
	right: bool,
}

impl SelectedEdges {
	pub fn new(top: bool, bottom: bool, left: bool, right: bool, bounds: [DVec2; 2]) -> Self {
		Self { bounds, top, bottom, left, right }
	}

	/// Which edges a scale handle index drags. Indices walk the left column,
	/// the vertical midlines, then the right column, matching
	/// [`BoundingBoxOverlays::handle_anchors_local`].
	pub fn from_handle_index(index: usize, bounds: [DVec2; 2]) -> Option<Self> {
		let (top, bottom, left, right) = match index {
			0 => (true, false, true, false),
			1 => (false, false, true, false),
			2 => (false, true, true, false),
			3 => (true, false, false, false),
			4 => (false, true, false, false),
			5 => (true, false, false, true),
			6 => (false, false, false, true),
			7 => (false, true, false, true),
			_ => return None,
		};
		Some(Self::new(top, bottom, left, right, bounds))
	}

	/// The fixed point of the scale: the opposite corner or edge midpoint.
	pub fn calculate_pivot(&self) -> DVec2 {
		let min = self.bounds[0];
		let max = self.bounds[1];

		let x = if self.left {
			max.x
		} else if self.right {
			min.x
		} else {
			(min.x + max.x) / 2.
		};

		let y = if self.top {
			max.y
		} else if self.bottom {
			min.y
		} else {
			(min.y + max.y) / 2.
		};

		DVec2::new(x, y)
	}

	/// Per-axis scale factors that bring the dragged edge to `mouse`
	/// (boundary-local) while the pivot stays fixed. A degenerate original
	/// extent contributes no scaling on that axis rather than a division
	/// by zero.
	pub fn scale_factors(&self, mouse: DVec2) -> DVec2 {
		let extent = self.bounds[1] - self.bounds[0];

		let sx = if extent.x.abs() < BOUNDS_EPSILON {
			1.
		} else if self.left {
			(self.bounds[1].x - mouse.x) / extent.x
		} else if self.right {
			(mouse.x - self.bounds[0].x) / extent.x
		} else {
			1.
		};

		let sy = if extent.y.abs() < BOUNDS_EPSILON {
			1.
		} else if self.top {
			(self.bounds[1].y - mouse.y) / extent.y
		} else if self.bottom {
			(mouse.y - self.bounds[0].y) / extent.y
		} else {
			1.
		};

		DVec2::new(sx, sy)
	}

	/// The boundary-local transform for dragging the selected edges to
	/// `mouse`: scale about the pivot.
	pub fn scale_transform(&self, mouse: DVec2) -> DAffine2 {
		let pivot = self.calculate_pivot();
		DAffine2::from_translation(pivot) * DAffine2::from_scale(self.scale_factors(mouse)) * DAffine2::from_translation(-pivot)
	}
}

/// The selection boundary and its cage overlays: the bounding rectangle and
/// the eight scale handles, with rotate hit zones sitting outside each
/// handle (handle indices 0 to 7 scale, 8 to 15 rotate).
#[derive(Debug, Default)]
pub struct BoundingBoxOverlays {
	/// Boundary-local bounds.
	pub bounds: [DVec2; 2],
	/// Maps boundary-local space into the viewport. The identity unless
	/// exactly one figure with a tracked matrix is selected.
	pub transform: DAffine2,
	bounding_box: Option<FigureId>,
	transform_handles: [Option<FigureId>; 8],
	pub selected_edges: Option<SelectedEdges>,
}

impl BoundingBoxOverlays {
	pub fn new(bounds: [DVec2; 2], transform: DAffine2) -> Self {
		Self {
			bounds,
			transform,
			..Default::default()
		}
	}

	pub fn handle_anchors_local(&self) -> [DVec2; 8] {
		let [min, max] = self.bounds;
		let center = (min + max) / 2.;
		[
			DVec2::new(min.x, min.y),
			DVec2::new(min.x, center.y),
			DVec2::new(min.x, max.y),
			DVec2::new(center.x, min.y),
			DVec2::new(center.x, max.y),
			DVec2::new(max.x, min.y),
			DVec2::new(max.x, center.y),
			DVec2::new(max.x, max.y),
		]
	}

	pub fn evaluate_transform_handle_positions(&self) -> [DVec2; 8] {
		self.handle_anchors_local().map(|anchor| self.transform.transform_point2(anchor))
	}

	/// Rotate zones: each scale handle position pushed outward from the
	/// boundary center.
	pub fn rotate_handle_positions(&self) -> [DVec2; 8] {
		let center = self.center_viewport();
		self.evaluate_transform_handle_positions().map(|position| {
			let outward = position - center;
			if outward.length_squared() < BOUNDS_EPSILON {
				position
			} else {
				position + outward.normalize() * ROTATE_HANDLE_OFFSET
			}
		})
	}

	pub fn center_viewport(&self) -> DVec2 {
		self.transform.transform_point2((self.bounds[0] + self.bounds[1]) / 2.)
	}

	/// Which of the sixteen handles the cursor is over, scale handles taking
	/// priority over the rotate zones behind them.
	pub fn check_handle(&self, cursor: DVec2) -> Option<usize> {
		let scale_hit = self
			.evaluate_transform_handle_positions()
			.into_iter()
			.position(|position| position.distance(cursor) <= HANDLE_HIT_RADIUS);
		if let Some(index) = scale_hit {
			return Some(index);
		}
		self.rotate_handle_positions()
			.into_iter()
			.position(|position| position.distance(cursor) <= ROTATE_HANDLE_HIT_RADIUS)
			.map(|index| index + 8)
	}

	/// Create or reposition the cage overlays, optionally pre-composed with
	/// a preview transform while a drag is in flight.
	pub fn update_overlays(&mut self, overlays: &mut OverlayDocument, preview: Option<DAffine2>) {
		let preview = preview.unwrap_or(DAffine2::IDENTITY);

		let bounding_box = *self.bounding_box.get_or_insert_with(|| overlays.add_rect(OverlayDocument::outline_style()));
		overlays.set_transform(bounding_box, preview * self.transform * transform_from_box(self.bounds[0], self.bounds[1]));

		let positions = self.evaluate_transform_handle_positions();
		for (slot, position) in self.transform_handles.iter_mut().zip(positions) {
			let handle = *slot.get_or_insert_with(|| overlays.add_rect(OverlayDocument::decoration_style()));
			overlays.set_transform(handle, marker_transform(preview.transform_point2(position), RESIZE_HANDLE_SIZE));
		}
	}

	/// Remove the cage from the overlay document.
	pub fn delete(&mut self, overlays: &mut OverlayDocument) {
		if let Some(bounding_box) = self.bounding_box.take() {
			overlays.delete(bounding_box);
		}
		for handle in &mut self.transform_handles {
			if let Some(handle) = handle.take() {
				overlays.delete(handle);
			}
		}
	}
}
