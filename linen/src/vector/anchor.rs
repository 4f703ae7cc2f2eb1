use super::manipulator::ManipulatorType;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// Any grabbable point on a path, the anchor itself or one of its handles.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct ControlPoint {
	pub position: DVec2,
	pub manipulator_type: ManipulatorType,
}

impl ControlPoint {
	pub fn new(position: DVec2, manipulator_type: ManipulatorType) -> Self {
		Self { position, manipulator_type }
	}

	pub fn transform(&mut self, transform: &DAffine2) {
		self.position = transform.transform_point2(self.position);
	}
}

/// How edits to one handle propagate to its partner.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct HandleMirroring {
	/// Keep the handles colinear through the anchor.
	pub angle: bool,
	/// Keep the handles equidistant from the anchor.
	pub distance: bool,
}

/// The combination of incoming/outgoing handles an anchor carries, and how
/// they are coupled. Derived from the stored representation, not stored
/// itself, so it can never disagree with the point array.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum AnchorKind {
	/// A plain corner, no handles.
	Edge,
	/// Only an outgoing handle.
	EdgeAngle,
	/// Only an incoming handle.
	AngleEdge,
	/// Both handles, point-reflected through the anchor.
	Symmetric,
	/// Both handles colinear, each with its own length.
	SmoothAngleAngle,
	/// Both handles fully independent.
	AngleAngle,
}

/// An anchor point on a path with up to two optional bezier handles.
/// The in handle shapes the curve arriving at the anchor, the out handle the
/// curve leaving it.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct Anchor {
	pub points: [Option<ControlPoint>; 3],
	pub mirror: HandleMirroring,
}

impl Anchor {
	/// A plain corner anchor.
	pub fn new(anchor_position: DVec2) -> Self {
		Self {
			points: [Some(ControlPoint::new(anchor_position, ManipulatorType::Anchor)), None, None],
			mirror: HandleMirroring::default(),
		}
	}

	pub fn new_with_handles(anchor_position: DVec2, in_handle: DVec2, out_handle: DVec2) -> Self {
		Self {
			points: [
				Some(ControlPoint::new(anchor_position, ManipulatorType::Anchor)),
				Some(ControlPoint::new(in_handle, ManipulatorType::InHandle)),
				Some(ControlPoint::new(out_handle, ManipulatorType::OutHandle)),
			],
			mirror: HandleMirroring::default(),
		}
	}

	/// An anchor whose in handle is the point reflection of the out handle.
	pub fn new_symmetric(anchor_position: DVec2, out_handle: DVec2) -> Self {
		let mut anchor = Self::new_with_handles(anchor_position, anchor_position - (out_handle - anchor_position), out_handle);
		anchor.mirror = HandleMirroring { angle: true, distance: true };
		anchor
	}

	pub fn with_mirroring(mut self, angle: bool, distance: bool) -> Self {
		self.mirror = HandleMirroring { angle, distance };
		self
	}

	pub fn anchor_position(&self) -> DVec2 {
		self.points[ManipulatorType::Anchor].as_ref().map(|point| point.position).unwrap_or_default()
	}

	pub fn position(&self, manipulator_type: ManipulatorType) -> Option<DVec2> {
		self.points[manipulator_type].as_ref().map(|point| point.position)
	}

	pub fn set_point_position(&mut self, manipulator_type: ManipulatorType, position: DVec2) {
		if let Some(point) = &mut self.points[manipulator_type] {
			point.position = position;
		} else {
			self.points[manipulator_type] = Some(ControlPoint::new(position, manipulator_type));
		}
	}

	pub fn remove_point(&mut self, manipulator_type: ManipulatorType) {
		if manipulator_type.is_handle() {
			self.points[manipulator_type] = None;
		}
	}

	pub fn kind(&self) -> AnchorKind {
		match (&self.points[ManipulatorType::InHandle], &self.points[ManipulatorType::OutHandle]) {
			(None, None) => AnchorKind::Edge,
			(None, Some(_)) => AnchorKind::EdgeAngle,
			(Some(_), None) => AnchorKind::AngleEdge,
			(Some(_), Some(_)) if self.mirror.angle && self.mirror.distance => AnchorKind::Symmetric,
			(Some(_), Some(_)) if self.mirror.angle => AnchorKind::SmoothAngleAngle,
			(Some(_), Some(_)) => AnchorKind::AngleAngle,
		}
	}

	/// Move one of the anchor's points and propagate the edit:
	/// moving the anchor carries both handles rigidly with it, while moving a
	/// handle re-derives the partner handle from the mirroring rules.
	pub fn move_point(&mut self, manipulator_type: ManipulatorType, position: DVec2) {
		match manipulator_type {
			ManipulatorType::Anchor => {
				let delta = position - self.anchor_position();
				for point in self.points.iter_mut().flatten() {
					point.position += delta;
				}
			}
			handle => {
				self.set_point_position(handle, position);
				self.update_mirrored_partner(handle);
			}
		}
	}

	/// Recompute the partner of `moved_handle` according to the mirroring
	/// rules: point reflection through the anchor when distance-mirrored,
	/// otherwise the reflected direction at the partner's own length.
	pub fn update_mirrored_partner(&mut self, moved_handle: ManipulatorType) {
		if !moved_handle.is_handle() || !self.mirror.angle {
			return;
		}
		let anchor = self.anchor_position();
		let Some(moved) = self.position(moved_handle) else { return };
		let partner_type = moved_handle.opposite_handle();
		let Some(partner) = self.position(partner_type) else { return };

		let reflected = anchor - (moved - anchor);
		let position = if self.mirror.distance {
			reflected
		} else {
			let length = (partner - anchor).length();
			let direction = reflected - anchor;
			if direction.length_squared() == 0. {
				return;
			}
			anchor + direction.normalize() * length
		};
		self.set_point_position(partner_type, position);
	}

	/// Returns the handle opposite the provided one, if present.
	pub fn opposing_handle(&self, handle: ManipulatorType) -> Option<&ControlPoint> {
		self.points[handle.opposite_handle()].as_ref()
	}

	pub fn transform(&mut self, transform: &DAffine2) {
		for point in self.points.iter_mut().flatten() {
			point.transform(transform);
		}
	}
}
