use linen::FigureId;

/// The set of currently selected figures.
///
/// The selection outlives any one tool: it is owned by the document handler
/// and persists across tool switches until explicitly cleared. Change
/// notification is batched through a reentrant `lock`/`unlock` pair so a
/// compound mutation (clear plus add during a marquee merge) surfaces as a
/// single change.
#[derive(Debug, Default)]
pub struct SelectionModel {
	selected: Vec<FigureId>,
	lock_depth: usize,
	changed_while_locked: bool,
}

impl SelectionModel {
	pub fn selected_figures(&self) -> &[FigureId] {
		&self.selected
	}

	pub fn is_selected(&self, figure_id: FigureId) -> bool {
		self.selected.contains(&figure_id)
	}

	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	pub fn len(&self) -> usize {
		self.selected.len()
	}

	/// Begin a batch: changes are recorded but not reported until the
	/// matching `unlock`. Locks nest.
	pub fn lock(&mut self) {
		self.lock_depth += 1;
	}

	/// End a batch. Returns whether a change notification is due, which is
	/// only ever true on the outermost unlock.
	#[must_use]
	pub fn unlock(&mut self) -> bool {
		debug_assert!(self.lock_depth > 0, "Selection unlock without a matching lock");
		self.lock_depth = self.lock_depth.saturating_sub(1);
		if self.lock_depth == 0 && self.changed_while_locked {
			self.changed_while_locked = false;
			return true;
		}
		false
	}

	/// Record a mutation. Returns whether the caller should notify now
	/// (always false while a lock is held).
	fn record_change(&mut self) -> bool {
		if self.lock_depth > 0 {
			self.changed_while_locked = true;
			false
		} else {
			true
		}
	}

	#[must_use]
	pub fn add(&mut self, figure_id: FigureId) -> bool {
		if self.is_selected(figure_id) {
			return false;
		}
		self.selected.push(figure_id);
		self.record_change()
	}

	#[must_use]
	pub fn remove(&mut self, figure_id: FigureId) -> bool {
		let Some(index) = self.selected.iter().position(|id| *id == figure_id) else {
			return false;
		};
		self.selected.remove(index);
		self.record_change()
	}

	#[must_use]
	pub fn clear(&mut self) -> bool {
		if self.selected.is_empty() {
			return false;
		}
		self.selected.clear();
		self.record_change()
	}

	/// Drop every id the predicate rejects; used when figures are deleted.
	#[must_use]
	pub fn retain(&mut self, keep: impl Fn(FigureId) -> bool) -> bool {
		let before = self.selected.len();
		self.selected.retain(|id| keep(*id));
		if self.selected.len() == before {
			return false;
		}
		self.record_change()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn add_and_remove_report_changes() {
		let mut selection = SelectionModel::default();
		assert!(selection.add(1));
		assert!(!selection.add(1));
		assert!(selection.remove(1));
		assert!(!selection.remove(1));
	}

	#[test]
	fn locked_mutations_coalesce_into_one_notification() {
		let mut selection = SelectionModel::default();
		selection.lock();
		assert!(!selection.add(1));
		assert!(!selection.clear());
		assert!(!selection.add(2));
		assert!(selection.unlock());
	}

	#[test]
	fn nested_locks_flush_only_at_the_outermost_unlock() {
		let mut selection = SelectionModel::default();
		selection.lock();
		selection.lock();
		let _ = selection.add(1);
		assert!(!selection.unlock());
		assert!(selection.unlock());
	}

	#[test]
	fn unlock_without_changes_is_silent() {
		let mut selection = SelectionModel::default();
		selection.lock();
		assert!(!selection.unlock());
	}
}
