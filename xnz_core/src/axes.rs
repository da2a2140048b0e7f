//! Claiming the two lever axes from the host's joystick assignment table.
//!
//! While captured, the host sees the axes as unassigned and only this engine
//! reads them. Release writes the original assignment IDs back.

use xnz_traits::{Host, PropertyHandle};

use crate::config::AxisCfg;

/// Assignment table length for a host version.
pub fn table_len(simulator_version: i32) -> usize {
    if simulator_version < 11000 { 100 } else { 500 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisCapture {
    ids: AxisCfg,
    index: Option<usize>,
    captured: bool,
    recapture_pending: bool,
}

impl AxisCapture {
    pub fn new(ids: AxisCfg) -> Self {
        Self {
            ids,
            index: None,
            captured: false,
            recapture_pending: false,
        }
    }

    /// Locate two adjacent slots holding the configured IDs. A pair found
    /// earlier is kept.
    pub fn find_axis_pair(
        &mut self,
        host: &dyn Host,
        assignments: PropertyHandle,
        table_len: usize,
    ) -> Option<usize> {
        if self.index.is_some() {
            return self.index;
        }
        let mut table = vec![0; table_len];
        let n = host.get_i32s(assignments, 0, &mut table);
        table.truncate(n);
        self.index = table
            .windows(2)
            .position(|w| w[0] == self.ids.first_id && w[1] == self.ids.second_id);
        match self.index {
            Some(index) => tracing::info!(
                index,
                first = self.ids.first_id,
                second = self.ids.second_id,
                "found lever axis pair"
            ),
            None => tracing::debug!(table_len = n, "lever axis pair not assigned"),
        }
        self.index
    }

    /// Unassign the pair so the host stops driving it. No-op without a pair.
    pub fn capture(&mut self, host: &mut dyn Host, assignments: PropertyHandle) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        if !self.captured {
            host.set_i32s(assignments, index, &[0, 0]);
            self.captured = true;
            tracing::debug!(index, "captured lever axes");
        }
        self.recapture_pending = false;
        true
    }

    /// Restore the original assignment.
    pub fn release(&mut self, host: &mut dyn Host, assignments: PropertyHandle) {
        if let (Some(index), true) = (self.index, self.captured) {
            host.set_i32s(assignments, index, &[self.ids.first_id, self.ids.second_id]);
            self.captured = false;
            tracing::debug!(index, "released lever axes");
        }
    }

    /// Release ahead of a preference save; the next tick captures again.
    pub fn release_for_save(&mut self, host: &mut dyn Host, assignments: PropertyHandle) {
        if self.captured {
            self.release(host, assignments);
            self.recapture_pending = true;
        }
    }

    pub fn take_recapture(&mut self) -> bool {
        std::mem::take(&mut self.recapture_pending)
    }

    /// Drop the pair (after release) so the next load scans again.
    pub fn forget(&mut self) {
        self.index = None;
        self.captured = false;
        self.recapture_pending = false;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn recapture_pending(&self) -> bool {
        self.recapture_pending
    }
}
