/// Host read-back below this counts as idle.
pub const IDLE_EPSILON: f32 = 0.001;

/// Debounce for idle writes.
///
/// While the levers rest in the idle detent and the host agrees the engines
/// are at idle, only the first `cap` idle writes go through. After that the
/// pilot can move thrust through another control path without the engine
/// writing idle back over it every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleHold {
    count: u8,
    cap: u8,
}

impl IdleHold {
    pub fn new(cap: u8) -> Self {
        Self {
            count: 0,
            cap: cap.max(1),
        }
    }

    /// Record one tick; `true` means skip this tick's write.
    pub fn observe(&mut self, mapped: [f32; 2], host: &[f32]) -> bool {
        let mapped_idle = mapped.iter().all(|v| *v == 0.0);
        let host_idle = host.iter().all(|v| v.abs() < IDLE_EPSILON);
        if !(mapped_idle && host_idle) {
            self.count = 0;
            return false;
        }
        if self.count >= self.cap {
            return true;
        }
        self.count += 1;
        false
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

impl Default for IdleHold {
    fn default() -> Self {
        Self::new(10)
    }
}
