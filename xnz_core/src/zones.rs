//! Thrust zones derived from the lever calibration.
//!
//! The lever travel `[0, 1]` is cut into four zones separated by the detent
//! gaps. Each gap is `2 * deadband` wide and centered on a detent:
//!
//! ```text
//! 0   db        idle        climb        flex          1-db  1
//! |---[REVERSE]--|--[CLIMB]--|--[FLEX]---|--[TAKEOFF]--]-----|
//! ```

use crate::config::{CalibrationCfg, SharesCfg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Reverse,
    Climb,
    Flex,
    Takeoff,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Reverse, Zone::Climb, Zone::Flex, Zone::Takeoff];

    pub fn name(self) -> &'static str {
        match self {
            Zone::Reverse => "reverse",
            Zone::Climb => "climb",
            Zone::Flex => "flex",
            Zone::Takeoff => "takeoff",
        }
    }

    const fn index(self) -> usize {
        match self {
            Zone::Reverse => 0,
            Zone::Climb => 1,
            Zone::Flex => 2,
            Zone::Takeoff => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrustZone {
    pub min: f32,
    pub max: f32,
    pub len: f32,
    /// Output added across this zone (continuous curves only).
    pub share: f32,
}

impl ThrustZone {
    fn span(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            len: max - min,
            share: 0.0,
        }
    }

    /// Position inside the zone as `[0, 1]`. A zero-length zone is a step.
    #[inline]
    pub fn ratio(&self, x: f32) -> f32 {
        if self.len <= f32::EPSILON {
            return 1.0;
        }
        ((x - self.min) / self.len).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min && x <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneModel {
    zones: [ThrustZone; 4],
    idle: f32,
    climb: f32,
    flex: f32,
    deadband: f32,
}

impl Default for ZoneModel {
    fn default() -> Self {
        let mut model = Self::recompute(&CalibrationCfg::default());
        model.assign_shares(&SharesCfg::default());
        model
    }
}

impl ZoneModel {
    /// Build zone boundaries from detent centers. Shares start at zero.
    pub fn recompute(cal: &CalibrationCfg) -> Self {
        let db = cal.deadband;
        Self {
            zones: [
                ThrustZone::span(db, cal.idle - db),
                ThrustZone::span(cal.idle + db, cal.climb - db),
                ThrustZone::span(cal.climb + db, cal.flex - db),
                ThrustZone::span(cal.flex + db, 1.0 - db),
            ],
            idle: cal.idle,
            climb: cal.climb,
            flex: cal.flex,
            deadband: db,
        }
    }

    /// Store per-zone shares from cumulative output levels, e.g.
    /// `(0.69, 0.87, 0.94)` puts full forward travel at 94%.
    pub fn assign_shares(&mut self, shares: &SharesCfg) {
        self.zones[Zone::Reverse.index()].share = 0.0;
        self.zones[Zone::Climb.index()].share = shares.climb;
        self.zones[Zone::Flex.index()].share = shares.flex - shares.climb;
        self.zones[Zone::Takeoff.index()].share = shares.takeoff - shares.flex;
    }

    pub fn with_shares(mut self, shares: &SharesCfg) -> Self {
        self.assign_shares(shares);
        self
    }

    #[inline]
    pub fn zone(&self, zone: Zone) -> &ThrustZone {
        &self.zones[zone.index()]
    }

    pub fn idle(&self) -> f32 {
        self.idle
    }

    pub fn climb_detent(&self) -> f32 {
        self.climb
    }

    pub fn flex_detent(&self) -> f32 {
        self.flex
    }

    pub fn deadband(&self) -> f32 {
        self.deadband
    }

    /// Output level reached at the top of `zone` on continuous curves.
    pub fn level_after(&self, zone: Zone) -> f32 {
        self.zones[..=zone.index()].iter().map(|z| z.share).sum()
    }

    /// Sum of forward shares; the value a continuous curve reaches at full travel.
    pub fn max_output(&self) -> f32 {
        self.level_after(Zone::Takeoff)
    }

    /// Zone containing `x`, or `None` inside a detent gap or the end stops.
    pub fn locate(&self, x: f32) -> Option<Zone> {
        Zone::ALL.into_iter().find(|z| self.zone(*z).contains(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal(idle: f32, climb: f32, flex: f32, deadband: f32) -> CalibrationCfg {
        CalibrationCfg {
            idle,
            climb,
            flex,
            deadband,
            invert: true,
        }
    }

    #[test]
    fn gaps_are_twice_the_deadband() {
        let m = ZoneModel::recompute(&cal(0.28, 0.52, 0.72, 0.04));
        let pairs = [
            (Zone::Reverse, Zone::Climb),
            (Zone::Climb, Zone::Flex),
            (Zone::Flex, Zone::Takeoff),
        ];
        for (lo, hi) in pairs {
            let gap = m.zone(hi).min - m.zone(lo).max;
            assert!((gap - 0.08).abs() < 1e-6, "{lo:?}->{hi:?} gap {gap}");
        }
        assert!((m.zone(Zone::Reverse).min - 0.04).abs() < 1e-6);
        assert!((m.zone(Zone::Takeoff).max - 0.96).abs() < 1e-6);
    }

    #[test]
    fn shares_are_taken_from_cumulative_levels() {
        let m = ZoneModel::recompute(&cal(0.28, 0.52, 0.72, 0.04)).with_shares(&SharesCfg {
            climb: 0.69,
            flex: 0.87,
            takeoff: 0.94,
        });
        assert!((m.zone(Zone::Climb).share - 0.69).abs() < 1e-6);
        assert!((m.zone(Zone::Flex).share - 0.18).abs() < 1e-6);
        assert!((m.zone(Zone::Takeoff).share - 0.07).abs() < 1e-6);
        assert!((m.level_after(Zone::Flex) - 0.87).abs() < 1e-6);
        assert!((m.max_output() - 0.94).abs() < 1e-6);
    }

    #[test]
    fn zero_length_zone_is_a_step() {
        let z = ThrustZone::span(0.5, 0.5);
        assert_eq!(z.ratio(0.5), 1.0);
        assert_eq!(z.ratio(0.2), 1.0);
    }

    #[test]
    fn locate_reports_gaps_as_none() {
        let m = ZoneModel::default();
        assert_eq!(m.locate(0.10), Some(Zone::Reverse));
        assert_eq!(m.locate(0.28), None);
        assert_eq!(m.locate(0.40), Some(Zone::Climb));
        assert_eq!(m.locate(0.99), None);
    }
}
