//! Lever position to thrust command curves.
//!
//! Every variant maps `[0, 1]` (0 = full reverse, 1 = full forward) onto
//! `[-1, 1]` and is monotonically non-decreasing, so a lever held still can
//! never produce a backward step.

use crate::zones::{Zone, ZoneModel};

/// Output quantum; removes sub-percent jitter from noisy potentiometers.
pub const JITTER_STEP: f32 = 0.0025;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurveVariant {
    /// Share-weighted linear ramps.
    #[default]
    Generic,
    /// Linear ramps with square-root easing in reverse.
    NlRev,
    /// Centered easing in every forward ramp plus square-root reverse.
    WRev,
    /// Challenger 300 detents (CRZ / CLB / TO).
    Ddcl30,
    /// Airbus detents (CLB / FLX-MCT / TOGA).
    Toliss,
}

impl CurveVariant {
    pub const ALL: [CurveVariant; 5] = [
        CurveVariant::Generic,
        CurveVariant::NlRev,
        CurveVariant::WRev,
        CurveVariant::Ddcl30,
        CurveVariant::Toliss,
    ];

    pub fn is_detented(self) -> bool {
        matches!(self, CurveVariant::Ddcl30 | CurveVariant::Toliss)
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveVariant::Generic => "generic",
            CurveVariant::NlRev => "nl-rev",
            CurveVariant::WRev => "w-rev",
            CurveVariant::Ddcl30 => "ddcl30",
            CurveVariant::Toliss => "toliss",
        }
    }
}

impl std::str::FromStr for CurveVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurveVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown curve variant '{s}'"))
    }
}

/// Ramp and plateau levels for a detented variant.
struct Detents {
    ramp: f32,
    climb: f32,
    flex: f32,
    takeoff: f32,
}

const DDCL30: Detents = Detents {
    ramp: 2.4 / 3.0,
    climb: 2.5 / 3.0,
    flex: 2.6 / 3.0,
    takeoff: 2.8 / 3.0,
};

const TOLISS: Detents = Detents {
    ramp: 0.68,
    climb: 0.69,
    flex: 0.87,
    takeoff: 1.0,
};

#[inline]
pub fn ease_standard(x: f32) -> f32 {
    x.clamp(0.0, 1.0).sqrt()
}

#[inline]
pub fn ease_inverted(x: f32) -> f32 {
    1.0 - (1.0 - x.clamp(0.0, 1.0)).sqrt()
}

/// Slow start and slow finish around a steep middle.
pub fn ease_centered(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        0.5 * ease_inverted(x * 2.0)
    } else if x > 0.5 {
        0.5 + 0.5 * ease_standard((x - 0.5) * 2.0)
    } else {
        0.5
    }
}

/// Round to the nearest `JITTER_STEP`. Idempotent.
#[inline]
pub fn quantize(v: f32) -> f32 {
    // +0.0 folds a rounded -0.0 into 0.0
    (v * (1.0 / JITTER_STEP)).round() * JITTER_STEP + 0.0
}

/// Map a lever position through `variant`.
pub fn map(raw: f32, zones: &ZoneModel, variant: CurveVariant) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    let x = raw.clamp(0.0, 1.0);
    let out = match variant {
        CurveVariant::Ddcl30 => detented(x, zones, &DDCL30),
        CurveVariant::Toliss => detented(x, zones, &TOLISS),
        CurveVariant::Generic => continuous(x, zones, reverse_linear, linear),
        CurveVariant::NlRev => continuous(x, zones, reverse_sqrt, linear),
        CurveVariant::WRev => continuous(x, zones, reverse_sqrt, ease_centered),
    };
    quantize(out.clamp(-1.0, 1.0))
}

#[inline]
fn linear(t: f32) -> f32 {
    t
}

#[inline]
fn reverse_linear(t: f32) -> f32 {
    0.9 * ease_inverted(t) - 1.0
}

#[inline]
fn reverse_sqrt(t: f32) -> f32 {
    ease_standard(t) - 1.0
}

fn detented(x: f32, zones: &ZoneModel, d: &Detents) -> f32 {
    let rev = zones.zone(Zone::Reverse);
    let clb = zones.zone(Zone::Climb);
    let to = zones.zone(Zone::Takeoff);
    let climb_top = zones.climb_detent() + 0.5 * (zones.flex_detent() - zones.climb_detent());
    let flex_top = zones.flex_detent() + 0.5 * (to.max - zones.flex_detent());

    if x < rev.min {
        return -1.0;
    }
    if x <= rev.max {
        return reverse_linear(rev.ratio(x));
    }
    if x > flex_top {
        d.takeoff
    } else if x > climb_top {
        d.flex
    } else if x > clb.max {
        d.climb
    } else if x > clb.min {
        d.ramp * ease_centered(clb.ratio(x))
    } else {
        0.0
    }
}

fn continuous(
    x: f32,
    zones: &ZoneModel,
    reverse: fn(f32) -> f32,
    ease: fn(f32) -> f32,
) -> f32 {
    let rev = zones.zone(Zone::Reverse);
    if x < rev.min {
        return -1.0;
    }
    if x <= rev.max {
        return reverse(rev.ratio(x));
    }
    // Walk forward zones from the top; gaps hold the level below them.
    for zone in [Zone::Takeoff, Zone::Flex, Zone::Climb] {
        let z = zones.zone(zone);
        let below = zones.level_after(zone) - z.share;
        if x > z.max {
            return below + z.share;
        }
        if x > z.min {
            return below + z.share * ease(z.ratio(x));
        }
    }
    0.0
}
