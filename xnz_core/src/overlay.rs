//! What the on-screen readout shows each nullzone tick.

use crate::config::OverlayCfg;

/// Smallest throttle change worth announcing.
const CHANGE_STEP: f32 = 0.0025;

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayView {
    Hidden,
    Throttle(String),
    Ice,
    Groundspeed(String),
}

impl OverlayView {
    pub fn text(&self) -> Option<&str> {
        match self {
            OverlayView::Hidden => None,
            OverlayView::Throttle(s) | OverlayView::Groundspeed(s) => Some(s),
            OverlayView::Ice => Some("ICE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayInputs<'a> {
    pub elapsed_s: f32,
    /// Current throttle setting (host read-back).
    pub throttle: f32,
    pub ice: &'a [f32],
    pub groundspeed_kts: f32,
    pub on_ground: bool,
    pub autothrottle_active: bool,
    /// Lever axes are captured; changes are shown more briefly.
    pub captured: bool,
    /// The last mapping tick was suppressed; do not announce it.
    pub suppress_change: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub view: OverlayView,
    /// Spoken once when icing is first detected.
    pub speak: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct OverlayModel {
    cfg: OverlayCfg,
    last_throttle: Option<f32>,
    show_left_s: f32,
    throttle_changed: bool,
    ice_timer_s: f32,
    ice: bool,
}

impl OverlayModel {
    pub fn new(cfg: OverlayCfg) -> Self {
        Self {
            cfg,
            last_throttle: None,
            show_left_s: 0.0,
            throttle_changed: false,
            ice_timer_s: 0.0,
            ice: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.cfg);
    }

    pub fn ice_detected(&self) -> bool {
        self.ice
    }

    pub fn update(&mut self, inp: &OverlayInputs<'_>) -> OverlayFrame {
        let last = *self.last_throttle.get_or_insert(inp.throttle);
        if (last - inp.throttle).abs() >= CHANGE_STEP {
            self.last_throttle = Some(inp.throttle);
            if !inp.suppress_change {
                self.throttle_changed = true;
                self.show_left_s = if inp.captured {
                    self.cfg.throttle_secs_captured
                } else {
                    self.cfg.throttle_secs
                };
            }
        }
        if self.show_left_s <= 0.0 || self.ice || inp.autothrottle_active {
            self.throttle_changed = false;
            self.show_left_s = 0.0;
        } else {
            self.show_left_s -= inp.elapsed_s;
        }

        let mut speak = None;
        self.ice_timer_s += inp.elapsed_s;
        if self.ice_timer_s >= self.cfg.ice_check_secs {
            if inp.ice.iter().any(|v| *v > self.cfg.ice_on) {
                if !self.ice {
                    speak = Some("ice detected");
                    tracing::info!("icing detected");
                }
                self.ice = true;
                self.throttle_changed = false;
            } else if inp.ice.iter().all(|v| *v < self.cfg.ice_off) {
                self.ice = false;
            }
            self.ice_timer_s = 0.0;
        }

        let view = if self.ice {
            OverlayView::Ice
        } else if self.throttle_changed {
            OverlayView::Throttle(format!("{:7.5}", inp.throttle))
        } else if inp.on_ground
            && inp.groundspeed_kts > self.cfg.taxi_min_kts
            && inp.groundspeed_kts < self.cfg.taxi_max_kts
        {
            OverlayView::Groundspeed(format!("{:2.0} kts", inp.groundspeed_kts))
        } else {
            OverlayView::Hidden
        };
        OverlayFrame { view, speak }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(throttle: f32, elapsed_s: f32) -> OverlayInputs<'static> {
        OverlayInputs {
            elapsed_s,
            throttle,
            ice: &[0.0; 4],
            groundspeed_kts: 0.0,
            on_ground: true,
            autothrottle_active: false,
            captured: false,
            suppress_change: false,
        }
    }

    #[test]
    fn throttle_change_shows_then_expires() {
        let mut m = OverlayModel::new(OverlayCfg::default());
        assert_eq!(m.update(&inputs(0.0, 0.05)).view, OverlayView::Hidden);
        let f = m.update(&inputs(0.5, 0.05));
        assert_eq!(f.view, OverlayView::Throttle("0.50000".into()));
        for _ in 0..70 {
            m.update(&inputs(0.5, 0.05));
        }
        assert_eq!(m.update(&inputs(0.5, 0.05)).view, OverlayView::Hidden);
    }

    #[test]
    fn suppressed_change_is_not_announced() {
        let mut m = OverlayModel::new(OverlayCfg::default());
        m.update(&inputs(0.3, 0.05));
        let mut inp = inputs(0.0, 0.05);
        inp.suppress_change = true;
        assert_eq!(m.update(&inp).view, OverlayView::Hidden);
    }

    #[test]
    fn ice_is_spoken_once_and_clears_with_hysteresis() {
        let mut m = OverlayModel::new(OverlayCfg::default());
        let iced = [0.0, 0.05, 0.0, 0.0];
        let mut inp = inputs(0.0, 10.0);
        inp.ice = &iced;
        let f = m.update(&inp);
        assert_eq!(f.view, OverlayView::Ice);
        assert_eq!(f.speak, Some("ice detected"));
        assert_eq!(m.update(&inp).speak, None);

        let fading = [0.03; 4];
        inp.ice = &fading;
        assert_eq!(m.update(&inp).view, OverlayView::Ice);
        let clear = [0.0; 4];
        inp.ice = &clear;
        assert_eq!(m.update(&inp).view, OverlayView::Hidden);
    }

    #[test]
    fn taxi_speed_readout() {
        let mut m = OverlayModel::new(OverlayCfg::default());
        let mut inp = inputs(0.0, 0.05);
        inp.groundspeed_kts = 12.4;
        assert_eq!(m.update(&inp).view, OverlayView::Groundspeed("12 kts".into()));
        inp.on_ground = false;
        assert_eq!(m.update(&inp).view, OverlayView::Hidden);
    }
}
