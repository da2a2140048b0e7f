/// Small translucent readout window owned by the host UI.
pub trait Overlay {
    fn show(&mut self, text: &str);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// Overlay that renders nothing; used when the host has no widget support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    #[inline]
    fn show(&mut self, _text: &str) {}

    #[inline]
    fn hide(&mut self) {}

    #[inline]
    fn is_visible(&self) -> bool {
        false
    }
}
