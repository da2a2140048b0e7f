use std::cell::RefCell;
use std::rc::Rc;

use xnz_traits::Overlay;

/// Overlay that remembers what it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct SimOverlay {
    shown: Rc<RefCell<Option<String>>>,
}

impl SimOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.shown.borrow().clone()
    }
}

impl Overlay for SimOverlay {
    fn show(&mut self, text: &str) {
        *self.shown.borrow_mut() = Some(text.to_string());
    }

    fn hide(&mut self) {
        *self.shown.borrow_mut() = None;
    }

    fn is_visible(&self) -> bool {
        self.shown.borrow().is_some()
    }
}
