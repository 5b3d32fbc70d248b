//! Keyboard bindings for the carousel.

use crate::key::{Binding, KeyMap};
use crossterm::event::KeyCode;

/// Previous/next bindings. Right-to-left carousels swap their meaning.
#[derive(Debug, Clone)]
pub struct CarouselKeyMap {
    /// Previous item. Default: Left, `h`.
    pub prev: Binding,
    /// Next item. Default: Right, `l`.
    pub next: Binding,
}

impl Default for CarouselKeyMap {
    fn default() -> Self {
        Self {
            prev: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "previous slide"),
            next: Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l", "next slide"),
        }
    }
}

impl KeyMap for CarouselKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.prev, &self.next]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.prev, &self.next]]
    }
}
