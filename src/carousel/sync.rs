//! Per-entry display attributes, arrow state and dots.
//!
//! Everything here is derived from the options, the track and the current
//! index. [`attributes`] and [`arrows`] are pure; [`Model::sync`] stores their
//! results after every change so rendering never recomputes them.

use super::config::Configuration;
use super::position;
use super::track::TrackEntry;
use super::Model;
use std::ops::Range;

/// Display attributes of one track entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemAttributes {
    /// The real entry of the current item.
    pub current: bool,
    /// Inside the visible window.
    pub active: bool,
    /// The centered entry, or a clone mirroring it at the seam.
    pub center: bool,
    /// Hidden from assistive tech: every entry that is not active.
    pub hidden: bool,
}

/// Enabled state of the previous/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrows {
    /// Whether arrows are shown at all.
    pub shown: bool,
    /// Whether "previous" can be used.
    pub prev_enabled: bool,
    /// Whether "next" can be used.
    pub next_enabled: bool,
}

impl Default for Arrows {
    fn default() -> Self {
        Self {
            shown: false,
            prev_enabled: true,
            next_enabled: true,
        }
    }
}

fn clamp_range(start: isize, end: isize, len: usize) -> Range<usize> {
    let start = start.clamp(0, len as isize) as usize;
    let end = end.clamp(0, len as isize) as usize;
    start..end.max(start)
}

/// Computes the attributes of every track entry.
///
/// `clones` is the number of clones on each side of the track.
pub fn attributes(
    options: &Configuration,
    real: usize,
    track: &[TrackEntry],
    clones: usize,
    current: usize,
) -> Vec<ItemAttributes> {
    let len = track.len();
    let visible = options.visible_count as isize;
    let index = current as isize;
    let k = clones as isize;
    let mut attrs = vec![ItemAttributes::default(); len];

    let real_position = |i: usize| track.iter().position(|e| !e.cloned && e.source == i);
    if let Some(pos) = real_position(current) {
        attrs[pos].current = true;
    }

    let active = if options.centered {
        let even = if options.visible_count % 2 == 0 { 1 } else { 0 };
        let half = visible / 2;
        let at = k + index;
        let range = clamp_range(at - half + even, at + half + 1, len);

        if options.infinite && k > 0 {
            if current == 0 {
                attrs[(k as usize + real).min(len.saturating_sub(1))].center = true;
            } else if current + 1 == real {
                attrs[k as usize - 1].center = true;
            }
        }
        if let Some(pos) = real_position(current) {
            attrs[pos].center = true;
        }
        range
    } else if index + visible <= real as isize {
        clamp_range(k + index, k + index + visible, len)
    } else if len <= options.visible_count {
        0..len
    } else {
        let remainder = (real % options.visible_count.max(1)) as isize;
        let offset = k + index;
        if options.visible_count == options.scroll_count && (real as isize - index) < visible {
            clamp_range(offset - (visible - remainder), offset + remainder, len)
        } else {
            clamp_range(offset, offset + visible, len)
        }
    };

    for (i, attr) in attrs.iter_mut().enumerate() {
        attr.active = active.contains(&i);
        attr.hidden = !attr.active;
    }
    attrs
}

/// Computes the arrow state.
pub fn arrows(options: &Configuration, real: usize, current: usize) -> Arrows {
    let shown = options.arrows && real > options.visible_count;
    let mut arrows = Arrows {
        shown,
        ..Arrows::default()
    };
    if !shown || options.infinite {
        return arrows;
    }
    if current == 0 {
        arrows.prev_enabled = false;
    } else if !options.centered && current >= real - options.visible_count {
        arrows.next_enabled = false;
    } else if options.centered && current + 1 >= real {
        arrows.next_enabled = false;
    }
    arrows
}

impl<T> Model<T> {
    /// Attributes of every track entry, in track order.
    pub fn item_attributes(&self) -> &[ItemAttributes] {
        &self.attributes
    }

    /// Current arrow state.
    pub fn arrows(&self) -> Arrows {
        self.arrows
    }

    /// The dots indicator.
    pub fn dots(&self) -> &crate::paginator::Model {
        &self.dots
    }

    /// Whether dots are shown.
    pub fn dots_shown(&self) -> bool {
        self.options.dots && self.items.len() > self.options.visible_count
    }

    pub(super) fn sync(&mut self) {
        let real = self.items.len();
        let current = self.state.current_index;
        self.attributes = attributes(
            &self.options,
            real,
            self.items.track(),
            self.items.clones_per_side(),
            current,
        );
        self.arrows = arrows(&self.options, real, current);
        self.dots
            .set_total_pages(position::page_count(&self.options, real));
        self.dots.set_page(position::page_of(&self.options, current));
    }
}
