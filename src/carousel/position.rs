//! Offset and paging math.
//!
//! Everything here is a pure function of the configuration, the measured
//! geometry and the real item count. [`offset_for`] is the only place track
//! offsets are derived; the transition controller, the gesture recognizer and
//! the renderer all call it rather than computing offsets themselves.
//!
//! Offsets are *logical*: they grow negative as the track moves toward its
//! end in reading order. [`render_offset`] converts one for display.

use super::config::Configuration;
use super::layout::Geometry;
use super::track::clone_count;

/// The main-axis track offset that brings `target` into view.
///
/// `target` may lie outside `[0, real)`; the clone region makes offsets for
/// `-1` and `real` meaningful in infinite mode.
///
/// # Examples
///
/// ```rust
/// use bubbletea_carousel::carousel::{measure, offset_for, Configuration, Item, ItemSet, Size};
///
/// let options = Configuration::default().with_infinite(false);
/// let mut items = ItemSet::new((0..5).map(|i| Item::new(i)).collect());
/// items.rebuild(&options);
/// let geometry = measure(&options, &items, Size::new(40.0, 3.0), 40.0, 0);
///
/// assert_eq!(offset_for(&options, &geometry, 5, 2), -80.0);
/// ```
pub fn offset_for(options: &Configuration, geometry: &Geometry, real: usize, target: isize) -> f32 {
    if options.variable_width {
        return variable_offset(options, geometry, real, target);
    }

    let count = real as isize;
    let visible = options.visible_count as isize;
    let scroll = options.scroll_count.max(1) as isize;
    let extent = geometry.item_extent;
    let mut slide_offset = 0.0;

    if options.infinite {
        if count > visible {
            let coef = match (options.vertical && options.centered, visible) {
                (true, 2) => -1.5,
                (true, 1) => -2.0,
                _ => -1.0,
            };
            slide_offset = extent * visible as f32 * coef;
        }
        if count % scroll != 0 && target + scroll > count && count > visible {
            slide_offset = if target > count {
                -((visible - (target - count)) as f32) * extent
            } else {
                -((count % scroll) as f32) * extent
            };
        }
    } else if target + visible > count {
        slide_offset = ((target + visible) - count) as f32 * extent;
    }

    if count <= visible {
        slide_offset = 0.0;
    }

    // Vertical tracks are centered through the coefficient above.
    if options.centered && !options.vertical {
        let half = (visible / 2) as f32;
        if count <= visible {
            slide_offset = (extent * visible as f32) / 2.0 - (extent * count as f32) / 2.0;
        } else if options.infinite {
            slide_offset += extent * half - extent;
        } else {
            slide_offset = extent * half;
        }
    }

    -(target as f32) * extent + slide_offset
}

// Offsets in the geometry are measured from the reading-order start of the
// track, which is already the mirrored left edge in RTL, so no flip is needed
// before `render_offset`.
fn variable_offset(options: &Configuration, geometry: &Geometry, real: usize, target: isize) -> f32 {
    let position = target + clone_count(options, real) as isize;
    let Ok(position) = usize::try_from(position) else {
        return 0.0;
    };
    let (Some(start), Some(extent)) = (geometry.offset_of(position), geometry.extent_of(position))
    else {
        return 0.0;
    };

    let mut offset = -start;
    if options.centered {
        offset += (geometry.list_main() - extent) / 2.0;
    }
    offset
}

/// Converts a logical offset into the on-screen translation.
///
/// Horizontal right-to-left tracks move the other way.
pub fn render_offset(options: &Configuration, logical: f32) -> f32 {
    if options.rtl && !options.vertical {
        -logical
    } else {
        logical
    }
}

/// Index of the last page, i.e. one less than the number of dots.
pub fn last_page(options: &Configuration, real: usize) -> usize {
    let visible = options.visible_count;
    let scroll = options.scroll_count.max(1);

    let pages = if options.infinite {
        if real <= visible {
            1
        } else {
            let mut pages = 0;
            let mut break_point = 0;
            let mut counter = 0;
            while break_point < real {
                pages += 1;
                break_point = counter + scroll;
                counter += scroll.min(visible.max(1));
            }
            pages
        }
    } else if options.centered {
        real
    } else if real <= visible {
        1
    } else {
        1 + (real - visible).div_ceil(scroll)
    };

    pages.saturating_sub(1)
}

/// Number of navigation dots.
pub fn page_count(options: &Configuration, real: usize) -> usize {
    if real == 0 {
        return 0;
    }
    last_page(options, real) + 1
}

/// Indexes a page step can land on.
pub fn navigable_indexes(options: &Configuration, real: usize) -> Vec<isize> {
    let scroll = options.scroll_count.max(1) as isize;
    let step = scroll.min(options.visible_count.max(1) as isize);
    let (mut break_point, mut counter, max) = if options.infinite {
        (-scroll, -scroll, real as isize * 2)
    } else {
        (0, 0, real as isize)
    };

    let mut indexes = Vec::new();
    while break_point < max {
        indexes.push(break_point);
        break_point = counter + scroll;
        counter += step;
    }
    indexes
}

/// Snaps `index` down to the nearest navigable index.
pub fn check_navigable(options: &Configuration, real: usize, index: isize) -> isize {
    let navigable = navigable_indexes(options, real);
    let Some(&last) = navigable.last() else {
        return index;
    };
    if index > last {
        return last;
    }

    let mut previous = 0;
    for &n in &navigable {
        if index < n {
            return previous;
        }
        previous = n;
    }
    index
}

/// Normalizes a raw target into `[0, real)` by wrapping modulo the real
/// count, whatever the paging.
pub fn normalize(real: usize, target: isize) -> usize {
    if real == 0 {
        return 0;
    }
    target.rem_euclid(real as isize) as usize
}

/// The active dot for `current`.
pub fn page_of(options: &Configuration, current: usize) -> usize {
    current / options.scroll_count.max(1)
}
