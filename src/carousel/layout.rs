//! Layout measurement.
//!
//! The layout engine turns the reported container size and the item set into
//! a [`Geometry`]: the size of the list window, a uniform item extent, and the
//! start offset and extent of every track entry. Everything else reads a
//! geometry as an immutable snapshot until the next measurement.
//!
//! "Main axis" is horizontal unless the carousel is vertical, in which case
//! heights play the part widths normally do.

use super::config::Configuration;
use super::track::ItemSet;

/// A width and height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A measured layout frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Reported size of the carousel container.
    pub container: Size,
    /// Reported window width, used for breakpoint matching.
    pub window_width: f32,
    /// The visible list window, i.e. the container minus center padding.
    pub list: Size,
    /// Padding on each side of the list in centered mode.
    pub center_padding: f32,
    /// Uniform item extent along the main axis.
    pub item_extent: f32,
    /// Start of every track entry, measured from the track start.
    pub offsets: Vec<f32>,
    /// Main-axis extent of every track entry.
    pub extents: Vec<f32>,
    /// Total main-axis length of the track.
    pub track_length: f32,
    /// Cross-axis extent of the list; follows the current item with adaptive
    /// height.
    pub cross_extent: f32,
    vertical: bool,
}

impl Geometry {
    /// Main-axis extent of the list window.
    pub fn list_main(&self) -> f32 {
        if self.vertical {
            self.list.height
        } else {
            self.list.width
        }
    }

    /// Start offset of the track entry at `position`.
    pub fn offset_of(&self, position: usize) -> Option<f32> {
        self.offsets.get(position).copied()
    }

    /// Main-axis extent of the track entry at `position`.
    pub fn extent_of(&self, position: usize) -> Option<f32> {
        self.extents.get(position).copied()
    }

    /// Whether this frame was measured for a vertical track.
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }
}

/// Measures a layout frame.
///
/// `current` is the committed index, used for adaptive height.
pub fn measure<T>(
    options: &Configuration,
    items: &ItemSet<T>,
    container: Size,
    window_width: f32,
    current: usize,
) -> Geometry {
    let visible = options.visible_count.max(1) as f32;
    let container_main = if options.vertical {
        container.height
    } else {
        container.width
    };

    let center_padding = if options.centered {
        options
            .center_padding
            .unwrap_or_else(|| container_main / (visible + 1.0) / 2.0)
    } else {
        0.0
    };
    let list_main = (container_main - 2.0 * center_padding).max(0.0);
    let list = if options.vertical {
        Size::new(container.width, list_main)
    } else {
        Size::new(list_main, container.height)
    };

    let item_extent = (list_main / visible).ceil();

    let extents: Vec<f32> = items
        .track()
        .iter()
        .map(|entry| {
            let authored = items.get(entry.source).and_then(|item| {
                if options.vertical {
                    item.height
                } else {
                    item.width
                }
            });
            match authored {
                Some(extent) if options.variable_width => extent,
                _ => item_extent,
            }
        })
        .collect();

    let mut offsets = Vec::with_capacity(extents.len());
    let mut cursor = 0.0;
    for extent in &extents {
        offsets.push(cursor);
        cursor += extent;
    }

    let cross_default = if options.vertical {
        container.width
    } else {
        container.height
    };
    let cross_extent = if options.adaptive_height && !options.vertical {
        items
            .get(current)
            .and_then(|item| item.height)
            .unwrap_or(cross_default)
    } else {
        cross_default
    };

    tracing::trace!(
        list_main,
        item_extent,
        center_padding,
        track_length = cursor,
        "measured carousel layout"
    );

    Geometry {
        container,
        window_width,
        list,
        center_padding,
        item_extent,
        offsets,
        extents,
        track_length: cursor,
        cross_extent,
        vertical: options.vertical,
    }
}
