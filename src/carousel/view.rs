//! Terminal rendering.
//!
//! The list window is cut out of the track at the displayed offset, one
//! terminal cell per layout unit. Item text is stripped of escape sequences
//! before it is measured and clipped, so widths are always counted in
//! grapheme columns.

use super::transition::Motion;
use super::Model;
use lipgloss_extras::prelude::*;
use std::fmt::Display;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Rendering styles.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Every item that is not current.
    pub item: Style,
    /// The current item.
    pub current_item: Style,
    /// An enabled arrow.
    pub arrow: Style,
    /// A disabled arrow.
    pub disabled_arrow: Style,
    /// The dots row.
    pub dots: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        Self {
            item: Style::new(),
            current_item: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            arrow: Style::new().foreground(Color::from("62")),
            disabled_arrow: Style::new().foreground(subdued.clone()),
            dots: Style::new().foreground(subdued),
        }
    }
}

const PREV_ARROW: &str = "‹";
const NEXT_ARROW: &str = "›";
const UP_ARROW: &str = "▲";
const DOWN_ARROW: &str = "▼";

/// Plain text of `s` with escape sequences removed.
fn plain(s: &str) -> String {
    strip_ansi_escapes::strip_str(s)
}

/// Display width in terminal columns.
pub(super) fn text_width(s: &str) -> usize {
    s.graphemes(true).map(UnicodeWidthStr::width).sum()
}

/// Exactly `width` columns of `s`, starting at column `skip`. Wide graphemes
/// cut by either edge become spaces.
pub(super) fn clip(s: &str, skip: usize, width: usize) -> String {
    let mut out = String::new();
    let mut column = 0;
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        let (start, end) = (column, column + w);
        column = end;
        if end <= skip {
            continue;
        }
        if start >= skip + width {
            break;
        }
        if start < skip || end > skip + width {
            let cells = end.min(skip + width) - start.max(skip);
            out.push_str(&" ".repeat(cells));
            used += cells;
        } else {
            out.push_str(g);
            used += w;
        }
    }
    if used < width {
        out.push_str(&" ".repeat(width - used));
    }
    out
}

impl<T: Display> Model<T> {
    /// Renders the carousel: arrows, the list window and the dots row.
    pub fn view(&self) -> String {
        if self.disabled {
            return self
                .items
                .items()
                .iter()
                .map(|item| plain(&item.content.to_string()))
                .collect::<Vec<_>>()
                .join("\n");
        }
        if !self.measured || self.geometry.list_main() <= 0.0 {
            return String::new();
        }

        let rows = if self.options.crossfade {
            self.fade_rows()
        } else if self.options.vertical {
            self.vertical_rows()
        } else {
            self.horizontal_rows()
        };

        let mut lines = self.with_arrows(rows);
        if self.dots_shown() {
            lines.push(self.styles.dots.render(&self.dots.view()));
        }
        lines.join("\n")
    }

    fn list_rows(&self) -> usize {
        (self.geometry.list.height.round() as usize).max(1)
    }

    fn list_columns(&self) -> usize {
        self.geometry.list.width.round().max(0.0) as usize
    }

    fn item_lines(&self, index: usize) -> Vec<String> {
        self.items
            .get(index)
            .map(|item| {
                plain(&item.content.to_string())
                    .lines()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn styled(&self, index: usize, segment: &str) -> String {
        if index == self.state.current_index {
            self.styles.current_item.render(segment)
        } else {
            self.styles.item.render(segment)
        }
    }

    fn padding(&self) -> String {
        " ".repeat(self.geometry.center_padding.round().max(0.0) as usize)
    }

    fn fade_rows(&self) -> Vec<String> {
        let shown = match self.tween.as_ref().map(|t| &t.motion) {
            Some(Motion::Fade { outgoing, incoming }) => {
                if self.opacity(*incoming) >= self.opacity(*outgoing) {
                    *incoming
                } else {
                    *outgoing
                }
            }
            _ => self.state.current_index,
        };
        let lines = self.item_lines(shown);
        let width = self.list_columns();
        (0..self.list_rows())
            .map(|row| {
                let line = lines.get(row).map(String::as_str).unwrap_or("");
                self.styled(shown, &clip(line, 0, width))
            })
            .collect()
    }

    fn horizontal_rows(&self) -> Vec<String> {
        let width = self.list_columns() as isize;
        let base = self.display_offset();
        let track = self.items.track();
        let lines: Vec<Vec<String>> = (0..self.items.len()).map(|i| self.item_lines(i)).collect();
        let pad = self.padding();

        (0..self.list_rows())
            .map(|row| {
                let mut segments = Vec::new();
                let mut cursor = 0isize;
                for (position, entry) in track.iter().enumerate() {
                    let (Some(start), Some(extent)) = (
                        self.geometry.offset_of(position),
                        self.geometry.extent_of(position),
                    ) else {
                        continue;
                    };
                    let left = (start + base).round() as isize;
                    let right = (start + base + extent).round() as isize;
                    let (a, b) = (left.clamp(0, width), right.clamp(0, width));
                    if b <= a {
                        continue;
                    }
                    if a > cursor {
                        segments.push(" ".repeat((a - cursor) as usize));
                    }
                    let line = lines[entry.source]
                        .get(row)
                        .map(String::as_str)
                        .unwrap_or("");
                    let text = clip(line, (a - left) as usize, (b - a) as usize);
                    segments.push(self.styled(entry.source, &text));
                    cursor = b;
                }
                if cursor < width {
                    segments.push(" ".repeat((width - cursor) as usize));
                }
                if self.options.rtl {
                    segments.reverse();
                }
                format!("{}{}{}", pad, segments.concat(), pad)
            })
            .collect()
    }

    fn vertical_rows(&self) -> Vec<String> {
        let width = self.list_columns();
        let base = self.display_offset();
        let track = self.items.track();
        let mut rows = Vec::new();

        for row in 0..self.list_rows() {
            let y = row as f32 - base;
            let hit = track.iter().enumerate().find(|(position, _)| {
                match (
                    self.geometry.offset_of(*position),
                    self.geometry.extent_of(*position),
                ) {
                    (Some(start), Some(extent)) => y >= start && y < start + extent,
                    _ => false,
                }
            });
            let Some((position, entry)) = hit else {
                rows.push(" ".repeat(width));
                continue;
            };
            let start = self.geometry.offset_of(position).unwrap_or(0.0);
            let line_index = (y - start).floor().max(0.0) as usize;
            let lines = self.item_lines(entry.source);
            let line = lines.get(line_index).map(String::as_str).unwrap_or("");
            rows.push(self.styled(entry.source, &clip(line, 0, width)));
        }
        rows
    }

    fn arrow(&self, glyph: &str, enabled: bool) -> String {
        if enabled {
            self.styles.arrow.render(glyph)
        } else {
            self.styles.disabled_arrow.render(glyph)
        }
    }

    fn with_arrows(&self, rows: Vec<String>) -> Vec<String> {
        let arrows = self.arrows;
        if !arrows.shown {
            return rows;
        }

        if self.options.vertical {
            let width = self.list_columns();
            let centered = |glyph: String| {
                let left = width.saturating_sub(1) / 2;
                format!("{}{}", " ".repeat(left), glyph)
            };
            let mut lines = Vec::with_capacity(rows.len() + 2);
            lines.push(centered(self.arrow(UP_ARROW, arrows.prev_enabled)));
            lines.extend(rows);
            lines.push(centered(self.arrow(DOWN_ARROW, arrows.next_enabled)));
            return lines;
        }

        // Right-to-left: "next" sits on the left.
        let (left_enabled, right_enabled) = if self.options.rtl {
            (arrows.next_enabled, arrows.prev_enabled)
        } else {
            (arrows.prev_enabled, arrows.next_enabled)
        };
        let left = self.arrow(PREV_ARROW, left_enabled);
        let right = self.arrow(NEXT_ARROW, right_enabled);
        let middle = (rows.len().saturating_sub(1)) / 2;
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                if i == middle {
                    format!("{} {} {}", left, row, right)
                } else {
                    format!("  {}  ", row)
                }
            })
            .collect()
    }
}
