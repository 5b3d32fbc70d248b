//! Responsive reconfiguration.
//!
//! The breakpoint table is scanned whenever the viewport watcher reports a new
//! size or media-query state. When the matching entry changes, the active
//! options are swapped wholesale: merged from the original options and the
//! entry's overrides, restored to the original options when nothing matches,
//! or torn down entirely for the disable sentinel.

use super::config::{merge_overrides, Breakpoint, BreakpointSettings, RespondTo};
use super::events::Event;
use super::layout::Size;
use super::Model;
use bubbletea_rs::Cmd;
use std::collections::HashMap;

/// New container and window size, pushed by the viewport watcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMsg {
    /// Container width.
    pub width: f32,
    /// Container height.
    pub height: f32,
    /// Window width, used for `respond_to = window`.
    pub window_width: f32,
}

impl ResizeMsg {
    /// A resize where the container spans the window.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            window_width: width,
        }
    }

    /// Sets a window width different from the container width.
    pub fn with_window_width(mut self, window_width: f32) -> Self {
        self.window_width = window_width;
        self
    }
}

/// A named media query changed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQueryMsg {
    /// Query name, matched against [`Breakpoint::name`].
    pub name: String,
    /// Whether the query now matches.
    pub matches: bool,
}

/// Breakpoints in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
    mobile_first: bool,
}

impl BreakpointTable {
    /// Builds a table. Entries are sorted largest-first, or smallest-first
    /// when `mobile_first`; a later entry with the same threshold replaces an
    /// earlier one.
    pub fn new(breakpoints: &[Breakpoint], mobile_first: bool) -> Self {
        let mut entries: Vec<Breakpoint> = Vec::with_capacity(breakpoints.len());
        for breakpoint in breakpoints {
            entries.retain(|e| e.width != breakpoint.width || e.name != breakpoint.name);
            entries.push(breakpoint.clone());
        }
        if mobile_first {
            entries.sort_by(|a, b| a.width.total_cmp(&b.width));
        } else {
            entries.sort_by(|a, b| b.width.total_cmp(&a.width));
        }
        Self {
            entries,
            mobile_first,
        }
    }

    /// Entries in scan order.
    pub fn entries(&self) -> &[Breakpoint] {
        &self.entries
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry that applies at `metric`: the last one whose
    /// threshold is satisfied in scan order. Named entries are satisfied while
    /// their query matches.
    pub fn matching(&self, metric: f32, queries: &HashMap<String, bool>) -> Option<usize> {
        let mut target = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let satisfied = match &entry.name {
                Some(name) => queries.get(name).copied().unwrap_or(false),
                None if self.mobile_first => metric > entry.width,
                None => metric < entry.width,
            };
            if satisfied {
                target = Some(i);
            }
        }
        target
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct Reconfigurator {
    pub(super) table: BreakpointTable,
    active: Option<usize>,
    queries: HashMap<String, bool>,
}

impl Reconfigurator {
    pub(super) fn new(table: BreakpointTable) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    // Keeps the reported query states.
    pub(super) fn replace_table(&mut self, table: BreakpointTable) {
        self.table = table;
        self.active = None;
    }
}

impl<T> Model<T> {
    /// The breakpoint currently in effect.
    pub fn active_breakpoint(&self) -> Option<&Breakpoint> {
        self.responsive
            .active
            .and_then(|i| self.responsive.table.entries().get(i))
    }

    /// The breakpoint table in scan order.
    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.responsive.table
    }

    /// How many structural refreshes have run.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    fn respond_to_width(&self) -> f32 {
        match self.original.respond_to {
            RespondTo::Window => self.window_width,
            RespondTo::Slider => self.container.width,
            RespondTo::Min => self.window_width.min(self.container.width),
        }
    }

    pub(super) fn on_resize(&mut self, msg: &ResizeMsg) -> Option<Cmd> {
        let initial = !self.measured;
        self.container = Size::new(msg.width, msg.height);
        self.window_width = msg.window_width;
        self.measured = true;
        self.check_responsive(initial)
    }

    pub(super) fn on_media_query(&mut self, msg: &MediaQueryMsg) -> Option<Cmd> {
        self.responsive
            .queries
            .insert(msg.name.clone(), msg.matches);
        if !self.measured {
            return None;
        }
        self.check_responsive(false)
    }

    pub(super) fn check_responsive(&mut self, initial: bool) -> Option<Cmd> {
        let metric = self.respond_to_width();
        let target = self
            .responsive
            .table
            .matching(metric, &self.responsive.queries);

        if target == self.responsive.active {
            if initial {
                return self.setup();
            }
            self.set_position();
            return None;
        }

        self.responsive.active = target;
        let threshold = target
            .and_then(|i| self.responsive.table.entries().get(i))
            .map(|entry| entry.width);
        tracing::debug!(id = self.id, metric, ?threshold, "breakpoint changed");

        let settings = target
            .and_then(|i| self.responsive.table.entries().get(i))
            .map(|entry| entry.options.clone());
        let cmd = match settings {
            Some(BreakpointSettings::Disable(_)) => {
                self.teardown();
                None
            }
            Some(BreakpointSettings::Overrides(overrides)) => {
                self.options = merge_overrides(&self.original, &overrides).effective();
                self.after_swap(initial)
            }
            None => {
                self.options = self.original.effective();
                self.after_swap(initial)
            }
        };
        if !initial {
            self.events.push(Event::Breakpoint { threshold });
        }
        cmd
    }

    fn after_swap(&mut self, initial: bool) -> Option<Cmd> {
        if initial {
            self.state.current_index = match self.items.len() {
                0 => 0,
                n => self.options.initial_index.min(n - 1),
            };
        }
        self.refresh()
    }
}
