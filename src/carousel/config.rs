//! Carousel options.
//!
//! [`Configuration`] is the flat option bag the carousel runs with. Exactly one
//! configuration is active at a time; breakpoints never edit it in place but
//! produce a fresh value through [`merge_overrides`].
//!
//! Option bags can be loaded from JSON. Unrecognized keys are ignored so that
//! hosts can share one bag between several widgets.
//!
//! ```rust
//! use bubbletea_carousel::carousel::Configuration;
//!
//! let options = Configuration::from_json(r#"{
//!     "visible_count": 3,
//!     "infinite": false,
//!     "some_other_widget_key": true,
//!     "responsive": [
//!         { "width": 768, "options": { "visible_count": 1 } },
//!         { "width": 320, "options": "unslick" }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(options.visible_count, 3);
//! assert_eq!(options.responsive.len(), 2);
//! ```

use super::error::Result;
use super::transition::Easing;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How media is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LazyLoad {
    /// All media is expected to be present up front.
    #[default]
    Off,
    /// Load the visible window when it becomes current.
    OnDemand,
    /// Like `OnDemand`, plus one scroll step on each side.
    Anticipated,
    /// Load every item, one at a time, in track order.
    Progressive,
}

/// Which width the breakpoint table is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondTo {
    /// The window (terminal) width.
    #[default]
    Window,
    /// The carousel's own container width.
    Slider,
    /// The smaller of the two.
    Min,
}

/// The string accepted in place of an override object to disable the
/// carousel below (or above, when mobile-first) a breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentinel {
    /// Tear the carousel down entirely.
    #[serde(rename = "unslick")]
    Unslick,
}

/// What a breakpoint switches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreakpointSettings {
    /// Disable the widget while this breakpoint is active.
    Disable(Sentinel),
    /// Options applied on top of the original configuration.
    Overrides(Overrides),
}

/// One row of the breakpoint table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Width threshold.
    #[serde(alias = "breakpoint", default)]
    pub width: f32,
    /// Named media query; when set, the entry matches whenever the watcher
    /// last reported this query as matching, regardless of width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Settings switched to while the breakpoint is active.
    #[serde(alias = "settings")]
    pub options: BreakpointSettings,
}

impl Breakpoint {
    /// A width breakpoint with overrides.
    pub fn new(width: f32, overrides: Overrides) -> Self {
        Self {
            width,
            name: None,
            options: BreakpointSettings::Overrides(overrides),
        }
    }

    /// A width breakpoint that disables the carousel.
    pub fn disable(width: f32) -> Self {
        Self {
            width,
            name: None,
            options: BreakpointSettings::Disable(Sentinel::Unslick),
        }
    }

    /// A breakpoint keyed by a named media query.
    pub fn named(name: impl Into<String>, width: f32, options: BreakpointSettings) -> Self {
        Self {
            width,
            name: Some(name.into()),
            options,
        }
    }
}

/// The active option bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Items visible at once.
    pub visible_count: usize,
    /// Items advanced per step.
    pub scroll_count: usize,
    /// Loop past either end using cloned items.
    pub infinite: bool,
    /// Keep the current item in the middle of the viewport.
    pub centered: bool,
    /// Side padding in centered mode. `None` reserves half an item.
    pub center_padding: Option<f32>,
    /// Transition by opacity instead of moving the track.
    pub crossfade: bool,
    /// Lay the track out top to bottom.
    pub vertical: bool,
    /// Recognize swipes along the vertical axis.
    pub vertical_swiping: bool,
    /// Right-to-left reading order.
    pub rtl: bool,
    /// Keep authored item widths instead of a uniform grid.
    pub variable_width: bool,
    /// Size the list's cross axis to the current item.
    pub adaptive_height: bool,
    /// Advance automatically.
    pub autoplay: bool,
    /// Milliseconds between autoplay advances.
    pub autoplay_interval_ms: u64,
    /// Hovering the carousel interrupts autoplay.
    pub pause_on_hover: bool,
    /// Focus inside the carousel suspends autoplay.
    pub pause_on_focus: bool,
    /// Transition duration in milliseconds.
    pub speed_ms: u64,
    /// Transition easing curve.
    pub easing: Easing,
    /// Ignore navigation requests while a transition runs.
    pub wait_for_animate: bool,
    /// Recognize touch swipes.
    pub swipe: bool,
    /// Recognize mouse drags.
    pub draggable: bool,
    /// Move the track under the pointer while dragging.
    pub touch_move: bool,
    /// Minimum swipe is the viewport extent divided by this.
    pub touch_threshold: f32,
    /// Drag multiplier when pulling past a finite end.
    pub edge_friction: f32,
    /// Advance by the number of items actually dragged past.
    pub swipe_to_slide: bool,
    /// Index shown after initialization.
    pub initial_index: usize,
    /// Media materialization strategy.
    pub lazy_load: LazyLoad,
    /// Extra items loaded on each side of the visible window.
    pub lazy_preload: usize,
    /// Render navigation dots.
    pub dots: bool,
    /// Render and sync previous/next arrows.
    pub arrows: bool,
    /// Keyboard navigation and hidden-state attributes.
    pub accessibility: bool,
    /// Breakpoint table.
    pub responsive: Vec<Breakpoint>,
    /// Scan breakpoints smallest-first and match widths above the threshold.
    pub mobile_first: bool,
    /// Which width the breakpoints are compared against.
    pub respond_to: RespondTo,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            visible_count: 1,
            scroll_count: 1,
            infinite: true,
            centered: false,
            center_padding: None,
            crossfade: false,
            vertical: false,
            vertical_swiping: false,
            rtl: false,
            variable_width: false,
            adaptive_height: false,
            autoplay: false,
            autoplay_interval_ms: 3000,
            pause_on_hover: true,
            pause_on_focus: true,
            speed_ms: 300,
            easing: Easing::default(),
            wait_for_animate: true,
            swipe: true,
            draggable: true,
            touch_move: true,
            touch_threshold: 5.0,
            edge_friction: 0.35,
            swipe_to_slide: false,
            initial_index: 0,
            lazy_load: LazyLoad::Off,
            lazy_preload: 0,
            dots: false,
            arrows: true,
            accessibility: true,
            responsive: Vec::new(),
            mobile_first: false,
            respond_to: RespondTo::Window,
        }
    }
}

impl Configuration {
    /// Parses an option bag, ignoring keys the carousel does not know.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the number of visible items.
    pub fn with_visible_count(mut self, n: usize) -> Self {
        self.visible_count = n;
        self
    }

    /// Sets the number of items advanced per step.
    pub fn with_scroll_count(mut self, n: usize) -> Self {
        self.scroll_count = n;
        self
    }

    /// Enables or disables infinite looping.
    pub fn with_infinite(mut self, infinite: bool) -> Self {
        self.infinite = infinite;
        self
    }

    /// Enables or disables centered mode.
    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    /// Enables or disables crossfade transitions.
    pub fn with_crossfade(mut self, crossfade: bool) -> Self {
        self.crossfade = crossfade;
        self
    }

    /// Enables or disables the vertical layout.
    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    /// Enables or disables right-to-left order.
    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Enables or disables authored item widths.
    pub fn with_variable_width(mut self, variable_width: bool) -> Self {
        self.variable_width = variable_width;
        self
    }

    /// Enables autoplay with the given interval.
    pub fn with_autoplay(mut self, interval: Duration) -> Self {
        self.autoplay = true;
        self.autoplay_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Sets the transition duration.
    pub fn with_speed(mut self, speed: Duration) -> Self {
        self.speed_ms = speed.as_millis() as u64;
        self
    }

    /// Sets the lazy loading strategy.
    pub fn with_lazy_load(mut self, mode: LazyLoad) -> Self {
        self.lazy_load = mode;
        self
    }

    /// Appends a breakpoint to the table.
    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.responsive.push(breakpoint);
        self
    }

    /// The transition duration.
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    /// The autoplay interval.
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    /// The options the engine actually runs with.
    ///
    /// Crossfade shows exactly one item and cannot be centered. Centered mode
    /// and swipe-to-slide always advance one item at a time.
    pub fn effective(&self) -> Self {
        let mut options = self.clone();
        if options.crossfade {
            options.centered = false;
            options.visible_count = 1;
            options.scroll_count = 1;
        }
        if options.centered || options.swipe_to_slide {
            options.scroll_count = 1;
        }
        options
    }
}

/// A partial option bag, applied over a base configuration.
///
/// Only the options that make sense per breakpoint are present; the breakpoint
/// table itself and its scan settings always come from the base. Each field
/// has the meaning of its [`Configuration`] namesake.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub visible_count: Option<usize>,
    pub scroll_count: Option<usize>,
    pub infinite: Option<bool>,
    pub centered: Option<bool>,
    pub center_padding: Option<f32>,
    pub crossfade: Option<bool>,
    pub vertical: Option<bool>,
    pub vertical_swiping: Option<bool>,
    pub rtl: Option<bool>,
    pub variable_width: Option<bool>,
    pub adaptive_height: Option<bool>,
    pub autoplay: Option<bool>,
    pub autoplay_interval_ms: Option<u64>,
    pub pause_on_hover: Option<bool>,
    pub pause_on_focus: Option<bool>,
    pub speed_ms: Option<u64>,
    pub easing: Option<Easing>,
    pub wait_for_animate: Option<bool>,
    pub swipe: Option<bool>,
    pub draggable: Option<bool>,
    pub touch_move: Option<bool>,
    pub touch_threshold: Option<f32>,
    pub edge_friction: Option<f32>,
    pub swipe_to_slide: Option<bool>,
    pub initial_index: Option<usize>,
    pub lazy_load: Option<LazyLoad>,
    pub lazy_preload: Option<usize>,
    pub dots: Option<bool>,
    pub arrows: Option<bool>,
    pub accessibility: Option<bool>,
}

impl Overrides {
    /// Overrides that only change the visible count.
    pub fn visible(n: usize) -> Self {
        Self {
            visible_count: Some(n),
            ..Self::default()
        }
    }
}

macro_rules! overlay {
    ($base:ident, $over:ident; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$over.$field {
                $base.$field = value.clone();
            }
        )+
    };
}

/// Produces a new configuration with `overrides` applied over `base`.
///
/// The base is left untouched; it stays available for reverting when no
/// breakpoint matches anymore.
pub fn merge_overrides(base: &Configuration, overrides: &Overrides) -> Configuration {
    let mut merged = base.clone();
    overlay!(merged, overrides;
        visible_count, scroll_count, infinite, centered, crossfade, vertical,
        vertical_swiping, rtl, variable_width, adaptive_height, autoplay,
        autoplay_interval_ms, pause_on_hover, pause_on_focus, speed_ms, easing,
        wait_for_animate, swipe, draggable, touch_move, touch_threshold,
        edge_friction, swipe_to_slide, initial_index, lazy_load, lazy_preload,
        dots, arrows, accessibility,
    );
    if overrides.center_padding.is_some() {
        merged.center_padding = overrides.center_padding;
    }
    merged
}
