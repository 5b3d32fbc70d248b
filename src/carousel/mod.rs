//! A carousel (slideshow) component for bubbletea-rs applications.
//!
//! The carousel shows a window onto a strip of items and moves that window
//! with animated transitions. It supports:
//!
//! - **Infinite looping** through clone entries at both ends of the track
//! - **Paging** by `scroll_count` items, with dots and arrows kept in sync
//! - **Swipe and drag gestures** with a live preview and edge friction
//! - **Autoplay** that pauses on hover, focus or a hidden page
//! - **Lazy media**: the carousel decides what to load, the host loads it
//! - **Responsive breakpoints** that swap the options as the viewport changes
//! - **Crossfade** and **centered** display modes
//!
//! ## Driving the carousel
//!
//! Everything happens through [`Model::update`]. The host forwards the
//! carousel's own frame and tick messages, plus the inputs it observes:
//! [`ResizeMsg`] from the viewport watcher, [`PointerMsg`] for gestures,
//! [`MediaLoadedMsg`] / [`MediaFailedMsg`] from its media loader and
//! `KeyMsg` while the carousel is focused. Nothing is laid out until the first
//! [`ResizeMsg`] arrives.
//!
//! What the carousel did is queued as [`Event`]s and drained with
//! [`Model::take_events`].
//!
//! ```rust
//! use bubbletea_carousel::carousel::{Configuration, Event, Item, Model, ResizeMsg};
//!
//! let items = ["first", "second", "third"]
//!     .iter()
//!     .map(|s| Item::new(s.to_string()))
//!     .collect();
//! let mut carousel = Model::new(items, Configuration::default());
//! carousel.update(Box::new(ResizeMsg::new(40.0, 1.0)));
//!
//! carousel.next();
//! carousel.finish_transition();
//! assert_eq!(carousel.current(), 1);
//! assert!(carousel
//!     .take_events()
//!     .contains(&Event::AfterChange { index: 1 }));
//! ```

mod autoplay;
mod collab;
mod config;
mod error;
mod events;
mod gesture;
mod keys;
mod layout;
mod lazyload;
pub mod position;
mod responsive;
mod sync;
mod track;
mod transition;
mod view;

#[cfg(test)]
mod tests;

pub use autoplay::{Direction, TickMsg, VisibilityMsg};
pub use collab::{AnimationDoneMsg, AnimationTicket, Animator};
pub use config::{
    merge_overrides, Breakpoint, BreakpointSettings, Configuration, LazyLoad, Overrides,
    RespondTo, Sentinel,
};
pub use error::{Error, Result};
pub use events::Event;
pub use gesture::{
    GestureSample, PointerKind, PointerMsg, PointerSource, PreviewState, SwipeDirection,
};
pub use keys::CarouselKeyMap;
pub use layout::{measure, Geometry, Size};
pub use lazyload::{LazyRetryMsg, LoadState, MediaFailedMsg, MediaLoadedMsg};
pub use position::offset_for;
pub use responsive::{BreakpointTable, MediaQueryMsg, ResizeMsg};
pub use sync::{arrows, attributes, Arrows, ItemAttributes};
pub use track::{clone_count, Item, ItemSet, TrackEntry};
pub use transition::{Easing, FrameMsg, Phase, TransitionHandle};
pub use view::Styles;

use crate::paginator;
use crate::{Component, Widget};
use autoplay::Schedule;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use lazyload::MediaTable;
use responsive::Reconfigurator;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicI64, Ordering};
use transition::Tween;

// Internal ID management for carousel instances.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Runtime flags of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    /// The committed index, always in `[0, real_count)`.
    pub current_index: usize,
    /// Autoplay direction for finite tracks.
    pub direction: Direction,
    /// A transition is in flight.
    pub is_animating: bool,
    /// A drag is in progress.
    pub is_dragging: bool,
    /// Autoplay was paused explicitly.
    pub is_paused: bool,
    /// Autoplay is suspended by hover or a hidden page.
    pub is_interrupted: bool,
    /// The carousel has keyboard focus.
    pub is_focused: bool,
}

/// Everything [`Widget::init`] needs to build a carousel.
#[derive(Debug, Clone)]
pub struct CarouselInit<T> {
    /// The slides.
    pub items: Vec<Item<T>>,
    /// The option bag.
    pub options: Configuration,
}

/// The carousel.
pub struct Model<T> {
    id: i64,
    items: ItemSet<T>,
    // Options as given, before any breakpoint is applied.
    original: Configuration,
    // Options in effect.
    options: Configuration,
    container: Size,
    window_width: f32,
    measured: bool,
    geometry: Geometry,
    state: EngineState,
    offset: f32,
    preview: PreviewState,
    tween: Option<Tween>,
    frame_tag: i64,
    gesture: Option<GestureSample>,
    schedule: Schedule,
    responsive: Reconfigurator,
    media: MediaTable,
    attributes: Vec<ItemAttributes>,
    arrows: Arrows,
    dots: paginator::Model,
    events: Vec<Event>,
    refreshes: usize,
    disabled: bool,
    animator: Option<Box<dyn Animator>>,

    /// Keyboard bindings.
    pub keymap: CarouselKeyMap,
    /// Rendering styles.
    pub styles: Styles,
}

impl<T> Model<T> {
    /// Creates a carousel over `items`.
    ///
    /// The track is built immediately; layout waits for the first
    /// [`ResizeMsg`].
    pub fn new(items: Vec<Item<T>>, options: Configuration) -> Self {
        let effective = options.effective();
        let mut set = ItemSet::new(items);
        set.rebuild(&effective);
        let current = match set.len() {
            0 => 0,
            n => effective.initial_index.min(n - 1),
        };
        let table = BreakpointTable::new(&options.responsive, options.mobile_first);

        let mut model = Self {
            id: next_id(),
            items: set,
            original: options,
            options: effective,
            container: Size::default(),
            window_width: 0.0,
            measured: false,
            geometry: Geometry::default(),
            state: EngineState {
                current_index: current,
                ..EngineState::default()
            },
            offset: 0.0,
            preview: PreviewState::default(),
            tween: None,
            frame_tag: 0,
            gesture: None,
            schedule: Schedule::default(),
            responsive: Reconfigurator::new(table),
            media: MediaTable::default(),
            attributes: Vec::new(),
            arrows: Arrows::default(),
            dots: paginator::Model::new(),
            events: Vec::new(),
            refreshes: 0,
            disabled: false,
            animator: None,
            keymap: CarouselKeyMap::default(),
            styles: Styles::default(),
        };
        model.sync();
        model
    }

    /// Unique id; media messages must carry it.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The committed index.
    pub fn current(&self) -> usize {
        self.state.current_index
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    /// Whether the carousel was torn down.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether a size has been reported.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Engine flags.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The items and the track.
    pub fn items(&self) -> &ItemSet<T> {
        &self.items
    }

    /// Options in effect, breakpoint overrides included.
    pub fn options(&self) -> &Configuration {
        &self.options
    }

    /// Options as originally given.
    pub fn original_options(&self) -> &Configuration {
        &self.original
    }

    /// The current layout frame.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Track offset that brings `target` into view in the current layout.
    pub fn offset_for(&self, target: isize) -> f32 {
        offset_for(&self.options, &self.geometry, self.items.len(), target)
    }

    /// Drains the queued events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Handles a message.
    ///
    /// Once the carousel is disabled every message is ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if self.disabled {
            return None;
        }
        if let Some(frame) = msg.downcast_ref::<FrameMsg>() {
            return self.on_frame(frame);
        }
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            return self.on_tick(tick);
        }
        if let Some(pointer) = msg.downcast_ref::<PointerMsg>() {
            return self.on_pointer(pointer);
        }
        if let Some(resize) = msg.downcast_ref::<ResizeMsg>() {
            return self.on_resize(resize);
        }
        if let Some(query) = msg.downcast_ref::<MediaQueryMsg>() {
            return self.on_media_query(query);
        }
        if let Some(loaded) = msg.downcast_ref::<MediaLoadedMsg>() {
            self.on_media_loaded(loaded);
            return None;
        }
        if let Some(failed) = msg.downcast_ref::<MediaFailedMsg>() {
            return self.on_media_failed(failed);
        }
        if let Some(retry) = msg.downcast_ref::<LazyRetryMsg>() {
            self.on_lazy_retry(retry);
            return None;
        }
        if let Some(done) = msg.downcast_ref::<AnimationDoneMsg>() {
            return self.on_animation_done(done);
        }
        if let Some(visibility) = msg.downcast_ref::<VisibilityMsg>() {
            self.on_visibility(visibility);
            return None;
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.on_key(key, &msg);
        }
        None
    }

    fn on_key(&mut self, key: &KeyMsg, msg: &Msg) -> Option<Cmd> {
        if !self.state.is_focused || !self.options.accessibility {
            return None;
        }
        let rtl = self.options.rtl;
        if self.keymap.prev.matches(key) {
            return if rtl { self.next() } else { self.prev() };
        }
        if self.keymap.next.matches(key) {
            return if rtl { self.prev() } else { self.next() };
        }
        if self.dots_shown() {
            if let Some(page) = self.dots.update(msg) {
                let cmd = self.go_to_page(page);
                // Rejected requests leave the dots where the carousel is.
                self.sync();
                return cmd;
            }
        }
        None
    }

    /// Tears the carousel down: autoplay, transitions and gestures stop, the
    /// clones are removed and further messages are ignored.
    pub fn destroy(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.disabled {
            return;
        }
        tracing::debug!(id = self.id, "carousel torn down");
        self.autoplay_clear();
        self.frame_tag += 1;
        self.tween = None;
        self.state.is_animating = false;
        self.gesture = None;
        self.state.is_dragging = false;
        self.preview.clear();
        self.items.strip_clones();
        self.disabled = true;
        self.events.push(Event::Destroyed);
    }

    /// Re-measures the layout without moving anything.
    fn relayout(&mut self) {
        self.geometry = measure(
            &self.options,
            &self.items,
            self.container,
            self.window_width,
            self.state.current_index,
        );
    }

    /// Re-measures and snaps to the committed index unless a transition is
    /// running.
    fn set_position(&mut self) {
        self.relayout();
        if !self.state.is_animating {
            self.offset = self.committed_offset();
        }
    }

    // First measurement with no breakpoint change.
    fn setup(&mut self) -> Option<Cmd> {
        tracing::debug!(id = self.id, real = self.items.len(), "carousel measured");
        self.set_position();
        self.sync();
        self.lazy_load();
        self.autoplay_arm()
    }

    /// Structural refresh: clamps the current index, rebuilds the track and
    /// layout, and re-applies the position without animating.
    pub fn refresh(&mut self) -> Option<Cmd> {
        if self.disabled {
            return None;
        }
        let real = self.items.len();
        let visible = self.options.visible_count;
        if !self.options.infinite && self.state.current_index > real.saturating_sub(visible) {
            self.state.current_index = real.saturating_sub(visible);
        }
        if real <= visible {
            self.state.current_index = 0;
        }
        self.refreshes += 1;
        tracing::debug!(id = self.id, refreshes = self.refreshes, "structural refresh");
        self.rebuild()
    }

    fn rebuild(&mut self) -> Option<Cmd> {
        self.frame_tag += 1;
        self.tween = None;
        self.state.is_animating = false;
        self.gesture = None;
        self.state.is_dragging = false;
        self.preview.clear();

        self.items.rebuild(&self.options);
        self.relayout();
        self.offset = self.committed_offset();
        self.sync();
        self.lazy_load();
        self.autoplay_arm()
    }

    // After the item set changed.
    fn reinit(&mut self) -> Option<Cmd> {
        let count = self.items.len();
        let current = self.state.current_index;
        if current >= count && current != 0 {
            self.state.current_index = current.saturating_sub(self.options.scroll_count);
        }
        if count > 0 && self.state.current_index >= count {
            self.state.current_index = count - 1;
        }
        if count <= self.options.visible_count {
            self.state.current_index = 0;
        }
        tracing::debug!(id = self.id, count, current = self.state.current_index, "reinit");
        self.events.push(Event::Reinit);
        self.rebuild()
    }

    /// Adds an item. With `at == None` it goes at the end, or the start when
    /// `before`; otherwise it goes before or after item `at`. An `at` past the
    /// end is ignored.
    pub fn add(&mut self, item: Item<T>, at: Option<usize>, before: bool) -> Option<Cmd> {
        if self.disabled || !self.items.insert(item, at, before) {
            return None;
        }
        self.reinit()
    }

    /// Like [`add`](Model::add), but reports an `at` past the end.
    pub fn try_add(&mut self, item: Item<T>, at: Option<usize>, before: bool) -> Result<Option<Cmd>> {
        let count = self.items.len();
        match at {
            Some(index) if index >= count => Err(Error::ItemOutOfRange { index, count }),
            _ => Ok(self.add(item, at, before)),
        }
    }

    /// Removes item `index`, or the one before it when `before`. Invalid
    /// indexes are ignored.
    pub fn remove(&mut self, index: usize, before: bool) -> Option<Cmd> {
        if self.disabled {
            return None;
        }
        self.items.remove(index, before)?;
        self.reinit()
    }

    /// Like [`remove`](Model::remove), but returns the removed item and
    /// reports an invalid index.
    pub fn try_remove(&mut self, index: usize, before: bool) -> Result<(Item<T>, Option<Cmd>)> {
        let count = self.items.len();
        let removed = self
            .items
            .remove(index, before)
            .ok_or(Error::ItemOutOfRange { index, count })?;
        let cmd = if self.disabled { None } else { self.reinit() };
        Ok((removed, cmd))
    }

    /// Removes every item.
    pub fn remove_all(&mut self) -> Option<Cmd> {
        if self.disabled {
            return None;
        }
        self.items.clear();
        self.reinit()
    }

    /// Shows only the items matching `keep`.
    pub fn filter<F>(&mut self, keep: F) -> Option<Cmd>
    where
        T: Clone,
        F: FnMut(&Item<T>) -> bool,
    {
        if self.disabled {
            return None;
        }
        self.items.filter(keep);
        self.reinit()
    }

    /// Shows only the items whose text fuzzy-matches `query`, best first.
    pub fn filter_matching(&mut self, query: &str) -> Option<Cmd>
    where
        T: Clone + Display,
    {
        if self.disabled {
            return None;
        }
        self.items.filter_matching(query);
        self.reinit()
    }

    /// Restores the items hidden by a filter.
    pub fn unfilter(&mut self) -> Option<Cmd> {
        if self.disabled || !self.items.unfilter() {
            return None;
        }
        self.reinit()
    }

    /// Replaces the options and refreshes. The breakpoint table is re-read
    /// and re-evaluated.
    pub fn set_options(&mut self, options: Configuration) -> Option<Cmd> {
        if self.disabled {
            return None;
        }
        let table = BreakpointTable::new(&options.responsive, options.mobile_first);
        self.original = options;
        self.options = self.original.effective();
        self.responsive.replace_table(table);
        if !self.measured {
            self.items.rebuild(&self.options);
            self.sync();
            return None;
        }
        let before = self.refreshes;
        let cmd = self.check_responsive(false);
        if self.refreshes == before && !self.disabled {
            return self.refresh();
        }
        cmd
    }
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("real", &self.items.len())
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("preview", &self.preview)
            .field("measured", &self.measured)
            .field("disabled", &self.disabled)
            .field("refreshes", &self.refreshes)
            .finish_non_exhaustive()
    }
}

impl<T> Component for Model<T> {
    fn focus(&mut self) -> Option<Cmd> {
        self.state.is_focused = true;
        None
    }

    fn blur(&mut self) {
        self.state.is_focused = false;
    }

    fn focused(&self) -> bool {
        self.state.is_focused
    }
}

impl<T> Widget for Model<T> {
    type Config = CarouselInit<T>;

    fn init(config: Self::Config) -> (Self, Option<Cmd>) {
        let mut model = Model::new(config.items, config.options);
        let cmd = model.autoplay_arm();
        (model, cmd)
    }

    fn destroy(&mut self) {
        Model::destroy(self);
    }

    fn refresh(&mut self) -> Option<Cmd> {
        Model::refresh(self)
    }

    fn go_to(&mut self, index: isize) -> Option<Cmd> {
        Model::go_to(self, index)
    }

    fn current(&self) -> usize {
        Model::current(self)
    }
}

impl<T: Display + Send + 'static> BubbleTeaModel for Model<T> {
    fn init() -> (Self, Option<Cmd>) {
        (Model::new(Vec::new(), Configuration::default()), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        Model::update(self, msg)
    }

    fn view(&self) -> String {
        Model::view(self)
    }
}
