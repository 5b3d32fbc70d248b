//! Gesture recognizer.
//!
//! Pointer input arrives as [`PointerMsg`]s. A press with a single contact
//! starts tracking; moves write a live preview that drags the track under the
//! pointer; the release either navigates or snaps back. The preview is kept in
//! [`PreviewState`], apart from the committed index, and the position math
//! never reads it.

use super::events::Event;
use super::position;
use super::Model;
use bubbletea_rs::Cmd;
use serde::{Deserialize, Serialize};

/// Travel along the cross axis that marks a gesture as page scrolling.
const SCROLL_SLOP: f32 = 4.0;
/// Releases this short count as a click.
const CLICK_SLOP: f32 = 10.0;

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Contact started.
    Down,
    /// Contact moved.
    Move,
    /// Contact released.
    Up,
    /// Contact lost, e.g. the pointer left the window mid-drag.
    Cancel,
    /// Pointer entered the carousel.
    Enter,
    /// Pointer left the carousel.
    Leave,
}

/// What produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSource {
    /// A finger.
    #[default]
    Touch,
    /// A mouse; only honored with `draggable`.
    Mouse,
}

/// A pointer event routed to the carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerMsg {
    /// What happened.
    pub kind: PointerKind,
    /// Horizontal position in layout units.
    pub x: f32,
    /// Vertical position in layout units.
    pub y: f32,
    /// Number of simultaneous contacts.
    pub contacts: usize,
    /// Device.
    pub source: PointerSource,
}

impl PointerMsg {
    fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            contacts: 1,
            source: PointerSource::Touch,
        }
    }

    /// A single-finger press.
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    /// A single-finger move.
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    /// A single-finger release.
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    /// The pointer entered the carousel.
    pub fn enter() -> Self {
        Self::new(PointerKind::Enter, 0.0, 0.0)
    }

    /// The pointer left the carousel.
    pub fn leave() -> Self {
        Self::new(PointerKind::Leave, 0.0, 0.0)
    }

    /// Sets the number of contacts.
    pub fn with_contacts(mut self, contacts: usize) -> Self {
        self.contacts = contacts;
        self
    }

    /// Marks the event as coming from a mouse.
    pub fn mouse(mut self) -> Self {
        self.source = PointerSource::Mouse;
        self
    }
}

/// Direction of a gesture, classified from the start-to-end angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Toward the next item in reading order.
    Left,
    /// Toward the previous item.
    Right,
    /// Down, with vertical swiping.
    Down,
    /// Up, with vertical swiping.
    Up,
    /// Mostly vertical on a horizontal carousel.
    Vertical,
}

/// One tracked interaction, from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSample {
    /// Press position.
    pub start_x: f32,
    /// Press position.
    pub start_y: f32,
    /// Latest position.
    pub current_x: f32,
    /// Latest position.
    pub current_y: f32,
    /// Contacts at the press.
    pub finger_count: usize,
    /// Rounded travel along the swipe axis.
    pub traveled: f32,
    /// The drag was pulled past a finite end.
    pub edge_hit: bool,
    /// Travel needed to navigate.
    pub min_swipe: f32,
    /// Travel has passed the scroll slop along the swipe axis.
    pub swiping: bool,
    /// The gesture was taken as page scrolling and is ignored.
    pub scrolling: bool,
    moved: bool,
    swipe_offset: Option<f32>,
}

impl GestureSample {
    /// Classifies the gesture direction.
    pub fn direction(&self, rtl: bool, vertical_swiping: bool) -> SwipeDirection {
        let dx = self.start_x - self.current_x;
        let dy = self.start_y - self.current_y;
        let mut angle = dy.atan2(dx).to_degrees().round();
        if angle < 0.0 {
            angle = 360.0 - angle.abs();
        }

        let (forward, backward) = if rtl {
            (SwipeDirection::Right, SwipeDirection::Left)
        } else {
            (SwipeDirection::Left, SwipeDirection::Right)
        };
        if (0.0..=45.0).contains(&angle) || (315.0..=360.0).contains(&angle) {
            return forward;
        }
        if (135.0..=225.0).contains(&angle) {
            return backward;
        }
        if vertical_swiping {
            return if (35.0..=135.0).contains(&angle) {
                SwipeDirection::Down
            } else {
                SwipeDirection::Up
            };
        }
        SwipeDirection::Vertical
    }
}

/// The live drag preview, as a delta from the committed offset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreviewState {
    delta: f32,
}

impl PreviewState {
    /// Offset added to the committed offset while dragging; 0 when idle.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Whether a preview is applied.
    pub fn is_active(&self) -> bool {
        self.delta != 0.0
    }

    pub(super) fn set(&mut self, delta: f32) {
        self.delta = delta;
    }

    pub(super) fn clear(&mut self) {
        self.delta = 0.0;
    }
}

impl<T> Model<T> {
    /// The gesture being tracked, if any.
    pub fn gesture(&self) -> Option<&GestureSample> {
        self.gesture.as_ref()
    }

    /// The live drag preview.
    pub fn preview(&self) -> PreviewState {
        self.preview
    }

    pub(super) fn on_pointer(&mut self, msg: &PointerMsg) -> Option<Cmd> {
        match msg.kind {
            PointerKind::Down => {
                self.gesture_start(msg);
                None
            }
            PointerKind::Move => {
                self.gesture_move(msg);
                None
            }
            PointerKind::Up => self.gesture_end(msg),
            PointerKind::Cancel => {
                self.gesture_cancel();
                None
            }
            PointerKind::Enter => {
                self.set_hovered(true);
                None
            }
            PointerKind::Leave => {
                self.set_hovered(false);
                None
            }
        }
    }

    fn gesture_start(&mut self, msg: &PointerMsg) {
        if !self.options.swipe
            || (msg.source == PointerSource::Mouse && !self.options.draggable)
        {
            return;
        }
        if msg.contacts != 1 || self.items.len() <= self.options.visible_count {
            self.gesture = None;
            return;
        }

        let threshold = self.options.touch_threshold;
        let min_swipe = if self.options.vertical_swiping {
            self.geometry.list.height / threshold
        } else {
            self.geometry.list.width / threshold
        };
        self.gesture = Some(GestureSample {
            start_x: msg.x,
            start_y: msg.y,
            current_x: msg.x,
            current_y: msg.y,
            finger_count: msg.contacts,
            traveled: 0.0,
            edge_hit: false,
            min_swipe,
            swiping: false,
            scrolling: false,
            moved: false,
            swipe_offset: None,
        });
        self.state.is_dragging = true;
    }

    fn gesture_move(&mut self, msg: &PointerMsg) {
        if msg.contacts != 1 {
            self.gesture_cancel();
            return;
        }
        let current = self.state.current_index;
        let committed = self.committed_offset();
        let last_page = position::last_page(&self.options, self.items.len());
        let options = &self.options;
        let Some(sample) = self.gesture.as_mut() else {
            return;
        };
        if sample.scrolling {
            return;
        }

        sample.current_x = msg.x;
        sample.current_y = msg.y;
        sample.moved = true;

        let horizontal = (msg.x - sample.start_x).abs().round();
        let vertical = (msg.y - sample.start_y).abs().round();
        if !options.vertical_swiping && !sample.swiping && vertical > SCROLL_SLOP {
            sample.scrolling = true;
            return;
        }
        sample.traveled = if options.vertical_swiping {
            vertical
        } else {
            horizontal
        };
        if sample.traveled > SCROLL_SLOP {
            sample.swiping = true;
        }

        let direction = sample.direction(options.rtl, options.vertical_swiping);
        let sign = if options.vertical_swiping {
            if msg.y > sample.start_y {
                1.0
            } else {
                -1.0
            }
        } else {
            let rtl = if options.rtl { -1.0 } else { 1.0 };
            rtl * if msg.x > sample.start_x { 1.0 } else { -1.0 }
        };

        let mut travel = sample.traveled;
        sample.edge_hit = false;
        if !options.infinite
            && ((current == 0 && direction == SwipeDirection::Right)
                || (current >= last_page && direction == SwipeDirection::Left))
        {
            travel *= options.edge_friction;
            sample.edge_hit = true;
        }

        let list = self.geometry.list;
        let delta = if options.vertical && !options.vertical_swiping && list.width > 0.0 {
            travel * (list.height / list.width) * sign
        } else {
            travel * sign
        };
        tracing::trace!(traveled = sample.traveled, delta, "gesture move");

        if self.state.is_animating {
            sample.swipe_offset = None;
            return;
        }
        sample.swipe_offset = Some(committed + delta);
        if options.crossfade || !options.touch_move {
            return;
        }
        self.preview.set(delta);
    }

    fn gesture_end(&mut self, msg: &PointerMsg) -> Option<Cmd> {
        self.state.is_dragging = false;
        let mut sample = self.gesture.take()?;
        if msg.contacts == 1 && !sample.scrolling {
            sample.current_x = msg.x;
            sample.current_y = msg.y;
        }

        let (rtl, vertical_swiping) = (self.options.rtl, self.options.vertical_swiping);
        let mut cmd = None;
        if sample.moved {
            if sample.edge_hit {
                self.events.push(Event::Edge {
                    direction: sample.direction(rtl, vertical_swiping),
                });
            }

            if sample.traveled >= sample.min_swipe {
                let direction = sample.direction(rtl, vertical_swiping);
                let current = self.state.current_index as isize;
                let step = self.items_per_gesture(&sample) as isize;
                let target = match direction {
                    SwipeDirection::Left | SwipeDirection::Down => Some(current + step),
                    SwipeDirection::Right | SwipeDirection::Up => Some(current - step),
                    SwipeDirection::Vertical => None,
                };
                if let Some(target) = target {
                    let target = if self.options.swipe_to_slide {
                        position::check_navigable(&self.options, self.items.len(), target)
                    } else {
                        target
                    };
                    tracing::debug!(?direction, target, "swipe");
                    cmd = self.go_to(target);
                    self.events.push(Event::Swipe { direction });
                }
            } else if sample.current_x != sample.start_x || sample.current_y != sample.start_y {
                cmd = self.go_to(self.state.current_index as isize);
            }
        }
        if sample.traveled <= CLICK_SLOP {
            self.events.push(Event::Click);
        }
        self.preview.clear();
        cmd
    }

    fn gesture_cancel(&mut self) {
        if self.gesture.take().is_some() {
            tracing::trace!("gesture cancelled");
        }
        self.state.is_dragging = false;
        self.preview.clear();
    }

    // Items to advance for a completed swipe.
    fn items_per_gesture(&self, sample: &GestureSample) -> usize {
        if !self.options.swipe_to_slide {
            return self.options.scroll_count;
        }

        let swipe_offset = sample.swipe_offset.unwrap_or_else(|| self.committed_offset());
        let center = if self.options.centered {
            (self.geometry.list_main() / 2.0).floor()
        } else {
            0.0
        };
        let swipe_target = -swipe_offset + center;
        let current = self.state.current_index as isize;

        self.items
            .track()
            .iter()
            .enumerate()
            .find_map(|(position, entry)| {
                let start = self.geometry.offset_of(position)?;
                let extent = self.geometry.extent_of(position)?;
                let mut point = start;
                if !self.options.centered {
                    point += extent / 2.0;
                }
                (swipe_target < point + extent).then_some(entry.synthetic_index)
            })
            .map(|index| (index - current).unsigned_abs())
            .filter(|&traversed| traversed > 0)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Configuration, Item, ResizeMsg};

    fn carousel(n: usize, options: Configuration) -> Model<String> {
        let items = (0..n).map(|i| Item::new(format!("slide {}", i))).collect();
        let mut m = Model::new(items, options);
        m.update(Box::new(ResizeMsg::new(400.0, 10.0)));
        m.take_events();
        m
    }

    fn sample(dx: f32, dy: f32) -> GestureSample {
        GestureSample {
            start_x: 100.0,
            start_y: 100.0,
            current_x: 100.0 + dx,
            current_y: 100.0 + dy,
            finger_count: 1,
            traveled: 0.0,
            edge_hit: false,
            min_swipe: 0.0,
            swiping: false,
            scrolling: false,
            moved: true,
            swipe_offset: None,
        }
    }

    #[test]
    fn test_direction_sectors() {
        assert_eq!(sample(-50.0, 0.0).direction(false, false), SwipeDirection::Left);
        assert_eq!(sample(-50.0, 30.0).direction(false, false), SwipeDirection::Left);
        assert_eq!(sample(50.0, 0.0).direction(false, false), SwipeDirection::Right);
        assert_eq!(sample(0.0, 50.0).direction(false, false), SwipeDirection::Vertical);
        assert_eq!(sample(-50.0, 0.0).direction(true, false), SwipeDirection::Right);
        assert_eq!(sample(0.0, -50.0).direction(false, true), SwipeDirection::Down);
        assert_eq!(sample(0.0, 50.0).direction(false, true), SwipeDirection::Up);
    }

    #[test]
    fn test_drag_previews_without_moving_index() {
        let mut m = carousel(5, Configuration::default());
        let committed = m.display_offset();
        m.update(Box::new(PointerMsg::down(200.0, 5.0)));
        assert!(m.is_dragging());
        m.update(Box::new(PointerMsg::moved(170.0, 5.0)));
        assert_eq!(m.preview().delta(), -30.0);
        assert_eq!(m.display_offset(), committed - 30.0);
        assert_eq!(m.current(), 0);
        assert_eq!(m.committed_offset(), committed);
    }

    #[test]
    fn test_multi_touch_is_ignored() {
        let mut m = carousel(5, Configuration::default());
        m.update(Box::new(PointerMsg::down(200.0, 5.0).with_contacts(2)));
        assert!(m.gesture().is_none());

        m.update(Box::new(PointerMsg::down(200.0, 5.0)));
        m.update(Box::new(PointerMsg::moved(150.0, 5.0)));
        m.update(Box::new(PointerMsg::moved(100.0, 5.0).with_contacts(2)));
        assert!(m.gesture().is_none());
        assert!(!m.preview().is_active());
        assert!(m.update(Box::new(PointerMsg::up(100.0, 5.0))).is_none());
        assert_eq!(m.current(), 0);
    }

    #[test]
    fn test_vertical_motion_is_scrolling() {
        let mut m = carousel(5, Configuration::default());
        m.update(Box::new(PointerMsg::down(200.0, 5.0)));
        m.update(Box::new(PointerMsg::moved(199.0, 12.0)));
        assert!(m.gesture().unwrap().scrolling);
        m.update(Box::new(PointerMsg::moved(50.0, 12.0)));
        assert!(!m.preview().is_active());
    }

    #[test]
    fn test_mouse_requires_draggable() {
        let mut options = Configuration::default();
        options.draggable = false;
        let mut m = carousel(5, options);
        m.update(Box::new(PointerMsg::down(200.0, 5.0).mouse()));
        assert!(m.gesture().is_none());
        m.update(Box::new(PointerMsg::down(200.0, 5.0)));
        assert!(m.gesture().is_some());
    }

    #[test]
    fn test_edge_friction_and_event() {
        let mut m = carousel(5, Configuration::default().with_infinite(false));
        m.update(Box::new(PointerMsg::down(100.0, 5.0)));
        m.update(Box::new(PointerMsg::moved(200.0, 5.0)));
        let sample = m.gesture().unwrap();
        assert!(sample.edge_hit);
        assert_eq!(m.preview().delta(), 100.0 * 0.35);

        m.update(Box::new(PointerMsg::up(200.0, 5.0)));
        let events = m.take_events();
        assert!(events.contains(&Event::Edge {
            direction: SwipeDirection::Right
        }));
        // Swiping right at index 0 of a finite track settles in place.
        assert_eq!(m.current(), 0);
    }

    #[test]
    fn test_short_release_is_click() {
        let mut m = carousel(5, Configuration::default());
        m.update(Box::new(PointerMsg::down(200.0, 5.0)));
        m.update(Box::new(PointerMsg::up(200.0, 5.0)));
        assert_eq!(m.take_events(), vec![Event::Click]);
        assert!(!m.is_dragging());
    }

    #[test]
    fn test_rtl_swipe_goes_forward() {
        let mut m = carousel(5, Configuration::default().with_rtl(true));
        m.update(Box::new(PointerMsg::down(100.0, 5.0)));
        m.update(Box::new(PointerMsg::moved(200.0, 5.0)));
        assert_eq!(m.preview().delta(), -100.0);
        m.update(Box::new(PointerMsg::up(200.0, 5.0)));
        assert_eq!(m.current(), 1);
    }

    #[test]
    fn test_swipe_to_slide_counts_traversed_items() {
        let mut options = Configuration::default().with_visible_count(4);
        options.swipe_to_slide = true;
        let mut m = carousel(10, options);
        // extent 100; dragging 250 left passes two item midpoints
        m.update(Box::new(PointerMsg::down(300.0, 5.0)));
        m.update(Box::new(PointerMsg::moved(50.0, 5.0)));
        m.update(Box::new(PointerMsg::up(50.0, 5.0)));
        assert_eq!(m.current(), 2);
    }
}
