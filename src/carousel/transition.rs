//! Transition controller.
//!
//! "Move to item N" always goes through [`Model::go_to`]. A transition commits
//! the new index immediately and then animates the track (or, in crossfade
//! mode, the two items' opacity) over `speed_ms` with frame messages, in the
//! same id/tag style as the progress bar animation: every new transition bumps
//! the tag so frames from an interrupted or cancelled transition are dropped.
//!
//! When the tween finishes the controller runs its completion bookkeeping,
//! snapping the offset to the committed index. That snap is what makes the
//! jump from a clone back to its real item invisible.

use super::collab::AnimationTicket;
use super::events::Event;
use super::position::{self, offset_for};
use super::Model;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const FPS: u64 = 60;

fn frame_duration() -> Duration {
    Duration::from_nanos(1_000_000_000 / FPS)
}

/// Transition easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow end.
    EaseOut,
    /// Quadratic, slow start and end.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Message driving one animation frame.
///
/// Frames are scheduled by the carousel itself; applications only forward
/// them to [`Model::update`].
#[derive(Debug, Clone)]
pub struct FrameMsg {
    /// Carousel the frame belongs to.
    pub id: i64,
    pub(super) tag: i64,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight.
    Idle,
    /// A transition has committed and is animating.
    Animating,
}

/// Identifies the transition in flight so it can be cancelled later.
///
/// A handle goes stale as soon as another transition starts or the current
/// one completes; cancelling a stale handle does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionHandle {
    id: i64,
    tag: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Motion {
    Slide { from: f32, to: f32 },
    Fade { outgoing: usize, incoming: usize },
    // Driven by an installed animator; completes on its done message.
    External,
}

#[derive(Debug, Clone)]
pub(super) struct Tween {
    pub(super) motion: Motion,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    fn new(motion: Motion, duration: Duration, easing: Easing) -> Self {
        Self {
            motion,
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub(super) fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl<T> Model<T> {
    /// Navigates to `target`, which may be any integer.
    ///
    /// Returns the first frame command when a transition starts. Rejected
    /// requests return `None` and change nothing: while animating with
    /// `wait_for_animate`, in crossfade mode when `target` is already current,
    /// when every item fits in the viewport, and once the carousel is
    /// disabled.
    ///
    /// In infinite mode the committed index is `target` wrapped into the real
    /// range. In finite mode a target before the start or past the last page
    /// settles back on the current item.
    ///
    /// Navigation does not wait for the first [`ResizeMsg`](super::ResizeMsg):
    /// the index is committed right away and the track is laid out at it once
    /// a size arrives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_carousel::carousel::{Configuration, Item, Model};
    ///
    /// let items = (0..6).map(|i| Item::new(format!("slide {}", i))).collect();
    /// let mut carousel = Model::new(items, Configuration::default());
    ///
    /// let _frame = carousel.go_to(7);
    /// assert_eq!(carousel.current(), 1);
    /// assert!(carousel.is_animating());
    /// ```
    pub fn go_to(&mut self, target: isize) -> Option<Cmd> {
        self.slide_to(target, true)
    }

    /// Commits `target` without animating.
    pub fn jump_to(&mut self, target: isize) -> Option<Cmd> {
        self.slide_to(target, false)
    }

    /// Advances one step.
    ///
    /// When the real count divides evenly by `scroll_count` and the current
    /// index is off the page grid, the step re-aligns with it instead.
    pub fn next(&mut self) -> Option<Cmd> {
        let (real, visible) = (self.items.len(), self.options.visible_count);
        if real <= visible {
            return None;
        }
        let index_offset = self.index_offset();
        let step = if index_offset == 0 {
            self.options.scroll_count
        } else {
            index_offset
        };
        self.go_to(self.state.current_index as isize + step as isize)
    }

    /// Goes back one step.
    pub fn prev(&mut self) -> Option<Cmd> {
        let (real, visible) = (self.items.len(), self.options.visible_count);
        if real <= visible {
            return None;
        }
        let index_offset = self.index_offset();
        let step = if index_offset == 0 {
            self.options.scroll_count as isize
        } else {
            visible as isize - index_offset as isize
        };
        self.go_to(self.state.current_index as isize - step)
    }

    /// Navigates to the first item of `page`, snapped to a reachable index.
    pub fn go_to_page(&mut self, page: usize) -> Option<Cmd> {
        let index = (page * self.options.scroll_count.max(1)) as isize;
        let index = position::check_navigable(&self.options, self.items.len(), index);
        self.go_to(index)
    }

    fn index_offset(&self) -> usize {
        let real = self.items.len();
        let scroll = self.options.scroll_count.max(1);
        if real % scroll != 0 {
            0
        } else {
            (real - self.state.current_index.min(real)) % scroll
        }
    }

    /// Current controller phase.
    pub fn phase(&self) -> Phase {
        if self.state.is_animating {
            Phase::Animating
        } else {
            Phase::Idle
        }
    }

    /// Handle of the transition in flight, if any.
    pub fn transition(&self) -> Option<TransitionHandle> {
        self.state.is_animating.then_some(TransitionHandle {
            id: self.id,
            tag: self.frame_tag,
        })
    }

    /// Cancels a transition, settling at the committed index without
    /// animating the rest. Stale handles are ignored.
    pub fn cancel(&mut self, handle: TransitionHandle) -> Option<Cmd> {
        if self.transition() != Some(handle) {
            return None;
        }
        tracing::debug!(id = self.id, "transition cancelled");
        self.frame_tag += 1;
        self.post_transition()
    }

    /// Completes the running transition immediately.
    pub fn finish_transition(&mut self) -> Option<Cmd> {
        if !self.state.is_animating {
            return None;
        }
        self.frame_tag += 1;
        self.post_transition()
    }

    /// Opacity of real item `index`. Only meaningful in crossfade mode.
    pub fn opacity(&self, index: usize) -> f32 {
        if let Some(tween) = &self.tween {
            if let Motion::Fade { outgoing, incoming } = tween.motion {
                let eased = tween.eased();
                if index == incoming {
                    return eased;
                }
                if index == outgoing {
                    return 1.0 - eased;
                }
                return 0.0;
            }
        }
        if index == self.state.current_index {
            1.0
        } else {
            0.0
        }
    }

    pub(super) fn slide_to(&mut self, target: isize, animate: bool) -> Option<Cmd> {
        if self.disabled {
            return None;
        }
        let real = self.items.len();
        let current = self.state.current_index;
        if self.state.is_animating && self.options.wait_for_animate {
            tracing::trace!(target, "navigation rejected while animating");
            return None;
        }
        if self.options.crossfade && target == current as isize {
            return None;
        }
        if real <= self.options.visible_count {
            return None;
        }

        if !self.options.infinite && (target < 0 || target > self.last_target()) {
            return self.settle(animate);
        }

        let normalized = position::normalize(real, target);
        let k = self.items.clones_per_side() as isize;
        let track_end = real as isize + k - self.options.visible_count as isize;
        let in_track = target >= -k && target <= track_end;
        let animation_target = if in_track { target } else { normalized as isize };

        let from = self.display_offset();
        let to = offset_for(&self.options, &self.geometry, real, animation_target);

        tracing::debug!(id = self.id, from = current, to = normalized, target, "transition start");
        self.events.push(Event::BeforeChange {
            from: current,
            to: normalized,
        });
        self.state.is_animating = true;
        self.autoplay_clear();
        self.state.current_index = normalized;
        self.sync();
        self.lazy_load();

        self.frame_tag += 1;
        self.offset = from;
        self.preview.clear();

        if !animate {
            return self.post_transition();
        }

        if self.options.crossfade {
            if let Some(animator) = self.animator.as_mut() {
                let ticket = AnimationTicket {
                    id: self.id,
                    tag: self.frame_tag,
                };
                animator.animate_out(current, "fade_out", ticket);
                animator.animate_in(normalized, "fade_in", ticket);
                self.tween = Some(Tween::new(
                    Motion::External,
                    self.options.speed(),
                    self.options.easing,
                ));
                return None;
            }
            self.tween = Some(Tween::new(
                Motion::Fade {
                    outgoing: current,
                    incoming: normalized,
                },
                self.options.speed(),
                self.options.easing,
            ));
        } else {
            self.tween = Some(Tween::new(
                Motion::Slide { from, to },
                self.options.speed(),
                self.options.easing,
            ));
        }
        Some(self.next_frame())
    }

    /// Highest index a finite carousel navigates to.
    pub(super) fn last_target(&self) -> isize {
        let real = self.items.len() as isize;
        let scroll = self.options.scroll_count.max(1) as isize;
        if self.options.centered {
            real - scroll
        } else {
            position::last_page(&self.options, self.items.len()) as isize * scroll
        }
    }

    // Re-applies the current index after an out-of-range finite request.
    fn settle(&mut self, animate: bool) -> Option<Cmd> {
        if self.options.crossfade {
            return None;
        }
        tracing::debug!(id = self.id, current = self.state.current_index, "settling in place");
        let from = self.display_offset();
        let to = self.committed_offset();
        self.state.is_animating = true;
        self.autoplay_clear();
        self.frame_tag += 1;
        self.offset = from;
        self.preview.clear();
        if !animate {
            return self.post_transition();
        }
        self.tween = Some(Tween::new(
            Motion::Slide { from, to },
            self.options.speed(),
            self.options.easing,
        ));
        Some(self.next_frame())
    }

    pub(super) fn on_frame(&mut self, msg: &FrameMsg) -> Option<Cmd> {
        if msg.id != self.id || msg.tag != self.frame_tag {
            return None;
        }
        let tween = self.tween.as_mut()?;
        if tween.motion == Motion::External {
            return None;
        }

        tween.elapsed += frame_duration();
        if let Motion::Slide { from, to } = tween.motion {
            self.offset = from + (to - from) * tween.eased();
        }
        tracing::trace!(offset = self.offset, "transition frame");

        if tween.is_done() {
            return self.post_transition();
        }
        Some(self.next_frame())
    }

    /// Completion bookkeeping: Animating to Idle.
    pub(super) fn post_transition(&mut self) -> Option<Cmd> {
        self.tween = None;
        self.state.is_animating = false;
        let index = self.state.current_index;
        self.events.push(Event::AfterChange { index });
        tracing::debug!(id = self.id, index, "transition complete");

        self.offset = self.committed_offset();
        self.preview.clear();
        if self.options.adaptive_height {
            self.relayout();
        }
        self.sync();
        self.autoplay_arm()
    }

    /// Offset for the committed index.
    pub(super) fn committed_offset(&self) -> f32 {
        offset_for(
            &self.options,
            &self.geometry,
            self.items.len(),
            self.state.current_index as isize,
        )
    }

    /// Logical offset currently on screen, including any drag preview.
    pub fn display_offset(&self) -> f32 {
        self.offset + self.preview.delta()
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.frame_tag;
        bubbletea_tick(frame_duration(), move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    pub(super) fn frame_msg(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.frame_tag,
        }
    }
}
