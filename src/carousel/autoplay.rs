//! Autoplay scheduler.
//!
//! A repeating tick, filtered by id and tag the way the timer component
//! filters its ticks. Clearing the schedule bumps the tag so ticks already in
//! flight are dropped; every transition clears it and every completed
//! transition re-arms it, so a manual navigation never races an autoplay
//! advance.
//!
//! While paused, hovered, on a hidden page, or focused (with
//! `pause_on_focus`), ticks keep arriving but do not advance.

use super::Model;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};

/// Sent on every autoplay interval.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Carousel the tick belongs to.
    pub id: i64,
    tag: i64,
}

/// Reports whether the page hosting the carousel is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityMsg {
    /// `true` while the page is hidden.
    pub hidden: bool,
}

/// Which way a finite carousel is autoplaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward the last item.
    #[default]
    Forward,
    /// Toward the first item.
    Backward,
}

#[derive(Debug, Clone, Default)]
pub(super) struct Schedule {
    tag: i64,
    running: bool,
    hovered: bool,
    hidden: bool,
}

impl<T> Model<T> {
    /// Enables autoplay and starts the schedule.
    pub fn play(&mut self) -> Option<Cmd> {
        self.options.autoplay = true;
        self.state.is_paused = false;
        self.schedule.hovered = false;
        self.schedule.hidden = false;
        self.state.is_interrupted = false;
        self.autoplay_arm()
    }

    /// Stops autoplay until [`play`](Model::play) is called.
    pub fn pause(&mut self) {
        self.autoplay_clear();
        self.state.is_paused = true;
    }

    /// Whether the autoplay schedule is armed.
    pub fn is_playing(&self) -> bool {
        self.schedule.running
    }

    /// Reports the pointer entering or leaving the carousel. With
    /// `pause_on_hover`, hovering suspends autoplay.
    pub fn set_hovered(&mut self, hovered: bool) {
        if self.options.pause_on_hover {
            self.schedule.hovered = hovered;
            self.sync_interrupted();
        }
    }

    pub(super) fn on_visibility(&mut self, msg: &VisibilityMsg) {
        self.schedule.hidden = msg.hidden;
        self.sync_interrupted();
    }

    // Hover and page visibility suspend independently.
    fn sync_interrupted(&mut self) {
        self.state.is_interrupted = self.schedule.hovered || self.schedule.hidden;
    }

    fn autoplay_suspended(&self) -> bool {
        self.state.is_paused
            || self.state.is_interrupted
            || (self.state.is_focused && self.options.pause_on_focus)
    }

    /// Re-arms the schedule when autoplay applies.
    pub(super) fn autoplay_arm(&mut self) -> Option<Cmd> {
        self.autoplay_clear();
        if !self.options.autoplay
            || self.state.is_paused
            || self.disabled
            || self.items.len() <= self.options.visible_count
        {
            return None;
        }
        self.schedule.running = true;
        Some(self.autoplay_tick())
    }

    pub(super) fn autoplay_clear(&mut self) {
        self.schedule.tag += 1;
        self.schedule.running = false;
    }

    fn autoplay_tick(&self) -> Cmd {
        let msg = self.tick_msg();
        bubbletea_tick(self.options.autoplay_interval(), move |_| {
            Box::new(msg.clone()) as Msg
        })
    }

    pub(super) fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.schedule.tag,
        }
    }

    pub(super) fn on_tick(&mut self, msg: &TickMsg) -> Option<Cmd> {
        if !self.schedule.running || msg.id != self.id || msg.tag != self.schedule.tag {
            return None;
        }
        if self.autoplay_suspended() {
            return Some(self.autoplay_tick());
        }

        let current = self.state.current_index as isize;
        let scroll = self.options.scroll_count as isize;
        let mut target = current + scroll;
        if !self.options.infinite {
            // Turn around at whichever end the next step would pass.
            let last = self.last_target();
            match self.state.direction {
                Direction::Forward if current + scroll > last => {
                    self.state.direction = Direction::Backward;
                }
                Direction::Backward if current - scroll < 0 => {
                    self.state.direction = Direction::Forward;
                }
                _ => {}
            }
            if self.state.direction == Direction::Backward {
                target = current - scroll;
            }
        }

        tracing::debug!(id = self.id, target, "autoplay advance");
        let cmd = self.go_to(target);
        if self.state.is_animating {
            return cmd;
        }
        // Rejected; keep the chain alive.
        Some(self.autoplay_tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Configuration, Item, ResizeMsg};
    use std::time::Duration;

    fn carousel(n: usize, options: Configuration) -> Model<String> {
        let items = (0..n).map(|i| Item::new(format!("slide {}", i))).collect();
        let mut m = Model::new(items, options);
        m.update(Box::new(ResizeMsg::new(400.0, 10.0)));
        m
    }

    fn autoplay() -> Configuration {
        Configuration::default().with_autoplay(Duration::from_millis(3000))
    }

    #[test]
    fn test_tick_advances_by_scroll() {
        let mut m = carousel(5, autoplay());
        assert!(m.is_playing());
        assert!(m.update(Box::new(m.tick_msg())).is_some());
        assert_eq!(m.current(), 1);
        // A transition clears the schedule until it completes.
        assert!(!m.is_playing());
        m.finish_transition();
        assert!(m.is_playing());
    }

    #[test]
    fn test_stale_tick_is_dropped() {
        let mut m = carousel(5, autoplay());
        let stale = m.tick_msg();
        m.go_to(2);
        m.finish_transition();
        assert!(m.update(Box::new(stale)).is_none());
        assert_eq!(m.current(), 2);
    }

    #[test]
    fn test_suspended_ticks_keep_chain() {
        let mut m = carousel(5, autoplay());
        m.set_hovered(true);
        assert!(m.update(Box::new(m.tick_msg())).is_some());
        assert_eq!(m.current(), 0);

        m.set_hovered(false);
        m.update(Box::new(VisibilityMsg { hidden: true }));
        m.update(Box::new(m.tick_msg()));
        assert_eq!(m.current(), 0);

        m.update(Box::new(VisibilityMsg { hidden: false }));
        m.update(Box::new(m.tick_msg()));
        assert_eq!(m.current(), 1);
    }

    #[test]
    fn test_hover_and_hidden_page_suspend_independently() {
        let mut m = carousel(5, autoplay());
        m.set_hovered(true);
        m.update(Box::new(VisibilityMsg { hidden: true }));
        m.set_hovered(false);
        assert!(m.state().is_interrupted);
        m.update(Box::new(m.tick_msg()));
        assert_eq!(m.current(), 0);

        m.update(Box::new(VisibilityMsg { hidden: false }));
        m.update(Box::new(m.tick_msg()));
        assert_eq!(m.current(), 1);
    }

    fn ticks(m: &mut Model<String>, n: usize) -> Vec<usize> {
        (0..n)
            .map(|_| {
                m.update(Box::new(m.tick_msg()));
                m.finish_transition();
                m.current()
            })
            .collect()
    }

    #[test]
    fn test_finite_reverses_with_paged_steps() {
        let options = autoplay()
            .with_infinite(false)
            .with_visible_count(2)
            .with_scroll_count(2);
        let mut m = carousel(6, options);
        assert_eq!(ticks(&mut m, 6), vec![2, 4, 2, 0, 2, 4]);
    }

    #[test]
    fn test_finite_reverses_with_wide_window() {
        let options = autoplay().with_infinite(false).with_visible_count(3);
        let mut m = carousel(5, options);
        assert_eq!(ticks(&mut m, 6), vec![1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_pause_and_play() {
        let mut m = carousel(5, autoplay());
        m.pause();
        assert!(!m.is_playing());
        assert!(m.update(Box::new(m.tick_msg())).is_none());
        assert!(m.play().is_some());
        m.update(Box::new(m.tick_msg()));
        assert_eq!(m.current(), 1);
    }

    #[test]
    fn test_play_without_autoplay_option() {
        let mut m = carousel(5, Configuration::default());
        assert!(!m.is_playing());
        assert!(m.play().is_some());
        assert!(m.is_playing());
    }

    #[test]
    fn test_never_armed_when_everything_fits() {
        let mut m = carousel(3, autoplay().with_visible_count(3));
        assert!(!m.is_playing());
        assert!(m.play().is_none());
    }
}
