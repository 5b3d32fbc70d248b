//! Lazy media coordination.
//!
//! The carousel never fetches anything itself. It decides which items need
//! their media now, marks them pending and emits
//! [`Event::MediaRequested`]; the host's loader answers with
//! [`MediaLoadedMsg`] or [`MediaFailedMsg`]. Requests and answers name the
//! item by its key, so an answer still finds its item after items were added
//! or removed in between. Failures are retried twice, 500 ms apart, before the
//! item is marked permanently failed.

use super::config::LazyLoad;
use super::events::Event;
use super::Model;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Load state of one item's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Not requested yet.
    #[default]
    Unloaded,
    /// Requested and waiting for the loader.
    Pending {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// Loaded.
    Loaded,
    /// Failed on every attempt; never requested again.
    Failed,
}

/// The loader finished an item's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLoadedMsg {
    /// Carousel id, see [`Model::id`].
    pub id: i64,
    /// Item key from the request.
    pub key: u64,
}

/// The loader could not fetch an item's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFailedMsg {
    /// Carousel id, see [`Model::id`].
    pub id: i64,
    /// Item key from the request.
    pub key: u64,
}

/// Re-requests media after a failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct LazyRetryMsg {
    /// Carousel the retry belongs to.
    pub id: i64,
    key: u64,
    attempt: u32,
}

#[derive(Debug, Clone, Default)]
pub(super) struct MediaTable {
    states: HashMap<u64, LoadState>,
}

impl MediaTable {
    fn get(&self, key: u64) -> LoadState {
        self.states.get(&key).copied().unwrap_or_default()
    }

    fn set(&mut self, key: u64, state: LoadState) {
        self.states.insert(key, state);
    }
}

impl<T> Model<T> {
    /// Load state of real item `index`.
    pub fn media_state(&self, index: usize) -> LoadState {
        self.items
            .get(index)
            .map(|item| self.media.get(item.key()))
            .unwrap_or_default()
    }

    /// Real indexes of the items waiting for the loader.
    pub fn pending_media(&self) -> Vec<usize> {
        self.items
            .items()
            .iter()
            .filter(|item| matches!(self.media.get(item.key()), LoadState::Pending { .. }))
            .map(|item| item.index())
            .collect()
    }

    // Current real index of the item with `key`.
    fn index_of_key(&self, key: u64) -> Option<usize> {
        self.items
            .items()
            .iter()
            .find(|item| item.key() == key)
            .map(|item| item.index())
    }

    /// Requests whatever the current position needs.
    pub(super) fn lazy_load(&mut self) {
        match self.options.lazy_load {
            LazyLoad::Off => {}
            LazyLoad::Progressive => self.progressive_next(),
            LazyLoad::OnDemand | LazyLoad::Anticipated => {
                let wanted = self.lazy_range();
                tracing::debug!(id = self.id, ?wanted, "lazy load range");
                for index in wanted {
                    self.request_media(index, 1);
                }
            }
        }
    }

    // Real indexes covered by the current window, per the lazy-load rules.
    fn lazy_range(&self) -> BTreeSet<usize> {
        let options = &self.options;
        let real = self.items.len();
        let visible = options.visible_count;
        let current = self.state.current_index;
        let k = self.items.clones_per_side();
        let mut wanted = BTreeSet::new();
        if real == 0 {
            return wanted;
        }

        let (mut start, mut end) = if options.centered {
            let half = visible / 2 + 1;
            if options.infinite {
                let start = current + half;
                (start, start + visible + 2)
            } else {
                (current.saturating_sub(half), 2 + half + current)
            }
        } else {
            let mut start = if options.infinite { current + k } else { current };
            let mut end = start + visible;
            if options.crossfade {
                start = start.saturating_sub(1);
                if end <= real {
                    end += 1;
                }
            }
            (start, end)
        };
        start = start.saturating_sub(options.lazy_preload);
        end += options.lazy_preload;

        let track = self.items.track();
        for entry in track.iter().take(end).skip(start) {
            wanted.insert(entry.source);
        }

        if options.lazy_load == LazyLoad::Anticipated {
            let scroll = options.scroll_count.max(1);
            let mut prev = start as isize - 1;
            let mut next = end;
            for _ in 0..scroll {
                if prev < 0 {
                    prev = real as isize - 1;
                }
                wanted.insert(prev as usize % real);
                wanted.insert(next % real);
                prev -= 1;
                next += 1;
            }
        }

        if real <= visible {
            wanted.extend(0..real);
        } else if current >= real - visible {
            wanted.extend(0..visible.min(self.items.suffix_len()));
        } else if current == 0 {
            let prefix = visible.min(self.items.prefix_len());
            wanted.extend(real - prefix..real);
        }
        wanted
    }

    fn progressive_next(&mut self) {
        let any_pending = self
            .items
            .items()
            .iter()
            .any(|item| matches!(self.media.get(item.key()), LoadState::Pending { .. }));
        if any_pending {
            return;
        }
        let next = self.items.items().iter().find(|item| {
            item.media.is_some() && self.media.get(item.key()) == LoadState::Unloaded
        });
        if let Some(index) = next.map(|item| item.index()) {
            self.request_media(index, 1);
        }
    }

    fn request_media(&mut self, index: usize, attempt: u32) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        let Some(source) = item.media.clone() else {
            return;
        };
        let key = item.key();
        let state = self.media.get(key);
        let allowed = match state {
            LoadState::Unloaded => attempt == 1,
            LoadState::Pending { attempt: previous } => attempt == previous + 1,
            LoadState::Loaded | LoadState::Failed => false,
        };
        if !allowed {
            return;
        }
        self.media.set(key, LoadState::Pending { attempt });
        self.events.push(Event::MediaRequested {
            index,
            key,
            source,
            attempt,
        });
    }

    pub(super) fn on_media_loaded(&mut self, msg: &MediaLoadedMsg) {
        if msg.id != self.id {
            return;
        }
        let key = msg.key;
        let Some(index) = self.index_of_key(key) else {
            return;
        };
        if !matches!(self.media.get(key), LoadState::Pending { .. }) {
            return;
        }
        tracing::debug!(id = self.id, index, key, "media loaded");
        self.media.set(key, LoadState::Loaded);
        self.events.push(Event::MediaLoaded { index });
        if self.options.adaptive_height {
            self.relayout();
        }
        if self.options.lazy_load == LazyLoad::Progressive {
            self.progressive_next();
        }
    }

    pub(super) fn on_media_failed(&mut self, msg: &MediaFailedMsg) -> Option<Cmd> {
        if msg.id != self.id {
            return None;
        }
        let key = msg.key;
        let index = self.index_of_key(key)?;
        let LoadState::Pending { attempt } = self.media.get(key) else {
            return None;
        };

        if attempt < MAX_ATTEMPTS {
            tracing::debug!(id = self.id, index, attempt, "media failed, retrying");
            let retry = LazyRetryMsg {
                id: self.id,
                key,
                attempt: attempt + 1,
            };
            return Some(bubbletea_tick(RETRY_DELAY, move |_| {
                Box::new(retry) as Msg
            }));
        }

        tracing::warn!(id = self.id, index, attempt, "media failed permanently");
        self.media.set(key, LoadState::Failed);
        self.events.push(Event::MediaLoadError { index });
        if self.options.lazy_load == LazyLoad::Progressive {
            self.progressive_next();
        }
        None
    }

    pub(super) fn on_lazy_retry(&mut self, msg: &LazyRetryMsg) {
        if msg.id != self.id {
            return;
        }
        if let Some(index) = self.index_of_key(msg.key) {
            self.request_media(index, msg.attempt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Configuration, Item, ResizeMsg};

    fn carousel(n: usize, options: Configuration) -> Model<String> {
        let items = (0..n)
            .map(|i| Item::new(format!("slide {}", i)).with_media(format!("img{}.png", i)))
            .collect();
        let mut m = Model::new(items, options);
        m.update(Box::new(ResizeMsg::new(400.0, 10.0)));
        m
    }

    fn requested(events: &[Event]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::MediaRequested { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_off_requests_nothing() {
        let mut m = carousel(5, Configuration::default());
        assert!(requested(&m.take_events()).is_empty());
        assert!(m.pending_media().is_empty());
    }

    #[test]
    fn test_on_demand_window_with_wrap() {
        let options = Configuration::default()
            .with_visible_count(2)
            .with_lazy_load(LazyLoad::OnDemand);
        let mut m = carousel(6, options);
        // Current is 0: the window plus the prefix clones that sit left of it.
        assert_eq!(m.pending_media(), vec![0, 1, 4, 5]);
        m.take_events();

        m.jump_to(2);
        assert_eq!(requested(&m.take_events()), vec![2, 3]);
    }

    #[test]
    fn test_on_demand_loads_suffix_clones_near_the_end() {
        let mut options = Configuration::default()
            .with_visible_count(3)
            .with_lazy_load(LazyLoad::OnDemand);
        options.initial_index = 5;
        let m = carousel(8, options);
        // Window 5..8, plus the clones of 0..3 that follow it.
        assert_eq!(m.pending_media(), vec![0, 1, 2, 5, 6, 7]);
    }

    #[test]
    fn test_anticipated_adds_neighbours() {
        let options = Configuration::default()
            .with_visible_count(2)
            .with_infinite(false)
            .with_lazy_load(LazyLoad::Anticipated);
        let m = carousel(8, options);
        // Window 0..2, plus 2 after it and the wrapped 7 before it.
        assert_eq!(m.pending_media(), vec![0, 1, 2, 7]);
    }

    #[test]
    fn test_items_without_media_are_skipped() {
        let items = vec![
            Item::new("a".to_string()),
            Item::new("b".to_string()).with_media("b.png"),
        ];
        let mut m = Model::new(items, Configuration::default().with_lazy_load(LazyLoad::OnDemand));
        m.update(Box::new(ResizeMsg::new(400.0, 10.0)));
        assert_eq!(m.media_state(0), LoadState::Unloaded);
        assert_eq!(m.media_state(1), LoadState::Pending { attempt: 1 });
    }

    #[test]
    fn test_loaded_marks_state() {
        let mut m = carousel(4, Configuration::default().with_lazy_load(LazyLoad::OnDemand));
        let id = m.id();
        let key = m.items().get(0).unwrap().key();
        m.take_events();
        m.update(Box::new(MediaLoadedMsg { id, key }));
        assert_eq!(m.media_state(0), LoadState::Loaded);
        assert_eq!(m.take_events(), vec![Event::MediaLoaded { index: 0 }]);

        // Not re-requested when it comes back into view.
        m.jump_to(1);
        m.jump_to(0);
        assert!(!requested(&m.take_events()).contains(&0));
    }

    #[test]
    fn test_retries_then_fails_permanently() {
        let mut m = carousel(4, Configuration::default().with_lazy_load(LazyLoad::OnDemand));
        let id = m.id();
        let key = m.items().get(0).unwrap().key();
        m.take_events();

        for attempt in 1..MAX_ATTEMPTS {
            assert!(m.update(Box::new(MediaFailedMsg { id, key })).is_some());
            m.update(Box::new(LazyRetryMsg {
                id,
                key,
                attempt: attempt + 1,
            }));
            assert_eq!(m.media_state(0), LoadState::Pending { attempt: attempt + 1 });
            assert_eq!(
                m.take_events(),
                vec![Event::MediaRequested {
                    index: 0,
                    key,
                    source: "img0.png".to_string(),
                    attempt: attempt + 1
                }]
            );
        }

        assert!(m.update(Box::new(MediaFailedMsg { id, key })).is_none());
        assert_eq!(m.media_state(0), LoadState::Failed);
        assert_eq!(m.take_events(), vec![Event::MediaLoadError { index: 0 }]);

        // A late retry does not revive a failed item.
        m.update(Box::new(LazyRetryMsg { id, key, attempt: 2 }));
        assert_eq!(m.media_state(0), LoadState::Failed);
    }

    #[test]
    fn test_progressive_loads_one_at_a_time() {
        let mut m = carousel(3, Configuration::default().with_lazy_load(LazyLoad::Progressive));
        let id = m.id();
        assert_eq!(m.pending_media(), vec![0]);

        let first = m.items().get(0).unwrap().key();
        m.update(Box::new(MediaLoadedMsg { id, key: first }));
        assert_eq!(m.pending_media(), vec![1]);

        // A permanent failure moves on as well.
        for _ in 0..MAX_ATTEMPTS {
            let attempt = match m.media_state(1) {
                LoadState::Pending { attempt } => attempt,
                other => panic!("unexpected state {:?}", other),
            };
            let key = m.items().get(1).unwrap().key();
            m.update(Box::new(MediaFailedMsg { id, key }));
            if attempt < MAX_ATTEMPTS {
                m.update(Box::new(LazyRetryMsg {
                    id,
                    key,
                    attempt: attempt + 1,
                }));
            }
        }
        assert_eq!(m.media_state(1), LoadState::Failed);
        assert_eq!(m.pending_media(), vec![2]);
    }

    #[test]
    fn test_answer_follows_item_across_removal() {
        let mut m = carousel(3, Configuration::default().with_lazy_load(LazyLoad::Progressive));
        let id = m.id();
        let first = m.items().get(0).unwrap().key();
        let second = m.items().get(1).unwrap().key();
        assert_eq!(m.pending_media(), vec![0]);

        // The pending item goes away; the next one takes index 0 and is requested.
        m.remove(0, false);
        assert_eq!(m.items().get(0).unwrap().key(), second);
        assert_eq!(m.media_state(0), LoadState::Pending { attempt: 1 });
        m.take_events();

        // The late answer for the removed item does not land on its successor.
        m.update(Box::new(MediaLoadedMsg { id, key: first }));
        assert_eq!(m.media_state(0), LoadState::Pending { attempt: 1 });
        assert!(m.take_events().is_empty());

        m.update(Box::new(MediaFailedMsg { id, key: second }));
        assert_eq!(m.media_state(0), LoadState::Pending { attempt: 1 });
        m.update(Box::new(MediaLoadedMsg { id, key: second }));
        assert_eq!(m.media_state(0), LoadState::Loaded);
        assert_eq!(m.pending_media(), vec![1]);
    }

    #[test]
    fn test_messages_for_other_carousels_are_ignored() {
        let mut m = carousel(3, Configuration::default().with_lazy_load(LazyLoad::OnDemand));
        let other = m.id() + 1000;
        let key = m.items().get(0).unwrap().key();
        m.update(Box::new(MediaLoadedMsg { id: other, key }));
        assert_eq!(m.media_state(0), LoadState::Pending { attempt: 1 });
    }
}
