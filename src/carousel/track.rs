//! Items and the track they are laid out on.
//!
//! The real items are owned by [`ItemSet`]. The *track* is what gets laid out:
//! a prefix of clone entries, the real entries, and a suffix of clone entries.
//! Clones point back at the real item they duplicate, so content is never
//! copied, and they are regenerated from scratch on every structural refresh.

use super::config::Configuration;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_KEY: AtomicU64 = AtomicU64::new(0);

fn next_key() -> u64 {
    LAST_KEY.fetch_add(1, Ordering::SeqCst) + 1
}

/// One slide.
///
/// `key` identifies the item for its whole life; `index` is its current
/// position among the real items and changes when items are added, removed
/// or filtered.
#[derive(Debug, Clone)]
pub struct Item<T> {
    key: u64,
    index: usize,
    /// The host's slide payload.
    pub content: T,
    /// Authored width, used in variable-width mode.
    pub width: Option<f32>,
    /// Authored height, used for adaptive height.
    pub height: Option<f32>,
    /// Media source handed to the lazy loader.
    pub media: Option<String>,
}

impl<T> Item<T> {
    /// Wraps a payload.
    pub fn new(content: T) -> Self {
        Self {
            key: next_key(),
            index: 0,
            content,
            width: None,
            height: None,
            media: None,
        }
    }

    /// Sets the authored width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the authored height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the media source materialized by the lazy loader.
    pub fn with_media(mut self, source: impl Into<String>) -> Self {
        self.media = Some(source.into());
        self
    }

    /// Stable identity.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Position among the real items.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A laid-out position on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEntry {
    /// Index of the real item this entry shows.
    pub source: usize,
    /// `source` for real entries; `source - real_count` for the prefix clones
    /// and `source + real_count` for the suffix clones.
    pub synthetic_index: isize,
    /// Whether this entry is a clone.
    pub cloned: bool,
}

/// The real items plus the current track.
#[derive(Debug, Clone)]
pub struct ItemSet<T> {
    items: Vec<Item<T>>,
    unfiltered: Option<Vec<Item<T>>>,
    track: Vec<TrackEntry>,
    clones_per_side: usize,
}

impl<T> Default for ItemSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            unfiltered: None,
            track: Vec::new(),
            clones_per_side: 0,
        }
    }
}

/// How many clones belong on each side of the track for `options` and `count`
/// real items. Zero when the track is not looped.
pub fn clone_count(options: &Configuration, count: usize) -> usize {
    if !options.infinite || options.crossfade || count <= options.visible_count {
        return 0;
    }
    if options.centered {
        options.visible_count + 1
    } else {
        options.visible_count
    }
}

impl<T> ItemSet<T> {
    /// Creates a set from real items. The track is empty until [`rebuild`].
    ///
    /// [`rebuild`]: ItemSet::rebuild
    pub fn new(items: Vec<Item<T>>) -> Self {
        let mut set = Self {
            items,
            ..Self::default()
        };
        set.reindex();
        set
    }

    /// Number of real items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no real items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The real items.
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Real item at `index`.
    pub fn get(&self, index: usize) -> Option<&Item<T>> {
        self.items.get(index)
    }

    /// The current track.
    pub fn track(&self) -> &[TrackEntry] {
        &self.track
    }

    /// Clone entries on each side of the track.
    pub fn clones_per_side(&self) -> usize {
        self.clones_per_side
    }

    /// Number of clone entries before the real entries.
    pub fn prefix_len(&self) -> usize {
        self.track.iter().take_while(|e| e.cloned).count()
    }

    /// Number of clone entries after the real entries.
    pub fn suffix_len(&self) -> usize {
        self.track.iter().rev().take_while(|e| e.cloned).count()
    }

    /// Whether a filter is applied.
    pub fn is_filtered(&self) -> bool {
        self.unfiltered.is_some()
    }

    /// Regenerates the track for `options`.
    ///
    /// Clones are built only when looping applies; otherwise the track is just
    /// the real items.
    pub fn rebuild(&mut self, options: &Configuration) {
        let count = self.items.len();
        let k = clone_count(options, count);
        let mut track = Vec::with_capacity(count + 2 * k);

        for source in count - k..count {
            track.push(TrackEntry {
                source,
                synthetic_index: source as isize - count as isize,
                cloned: true,
            });
        }
        for source in 0..count {
            track.push(TrackEntry {
                source,
                synthetic_index: source as isize,
                cloned: false,
            });
        }
        for source in 0..k {
            track.push(TrackEntry {
                source,
                synthetic_index: (source + count) as isize,
                cloned: true,
            });
        }

        tracing::debug!(real = count, clones_per_side = k, "rebuilt carousel track");
        self.track = track;
        self.clones_per_side = k;
    }

    /// Drops every clone, leaving only real entries.
    pub fn strip_clones(&mut self) {
        self.track.retain(|e| !e.cloned);
        self.clones_per_side = 0;
    }

    /// Inserts an item. With `at == None` the item goes at the end (or the
    /// start when `before`); otherwise it goes before or after `at`. An `at`
    /// past the end is ignored and nothing is inserted.
    pub fn insert(&mut self, item: Item<T>, at: Option<usize>, before: bool) -> bool {
        match at {
            None if before => self.items.insert(0, item),
            None => self.items.push(item),
            Some(i) if i >= self.items.len() => return false,
            Some(i) if before => self.items.insert(i, item),
            Some(i) => self.items.insert(i + 1, item),
        }
        self.reindex();
        true
    }

    /// Removes the item at `index`, or the one before it when `before`.
    pub fn remove(&mut self, index: usize, before: bool) -> Option<Item<T>> {
        let index = if before { index.checked_sub(1)? } else { index };
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.reindex();
        Some(removed)
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.track.clear();
        self.clones_per_side = 0;
    }

    /// Keeps only the items matching `keep`, remembering the full set so that
    /// [`unfilter`](ItemSet::unfilter) can restore it. Filtering an already
    /// filtered set starts again from the full set.
    pub fn filter<F>(&mut self, mut keep: F)
    where
        T: Clone,
        F: FnMut(&Item<T>) -> bool,
    {
        let all = self.unfiltered.take().unwrap_or_else(|| self.items.clone());
        self.items = all.iter().filter(|item| keep(item)).cloned().collect();
        self.unfiltered = Some(all);
        self.reindex();
    }

    /// Keeps items whose display text fuzzy-matches `query`, best matches
    /// first. An empty query restores the full set.
    pub fn filter_matching(&mut self, query: &str)
    where
        T: Clone + Display,
    {
        if query.is_empty() {
            self.unfilter();
            return;
        }
        let matcher = SkimMatcherV2::default();
        let all = self.unfiltered.take().unwrap_or_else(|| self.items.clone());
        let mut scored: Vec<(i64, &Item<T>)> = all
            .iter()
            .filter_map(|item| {
                matcher
                    .fuzzy_match(&item.content.to_string(), query)
                    .map(|score| (score, item))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        self.items = scored.into_iter().map(|(_, item)| item.clone()).collect();
        self.unfiltered = Some(all);
        self.reindex();
    }

    /// Restores the items from before the filter. No-op when unfiltered.
    pub fn unfilter(&mut self) -> bool {
        match self.unfiltered.take() {
            Some(all) => {
                self.items = all;
                self.reindex();
                true
            }
            None => false,
        }
    }

    fn reindex(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.index = i;
        }
    }
}
