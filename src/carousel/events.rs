//! Notifications emitted by the carousel.
//!
//! Events are queued on the model as they happen and drained by the host with
//! [`Model::take_events`](super::Model::take_events). They are purely
//! informational: nothing a host does with an event feeds back into the
//! carousel's state except through its normal API.

use super::gesture::SwipeDirection;

/// Something the carousel did.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A transition committed and is about to animate.
    BeforeChange {
        /// Index before the change.
        from: usize,
        /// Index after the change.
        to: usize,
    },
    /// A transition finished animating.
    AfterChange {
        /// The committed index.
        index: usize,
    },
    /// The active breakpoint changed; `None` means the original options are
    /// back in effect.
    Breakpoint {
        /// Threshold of the newly active breakpoint.
        threshold: Option<f32>,
    },
    /// A drag was pulled past a finite end.
    Edge {
        /// Direction of the drag.
        direction: SwipeDirection,
    },
    /// A gesture was long enough to navigate.
    Swipe {
        /// Direction of the swipe.
        direction: SwipeDirection,
    },
    /// A pointer release too short to count as a drag.
    Click,
    /// Media for an item should be fetched now.
    MediaRequested {
        /// Real item index.
        index: usize,
        /// Item key; the loader answers with it.
        key: u64,
        /// Media source of the item.
        source: String,
        /// 1-based attempt number.
        attempt: u32,
    },
    /// The host reported an item's media as loaded.
    MediaLoaded {
        /// Real item index.
        index: usize,
    },
    /// An item's media failed on every attempt and will not be retried.
    MediaLoadError {
        /// Real item index.
        index: usize,
    },
    /// The carousel was rebuilt after a structural change.
    Reinit,
    /// The carousel was torn down.
    Destroyed,
}
