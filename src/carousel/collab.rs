//! Collaborator seams.
//!
//! The carousel drives crossfades itself by default. Hosts that already own an
//! animation system can install an [`Animator`] instead; the carousel then
//! hands it the outgoing and incoming items and waits for an
//! [`AnimationDoneMsg`] before completing the transition.

use super::Model;
use bubbletea_rs::Cmd;

/// Identifies one crossfade handed to an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket {
    pub(super) id: i64,
    pub(super) tag: i64,
}

impl AnimationTicket {
    /// The message that reports this animation as finished.
    pub fn done(self) -> AnimationDoneMsg {
        AnimationDoneMsg { ticket: self }
    }
}

/// Sent by an animator when the incoming item has finished animating.
#[derive(Debug, Clone)]
pub struct AnimationDoneMsg {
    /// The ticket the animation was started with.
    pub ticket: AnimationTicket,
}

/// An external animation helper for crossfade transitions.
///
/// `effect` is `"fade_in"` or `"fade_out"`. The transition completes on the
/// first done message for its ticket; a carousel that never receives one
/// stays animating until the transition is cancelled.
pub trait Animator: Send {
    /// Starts revealing real item `index`.
    fn animate_in(&mut self, index: usize, effect: &str, ticket: AnimationTicket);
    /// Starts hiding real item `index`.
    fn animate_out(&mut self, index: usize, effect: &str, ticket: AnimationTicket);
}

impl<T> Model<T> {
    /// Installs an external animator for crossfade transitions.
    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Installs or removes the external animator.
    pub fn set_animator(&mut self, animator: Option<Box<dyn Animator>>) {
        self.animator = animator;
    }

    pub(super) fn on_animation_done(&mut self, msg: &AnimationDoneMsg) -> Option<Cmd> {
        if msg.ticket.id != self.id || msg.ticket.tag != self.frame_tag {
            return None;
        }
        if !self.state.is_animating {
            return None;
        }
        self.post_transition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Configuration, Item, ResizeMsg};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<(usize, String, AnimationTicket)>>>,
    }

    impl Animator for Recorder {
        fn animate_in(&mut self, index: usize, effect: &str, ticket: AnimationTicket) {
            self.calls.lock().unwrap().push((index, effect.to_string(), ticket));
        }

        fn animate_out(&mut self, index: usize, effect: &str, ticket: AnimationTicket) {
            self.calls.lock().unwrap().push((index, effect.to_string(), ticket));
        }
    }

    #[test]
    fn test_external_animator_completes_on_done() {
        let recorder = Recorder::default();
        let items = (0..3).map(|i| Item::new(i.to_string())).collect();
        let mut m = Model::new(items, Configuration::default().with_crossfade(true))
            .with_animator(recorder.clone());
        m.update(Box::new(ResizeMsg::new(20.0, 4.0)));

        assert!(m.go_to(2).is_none());
        assert!(m.is_animating());
        let calls = recorder.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].0, calls[0].1.as_str()), (0, "fade_out"));
        assert_eq!((calls[1].0, calls[1].1.as_str()), (2, "fade_in"));

        // Frames never complete an externally animated transition.
        m.update(Box::new(m.frame_msg()));
        assert!(m.is_animating());

        m.update(Box::new(calls[1].2.done()));
        assert!(!m.is_animating());
        assert_eq!(m.current(), 2);

        // The second done message for the same ticket is stale.
        assert!(m.update(Box::new(calls[0].2.done())).is_none());
    }

    #[test]
    fn test_stalled_animator_recovers_by_cancel() {
        let items = (0..3).map(|i| Item::new(i.to_string())).collect();
        let mut m = Model::new(items, Configuration::default().with_crossfade(true))
            .with_animator(Recorder::default());
        m.update(Box::new(ResizeMsg::new(20.0, 4.0)));
        m.go_to(1);
        let handle = m.transition().unwrap();
        m.cancel(handle);
        assert!(!m.is_animating());
        assert!(m.go_to(2).is_none());
        assert_eq!(m.current(), 2);
    }
}
