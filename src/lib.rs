#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-carousel/")]

//! # bubbletea-carousel
//!
//! A carousel (slideshow) component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications.
//!
//! ## Overview
//!
//! The carousel follows the Elm Architecture like every bubbletea-rs
//! component: state lives in a [`carousel::Model`], inputs arrive as messages
//! through `update()`, and `view()` renders the current frame. Animations,
//! autoplay and media retries are driven by the carousel's own tick messages,
//! so a host only has to forward messages and read events.
//!
//! ## Features
//!
//! - **Infinite looping** with seamless wrap-around through clone entries
//! - **Gestures**: swipe and drag with live preview, edge friction and
//!   swipe-to-slide
//! - **Autoplay** with pause on hover, focus and hidden pages
//! - **Lazy media** coordination with bounded retries
//! - **Responsive breakpoints** that swap options as the viewport changes
//! - **Keyboard navigation** through type-safe key bindings
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_carousel::prelude::*;
//!
//! let items = (1..=5).map(|i| Item::new(format!("slide {}", i))).collect();
//! let options = Configuration::default().with_visible_count(2).with_infinite(false);
//! let mut carousel = Carousel::new(items, options);
//!
//! // Nothing is laid out until a size is reported.
//! carousel.update(Box::new(ResizeMsg::new(20.0, 1.0)));
//! carousel.go_to(2);
//! carousel.finish_transition();
//! assert_eq!(carousel.current(), 2);
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use bubbletea_carousel::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     slides: Carousel<String>,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let items = vec![Item::new("one".to_string()), Item::new("two".to_string())];
//!         let mut slides = Carousel::new(items, Configuration::default());
//!         let cmd = slides.focus();
//!         (Self { slides }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         let cmd = self.slides.update(msg);
//!         for event in self.slides.take_events() {
//!             if let CarouselEvent::MediaRequested { .. } = event {
//!                 // hand the request to a loader
//!             }
//!         }
//!         cmd
//!     }
//!
//!     fn view(&self) -> String {
//!         self.slides.view()
//!     }
//! }
//! ```

pub mod carousel;
pub mod key;
pub mod paginator;

use bubbletea_rs::Cmd;

/// Focus management shared by interactive components.
///
/// A focused carousel receives keyboard navigation and, with
/// `pause_on_focus`, suspends autoplay.
///
/// ```rust
/// use bubbletea_carousel::prelude::*;
///
/// let mut carousel: Carousel<String> = Carousel::new(Vec::new(), Configuration::default());
/// assert!(!carousel.focused());
/// carousel.focus();
/// assert!(carousel.focused());
/// carousel.blur();
/// assert!(!carousel.focused());
/// ```
pub trait Component {
    /// Gives the component keyboard focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Takes keyboard focus away.
    fn blur(&mut self);

    /// Whether the component has keyboard focus.
    fn focused(&self) -> bool;
}

/// Lifecycle of a widget mounted by a host.
///
/// `init` builds the widget and may return its first command; `destroy`
/// tears it down for good.
pub trait Widget: Sized {
    /// What `init` is built from.
    type Config;

    /// Builds the widget.
    fn init(config: Self::Config) -> (Self, Option<Cmd>);

    /// Tears the widget down; later messages are ignored.
    fn destroy(&mut self);

    /// Rebuilds the widget from its current state.
    fn refresh(&mut self) -> Option<Cmd>;

    /// Navigates to `index`.
    fn go_to(&mut self, index: isize) -> Option<Cmd>;

    /// The current index.
    fn current(&self) -> usize;
}

pub use carousel::Model as Carousel;
pub use carousel::{CarouselInit, CarouselKeyMap, Configuration, Event as CarouselEvent, Item};
pub use key::{Binding, Help as KeyHelp, KeyMap};
pub use paginator::Model as Paginator;

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_carousel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::carousel::{
        Breakpoint, Configuration, Event as CarouselEvent, Item, LazyLoad, MediaFailedMsg,
        MediaLoadedMsg, Overrides, PointerMsg, ResizeMsg,
    };
    pub use crate::key::{Binding, KeyMap};
    pub use crate::{Carousel, CarouselInit, Component, Paginator, Widget};
}
