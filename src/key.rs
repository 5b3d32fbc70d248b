//! Key bindings used by the carousel's keyboard navigation.
//!
//! A [`Binding`] groups the key codes that trigger one action together with the
//! help text a help view would show for it. Components expose their bindings
//! through the [`KeyMap`] trait so hosts can render short and full help.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, e.g. `"←/h"`.
    pub key: String,
    /// What the binding does, e.g. `"previous slide"`.
    pub desc: String,
}

/// A set of keys that trigger a single action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<(KeyCode, KeyModifiers)>,
    help: Help,
    enabled: bool,
}

impl Binding {
    /// Creates a binding for plain (unmodified) key codes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_carousel::key::Binding;
    /// use crossterm::event::KeyCode;
    ///
    /// let next = Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
    ///     .with_help("→/l", "next slide");
    /// assert_eq!(next.help().desc, "next slide");
    /// ```
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys: keys.into_iter().map(|k| (k, KeyModifiers::NONE)).collect(),
            help: Help::default(),
            enabled: true,
        }
    }

    /// Adds a key that only matches with the given modifiers held.
    pub fn with_modified(mut self, code: KeyCode, modifiers: KeyModifiers) -> Self {
        self.keys.push((code, modifiers));
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Enables or disables the binding. Disabled bindings never match.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the binding is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the key message triggers this binding.
    ///
    /// Plain bindings ignore `SHIFT` so that characters typed with shift held
    /// still match their uppercase form.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if !self.enabled {
            return false;
        }
        self.keys.iter().any(|(code, modifiers)| {
            *code == msg.key
                && (*modifiers == msg.modifiers
                    || (modifiers.is_empty() && msg.modifiers == KeyModifiers::SHIFT))
        })
    }
}

/// Components that publish their key bindings for help rendering.
pub trait KeyMap {
    /// Bindings for a compact, single-line help view.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped into columns for an expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_matches_plain_keys() {
        let b = Binding::new(vec![KeyCode::Left, KeyCode::Char('h')]);
        assert!(b.matches(&key(KeyCode::Left, KeyModifiers::NONE)));
        assert!(b.matches(&key(KeyCode::Char('h'), KeyModifiers::NONE)));
        assert!(!b.matches(&key(KeyCode::Right, KeyModifiers::NONE)));
        assert!(!b.matches(&key(KeyCode::Left, KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_modified_key() {
        let b = Binding::new(vec![]).with_modified(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert!(b.matches(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)));
        assert!(!b.matches(&key(KeyCode::Char('n'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_disabled_never_matches() {
        let mut b = Binding::new(vec![KeyCode::Right]);
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&key(KeyCode::Right, KeyModifiers::NONE)));
    }
}
