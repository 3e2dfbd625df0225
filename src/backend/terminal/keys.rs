//! Key events and window key bindings.
//!
//! Crossterm key events are converted into [`KeyEvent`] so the window state
//! machine can be driven without a terminal. [`KeyBindings`] maps navigation
//! keys to [`KeyAction`]s; unbound keys fall through to the focused element
//! as text input.

use std::collections::HashMap;
use std::ops::BitOr;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    /// Anything the window does not react to.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Whether every modifier in `other` is held.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether no modifier is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// An unmodified key press.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;

        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            _ => Key::Other,
        };
        // Shift is already folded into the character and into BackTab.
        let mut modifiers = convert_modifiers(ct.modifiers);
        if matches!(code, Key::Char(_) | Key::BackTab) {
            modifiers = Modifiers(modifiers.0 & !Modifiers::SHIFT.0);
        }
        KeyEvent { code, modifiers }
    }
}

// ---------------------------------------------------------------------------
// KeyAction / KeyBindings
// ---------------------------------------------------------------------------

/// What a bound key does inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Close the window.
    Close,
    FocusNext,
    FocusPrevious,
    /// Commit a field, click a button, toggle a check box.
    Activate,
    /// Step a spin box up.
    Increment,
    /// Step a spin box down.
    Decrement,
}

/// Registry of window key bindings, mapping (Key, Modifiers) -> KeyAction.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    bindings: HashMap<(Key, Modifiers), KeyAction>,
}

impl KeyBindings {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults:
    /// - `Esc`, `Ctrl+C` -> Close
    /// - `Tab` -> FocusNext, `Shift+Tab` -> FocusPrevious
    /// - `Enter` -> Activate
    /// - `Up` -> Increment, `Down` -> Decrement
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Escape, Modifiers::NONE, KeyAction::Close);
        registry.bind(Key::Char('c'), Modifiers::CTRL, KeyAction::Close);
        registry.bind(Key::Tab, Modifiers::NONE, KeyAction::FocusNext);
        registry.bind(Key::BackTab, Modifiers::NONE, KeyAction::FocusPrevious);
        registry.bind(Key::Enter, Modifiers::NONE, KeyAction::Activate);
        registry.bind(Key::Up, Modifiers::NONE, KeyAction::Increment);
        registry.bind(Key::Down, Modifiers::NONE, KeyAction::Decrement);
        registry
    }

    /// Register a binding, replacing any previous one for the same keys.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: KeyAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a binding, returning the action it had.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<KeyAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action bound to an event, if any.
    pub fn resolve(&self, event: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
