//! Element state and the window key-handling state machine.
//!
//! Everything here is pure data manipulation over an arena of
//! [`ElementState`]s. Key handling never runs application callbacks itself;
//! it returns [`Effect`]s that the caller fires once the arena borrow is
//! released.

use slotmap::{new_key_type, SlotMap};

use crate::props::{Domain, Reaction, StartupProperties, Value, ValueReaction, WidgetKind};

use super::focus::FocusChain;
use super::keys::{Key, KeyAction, KeyBindings, KeyEvent};

new_key_type! {
    /// Identifies one element of a terminal session.
    pub struct ElementId;
}

pub(crate) type Arena = SlotMap<ElementId, ElementState>;

// ---------------------------------------------------------------------------
// ElementState
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct ElementState {
    pub kind: WidgetKind,
    pub created: bool,
    pub title: String,
    pub placeholder_text: String,
    pub value: Option<Value>,
    /// Text shown in a field, possibly not committed yet.
    pub buffer: String,
    /// Whether `buffer` holds uncommitted edits.
    pub dirty: bool,
    pub border: bool,
    pub windowed: bool,
    pub open: bool,
    pub value_reactions: Vec<ValueReaction>,
    pub actions: Vec<Reaction>,
    pub children: Vec<ElementId>,
}

impl ElementState {
    /// Take over everything the element shows from its properties.
    pub fn configure(&mut self, properties: &StartupProperties) {
        self.kind = properties.kind;
        self.created = true;
        self.title = properties.title.clone();
        self.placeholder_text = properties.placeholder_text.clone();
        self.border = properties.border;
        self.windowed = properties.windowed;
        self.open = properties.windowed;
        self.value = properties.initial_value();

        // A number field with no default shows its placeholder, not a zero.
        let numeric_default = match properties.kind {
            WidgetKind::IntegerField => properties.integer.default.is_some(),
            WidgetKind::FloatField => properties.float.default.is_some(),
            _ => true,
        };
        self.buffer = if numeric_default || properties.placeholder_text.is_empty() {
            self.value.as_ref().map(Value::to_string).unwrap_or_default()
        } else {
            String::new()
        };
    }

    pub fn is_field(&self) -> bool {
        matches!(
            self.kind,
            WidgetKind::TextField | WidgetKind::IntegerField | WidgetKind::FloatField
        )
    }

    pub fn is_focusable(&self) -> bool {
        self.created && !self.kind.is_container() && self.kind != WidgetKind::Unset
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.value, Some(Value::Integer(state)) if state != 0)
    }

    /// Replace the shown value without notifying anyone.
    pub fn show(&mut self, value: Value) {
        self.buffer = value.to_string();
        self.value = Some(value);
        self.dirty = false;
    }

    fn accepts_char(&self, c: char) -> bool {
        match self.kind {
            WidgetKind::TextField => !c.is_control(),
            WidgetKind::IntegerField => c.is_ascii_digit() || (c == '-' && self.buffer.is_empty()),
            WidgetKind::FloatField => {
                c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
            }
            _ => false,
        }
    }

    /// Turn pending edits into a value. Unparseable numbers revert.
    fn commit(&mut self) -> Option<Effect> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        let parsed = match self.kind.domain() {
            Some(Domain::Text) => Some(Value::Text(self.buffer.clone())),
            Some(Domain::Integer) => self.buffer.trim().parse().ok().map(Value::Integer),
            Some(Domain::Float) => self.buffer.trim().parse().ok().map(Value::Float),
            None => None,
        };
        match parsed {
            Some(value) => {
                self.value = Some(value.clone());
                Some(Effect::Changed(self.value_reactions.clone(), value))
            }
            None => {
                log::warn!("discarding unparseable {} input {:?}", self.kind, self.buffer);
                self.buffer = self.value.as_ref().map(Value::to_string).unwrap_or_default();
                None
            }
        }
    }

    fn toggle(&mut self) -> Vec<Effect> {
        let state = Value::Integer(i64::from(!self.is_checked()));
        self.show(state.clone());
        vec![
            Effect::Changed(self.value_reactions.clone(), state),
            Effect::Actions(self.actions.clone()),
        ]
    }

    fn step(&mut self, delta: i64) -> Option<Effect> {
        let current = self.value.as_ref().and_then(Value::as_integer).unwrap_or(0);
        let next = Value::Integer(current.saturating_add(delta));
        self.show(next.clone());
        Some(Effect::Changed(self.value_reactions.clone(), next))
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Callbacks to run after a key was handled.
pub(crate) enum Effect {
    Changed(Vec<ValueReaction>, Value),
    Actions(Vec<Reaction>),
}

impl Effect {
    pub fn fire(self) {
        match self {
            Effect::Changed(reactions, value) => {
                for reaction in &reactions {
                    reaction.call(&value);
                }
            }
            Effect::Actions(actions) => {
                for action in &actions {
                    action();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Window navigation
// ---------------------------------------------------------------------------

/// Focusable descendants of `root`, depth-first in layout order.
pub(crate) fn focus_order(arena: &Arena, root: ElementId) -> Vec<ElementId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(state) = arena.get(id) else { continue };
        if state.is_focusable() {
            out.push(id);
        }
        stack.extend(state.children.iter().rev().copied());
    }
    out
}

/// Apply one key press to the window rooted at `root`.
pub(crate) fn handle_key(
    arena: &mut Arena,
    root: ElementId,
    focus: &mut FocusChain,
    bindings: &KeyBindings,
    key: KeyEvent,
) -> Vec<Effect> {
    let focused = focus.current();
    let mut effects = Vec::new();

    match bindings.resolve(&key) {
        Some(KeyAction::Close) => {
            if let Some(state) = arena.get_mut(root) {
                state.open = false;
            }
        }
        Some(action @ (KeyAction::FocusNext | KeyAction::FocusPrevious)) => {
            if let Some(state) = focused.and_then(|id| arena.get_mut(id)) {
                effects.extend(state.commit());
            }
            if action == KeyAction::FocusNext {
                focus.focus_next();
            } else {
                focus.focus_previous();
            }
        }
        Some(KeyAction::Activate) => {
            if let Some(state) = focused.and_then(|id| arena.get_mut(id)) {
                match state.kind {
                    WidgetKind::Button => effects.push(Effect::Actions(state.actions.clone())),
                    WidgetKind::CheckBox => effects.extend(state.toggle()),
                    _ => effects.extend(state.commit()),
                }
            }
        }
        Some(action @ (KeyAction::Increment | KeyAction::Decrement)) => {
            if let Some(state) = focused.and_then(|id| arena.get_mut(id)) {
                if state.kind == WidgetKind::SpinBox {
                    let delta = if action == KeyAction::Increment { 1 } else { -1 };
                    effects.extend(state.step(delta));
                }
            }
        }
        None if key.modifiers.is_empty() => {
            if let Some(state) = focused.and_then(|id| arena.get_mut(id)) {
                edit(state, key.code, &mut effects);
            }
        }
        // Unbound chords never reach the focused element.
        None => {}
    }
    effects
}

fn edit(state: &mut ElementState, code: Key, effects: &mut Vec<Effect>) {
    match code {
        Key::Char(' ') if state.kind == WidgetKind::CheckBox => effects.extend(state.toggle()),
        Key::Char(c) if state.is_field() && state.accepts_char(c) => {
            state.buffer.push(c);
            state.dirty = true;
        }
        Key::Backspace if state.is_field() => {
            state.dirty |= state.buffer.pop().is_some();
        }
        Key::Delete if state.is_field() => {
            state.dirty |= !state.buffer.is_empty();
            state.buffer.clear();
        }
        _ => {}
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::backend::terminal::keys::Modifiers;
    use crate::props::PropertyBuilder;

    fn element(arena: &mut Arena, builder: PropertyBuilder, kind: WidgetKind) -> ElementId {
        let properties = builder.properties();
        properties.borrow_mut().kind = kind;
        let mut state = ElementState::default();
        state.configure(&properties.borrow());
        arena.insert(state)
    }

    fn window(arena: &mut Arena, children: Vec<ElementId>) -> ElementId {
        let root = element(arena, PropertyBuilder::new(), WidgetKind::Form);
        arena[root].open = true;
        arena[root].windowed = true;
        arena[root].children = children;
        root
    }

    fn fire(effects: Vec<Effect>) {
        for effect in effects {
            effect.fire();
        }
    }

    fn press(
        arena: &mut Arena,
        root: ElementId,
        focus: &mut FocusChain,
        keys: &[Key],
    ) {
        let bindings = KeyBindings::with_defaults();
        for key in keys {
            fire(handle_key(arena, root, focus, &bindings, KeyEvent::plain(*key)));
        }
    }

    #[test]
    fn typing_and_enter_commits_text() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut arena = Arena::with_key();
        let field = element(&mut arena, PropertyBuilder::new(), WidgetKind::TextField);
        arena[field]
            .value_reactions
            .push(ValueReaction::Text(Rc::new(move |s: &String| sink.borrow_mut().push(s.clone()))));
        let root = window(&mut arena, vec![field]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();

        press(
            &mut arena,
            root,
            &mut focus,
            &[Key::Char('A'), Key::Char('d'), Key::Char('a'), Key::Enter, Key::Enter],
        );
        assert_eq!(*seen.borrow(), vec!["Ada".to_string()]);
        assert_eq!(arena[field].value, Some(Value::from("Ada")));
    }

    #[test]
    fn leaving_a_dirty_field_commits() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let mut arena = Arena::with_key();
        let a = element(&mut arena, PropertyBuilder::new(), WidgetKind::IntegerField);
        let b = element(&mut arena, PropertyBuilder::new(), WidgetKind::IntegerField);
        arena[a]
            .value_reactions
            .push(ValueReaction::Integer(Rc::new(move |n: &i64| *sink.borrow_mut() += *n)));
        let root = window(&mut arena, vec![a, b]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();

        press(&mut arena, root, &mut focus, &[Key::Backspace, Key::Char('4'), Key::Char('2'), Key::Tab]);
        assert_eq!(*count.borrow(), 42);
        assert_eq!(focus.current(), Some(b));
        press(&mut arena, root, &mut focus, &[Key::BackTab, Key::Tab]);
        assert_eq!(*count.borrow(), 42);
    }

    #[test]
    fn unbound_chords_do_not_type() {
        let mut arena = Arena::with_key();
        let field = element(&mut arena, PropertyBuilder::new(), WidgetKind::TextField);
        let root = window(&mut arena, vec![field]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();

        let bindings = KeyBindings::with_defaults();
        for key in [
            KeyEvent::new(Key::Char('s'), Modifiers::CTRL),
            KeyEvent::new(Key::Char('x'), Modifiers::ALT),
            KeyEvent::new(Key::Backspace, Modifiers::CTRL),
            KeyEvent::plain(Key::Char('y')),
        ] {
            fire(handle_key(&mut arena, root, &mut focus, &bindings, key));
        }
        assert_eq!(arena[field].buffer, "y");
        assert!(arena[root].open);
    }

    #[test]
    fn integer_field_rejects_letters() {
        let mut arena = Arena::with_key();
        let field = element(&mut arena, PropertyBuilder::new(), WidgetKind::IntegerField);
        let root = window(&mut arena, vec![field]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();
        press(&mut arena, root, &mut focus, &[Key::Backspace, Key::Char('x'), Key::Char('-'), Key::Char('7')]);
        assert_eq!(arena[field].buffer, "-7");
    }

    #[test]
    fn bad_float_reverts() {
        let mut arena = Arena::with_key();
        let field = element(
            &mut arena,
            PropertyBuilder::new().default_float(1.5),
            WidgetKind::FloatField,
        );
        let root = window(&mut arena, vec![field]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();
        press(&mut arena, root, &mut focus, &[Key::Char('e'), Key::Char('e'), Key::Enter]);
        assert_eq!(arena[field].buffer, "1.5");
        assert_eq!(arena[field].value, Some(Value::Float(1.5)));
    }

    #[test]
    fn placeholder_hides_zero() {
        let mut arena = Arena::with_key();
        let hinted = element(
            &mut arena,
            PropertyBuilder::new().placeholder_text("Year"),
            WidgetKind::IntegerField,
        );
        let plain = element(&mut arena, PropertyBuilder::new(), WidgetKind::IntegerField);
        assert_eq!(arena[hinted].buffer, "");
        assert_eq!(arena[plain].buffer, "0");
    }

    #[test]
    fn space_toggles_checkbox_and_fires_both_channels() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut arena = Arena::with_key();
        let check = element(&mut arena, PropertyBuilder::new(), WidgetKind::CheckBox);
        let sink = log.clone();
        arena[check]
            .value_reactions
            .push(ValueReaction::Integer(Rc::new(move |n: &i64| sink.borrow_mut().push(format!("state {n}")))));
        let sink = log.clone();
        arena[check]
            .actions
            .push(Rc::new(move || sink.borrow_mut().push("action".into())));
        let root = window(&mut arena, vec![check]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();

        press(&mut arena, root, &mut focus, &[Key::Char(' '), Key::Enter]);
        assert_eq!(*log.borrow(), vec!["state 1", "action", "state 0", "action"]);
    }

    #[test]
    fn spin_box_steps() {
        let mut arena = Arena::with_key();
        let spin = element(
            &mut arena,
            PropertyBuilder::new().default_integer(3),
            WidgetKind::SpinBox,
        );
        let root = window(&mut arena, vec![spin]);
        let mut focus = FocusChain::new(focus_order(&arena, root));
        focus.focus_next();
        press(&mut arena, root, &mut focus, &[Key::Up, Key::Up, Key::Down, Key::Up]);
        assert_eq!(arena[spin].value, Some(Value::Integer(5)));
    }

    #[test]
    fn escape_closes_window() {
        let mut arena = Arena::with_key();
        let root = window(&mut arena, Vec::new());
        let mut focus = FocusChain::new(focus_order(&arena, root));
        press(&mut arena, root, &mut focus, &[Key::Escape]);
        assert!(!arena[root].open);
    }

    #[test]
    fn focus_order_is_depth_first() {
        let mut arena = Arena::with_key();
        let a = element(&mut arena, PropertyBuilder::new(), WidgetKind::TextField);
        let b = element(&mut arena, PropertyBuilder::new(), WidgetKind::Button);
        let c = element(&mut arena, PropertyBuilder::new(), WidgetKind::CheckBox);
        let row = element(&mut arena, PropertyBuilder::new(), WidgetKind::HorizontalBox);
        arena[row].children = vec![a, b];
        let root = window(&mut arena, vec![row, c]);
        assert_eq!(focus_order(&arena, root), vec![a, b, c]);
    }
}
