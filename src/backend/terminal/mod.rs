//! Terminal backend built on crossterm.
//!
//! [`TerminalBackend`] is the application context handed to `run`. Each
//! declared node gets a [`TerminalElement`] in a shared slotmap arena. When a
//! top-level window is created the backend takes over the terminal and runs a
//! modal, keyboard-driven loop until the window is closed, either by a key
//! (Esc by default) or by a callback calling `close`.
//!
//! Fields commit their text when Enter is pressed or focus leaves them, which
//! is when value-changed callbacks fire. Check boxes toggle on Space or
//! Enter, spin boxes step on Up and Down, buttons click on Enter.

pub mod driver;
pub mod focus;
pub mod keys;
mod render;
mod state;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};

use crate::backend::{wire_reactions, Backend};
use crate::error::{Error, Result};
use crate::props::{Reaction, StartupProperties, Value, ValueReaction, WidgetKind};

use self::driver::Driver;
use self::focus::FocusChain;
use self::state::{focus_order, handle_key, Arena, ElementState};

pub use self::keys::{Key, KeyAction, KeyBindings, KeyEvent, Modifiers};
pub use self::state::ElementId;

// ---------------------------------------------------------------------------
// TerminalConfig
// ---------------------------------------------------------------------------

/// Configuration for the terminal backend.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Title shown for windows declared without one.
    pub default_title: String,
    /// How long to wait for input before redrawing.
    pub poll_interval: Duration,
    /// Show the key help line under the window.
    pub show_help: bool,
    /// Prefix drawn before the focused element.
    pub focus_marker: String,
    pub bindings: KeyBindings,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            default_title: "User Interface".to_owned(),
            poll_interval: Duration::from_millis(100),
            show_help: true,
            focus_marker: "> ".to_owned(),
            bindings: KeyBindings::with_defaults(),
        }
    }
}

impl TerminalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_focus_marker(mut self, marker: impl Into<String>) -> Self {
        self.focus_marker = marker.into();
        self
    }

    /// Add or replace one key binding.
    pub fn with_binding(mut self, key: Key, modifiers: Modifiers, action: KeyAction) -> Self {
        self.bindings.bind(key, modifiers, action);
        self
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Session {
    config: TerminalConfig,
    elements: RefCell<Arena>,
}

impl Session {
    fn mint(self: &Rc<Self>) -> TerminalElement {
        let id = self.elements.borrow_mut().insert(ElementState::default());
        log::trace!("terminal: minted {id:?}");
        TerminalElement {
            id,
            session: Rc::clone(self),
        }
    }
}

// ---------------------------------------------------------------------------
// TerminalBackend
// ---------------------------------------------------------------------------

/// Application-level context for the terminal backend.
///
/// # Examples
///
/// ```no_run
/// use dugui::backend::terminal::TerminalBackend;
/// use dugui::widget::Widget;
/// use dugui::widgets::{Button, Container};
///
/// let window = Container::vertical();
/// let _ok = Button::new(window.title("OK"));
/// window.run(&TerminalBackend::new()).unwrap();
/// ```
#[derive(Clone)]
pub struct TerminalBackend {
    session: Rc<Session>,
}

impl TerminalBackend {
    pub fn new() -> Self {
        Self::with_config(TerminalConfig::default())
    }

    pub fn with_config(config: TerminalConfig) -> Self {
        Self {
            session: Rc::new(Session {
                config,
                elements: RefCell::new(Arena::with_key()),
            }),
        }
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.session.config
    }
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TerminalBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalBackend")
            .field("config", &self.session.config)
            .field("elements", &self.session.elements.borrow().len())
            .finish()
    }
}

fn not_an_element(operation: &str) -> Error {
    Error::invalid(format!("{operation} on the terminal application context"))
}

impl Backend for TerminalBackend {
    fn create(&self, _properties: &StartupProperties) -> Result<()> {
        Err(not_an_element("create"))
    }

    fn set_title(&self, _title: &str) -> Result<()> {
        Err(not_an_element("set_title"))
    }

    fn add_value_changed_reaction(&self, _reaction: ValueReaction) -> Result<()> {
        Err(not_an_element("add_value_changed_reaction"))
    }

    fn add_reaction(&self, _reaction: Reaction) -> Result<()> {
        Err(not_an_element("add_reaction"))
    }

    fn set_value(&self, _value: Value) -> Result<()> {
        Err(not_an_element("set_value"))
    }

    fn close(&self) -> Result<()> {
        Err(not_an_element("close"))
    }

    fn create_another_element(&self) -> Rc<dyn Backend> {
        Rc::new(self.session.mint())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// TerminalElement
// ---------------------------------------------------------------------------

/// One element of a terminal session.
#[derive(Clone)]
pub struct TerminalElement {
    id: ElementId,
    session: Rc<Session>,
}

impl TerminalElement {
    pub fn id(&self) -> ElementId {
        self.id
    }

    fn read<R>(&self, f: impl FnOnce(&ElementState) -> R) -> R {
        f(&self.session.elements.borrow()[self.id])
    }

    fn write<R>(&self, f: impl FnOnce(&mut ElementState) -> R) -> R {
        f(&mut self.session.elements.borrow_mut()[self.id])
    }

    pub fn kind(&self) -> WidgetKind {
        self.read(|s| s.kind)
    }

    pub fn title(&self) -> String {
        self.read(|s| s.title.clone())
    }

    pub fn value(&self) -> Option<Value> {
        self.read(|s| s.value.clone())
    }

    pub fn is_open(&self) -> bool {
        self.read(|s| s.open)
    }

    /// The window as it would currently be drawn.
    pub fn render(&self) -> Vec<String> {
        render::render_window(
            &self.session.elements.borrow(),
            self.id,
            None,
            &self.session.config,
        )
    }

    fn run_window(&self) -> Result<()> {
        log::debug!("terminal: opening window {:?}", self.title());
        let mut driver = Driver::new();
        driver.enter()?;
        let result = self.event_loop(&mut driver);
        let restored = driver.leave();
        log::debug!("terminal: window closed");
        result?;
        restored?;
        Ok(())
    }

    fn event_loop(&self, driver: &mut Driver) -> Result<()> {
        let config = &self.session.config;
        let mut focus = FocusChain::new(focus_order(&self.session.elements.borrow(), self.id));
        focus.focus_next();

        while self.is_open() {
            let lines = render::render_window(
                &self.session.elements.borrow(),
                self.id,
                focus.current(),
                config,
            );
            driver.draw(&lines)?;

            if !event::poll(config.poll_interval)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let effects = handle_key(
                    &mut self.session.elements.borrow_mut(),
                    self.id,
                    &mut focus,
                    &config.bindings,
                    KeyEvent::from(key),
                );
                for effect in effects {
                    effect.fire();
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for TerminalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalElement")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

impl Backend for TerminalElement {
    fn create(&self, properties: &StartupProperties) -> Result<()> {
        properties.kind.ensure_set()?;
        self.write(|s| s.configure(properties));
        log::trace!("terminal: created {} {:?}", properties.kind, properties.title);

        wire_reactions(self, properties)?;

        if properties.kind.is_container() {
            for child in properties.children() {
                child.realize()?;
                let element = child
                    .backend()
                    .and_then(|b| b.as_any().downcast_ref::<TerminalElement>().map(|e| e.id));
                if let Some(id) = element {
                    self.write(|s| s.children.push(id));
                }
            }
        }

        if properties.windowed {
            self.run_window()?;
        }
        Ok(())
    }

    fn set_title(&self, title: &str) -> Result<()> {
        self.write(|s| {
            s.kind.ensure_set()?;
            s.title = title.to_owned();
            Ok::<_, Error>(())
        })
    }

    fn add_value_changed_reaction(&self, reaction: ValueReaction) -> Result<()> {
        self.write(|s| {
            s.kind.ensure_value_reaction(reaction.domain())?;
            s.value_reactions.push(reaction);
            Ok::<_, Error>(())
        })
    }

    fn add_reaction(&self, reaction: Reaction) -> Result<()> {
        self.write(|s| {
            s.kind.ensure_action()?;
            s.actions.push(reaction);
            Ok::<_, Error>(())
        })
    }

    fn set_value(&self, value: Value) -> Result<()> {
        self.write(|s| {
            s.kind.ensure_value(value.domain())?;
            s.show(value);
            Ok::<_, Error>(())
        })
    }

    fn close(&self) -> Result<()> {
        self.write(|s| {
            if !s.windowed {
                return Err(Error::invalid(format!(
                    "closing a {} that is not a window",
                    s.kind
                )));
            }
            s.open = false;
            Ok::<_, Error>(())
        })
    }

    fn create_another_element(&self) -> Rc<dyn Backend> {
        Rc::new(self.session.mint())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
