//! Headless backend: records every call and simulates user input.
//!
//! [`HeadlessBackend`] is the application-level context handed to `run`; it
//! mints [`HeadlessElement`]s that live in one slotmap arena. Elements keep
//! what a real toolkit would show (kind, title, current value, open state),
//! and every contract call is appended to a log for ordering assertions.
//!
//! Top-level windows do not block. A session script installed with
//! [`HeadlessBackend::on_window`] runs while the window is open instead,
//! standing in for the user of a modal event loop.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::backend::{wire_reactions, Backend};
use crate::error::{Error, Result};
use crate::props::{Domain, Reaction, StartupProperties, Value, ValueReaction, WidgetKind};
use crate::widget::Widget;

new_key_type! {
    /// Identifies one element in a headless session.
    pub struct ElementId;
}

// ---------------------------------------------------------------------------
// Call log
// ---------------------------------------------------------------------------

/// One contract call received by a headless element.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Mint { element: ElementId },
    Create { element: ElementId, kind: WidgetKind, title: String },
    SetTitle { element: ElementId, title: String },
    AddValueReaction { element: ElementId, domain: Domain },
    AddReaction { element: ElementId },
    SetValue { element: ElementId, value: Value },
    Close { element: ElementId },
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ElementRecord {
    kind: WidgetKind,
    created: bool,
    title: String,
    placeholder_text: String,
    value: Option<Value>,
    border: bool,
    windowed: bool,
    open: bool,
    value_reactions: Vec<ValueReaction>,
    actions: Vec<Reaction>,
    children: Vec<ElementId>,
}

type WindowScript = Box<dyn FnMut(&HeadlessElement) -> Result<()>>;

#[derive(Default)]
struct Session {
    elements: RefCell<SlotMap<ElementId, ElementRecord>>,
    calls: RefCell<Vec<Call>>,
    on_window: RefCell<Option<WindowScript>>,
}

impl Session {
    fn log(&self, call: Call) {
        log::trace!("headless: {call:?}");
        self.calls.borrow_mut().push(call);
    }

    fn mint(self: &Rc<Self>) -> HeadlessElement {
        let id = self.elements.borrow_mut().insert(ElementRecord::default());
        self.log(Call::Mint { element: id });
        HeadlessElement {
            id,
            session: Rc::clone(self),
        }
    }
}

// ---------------------------------------------------------------------------
// HeadlessBackend
// ---------------------------------------------------------------------------

/// Application-level context for a headless session.
///
/// Only [`Backend::create_another_element`] is meaningful on the context
/// itself; every other contract operation fails.
///
/// # Examples
///
/// ```
/// use dugui::testing::{HeadlessBackend, HeadlessElement};
/// use dugui::widget::Widget;
/// use dugui::widgets::{Container, Input};
///
/// let headless = HeadlessBackend::new();
/// let form = Container::form();
/// let name: Input<String> = Input::new(form.title("Name"));
/// form.run(&headless).unwrap();
///
/// HeadlessElement::of(&name).unwrap().edit("Ada").unwrap();
/// assert_eq!(name.get(), "Ada");
/// ```
#[derive(Clone, Default)]
pub struct HeadlessBackend {
    session: Rc<Session>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `script` while the next top-level window is open.
    pub fn on_window(self, script: impl FnMut(&HeadlessElement) -> Result<()> + 'static) -> Self {
        *self.session.on_window.borrow_mut() = Some(Box::new(script));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.session.calls.borrow().clone()
    }

    /// Number of elements minted so far.
    pub fn element_count(&self) -> usize {
        self.session.elements.borrow().len()
    }

    /// Handle to an element of this session.
    pub fn element(&self, id: ElementId) -> Option<HeadlessElement> {
        self.session
            .elements
            .borrow()
            .contains_key(id)
            .then(|| HeadlessElement {
                id,
                session: Rc::clone(&self.session),
            })
    }

    /// The first created element carrying `title`, in minting order.
    pub fn find_by_title(&self, title: &str) -> Option<HeadlessElement> {
        let id = self
            .session
            .elements
            .borrow()
            .iter()
            .find(|(_, record)| record.created && record.title == title)
            .map(|(id, _)| id)?;
        self.element(id)
    }
}

impl fmt::Debug for HeadlessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessBackend")
            .field("elements", &self.element_count())
            .field("calls", &self.session.calls.borrow().len())
            .finish()
    }
}

fn not_an_element(operation: &str) -> Error {
    Error::invalid(format!("{operation} on the headless application context"))
}

impl Backend for HeadlessBackend {
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
// HeadlessElement
// ---------------------------------------------------------------------------

/// One element of a headless session.
#[derive(Clone)]
pub struct HeadlessElement {
    id: ElementId,
    session: Rc<Session>,
}

impl HeadlessElement {
    /// The headless counterpart of a realized widget.
    pub fn of<W: Widget + ?Sized>(widget: &W) -> Option<Self> {
        let backend = widget.node().backend()?;
        backend.as_any().downcast_ref::<HeadlessElement>().cloned()
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    fn read<R>(&self, f: impl FnOnce(&ElementRecord) -> R) -> R {
        f(&self.session.elements.borrow()[self.id])
    }

    fn write<R>(&self, f: impl FnOnce(&mut ElementRecord) -> R) -> R {
        f(&mut self.session.elements.borrow_mut()[self.id])
    }

    pub fn kind(&self) -> WidgetKind {
        self.read(|r| r.kind)
    }

    pub fn is_created(&self) -> bool {
        self.read(|r| r.created)
    }

    pub fn title(&self) -> String {
        self.read(|r| r.title.clone())
    }

    pub fn placeholder_text(&self) -> String {
        self.read(|r| r.placeholder_text.clone())
    }

    /// The value the element currently shows.
    pub fn value(&self) -> Option<Value> {
        self.read(|r| r.value.clone())
    }

    pub fn has_border(&self) -> bool {
        self.read(|r| r.border)
    }

    pub fn is_window(&self) -> bool {
        self.read(|r| r.windowed)
    }

    /// Whether this is a window that has not been closed.
    pub fn is_open(&self) -> bool {
        self.read(|r| r.open)
    }

    /// Created children, in layout order.
    pub fn children(&self) -> Vec<HeadlessElement> {
        self.read(|r| r.children.clone())
            .into_iter()
            .map(|id| HeadlessElement {
                id,
                session: Rc::clone(&self.session),
            })
            .collect()
    }

    pub fn value_reaction_count(&self) -> usize {
        self.read(|r| r.value_reactions.len())
    }

    pub fn action_count(&self) -> usize {
        self.read(|r| r.actions.len())
    }

    // -- user simulation -------------------------------------------------

    fn ensure_created(&self, operation: &str) -> Result<()> {
        if self.is_created() {
            Ok(())
        } else {
            Err(Error::invalid(format!("{operation} on an element that was never created")))
        }
    }

    /// Simulate the user entering `value`, firing value-changed callbacks.
    pub fn edit(&self, value: impl Into<Value>) -> Result<()> {
        self.ensure_created("edit")?;
        let value = value.into();
        let reactions = self.write(|r| {
            r.kind.ensure_value(value.domain())?;
            r.value = Some(value.clone());
            Ok::<_, Error>(r.value_reactions.clone())
        })?;
        log::trace!("headless: user edit {value:?}");
        for reaction in &reactions {
            reaction.call(&value);
        }
        Ok(())
    }

    /// Simulate a click. Check boxes toggle and report their new state
    /// before the actions run.
    pub fn click(&self) -> Result<()> {
        self.ensure_created("click")?;
        let (toggled, reactions, actions) = self.write(|r| {
            r.kind.ensure_action()?;
            let toggled = if r.kind == WidgetKind::CheckBox {
                let next = match r.value {
                    Some(Value::Integer(state)) if state != 0 => 0,
                    _ => 1,
                };
                r.value = Some(Value::Integer(next));
                Some(Value::Integer(next))
            } else {
                None
            };
            Ok::<_, Error>((toggled, r.value_reactions.clone(), r.actions.clone()))
        })?;
        if let Some(state) = toggled {
            for reaction in &reactions {
                reaction.call(&state);
            }
        }
        for action in &actions {
            action();
        }
        Ok(())
    }

    fn open_window(&self) -> Result<()> {
        let script = self.session.on_window.borrow_mut().take();
        if let Some(mut script) = script {
            log::debug!("headless: running window session script");
            script(self)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HeadlessElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessElement")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("title", &self.title())
            .field("value", &self.value())
            .finish()
    }
}

impl Backend for HeadlessElement {
    fn create(&self, properties: &StartupProperties) -> Result<()> {
        properties.kind.ensure_set()?;
        self.write(|r| {
            r.kind = properties.kind;
            r.created = true;
            r.title = properties.title.clone();
            r.placeholder_text = properties.placeholder_text.clone();
            r.value = properties.initial_value();
            r.border = properties.border;
            r.windowed = properties.windowed;
            r.open = properties.windowed;
        });
        self.session.log(Call::Create {
            element: self.id,
            kind: properties.kind,
            title: properties.title.clone(),
        });

        wire_reactions(self, properties)?;

        if properties.kind.is_container() {
            for child in properties.children() {
                child.realize()?;
                if let Some(element) = HeadlessElement::of(&child) {
                    self.write(|r| r.children.push(element.id));
                }
            }
        }

        if properties.windowed {
            self.open_window()?;
        }
        Ok(())
    }

    fn set_title(&self, title: &str) -> Result<()> {
        self.write(|r| {
            r.kind.ensure_set()?;
            r.title = title.to_owned();
            Ok::<_, Error>(())
        })?;
        self.session.log(Call::SetTitle {
            element: self.id,
            title: title.to_owned(),
        });
        Ok(())
    }

    fn add_value_changed_reaction(&self, reaction: ValueReaction) -> Result<()> {
        let domain = reaction.domain();
        self.write(|r| {
            r.kind.ensure_value_reaction(domain)?;
            r.value_reactions.push(reaction);
            Ok::<_, Error>(())
        })?;
        self.session.log(Call::AddValueReaction {
            element: self.id,
            domain,
        });
        Ok(())
    }

    fn add_reaction(&self, reaction: Reaction) -> Result<()> {
        self.write(|r| {
            r.kind.ensure_action()?;
            r.actions.push(reaction);
            Ok::<_, Error>(())
        })?;
        self.session.log(Call::AddReaction { element: self.id });
        Ok(())
    }

    fn set_value(&self, value: Value) -> Result<()> {
        self.write(|r| {
            r.kind.ensure_value(value.domain())?;
            r.value = Some(value.clone());
            Ok::<_, Error>(())
        })?;
        self.session.log(Call::SetValue {
            element: self.id,
            value,
        });
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.write(|r| {
            if !r.windowed {
                return Err(Error::invalid(format!(
                    "closing a {} that is not a window",
                    r.kind
                )));
            }
            r.open = false;
            Ok(())
        })?;
        self.session.log(Call::Close { element: self.id });
        Ok(())
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
