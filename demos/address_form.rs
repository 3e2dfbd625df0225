//! Address form in the terminal.
//!
//! Tab moves between fields, Enter confirms, Esc closes without submitting.
//!
//! ```sh
//! cargo run --example address_form
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use dugui::backend::terminal::TerminalBackend;
use dugui::widget::Widget;
use dugui::widgets::{Button, CheckBox, Container, Input, Layout, Title};

/// The whole window, declared field by field.
struct AddressWindow {
    window: Container,
    first: Input<String>,
    last: Input<String>,
    address: Input<String>,
    city: Input<String>,
    postal_code: Input<i64>,
    newsletter: CheckBox,
    submit: Button,
}

impl AddressWindow {
    fn declare() -> dugui::Result<Self> {
        let window = Container::vertical();
        Title::new(window.title("Set address"))?;

        let name = Container::nested(window.standard_border(), Layout::Form);
        let first = Input::new(name.title("First name").placeholder_text("Ada"));
        let last = Input::new(name.title("Last name").placeholder_text("Lovelace"));
        window.adopt(name)?;

        let place = Container::nested(window.standard_border(), Layout::Form);
        let address = Input::new(place.title("Address"));
        let city = Input::new(place.title("City"));
        let postal_code = Input::new(place.title("Postal code").placeholder_text("12345"));
        let newsletter = CheckBox::new(place.title("Newsletter"));
        window.adopt(place)?;

        let submit = Button::new(window.title("Submit"));

        Ok(Self {
            window,
            first,
            last,
            address,
            city,
            postal_code,
            newsletter,
            submit,
        })
    }

    fn summary(&self) -> String {
        format!(
            "{} {}\n{}\n{} {}{}",
            self.first.get(),
            self.last.get(),
            self.address.get(),
            self.postal_code.get(),
            self.city.get(),
            if self.newsletter.is_checked() {
                "\n(subscribed)"
            } else {
                ""
            }
        )
    }
}

fn main() -> dugui::Result<()> {
    let form = Rc::new(AddressWindow::declare()?);
    let submitted = Rc::new(RefCell::new(None));

    // Weak: the form indirectly owns this callback.
    let weak = Rc::downgrade(&form);
    let sink = Rc::clone(&submitted);
    form.submit.on_click(move || {
        let Some(form) = weak.upgrade() else { return };
        *sink.borrow_mut() = Some(form.summary());
        if let Err(err) = form.window.close() {
            eprintln!("could not close the window: {err}");
        }
    })?;

    form.window.run(&TerminalBackend::new())?;

    match submitted.borrow().as_deref() {
        Some(summary) => println!("{summary}"),
        None => println!("cancelled"),
    }
    Ok(())
}
