//! Plain-text rendering of a window.
//!
//! A window renders to a list of lines with no terminal involved: the driver
//! only prints them. Forms align their labels in one column, vertical boxes
//! stack their children, horizontal boxes put them side by side.

use crate::props::WidgetKind;

use super::state::{Arena, ElementId, ElementState};
use super::TerminalConfig;

const FIELD_WIDTH: usize = 16;
const COLUMN_GAP: usize = 2;

pub(crate) const HELP: &str =
    "Tab/Shift+Tab move  Enter confirm  Space toggle  Up/Down step  Esc close";

struct Context<'a> {
    arena: &'a Arena,
    focused: Option<ElementId>,
    marker: &'a str,
}

/// Render the window rooted at `root` to lines.
pub(crate) fn render_window(
    arena: &Arena,
    root: ElementId,
    focused: Option<ElementId>,
    config: &TerminalConfig,
) -> Vec<String> {
    let Some(state) = arena.get(root) else {
        return Vec::new();
    };
    let ctx = Context {
        arena,
        focused,
        marker: &config.focus_marker,
    };

    let title = if state.title.is_empty() {
        config.default_title.as_str()
    } else {
        state.title.as_str()
    };
    let mut lines = vec![title.to_owned(), "=".repeat(title.chars().count()), String::new()];
    lines.extend(render_element(&ctx, root, true));
    if config.show_help {
        lines.push(String::new());
        lines.push(HELP.to_owned());
    }
    lines
}

fn render_element(ctx: &Context<'_>, id: ElementId, labelled: bool) -> Vec<String> {
    let Some(state) = ctx.arena.get(id) else {
        return Vec::new();
    };
    let block = match state.kind {
        WidgetKind::Form => render_form(ctx, state),
        WidgetKind::VerticalBox => state
            .children
            .iter()
            .flat_map(|child| render_element(ctx, *child, true))
            .collect(),
        WidgetKind::HorizontalBox => side_by_side(
            state
                .children
                .iter()
                .map(|child| render_element(ctx, *child, true))
                .collect(),
        ),
        WidgetKind::Unset => Vec::new(),
        _ => {
            let widget = render_widget(ctx, id, state);
            if labelled && !state.title.is_empty() && state.kind != WidgetKind::Button {
                vec![format!("{}: {widget}", state.title)]
            } else {
                vec![widget]
            }
        }
    };
    if state.border && state.kind.is_container() {
        boxed(block)
    } else {
        block
    }
}

fn render_form(ctx: &Context<'_>, state: &ElementState) -> Vec<String> {
    let label_width = state
        .children
        .iter()
        .filter_map(|child| ctx.arena.get(*child))
        .map(|child| child.title.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for child in &state.children {
        let label = ctx
            .arena
            .get(*child)
            .map(|c| c.title.as_str())
            .unwrap_or_default();
        for (row, line) in render_element(ctx, *child, false).into_iter().enumerate() {
            let label = if row == 0 { label } else { "" };
            lines.push(format!("{label:<label_width$}  {line}"));
        }
    }
    lines
}

fn render_widget(ctx: &Context<'_>, id: ElementId, state: &ElementState) -> String {
    let body = match state.kind {
        WidgetKind::TextField | WidgetKind::IntegerField | WidgetKind::FloatField => {
            let content = if state.buffer.is_empty() {
                state.placeholder_text.as_str()
            } else {
                state.buffer.as_str()
            };
            let width = FIELD_WIDTH.max(content.chars().count());
            format!("[{content:<width$}]")
        }
        WidgetKind::CheckBox => {
            if state.is_checked() {
                "[x]".to_owned()
            } else {
                "[ ]".to_owned()
            }
        }
        WidgetKind::SpinBox => format!("-[ {} ]+", state.buffer),
        WidgetKind::Button => format!("[ {} ]", state.title),
        _ => String::new(),
    };
    if ctx.focused == Some(id) {
        format!("{}{body}", ctx.marker)
    } else {
        format!("{}{body}", " ".repeat(ctx.marker.chars().count()))
    }
}

fn width(lines: &[String]) -> usize {
    lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

fn side_by_side(blocks: Vec<Vec<String>>) -> Vec<String> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = blocks.iter().map(|b| width(b)).collect();
    (0..height)
        .map(|row| {
            let cells: Vec<String> = blocks
                .iter()
                .zip(widths.iter().copied())
                .map(|(block, w)| {
                    let cell = block.get(row).map(String::as_str).unwrap_or_default();
                    format!("{cell:<w$}")
                })
                .collect();
            cells.join(&" ".repeat(COLUMN_GAP)).trim_end().to_owned()
        })
        .collect()
}

fn boxed(block: Vec<String>) -> Vec<String> {
    let w = width(&block);
    let mut lines = Vec::with_capacity(block.len() + 2);
    lines.push(format!("┌{}┐", "─".repeat(w + 2)));
    for line in block {
        lines.push(format!("│ {line:<w$} │"));
    }
    lines.push(format!("└{}┘", "─".repeat(w + 2)));
    lines
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::props::{PropertyBuilder, Value};

    fn element(arena: &mut Arena, builder: PropertyBuilder, kind: WidgetKind) -> ElementId {
        let properties = builder.properties();
        properties.borrow_mut().kind = kind;
        let mut state = ElementState::default();
        state.configure(&properties.borrow());
        arena.insert(state)
    }

    fn config() -> TerminalConfig {
        TerminalConfig::new().with_help(false).with_focus_marker("> ")
    }

    #[test]
    fn untitled_window_gets_default_title() {
        let mut arena = Arena::with_key();
        let root = element(&mut arena, PropertyBuilder::new(), WidgetKind::VerticalBox);
        let lines = render_window(&arena, root, None, &config());
        assert_eq!(lines, vec!["User Interface", "==============", ""]);
    }

    #[test]
    fn form_aligns_labels() {
        let mut arena = Arena::with_key();
        let first = element(
            &mut arena,
            PropertyBuilder::new().title("First name").default_text("Ada"),
            WidgetKind::TextField,
        );
        let year = element(
            &mut arena,
            PropertyBuilder::new().title("Year").placeholder_text("YYYY"),
            WidgetKind::IntegerField,
        );
        let root = element(
            &mut arena,
            PropertyBuilder::new().title("Person"),
            WidgetKind::Form,
        );
        arena[root].children = vec![first, year];

        let lines = render_window(&arena, root, Some(year), &config());
        assert_eq!(
            lines,
            vec![
                "Person",
                "======",
                "",
                "First name    [Ada             ]",
                "Year        > [YYYY            ]",
            ]
        );
    }

    #[test]
    fn horizontal_box_with_border() {
        let mut arena = Arena::with_key();
        let ok = element(&mut arena, PropertyBuilder::new().title("OK"), WidgetKind::Button);
        let check = element(
            &mut arena,
            PropertyBuilder::new().title("Keep").default_integer(1),
            WidgetKind::CheckBox,
        );
        let row = element(
            &mut arena,
            PropertyBuilder::new().standard_border(),
            WidgetKind::HorizontalBox,
        );
        arena[row].children = vec![ok, check];

        let ctx = Context {
            arena: &arena,
            focused: None,
            marker: "",
        };
        assert_eq!(
            render_element(&ctx, row, true),
            vec!["┌───────────────────┐", "│ [ OK ]  Keep: [x] │", "└───────────────────┘"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn spin_box_and_help() {
        let mut arena = Arena::with_key();
        let spin = element(&mut arena, PropertyBuilder::new(), WidgetKind::SpinBox);
        arena[spin].show(Value::Integer(7));
        let root = element(&mut arena, PropertyBuilder::new(), WidgetKind::VerticalBox);
        arena[root].children = vec![spin];

        let lines = render_window(&arena, root, None, &TerminalConfig::new().with_focus_marker(""));
        assert_eq!(lines[3], "-[ 7 ]+");
        assert_eq!(lines.last().map(String::as_str), Some(HELP));
    }

    #[test]
    fn bordered_form_in_window() {
        let mut arena = Arena::with_key();
        let first = element(
            &mut arena,
            PropertyBuilder::new().title("First name").placeholder_text("Ada"),
            WidgetKind::TextField,
        );
        let last = element(
            &mut arena,
            PropertyBuilder::new().title("Last name").default_text("Lovelace"),
            WidgetKind::TextField,
        );
        let form = element(&mut arena, PropertyBuilder::new().standard_border(), WidgetKind::Form);
        arena[form].children = vec![first, last];
        let submit = element(&mut arena, PropertyBuilder::new().title("Submit"), WidgetKind::Button);
        let root = element(
            &mut arena,
            PropertyBuilder::new().title("Set address"),
            WidgetKind::VerticalBox,
        );
        arena[root].children = vec![form, submit];

        let lines = render_window(&arena, root, None, &config());
        insta::assert_snapshot!(lines.join("\n"), @r"
        Set address
        ===========

        ┌──────────────────────────────────┐
        │ First name    [Ada             ] │
        │ Last name     [Lovelace        ] │
        └──────────────────────────────────┘
          [ Submit ]
        ");
    }
}
