use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, ScrollbarStyle, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle, TextInput,
    TextInputProps, TextInputStyle, centered_rect, highlight_substring,
};

use super::Component;
use crate::action::Action;
use crate::region::Region;

/// Modal size, shared with the event routing in `main`.
pub const PICKER_WIDTH: u16 = 50;
pub const PICKER_HEIGHT: u16 = 16;

const MATCH_FG: Color = Color::Rgb(126, 200, 180);
const PICKER_BG: Color = Color::Rgb(30, 36, 44);

/// Dropdown for a region field: filter input over the matching regions
pub struct RegionPicker {
    input: TextInput,
    list: SelectList,
    modal: Modal,
    was_open: bool,
}

pub struct RegionPickerProps<'a> {
    pub title: &'a str,
    pub query: &'a str,
    pub matches: &'a [&'a Region],
    pub selected: usize,
    pub is_focused: bool,
    // Action constructors
    pub on_query_change: fn(String) -> Action,
    pub on_select: fn(usize) -> Action,
}

impl Default for RegionPicker {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl RegionPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh input and list each time the dropdown opens.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
            self.list = SelectList::new();
        }
        self.was_open = is_open;
    }

    fn items(matches: &[&Region], query: &str) -> Vec<Line<'static>> {
        let base = Style::default();
        let highlight = Style::default()
            .fg(MATCH_FG)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        matches
            .iter()
            .map(|region| highlight_substring(&region.name, query, base, highlight))
            .collect()
    }

    fn list_style(padding: Padding) -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding,
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }

    fn input_style(padding: Padding, bg: Option<Color>) -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding,
                bg,
                fg: None,
            },
            placeholder_style: None,
            cursor_style: None,
        }
    }
}

fn confirm_on_submit(_: String) -> Action {
    Action::PickerConfirm
}

fn render_on_cursor_move(_: usize) -> Action {
    Action::Render
}

impl Component<Action> for RegionPicker {
    type Props<'a> = RegionPickerProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }

        match key.code {
            KeyCode::Esc => return vec![Action::PickerClose],
            KeyCode::Enter => {
                if props.matches.is_empty() {
                    return Vec::new();
                }
                return vec![Action::PickerConfirm];
            }
            KeyCode::Down | KeyCode::Up => {
                if props.matches.is_empty() {
                    return Vec::new();
                }
                let items = Self::items(props.matches, props.query);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.selected,
                    is_focused: true,
                    style: Self::list_style(Padding::xy(1, 1)),
                    behavior: SelectListBehavior::default(),
                    on_select: props.on_select,
                    render_item: &|item| item.clone(),
                };
                return self
                    .list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect();
            }
            _ => {}
        }

        // Everything else edits the filter
        let input_props = TextInputProps {
            value: props.query,
            placeholder: "Type to filter...",
            is_focused: true,
            style: Self::input_style(Padding::new(1, 0, 1, 0), None),
            on_change: props.on_query_change,
            on_submit: confirm_on_submit,
            on_cursor_move: Some(render_on_cursor_move),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < PICKER_WIDTH / 2 || area.height < PICKER_HEIGHT / 2 {
            return;
        }

        let RegionPicker {
            input, list, modal, ..
        } = self;
        let modal_area = centered_rect(PICKER_WIDTH, PICKER_HEIGHT, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Filter
                Constraint::Min(1),    // Regions
            ])
            .split(content_area);

            let title = Line::from(vec![Span::styled(
                format!(" {} ", props.title),
                Style::default().add_modifier(Modifier::BOLD),
            )]);
            frame.render_widget(Paragraph::new(title), chunks[0]);

            let input_props = TextInputProps {
                value: props.query,
                placeholder: "Type to filter...",
                is_focused: props.is_focused,
                style: Self::input_style(Padding::all(1), Some(Color::Rgb(50, 50, 60))),
                on_change: props.on_query_change,
                on_submit: confirm_on_submit,
                on_cursor_move: Some(render_on_cursor_move),
            };
            input.render(frame, chunks[1], input_props);

            if props.matches.is_empty() {
                let empty = Line::from(Span::styled(
                    " No matching State/UT",
                    Style::default().fg(Color::DarkGray),
                ));
                frame.render_widget(Paragraph::new(empty), chunks[2]);
                return;
            }

            let items = Self::items(props.matches, props.query);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.selected,
                is_focused: props.is_focused,
                style: Self::list_style(Padding::all(1)),
                behavior: SelectListBehavior {
                    show_scrollbar: items.len() > 8,
                    wrap_navigation: false,
                },
                on_select: props.on_select,
                render_item: &|item| item.clone(),
            };
            list.render(frame, chunks[2], list_props);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(PICKER_BG),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::PickerClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionList;
    use tui_dispatch::testing::*;

    fn props<'a>(matches: &'a [&'a Region], query: &'a str) -> RegionPickerProps<'a> {
        RegionPickerProps {
            title: "Origin State/UT",
            query,
            matches,
            selected: 0,
            is_focused: true,
            on_query_change: Action::PickerQueryChange,
            on_select: Action::PickerSelect,
        }
    }

    #[test]
    fn test_typing_changes_query() {
        let regions = RegionList::india();
        let matches = regions.matching("");
        let mut picker = RegionPicker::new();
        picker.set_open(true);

        let actions: Vec<_> = picker
            .handle_event(&EventKind::Key(key("k")), props(&matches, ""))
            .into_iter()
            .collect();
        actions.assert_first(Action::PickerQueryChange("k".into()));
    }

    #[test]
    fn test_unfocused_ignores() {
        let regions = RegionList::india();
        let matches = regions.matching("");
        let mut picker = RegionPicker::new();
        let mut props = props(&matches, "");
        props.is_focused = false;

        let actions: Vec<_> = picker
            .handle_event(&EventKind::Key(key("k")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_lists_matches() {
        let regions = RegionList::india();
        let matches = regions.matching("kar");
        let mut picker = RegionPicker::new();
        picker.set_open(true);

        let mut render = RenderHarness::new(70, 24);
        let output = render.render_to_string_plain(|frame| {
            picker.render(frame, frame.area(), props(&matches, "kar"));
        });

        assert!(output.contains("Karnataka"), "Should list Karnataka:\n{}", output);
        assert!(!output.contains("Kerala"), "Should filter Kerala out");
        assert!(output.contains("Origin State/UT"));
    }

    #[test]
    fn test_render_without_matches() {
        let regions = RegionList::india();
        let matches = regions.matching("zzz");
        let mut picker = RegionPicker::new();
        picker.set_open(true);

        let mut render = RenderHarness::new(70, 24);
        let output = render.render_to_string_plain(|frame| {
            picker.render(frame, frame.area(), props(&matches, "zzz"));
        });

        assert!(output.contains("No matching State/UT"));
    }
}
