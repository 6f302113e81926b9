use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarProps, StatusBarSection,
    StatusBarStyle, TextInput, TextInputProps, TextInputStyle,
};

use super::title_header::TITLE_HEIGHT;
use super::{Component, TitleHeader, TitleHeaderProps};
use crate::action::Action;
use crate::calendar::{DateStep, DateWindow, format_date};
use crate::form::{FormError, FormField, RegionSlot, SearchForm, TravelMode};
use crate::search::SearchRequest;
use crate::state::{AppState, SearchStatus};

const FORM_MAX_WIDTH: u16 = 64;
const LABEL_WIDTH: u16 = 14;

const ACCENT: Color = Color::Rgb(126, 200, 180);
const INPUT_BG: Color = Color::Rgb(50, 50, 60);
const TEXT_DIM: Color = Color::DarkGray;
const ERROR_FG: Color = Color::Rgb(255, 110, 100);
const OK_FG: Color = Color::Rgb(120, 200, 120);

/// Props for the form - read-only view of the form values plus the search
/// status owned by whoever runs the search
pub struct SearchFormProps<'a> {
    pub form: &'a SearchForm,
    pub focus: FormField,
    pub window: DateWindow,
    pub status: &'a SearchStatus,
    pub validation: Option<FormField>,
    pub last_request: Option<&'a SearchRequest>,
    pub is_focused: bool,
}

impl<'a> SearchFormProps<'a> {
    pub fn from_state(state: &'a AppState, is_focused: bool) -> Self {
        Self {
            form: &state.form,
            focus: state.focus,
            window: state.date_window(),
            status: &state.status,
            validation: state.validation,
            last_request: state.last_request.as_ref(),
            is_focused,
        }
    }

    fn has_focus(&self, field: FormField) -> bool {
        self.is_focused && self.focus == field
    }
}

/// The trip-search form
pub struct SearchFormView {
    origin_city: TextInput,
    destination_city: TextInput,
}

impl Default for SearchFormView {
    fn default() -> Self {
        Self {
            origin_city: TextInput::new(),
            destination_city: TextInput::new(),
        }
    }
}

impl SearchFormView {
    pub fn new() -> Self {
        Self::default()
    }

    fn city_input(&mut self, field: FormField) -> &mut TextInput {
        match field {
            FormField::DestinationCity => &mut self.destination_city,
            _ => &mut self.origin_city,
        }
    }
}

fn focus_next_on_submit(_: String) -> Action {
    Action::FocusNext
}

fn render_on_cursor_move(_: usize) -> Action {
    Action::Render
}

fn city_change(field: FormField) -> fn(String) -> Action {
    match field {
        FormField::DestinationCity => Action::FormDestinationCityChange,
        _ => Action::FormOriginCityChange,
    }
}

fn region_change(slot: RegionSlot, value: String) -> Action {
    match slot {
        RegionSlot::Origin => Action::FormOriginStateChange(value),
        RegionSlot::Destination => Action::FormDestinationStateChange(value),
    }
}

/// Submit unless the button is disabled.
fn submit(status: &SearchStatus) -> Vec<Action> {
    if status.is_searching() {
        Vec::new()
    } else {
        vec![Action::FormSubmit]
    }
}

fn input_style(invalid: bool) -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(INPUT_BG),
            fg: None,
        },
        placeholder_style: Some(Style::default().fg(if invalid { ERROR_FG } else { TEXT_DIM })),
        cursor_style: Some(Style::default().bg(ACCENT).fg(Color::Black)),
    }
}

fn region_key(key: &KeyEvent, slot: RegionSlot) -> Vec<Action> {
    match key.code {
        KeyCode::Up => vec![Action::FocusPrev],
        KeyCode::Down => vec![Action::FocusNext],
        KeyCode::Enter | KeyCode::Char(' ') => vec![Action::PickerOpen(slot)],
        KeyCode::Delete | KeyCode::Backspace => vec![region_change(slot, String::new())],
        _ => Vec::new(),
    }
}

fn date_key(key: &KeyEvent) -> Vec<Action> {
    let step = match key.code {
        KeyCode::Left => DateStep::PrevDay,
        KeyCode::Right => DateStep::NextDay,
        KeyCode::Up => DateStep::PrevWeek,
        KeyCode::Down => DateStep::NextWeek,
        KeyCode::PageUp => DateStep::PrevMonth,
        KeyCode::PageDown => DateStep::NextMonth,
        KeyCode::Home | KeyCode::Char('t') => DateStep::Start,
        KeyCode::End => DateStep::End,
        KeyCode::Delete | KeyCode::Backspace => {
            return vec![Action::FormJourneyDateChange(None)];
        }
        KeyCode::Enter => return vec![Action::FocusNext],
        _ => return Vec::new(),
    };
    vec![Action::FormJourneyDateStep(step)]
}

fn mode_key(key: &KeyEvent, mode: TravelMode) -> Vec<Action> {
    match key.code {
        KeyCode::Left | KeyCode::Up => vec![Action::FormTravelModeChange(mode.prev())],
        KeyCode::Right | KeyCode::Down => vec![Action::FormTravelModeChange(mode.next())],
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            vec![Action::FormTravelModeChange(TravelMode::ALL[index])]
        }
        KeyCode::Enter => vec![Action::FocusNext],
        _ => Vec::new(),
    }
}

impl Component<Action> for SearchFormView {
    type Props<'a> = SearchFormProps<'a>;

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

        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return submit(props.status);
        }
        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Esc => return vec![Action::Quit],
            _ => {}
        }

        if let Some(slot) = props.focus.region_slot() {
            return region_key(key, slot);
        }

        match props.focus {
            field @ (FormField::OriginCity | FormField::DestinationCity) => {
                match key.code {
                    KeyCode::Up => return vec![Action::FocusPrev],
                    KeyCode::Down => return vec![Action::FocusNext],
                    _ => {}
                }
                let value = props.form.text(field).unwrap_or_default();
                let input_props = TextInputProps {
                    value,
                    placeholder: "Enter city or town",
                    is_focused: true,
                    style: input_style(false),
                    on_change: city_change(field),
                    on_submit: focus_next_on_submit,
                    on_cursor_move: Some(render_on_cursor_move),
                };
                self.city_input(field)
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            FormField::OriginState | FormField::DestinationState => Vec::new(),
            FormField::JourneyDate => date_key(key),
            FormField::TravelMode => mode_key(key, props.form.travel_mode),
            FormField::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => submit(props.status),
                KeyCode::Up => vec![Action::FocusPrev],
                KeyCode::Down => vec![Action::FocusNext],
                _ => Vec::new(),
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let outer = Layout::vertical([
            Constraint::Min(1),    // Form
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let width = outer[0].width.min(FORM_MAX_WIDTH);
        let [form_area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(outer[0]);

        let border = if props.status.is_searching() {
            TEXT_DIM
        } else {
            ACCENT
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Trip Search ");
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Max(TITLE_HEIGHT), // Title
            Constraint::Length(1),         // Origin:
            Constraint::Length(1),         // City
            Constraint::Length(1),         // State/UT
            Constraint::Length(1),         // Destination:
            Constraint::Length(1),         // City
            Constraint::Length(1),         // State/UT
            Constraint::Length(1),         // Journey Date:
            Constraint::Length(1),         // Date
            Constraint::Length(1),         // Select Mode of Travel:
            Constraint::Length(1),         // Modes
            Constraint::Length(1),         // Spacer
            Constraint::Length(1),         // Message
            Constraint::Length(1),         // Button
            Constraint::Min(0),
        ])
        .split(inner);

        let mut title = TitleHeader;
        title.render(
            frame,
            rows[0],
            TitleHeaderProps {
                title: "Travel Route Finder",
                subtitle: "Bus, train and flight routes between cities",
                status: props.status,
            },
        );

        render_section(frame, rows[1], "Origin:");
        self.render_city(frame, rows[2], &props, FormField::OriginCity);
        render_region(frame, rows[3], &props, RegionSlot::Origin);

        render_section(frame, rows[4], "Destination:");
        self.render_city(frame, rows[5], &props, FormField::DestinationCity);
        render_region(frame, rows[6], &props, RegionSlot::Destination);

        render_section(frame, rows[7], "Journey Date:");
        render_date(frame, rows[8], &props);

        render_section(frame, rows[9], "Select Mode of Travel:");
        render_modes(frame, rows[10], &props);

        render_message(frame, rows[12], &props);
        render_button(frame, rows[13], &props);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            outer[1],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("tab", "next field"),
                    StatusBarHint::new("enter", "select"),
                    StatusBarHint::new("ctrl+s", "search"),
                    StatusBarHint::new("esc", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

impl SearchFormView {
    fn render_city(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: &SearchFormProps<'_>,
        field: FormField,
    ) {
        let value_area = render_label(frame, area, props, field);
        let input_props = TextInputProps {
            value: props.form.text(field).unwrap_or_default(),
            placeholder: "Enter city or town",
            is_focused: props.has_focus(field),
            style: input_style(props.validation == Some(field)),
            on_change: city_change(field),
            on_submit: focus_next_on_submit,
            on_cursor_move: Some(render_on_cursor_move),
        };
        self.city_input(field).render(frame, value_area, input_props);
    }
}

fn render_section(frame: &mut Frame, area: Rect, title: &str) {
    let line = Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the field label and return the area left for the value.
fn render_label(frame: &mut Frame, area: Rect, props: &SearchFormProps<'_>, field: FormField) -> Rect {
    let [label_area, value_area] =
        Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)]).areas(area);

    let focused = props.has_focus(field);
    let marker = if focused { "> " } else { "  " };
    let required = if field.is_required() { " *" } else { "" };
    let style = if props.validation == Some(field) {
        Style::default().fg(ERROR_FG)
    } else if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let line = Line::from(Span::styled(
        format!("{marker}{}{required}", field.label()),
        style,
    ));
    frame.render_widget(Paragraph::new(line), label_area);
    value_area
}

fn value_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(INPUT_BG).fg(ACCENT)
    } else {
        Style::default().bg(INPUT_BG)
    }
}

fn render_region(frame: &mut Frame, area: Rect, props: &SearchFormProps<'_>, slot: RegionSlot) {
    let field = slot.field();
    let value_area = render_label(frame, area, props, field);
    let focused = props.has_focus(field);

    let value = props.form.region(slot);
    let text = if value.is_empty() {
        Span::styled(
            " None",
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::raw(format!(" {value}"))
    };
    let line = Line::from(vec![text, Span::styled(" v", Style::default().fg(TEXT_DIM))]);
    frame.render_widget(Paragraph::new(line).style(value_style(focused)), value_area);
}

fn render_date(frame: &mut Frame, area: Rect, props: &SearchFormProps<'_>) {
    let value_area = render_label(frame, area, props, FormField::JourneyDate);
    let focused = props.has_focus(FormField::JourneyDate);

    let date = match props.form.journey_date {
        Some(date) => Span::raw(format!(" < {} > ", format_date(date))),
        None => Span::styled(
            " no date ",
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC),
        ),
    };
    let range = Span::styled(
        format!(
            "  {} to {}",
            props.window.min().format("%d %b"),
            props.window.max().format("%d %b %Y")
        ),
        Style::default().fg(TEXT_DIM),
    );
    let line = Line::from(vec![date.style(value_style(focused)), range]);
    frame.render_widget(Paragraph::new(line), value_area);
}

fn render_modes(frame: &mut Frame, area: Rect, props: &SearchFormProps<'_>) {
    let focused = props.has_focus(FormField::TravelMode);
    let mut spans = vec![Span::raw(if focused { "> " } else { "  " })];
    for (i, mode) in TravelMode::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let selected = *mode == props.form.travel_mode;
        let radio = if selected { "(*)" } else { "( )" };
        let mut style = Style::default();
        if selected {
            style = style.fg(ACCENT).add_modifier(Modifier::BOLD);
            if focused {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
        }
        spans.push(Span::styled(format!("{radio} {mode}"), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_message(frame: &mut Frame, area: Rect, props: &SearchFormProps<'_>) {
    let span = if let Some(field) = props.validation {
        Span::styled(
            format!("! {}", FormError::MissingField(field)),
            Style::default().fg(ERROR_FG),
        )
    } else if let Some(error) = props.status.error() {
        Span::styled(
            format!("! Search failed: {error}"),
            Style::default().fg(ERROR_FG),
        )
    } else if let (SearchStatus::Idle, Some(request)) = (props.status, props.last_request) {
        Span::styled(
            format!("Sent: {}", request.summary()),
            Style::default().fg(OK_FG),
        )
    } else {
        return;
    };
    frame.render_widget(Paragraph::new(Line::from(span).centered()), area);
}

fn render_button(frame: &mut Frame, area: Rect, props: &SearchFormProps<'_>) {
    let style = if props.status.is_searching() {
        Style::default().fg(TEXT_DIM)
    } else if props.has_focus(FormField::Submit) {
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    };
    let label = format!("[ {} ]", props.status.submit_label());
    let line = Line::from(Span::styled(label, style)).centered();
    frame.render_widget(Paragraph::new(line), area);
}
