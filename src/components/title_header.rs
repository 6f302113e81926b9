use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, ColorStop, Fill, LinearGradient, Renderer,
    fonts, integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::SearchStatus;

pub struct TitleHeader;

pub struct TitleHeaderProps<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub status: &'a SearchStatus,
}

/// Rows the header wants: FIGlet title plus one subtitle line.
pub const TITLE_HEIGHT: u16 = 5;

fn gradient_colors(status: &SearchStatus) -> (ArtColor, ArtColor) {
    match status {
        SearchStatus::Idle => (
            ArtColor::rgb(100, 180, 255), // Cool blue
            ArtColor::rgb(150, 220, 200), // Teal
        ),
        SearchStatus::Searching => (
            ArtColor::rgb(255, 180, 80), // Orange
            ArtColor::rgb(255, 220, 100), // Yellow
        ),
        SearchStatus::Failed(_) => (
            ArtColor::rgb(255, 100, 80), // Red-orange
            ArtColor::rgb(255, 60, 60),  // Red
        ),
    }
}

fn make_gradient(colors: (ArtColor, ArtColor), angle: f32) -> Fill {
    let mid = colors.0.interpolate(colors.1, 0.5);
    let stops = vec![
        ColorStop::new(0.0, colors.0),
        ColorStop::new(0.5, mid),
        ColorStop::new(1.0, colors.1),
    ];
    Fill::Linear(LinearGradient::new(angle, stops))
}

impl Component<Action> for TitleHeader {
    type Props<'a> = TitleHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title, falls back to plain text
            Constraint::Length(1), // Subtitle
        ])
        .split(area);

        let fill = make_gradient(gradient_colors(props.status), 5.0);
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(fill);
        frame.render_widget(ArtBox::new(&renderer, props.title), chunks[0]);

        let subtitle = Line::from(vec![Span::styled(
            props.subtitle.to_string(),
            Style::default().fg(Color::DarkGray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(subtitle), chunks[1]);
    }
}
