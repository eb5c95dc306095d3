//! API key entry screen shown when the environment has no key

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::views::InputField;

pub fn render_key_prompt(frame: &mut Frame, field: &InputField, env_var: &str) {
    let [message, input, hint, _] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(format!(
            "API key not found in {env_var}. Please enter it below."
        ))
        .style(Style::default().fg(Color::Red)),
        message,
    );
    field.render(frame, input, true);
    frame.render_widget(
        Paragraph::new("Enter to continue · Esc to quit")
            .style(Style::default().fg(Color::DarkGray)),
        hint,
    );
}
