//! Conversation transcript view

use careerbot::chat::{Role, TranscriptEntry};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Scrollable transcript pane, pinned to the newest message by default
#[derive(Debug, Default)]
pub struct TranscriptView {
    /// Lines scrolled back from the bottom
    scroll_back: u16,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Jump back to the newest message
    pub fn follow(&mut self) {
        self.scroll_back = 0;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, entries: &[TranscriptEntry]) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Conversation ");

        if entries.is_empty() {
            let hint = Paragraph::new("Enter your academic major and ask for career advice!")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let lines = transcript_lines(entries);
        let width = area.width.saturating_sub(2) as usize;
        let height = area.height.saturating_sub(2) as usize;
        let total: usize = lines.iter().map(|l| wrapped_height(l, width)).sum();

        let bottom = total.saturating_sub(height) as u16;
        self.scroll_back = self.scroll_back.min(bottom);
        let offset = bottom - self.scroll_back;

        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

fn label_style(entry: &TranscriptEntry) -> Style {
    let color = match entry {
        TranscriptEntry::Turn(turn) if turn.role == Role::User => Color::Cyan,
        TranscriptEntry::Turn(_) => Color::Green,
        TranscriptEntry::Error(_) => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn transcript_lines(entries: &[TranscriptEntry]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(Line::from(Span::styled(entry.label(), label_style(entry))));
        let body_style = match entry {
            TranscriptEntry::Error(_) => Style::default().fg(Color::Red),
            TranscriptEntry::Turn(_) => Style::default(),
        };
        for text_line in entry.text().lines() {
            lines.push(Line::from(Span::styled(text_line, body_style)));
        }
        lines.push(Line::default());
    }
    lines
}

/// Rows a line occupies once wrapped to `width` columns
fn wrapped_height(line: &Line<'_>, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    line.width().max(1).div_ceil(width)
}
