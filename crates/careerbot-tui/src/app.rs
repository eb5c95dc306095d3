//! Application state and logic

use careerbot::chat::{ChatLoop, InMemoryHistory, LoopState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::views::{InputField, TranscriptView};

/// Which input field receives typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Major,
    Question,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Submit,
    Quit,
}

/// Main application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    chat: ChatLoop<InMemoryHistory>,
    major: InputField,
    question: InputField,
    focus: Focus,
    transcript: TranscriptView,
    status: LoopState,
    notice: Option<String>,
}

impl App {
    pub fn new(chat: ChatLoop<InMemoryHistory>) -> Self {
        Self {
            should_quit: false,
            chat,
            major: InputField::new("Academic major (e.g., Computer Science, Business, Biology)"),
            question: InputField::new("Ask a career-related question"),
            focus: Focus::Major,
            transcript: TranscriptView::new(),
            status: LoopState::Idle,
            notice: None,
        }
    }

    /// Mark the app as ready to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> LoopState {
        self.status
    }

    pub fn chat(&self) -> &ChatLoop<InMemoryHistory> {
        &self.chat
    }

    fn focused_field(&mut self) -> &mut InputField {
        match self.focus {
            Focus::Major => &mut self.major,
            Focus::Question => &mut self.question,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Major => Focus::Question,
            Focus::Question => Focus::Major,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return Action::Quit;
        }

        match key.code {
            KeyCode::Esc => {
                self.quit();
                return Action::Quit;
            }
            KeyCode::Enter => return self.request_submit(),
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            KeyCode::PageUp => self.transcript.scroll_up(5),
            KeyCode::PageDown => self.transcript.scroll_down(5),
            KeyCode::Char(c) => self.focused_field().insert(c),
            KeyCode::Backspace => self.focused_field().backspace(),
            KeyCode::Delete => self.focused_field().delete(),
            KeyCode::Left => self.focused_field().move_left(),
            KeyCode::Right => self.focused_field().move_right(),
            KeyCode::Home => self.focused_field().home(),
            KeyCode::End => self.focused_field().end(),
            _ => {}
        }
        Action::None
    }

    fn request_submit(&mut self) -> Action {
        if self.major.value().is_empty() {
            self.focus = Focus::Major;
            self.notice = Some("Enter your academic major first.".to_string());
            return Action::None;
        }
        if self.question.value().is_empty() {
            self.focus = Focus::Question;
            self.notice = Some("Ask a career-related question.".to_string());
            return Action::None;
        }
        self.notice = None;
        Action::Submit
    }

    /// Flip to `Processing` so the next frame shows the waiting status
    pub fn start_processing(&mut self) {
        self.status = LoopState::Processing;
    }

    /// Send the current fields to the chat loop and wait for the reply
    ///
    /// The major is kept for the next question; the question field is cleared.
    pub async fn submit(&mut self) {
        let major = self.major.value().to_string();
        let question = self.question.value().to_string();

        if self.chat.submit(&major, &question).await.is_some() {
            self.question.clear();
            self.focus = Focus::Question;
        }

        self.transcript.follow();
        self.status = LoopState::Idle;
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let [title, major, question, transcript, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new("AI Career Guidance Chatbot for Undergraduates")
                .style(Style::default().add_modifier(Modifier::BOLD)),
            title,
        );

        let editing = self.status == LoopState::Idle;
        self.major
            .render(frame, major, editing && self.focus == Focus::Major);
        self.question
            .render(frame, question, editing && self.focus == Focus::Question);
        self.transcript
            .render(frame, transcript, self.chat.transcript());

        frame.render_widget(Paragraph::new(self.status_line()), status);
    }

    fn status_line(&self) -> Line<'_> {
        let (state, color) = match self.status {
            LoopState::Idle => ("Idle", Color::Green),
            LoopState::Processing => ("Processing…", Color::Yellow),
        };

        let mut spans = vec![
            Span::styled(
                format!(" {state} "),
                Style::default().fg(Color::Black).bg(color),
            ),
            Span::raw(format!(
                " session {} · {} ",
                self.chat.session(),
                self.chat.model_name()
            )),
        ];

        match &self.notice {
            Some(notice) => spans.push(Span::styled(
                notice.as_str(),
                Style::default().fg(Color::Yellow),
            )),
            None => spans.push(Span::styled(
                "Tab switch field · Enter send · PgUp/PgDn scroll · Esc quit",
                Style::default().fg(Color::DarkGray),
            )),
        }

        Line::from(spans)
    }
}
