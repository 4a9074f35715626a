use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::error::format_error_lines;
use crate::form::ClassLevel;
use crate::session::{FeedbackProvider, GenerateOutcome, Session};

use super::{TextField, Theme, render_markdown};

pub const TITLE: &str = "EduClimb: Your Personal Writing Coach";
pub const GENERATE_LABEL: &str = "See How I Did!";
pub const RESTART_LABEL: &str = "Let's Write Again";
pub const LOADING_TEXT: &str = "Processing your writing...";
const FEEDBACK_TITLE: &str = "Here's What We Think";
const PAGE_LINES: u16 = 10;
const FAILURE_CONTEXT: &str = "Something went wrong while checking your writing.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    ClassLevel,
    Topic,
    Essay,
    Feedback,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Clear,
    Loading,
    Invalid(String),
    Failed(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Generate,
    Restart,
    Quit,
    Edit,
    None,
}

/// Everything the form screen shows, recomputed from this state on every frame.
pub struct FormView {
    session: Session,
    topic: TextField,
    essay: TextField,
    focus: Focus,
    status: Status,
    feedback_scroll: u16,
}

impl FormView {
    pub fn new(session: Session) -> Self {
        let mut topic = TextField::single_line();
        topic.set_text(&session.form().topic);
        let mut essay = TextField::multi_line();
        essay.set_text(&session.form().essay);
        Self {
            session,
            topic,
            essay,
            focus: Focus::Topic,
            status: Status::Clear,
            feedback_scroll: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn set_loading(&mut self) {
        self.status = Status::Loading;
    }

    /// True when pressing generate right now would call the model.
    pub fn will_request(&self) -> bool {
        !self.session.feedback_provided() && self.session.form().validate().is_ok()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('g') if ctrl => return Action::Generate,
            KeyCode::Char('r') if ctrl => {
                // the restart control only exists while feedback is shown
                return if self.session.feedback_provided() {
                    Action::Restart
                } else {
                    Action::None
                };
            }
            KeyCode::Tab => {
                self.focus = self.next_focus();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = self.prev_focus();
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::ClassLevel => self.handle_class_key(key),
            Focus::Topic | Focus::Essay => self.handle_edit_key(key),
            Focus::Feedback => self.handle_scroll_key(key),
        }
    }

    pub async fn generate<P>(&mut self, provider: &P)
    where
        P: FeedbackProvider + ?Sized,
    {
        self.sync_form();
        match self.session.generate(provider).await {
            Ok(GenerateOutcome::Provided) => {
                self.status = Status::Clear;
                self.feedback_scroll = 0;
            }
            Ok(GenerateOutcome::AlreadyProvided) => {}
            Ok(GenerateOutcome::Rejected(missing)) => {
                self.status = Status::Invalid(missing.to_string());
            }
            Err(err) => {
                log::error!("feedback request failed: {err:#}");
                self.status = Status::Failed(format_error_lines(FAILURE_CONTEXT, &err));
            }
        }
    }

    pub fn restart(&mut self) {
        if !self.session.restart() {
            return;
        }
        self.topic.clear();
        self.essay.clear();
        self.status = Status::Clear;
        self.feedback_scroll = 0;
        self.focus = Focus::Topic;
    }

    fn sync_form(&mut self) {
        let form = self.session.form_mut();
        form.topic = self.topic.text();
        form.essay = self.essay.text();
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::ClassLevel, Focus::Topic, Focus::Essay];
        if self.session.feedback_provided() {
            order.push(Focus::Feedback);
        }
        order
    }

    fn next_focus(&self) -> Focus {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        order[(idx + 1) % order.len()]
    }

    fn prev_focus(&self) -> Focus {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        order[(idx + order.len() - 1) % order.len()]
    }

    fn handle_class_key(&mut self, key: KeyEvent) -> Action {
        let form = self.session.form_mut();
        let current = form.class_level.unwrap_or_default();
        match key.code {
            KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => {
                form.class_level = Some(current.next());
                Action::Edit
            }
            KeyCode::Left | KeyCode::Up => {
                form.class_level = Some(current.prev());
                Action::Edit
            }
            KeyCode::Char(c) if c.is_ascii_digit() => match c.to_string().parse::<ClassLevel>() {
                Ok(level) => {
                    form.class_level = Some(level);
                    Action::Edit
                }
                Err(_) => Action::None,
            },
            KeyCode::Enter => {
                self.focus = Focus::Topic;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Action {
        let field = match self.focus {
            Focus::Essay => &mut self.essay,
            _ => &mut self.topic,
        };
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                field.insert_char(c)
            }
            KeyCode::Enter => {
                if !field.insert_newline() {
                    self.focus = Focus::Essay;
                    return Action::None;
                }
            }
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Up => field.move_up(),
            KeyCode::Down => field.move_down(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            KeyCode::PageUp => (0..PAGE_LINES).for_each(|_| field.move_up()),
            KeyCode::PageDown => (0..PAGE_LINES).for_each(|_| field.move_down()),
            _ => return Action::None,
        }
        self.sync_form();
        Action::Edit
    }

    fn handle_scroll_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => self.feedback_scroll = self.feedback_scroll.saturating_sub(1),
            KeyCode::Down => self.feedback_scroll = self.feedback_scroll.saturating_add(1),
            KeyCode::PageUp => self.feedback_scroll = self.feedback_scroll.saturating_sub(PAGE_LINES),
            KeyCode::PageDown => self.feedback_scroll = self.feedback_scroll.saturating_add(PAGE_LINES),
            KeyCode::Home => self.feedback_scroll = 0,
            _ => return Action::None,
        }
        Action::None
    }
}

pub fn draw(frame: &mut Frame, view: &mut FormView) {
    let area = frame.area();
    frame.render_widget(Theme::backdrop(), area);

    let status = status_lines(&view.status);
    let feedback_shown = view.session.feedback_provided();
    let mut constraints = vec![
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(status.len() as u16),
    ];
    if feedback_shown {
        constraints.push(Constraint::Percentage(45));
    }
    constraints.push(Constraint::Length(4));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(TITLE, Theme::label()))),
        chunks[0],
    );

    let level = view
        .session
        .form()
        .class_level
        .map(|level| level.label())
        .unwrap_or("Choose a grade");
    let selector = Paragraph::new(Line::from(vec![
        Theme::span("‹ "),
        Span::styled(level, Theme::emphasis()),
        Theme::span(" ›"),
    ]))
    .block(Theme::field_panel(
        "What Grade Are You In?",
        view.focus == Focus::ClassLevel,
    ));
    frame.render_widget(selector, chunks[1]);

    draw_field(
        frame,
        chunks[2],
        &mut view.topic,
        "What Would You Like to Write About?",
        view.focus == Focus::Topic,
    );
    draw_field(
        frame,
        chunks[3],
        &mut view.essay,
        "Start Writing Your Essay",
        view.focus == Focus::Essay,
    );

    frame.render_widget(Paragraph::new(status), chunks[4]);

    let mut next = 5;
    if let Some(feedback) = view.session.feedback() {
        let body = Paragraph::new(render_markdown(&feedback.text))
            .block(Theme::field_panel(
                FEEDBACK_TITLE,
                view.focus == Focus::Feedback,
            ))
            .wrap(Wrap { trim: false })
            .scroll((view.feedback_scroll, 0));
        frame.render_widget(body, chunks[next]);
        next += 1;
    }

    let controls = Paragraph::new(controls_text(feedback_shown))
        .block(Theme::panel_with_line(Theme::section_header("Controls")))
        .wrap(Wrap { trim: true });
    frame.render_widget(controls, chunks[next]);
}

fn draw_field(frame: &mut Frame, area: Rect, field: &mut TextField, title: &str, focused: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let viewport = field.viewport(inner_width, inner_height);

    let rows: Vec<Line> = viewport.rows.into_iter().map(Line::from).collect();
    let widget = Paragraph::new(rows).block(Theme::field_panel(title, focused));
    frame.render_widget(widget, area);

    if focused {
        let (row, col) = viewport.cursor;
        let x = area.x + 1 + (col as u16).min(area.width.saturating_sub(2));
        let y = area.y + 1 + (row as u16).min(area.height.saturating_sub(2));
        frame.set_cursor_position((x, y));
    }
}

pub fn status_lines(status: &Status) -> Vec<Line<'static>> {
    match status {
        Status::Clear => Vec::new(),
        Status::Loading => vec![Line::from(Span::styled(LOADING_TEXT, Theme::label()))],
        Status::Invalid(message) => vec![Line::from(Span::styled(message.clone(), Theme::error()))],
        Status::Failed(lines) => lines
            .iter()
            .map(|line| Line::styled(line.clone(), Theme::error()))
            .collect(),
    }
}

/// Footer rows. The restart control leads so narrow terminals never hide it.
pub fn controls_text(feedback_provided: bool) -> Vec<Line<'static>> {
    let mut actions = Vec::new();
    if feedback_provided {
        actions.extend([
            Theme::key_chip("Ctrl+R"),
            Span::styled(format!(" {RESTART_LABEL}"), Theme::success()),
            Theme::bullet(),
        ]);
    }
    actions.extend([
        Theme::key_chip("Ctrl+G"),
        Theme::span(format!(" {GENERATE_LABEL}")),
    ]);
    let navigation = vec![
        Theme::key_chip("Tab"),
        Theme::span(" next field"),
        Theme::bullet(),
        Theme::key_chip("Esc"),
        Theme::span(" / "),
        Theme::key_chip("Ctrl+C"),
        Theme::span(" exit"),
    ];
    vec![Line::from(actions), Line::from(navigation)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormInput;
    use crate::session::tests::RecordingProvider;
    use crossterm::event::KeyEvent;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(view: &mut FormView, text: &str) {
        for ch in text.chars() {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            view.handle_key(key(code));
        }
    }

    fn flatten_line(line: &Line<'_>) -> String {
        line.spans
            .iter()
            .map(|span| span.content.to_string())
            .collect::<String>()
    }

    fn render_rows(view: &mut FormView, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, view)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn restart_control_only_listed_with_feedback() {
        let idle = flatten_line(&controls_text(false)[0]);
        assert!(idle.contains(GENERATE_LABEL));
        assert!(!idle.contains(RESTART_LABEL));

        let shown = flatten_line(&controls_text(true)[0]);
        assert!(shown.starts_with(" Ctrl+R "));
        assert!(shown.contains(RESTART_LABEL));
        assert!(shown.contains(GENERATE_LABEL));
    }

    #[test]
    fn long_essay_lines_wrap_inside_the_field() {
        let essay = "My dog is big and brown and he likes to run in the park \
                     with me every day after school ENDMARK";
        let form = FormInput::new(ClassLevel::Class2, "My Dog", essay);
        let mut view = FormView::new(Session::new(form));
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.focus(), Focus::Essay);

        let rows = render_rows(&mut view, 60, 24);
        assert!(
            rows.iter().any(|row| row.contains("ENDMARK")),
            "end of essay line not visible:\n{}",
            rows.join("\n")
        );
    }

    #[tokio::test]
    async fn footer_keeps_restart_and_exit_on_narrow_screens() {
        let provider = RecordingProvider::replying("Nice work!");
        let form = FormInput::new(ClassLevel::Class4, "Rain", "It rain a lot.");
        let mut view = FormView::new(Session::new(form));
        view.generate(&provider).await;

        let rows = render_rows(&mut view, 60, 40);
        let screen = rows.join("\n");
        assert!(screen.contains(RESTART_LABEL), "{screen}");
        assert!(screen.contains("Ctrl+C"), "{screen}");
        assert!(screen.contains("Nice work!"), "{screen}");
    }

    #[test]
    fn long_topic_slides_to_show_the_end() {
        let mut view = FormView::new(Session::default());
        type_text(
            &mut view,
            "The most exciting afternoon I ever spent at the seaside TOPICEND",
        );

        let rows = render_rows(&mut view, 40, 24);
        assert!(rows.iter().any(|row| row.contains("TOPICEND")));
    }

    #[test]
    fn typing_flows_into_the_session_form() {
        let mut view = FormView::new(Session::default());
        type_text(&mut view, "My Pet\nI has a dog.\nHe is run fast.");

        assert_eq!(view.focus(), Focus::Essay);
        assert_eq!(view.session().form().topic, "My Pet");
        assert_eq!(view.session().form().essay, "I has a dog.\nHe is run fast.");
    }

    #[test]
    fn class_selector_cycles_with_arrows() {
        let mut view = FormView::new(Session::default());
        view.handle_key(key(KeyCode::BackTab));
        assert_eq!(view.focus(), Focus::ClassLevel);

        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.session().form().class_level, Some(ClassLevel::Class3));
        view.handle_key(key(KeyCode::Left));
        assert_eq!(view.session().form().class_level, Some(ClassLevel::Class2));
        view.handle_key(key(KeyCode::Char('5')));
        assert_eq!(view.session().form().class_level, Some(ClassLevel::Class5));
    }

    #[test]
    fn shortcuts_map_to_actions() {
        let mut view = FormView::new(Session::default());
        assert_eq!(view.handle_key(ctrl('g')), Action::Generate);
        assert_eq!(view.handle_key(ctrl('r')), Action::None);
        assert_eq!(view.handle_key(ctrl('c')), Action::Quit);
        assert_eq!(view.handle_key(key(KeyCode::Esc)), Action::Quit);
    }

    #[tokio::test]
    async fn empty_essay_shows_validation_message() {
        let provider = RecordingProvider::replying("unused");
        let mut view = FormView::new(Session::default());
        type_text(&mut view, "My Pet");
        assert!(!view.will_request());

        view.generate(&provider).await;
        assert_eq!(
            view.status(),
            &Status::Invalid(
                "Please provide your class level, essay topic, and write your essay.".into()
            )
        );
        assert_eq!(provider.calls(), 0);
        assert!(!view.session().feedback_provided());
    }

    #[tokio::test]
    async fn generate_then_restart_round_trip() {
        let provider = RecordingProvider::replying("Great start! ...");
        let form = FormInput::new(ClassLevel::Class3, "My Pet", "I has a dog. He is run fast.");
        let mut view = FormView::new(Session::new(form));
        assert!(view.will_request());

        view.set_loading();
        view.generate(&provider).await;
        assert_eq!(view.status(), &Status::Clear);
        assert_eq!(view.session().feedback().unwrap().text, "Great start! ...");
        assert!(!view.will_request());

        view.generate(&provider).await;
        assert_eq!(provider.calls(), 1);

        assert_eq!(view.handle_key(ctrl('r')), Action::Restart);
        view.restart();
        assert!(!view.session().feedback_provided());
        assert_eq!(view.session().form().topic, "");
        assert_eq!(view.session().form().essay, "");
        assert_eq!(view.session().form().class_level, Some(ClassLevel::Class3));
        assert_eq!(view.focus(), Focus::Topic);
    }

    #[tokio::test]
    async fn provider_failure_is_reported_inline() {
        let provider = RecordingProvider::failing("network unreachable");
        let form = FormInput::new(ClassLevel::Class1, "Rain", "It rain a lot.");
        let mut view = FormView::new(Session::new(form));

        view.generate(&provider).await;
        let Status::Failed(lines) = view.status() else {
            panic!("expected failure status");
        };
        assert_eq!(lines[0], FAILURE_CONTEXT);
        assert!(lines.iter().any(|line| line == "network unreachable"));
        assert!(!view.session().feedback_provided());
        assert!(view.will_request());
    }

    #[test]
    fn feedback_focus_only_reachable_while_shown() {
        let mut view = FormView::new(Session::default());
        for _ in 0..4 {
            view.handle_key(key(KeyCode::Tab));
            assert_ne!(view.focus(), Focus::Feedback);
        }
    }

    #[test]
    fn status_lines_render_each_state() {
        assert!(status_lines(&Status::Clear).is_empty());
        let loading = status_lines(&Status::Loading);
        assert_eq!(flatten_line(&loading[0]), LOADING_TEXT);
        assert_eq!(loading[0].spans[0].style, Theme::label());
        let failed = status_lines(&Status::Failed(vec!["a".into(), "b".into()]));
        assert_eq!(failed.len(), 2);
    }
}
