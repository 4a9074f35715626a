use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::Theme;

/// Renders model feedback, which usually arrives as Markdown, into styled lines.
/// Markup only changes styling; the words on screen are the model's words.
pub fn render_markdown(md: &str) -> Text<'static> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut renderer = Renderer::default();
    for event in Parser::new_ext(md, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    pending_marker: Option<String>,
    in_code_block: bool,
}

impl Renderer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text, self.style()),
            Event::Code(code) => {
                let style = self.style().add_modifier(Modifier::REVERSED);
                self.push_span(Span::styled(code.into_string(), style));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html, self.style()),
            Event::SoftBreak if self.in_code_block => self.flush(),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(20), Theme::dim())));
                self.blank();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push_span(Span::styled(marker, self.style()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.styles.push(heading_style(level));
            }
            Tag::Strong => self.push_style(Modifier::BOLD),
            Tag::Emphasis => self.push_style(Modifier::ITALIC),
            Tag::Strikethrough => self.push_style(Modifier::CROSSED_OUT),
            Tag::Link { .. } => self.push_style(Modifier::UNDERLINED),
            Tag::BlockQuote(_) => self.push_style(Modifier::DIM),
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
                self.styles.push(Theme::dim());
            }
            Tag::List(start) => self.lists.push(start),
            Tag::Item => {
                self.flush();
                self.pending_marker = Some(self.next_marker());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.blank();
                self.styles.pop();
            }
            TagEnd::CodeBlock => {
                self.flush();
                self.blank();
                self.in_code_block = false;
                self.styles.pop();
            }
            TagEnd::Strong
            | TagEnd::Emphasis
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::BlockQuote(_) => {
                self.styles.pop();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => {
                self.flush();
                self.pending_marker = None;
            }
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, modifier: Modifier) {
        self.styles.push(self.style().add_modifier(modifier));
    }

    fn next_marker(&mut self) -> String {
        let indent = "  ".repeat(self.lists.len().saturating_sub(1));
        match self.lists.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{indent}{n}. ");
                *n += 1;
                marker
            }
            _ => format!("{indent}- "),
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if !self.in_code_block {
            self.push_span(Span::styled(text.to_string(), style));
            return;
        }
        let mut segments = text.split('\n').peekable();
        let mut first = true;
        while let Some(segment) = segments.next() {
            if !first {
                self.flush();
            }
            first = false;
            if segment.is_empty() {
                if segments.peek().is_some() {
                    self.blank();
                }
                continue;
            }
            self.push_span(Span::styled(segment.to_string(), style));
        }
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.current.is_empty()
            && let Some(marker) = self.pending_marker.take()
        {
            self.current.push(Span::raw(marker));
        }
        self.current.push(span);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Theme::label();
    if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
        style.add_modifier(Modifier::UNDERLINED)
    } else {
        style
    }
}
