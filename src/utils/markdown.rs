use pulldown_cmark::{html, Event, Options, Parser};

/// Renders model output to HTML. Supports fenced code blocks and tables, and
/// turns every newline inside a paragraph into a `<br />`.
pub fn render_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
