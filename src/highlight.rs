//! Character-level JSON coloring.
//!
//! The input is walked once, left to right, with two flags of state. No parse
//! tree is built, so the text only needs to look like JSON: anything goes
//! through, it just may come out with odd colors.

use crate::render::{Paint, Palette};

const LITERAL_LETTERS: &str = "truefalsenull";

/// Display class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    Plain,
    String,
    Number,
    Literal,
}

impl JsonStyle {
    fn paint(self) -> Option<Paint> {
        match self {
            JsonStyle::Plain => None,
            JsonStyle::String => Some(Paint::JsonString),
            JsonStyle::Number => Some(Paint::JsonNumber),
            JsonStyle::Literal => Some(Paint::JsonLiteral),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct JsonHighlighter {
    in_quotes: bool,
    escaped: bool,
}

impl JsonHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `ch` and advances the state.
    ///
    /// Literal detection is per character: any of the letters of `true`,
    /// `false` or `null` outside quotes is colored as a literal, even inside
    /// an unrelated bare word. Colons and brackets stay plain inside quotes.
    pub fn style(&mut self, ch: char) -> JsonStyle {
        if self.escaped {
            self.escaped = false;
            return JsonStyle::String;
        }

        match ch {
            '\\' => {
                self.escaped = true;
                JsonStyle::String
            }
            '"' => {
                self.in_quotes = !self.in_quotes;
                JsonStyle::String
            }
            ':' | '{' | '}' | '[' | ']' => JsonStyle::Plain,
            _ if self.in_quotes => JsonStyle::String,
            '0'..='9' | '.' | '-' => JsonStyle::Number,
            _ if LITERAL_LETTERS.contains(ch) => JsonStyle::Literal,
            _ => JsonStyle::Plain,
        }
    }

    pub fn in_quotes(&self) -> bool {
        self.in_quotes
    }
}

/// Styles of every character of `json`, in order.
pub fn classify(json: &str) -> Vec<(char, JsonStyle)> {
    let mut highlighter = JsonHighlighter::new();
    json.chars().map(|ch| (ch, highlighter.style(ch))).collect()
}

/// Colors `json` with `palette`, grouping consecutive characters of the same style.
pub fn highlight(json: &str, palette: &Palette) -> String {
    let mut highlighter = JsonHighlighter::new();
    let mut out = String::with_capacity(json.len());
    let mut run = String::new();
    let mut run_style = JsonStyle::Plain;

    for ch in json.chars() {
        let style = highlighter.style(ch);
        if style != run_style && !run.is_empty() {
            out.push_str(&paint_run(&run, run_style, palette));
            run.clear();
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        out.push_str(&paint_run(&run, run_style, palette));
    }

    out
}

fn paint_run(run: &str, style: JsonStyle, palette: &Palette) -> String {
    match style.paint() {
        Some(paint) => palette.paint(run, paint),
        None => run.to_string(),
    }
}
