//! Terminal rendering of request and response dumps.

use crate::highlight::highlight;
use crate::http::HttpResponse;
use crate::request::HttpRequest;

use colored::{Color, ColoredString, Colorize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!("unknown color choice: {other}")),
        }
    }
}

/// What a piece of text is, for the purpose of choosing its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Method,
    Target,
    StatusVersion,
    StatusCode,
    Reason,
    HeaderKey,
    HeaderValue,
    JsonString,
    JsonNumber,
    JsonLiteral,
}

/// Turns text plus a [`Paint`] into styled text, or leaves it alone when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// `Always` forces `colored` on for the whole process, since it otherwise
    /// strips escape codes when stdout is not a terminal.
    pub fn new(choice: ColorChoice) -> Self {
        let enabled = match choice {
            ColorChoice::Auto => atty::is(atty::Stream::Stdout),
            ColorChoice::Always => {
                colored::control::set_override(true);
                true
            }
            ColorChoice::Never => false,
        };
        Palette { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, text: &str, paint: Paint) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }

        let styled: ColoredString = match paint {
            Paint::Method | Paint::StatusVersion => text.color(Color::Cyan).bold(),
            Paint::Target | Paint::StatusCode => text.color(Color::Yellow).bold(),
            Paint::Reason => text.color(Color::Green).bold(),
            Paint::HeaderKey => text.color(Color::Green),
            Paint::HeaderValue => text.color(Color::White),
            Paint::JsonString => text.color(Color::Cyan),
            Paint::JsonNumber => text.color(Color::Yellow),
            Paint::JsonLiteral => text.color(Color::Magenta),
        };
        styled.to_string()
    }
}

/// Which kind of first line a dump starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartLine {
    Request,
    Status,
}

impl StartLine {
    fn paints(self) -> [Option<Paint>; 3] {
        match self {
            StartLine::Request => [Some(Paint::Method), Some(Paint::Target), None],
            StartLine::Status => [
                Some(Paint::StatusVersion),
                Some(Paint::StatusCode),
                Some(Paint::Reason),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    palette: Palette,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Renderer { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn render_request(&self, request: &HttpRequest) -> String {
        let mut out = self.format_headers(&request.dump(), StartLine::Request);
        out.push_str(&self.format_body(&request.body_text()));
        out
    }

    pub fn render_response(&self, response: &HttpResponse) -> String {
        let mut out = self.format_headers(&response.dump(), StartLine::Status);
        out.push_str(&self.format_body(response.body()));
        out
    }

    /// Colors a raw header dump line by line.
    ///
    /// The first line is split on its first two spaces. Later lines are
    /// `key:value` pairs. Output stops at the first blank line; whatever
    /// follows it in the dump is dropped.
    pub fn format_headers(&self, dump: &str, start: StartLine) -> String {
        let mut out = String::new();

        for (i, line) in dump.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if i == 0 {
                let parts: Vec<&str> = line.splitn(3, ' ').collect();
                if parts.len() == 3 {
                    let rendered: Vec<String> = parts
                        .iter()
                        .zip(start.paints())
                        .map(|(part, paint)| match paint {
                            Some(p) => self.palette.paint(part, p),
                            None => part.to_string(),
                        })
                        .collect();
                    out.push_str(&rendered.join(" "));
                } else {
                    out.push_str(line);
                }
            } else if line.is_empty() {
                break;
            } else if let Some((key, value)) = line.split_once(':') {
                out.push_str(&self.palette.paint(&format!("{key}:"), Paint::HeaderKey));
                out.push_str(&self.palette.paint(value, Paint::HeaderValue));
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }

        out
    }

    /// Pretty-prints and highlights a JSON body, or passes other text through.
    pub fn format_body(&self, body: &str) -> String {
        if body.is_empty() {
            return String::new();
        }

        match pretty_print_json(body) {
            Some(pretty) => format!("{}\n", highlight(&pretty, &self.palette)),
            None => {
                tracing::debug!("body is not JSON, printing as text");
                format!("{body}\n")
            }
        }
    }
}

fn pretty_print_json(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    match serde_json::to_string_pretty(&value) {
        Ok(pretty) => Some(pretty),
        Err(e) => {
            tracing::warn!("failed to pretty-print JSON body: {e}");
            None
        }
    }
}
