//! The host's content pass: finds `[tag ...]` directives in text and
//! replaces them with whatever their registered handler renders.
//!
//! Three forms are recognised:
//!
//! ```text
//! [chat icon="7"]enclosed[/chat]
//! [chat icon="7"]
//! [chat icon="7" /]
//! ```
//!
//! Doubling the brackets (`[[chat]]`) prints the directive literally.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([A-Za-z0-9_-]+)\s*=\s*"([^"]*)"(?:\s|$)|([A-Za-z0-9_-]+)\s*=\s*'([^']*)'(?:\s|$)|([A-Za-z0-9_-]+)\s*=\s*([^\s'"]+)(?:\s|$)|"([^"]*)"(?:\s|$)|'([^']*)'(?:\s|$)|(\S+)(?:\s|$)"#,
    )
    .unwrap()
});

static INVISIBLE_SPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{00a0}\x{200b}]+").unwrap());

/// Attributes written inside a directive's opening bracket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    named: BTreeMap<String, String>,
    positional: Vec<String>,
}

impl Attributes {
    /// Parse `name="value"`, `name='value'`, `name=value` pairs and bare
    /// positional values. Names are lower-cased; a repeated name keeps the
    /// last value.
    pub fn parse(text: &str) -> Self {
        let text = INVISIBLE_SPACE_REGEX.replace_all(text, " ");
        let mut attributes = Attributes::default();

        for captures in ATTRIBUTE_REGEX.captures_iter(&text) {
            let group = |i: usize| captures.get(i).map(|m| m.as_str());

            let pair = [(1, 2), (3, 4), (5, 6)]
                .into_iter()
                .find_map(|(name, value)| Some((group(name)?, group(value)?)));
            if let Some((name, value)) = pair {
                attributes.insert(name, value);
                continue;
            }

            if let Some(value) = group(7).or(group(8)).or(group(9)) {
                attributes
                    .positional
                    .push(value.to_owned());
            }
        }

        attributes
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.named
            .insert(name.to_lowercase(), value.to_owned());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }
}

/// Renders free text, expanding every directive it knows about.
pub trait ContentRenderer {
    fn render_content(&self, content: &str) -> String;
}

type Handler<'a> =
    Box<dyn Fn(&Attributes, Option<&str>, &dyn ContentRenderer) -> String + 'a>;

/// Registry of directive handlers keyed by tag.
#[derive(Default)]
pub struct Shortcodes<'a> {
    handlers: BTreeMap<String, Handler<'a>>,
}

/// Where a directive sits in the scanned text and what it carries.
#[derive(Debug, PartialEq, Eq)]
struct Occurrence<'t> {
    start: usize,
    end: usize,
    tag: &'t str,
    attributes: &'t str,
    content: Option<&'t str>,
    /// `[[tag]]`: emit the inner text as is.
    escaped: bool,
    leading_bracket: bool,
    trailing_bracket: bool,
}

impl<'a> Shortcodes<'a> {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register a handler for `tag`, replacing any previous one.
    ///
    /// The handler gets the parsed attributes, the enclosed content (if the
    /// directive has a closing tag) and this registry, to render that
    /// content with.
    pub fn add<F>(&mut self, tag: &str, handler: F)
    where
        F: Fn(&Attributes, Option<&str>, &dyn ContentRenderer) -> String + 'a,
    {
        log::debug!("shortcodes: registering [{}]", tag);
        self.handlers
            .insert(tag.to_owned(), Box::new(handler));
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.handlers.remove(tag).is_some()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Whether `text` contains a registered `tag` directive.
    pub fn has_shortcode(&self, text: &str, tag: &str) -> bool {
        if !self.contains(tag) {
            return false;
        }
        let mut cursor = 0;
        while let Some(offset) = text[cursor..].find('[') {
            let start = cursor + offset;
            if let Some(occurrence) = self.occurrence_at(text, start) {
                if occurrence.tag == tag && !occurrence.escaped {
                    return true;
                }
            }
            cursor = start + 1;
        }
        false
    }

    fn is_tag_char(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
    }

    /// Try to read a directive opening at byte `start`, which holds `[`.
    fn occurrence_at<'t>(
        &self,
        text: &'t str,
        start: usize,
    ) -> Option<Occurrence<'t>> {
        let bytes = text.as_bytes();
        let leading_bracket = bytes.get(start + 1) == Some(&b'[');
        let tag_start = start + 1 + usize::from(leading_bracket);

        let tag_len = bytes[tag_start..]
            .iter()
            .take_while(|b| Self::is_tag_char(**b))
            .count();
        if tag_len == 0 {
            return None;
        }
        let tag_end = tag_start + tag_len;
        let tag = &text[tag_start..tag_end];
        if !self.handlers.contains_key(tag) {
            return None;
        }

        let close_offset = text[tag_end..].find(']')?;
        let bracket = tag_end + close_offset;
        let self_closing = bracket > tag_end && bytes[bracket - 1] == b'/';
        let attributes_end = if self_closing { bracket - 1 } else { bracket };
        let attributes = &text[tag_end..attributes_end];
        let opening_end = bracket + 1;

        let (content, mut end) = if self_closing {
            (None, opening_end)
        } else {
            let closing = format!("[/{}]", tag);
            match text[opening_end..].find(&closing) {
                Some(offset) => {
                    let content_end = opening_end + offset;
                    (
                        Some(&text[opening_end..content_end]),
                        content_end + closing.len(),
                    )
                }
                None => (None, opening_end),
            }
        };

        let trailing_bracket = bytes.get(end) == Some(&b']');
        if trailing_bracket {
            end += 1;
        }

        Some(Occurrence {
            start,
            end,
            tag,
            attributes,
            content,
            escaped: leading_bracket && trailing_bracket,
            leading_bracket,
            trailing_bracket,
        })
    }

    fn expand(&self, text: &str, occurrence: &Occurrence<'_>) -> String {
        if occurrence.escaped {
            return text[occurrence.start + 1..occurrence.end - 1].to_owned();
        }

        let handler = match self.handlers.get(occurrence.tag) {
            Some(handler) => handler,
            None => return text[occurrence.start..occurrence.end].to_owned(),
        };
        let attributes = Attributes::parse(occurrence.attributes);
        let rendered = handler(&attributes, occurrence.content, self);

        let mut expanded = String::with_capacity(rendered.len() + 2);
        if occurrence.leading_bracket {
            expanded.push('[');
        }
        expanded.push_str(&rendered);
        if occurrence.trailing_bracket {
            expanded.push(']');
        }
        expanded
    }
}

impl ContentRenderer for Shortcodes<'_> {
    /// Handlers only ever see a strict substring of `content` as their
    /// enclosed text, so nested directives always bottom out.
    fn render_content(&self, content: &str) -> String {
        if self.handlers.is_empty() || !content.contains('[') {
            return content.to_owned();
        }

        let mut rendered = String::with_capacity(content.len());
        let mut cursor = 0;
        while let Some(offset) = content[cursor..].find('[') {
            let start = cursor + offset;
            match self.occurrence_at(content, start) {
                Some(occurrence) => {
                    rendered.push_str(&content[cursor..start]);
                    rendered.push_str(&self.expand(content, &occurrence));
                    cursor = occurrence.end;
                }
                None => {
                    rendered.push_str(&content[cursor..=start]);
                    cursor = start + 1;
                }
            }
        }
        rendered.push_str(&content[cursor..]);
        rendered
    }
}

/// Leaves text untouched; for callers that have no content pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainText;

impl ContentRenderer for PlainText {
    fn render_content(&self, content: &str) -> String {
        content.to_owned()
    }
}
