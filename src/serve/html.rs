use crate::serve::css::CssProcessor;
use crate::serve::rewrite::RewriteEngine;
use std::sync::Arc;
use url::Url;

/// Tags with rewrite rules. Anything else is `Other`, which still gets its
/// `style` attribute processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Img,
    A,
    Link,
    Script,
    Input,
    Other,
}

impl Tag {
    fn from_name(name: &str) -> Self {
        match name {
            "img" => Tag::Img,
            "a" => Tag::A,
            "link" => Tag::Link,
            "script" => Tag::Script,
            "input" => Tag::Input,
            _ => Tag::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside any markup; characters stream straight through.
    Text,
    /// `<` seen, classifying what follows.
    TagOpen,
    /// `<!` seen.
    MarkupDecl,
    /// `<!-` seen.
    CommentStart,
    /// `<!--` seen; a `[` here means a conditional-comment marker.
    CommentOpen,
    /// Inside a comment, scanning for `-->`.
    Comment,
    /// Inside `<!--[if …]>`, passed through at the closing `>`.
    CondMarker,
    /// `<![` seen; becomes CDATA on matching the full `<![CDATA[` prefix,
    /// otherwise (e.g. `<![endif]-->`) runs to the next `>`.
    BracketDecl,
    /// Inside `<![CDATA[ … ]]>`.
    CData,
    /// `<!DOCTYPE …>` and other declarations, to the next `>`.
    Decl,
    /// `<? … >` processing instructions.
    Pi,
    /// `</… >` end tags; nothing to rewrite in them.
    EndTag,
    TagName,
    /// Inside a tag, before an attribute name.
    BeforeAttrName,
    AttrName,
    /// After an attribute name, whitespace seen; `=` may still follow.
    AfterAttrName,
    /// `=` seen, waiting for the value.
    BeforeAttrValue,
    /// Inside an attribute value (quoted if `quote` is set).
    AttrValue,
}

#[derive(Debug)]
struct Attr {
    /// Lower-cased name; the raw spelling stays in the tag buffer.
    name: String,
    value: String,
    /// Byte span of the value inside the tag buffer (excluding quotes).
    start: usize,
    end: usize,
}

/// Streaming rewriter for HTML: a single-pass character state machine that
/// buffers one tag at a time, rewrites the attribute values the rule table
/// names, and emits everything else byte-identical.
///
/// One instance per document; chunk boundaries may fall anywhere, including
/// mid-tag or mid-attribute, since all parse state lives in the instance.
/// Comments, doctypes, CDATA sections, processing instructions and
/// conditional-comment markers are recognized only to pass them through
/// untouched.
#[derive(Debug)]
pub struct HtmlProcessor {
    engine: Arc<RewriteEngine>,
    base: Url,
    context_path: String,

    state: State,
    buf: String,
    tag_name: String,
    attrs: Vec<Attr>,
    attr_name: String,
    value_start: usize,
    quote: Option<char>,
    /// Consecutive `-` run while scanning for a comment's `-->`.
    dashes: u8,
    /// Consecutive `]` run while scanning for CDATA's `]]>`.
    brackets: u8,
}

impl HtmlProcessor {
    pub fn new(engine: Arc<RewriteEngine>, base: Url, context_path: &str) -> Self {
        Self {
            engine,
            base,
            context_path: context_path.to_string(),
            state: State::Text,
            buf: String::new(),
            tag_name: String::new(),
            attrs: Vec::new(),
            attr_name: String::new(),
            value_start: 0,
            quote: None,
            dashes: 0,
            brackets: 0,
        }
    }

    pub fn feed(&mut self, input: &str, out: &mut String) {
        for c in input.chars() {
            self.step(c, out);
        }
    }

    /// Flushes an unterminated construct verbatim at end-of-input.
    pub fn finish(&mut self, out: &mut String) {
        out.push_str(&self.buf);
        self.reset();
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.tag_name.clear();
        self.attrs.clear();
        self.attr_name.clear();
        self.quote = None;
        self.dashes = 0;
        self.brackets = 0;
        self.state = State::Text;
    }

    fn step(&mut self, c: char, out: &mut String) {
        match self.state {
            State::Text => {
                if c == '<' {
                    self.buf.push(c);
                    self.state = State::TagOpen;
                } else {
                    out.push(c);
                }
            }

            State::TagOpen => match c {
                '!' => {
                    self.buf.push(c);
                    self.state = State::MarkupDecl;
                }
                '/' => {
                    self.buf.push(c);
                    self.state = State::EndTag;
                }
                '?' => {
                    self.buf.push(c);
                    self.state = State::Pi;
                }
                c if c.is_ascii_alphabetic() => {
                    self.buf.push(c);
                    self.tag_name.push(c.to_ascii_lowercase());
                    self.state = State::TagName;
                }
                // A stray `<`: not markup, emit and re-examine.
                _ => {
                    out.push_str(&self.buf);
                    self.reset();
                    self.step(c, out);
                }
            },

            State::MarkupDecl => match c {
                '-' => {
                    self.buf.push(c);
                    self.state = State::CommentStart;
                }
                '[' => {
                    self.buf.push(c);
                    self.state = State::BracketDecl;
                }
                '>' => {
                    self.buf.push(c);
                    self.flush_verbatim(out);
                }
                _ => {
                    self.buf.push(c);
                    self.state = State::Decl;
                }
            },

            State::CommentStart => {
                self.buf.push(c);
                if c == '-' {
                    self.state = State::CommentOpen;
                } else {
                    self.state = State::Decl;
                }
            }

            State::CommentOpen => {
                self.buf.push(c);
                if c == '[' {
                    self.state = State::CondMarker;
                } else {
                    self.dashes = if c == '-' { 1 } else { 0 };
                    self.state = State::Comment;
                }
            }

            State::Comment => {
                self.buf.push(c);
                if c == '>' && self.dashes >= 2 {
                    self.flush_verbatim(out);
                } else if c == '-' {
                    self.dashes = self.dashes.saturating_add(1);
                } else {
                    self.dashes = 0;
                }
            }

            State::CondMarker => {
                self.buf.push(c);
                if c == '>' {
                    self.flush_verbatim(out);
                }
            }

            State::BracketDecl => {
                self.buf.push(c);
                const CDATA_OPEN: &str = "<![CDATA[";
                if CDATA_OPEN.starts_with(self.buf.as_str()) {
                    if self.buf.len() == CDATA_OPEN.len() {
                        self.brackets = 0;
                        self.state = State::CData;
                    }
                } else if c == '>' {
                    self.flush_verbatim(out);
                } else {
                    self.state = State::Decl;
                }
            }

            State::CData => {
                self.buf.push(c);
                if c == '>' && self.brackets >= 2 {
                    self.flush_verbatim(out);
                } else if c == ']' {
                    self.brackets = self.brackets.saturating_add(1);
                } else {
                    self.brackets = 0;
                }
            }

            State::Decl | State::Pi | State::EndTag => {
                self.buf.push(c);
                if c == '>' {
                    self.flush_verbatim(out);
                }
            }

            State::TagName => match c {
                c if c.is_ascii_whitespace() => {
                    self.buf.push(c);
                    self.state = State::BeforeAttrName;
                }
                '/' => {
                    self.buf.push(c);
                    self.state = State::BeforeAttrName;
                }
                '>' => {
                    self.buf.push(c);
                    self.finish_tag(out);
                }
                _ => {
                    self.buf.push(c);
                    self.tag_name.push(c.to_ascii_lowercase());
                }
            },

            State::BeforeAttrName => match c {
                c if c.is_ascii_whitespace() => self.buf.push(c),
                '/' | '=' => self.buf.push(c),
                '>' => {
                    self.buf.push(c);
                    self.finish_tag(out);
                }
                _ => {
                    self.attr_name.clear();
                    self.attr_name.push(c.to_ascii_lowercase());
                    self.buf.push(c);
                    self.state = State::AttrName;
                }
            },

            State::AttrName => match c {
                '=' => {
                    self.buf.push(c);
                    self.state = State::BeforeAttrValue;
                }
                c if c.is_ascii_whitespace() => {
                    self.buf.push(c);
                    self.state = State::AfterAttrName;
                }
                '>' => {
                    self.push_valueless_attr();
                    self.buf.push(c);
                    self.finish_tag(out);
                }
                '/' => {
                    self.push_valueless_attr();
                    self.buf.push(c);
                    self.state = State::BeforeAttrName;
                }
                _ => {
                    self.buf.push(c);
                    self.attr_name.push(c.to_ascii_lowercase());
                }
            },

            State::AfterAttrName => match c {
                c if c.is_ascii_whitespace() => self.buf.push(c),
                '=' => {
                    self.buf.push(c);
                    self.state = State::BeforeAttrValue;
                }
                '>' => {
                    self.push_valueless_attr();
                    self.buf.push(c);
                    self.finish_tag(out);
                }
                _ => {
                    // The previous attribute had no value; a new one starts.
                    self.push_valueless_attr();
                    self.attr_name.push(c.to_ascii_lowercase());
                    self.buf.push(c);
                    self.state = State::AttrName;
                }
            },

            State::BeforeAttrValue => match c {
                c if c.is_ascii_whitespace() => self.buf.push(c),
                '"' | '\'' => {
                    self.buf.push(c);
                    self.quote = Some(c);
                    self.value_start = self.buf.len();
                    self.state = State::AttrValue;
                }
                '>' => {
                    self.push_valueless_attr();
                    self.buf.push(c);
                    self.finish_tag(out);
                }
                _ => {
                    self.quote = None;
                    self.value_start = self.buf.len();
                    self.buf.push(c);
                    self.state = State::AttrValue;
                }
            },

            State::AttrValue => match self.quote {
                Some(q) if c == q => {
                    self.push_attr(self.buf.len());
                    self.buf.push(c);
                    self.state = State::BeforeAttrName;
                }
                Some(_) => self.buf.push(c),
                None if c == '>' => {
                    self.push_attr(self.buf.len());
                    self.buf.push(c);
                    self.finish_tag(out);
                }
                None if c.is_ascii_whitespace() => {
                    self.push_attr(self.buf.len());
                    self.buf.push(c);
                    self.state = State::BeforeAttrName;
                }
                None => self.buf.push(c),
            },
        }
    }

    fn push_attr(&mut self, end: usize) {
        let value = self.buf[self.value_start..end].to_string();
        self.attrs.push(Attr {
            name: std::mem::take(&mut self.attr_name),
            value,
            start: self.value_start,
            end,
        });
    }

    fn push_valueless_attr(&mut self) {
        if !self.attr_name.is_empty() {
            let at = self.buf.len();
            self.attrs.push(Attr {
                name: std::mem::take(&mut self.attr_name),
                value: String::new(),
                start: at,
                end: at,
            });
        }
    }

    fn flush_verbatim(&mut self, out: &mut String) {
        out.push_str(&self.buf);
        self.reset();
    }

    /// The tag is complete (buffer runs `<` through `>`). Apply the rule
    /// table and emit the buffer with any rewritten values spliced in place.
    fn finish_tag(&mut self, out: &mut String) {
        let tag = Tag::from_name(&self.tag_name);
        let mut edits: Vec<(usize, usize, String)> = Vec::new();

        for attr in &self.attrs {
            if attr.end == attr.start {
                continue;
            }
            let replacement = match (tag, attr.name.as_str()) {
                (Tag::Img, "src") | (Tag::A, "href") => Some(self.rewrite_value(&attr.value)),
                (Tag::Link, "href") if self.link_rel_matches() => {
                    Some(self.rewrite_value(&attr.value))
                }
                (Tag::Script, "src") if self.attr_equals_ci("type", "text/javascript") => {
                    Some(self.rewrite_value(&attr.value))
                }
                (Tag::Input, "src") if self.attr_equals_ci("type", "image") => {
                    Some(self.rewrite_value(&attr.value))
                }
                (_, "style") => Some(self.rewrite_style(&attr.value)),
                _ => None,
            };
            if let Some(new_value) = replacement
                && new_value != attr.value
            {
                edits.push((attr.start, attr.end, new_value));
            }
        }

        if edits.is_empty() {
            out.push_str(&self.buf);
        } else {
            edits.sort_by_key(|e| e.0);
            let mut pos = 0;
            for (start, end, replacement) in edits {
                out.push_str(&self.buf[pos..start]);
                out.push_str(&replacement);
                pos = end;
            }
            out.push_str(&self.buf[pos..]);
        }
        self.reset();
    }

    fn rewrite_value(&self, value: &str) -> String {
        self.engine.rewrite(value, &self.base, &self.context_path)
    }

    /// Inline `style` attributes get a fresh CSS processor over the same
    /// engine and base.
    fn rewrite_style(&self, value: &str) -> String {
        let mut css = CssProcessor::new(self.engine.clone(), self.base.clone(), &self.context_path);
        let mut result = String::with_capacity(value.len());
        css.feed(value, &mut result);
        css.finish(&mut result);
        result
    }

    fn attr_equals_ci(&self, name: &str, expected: &str) -> bool {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .is_some_and(|a| a.value.trim().eq_ignore_ascii_case(expected))
    }

    fn link_rel_matches(&self) -> bool {
        self.attrs
            .iter()
            .find(|a| a.name == "rel")
            .map(|a| a.value.trim().to_ascii_lowercase())
            .is_some_and(|rel| rel == "stylesheet" || rel == "icon" || rel == "shortcut icon")
    }
}
