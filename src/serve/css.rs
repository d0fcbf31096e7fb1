use crate::serve::rewrite::RewriteEngine;
use std::sync::Arc;
use url::Url;

/// Where the processor stands inside the `url(` prefix match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Other,
    /// Matched `u`.
    U,
    /// Matched `ur`.
    R,
    /// Matched `url`.
    L,
    /// Past `url(`, accumulating the body up to `)`.
    Body,
}

/// Streaming rewriter for CSS text: finds `url(...)` tokens (case-insensitive)
/// in a character stream and routes their bodies through the rewrite engine.
///
/// One instance per document (or per `style` attribute); may be fed
/// arbitrarily sized chunks, and a token split across chunk boundaries is
/// handled seamlessly because all progress lives in the instance. Everything outside a
/// candidate token is emitted immediately; a candidate that stops matching is
/// flushed verbatim and the breaking character is re-examined from the ground
/// state, so `urlx(` never swallows anything while `uurl(` still matches.
#[derive(Debug)]
pub struct CssProcessor {
    engine: Arc<RewriteEngine>,
    base: Url,
    context_path: String,
    state: State,
    buf: String,
}

impl CssProcessor {
    pub fn new(engine: Arc<RewriteEngine>, base: Url, context_path: &str) -> Self {
        Self {
            engine,
            base,
            context_path: context_path.to_string(),
            state: State::Other,
            buf: String::new(),
        }
    }

    pub fn feed(&mut self, input: &str, out: &mut String) {
        for c in input.chars() {
            self.step(c, out);
        }
    }

    /// Flushes whatever is buffered, verbatim. An unterminated `url(` at
    /// end-of-input is passed through, never rewritten.
    pub fn finish(&mut self, out: &mut String) {
        out.push_str(&self.buf);
        self.buf.clear();
        self.state = State::Other;
    }

    fn step(&mut self, c: char, out: &mut String) {
        loop {
            match self.state {
                State::Other => {
                    if c == 'u' || c == 'U' {
                        self.buf.push(c);
                        self.state = State::U;
                    } else {
                        out.push(c);
                    }
                    return;
                }
                State::U => {
                    if c == 'r' || c == 'R' {
                        self.buf.push(c);
                        self.state = State::R;
                        return;
                    }
                }
                State::R => {
                    if c == 'l' || c == 'L' {
                        self.buf.push(c);
                        self.state = State::L;
                        return;
                    }
                }
                State::L => {
                    if c == '(' {
                        self.buf.push(c);
                        self.state = State::Body;
                        return;
                    }
                }
                State::Body => {
                    if c == ')' {
                        self.complete_token(out);
                    } else {
                        self.buf.push(c);
                    }
                    return;
                }
            }
            // The prefix match broke: flush it and re-examine this
            // character from the ground state.
            out.push_str(&self.buf);
            self.buf.clear();
            self.state = State::Other;
        }
    }

    /// The buffer holds `url(` (original casing) plus the body. Surrounding
    /// whitespace and optional quotes are preserved; only the reference
    /// between them is rewritten.
    fn complete_token(&mut self, out: &mut String) {
        let body = &self.buf[4..];
        let (lead, trimmed, trail) = if body.trim().is_empty() {
            (body, "", "")
        } else {
            let lead_len = body.len() - body.trim_start().len();
            let trail_len = body.len() - body.trim_end().len();
            (
                &body[..lead_len],
                &body[lead_len..body.len() - trail_len],
                &body[body.len() - trail_len..],
            )
        };

        let (quote, reference) = {
            let bytes = trimmed.as_bytes();
            if trimmed.len() >= 2
                && (bytes[0] == b'"' || bytes[0] == b'\'')
                && bytes[trimmed.len() - 1] == bytes[0]
            {
                (Some(bytes[0] as char), &trimmed[1..trimmed.len() - 1])
            } else {
                (None, trimmed)
            }
        };

        // `url()` with nothing in it would resolve to the page itself.
        if reference.is_empty() {
            out.push_str(&self.buf);
            out.push(')');
            self.buf.clear();
            self.state = State::Other;
            return;
        }

        let rewritten = self
            .engine
            .rewrite(reference, &self.base, &self.context_path);

        out.push_str(&self.buf[..4]);
        out.push_str(lead);
        if let Some(q) = quote {
            out.push(q);
        }
        out.push_str(&rewritten);
        if let Some(q) = quote {
            out.push(q);
        }
        out.push_str(trail);
        out.push(')');

        self.buf.clear();
        self.state = State::Other;
    }
}
