//! HTML parseability check around the enhancement call.
//!
//! A document counts as parseable unless the HTML5 tokenizer runs out of
//! input inside markup: an unterminated tag, attribute value or comment.
//! Every other tokenizer error (duplicate attributes, a character reference
//! without `;`, a bare `<` in text, attributes with no space between them)
//! is recoverable, and browsers render such pages the same way every time,
//! so those pass with a debug event. Tree-construction issues (missing
//! doctype, misnested or unclosed elements) are not checked at all.
//!
//! Only the tokenizer runs, so the sink has to switch it into the raw-text
//! states itself after `<script>`, `<style>`, `<textarea>` and friends.
//! Without that, `if (a < b)` inside a script would read as a broken tag.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::TokenizerResult;
use std::cell::RefCell;
use tracing::debug;

/// A tokenizer error with the line it was reported on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: u64,
    pub message: String,
}

impl SyntaxError {
    /// Whether the input ended inside a tag, attribute or comment.
    ///
    /// html5ever reports these as "Saw EOF in state ..." (or "Unexpected
    /// EOF" without exact errors); no recoverable error mentions EOF.
    pub fn is_structural(&self) -> bool {
        self.message.contains("EOF")
    }
}

#[derive(Default)]
struct ErrorSink {
    errors: RefCell<Vec<SyntaxError>>,
}

impl TokenSink for ErrorSink {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::ParseError(message) => {
                self.errors.borrow_mut().push(SyntaxError {
                    line: line_number,
                    message: message.into_owned(),
                });
                TokenSinkResult::Continue
            }
            Token::TagToken(tag) if tag.kind == TagKind::StartTag && !tag.self_closing => {
                raw_text_state(&tag)
            }
            _ => TokenSinkResult::Continue,
        }
    }
}

fn raw_text_state(tag: &Tag) -> TokenSinkResult<()> {
    match &*tag.name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Tokenize `html` and collect every syntax error.
pub fn syntax_errors(html: &str) -> Vec<SyntaxError> {
    let opts = TokenizerOpts {
        exact_errors: true,
        ..TokenizerOpts::default()
    };
    let tokenizer = Tokenizer::new(ErrorSink::default(), opts);
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(html));
    // The sink never yields a script handle; keep feeding until drained.
    while let TokenizerResult::Script(()) = tokenizer.feed(&queue) {}
    tokenizer.end();
    tokenizer.sink.errors.take()
}

/// `Ok(())` unless `html` has a structural syntax error, otherwise the first
/// one rendered as `line N: message`.
pub fn ensure_parseable(html: &str) -> Result<(), String> {
    let mut structural = None;
    for e in syntax_errors(html) {
        if e.is_structural() {
            structural = Some(e);
            break;
        }
        debug!("recoverable HTML error at line {}: {}", e.line, e.message);
    }
    match structural {
        None => Ok(()),
        Some(e) => Err(format!("line {}: {}", e.line, e.message)),
    }
}
