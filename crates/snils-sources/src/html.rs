//! Reducing HTML pages to plain text

use std::borrow::Cow;

use lazy_static::lazy_static;
use quick_xml::escape::unescape_with;
use regex::{Captures, Regex};

lazy_static! {
    static ref SCRIPT_OR_STYLE: Regex =
        Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref ENTITY: Regex =
        Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip markup from an HTML document.
///
/// Script and style blocks and comments are dropped, every tag becomes a
/// space (so text in adjacent cells does not run together), entities are
/// unescaped and whitespace runs collapse to a single space.
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(html, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = unescape_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Replace entity references, leaving unknown ones untouched
fn unescape_entities(text: &str) -> Cow<'_, str> {
    ENTITY.replace_all(text, |caps: &Captures| {
        let raw = &caps[0];
        match unescape_with(raw, resolve_html_entity) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw.to_string(),
        }
    })
}

fn resolve_html_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "shy" => "",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "minus" => "\u{2212}",
        "hellip" => "\u{2026}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "bdquo" => "\u{201e}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "numero" => "\u{2116}",
        _ => return None,
    };
    Some(value)
}
