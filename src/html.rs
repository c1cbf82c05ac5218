//! Just enough HTML handling to lift the description and title out of a
//! judge problem page: locate an element by `id`, return its inner markup,
//! or its text with tags stripped and entities decoded.
//!
//! This is not a general parser. It assumes the element is well nested with
//! respect to its own tag name, which holds for the judge's server-rendered
//! pages.

use std::{ops::Range, sync::OnceLock};

use regex::{Captures, Regex};

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[\s/][^>]*)?)>").expect("tag pattern is valid")
    })
}

fn id_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
            .expect("id attribute pattern is valid")
    })
}

fn non_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("non-text pattern is valid")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);").expect("entity pattern is valid")
    })
}

fn attr_id(attrs: &str) -> Option<&str> {
    let caps = id_attr_regex().captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

/// Markup between the opening tag whose `id` equals `id` and its matching
/// closing tag. `None` if no such element exists or it is never closed.
///
/// Tags inside comments, `<script>` and `<style>` blocks are not counted.
pub fn inner_html<'a>(doc: &'a str, id: &str) -> Option<&'a str> {
    let hidden: Vec<Range<usize>> = non_text_regex().find_iter(doc).map(|m| m.range()).collect();
    let mut tags = tag_regex().captures_iter(doc).filter(|caps| {
        let start = caps.get(0).map_or(0, |m| m.start());
        !hidden.iter().any(|span| span.contains(&start))
    });

    let (name, content_start) = tags.by_ref().find_map(|caps| {
        if !caps[1].is_empty() {
            return None;
        }
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        if attr_id(attrs) != Some(id) {
            return None;
        }
        let whole = caps.get(0)?;
        Some((caps[2].to_ascii_lowercase(), whole.end()))
    })?;

    let mut depth = 1usize;
    for caps in tags {
        if !caps[2].eq_ignore_ascii_case(&name) {
            continue;
        }
        let whole = caps.get(0)?;
        if !caps[1].is_empty() {
            depth -= 1;
            if depth == 0 {
                return Some(&doc[content_start..whole.start()]);
            }
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

/// Text content of the element with the given `id`: comments, scripts and
/// styles dropped, remaining tags removed, character references decoded.
pub fn inner_text(doc: &str, id: &str) -> Option<String> {
    let markup = inner_html(doc, id)?;
    let without_blocks = non_text_regex().replace_all(markup, "");
    let without_tags = tag_regex().replace_all(&without_blocks, "");
    Some(decode_entities(&without_tags))
}

/// Decode numeric character references and the handful of named entities
/// that show up in problem statements. Unknown names are left as written.
pub fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
            } else {
                named_entity(body).map(String::from)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "le" => "≤",
        "ge" => "≥",
        "ne" => "≠",
        "times" => "×",
        "middot" => "·",
        "hellip" => "…",
        "ldquo" => "“",
        "rdquo" => "”",
        "lsquo" => "‘",
        "rsquo" => "’",
        _ => return None,
    })
}
