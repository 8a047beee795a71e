//! Heading extraction for tables of contents

use lazy_static::lazy_static;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::Heading;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_]+").unwrap();
}

/// Anchor id for a heading: lowercase, with every run of characters
/// outside `[A-Za-z0-9_]` collapsed into one `-`. Leading and trailing
/// hyphens are kept so ids match the anchors the site front end renders.
pub fn heading_id(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "-").into_owned()
}

fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Extract every heading of a markdown/MDX body in document order.
///
/// Heading text is the concatenation of its text and inline-code spans,
/// so emphasis and links contribute only their literal content. When two
/// headings produce the same id, later ones get `-1`, `-2`, ... appended.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(body, options);

    let mut headings = Vec::new();
    let mut used_ids = HashSet::new();
    let mut current: Option<(u8, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level_number(level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let id = unique_id(heading_id(&text), &mut used_ids);
                    headings.push(Heading { id, text, level });
                }
            }
            _ => {}
        }
    }

    headings
}

fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// A heading with the headings nested under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    #[serde(flatten)]
    pub heading: Heading,
    pub children: Vec<TocNode>,
}

/// Nest a flat heading list: each heading becomes a child of the closest
/// preceding heading with a smaller level.
pub fn outline(headings: &[Heading]) -> Vec<TocNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<TocNode> = Vec::new();

    for heading in headings {
        while stack
            .last()
            .is_some_and(|top| top.heading.level >= heading.level)
        {
            if let Some(done) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }
        stack.push(TocNode {
            heading: heading.clone(),
            children: Vec::new(),
        });
    }

    while let Some(done) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }

    roots
}

fn attach(stack: &mut [TocNode], roots: &mut Vec<TocNode>, node: TocNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}
