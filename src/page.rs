//! Page shell the rendered sections are written into.
//!
//! Elements are addressed by `id`. The template is parsed once with `scraper`
//! to learn which mount points exist; edits go through a small tag scanner
//! that reads attributes with the same rules (quoted or bare values,
//! case-insensitive names) and rewrites the source in place, so everything
//! outside the touched elements stays byte-for-byte as authored.

use std::collections::HashSet;
use std::ops::Range;

use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use scraper::{Html, Selector};

use crate::{Error, Result};

pub const STREAMERS_CONTAINER: &str = "streamers-container";
pub const STREAMERS_COUNTER: &str = "counter";
pub const SHOW_STREAMERS_BUTTON: &str = "show-streamers-btn";
pub const FILTER_CONTAINER: &str = "filter-container";
pub const FILTER_BUTTON: &str = "filter-btn";
pub const FILTER_OPTIONS: &str = "filter-options";
pub const SEARCH_INPUT: &str = "search-input";
pub const TOURNAMENTS_CONTAINER: &str = "tournaments-container";
pub const TOURNAMENTS_COUNTER: &str = "tournament-counter";

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

#[derive(Debug, Clone)]
pub struct Page {
    source: String,
    ids: HashSet<String>,
    filter_options: Vec<String>,
}

#[derive(Debug)]
struct Attr {
    name: String,
    value: String,
    span: Range<usize>,
}

#[derive(Debug)]
struct Tag {
    start: usize,
    end: usize,
    /// Just past the last attribute, where new attributes go.
    attrs_end: usize,
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: Vec<Attr>,
}

impl Tag {
    /// First occurrence wins, as in HTML.
    fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map_or(false, |a| a.value.split_whitespace().any(|c| c == class))
    }

    fn is_start(&self) -> bool {
        !self.closing
    }
}

fn skip_ws(b: &[u8], mut j: usize) -> usize {
    while j < b.len() && b[j].is_ascii_whitespace() {
        j += 1;
    }
    j
}

fn find_from(source: &str, from: usize, needle: &str) -> Option<usize> {
    source[from..].find(needle).map(|i| from + i)
}

/// Lists every start and end tag of `source`, skipping comments, doctypes and
/// the bodies of raw-text elements.
fn scan(source: &str) -> Vec<Tag> {
    let b = source.as_bytes();
    let len = b.len();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(start) = find_from(source, i, "<") {
        let rest = &source[start..];
        if rest.starts_with("<!--") {
            i = find_from(source, start, "-->").map_or(len, |e| e + 3);
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            i = find_from(source, start, ">").map_or(len, |e| e + 1);
            continue;
        }

        let closing = rest.starts_with("</");
        let name_start = start + if closing { 2 } else { 1 };
        if name_start >= len || !b[name_start].is_ascii_alphabetic() {
            i = start + 1;
            continue;
        }
        let mut j = name_start;
        while j < len && (b[j].is_ascii_alphanumeric() || b[j] == b'-') {
            j += 1;
        }
        let name = source[name_start..j].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut self_closing = false;
        let mut attrs_end = j;
        loop {
            j = skip_ws(b, j);
            if j >= len {
                break;
            }
            match b[j] {
                b'>' => {
                    j += 1;
                    break;
                }
                b'/' if b.get(j + 1) == Some(&b'>') => {
                    self_closing = true;
                    j += 2;
                    break;
                }
                b'/' => j += 1,
                _ => {
                    let attr_start = j;
                    while j < len && !b[j].is_ascii_whitespace() && !matches!(b[j], b'=' | b'>' | b'/') {
                        j += 1;
                    }
                    let attr_name = source[attr_start..j].to_ascii_lowercase();
                    let mut value = "";
                    let after_name = skip_ws(b, j);
                    if after_name < len && b[after_name] == b'=' {
                        j = skip_ws(b, after_name + 1);
                        if j < len && (b[j] == b'"' || b[j] == b'\'') {
                            let quote = b[j] as char;
                            let value_end = source[j + 1..].find(quote).map_or(len, |e| j + 1 + e);
                            value = &source[j + 1..value_end];
                            j = (value_end + 1).min(len);
                        } else {
                            let value_start = j;
                            while j < len && !b[j].is_ascii_whitespace() && b[j] != b'>' {
                                j += 1;
                            }
                            value = &source[value_start..j];
                        }
                    }
                    attrs_end = j;
                    attrs.push(Attr {
                        name: attr_name,
                        value: decode_html_entities(value).into_owned(),
                        span: attr_start..j,
                    });
                }
            }
        }

        let raw_text = !closing && !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str());
        tags.push(Tag {
            start,
            end: j,
            attrs_end,
            name: name.clone(),
            closing,
            self_closing,
            attrs,
        });
        i = j;
        if raw_text {
            // Offsets survive ASCII lowercasing.
            let lower = source[j..].to_ascii_lowercase();
            i = lower.find(&format!("</{name}")).map_or(len, |e| j + e);
        }
    }
    tags
}

fn find_element(tags: &[Tag], id: &str) -> Result<usize> {
    tags.iter()
        .position(|t| t.is_start() && t.attr("id").map_or(false, |a| a.value == id))
        .ok_or_else(|| Error::Template(format!("no element with id {id:?}")))
}

/// Index of the end tag matching `tags[open]`, counting nested same-name tags.
fn matching_close(tags: &[Tag], open: usize) -> Result<usize> {
    let tag = &tags[open];
    if tag.self_closing || VOID_ELEMENTS.contains(&tag.name.as_str()) {
        return Err(Error::Template(format!("<{}> has no content", tag.name)));
    }
    let mut depth = 1usize;
    for (k, t) in tags.iter().enumerate().skip(open + 1) {
        if t.name != tag.name {
            continue;
        }
        if t.closing {
            depth -= 1;
            if depth == 0 {
                return Ok(k);
            }
        } else if !t.self_closing {
            depth += 1;
        }
    }
    Err(Error::Template(format!("unclosed <{}>", tag.name)))
}

fn attribute_edit(tag: &Tag, name: &str, value: &str) -> (Range<usize>, String) {
    let rendered = format!(r#"{}="{}""#, name, encode_double_quoted_attribute(value));
    match tag.attr(name) {
        Some(a) => (a.span.clone(), rendered),
        None => (tag.attrs_end..tag.attrs_end, format!(" {rendered}")),
    }
}

/// `None` when the class is already in the wanted state.
fn class_edit(tag: &Tag, class: &str, on: bool) -> Option<(Range<usize>, String)> {
    if tag.has_class(class) == on {
        return None;
    }
    let current = tag.attr("class").map_or("", |a| a.value.as_str());
    let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    if on {
        classes.push(class);
    }
    Some(attribute_edit(tag, "class", &classes.join(" ")))
}

impl Page {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let doc = Html::parse_document(&source);
        let with_id = Selector::parse("[id]").expect("correct selector");
        let ids = doc
            .select(&with_id)
            .filter_map(|e| e.value().id())
            .map(str::to_owned)
            .collect();
        let option_sel = Selector::parse(&format!("#{FILTER_OPTIONS} .filter-option[data-filter]"))
            .expect("correct selector");
        let filter_options = doc
            .select(&option_sel)
            .filter_map(|e| e.value().attr("data-filter"))
            .map(str::to_owned)
            .collect();
        Page {
            source,
            ids,
            filter_options,
        }
    }

    /// Whether the template, as loaded, has an element with this id.
    pub fn has_element(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// The streamer section needs both its container and its counter.
    pub fn has_streamers(&self) -> bool {
        self.has_element(STREAMERS_CONTAINER) && self.has_element(STREAMERS_COUNTER)
    }

    pub fn has_tournaments(&self) -> bool {
        self.has_element(TOURNAMENTS_CONTAINER) && self.has_element(TOURNAMENTS_COUNTER)
    }

    /// `data-filter` keys of the dropdown's option buttons, in document order.
    pub fn filter_options(&self) -> &[String] {
        &self.filter_options
    }

    /// Replaces everything between the element's opening and closing tags.
    pub fn set_inner(&mut self, id: &str, inner: &str) -> Result<()> {
        let tags = scan(&self.source);
        let open = find_element(&tags, id)?;
        let close = matching_close(&tags, open)?;
        self.source
            .replace_range(tags[open].end..tags[close].start, inner);
        Ok(())
    }

    /// Sets or replaces an attribute, written double-quoted.
    pub fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()> {
        let tags = scan(&self.source);
        let tag = &tags[find_element(&tags, id)?];
        let (span, text) = attribute_edit(tag, &name.to_ascii_lowercase(), value);
        self.source.replace_range(span, &text);
        Ok(())
    }

    pub fn remove_class(&mut self, id: &str, class: &str) -> Result<()> {
        let tags = scan(&self.source);
        let tag = &tags[find_element(&tags, id)?];
        if let Some((span, text)) = class_edit(tag, class, false) {
            self.source.replace_range(span, &text);
        }
        Ok(())
    }

    /// Adds or removes `class` on the elements inside `scope_id` that carry
    /// `member_class` and whose `attr` equals `value`. Returns how many
    /// elements matched.
    pub fn toggle_class_in(
        &mut self,
        scope_id: &str,
        member_class: &str,
        attr: &str,
        value: &str,
        class: &str,
        on: bool,
    ) -> Result<usize> {
        let tags = scan(&self.source);
        let open = find_element(&tags, scope_id)?;
        let close = matching_close(&tags, open)?;
        let members: Vec<&Tag> = tags[open + 1..close]
            .iter()
            .filter(|t| t.is_start() && t.has_class(member_class))
            .filter(|t| t.attr(attr).map_or(false, |a| a.value == value))
            .collect();
        let mut edits: Vec<(Range<usize>, String)> = members
            .iter()
            .filter_map(|t| class_edit(t, class, on))
            .collect();
        // Back to front so earlier offsets stay valid.
        edits.sort_by_key(|(span, _)| std::cmp::Reverse(span.start));
        for (span, text) in edits {
            self.source.replace_range(span, &text);
        }
        Ok(members.len())
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn into_string(self) -> String {
        self.source
    }
}
