//! Summary emphasis markup.
//!
//! The analysis service highlights ingredient names inside the summary
//! sentence with `{pos}…{/pos}`, `{neg}…{/neg}` and `{med}…{/med}` tags.
//! [`parse_summary`] splits a summary into spans a renderer can color;
//! [`strip_markup`] drops every brace tag for plain-text contexts, including
//! unknown or unbalanced ones.

/// Emphasis kind carried by a markup tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// `{pos}` - beneficial ingredient.
    Positive,
    /// `{neg}` - harmful ingredient.
    Negative,
    /// `{med}` - caution.
    Caution,
}

impl Emphasis {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "pos" => Some(Emphasis::Positive),
            "neg" => Some(Emphasis::Negative),
            "med" => Some(Emphasis::Caution),
            _ => None,
        }
    }
}

/// A run of summary text, optionally emphasized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySegment {
    pub emphasis: Option<Emphasis>,
    pub text: String,
}

impl SummarySegment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            emphasis: None,
            text: text.into(),
        }
    }

    fn emphasized(emphasis: Emphasis, text: impl Into<String>) -> Self {
        Self {
            emphasis: Some(emphasis),
            text: text.into(),
        }
    }
}

/// Split a summary into emphasis spans with tag markers removed.
///
/// A recognized opening tag without its matching closer is treated as
/// literal text minus the tag itself, matching how the original renderer
/// strips stray braces.
#[must_use]
pub fn parse_summary(summary: &str) -> Vec<SummarySegment> {
    let mut segments = Vec::new();
    let mut rest = summary;

    while let Some(open_at) = rest.find('{') {
        let (head, tagged) = rest.split_at(open_at);
        if !head.is_empty() {
            push_plain(&mut segments, head);
        }

        let Some((tag, after_open)) = read_tag(tagged) else {
            // Unterminated `{…` - drop the brace run entirely.
            push_plain(&mut segments, &strip_markup(tagged));
            return compact(segments);
        };

        match Emphasis::from_tag(tag) {
            Some(emphasis) => {
                let closer = format!("{{/{tag}}}");
                if let Some(close_at) = after_open.find(&closer) {
                    let inner = &after_open[..close_at];
                    if !inner.is_empty() {
                        segments.push(SummarySegment::emphasized(emphasis, strip_markup(inner)));
                    }
                    rest = &after_open[close_at + closer.len()..];
                } else {
                    // Opening tag never closed: keep the text, lose the tag.
                    rest = after_open;
                }
            }
            None => {
                // Unknown tag (including closers like `{/pos}` seen out of
                // order): discard the tag, keep scanning.
                rest = after_open;
            }
        }
    }

    if !rest.is_empty() {
        push_plain(&mut segments, rest);
    }
    compact(segments)
}

/// Remove every `{…}` tag, keeping the text between them.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open_at) = rest.find('{') {
        out.push_str(&rest[..open_at]);
        match rest[open_at..].find('}') {
            Some(close_off) => rest = &rest[open_at + close_off + 1..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn push_plain(segments: &mut Vec<SummarySegment>, text: &str) {
    if !text.is_empty() {
        segments.push(SummarySegment::plain(text));
    }
}

fn read_tag(tagged: &str) -> Option<(&str, &str)> {
    debug_assert!(tagged.starts_with('{'));
    let close = tagged.find('}')?;
    Some((&tagged[1..close], &tagged[close + 1..]))
}

/// Merge adjacent plain segments produced by stripped unknown tags.
fn compact(segments: Vec<SummarySegment>) -> Vec<SummarySegment> {
    let mut out: Vec<SummarySegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match out.last_mut() {
            Some(last) if last.emphasis.is_none() && segment.emphasis.is_none() => {
                last.text.push_str(&segment.text);
            }
            _ => out.push(segment),
        }
    }
    out
}
