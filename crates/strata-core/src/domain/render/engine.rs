//! Logic-less substitution engine.
//!
//! Supported tags:
//!
//! | Tag                | Meaning                                   |
//! |--------------------|-------------------------------------------|
//! | `{{key}}`          | interpolate, no escaping                  |
//! | `{{{key}}}`        | same as `{{key}}`                         |
//! | `{{#key}}…{{/key}}`| include block when `key` is truthy        |
//! | `{{^key}}…{{/key}}`| include block when `key` is falsy/absent  |
//! | `{{! text}}`       | comment, dropped                          |
//!
//! Block and comment tags alone on a line take the whole line with them, so
//! wrapping a block around lines leaves no blank lines behind. A `{{` with no
//! closing `}}` is ordinary text.

use crate::domain::{entities::context::RenderContext, error::DomainError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Var(String),
    Section {
        key: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Var,
    Open { inverted: bool },
    Close,
    Comment,
}

impl TagKind {
    fn is_standalone_candidate(self) -> bool {
        !matches!(self, Self::Var)
    }
}

struct Frame {
    key: String,
    inverted: bool,
    line: usize,
    children: Vec<Node>,
}

/// Render `source` against `ctx`.
///
/// # Errors
///
/// [`DomainError::TemplateSyntax`] for a closing tag that does not match the
/// open block, or a block left open at end of input.
pub fn render(source: &str, ctx: &RenderContext) -> Result<String, DomainError> {
    let nodes = parse(source)?;
    let mut out = String::with_capacity(source.len());
    render_nodes(&nodes, ctx, &mut out);
    Ok(out)
}

fn render_nodes(nodes: &[Node], ctx: &RenderContext, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(key) => out.push_str(&ctx.interpolate(key)),
            Node::Section {
                key,
                inverted,
                children,
            } => {
                if ctx.is_truthy(key) != *inverted {
                    render_nodes(children, ctx, out);
                }
            }
        }
    }
}

fn line_of(source: &str, at: usize) -> usize {
    source[..at].matches('\n').count() + 1
}

fn parse(source: &str) -> Result<Vec<Node>, DomainError> {
    let mut stack = vec![Frame {
        key: String::new(),
        inverted: false,
        line: 0,
        children: Vec::new(),
    }];
    let mut pos = 0;

    while let Some(rel) = source[pos..].find("{{") {
        let open = pos + rel;
        let triple = source[open..].starts_with("{{{");
        let (open_len, close_delim) = if triple { (3, "}}}") } else { (2, "}}") };

        let Some(close_rel) = source[open + open_len..].find(close_delim) else {
            // No closing delimiter anywhere after this point: the rest is text.
            break;
        };
        let inner_start = open + open_len;
        let inner = &source[inner_start..inner_start + close_rel];
        let tag_end = inner_start + close_rel + close_delim.len();

        let (kind, key) = classify(inner, triple);
        if key.is_empty() && kind != TagKind::Comment {
            // `{{ }}` carries no key; keep it verbatim.
            push_text(&mut stack, &source[pos..tag_end]);
            pos = tag_end;
            continue;
        }

        let (text_end, next_pos) = match standalone_bounds(source, pos, open, tag_end) {
            Some(bounds) if kind.is_standalone_candidate() => bounds,
            _ => (open, tag_end),
        };
        push_text(&mut stack, &source[pos..text_end]);
        pos = next_pos;

        match kind {
            TagKind::Var => push_node(&mut stack, Node::Var(key.to_string())),
            TagKind::Comment => {}
            TagKind::Open { inverted } => stack.push(Frame {
                key: key.to_string(),
                inverted,
                line: line_of(source, open),
                children: Vec::new(),
            }),
            TagKind::Close => {
                // The bottom frame is the document itself, never a block.
                let frame = match stack.pop() {
                    Some(frame) if !stack.is_empty() => frame,
                    _ => {
                        return Err(DomainError::TemplateSyntax {
                            line: line_of(source, open),
                            reason: format!("closing tag '{key}' has no open block"),
                        });
                    }
                };
                if frame.key != key {
                    return Err(DomainError::TemplateSyntax {
                        line: line_of(source, open),
                        reason: format!(
                            "closing tag '{key}' does not match open block '{}' from line {}",
                            frame.key, frame.line
                        ),
                    });
                }
                push_node(
                    &mut stack,
                    Node::Section {
                        key: frame.key,
                        inverted: frame.inverted,
                        children: frame.children,
                    },
                );
            }
        }
    }

    push_text(&mut stack, &source[pos..]);

    if stack.len() > 1 {
        let frame = &stack[stack.len() - 1];
        return Err(DomainError::TemplateSyntax {
            line: frame.line,
            reason: format!("block '{}' is never closed", frame.key),
        });
    }

    Ok(stack.pop().map(|f| f.children).unwrap_or_default())
}

fn classify(inner: &str, triple: bool) -> (TagKind, &str) {
    let trimmed = inner.trim();
    if triple {
        return (TagKind::Var, trimmed);
    }
    match trimmed.chars().next() {
        Some('#') => (TagKind::Open { inverted: false }, trimmed[1..].trim()),
        Some('^') => (TagKind::Open { inverted: true }, trimmed[1..].trim()),
        Some('/') => (TagKind::Close, trimmed[1..].trim()),
        Some('!') => (TagKind::Comment, trimmed[1..].trim()),
        _ => (TagKind::Var, trimmed),
    }
}

/// If the tag spanning `open..tag_end` is the only thing on its line, return
/// where the preceding text should end and where scanning resumes, so the
/// line disappears entirely.
fn standalone_bounds(
    source: &str,
    text_start: usize,
    open: usize,
    tag_end: usize,
) -> Option<(usize, usize)> {
    let line_start = source[..open].rfind('\n').map_or(0, |i| i + 1);
    // Another tag earlier on the same line means this one is not alone.
    if line_start < text_start {
        return None;
    }
    if !source[line_start..open].chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    let rest = &source[tag_end..];
    let (line_rest, consumed) = match rest.find('\n') {
        Some(nl) => (&rest[..nl], nl + 1),
        None => (rest, rest.len()),
    };
    if !line_rest
        .trim_end_matches('\r')
        .chars()
        .all(|c| c == ' ' || c == '\t')
    {
        return None;
    }

    Some((line_start, tag_end + consumed))
}

fn push_text(stack: &mut [Frame], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(frame) = stack.last_mut() {
        match frame.children.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => frame.children.push(Node::Text(text.to_string())),
        }
    }
}

fn push_node(stack: &mut [Frame], node: Node) {
    if let Some(frame) = stack.last_mut() {
        frame.children.push(node);
    }
}
