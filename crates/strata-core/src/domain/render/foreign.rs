//! Masking of `${{ … }}` expressions (CI workflow syntax) so they survive the
//! substitution pass byte for byte.

use std::sync::LazyLock;

use regex::Regex;

static FOREIGN_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\{\{.*?\}\}").expect("static pattern compiles"));

/// One captured span. Lives only for a single file's render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignExpressionToken {
    pub placeholder: String,
    pub original: String,
}

/// Text with every foreign span swapped for a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    pub text: String,
    pub tokens: Vec<ForeignExpressionToken>,
}

fn placeholder(index: usize) -> String {
    // Control characters keep the placeholder out of reach of both the
    // substitution syntax and ordinary file content.
    format!("\u{1}FOREIGN{index}\u{1}")
}

/// Replace every `${{ … }}` span with a positional placeholder.
///
/// An opening `${{` with no closing `}}` is not a span and stays in place.
pub fn mask(source: &str) -> MaskedText {
    let mut tokens = Vec::new();
    let text = FOREIGN_EXPR
        .replace_all(source, |caps: &regex::Captures<'_>| {
            let token = ForeignExpressionToken {
                placeholder: placeholder(tokens.len()),
                original: caps[0].to_string(),
            };
            let ph = token.placeholder.clone();
            tokens.push(token);
            ph
        })
        .into_owned();

    MaskedText { text, tokens }
}

/// Put the captured spans back, in capture order. Placeholders dropped by a
/// falsy block are simply skipped.
pub fn restore(rendered: &str, tokens: &[ForeignExpressionToken]) -> String {
    let mut out = rendered.to_string();
    for token in tokens {
        if let Some(at) = out.find(&token.placeholder) {
            out.replace_range(at..at + token.placeholder.len(), &token.original);
        }
    }
    out
}
