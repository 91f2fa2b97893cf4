//! Reasoning extraction for tagged model output.
//!
//! Some models interleave their chain of thought in `<tag>...</tag>` blocks.
//! The reasoning role binding carries the tag name; the pipeline runs the
//! final text through [`extract_reasoning`] before showing it.

/// Model output split into reasoning and the visible answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedReasoning {
    pub reasoning: Option<String>,
    pub text: String,
}

/// Pull every `<tag>...</tag>` block out of `text`.
///
/// Blocks are joined with a newline into `reasoning`; the remaining text is
/// trimmed. An unterminated opening tag is left in the text untouched.
pub fn extract_reasoning(text: &str, tag: &str) -> ExtractedReasoning {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let mut blocks = Vec::new();
    let mut visible = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(&open) {
        let after_open = &rest[start + open.len()..];
        let Some(end) = after_open.find(&close) else {
            break;
        };
        visible.push_str(&rest[..start]);
        blocks.push(after_open[..end].trim().to_string());
        rest = &after_open[end + close.len()..];
    }
    visible.push_str(rest);

    ExtractedReasoning {
        reasoning: if blocks.is_empty() {
            None
        } else {
            Some(blocks.join("\n"))
        },
        text: visible.trim().to_string(),
    }
}
