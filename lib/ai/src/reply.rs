//! Helpers for reading model replies.

/// Fence marker models wrap structured replies in.
const FENCE: &str = "```";

/// Strips a surrounding markdown code fence from a reply.
///
/// The text is trimmed first. If it starts with a fence, the opening line is
/// dropped (it may carry a language tag such as ```` ```json ````), and the
/// closing line is dropped when it is a bare fence. Anything else is returned
/// trimmed but otherwise untouched.
#[must_use]
pub fn strip_code_fence(text: &str) -> String {
    let text = text.trim();
    if !text.starts_with(FENCE) {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.first().is_some_and(|l| l.starts_with(FENCE)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim() == FENCE) {
        lines.pop();
    }
    lines.join("\n")
}
