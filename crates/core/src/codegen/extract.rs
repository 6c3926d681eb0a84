use super::types::Language;

/// Markdown code fence marker.
pub const FENCE: &str = "```";

/// Failure to extract code from a completion.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// An opening fence was found but the response ended before it was closed,
    /// which usually means the completion was truncated.
    #[error("Completion ended inside an unterminated code fence")]
    UnterminatedFence { partial: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Outside,
    Inside,
}

/// Result of scanning a completion for fenced blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FenceScan<'a> {
    /// Raw text between each matched pair of fences, in order.
    pub blocks: Vec<&'a str>,
    /// Text after an opening fence that was never closed.
    pub unterminated: Option<&'a str>,
}

/// Walk the text, toggling between outside and inside a fence at each marker.
pub fn scan_fences(raw: &str) -> FenceScan<'_> {
    let mut scan = FenceScan::default();
    let mut state = FenceState::Outside;
    let mut rest = raw;

    while let Some(pos) = rest.find(FENCE) {
        let after = &rest[pos + FENCE.len()..];
        state = match state {
            FenceState::Outside => FenceState::Inside,
            FenceState::Inside => {
                scan.blocks.push(&rest[..pos]);
                FenceState::Outside
            }
        };
        rest = after;
    }

    if state == FenceState::Inside {
        scan.unterminated = Some(rest);
    }

    scan
}

/// Extract the code from a completion.
///
/// - No fence: the trimmed text.
/// - One or more complete fenced blocks: the first block, without its
///   language tag, trimmed. Later blocks are ignored.
/// - An opening fence that is never closed: [`ExtractError::UnterminatedFence`].
pub fn extract_code(raw: &str, language: Language) -> Result<String, ExtractError> {
    let scan = scan_fences(raw);

    if let Some(block) = scan.blocks.first() {
        return Ok(strip_language_tag(block, language).trim().to_string());
    }

    if let Some(partial) = scan.unterminated {
        return Err(ExtractError::UnterminatedFence {
            partial: strip_language_tag(partial, language).trim().to_string(),
        });
    }

    Ok(raw.trim().to_string())
}

/// Remove the info string that follows an opening fence.
///
/// The language's own tags are removed whenever they form a whole leading
/// token. Any other bare word is removed only when it sits alone on the
/// fence line. Spaces between the fence and the info string are ignored.
fn strip_language_tag(block: &str, language: Language) -> &str {
    let block = block.trim_start_matches(&[' ', '\t'][..]);
    let mut tags: Vec<&str> = language.fence_tags().to_vec();
    tags.sort_by_key(|t| std::cmp::Reverse(t.len()));

    for tag in tags {
        if let Some(head) = block.get(..tag.len()) {
            let tail = &block[tag.len()..];
            let at_boundary = tail.chars().next().map_or(true, char::is_whitespace);
            if head.eq_ignore_ascii_case(tag) && at_boundary {
                return tail;
            }
        }
    }

    if let Some((first_line, tail)) = block.split_once('\n') {
        let info = first_line.trim_end();
        if !info.is_empty() && info.chars().all(is_info_char) {
            return tail;
        }
    }

    block
}

fn is_info_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_' | '.')
}
