use serde_json::Value;

use crate::copilot::error::CopilotError;

/// Recovers a JSON object from raw generator text. Ordered strategies,
/// first success wins:
///
/// 1. the whole trimmed text parsed directly,
/// 2. the inner content of the first fenced code block,
/// 3. the substring from the first `{` to the last `}`, inclusive.
///
/// Strategy 3 can match misleading partial objects on adversarial input
/// with unrelated nested braces; that approximation is accepted.
pub fn parse_response_text(raw: &str) -> Result<Value, CopilotError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CopilotError::GenerationEmpty);
    }

    if let Some(object) = parse_object(trimmed) {
        return Ok(object);
    }

    if let Some(inner) = fenced_block(trimmed)
        && let Some(object) = parse_object(inner)
    {
        return Ok(object);
    }

    if let Some(span) = brace_span(trimmed)
        && let Some(object) = parse_object(span)
    {
        return Ok(object);
    }

    Err(CopilotError::GenerationUnparsable(
        "no JSON object recoverable from generation output".to_string(),
    ))
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Content between the first pair of triple-backtick fences, with an
/// optional language tag on the opening line stripped.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let close = after_open.find("```")?;
    let inner = &after_open[..close];

    // A language tag occupies the rest of the opening line.
    match inner.find('\n') {
        Some(newline) if !inner[..newline].contains('{') => Some(inner[newline + 1..].trim()),
        _ => Some(inner.trim()),
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
