use ammonia;

/// Clean comment text using the ammonia library.
///
/// Whitelist-based: safe formatting tags survive, `<script>`, `<iframe>` and
/// event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Trimmed and sanitized comment body; `None` when nothing is left.
pub fn sanitize_comment(input: &str) -> Option<String> {
    let cleaned = clean_html(input.trim());
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
