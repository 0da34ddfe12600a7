/// Clean user-supplied text using the ammonia library.
///
/// Quiz and assignment descriptions and submission bodies are rendered back to
/// other users by the frontend, so tags like <script> and attributes like onclick
/// are stripped before they are stored. Safe inline markup such as <b> survives.
/// Titles, prompts and options are only trimmed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input.trim())
}

/// `clean_html` for optional fields; blank input collapses to `None`.
pub fn clean_optional(input: Option<&str>) -> Option<String> {
    input
        .map(clean_html)
        .filter(|cleaned| !cleaned.is_empty())
}
