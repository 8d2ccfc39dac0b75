use ammonia;

/// Clean authored content (exam titles, prompts, option text) using the
/// ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe tags
/// (like <b>, <p>) while stripping dangerous tags (like <script>, <iframe>)
/// and malicious attributes (like onclick).
///
/// Content is written by course admins, not students, but it is still
/// rendered into every taker's browser; this serves as a fail-safe
/// against Stored XSS from a compromised admin account.
pub fn clean_text(input: &str) -> String {
    ammonia::clean(input)
}
