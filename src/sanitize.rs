//! Sheet name normalization

/// Longest sheet name the container accepts
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Name used when nothing is left after normalization
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

const FORBIDDEN: [char; 7] = ['\\', '/', '*', '[', ']', ':', '?'];

const AMP_ENTITY: &str = "&amp;";

/// Normalize a caller-supplied name into a valid sheet name.
///
/// Forbidden characters are stripped, bare `&` becomes `&amp;`, and the
/// result is cut to 31 characters without splitting an entity. Escaping
/// happens before truncation so the length limit holds for the stored form
/// and normalizing twice gives the same result.
pub fn normalize_sheet_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let out = truncate_escaped(&stripped, MAX_SHEET_NAME_CHARS);

    if out.is_empty() {
        return DEFAULT_SHEET_NAME.to_string();
    }
    out
}

/// Escape bare ampersands and keep at most `max` characters, dropping a
/// trailing entity rather than cutting it
pub(crate) fn truncate_escaped(name: &str, max: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = 0;
    for token in tokens(name) {
        let len = token.chars().count();
        if chars + len > max {
            break;
        }
        out.push_str(token);
        chars += len;
    }
    out
}

/// Name as shown to the user, with `&amp;` turned back into `&`
pub fn display_name(normalized: &str) -> String {
    normalized.replace(AMP_ENTITY, "&")
}

/// Split into single characters, except that an ampersand always comes out
/// as a whole `&amp;` entity
fn tokens(s: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = s;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        if rest.starts_with(AMP_ENTITY) {
            rest = &rest[AMP_ENTITY.len()..];
            return Some(AMP_ENTITY);
        }
        if c == '&' {
            rest = &rest[1..];
            return Some(AMP_ENTITY);
        }
        let (token, tail) = rest.split_at(c.len_utf8());
        rest = tail;
        Some(token)
    })
}
