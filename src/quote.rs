use std::borrow::Cow;

/// Quotes a single word for a POSIX shell.
///
/// Words made only of `[A-Za-z0-9_@%+=:,./-]` come back untouched, anything
/// else is wrapped in single quotes with embedded quotes spliced as `'"'"'`.
pub fn quote(word: &str) -> Cow<'_, str> {
    if word.is_empty() {
        return Cow::Borrowed("''");
    }

    if word.chars().all(is_safe) {
        return Cow::Borrowed(word);
    }

    Cow::Owned(format!("'{}'", word.replace('\'', r#"'"'"'"#)))
}

/// Quotes every word and joins them with single spaces.
pub fn join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| quote(w.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}
