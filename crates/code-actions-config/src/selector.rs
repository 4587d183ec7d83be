/// Split a language selector key into language identifiers.
///
/// `"python"`, `"python,go"` and `"[python, go]"` are all accepted. Empty parts are ignored.
pub fn parse_language_selector(key: &str) -> Vec<String> {
    let key = key.trim();
    let key = key
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(key);

    key.split(',')
        .map(str::trim)
        .filter(|language| !language.is_empty())
        .map(str::to_string)
        .collect()
}
