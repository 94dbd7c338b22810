/// Normalizes a `q` query parameter: blank means "no filter".
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|q| !q.is_empty())
}

/// Lowercases and drops Spanish diacritics, so comparisons agree with the
/// accent- and case-insensitive collation of the MySQL tables.
pub fn fold(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            c => c,
        })
        .collect()
}

/// Case- and accent-insensitive substring match against any of `fields`,
/// the rule the dashboard search applies to name, cedula and department.
pub fn matches_any(term: &str, fields: &[&str]) -> bool {
    let needle = fold(term);
    fields.iter().any(|f| fold(f).contains(&needle))
}

/// Wraps `term` for a `LIKE` comparison. Wildcards in user input are escaped
/// with backslash, MySQL's default `LIKE` escape character.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
