/// Reduce a template name to a storage-safe identifier.
///
/// Keeps ASCII alphanumerics, '-' and '_', turns spaces into '_', and drops
/// everything else. Returns `None` when nothing survives.
pub fn sanitize_name(name: &str) -> Option<String> {
    let safe: String = name
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            ' ' => Some('_'),
            _ => None,
        })
        .collect();

    if safe.is_empty() { None } else { Some(safe) }
}
