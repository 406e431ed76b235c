/// Build the data-check-string signed by the identity provider.
///
/// Fields are sorted by name, rendered as `name=value` and joined with `\n`.
/// The field named `excluding` (the hash itself) is left out and trailing
/// whitespace is trimmed from the result.
///
/// # Arguments
/// * `fields` - `(name, value)` pairs in any order
/// * `excluding` - Name of the field carrying the claimed hash
///
/// # Returns
/// Canonical check string, empty when no fields remain
pub fn build_check_string<'a, I>(fields: I, excluding: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut entries: Vec<(&str, &str)> = fields
        .into_iter()
        .filter(|(name, _)| *name != excluding)
        .collect();
    // Sorting on the whole pair keeps the output stable even for duplicate names.
    entries.sort_unstable();

    let check_string = entries
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("\n");

    check_string.trim_end().to_string()
}
