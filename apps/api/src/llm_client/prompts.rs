// Shared prompt-building utilities.
// Each orchestrator that needs LLM calls defines its own prompts.rs alongside it.

/// Substitutes `{key}` placeholders in one pass.
///
/// Substituted values are never rescanned, so user input that happens to
/// contain `{city}` or similar stays literal. Unknown placeholders are left
/// as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find_map(|(key, value)| {
            let placeholder_len = key.len() + 2;
            let matches = tail.len() >= placeholder_len
                && tail[1..].starts_with(key)
                && tail[1 + key.len()..].starts_with('}');
            matches.then_some((placeholder_len, *value))
        });
        match hit {
            Some((len, value)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
