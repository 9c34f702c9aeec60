/// Prefix of an environment placeholder.
pub const PLACEHOLDER_OPEN: &str = "${";

/// Replace `${ENV_VAR}` placeholders with values from the process environment.
///
/// Unresolvable variables are left as-is so validation can report them.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace `${ENV_VAR}` placeholders using a custom lookup function.
///
/// Empty values count as unresolved.
pub fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        result.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_OPEN.len()..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name).filter(|v| !v.is_empty()) {
                    Some(value) => result.push_str(&value),
                    None => result.push_str(&rest[start..start + PLACEHOLDER_OPEN.len() + end + 1]),
                }
                rest = &after[end + 1..];
            },
            // Malformed or empty placeholder: emit literally.
            _ => {
                result.push_str(PLACEHOLDER_OPEN);
                rest = after;
            },
        }
    }
    result.push_str(rest);
    result
}

/// True when `value` is empty or still carries an unresolved placeholder.
#[must_use]
pub fn is_unresolved(value: &str) -> bool {
    value.trim().is_empty() || value.contains(PLACEHOLDER_OPEN)
}
