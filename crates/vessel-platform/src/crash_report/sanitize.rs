use regex::Regex;

// More specific patterns first, generic last.
const PATTERNS: &[&str] = &[
    r"github_pat_[a-zA-Z0-9_]+",
    r"gh[pousr]_[a-zA-Z0-9]{16,}",
    r"Bearer [a-zA-Z0-9._\-]+",
    r"(?i)((?:key|token|secret|password)=)[a-zA-Z0-9]{32,}",
];

/// Redacts tokens and generic `key=`/`token=`/`secret=`/`password=` values
/// with `[REDACTED]`.
pub fn sanitize_secrets(input: &str) -> String {
    let mut result = input.to_string();

    for pattern in PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        let replacement = if re.captures_len() > 1 {
            "${1}[REDACTED]"
        } else {
            "[REDACTED]"
        };
        result = re.replace_all(&result, replacement).into_owned();
    }

    result
}
