use regex::{Captures, Regex};
use std::sync::LazyLock;

static LEADING_EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)\p{Extended_Pictographic}").expect("leading emoji pattern is valid")
});
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Extended_Pictographic}").expect("emoji pattern is valid")
});
// Variation selectors, zero-width joiner and skin tone modifiers left behind
static EMOJI_EXTRAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{FE0E}\x{FE0F}\x{200D}]|\p{Emoji_Modifier}")
        .expect("emoji extras pattern is valid")
});
static LEADING_LOWERCASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(\p{Ll})").expect("leading lowercase pattern is valid")
});

/// Make chat text friendlier to a speech engine.
///
/// A leading emoji becomes a dash (it usually stands in for a bullet), all
/// other emoji are dropped, the first letter is capitalized and a final
/// period is added so the voice ends on a falling tone.
pub fn preprocess_text(input: &str) -> String {
    let output = LEADING_EMOJI.replace(input, "${1}-");
    let output = EMOJI.replace_all(&output, "");
    let output = EMOJI_EXTRAS.replace_all(&output, "");
    let output = capitalize_leading_lowercase(&output);
    ensure_trailing_dot(&output)
}

fn capitalize_leading_lowercase(value: &str) -> String {
    LEADING_LOWERCASE
        .replace(value, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned()
}

fn ensure_trailing_dot(value: &str) -> String {
    let core = value.trim_end();
    let trailing_whitespace = &value[core.len()..];

    match core.chars().last() {
        Some(last) if last.is_alphanumeric() => format!("{}.{}", core, trailing_whitespace),
        _ => value.to_string(),
    }
}
