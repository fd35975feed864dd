//! Camel-case naming for hook identifiers.
//!
//! Hook names such as `onBeforeMelt` are derived from a prefix and a state or
//! transition name. The names are only used for event payloads, diagnostics
//! and collision checks; dispatch itself goes through [`Hook`](super::Hook).

/// Convert a capital, dash, underscore or mixed-case label to camelCase.
///
/// ```rust
/// use lifecycle_fsm::lifecycle::camelize;
///
/// assert_eq!(camelize("WORD"), "word");
/// assert_eq!(camelize("word-with-dash"), "wordWithDash");
/// assert_eq!(camelize("word_with_underscore"), "wordWithUnderscore");
/// assert_eq!(camelize("word-with--multi---dash"), "wordWithMultiDash");
/// assert_eq!(camelize("onBefore"), "onBefore");
/// ```
pub fn camelize(label: &str) -> String {
    let words = split_words(label);
    let mut words = words.iter();

    let Some(first) = words.next() else {
        return String::new();
    };

    let mut result = first.to_lowercase();
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            result.extend(head.to_uppercase());
            result.push_str(&chars.as_str().to_lowercase());
        }
    }
    result
}

/// Join `prefix` and `label` into one camelCase identifier.
///
/// ```rust
/// use lifecycle_fsm::lifecycle::prepended;
///
/// assert_eq!(prepended("onBefore", "melt"), "onBeforeMelt");
/// assert_eq!(prepended("onLeave", "A"), "onLeaveA");
/// assert_eq!(prepended("on", "half-full"), "onHalfFull");
/// ```
pub fn prepended(prefix: &str, label: &str) -> String {
    let mut result = camelize(prefix);
    let label = camelize(label);
    let mut chars = label.chars();
    if let Some(head) = chars.next() {
        result.extend(head.to_uppercase());
        result.push_str(chars.as_str());
    }
    result
}

// A lowercase letter or digit followed by an uppercase run starts a new word,
// and the run is lowercased. Dashes and underscores separate words.
fn split_words(label: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    let mut in_upper_run = false;

    for c in label.chars() {
        if c == '-' || c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            in_upper_run = false;
            continue;
        }

        if c.is_uppercase() {
            if prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
                in_upper_run = true;
            }
            if in_upper_run {
                current.extend(c.to_lowercase());
            } else {
                current.push(c);
            }
            prev_lower = false;
        } else {
            in_upper_run = false;
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_lowercase_word_is_untouched() {
        assert_eq!(camelize("melt"), "melt");
    }

    #[test]
    fn embedded_capitals_split_words() {
        assert_eq!(camelize("halfFull"), "halfFull");
        assert_eq!(camelize("onAfterTransition"), "onAfterTransition");
    }

    #[test]
    fn empty_label_is_empty() {
        assert_eq!(camelize(""), "");
        assert_eq!(camelize("--"), "");
        assert_eq!(prepended("on", ""), "on");
    }

    #[test]
    fn prepended_capitalizes_label() {
        assert_eq!(prepended("on", "step"), "onStep");
        assert_eq!(prepended("onEnter", "liquid"), "onEnterLiquid");
        assert_eq!(prepended("onAfter", "init"), "onAfterInit");
    }

    #[test]
    fn prepended_normalizes_separators() {
        assert_eq!(prepended("onBefore", "go_home"), "onBeforeGoHome");
        assert_eq!(prepended("onLeave", "STATE"), "onLeaveState");
    }
}
