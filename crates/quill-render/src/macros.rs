//! Fixed macro dictionary for common shorthand notation.
//!
//! Macros are expanded textually before the LaTeX parser runs. The table
//! is fixed: blackboard-bold letter sets, bold vector/matrix notation, and
//! transpose. Expansion is bounded by a total substitution count so that
//! pathological input cannot loop, but there is no cap on output size -
//! legitimately large expressions must not be rejected.

/// Shorthand macros available in all math spans.
pub const MACROS: &[(&str, &str)] = &[
    ("RR", r"\mathbb{R}"),
    ("NN", r"\mathbb{N}"),
    ("ZZ", r"\mathbb{Z}"),
    ("CC", r"\mathbb{C}"),
    ("QQ", r"\mathbb{Q}"),
    ("vec", r"\boldsymbol"),
    ("mat", r"\boldsymbol"),
    ("T", r"^\top"),
];

/// Maximum number of macro substitutions per expansion.
pub const MAX_EXPANSIONS: usize = 1000;

/// Expand the fixed macro table in `source`.
///
/// A macro invocation is a backslash followed by the macro name, where the
/// next character is not a letter (so `\Tr` is not a use of `\T`). Macro
/// names are matched longest-first. Once the substitution budget is spent
/// the remaining input is passed through untouched.
pub fn expand_macros(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut budget = MAX_EXPANSIONS;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if budget == 0 {
            break;
        }

        match match_macro(&rest[1..]) {
            Some((name, replacement)) => {
                out.push_str(replacement);
                rest = &rest[1 + name.len()..];
                budget -= 1;
            }
            None => {
                // Not one of ours: emit the backslash and the escaped char
                // verbatim so `\$` or `\\` never re-match.
                out.push('\\');
                rest = &rest[1..];
                if let Some(ch) = rest.chars().next() {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
    }

    out.push_str(rest);
    out
}

fn match_macro(after_backslash: &str) -> Option<(&'static str, &'static str)> {
    let mut best: Option<(&'static str, &'static str)> = None;
    for &(name, replacement) in MACROS {
        if after_backslash.starts_with(name) {
            let next = after_backslash[name.len()..].chars().next();
            if next.is_some_and(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            if best.is_none_or(|(b, _)| name.len() > b.len()) {
                best = Some((name, replacement));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_blackboard_sets() {
        assert_eq!(expand_macros(r"x \in \RR"), r"x \in \mathbb{R}");
        assert_eq!(expand_macros(r"\NN \subset \ZZ"), r"\mathbb{N} \subset \mathbb{Z}");
    }

    #[test]
    fn expands_transpose() {
        assert_eq!(expand_macros(r"A\T"), r"A^\top");
    }

    #[test]
    fn expands_vec_and_mat() {
        assert_eq!(expand_macros(r"\vec{x} + \mat{A}"), r"\boldsymbol{x} + \boldsymbol{A}");
    }

    #[test]
    fn longer_name_wins_over_prefix() {
        // \Tr must not be read as \T followed by 'r'.
        assert_eq!(expand_macros(r"\Tr(A)"), r"\Tr(A)");
    }

    #[test]
    fn unknown_macros_untouched() {
        assert_eq!(expand_macros(r"\frac{a}{b}"), r"\frac{a}{b}");
    }

    #[test]
    fn escaped_chars_pass_through() {
        assert_eq!(expand_macros(r"\\RR"), r"\\RR");
        assert_eq!(expand_macros(r"\$5"), r"\$5");
    }

    #[test]
    fn expansion_budget_bounds_work() {
        let many = r"\RR ".repeat(MAX_EXPANSIONS + 50);
        let out = expand_macros(&many);
        // The first MAX_EXPANSIONS uses expand, the tail passes through.
        assert_eq!(out.matches(r"\mathbb{R}").count(), MAX_EXPANSIONS);
        assert!(out.contains(r"\RR"));
    }
}
