//! Palette strings: `{title_legend},name,alias;{group_legend},my_group`.
//!
//! Fields are separated by `,`, legend blocks by `;`. Matching works on whole
//! tokens so `my_group` never matches inside `my_group_extra`.

const SEPARATORS: [char; 2] = [',', ';'];

/// Iterate `(offset, token)` pairs in palette order, skipping empty tokens.
fn spans(palette: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut start = 0;
    palette
        .split(SEPARATORS)
        .map(move |token| {
            let offset = start;
            start += token.len() + 1;
            (offset, token)
        })
        .filter(|(_, token)| !token.trim().is_empty())
}

/// Whether `token` appears as a whole token.
pub fn contains_token(palette: &str, token: &str) -> bool {
    spans(palette).any(|(_, t)| t.trim() == token)
}

/// Replace the first whole-token occurrence of `token`.
///
/// Returns `None` when the token is not present.
pub fn replace_token(palette: &str, token: &str, replacement: &str) -> Option<String> {
    let (offset, raw) = spans(palette).find(|(_, t)| t.trim() == token)?;
    let lead = raw.len() - raw.trim_start().len();
    let start = offset + lead;
    let end = start + token.len();

    let mut out = String::with_capacity(palette.len() + replacement.len());
    out.push_str(&palette[..start]);
    out.push_str(replacement);
    out.push_str(&palette[end..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_empty_tokens_and_legends() {
        let palette = "{title_legend},name,alias;{group_legend:hide},my_group;";
        assert!(contains_token(palette, "{group_legend:hide}"));
        assert!(contains_token(palette, "my_group"));
        assert!(!contains_token(palette, ""));
    }

    #[test]
    fn replaces_whole_token_only() {
        let palette = "{legend},my_group_extra,my_group;other";
        assert_eq!(
            replace_token(palette, "my_group", "a,b").as_deref(),
            Some("{legend},my_group_extra,a,b;other")
        );
        assert!(contains_token(palette, "my_group_extra"));
        assert!(!contains_token(palette, "my_gro"));
    }

    #[test]
    fn replaces_first_occurrence_only() {
        assert_eq!(
            replace_token("x,y;x", "x", "z").as_deref(),
            Some("z,y;x")
        );
    }

    #[test]
    fn missing_token_is_none() {
        assert_eq!(replace_token("{legend},foobar", "my_group", "a"), None);
        assert_eq!(replace_token("", "my_group", "a"), None);
    }

    #[test]
    fn keeps_surrounding_whitespace() {
        assert_eq!(
            replace_token("a, my_group ,b", "my_group", "x").as_deref(),
            Some("a, x ,b")
        );
    }
}
