// Display-width text helpers
//
// Column layout in the node list needs widths in terminal cells, not
// chars or bytes.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate or pad `s` to exactly `width` terminal cells
///
/// Truncated text ends with `…`. Wide characters that would straddle the
/// boundary are dropped and the gap is padded.
pub fn fit_width(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let full = UnicodeWidthStr::width(s);
    if full <= width {
        let mut out = s.to_string();
        out.push_str(&" ".repeat(width - full));
        return out;
    }

    let budget = width - 1;
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pads_short_text() {
        assert_eq!(fit_width("OKX", 6), "OKX   ");
    }

    #[test]
    fn test_truncates_long_text() {
        assert_eq!(fit_width("Coinbase Pro", 8), "Coinbas…");
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn test_wide_characters() {
        // each CJK char is two cells wide
        assert_eq!(fit_width("東京都", 4), "東… ");
        assert_eq!(UnicodeWidthStr::width(fit_width("東京都", 4).as_str()), 4);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_result_has_exact_width(s in "[a-zA-Z東京 ]{0,20}", width in 1usize..30) {
            prop_assert_eq!(UnicodeWidthStr::width(fit_width(&s, width).as_str()), width);
        }
    }
}
