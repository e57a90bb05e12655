//! Text measurement and truncation heuristics.
//!
//! None of the drawing backends report text extents up front, so layout works
//! from an average glyph width instead.

/// Estimate the pixel width of `text` rendered at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> f32 {
    (text.chars().count() as f32 * font_px as f32 * 0.60).ceil()
}

/// Truncate to fit `max_px`, ending with a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: f32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = text.chars().collect();
    while !out.is_empty() {
        out.pop();
        let candidate = format!("{}…", out.trim_end());
        if estimate_text_width_px(&candidate, font_px) <= max_px {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("League", 12, 200.0), "League");
    }

    #[test]
    fn long_text_gets_one_ellipsis() {
        let t = truncate_to_width("Los Angeles Angels of Anaheim", 12, 100.0);
        assert!(t.ends_with('…'));
        assert_eq!(t.matches('…').count(), 1);
        assert!(estimate_text_width_px(&t, 12) <= 100.0);
    }

    #[test]
    fn nothing_fits() {
        assert_eq!(truncate_to_width("Boston", 12, 3.0), "");
    }
}
