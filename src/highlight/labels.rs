//! Quick labels
//!
//! A fixed bank of colour styles the user can apply to a selection without
//! authoring a pattern.

use super::color::{Color, ColorPair};
use super::rule::PatternRule;

/// Number of quick label slots
pub const QUICK_LABEL_COUNT: usize = 9;

/// One-click colour label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickLabel {
    pub name: String,
    pub colors: ColorPair,
    /// Whether the label takes part in "next colour" cycling
    pub use_in_cycle: bool,
}

impl QuickLabel {
    pub fn new(name: &str, fore: Color, back: Color, use_in_cycle: bool) -> Self {
        Self {
            name: name.to_string(),
            colors: ColorPair::new(fore, back),
            use_in_cycle,
        }
    }

    /// Name given to slot `index` (zero based) when none is stored
    pub fn default_name(index: usize) -> String {
        format!("Color label {}", index + 1)
    }

    /// Literal, match-only highlighter for `text` in this label's colours
    pub fn highlighter_for(&self, text: &str, ignore_case: bool) -> PatternRule {
        let (fore, back) = (self.colors.fore, self.colors.back);
        let mut rule = PatternRule::new(text, ignore_case, true, fore, back);
        rule.set_use_regex(false);
        rule
    }
}

const DEFAULT_COLORS: [(Color, Color); QUICK_LABEL_COUNT] = [
    (Color::rgb(0x00, 0x1e, 0x80), Color::rgb(0xa1, 0xb7, 0xff)),
    (Color::rgb(0x80, 0x00, 0x5d), Color::rgb(0xff, 0xa1, 0xc6)),
    (Color::rgb(0x0f, 0x80, 0x00), Color::rgb(0xac, 0xff, 0xa1)),
    (Color::rgb(0x80, 0x60, 0x00), Color::rgb(0xff, 0xe8, 0xa1)),
    (Color::rgb(0x42, 0x00, 0x80), Color::rgb(0xd2, 0xa1, 0xff)),
    (Color::rgb(0x00, 0x7f, 0x80), Color::rgb(0xa1, 0xfe, 0xff)),
    (Color::rgb(0x00, 0x4e, 0x80), Color::rgb(0xa1, 0xdb, 0xff)),
    (Color::rgb(0x12, 0x00, 0x80), Color::rgb(0xa2, 0x9c, 0xcf)),
    // Last slot keeps the viewer's text colour on a gray background
    (Color::rgba(0, 0, 0, 0), Color::rgb(0xa0, 0xa0, 0xa4)),
];

/// Built-in labels in their published order
pub fn default_quick_labels() -> Vec<QuickLabel> {
    DEFAULT_COLORS
        .iter()
        .enumerate()
        .map(|(i, (fore, back))| QuickLabel::new(&QuickLabel::default_name(i), *fore, *back, true))
        .collect()
}

/// Pad with defaults or truncate so exactly `QUICK_LABEL_COUNT` remain
pub fn normalize_quick_labels(mut labels: Vec<QuickLabel>) -> Vec<QuickLabel> {
    if labels.len() != QUICK_LABEL_COUNT {
        log::warn!("got {} quick labels, expected {}", labels.len(), QUICK_LABEL_COUNT);
    }

    if labels.len() < QUICK_LABEL_COUNT {
        let missing = default_quick_labels().into_iter().skip(labels.len());
        labels.extend(missing);
    } else {
        labels.truncate(QUICK_LABEL_COUNT);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let labels = default_quick_labels();
        assert_eq!(labels.len(), QUICK_LABEL_COUNT);
        assert_eq!(labels[0].name, "Color label 1");
        assert_eq!(labels[0].colors.fore.to_hex_argb(), "#ff001e80");
        assert_eq!(labels[8].name, "Color label 9");
        assert!(!labels[8].colors.fore.is_valid());
        assert!(labels.iter().all(|l| l.use_in_cycle));
    }

    #[test]
    fn test_pad_short_list() {
        let stored = vec![
            QuickLabel::new("one", Color::rgb(1, 1, 1), Color::rgb(2, 2, 2), false),
            QuickLabel::new("two", Color::rgb(3, 3, 3), Color::rgb(4, 4, 4), true),
            QuickLabel::new("three", Color::rgb(5, 5, 5), Color::rgb(6, 6, 6), true),
        ];
        let labels = normalize_quick_labels(stored.clone());

        assert_eq!(labels.len(), QUICK_LABEL_COUNT);
        assert_eq!(&labels[..3], &stored[..]);
        assert_eq!(&labels[3..], &default_quick_labels()[3..]);
    }

    #[test]
    fn test_truncate_long_list() {
        let stored: Vec<_> = (0..12)
            .map(|i| {
                let name = format!("label {}", i);
                QuickLabel::new(&name, Color::rgb(i, i, i), Color::default(), true)
            })
            .collect();
        let labels = normalize_quick_labels(stored);

        assert_eq!(labels.len(), QUICK_LABEL_COUNT);
        assert_eq!(labels[8].name, "label 8");
    }

    #[test]
    fn test_highlighter_for_is_literal() {
        let label = &default_quick_labels()[2];
        let mut rule = label.highlighter_for("a+b", false);

        assert!(rule.match_only_text());
        assert!(!rule.use_regex());
        assert_eq!(rule.match_line("a+b aab").len(), 1);
        assert_eq!(rule.fore_color(), label.colors.fore);
    }
}
