//! Single highlighter rule
//!
//! A `PatternRule` pairs a user pattern with a colour pair. It owns its
//! compiled regex and rebuilds it lazily after any change to the pattern or
//! the flags that shape it.

use regex::{Regex, RegexBuilder};

use super::color::{Color, ColorPair};
use super::matcher::ExpressionPattern;

/// Default colour variance for new and deserialized highlighters
pub const DEFAULT_COLOR_VARIANCE: u8 = 15;

/// A coloured range within a line
///
/// `column` and `length` are byte offsets into the matched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightedMatch {
    pub column: usize,
    pub length: usize,
    pub fore: Color,
    pub back: Color,
}

impl HighlightedMatch {
    pub fn new(column: usize, length: usize, colors: ColorPair) -> Self {
        Self {
            column,
            length,
            fore: colors.fore,
            back: colors.back,
        }
    }

    /// Byte offset one past the end of the range
    pub fn end(&self) -> usize {
        self.column + self.length
    }
}

/// Compiled state of a rule's pattern
#[derive(Debug, Clone, Default)]
enum Compiled {
    #[default]
    Uncompiled,
    Ready(Regex),
    Invalid,
}

/// One user-defined highlighter
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: String,
    ignore_case: bool,
    use_regex: bool,
    match_only_text: bool,
    variate_colors: bool,
    color_variance: u8,
    colors: ColorPair,
    compiled: Compiled,
}

impl Default for PatternRule {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            ignore_case: false,
            use_regex: true,
            match_only_text: false,
            variate_colors: false,
            color_variance: DEFAULT_COLOR_VARIANCE,
            colors: ColorPair::default(),
            compiled: Compiled::Uncompiled,
        }
    }
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.ignore_case == other.ignore_case
            && self.use_regex == other.use_regex
            && self.match_only_text == other.match_only_text
            && self.variate_colors == other.variate_colors
            && self.color_variance == other.color_variance
            && self.colors == other.colors
    }
}

impl Eq for PatternRule {}

impl PatternRule {
    /// Create a regex highlighter
    pub fn new(
        pattern: &str,
        ignore_case: bool,
        match_only_text: bool,
        fore: Color,
        back: Color,
    ) -> Self {
        log::debug!("new highlighter, fore: {} back: {}", fore, back);
        Self {
            pattern: pattern.to_string(),
            ignore_case,
            match_only_text,
            colors: ColorPair::new(fore, back),
            ..Default::default()
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
        self.invalidate();
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.ignore_case = ignore_case;
        self.invalidate();
    }

    pub fn use_regex(&self) -> bool {
        self.use_regex
    }

    pub fn set_use_regex(&mut self, use_regex: bool) {
        self.use_regex = use_regex;
        self.invalidate();
    }

    /// Whether only the matched text is coloured (otherwise the whole line)
    pub fn match_only_text(&self) -> bool {
        self.match_only_text
    }

    pub fn set_match_only_text(&mut self, match_only_text: bool) {
        self.match_only_text = match_only_text;
    }

    pub fn variate_colors(&self) -> bool {
        self.variate_colors
    }

    pub fn set_variate_colors(&mut self, variate_colors: bool) {
        self.variate_colors = variate_colors;
    }

    pub fn color_variance(&self) -> u8 {
        self.color_variance
    }

    /// Set the variance percentage, clamped to `0..=100`
    pub fn set_color_variance(&mut self, color_variance: i64) {
        self.color_variance = color_variance.clamp(0, 100) as u8;
    }

    pub fn fore_color(&self) -> Color {
        self.colors.fore
    }

    pub fn set_fore_color(&mut self, color: Color) {
        self.colors.fore = color;
    }

    pub fn back_color(&self) -> Color {
        self.colors.back
    }

    pub fn set_back_color(&mut self, color: Color) {
        self.colors.back = color;
    }

    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Whether a compiled matcher is cached
    pub fn is_compiled(&self) -> bool {
        !matches!(self.compiled, Compiled::Uncompiled)
    }

    /// Pattern source as fed to the regex engine
    pub fn effective_pattern(&self) -> String {
        if self.use_regex {
            self.pattern.clone()
        } else {
            regex::escape(&self.pattern)
        }
    }

    /// Description of this rule for a batch prefilter
    pub fn expression_pattern(&self) -> ExpressionPattern {
        ExpressionPattern {
            pattern: self.effective_pattern(),
            case_sensitive: !self.ignore_case,
            is_prefilter: true,
        }
    }

    fn invalidate(&mut self) {
        self.compiled = Compiled::Uncompiled;
    }

    /// Build and cache the matcher for the current pattern and flags
    pub fn compile(&mut self) {
        let source = self.effective_pattern();
        self.compiled = match RegexBuilder::new(&source)
            .case_insensitive(self.ignore_case)
            .build()
        {
            Ok(regex) => Compiled::Ready(regex),
            Err(e) => {
                log::warn!("highlighter pattern {:?} is invalid: {}", self.pattern, e);
                Compiled::Invalid
            }
        };
    }

    /// Colour every occurrence of the pattern in `line`
    ///
    /// Patterns with capture groups produce one range per participating,
    /// non-empty group. Otherwise every match yields a range, zero-length
    /// ones included, so `^$` matches an empty line. An invalid pattern
    /// produces nothing.
    pub fn match_line(&mut self, line: &str) -> Vec<HighlightedMatch> {
        if matches!(self.compiled, Compiled::Uncompiled) {
            self.compile();
        }
        self.match_compiled(line)
    }

    /// Same as [`match_line`](Self::match_line) but never compiles
    ///
    /// An uncompiled rule produces nothing.
    pub fn match_compiled(&self, line: &str) -> Vec<HighlightedMatch> {
        let regex = match &self.compiled {
            Compiled::Ready(regex) => regex,
            Compiled::Uncompiled | Compiled::Invalid => return Vec::new(),
        };

        let mut matches = Vec::new();
        let group_count = regex.captures_len();

        for captures in regex.captures_iter(line) {
            if group_count > 1 {
                for group in captures.iter().skip(1).flatten() {
                    if group.is_empty() {
                        continue;
                    }
                    let colors = self.variated_colors(group.as_str());
                    matches.push(HighlightedMatch::new(group.start(), group.len(), colors));
                }
            } else if let Some(whole) = captures.get(0) {
                let colors = self.variated_colors(whole.as_str());
                matches.push(HighlightedMatch::new(whole.start(), whole.len(), colors));
            }
        }

        matches
    }

    /// Colours for a matched substring
    ///
    /// Without variation (or for whole-line rules) this is the base pair.
    /// Otherwise both colours are darkened by a factor drawn from
    /// `[100 - variance, 100 + variance]` with a generator seeded by the
    /// CRC32 of the matched text.
    pub fn variated_colors(&self, matched: &str) -> ColorPair {
        if !(self.variate_colors && self.match_only_text) {
            return self.colors;
        }

        let factor = variation_factor(matched, self.color_variance);
        ColorPair::new(self.colors.fore.darker(factor), self.colors.back.darker(factor))
    }
}

/// Darkening factor for a matched substring
pub fn variation_factor(matched: &str, variance: u8) -> i32 {
    let variance = i32::from(variance.min(100));
    let seed = crc32fast::hash(matched.as_bytes());
    MinStdRand::new(seed).uniform(100 - variance, 100 + variance)
}

/// Park-Miller minimal standard generator (multiplier 16807)
struct MinStdRand {
    state: u32,
}

impl MinStdRand {
    const MODULUS: u64 = 2_147_483_647;
    const MULTIPLIER: u64 = 16_807;
    const MIN: u32 = 1;
    const MAX: u32 = (Self::MODULUS - 1) as u32;

    fn new(seed: u32) -> Self {
        let state = (u64::from(seed) % Self::MODULUS) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn next(&mut self) -> u32 {
        self.state = ((u64::from(self.state) * Self::MULTIPLIER) % Self::MODULUS) as u32;
        self.state
    }

    /// Uniform integer in `low..=high` by rejection-free downscaling
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        let generator_range = u64::from(Self::MAX - Self::MIN);
        let range = (high - low) as u64 + 1;
        let scaling = generator_range / range;
        let past = range * scaling;

        let mut value = u64::from(self.next() - Self::MIN);
        while value >= past {
            value = u64::from(self.next() - Self::MIN);
        }
        low + (value / scaling) as i32
    }
}
