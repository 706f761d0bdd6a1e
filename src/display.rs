//! Colourised line output
//!
//! Maps the ranges produced by the highlighting engine onto terminal colours.
//! Ranges are painted in order, so a later range wins where two overlap.

use std::io::Write;

use crossterm::{
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::error::Result;
use crate::highlight::{Color, ColorPair, HighlightedMatchRanges, MatchKind};

/// A run of text sharing one colour pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// `None` for text no highlighter touched
    pub colors: Option<ColorPair>,
}

/// Split `line` into uniformly coloured runs
pub fn segments<'a>(
    line: &'a str,
    kind: MatchKind,
    ranges: &HighlightedMatchRanges,
) -> Vec<Segment<'a>> {
    let mut paint: Vec<Option<ColorPair>> = vec![None; line.len()];
    if kind != MatchKind::NoMatch {
        for range in ranges {
            let start = range.column.min(line.len());
            let end = range.end().min(line.len());
            let colors = ColorPair::new(range.fore, range.back);
            paint[start..end].iter_mut().for_each(|p| *p = Some(colors));
        }
    }

    let mut result: Vec<Segment<'a>> = Vec::new();
    let mut run_start = 0;
    let mut run_colors = paint.first().copied().flatten();

    for (index, _) in line.char_indices().skip(1) {
        if paint[index] != run_colors {
            result.push(Segment {
                text: &line[run_start..index],
                colors: run_colors,
            });
            run_start = index;
            run_colors = paint[index];
        }
    }
    if run_start < line.len() {
        result.push(Segment {
            text: &line[run_start..],
            colors: run_colors,
        });
    }

    result
}

fn term_color(color: Color) -> Option<TermColor> {
    color.is_valid().then_some(TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    })
}

/// Line printer over any writer
pub struct Printer<W: Write> {
    out: W,
    /// Emit terminal colours; otherwise prefix each line with its match kind
    use_color: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Print one matched line followed by a newline
    pub fn print_line(
        &mut self,
        line: &str,
        kind: MatchKind,
        ranges: &HighlightedMatchRanges,
    ) -> Result<()> {
        if !self.use_color {
            let tag = match kind {
                MatchKind::LineMatch => 'L',
                MatchKind::WordMatch => 'W',
                MatchKind::NoMatch => ' ',
            };
            writeln!(self.out, "{} {}", tag, line)?;
            return Ok(());
        }

        for segment in segments(line, kind, ranges) {
            match segment.colors {
                Some(colors) => {
                    if let Some(fore) = term_color(colors.fore) {
                        queue!(self.out, SetForegroundColor(fore))?;
                    }
                    if let Some(back) = term_color(colors.back) {
                        queue!(self.out, SetBackgroundColor(back))?;
                    }
                    queue!(self.out, Print(segment.text), ResetColor)?;
                }
                None => queue!(self.out, Print(segment.text))?,
            }
        }
        queue!(self.out, Print('\n'))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightedMatch;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn ranges(spans: &[(usize, usize, Color)]) -> HighlightedMatchRanges {
        let mut ranges = HighlightedMatchRanges::new();
        for (column, length, fore) in spans {
            let colors = ColorPair::new(*fore, Color::default());
            ranges.add_match(HighlightedMatch::new(*column, *length, colors));
        }
        ranges
    }

    #[test]
    fn test_unmatched_line_is_one_segment() {
        let result = segments("plain", MatchKind::NoMatch, &ranges(&[(0, 2, RED)]));
        assert_eq!(result, vec![Segment { text: "plain", colors: None }]);
    }

    #[test]
    fn test_word_ranges_split_the_line() {
        let spans = ranges(&[(0, 5, RED), (7, 4, BLUE)]);
        let result = segments("error: disk", MatchKind::WordMatch, &spans);
        let texts: Vec<_> = result.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["error", ": ", "disk"]);
        assert_eq!(result[0].colors.map(|c| c.fore), Some(RED));
        assert_eq!(result[1].colors, None);
        assert_eq!(result[2].colors.map(|c| c.fore), Some(BLUE));
    }

    #[test]
    fn test_later_range_paints_over() {
        let spans = ranges(&[(0, 6, RED), (2, 2, BLUE)]);
        let result = segments("abcdef", MatchKind::WordMatch, &spans);
        let texts: Vec<_> = result.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_multibyte_and_out_of_range() {
        let spans = ranges(&[(1, 2, RED), (4, 100, BLUE)]);
        let result = segments("héllo", MatchKind::WordMatch, &spans);
        let texts: Vec<_> = result.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["h", "é", "l", "lo"]);
    }

    #[test]
    fn test_plain_printer_tags_lines() {
        let mut printer = Printer::new(Vec::new(), false);
        printer.print_line("a", MatchKind::LineMatch, &ranges(&[])).unwrap();
        printer.print_line("b", MatchKind::WordMatch, &ranges(&[])).unwrap();
        printer.print_line("c", MatchKind::NoMatch, &ranges(&[])).unwrap();

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(text, "L a\nW b\n  c\n");
    }

    #[test]
    fn test_color_printer_keeps_text() {
        let mut printer = Printer::new(Vec::new(), true);
        printer
            .print_line("error: disk", MatchKind::WordMatch, &ranges(&[(0, 5, RED)]))
            .unwrap();

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert!(text.contains("error"));
        assert!(text.contains(": disk"));
        assert!(text.contains('\x1b'));
        assert!(text.ends_with('\n'));
    }
}
