use lazy_static::lazy_static;
use regex::Regex;

/// Seconds a line is shown ahead of its timestamp.
pub const LEAD_IN_SECS: f64 = 1.0;

lazy_static! {
    static ref TIME_TAG: Regex = Regex::new(r"\[(\d{2}):(\d{2}\.\d{2})\](.*)").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track, lead-in already applied.
    pub time: f64,
    pub text: String,
}

/// Parses `[MM:SS.CC]text` lines. Lines without a time tag are dropped and
/// the result is ordered by time. Duplicate times are kept.
pub fn parse_lrc(text: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = text.lines().filter_map(parse_line).collect();
    lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    lines
}

fn parse_line(line: &str) -> Option<LyricLine> {
    let captures = TIME_TAG.captures(line)?;
    let minutes: f64 = captures[1].parse().ok()?;
    let seconds: f64 = captures[2].parse().ok()?;
    let time = minutes * 60.0 + seconds;

    Some(LyricLine {
        time: (time - LEAD_IN_SECS).max(0.0),
        text: captures[3].trim().to_string(),
    })
}

/// Index of the line to highlight at `progress_secs`: the last line whose time
/// has been reached. `None` while the first line is still ahead.
pub fn active_line(lines: &[LyricLine], progress_secs: f64) -> Option<usize> {
    match lines.iter().position(|line| line.time > progress_secs) {
        None => lines.len().checked_sub(1),
        Some(0) => None,
        Some(next) => Some(next - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_at(times: &[f64]) -> Vec<LyricLine> {
        times
            .iter()
            .map(|&time| LyricLine {
                time,
                text: format!("at {time}"),
            })
            .collect()
    }

    #[test]
    fn parses_tagged_lines_and_drops_the_rest() {
        let lines = parse_lrc("[00:01.50]Hello\n[00:10.00]World\nNotALyricLine");

        assert_eq!(
            lines,
            vec![
                LyricLine {
                    time: 0.5,
                    text: "Hello".to_string()
                },
                LyricLine {
                    time: 9.0,
                    text: "World".to_string()
                },
            ]
        );
    }

    #[test]
    fn lead_in_is_floored_at_zero() {
        let lines = parse_lrc("[00:00.40]Intro");
        assert_eq!(lines[0].time, 0.0);
    }

    #[test]
    fn minutes_are_added() {
        let lines = parse_lrc("[02:03.25] Chorus  ");
        assert_eq!(lines[0].time, 122.25);
        assert_eq!(lines[0].text, "Chorus");
    }

    #[test]
    fn out_of_order_and_duplicate_lines_are_sorted_not_filtered() {
        let lines = parse_lrc("[00:20.00]c\n[00:05.00]a\n[00:05.00]b\n[00:12.00]b");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "b", "c"]);
    }

    #[test]
    fn malformed_tags_are_ignored() {
        let lines = parse_lrc("[0:01.50]short\n[00:01]no fraction\n[ar:Artist]\n");
        assert!(lines.is_empty());
    }

    #[test]
    fn empty_text_lines_are_kept() {
        let lines = parse_lrc("[00:03.00]\n[00:04.00]next");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "");
    }

    #[test]
    fn active_line_follows_progress() {
        let lines = lines_at(&[0.0, 5.0, 10.0]);
        assert_eq!(active_line(&lines, 6.0), Some(1));
        assert_eq!(active_line(&lines, 0.0), Some(0));
        assert_eq!(active_line(&lines, 20.0), Some(2));
        assert_eq!(active_line(&lines, 5.0), Some(1));
    }

    #[test]
    fn no_active_line_before_the_first_one() {
        let lines = lines_at(&[3.0, 8.0]);
        assert_eq!(active_line(&lines, 1.0), None);
        assert_eq!(active_line(&[], 1.0), None);
    }
}
