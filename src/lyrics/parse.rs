use crate::lyrics::types::LyricLine;
use once_cell::sync::Lazy;
use regex::Regex;

static SYNCED_LYRICS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]+):([0-9]+)\.([0-9]+)\]").expect("static lyric tag regex"));

/// Time-sorted sequence of lyric lines parsed from LRC text.
///
/// Lines are ordered by timestamp; lines sharing a timestamp keep the order
/// they appeared in the source text. A document may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricDocument {
    lines: Vec<LyricLine>,
}

impl LyricDocument {
    /// Parse time-synced lyrics. Lines without a `[MM:SS.fff]` tag are
    /// skipped; a line carrying several tags yields one entry per tag.
    pub fn parse(synced: &str) -> Self {
        let re = &SYNCED_LYRICS_RE;
        let mut lines = Vec::new();
        for line in synced.lines() {
            let matches: Vec<_> = re.captures_iter(line).collect();
            if matches.is_empty() {
                continue;
            }
            let text = re.replace_all(line, "").trim().to_string();
            for cap in matches {
                let field = |i: usize| cap.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
                let (Some(min), Some(sec), Some(ms)) = (field(1), field(2), field(3)) else {
                    continue;
                };
                let time = min as f64 * 60.0 + sec as f64 + ms as f64 / 1000.0;
                lines.push(LyricLine {
                    time,
                    text: text.clone(),
                });
            }
        }
        // `sort_by` is stable, so equal timestamps keep source order.
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { lines }
    }

    /// Text of the last line whose timestamp is `<= position`, or `""` when
    /// the position precedes every line.
    pub fn line_at(&self, position: f64) -> &str {
        let idx = self.lines.partition_point(|line| line.time <= position);
        match idx {
            0 => "",
            i => &self.lines[i - 1].text,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
