//! SRT cue documents: parsing, re-emission, and transcript cleaning.
//!
//! Shared by both acquisition paths: fetched caption files are parsed into a
//! [`SubtitleDocument`], transcription output is converted into one, and the
//! cleaning step projects either onto plain transcript text.

use std::fmt;

/// One timed subtitle entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cue {
    /// 1-based sequence number, informational only
    pub index: usize,
    /// Time-range line, kept verbatim (`HH:MM:SS,mmm --> HH:MM:SS,mmm`)
    pub time_range: String,
    /// Cue text, possibly spanning multiple lines
    pub text: String,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.time_range)?;
        writeln!(f, "{}", self.text.trim_end())?;
        writeln!(f)
    }
}

/// Ordered sequence of cues; order equals original presentation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    pub cues: Vec<Cue>,
}

impl SubtitleDocument {
    /// Parse SRT text into a document.
    ///
    /// Blocks are separated by blank lines. A block is kept only when it has
    /// at least three lines and its first line parses as an integer; line 2
    /// is retained verbatim as the time range. Anything else is dropped
    /// without a diagnostic.
    pub fn parse(raw: &str) -> Self {
        let mut cues = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in raw.lines().chain(std::iter::once("")) {
            if line.trim().is_empty() {
                cues.extend(parse_block(&block));
                block.clear();
            } else {
                block.push(line);
            }
        }

        Self { cues }
    }

    /// Emit the document back as SRT text: index line, time-range line, text
    /// trimmed of trailing whitespace, then a blank separator line per cue.
    pub fn serialize(&self) -> String {
        self.cues.iter().map(Cue::to_string).collect()
    }

    /// Project the document onto plain transcript text: cue texts in order,
    /// one line break between cues, no timing or index information. Line
    /// breaks inside a cue's text are preserved.
    pub fn clean(&self) -> String {
        self.cues
            .iter()
            .map(|cue| cue.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

fn parse_block(lines: &[&str]) -> Option<Cue> {
    let [index_line, time_range, text @ ..] = lines else {
        return None;
    };

    if text.is_empty() {
        return None;
    }

    let index: usize = index_line.trim().parse().ok()?;

    Some(Cue {
        index,
        time_range: (*time_range).to_string(),
        text: text.join("\n"),
    })
}
