use crate::constants::{DEFAULT_CHUNK_MAX_CHARS, DEFAULT_CHUNK_MIN_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Upper bound on characters per chunk. Default: `1000`.
    pub max_chars: usize,
    /// Paragraphs shorter than this merge into the next one. Default: `40`.
    pub min_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_CHUNK_MAX_CHARS,
            min_chars: DEFAULT_CHUNK_MIN_CHARS,
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chars < 2 {
            return Err(format!(
                "max_chars must be at least 2, got {}",
                self.max_chars
            ));
        }
        if self.min_chars >= self.max_chars {
            return Err(format!(
                "min_chars ({}) must be smaller than max_chars ({})",
                self.min_chars, self.max_chars
            ));
        }
        Ok(())
    }
}

/// Splits document text into paragraph-aligned chunks.
///
/// Paragraphs are separated by blank lines. Short paragraphs (headings, lone
/// titles) are merged forward so they travel with the content they introduce.
/// Paragraphs longer than `max_chars` are packed line by line; each such window
/// repeats the last line of its predecessor for continuity.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk texts in document order. Empty when `text` has no visible content.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        for unit in self.merge_short(paragraphs(text)) {
            let joined = unit.join("\n");
            if char_len(&joined) <= self.config.max_chars {
                chunks.push(joined);
            } else {
                chunks.extend(self.pack_lines(unit));
            }
        }
        chunks
    }

    fn merge_short(&self, paragraphs: Vec<Vec<String>>) -> Vec<Vec<String>> {
        let mut units: Vec<Vec<String>> = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for paragraph in paragraphs {
            pending.extend(paragraph);
            if lines_len(&pending) >= self.config.min_chars {
                units.push(std::mem::take(&mut pending));
            }
        }

        if !pending.is_empty() {
            match units.last_mut() {
                Some(last) => last.extend(pending),
                None => units.push(pending),
            }
        }

        units
    }

    fn pack_lines(&self, lines: Vec<String>) -> Vec<String> {
        let max = self.config.max_chars;
        let pieces: Vec<String> = lines
            .into_iter()
            .flat_map(|line| split_long_line(&line, max))
            .collect();

        let mut windows = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for piece in pieces {
            if !current.is_empty() && lines_len(&current) + 1 + char_len(&piece) > max {
                let carried = current.last().cloned();
                windows.push(current.join("\n"));
                current = match carried {
                    Some(line) if char_len(&line) + 1 + char_len(&piece) <= max => vec![line],
                    _ => Vec::new(),
                };
            }
            current.push(piece);
        }
        if !current.is_empty() {
            windows.push(current.join("\n"));
        }

        windows
    }
}

/// Blank-line separated paragraphs, each as trimmed, whitespace-collapsed lines.
fn paragraphs(text: &str) -> Vec<Vec<String>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for raw in text.lines() {
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Breaks a line longer than `max` chars at whitespace; a single overlong word
/// is cut at character boundaries.
fn split_long_line(line: &str, max: usize) -> Vec<String> {
    if char_len(line) <= max {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word = word.to_string();
        while char_len(&word) > max {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            let cut = word
                .char_indices()
                .nth(max)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            pieces.push(word[..cut].to_string());
            word = word[cut..].to_string();
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            char_len(&word)
        } else {
            char_len(&current) + 1 + char_len(&word)
        };
        if needed > max {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Length of `lines` joined with single newlines.
fn lines_len(lines: &[String]) -> usize {
    let chars: usize = lines.iter().map(|l| char_len(l)).sum();
    chars + lines.len().saturating_sub(1)
}
