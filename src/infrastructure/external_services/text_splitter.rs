/// Recursive character splitter: tries each separator in priority order,
/// falling back to the next one only for pieces still larger than the
/// chunk size, then packs adjacent pieces back together up to the chunk
/// size and carries a trailing-character overlap into the next chunk.
///
/// Splitting is purely character-based and has no hidden state, so the
/// same input and parameters always produce the same chunk sequence.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(
            DEFAULT_CHUNK_SIZE,
            DEFAULT_CHUNK_OVERLAP,
            vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        )
    }
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize, separators: Vec<String>) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators,
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        // A document already within the chunk size is one chunk, no
        // overlap involved.
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let pieces = self.atomize(text, 0);
        self.merge_pieces(pieces)
    }

    /// Breaks `text` into pieces no larger than the chunk size,
    /// recursing into finer separators only where needed. A piece that
    /// survives every configured separator is returned oversized.
    fn atomize(&self, text: &str, separator_index: usize) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some(separator) = self.separators.get(separator_index) else {
            // Indivisible run: no separator left to try.
            return vec![text.to_string()];
        };

        if separator.is_empty() {
            return self.fixed_width_pieces(text);
        }

        let parts: Vec<&str> = text.split(separator.as_str()).collect();
        if parts.len() == 1 {
            return self.atomize(text, separator_index + 1);
        }

        let mut pieces = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            // Keep the separator attached so packed chunks reassemble
            // the original text.
            let piece = if i + 1 < parts.len() {
                format!("{}{}", part, separator)
            } else {
                (*part).to_string()
            };

            if char_len(&piece) <= self.chunk_size {
                pieces.push(piece);
            } else {
                pieces.extend(self.atomize(&piece, separator_index + 1));
            }
        }

        pieces
    }

    /// Packs pieces into chunks up to the chunk size. When a chunk is
    /// emitted, its trailing `chunk_overlap` characters seed the next
    /// chunk, unless that would push the next chunk past the size bound.
    fn merge_pieces(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            if !current.is_empty() && char_len(&current) + char_len(&piece) > self.chunk_size {
                let finished = std::mem::take(&mut current);
                current = self.overlap_tail(&finished);
                if char_len(&current) + char_len(&piece) > self.chunk_size {
                    current.clear();
                }
                chunks.push(finished);
            }
            current.push_str(&piece);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    fn overlap_tail(&self, chunk: &str) -> String {
        if self.chunk_overlap == 0 {
            return String::new();
        }
        let chars: Vec<char> = chunk.chars().collect();
        let start = chars.len().saturating_sub(self.chunk_overlap);
        chars[start..].iter().collect()
    }

    fn fixed_width_pieces(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.chunk_size)
            .map(|window| window.iter().collect())
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
