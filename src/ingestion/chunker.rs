//! Sentence-respecting text chunking

use unicode_segmentation::UnicodeSegmentation;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks in characters
    overlap: usize,
    /// Minimum chunk size (trailing fragments below this merge into the
    /// previous chunk)
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize, min_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
            min_size,
        }
    }

    /// Split text into chunks, keeping sentences intact.
    ///
    /// Consecutive chunks share up to `overlap` characters of trailing
    /// sentences for continuity across chunk boundaries. A single sentence
    /// longer than the chunk size is emitted whole.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for sentence in text.split_sentence_bounds() {
            if !current.is_empty() && current.len() + sentence.len() > self.chunk_size {
                let tail = self.overlap_tail(&current);
                chunks.push(std::mem::take(&mut current));
                current = tail;
            }
            current.push_str(sentence);
        }

        let remainder = current.trim();
        if !remainder.is_empty() {
            // An overlap-only remainder is already covered by the last chunk
            let is_overlap_echo = chunks
                .last()
                .map(|last| last.trim_end().ends_with(remainder))
                .unwrap_or(false);

            if !is_overlap_echo {
                if remainder.len() < self.min_size && !chunks.is_empty() {
                    if let Some(last) = chunks.last_mut() {
                        last.push_str(remainder);
                    }
                } else {
                    chunks.push(remainder.to_string());
                }
            }
        }

        chunks
    }

    /// Trailing whole sentences of `chunk` totalling at most `overlap` chars
    fn overlap_tail(&self, chunk: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let sentences: Vec<&str> = chunk.split_sentence_bounds().collect();
        let mut tail: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for sentence in sentences.into_iter().rev() {
            if total + sentence.len() > self.overlap {
                break;
            }
            total += sentence.len();
            tail.push(sentence);
        }

        tail.reverse();
        tail.concat()
    }
}
