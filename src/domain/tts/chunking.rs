use regex::Regex;
use std::sync::LazyLock;

/// SaluteSpeech rejects synthesis requests longer than this many characters
pub const SALUTE_MAX_CHUNK_SIZE: usize = 4000;

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s*").expect("sentence pattern is valid"));

/// Split text into chunks of at most `max_size` characters.
///
/// Text that already fits is returned untouched. Longer text is packed
/// paragraph by paragraph, then sentence by sentence, and only cut inside a
/// sentence when a single sentence is longer than the limit.
///
/// Lengths are counted in chars, not bytes.
pub fn split_text(text: &str, max_size: usize) -> Vec<String> {
    let max_size = max_size.max(1);

    if char_len(text) <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current_chunk = String::new();

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if char_len(paragraph) <= max_size {
            if fits_joined(&current_chunk, PARAGRAPH_SEPARATOR, paragraph, max_size) {
                append_joined(&mut current_chunk, PARAGRAPH_SEPARATOR, paragraph);
            } else {
                chunks.push(std::mem::replace(&mut current_chunk, paragraph.to_string()));
            }
        } else {
            if !current_chunk.is_empty() {
                chunks.push(std::mem::take(&mut current_chunk));
            }
            split_paragraph(paragraph, max_size, &mut chunks);
        }
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    if chunks.is_empty() {
        vec![text.to_string()]
    } else {
        chunks
    }
}

/// Pack the sentences of an oversized paragraph into chunks
fn split_paragraph(paragraph: &str, max_size: usize, chunks: &mut Vec<String>) {
    let mut sentence_chunk = String::new();

    for sentence in split_into_sentences(paragraph) {
        if fits_joined(&sentence_chunk, SENTENCE_SEPARATOR, sentence, max_size) {
            append_joined(&mut sentence_chunk, SENTENCE_SEPARATOR, sentence);
            continue;
        }

        if !sentence_chunk.is_empty() {
            chunks.push(std::mem::take(&mut sentence_chunk));
        }

        if char_len(sentence) > max_size {
            chunks.extend(force_split(sentence, max_size));
        } else {
            sentence_chunk = sentence.to_string();
        }
    }

    if !sentence_chunk.is_empty() {
        chunks.push(sentence_chunk);
    }
}

/// Split on runs of `.`, `!` or `?`, keeping the terminator with its sentence
fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last_end = 0;

    for mat in SENTENCE_END.find_iter(text) {
        let sentence = text[last_end..mat.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last_end = mat.end();
    }

    let tail = text[last_end..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    if sentences.is_empty() {
        vec![text]
    } else {
        sentences
    }
}

/// Cut a sentence that is longer than the limit.
///
/// Breaks on the last space of the window when it sits at or past 80% of the
/// limit, otherwise exactly at the limit.
fn force_split(text: &str, max_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if char_len(remaining) <= max_size {
            pieces.push(remaining.to_string());
            break;
        }

        let window_end = byte_offset_of_char(remaining, max_size);
        let split_at = match remaining[..window_end].rfind(' ') {
            Some(space) if char_len(&remaining[..space]) * 5 >= max_size * 4 => space,
            _ => window_end,
        };

        let piece = remaining[..split_at].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        remaining = remaining[split_at..].trim();
    }

    pieces
}

fn fits_joined(current: &str, separator: &str, next: &str, max_size: usize) -> bool {
    if current.is_empty() {
        return char_len(next) <= max_size;
    }
    char_len(current) + char_len(separator) + char_len(next) <= max_size
}

fn append_joined(current: &mut String, separator: &str, next: &str) {
    if !current.is_empty() {
        current.push_str(separator);
    }
    current.push_str(next);
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_offset_of_char(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
