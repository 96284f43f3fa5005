//! Incremental byte-to-line decoding
//!
//! Network chunks carry no alignment guarantee: a chunk may end in the middle
//! of a line or in the middle of a multi-byte UTF-8 sequence. The decoder
//! keeps both kinds of leftovers between calls so the emitted lines are the
//! same no matter how the body was split.

/// Stateful decoder that turns byte chunks into complete text lines.
///
/// # Example
///
/// ```
/// use biochat::sse::FrameDecoder;
///
/// let mut decoder = FrameDecoder::new();
///
/// // First chunk contains a partial line
/// assert!(decoder.feed(b"data: {\"type\":\"te").is_empty());
///
/// // Second chunk completes it
/// let lines = decoder.feed(b"xt\",\"content\":\"hi\"}\n");
/// assert_eq!(lines, vec!["data: {\"type\":\"text\",\"content\":\"hi\"}"]);
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes of an incomplete UTF-8 sequence at the end of the last chunk
    undecoded: Vec<u8>,
    /// Decoded text after the last newline
    partial: String,
}

impl FrameDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completes, in order.
    ///
    /// Lines are returned without the trailing `\n` (and without a `\r`
    /// directly before it). Empty lines are returned as empty strings.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk);

        let mut lines = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.partial[consumed..].find('\n') {
            let end = consumed + offset;
            let line = &self.partial[consumed..end];
            lines.push(line.strip_suffix('\r').unwrap_or(line).to_string());
            consumed = end + 1;
        }
        self.partial.drain(..consumed);

        lines
    }

    /// Signal end of stream.
    ///
    /// A trailing fragment without a terminating newline is never turned into
    /// a line; it is dropped here. Returns the number of bytes discarded.
    pub fn finish(&mut self) -> usize {
        let discarded = self.partial.len() + self.undecoded.len();
        if discarded > 0 {
            tracing::debug!(bytes = discarded, "discarding unterminated trailing fragment");
        }
        self.reset();
        discarded
    }

    /// True if there is buffered text or bytes waiting for a newline.
    pub fn has_partial(&self) -> bool {
        !self.partial.is_empty() || !self.undecoded.is_empty()
    }

    /// The decoded text buffered after the last newline.
    pub fn partial(&self) -> &str {
        &self.partial
    }

    /// Drop all buffered state.
    pub fn reset(&mut self) {
        self.undecoded.clear();
        self.partial.clear();
    }

    /// Append the chunk to the undecoded bytes and move every complete UTF-8
    /// sequence into `partial`. Invalid sequences become U+FFFD; an incomplete
    /// sequence at the very end stays in `undecoded` for the next chunk.
    fn decode(&mut self, chunk: &[u8]) {
        self.undecoded.extend_from_slice(chunk);

        let mut start = 0;
        while start < self.undecoded.len() {
            match std::str::from_utf8(&self.undecoded[start..]) {
                Ok(valid) => {
                    self.partial.push_str(valid);
                    start = self.undecoded.len();
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    // The prefix up to valid_end was just validated, so this never replaces
                    self.partial
                        .push_str(&String::from_utf8_lossy(&self.undecoded[start..valid_end]));
                    match e.error_len() {
                        Some(len) => {
                            self.partial.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }
        self.undecoded.drain(..start);
    }
}
