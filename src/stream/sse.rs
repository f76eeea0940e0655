//! Server-Sent Events framing
//!
//! Incremental `text/event-stream` decoder. Bytes arrive in arbitrary chunks;
//! lines (and UTF-8 sequences) may be split across chunk boundaries, so the
//! decoder buffers raw bytes and only decodes complete lines.

/// One dispatched event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// `event:` field, absent for plain messages
    pub event: Option<String>,
    /// `data:` lines joined with `\n`
    pub data: String,
    /// `id:` field
    pub id: Option<String>,
}

impl SseFrame {
    /// Plain message frame (no event name).
    pub fn message(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
        }
    }

    /// Frames a browser `EventSource` would hand to `onmessage`.
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }

    /// Encode as wire text, terminated by a blank line.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str(&format!("id: {}\n", id));
        }
        if let Some(event) = &self.event {
            out.push_str(&format!("event: {}\n", event));
        }
        for line in self.data.split('\n') {
            out.push_str(&format!("data: {}\n", line));
        }
        out.push('\n');
        out
    }
}

/// Incremental decoder state.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    // Last byte was '\r'; a following '\n' is the same line break.
    pending_cr: bool,
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut frames = Vec::new();

        for &byte in chunk {
            let after_cr = std::mem::replace(&mut self.pending_cr, false);
            match byte {
                // Second half of a CRLF pair.
                b'\n' if after_cr => {}
                b'\n' => self.end_line(&mut frames),
                b'\r' => {
                    self.end_line(&mut frames);
                    self.pending_cr = true;
                }
                _ => self.buffer.push(byte),
            }
        }

        frames
    }

    /// Flush a trailing frame at end of stream.
    pub fn finish(&mut self) -> Option<SseFrame> {
        self.pending_cr = false;
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.process_line(&String::from_utf8_lossy(&line));
        }
        self.dispatch()
    }

    fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
        let line = std::mem::take(&mut self.buffer);
        if line.is_empty() {
            if let Some(frame) = self.dispatch() {
                frames.push(frame);
            }
        } else {
            self.process_line(&String::from_utf8_lossy(&line));
        }
    }

    fn process_line(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            // No reconnection, so the retry hint has no use.
            "retry" => {}
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let id = self.id.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame { event, data, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: {\"event_type\":\"start\"}\n\n");
        assert_eq!(frames, vec![SseFrame::message("{\"event_type\":\"start\"}")]);
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"da").is_empty());
        assert!(decoder.feed(b"ta: hel").is_empty());
        assert!(decoder.feed(b"lo\n").is_empty());
        let frames = decoder.feed(b"\n");
        assert_eq!(frames, vec![SseFrame::message("hello")]);
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let text = "data: café\n\n".as_bytes();
        // Split inside the two-byte 'é'
        let split = text.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(&text[..split]).is_empty());
        let frames = decoder.feed(&text[split..]);
        assert_eq!(frames[0].data, "café");
    }

    #[test]
    fn test_crlf_and_cr_line_endings() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: a\r\n\r\ndata: b\r\rdata: c\n\n");
        let data: Vec<_> = frames.iter().map(|f| f.data.as_str()).collect();
        assert_eq!(data, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_crlf_split_between_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: a\r").is_empty());
        assert!(decoder.feed(b"\n").is_empty());
        assert!(decoder.feed(b"\r").len() == 1);
        assert!(decoder.feed(b"\n").is_empty());
    }

    #[test]
    fn test_multiline_data_comments_and_fields() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(
            b": keep-alive\nid: 7\nevent: progress\nretry: 1000\ndata: one\ndata:two\n\n",
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "one\ntwo");
        assert_eq!(frames[0].event.as_deref(), Some("progress"));
        assert_eq!(frames[0].id.as_deref(), Some("7"));
        assert!(!frames[0].is_message());
    }

    #[test]
    fn test_frames_without_data_are_dropped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: ping\n\n: comment\n\n").is_empty());
    }

    #[test]
    fn test_finish_flushes_unterminated_frame() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), Some(SseFrame::message("tail")));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_encode_then_decode() {
        let frame = SseFrame {
            event: Some("message".into()),
            data: "line1\nline2".into(),
            id: None,
        };
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(frame.encode().as_bytes());
        assert_eq!(frames, vec![frame]);
        assert!(frames[0].is_message());
    }
}
