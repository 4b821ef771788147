//! Input assembly: accumulate bytes until a terminator completes a line.

use bytes::{Bytes, BytesMut};

/// Byte that ends a client line.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Per-connection accumulator of not-yet-terminated input.
///
/// Completed lines are handed out with their terminator attached and are
/// split off the front of the buffer, so whatever follows the last
/// terminator stays buffered for the next read.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: BytesMut,
    /// Prefix of `buf` already known to contain no terminator.
    scanned: usize,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly read bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Split off the next completed line, terminator included.
    pub fn next_line(&mut self) -> Option<Bytes> {
        match self.buf[self.scanned..]
            .iter()
            .position(|&b| b == LINE_TERMINATOR)
        {
            Some(offset) => {
                let end = self.scanned + offset + 1;
                self.scanned = 0;
                Some(self.buf.split_to(end).freeze())
            }
            None => {
                self.scanned = self.buf.len();
                None
            }
        }
    }

    /// Append `data` and drain every line it completed.
    pub fn push(&mut self, data: &[u8]) -> Vec<Bytes> {
        self.extend(data);
        std::iter::from_fn(|| self.next_line()).collect()
    }

    /// Bytes waiting for a terminator.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line, returning how many bytes were released.
    pub fn clear(&mut self) -> usize {
        let released = self.buf.len();
        self.buf = BytesMut::new();
        self.scanned = 0;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_keeps_terminator() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"hello\n");
        assert_eq!(lines, vec![Bytes::from_static(b"hello\n")]);
        assert_eq!(asm.buffered(), 0);
    }

    #[test]
    fn trailing_bytes_stay_buffered() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"one\ntwo\nthr");
        assert_eq!(
            lines,
            vec![Bytes::from_static(b"one\n"), Bytes::from_static(b"two\n")]
        );
        assert_eq!(asm.buffered(), 3);

        let lines = asm.push(b"ee\n");
        assert_eq!(lines, vec![Bytes::from_static(b"three\n")]);
        assert_eq!(asm.buffered(), 0);
    }

    #[test]
    fn line_split_across_many_reads() {
        let mut asm = LineAssembler::new();
        for chunk in [&b"he"[..], b"l", b"", b"lo wor", b"ld"] {
            assert!(asm.push(chunk).is_empty());
        }
        assert_eq!(asm.push(b"\n"), vec![Bytes::from_static(b"hello world\n")]);
    }

    #[test]
    fn empty_lines_are_lines() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"\n\n");
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.as_ref() == b"\n"));
    }

    #[test]
    fn k_terminators_yield_k_lines() {
        let mut asm = LineAssembler::new();
        let input = b"a\nbb\n\nccc\ndddd";
        let k = input.iter().filter(|&&b| b == LINE_TERMINATOR).count();
        let lines = asm.push(input);
        assert_eq!(lines.len(), k);
        let joined: Vec<u8> = lines.iter().flat_map(|l| l.iter().copied()).collect();
        assert_eq!(&joined[..], &input[..input.len() - 4]);
    }

    #[test]
    fn non_utf8_bytes_pass_through() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(&[0xff, 0x00, 0xfe, b'\n']);
        assert_eq!(lines[0].as_ref(), &[0xff, 0x00, 0xfe, b'\n']);
    }

    #[test]
    fn unterminated_input_grows_without_bound() {
        let mut asm = LineAssembler::new();
        let chunk = [b'x'; 4096];
        for _ in 0..256 {
            assert!(asm.push(&chunk).is_empty());
        }
        assert_eq!(asm.buffered(), 4096 * 256);
        assert_eq!(asm.clear(), 4096 * 256);
        assert_eq!(asm.buffered(), 0);
    }
}
