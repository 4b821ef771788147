//! Server broadcast shapes.
//!
//! Every notice is rendered once from a `%d`/`%s` template into a [`Bytes`]
//! payload, then fanned out. Client bytes are forwarded verbatim; nothing
//! here validates encoding.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Write;

pub const JOIN_TEMPLATE: &str = "server: client %d joined\n";
pub const LEAVE_TEMPLATE: &str = "server: client %d left\n";
pub const RELAY_TEMPLATE: &str = "client %d: %s";

/// A template argument.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Int(u64),
    Bytes(&'a [u8]),
}

impl Arg<'_> {
    fn len_hint(&self) -> usize {
        match self {
            Arg::Int(_) => 20,
            Arg::Bytes(b) => b.len(),
        }
    }

    fn write_to(&self, out: &mut BytesMut) {
        match self {
            // BytesMut's fmt::Write grows the buffer and cannot fail.
            Arg::Int(n) => {
                let _ = write!(out, "{n}");
            }
            Arg::Bytes(b) => out.put_slice(b),
        }
    }
}

/// Substitute `args` into `template`.
///
/// `%d` and `%s` each consume the next argument, `%%` emits a literal `%`.
/// Any other `%` sequence is copied as-is and a placeholder with no argument
/// left renders as nothing.
pub fn render_template(template: &str, args: &[Arg<'_>]) -> Bytes {
    let bytes = template.as_bytes();
    let hint = bytes.len() + args.iter().map(Arg::len_hint).sum::<usize>();
    let mut out = BytesMut::with_capacity(hint);
    let mut args = args.iter();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 1 < bytes.len() {
            match bytes[i + 1] {
                b'd' | b's' => {
                    if let Some(arg) = args.next() {
                        arg.write_to(&mut out);
                    }
                    i += 2;
                    continue;
                }
                b'%' => {
                    out.put_u8(b'%');
                    i += 2;
                    continue;
                }
                _ => {}
            }
        }
        out.put_u8(bytes[i]);
        i += 1;
    }

    out.freeze()
}

/// Something the server tells every other live client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Joined { visitor: u64 },
    Left { visitor: u64 },
    Relay { visitor: u64, line: &'a [u8] },
}

impl Notice<'_> {
    pub fn render(&self) -> Bytes {
        match *self {
            Notice::Joined { visitor } => render_template(JOIN_TEMPLATE, &[Arg::Int(visitor)]),
            Notice::Left { visitor } => render_template(LEAVE_TEMPLATE, &[Arg::Int(visitor)]),
            Notice::Relay { visitor, line } => {
                render_template(RELAY_TEMPLATE, &[Arg::Int(visitor), Arg::Bytes(line)])
            }
        }
    }

    /// Static label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::Joined { .. } => "joined",
            Notice::Left { .. } => "left",
            Notice::Relay { .. } => "relay",
        }
    }
}
