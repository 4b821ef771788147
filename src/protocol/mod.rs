//! Wire-level building blocks.
//!
//! - [`assembler`]: frames inbound bytes into newline-terminated lines
//! - [`queue`]: per-connection output queue with partial-write cursors
//! - [`notice`]: the three server broadcast shapes and their templates

pub mod assembler;
pub mod notice;
pub mod queue;

pub use assembler::{LINE_TERMINATOR, LineAssembler};
pub use notice::{Arg, Notice, render_template};
pub use queue::{OutputQueue, PendingMessage, WriteOutcome};
