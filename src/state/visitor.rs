//! Visitor number allocation.

/// Human-readable number a client is announced under.
pub type Visitor = u64;

/// Hands out visitor numbers in accept order.
///
/// Numbers are strictly increasing and never reused, even after the
/// connection slot they were issued for has been freed.
#[derive(Debug, Default)]
pub struct VisitorCounter {
    next: Visitor,
}

impl VisitorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next visitor number.
    pub fn next(&mut self) -> Visitor {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Number of visitors issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}
