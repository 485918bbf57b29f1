use serde::Serialize;
use std::fmt;

/// Families of asynchronous requests. A newer request of one family
/// supersedes every older one of the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Verification,
    Constraints,
    Locale,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Verification => write!(f, "verification"),
            RequestKind::Constraints => write!(f, "constraints"),
            RequestKind::Locale => write!(f, "locale"),
        }
    }
}

/// Proof of which request a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    kind: RequestKind,
    generation: u64,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Monotonic generation counter per request family.
///
/// Responses are applied only while their ticket is the latest of its
/// family and the owner has not been closed. In-flight work is never
/// aborted; stale results are simply dropped.
///
/// # Examples
///
/// ```
/// use swap_form_engine::form::generation::{RequestGenerations, RequestKind};
///
/// let mut generations = RequestGenerations::new();
/// let first = generations.begin(RequestKind::Constraints);
/// let second = generations.begin(RequestKind::Constraints);
/// assert!(!generations.is_current(first));
/// assert!(generations.is_current(second));
///
/// generations.close();
/// assert!(!generations.is_current(second));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestGenerations {
    verification: u64,
    constraints: u64,
    locale: u64,
    closed: bool,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding the previous one of `kind`.
    pub fn begin(&mut self, kind: RequestKind) -> Ticket {
        let counter = self.counter_mut(kind);
        *counter += 1;
        Ticket {
            kind,
            generation: *counter,
        }
    }

    /// Supersede any in-flight request of `kind` without starting one.
    pub fn invalidate(&mut self, kind: RequestKind) {
        *self.counter_mut(kind) += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed && self.counter(ticket.kind) == ticket.generation
    }

    /// The owner is gone; every outstanding ticket becomes stale.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn counter(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Verification => self.verification,
            RequestKind::Constraints => self.constraints,
            RequestKind::Locale => self.locale,
        }
    }

    fn counter_mut(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Verification => &mut self.verification,
            RequestKind::Constraints => &mut self.constraints,
            RequestKind::Locale => &mut self.locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_are_independent() {
        let mut generations = RequestGenerations::new();
        let locale = generations.begin(RequestKind::Locale);
        let _ = generations.begin(RequestKind::Constraints);
        let _ = generations.begin(RequestKind::Verification);
        assert!(generations.is_current(locale));
    }

    #[test]
    fn test_invalidate() {
        let mut generations = RequestGenerations::new();
        let ticket = generations.begin(RequestKind::Constraints);
        generations.invalidate(RequestKind::Constraints);
        assert!(!generations.is_current(ticket));
    }

    #[test]
    fn test_generations_increase() {
        let mut generations = RequestGenerations::new();
        let a = generations.begin(RequestKind::Verification);
        let b = generations.begin(RequestKind::Verification);
        assert!(b.generation() > a.generation());
        assert_eq!(a.kind(), RequestKind::Verification);
    }

    #[test]
    fn test_close_is_final() {
        let mut generations = RequestGenerations::new();
        generations.close();
        let ticket = generations.begin(RequestKind::Locale);
        assert!(generations.is_closed());
        assert!(!generations.is_current(ticket));
    }
}
