//! # fixture-match — Mock Request-Matching Engine
//!
//! The algorithmic core of the fixture stack. Holds the per-test set of
//! endpoint mock declarations and decides, for every intercepted request,
//! which declared response answers it.
//!
//! ## Matching contract
//!
//! 1. Candidates are filtered by exact method and exact URL (including
//!    query string) equality.
//! 2. Candidates are then walked in registration order. One with no body
//!    expectation matches on method+URL alone; one with an expectation
//!    matches iff the request body equals the expected body after every
//!    ignored field path is removed from both sides.
//! 3. No surviving candidate is a [`MatchOutcome::NoMatch`] — a strict
//!    failure even when method+URL agreed, so tests catch payload drift.
//!
//! The active mock set is replaced wholesale per test (never cumulative) and
//! read as an immutable snapshot during the test, so matching is a pure
//! computation that is safe under arbitrary request concurrency.
//!
//! What happens *to* an unmatched request (error status vs pass-through) is
//! the server's policy, not this crate's: the matcher only classifies.
//!
//! Every match attempt is recorded in a [`RequestJournal`] so tests can
//! assert on otherwise-invisible background traffic ("two sync calls were
//! made") after the fact.

pub mod compare;
pub mod journal;
pub mod matcher;
pub mod mock;
pub mod registry;

pub use journal::{RequestJournal, RequestRecord};
pub use matcher::{IncomingRequest, MatchOutcome, NoMatchReason, RequestMatcher};
pub use mock::{BodyExpectation, EndpointMock, MockBundle, MockDeclarationError};
pub use registry::MockRegistry;
