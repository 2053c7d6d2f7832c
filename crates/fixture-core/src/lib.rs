//! # fixture-core — Foundational Types for the E2E Fixture Stack
//!
//! Shared primitives for the fixture state server and the mock
//! request-matching engine. Every other crate in the workspace depends on
//! `fixture-core`; it depends only on serde.
//!
//! ## Contents
//!
//! - [`HttpMethod`] — the four methods the mobile test suite declares mocks
//!   for, with the body-bearing distinction that gates body matchers.
//! - [`StateFixture`] — the `{ state, asyncState }` document pair the
//!   application fetches once at launch to bootstrap its persisted stores.
//! - [`constants`] — well-known ports and paths. The application under test
//!   is compiled to query these, so they are fixed constants rather than
//!   dynamically negotiated values.

pub mod constants;
pub mod document;
pub mod method;

pub use document::StateFixture;
pub use method::{HttpMethod, MethodParseError};
