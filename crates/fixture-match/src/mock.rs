//! Endpoint mock declarations.
//!
//! An [`EndpointMock`] is a declared stand-in response for one external
//! network call. Mocks are supplied per test by the caller, owned by the
//! registry for the duration of that test, and discarded at teardown.
//!
//! Construction is through typed setters returning a new value, not a
//! mutable fluent builder. Method-specific rules are enforced here:
//! attaching a body expectation to a method that carries no request body is
//! a declaration error, not a silently ignored field.

use fixture_core::HttpMethod;
use serde_json::Value;
use thiserror::Error;

/// Invalid mock declaration, surfaced at construction or registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockDeclarationError {
    /// A body expectation was attached to a method without a request body.
    #[error("{method} {url}: body expectation is only valid for body-bearing methods")]
    BodyExpectationNotAllowed { method: HttpMethod, url: String },

    /// Ignored fields were declared without a body expectation to apply
    /// them to.
    #[error("{method} {url}: ignored fields require a body expectation")]
    IgnoredFieldsWithoutExpectation { method: HttpMethod, url: String },

    /// A mock was filed under the wrong method list of a bundle.
    #[error("mock for {actual} {url} was declared in the {expected} list")]
    MethodListMismatch {
        expected: HttpMethod,
        actual: HttpMethod,
        url: String,
    },
}

/// Expected request body plus the field paths excluded from comparison.
///
/// Ignored paths tolerate volatile fields the application attaches
/// unpredictably — request identifiers, timestamps, trace context. Paths are
/// dot-separated; numeric segments index into arrays (`params.0.from`).
#[derive(Debug, Clone, PartialEq)]
pub struct BodyExpectation {
    pub expected: Value,
    pub ignored_fields: Vec<String>,
}

/// A declared stand-in response for one external network call.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMock {
    method: HttpMethod,
    url: String,
    expected_body: Option<BodyExpectation>,
    response_body: Option<Value>,
    response_status: u16,
}

impl EndpointMock {
    /// Mock for `method` on the exact `url` (query string included).
    ///
    /// Response defaults: empty body, status 200 (201 for POST).
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            expected_body: None,
            response_body: None,
            response_status: method.default_response_status(),
        }
    }

    /// Shorthand for [`EndpointMock::new`] with [`HttpMethod::Get`].
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Shorthand for [`EndpointMock::new`] with [`HttpMethod::Post`].
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Declare the JSON body this mock answers with.
    pub fn with_response(mut self, body: Value) -> Self {
        self.response_body = Some(body);
        self
    }

    /// Override the response status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.response_status = status;
        self
    }

    /// Require the incoming request body to structurally equal `expected`
    /// before this mock matches.
    ///
    /// Fails for methods without a request body.
    pub fn with_expected_body(mut self, expected: Value) -> Result<Self, MockDeclarationError> {
        if !self.method.has_request_body() {
            return Err(MockDeclarationError::BodyExpectationNotAllowed {
                method: self.method,
                url: self.url,
            });
        }
        self.expected_body = Some(BodyExpectation {
            expected,
            ignored_fields: Vec::new(),
        });
        Ok(self)
    }

    /// Exclude the given field paths from the body comparison, on both
    /// sides. Only meaningful after [`with_expected_body`].
    ///
    /// [`with_expected_body`]: EndpointMock::with_expected_body
    pub fn ignoring_fields<I, S>(mut self, fields: I) -> Result<Self, MockDeclarationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.expected_body.as_mut() {
            Some(expectation) => {
                expectation
                    .ignored_fields
                    .extend(fields.into_iter().map(Into::into));
                Ok(self)
            }
            None => Err(MockDeclarationError::IgnoredFieldsWithoutExpectation {
                method: self.method,
                url: self.url,
            }),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn expected_body(&self) -> Option<&BodyExpectation> {
        self.expected_body.as_ref()
    }

    /// Declared response body; `None` means "match but answer with an empty
    /// body".
    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    pub fn response_status(&self) -> u16 {
        self.response_status
    }
}

/// The per-test mock declaration record supplied by the fixture-builder
/// collaborator before the application is launched or restarted.
///
/// Mirrors the `{ GET: [...], POST: [...] }` shape test specs are written
/// in. Order within each list is the registration order, and registration
/// order is the tie-break between mocks sharing method+URL.
#[derive(Debug, Clone, Default)]
pub struct MockBundle {
    pub get: Vec<EndpointMock>,
    pub post: Vec<EndpointMock>,
    pub put: Vec<EndpointMock>,
    pub delete: Vec<EndpointMock>,
}

impl MockBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.get.is_empty() && self.post.is_empty() && self.put.is_empty() && self.delete.is_empty()
    }

    /// Flatten into registration order, verifying each mock sits in the
    /// list for its own method.
    pub(crate) fn into_ordered(self) -> Result<Vec<EndpointMock>, MockDeclarationError> {
        let lists = [
            (HttpMethod::Get, self.get),
            (HttpMethod::Post, self.post),
            (HttpMethod::Put, self.put),
            (HttpMethod::Delete, self.delete),
        ];
        let mut ordered = Vec::new();
        for (expected, list) in lists {
            for mock in list {
                if mock.method() != expected {
                    return Err(MockDeclarationError::MethodListMismatch {
                        expected,
                        actual: mock.method(),
                        url: mock.url().to_string(),
                    });
                }
                ordered.push(mock);
            }
        }
        Ok(ordered)
    }
}
