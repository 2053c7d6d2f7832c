//! Request-to-mock match decision.

use std::sync::Arc;

use fixture_core::HttpMethod;
use serde_json::Value;

use crate::compare::bodies_match;
use crate::mock::EndpointMock;
use crate::registry::MockRegistry;

/// An intercepted request, reduced to what matching needs: method, full
/// URL (query string included), and the parsed JSON body if one was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

impl IncomingRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Why a request failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// No registered mock shares the request's method and URL.
    NoEndpoint,
    /// Method and URL matched at least one mock, but no candidate's body
    /// expectation was satisfied. Strict by design: payload drift fails.
    BodyMismatch,
}

/// The decision for one intercepted request. Computed per request, never
/// persisted.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Matched(Arc<EndpointMock>),
    NoMatch(NoMatchReason),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Finds the best matching entry in a [`MockRegistry`] for an incoming
/// request.
///
/// Matching is pure: it reads one immutable snapshot of the active set and
/// mutates nothing, so concurrent calls cannot observe each other.
#[derive(Debug, Clone)]
pub struct RequestMatcher {
    registry: Arc<MockRegistry>,
}

impl RequestMatcher {
    pub fn new(registry: Arc<MockRegistry>) -> Self {
        Self { registry }
    }

    /// Decide which registered mock, if any, answers `request`.
    ///
    /// Candidates are filtered by exact method+URL equality, then walked in
    /// registration order: a candidate without a body expectation matches
    /// outright; one with an expectation matches iff the bodies agree after
    /// ignored fields are removed from both sides. First satisfied
    /// candidate wins.
    pub fn match_request(&self, request: &IncomingRequest) -> MatchOutcome {
        let snapshot = self.registry.active();
        let mut saw_endpoint = false;

        for mock in snapshot.iter() {
            if mock.method() != request.method || mock.url() != request.url {
                continue;
            }
            saw_endpoint = true;

            match mock.expected_body() {
                None => return MatchOutcome::Matched(Arc::clone(mock)),
                Some(expectation) => {
                    let actual = request.body.as_ref().unwrap_or(&Value::Null);
                    if bodies_match(&expectation.expected, actual, &expectation.ignored_fields) {
                        return MatchOutcome::Matched(Arc::clone(mock));
                    }
                }
            }
        }

        if saw_endpoint {
            MatchOutcome::NoMatch(NoMatchReason::BodyMismatch)
        } else {
            MatchOutcome::NoMatch(NoMatchReason::NoEndpoint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{EndpointMock, MockBundle};
    use serde_json::json;

    fn matcher_with(bundle: MockBundle) -> RequestMatcher {
        let registry = Arc::new(MockRegistry::new());
        registry.register(bundle).unwrap();
        RequestMatcher::new(registry)
    }

    #[test]
    fn empty_registry_never_matches() {
        let matcher = matcher_with(MockBundle::default());
        let outcome = matcher.match_request(&IncomingRequest::new(
            HttpMethod::Get,
            "https://price.api.example/v1/spot",
        ));
        assert!(matches!(
            outcome,
            MatchOutcome::NoMatch(NoMatchReason::NoEndpoint)
        ));
    }

    #[test]
    fn url_equality_includes_query_string() {
        let matcher = matcher_with(MockBundle {
            get: vec![EndpointMock::get("https://flags.example/v1/flags?client=mobile")],
            ..MockBundle::default()
        });

        let hit = matcher.match_request(&IncomingRequest::new(
            HttpMethod::Get,
            "https://flags.example/v1/flags?client=mobile",
        ));
        assert!(hit.is_match());

        let miss = matcher.match_request(&IncomingRequest::new(
            HttpMethod::Get,
            "https://flags.example/v1/flags?client=extension",
        ));
        assert!(matches!(
            miss,
            MatchOutcome::NoMatch(NoMatchReason::NoEndpoint)
        ));
    }

    #[test]
    fn method_mismatch_is_no_endpoint() {
        let matcher = matcher_with(MockBundle {
            get: vec![EndpointMock::get("https://a.example/x")],
            ..MockBundle::default()
        });
        let outcome = matcher.match_request(&IncomingRequest::new(
            HttpMethod::Post,
            "https://a.example/x",
        ));
        assert!(matches!(
            outcome,
            MatchOutcome::NoMatch(NoMatchReason::NoEndpoint)
        ));
    }

    #[test]
    fn candidate_without_expectation_matches_any_body() {
        // Analytics-style POST whose payload is irrelevant to the test.
        let matcher = matcher_with(MockBundle {
            post: vec![EndpointMock::post("https://telemetry.example/track")],
            ..MockBundle::default()
        });
        let outcome = matcher.match_request(
            &IncomingRequest::new(HttpMethod::Post, "https://telemetry.example/track")
                .with_body(json!({"anything": [1, 2, 3]})),
        );
        assert!(outcome.is_match());
    }

    #[test]
    fn ignored_fields_tolerate_volatile_values() {
        // Expected {a:1, b:2} ignoring "b".
        let matcher = matcher_with(MockBundle {
            post: vec![EndpointMock::post("https://alerts.example/validate")
                .with_expected_body(json!({"a": 1, "b": 2}))
                .unwrap()
                .ignoring_fields(["b"])
                .unwrap()],
            ..MockBundle::default()
        });

        let hit = matcher.match_request(
            &IncomingRequest::new(HttpMethod::Post, "https://alerts.example/validate")
                .with_body(json!({"a": 1, "b": 999})),
        );
        assert!(hit.is_match());

        let miss = matcher.match_request(
            &IncomingRequest::new(HttpMethod::Post, "https://alerts.example/validate")
                .with_body(json!({"a": 2, "b": 2})),
        );
        assert!(matches!(
            miss,
            MatchOutcome::NoMatch(NoMatchReason::BodyMismatch)
        ));
    }

    #[test]
    fn duplicate_endpoint_resolved_by_body_in_registration_order() {
        // Two POST mocks for the same URL with distinct bodies.
        let matcher = matcher_with(MockBundle {
            post: vec![
                EndpointMock::post("https://rpc.example/send")
                    .with_expected_body(json!({"step": "first"}))
                    .unwrap()
                    .with_response(json!({"result": 1})),
                EndpointMock::post("https://rpc.example/send")
                    .with_expected_body(json!({"step": "second"}))
                    .unwrap()
                    .with_response(json!({"result": 2})),
            ],
            ..MockBundle::default()
        });

        let outcome = matcher.match_request(
            &IncomingRequest::new(HttpMethod::Post, "https://rpc.example/send")
                .with_body(json!({"step": "second"})),
        );
        match outcome {
            MatchOutcome::Matched(mock) => {
                assert_eq!(mock.response_body(), Some(&json!({"result": 2})));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn first_registered_wins_when_both_satisfied() {
        let matcher = matcher_with(MockBundle {
            post: vec![
                EndpointMock::post("https://rpc.example/send")
                    .with_expected_body(json!({"a": 1, "id": 1}))
                    .unwrap()
                    .ignoring_fields(["id"])
                    .unwrap()
                    .with_response(json!({"winner": "first"})),
                EndpointMock::post("https://rpc.example/send")
                    .with_expected_body(json!({"a": 1, "id": 2}))
                    .unwrap()
                    .ignoring_fields(["id"])
                    .unwrap()
                    .with_response(json!({"winner": "second"})),
            ],
            ..MockBundle::default()
        });

        let outcome = matcher.match_request(
            &IncomingRequest::new(HttpMethod::Post, "https://rpc.example/send")
                .with_body(json!({"a": 1, "id": 3})),
        );
        match outcome {
            MatchOutcome::Matched(mock) => {
                assert_eq!(mock.response_body(), Some(&json!({"winner": "first"})));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn expectation_against_missing_body_compares_to_null() {
        let matcher = matcher_with(MockBundle {
            post: vec![EndpointMock::post("https://rpc.example/send")
                .with_expected_body(json!({"a": 1}))
                .unwrap()],
            ..MockBundle::default()
        });
        let outcome = matcher.match_request(&IncomingRequest::new(
            HttpMethod::Post,
            "https://rpc.example/send",
        ));
        assert!(matches!(
            outcome,
            MatchOutcome::NoMatch(NoMatchReason::BodyMismatch)
        ));
    }

    #[test]
    fn matching_is_safe_across_threads() {
        let registry = Arc::new(MockRegistry::new());
        registry
            .register(MockBundle {
                get: vec![EndpointMock::get("https://a.example/x").with_response(json!({"ok": true}))],
                ..MockBundle::default()
            })
            .unwrap();
        let matcher = RequestMatcher::new(registry);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let matcher = matcher.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let outcome = matcher.match_request(&IncomingRequest::new(
                            HttpMethod::Get,
                            "https://a.example/x",
                        ));
                        assert!(outcome.is_match());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
