use crate::sesamo::{endpoint_url, APP_USER_AGENT};
use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, error, instrument};

/// Shown whenever no server-provided message is available: transport
/// failures and undecodable error bodies.
pub const GENERIC_ERROR: &str = "An error occurred while processing the request";

/// How an HTTP status is mapped to success. The upstream flows disagree
/// (`status == 200` vs the whole 2xx class), so the strategy is injected
/// per deployment instead of hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// Succeeded iff the status is in [200, 299].
    SuccessClass,
    /// Succeeded iff the status is exactly 200.
    ExactOk,
}

impl FromStr for SuccessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success-class" => Ok(Self::SuccessClass),
            "exact-ok" => Ok(Self::ExactOk),
            _ => Err(format!("invalid success policy: {s}")),
        }
    }
}

/// Error payload the identity service attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Classified result of one submission. Status 0 means no response was
/// received at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutcome {
    pub succeeded: bool,
    pub status: u16,
    pub message: Option<String>,
}

impl RemoteOutcome {
    fn transport_failure() -> Self {
        Self {
            succeeded: false,
            status: 0,
            message: Some(GENERIC_ERROR.to_string()),
        }
    }
}

/// Performs the network exchange for one step. Never navigates and never
/// touches presentation state; interpreting the outcome is the flow
/// controller's job.
#[derive(Debug, Clone)]
pub struct Submitter {
    client: Client,
    base_url: String,
    policy: SuccessPolicy,
}

impl Submitter {
    pub fn new(base_url: &str, policy: SuccessPolicy) -> Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            policy,
        })
    }

    /// Form-encodes `payload`, POSTs it to `endpoint` and classifies the
    /// response under the configured policy. On the success path the body is
    /// not decoded; a success with an empty or non-JSON body is still a
    /// success. On the failure path the body's `message` field is extracted
    /// when the body is JSON, degrading to [`GENERIC_ERROR`] otherwise.
    #[instrument(skip(self, payload), fields(base_url = %self.base_url))]
    pub async fn submit(&self, endpoint: &str, payload: &[(String, String)]) -> RemoteOutcome {
        let url = match endpoint_url(&self.base_url, endpoint) {
            Ok(url) => url,
            Err(e) => {
                error!("Error building endpoint URL: {:?}", e);

                return RemoteOutcome::transport_failure();
            }
        };

        let response = match self.client.post(&url).form(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error submitting to {}: {:?}", url, e);

                return RemoteOutcome::transport_failure();
            }
        };

        let status = response.status().as_u16();

        let succeeded = match self.policy {
            SuccessPolicy::SuccessClass => response.status().is_success(),
            SuccessPolicy::ExactOk => status == 200,
        };

        if succeeded {
            debug!("{} - {}", url, status);

            return RemoteOutcome {
                succeeded: true,
                status,
                message: None,
            };
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message.unwrap_or_else(|| GENERIC_ERROR.to_string()),
            Err(_) => GENERIC_ERROR.to_string(),
        };

        debug!("{} - {}, {}", url, status, message);

        RemoteOutcome {
            succeeded: false,
            status,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn payload(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_success_class_accepts_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/authorization")
            .with_status(200)
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit(
                "/authorization",
                &payload(&[("login", "alice"), ("password", "Secret1_")]),
            )
            .await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            RemoteOutcome {
                succeeded: true,
                status: 200,
                message: None,
            }
        );
    }

    #[tokio::test]
    async fn test_success_class_accepts_whole_2xx_with_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/registration/confirm")
            .with_status(204)
            .with_body("not json at all")
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit("/registration/confirm", &payload(&[("code", "abc123")]))
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.status, 204);
        assert_eq!(outcome.message, None);
    }

    #[tokio::test]
    async fn test_exact_ok_rejects_201() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/registration")
            .with_status(201)
            .with_body(r#"{"message":"created"}"#)
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::ExactOk).unwrap();
        let outcome = submitter
            .submit("/registration", &payload(&[("login", "ABCDE1")]))
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.status, 201);
        assert_eq!(outcome.message.as_deref(), Some("created"));
    }

    #[tokio::test]
    async fn test_failure_extracts_message_from_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/authorization/recover/reset_code")
            .with_status(400)
            .with_body(r#"{"message":"expired"}"#)
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit(
                "/authorization/recover/reset_code",
                &payload(&[("code", "123456")]),
            )
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.status, 400);
        assert_eq!(outcome.message.as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_failure_with_undecodable_body_degrades_to_generic() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/authorization")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit("/authorization", &payload(&[("login", "alice")]))
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.status, 500);
        assert_eq!(outcome.message.as_deref(), Some(GENERIC_ERROR));
    }

    #[tokio::test]
    async fn test_failure_with_json_body_missing_message_degrades_to_generic() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/authorization")
            .with_status(400)
            .with_body(r#"{"detail":"nope"}"#)
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit("/authorization", &payload(&[("login", "alice")]))
            .await;

        assert_eq!(outcome.message.as_deref(), Some(GENERIC_ERROR));
    }

    #[tokio::test]
    async fn test_transport_failure_reports_status_zero() {
        // nothing listens on port 9; connect must fail without a response
        let submitter = Submitter::new("http://127.0.0.1:9", SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit("/authorization", &payload(&[("login", "alice")]))
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.message.as_deref(), Some(GENERIC_ERROR));
    }

    #[tokio::test]
    async fn test_payload_is_form_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/authorization")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("login".into(), "alice".into()),
                Matcher::UrlEncoded("password".into(), "Secret1_".into()),
                Matcher::UrlEncoded("rememberMe".into(), "true".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let submitter = Submitter::new(&server.url(), SuccessPolicy::SuccessClass).unwrap();
        let outcome = submitter
            .submit(
                "/authorization",
                &payload(&[
                    ("login", "alice"),
                    ("password", "Secret1_"),
                    ("rememberMe", "true"),
                ]),
            )
            .await;

        mock.assert_async().await;
        assert!(outcome.succeeded);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "success-class".parse::<SuccessPolicy>(),
            Ok(SuccessPolicy::SuccessClass)
        );
        assert_eq!("exact-ok".parse::<SuccessPolicy>(), Ok(SuccessPolicy::ExactOk));
        assert!("ok".parse::<SuccessPolicy>().is_err());
    }
}
