use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("response from {url} could not be decoded: {message}")]
    Decode { url: String, message: String },
}

/// Remote calls made by the engine: tool document fetches and function invocations.
/// Every call is a suspension point; implementations must be shareable across
/// the threads that run concurrent conversions.
pub trait RemoteTransport: Send + Sync {
    fn fetch_document(&self, url: &str) -> Result<String, TransportError>;

    fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

fn map_ureq_error(url: &str, err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Status(status, response) => TransportError::Status {
            url: url.to_string(),
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => TransportError::Network {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

impl RemoteTransport for HttpTransport {
    fn fetch_document(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| map_ureq_error(url, err))?;
        response
            .into_string()
            .map_err(|err| TransportError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            })
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        let response = self
            .agent
            .post(url)
            .set("Accept", "application/json")
            .send_json(body.clone())
            .map_err(|err| map_ureq_error(url, err))?;
        response
            .into_json::<Value>()
            .map_err(|err| TransportError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            })
    }
}
