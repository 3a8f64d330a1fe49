use super::actuator::ActuatorError;

/// A thin wrapper around `reqwest::Client` with a preconfigured base URL.
///
/// Used to talk to the drone bridge. Requests time out after 5 seconds.
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the bridge, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

    /// Constructs a new `HTTPClient` for the given base URL.
    ///
    /// Requests time out after [`Self::REQUEST_TIMEOUT`].
    ///
    /// # Arguments
    /// * `base_url` – The root URL of the drone bridge (e.g., `"http://127.0.0.1:8080"`).
    ///   A trailing slash is removed.
    ///
    /// # Returns
    /// A configured `HTTPClient`, or [`ActuatorError`] if the TLS backend fails to initialize.
    pub(crate) fn new(base_url: &str) -> Result<HTTPClient, ActuatorError> {
        let client = reqwest::Client::builder().timeout(Self::REQUEST_TIMEOUT).build()?;
        Ok(HTTPClient { client, base_url: String::from(base_url.trim_end_matches('/')) })
    }

    /// Returns the base URL that the client was initialized with.
    pub(crate) fn url(&self) -> &str { self.base_url.as_str() }

    /// Posts a JSON body to `endpoint` and maps the status code to an [`ActuatorError`].
    pub(crate) async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(), ActuatorError> {
        let response =
            self.client.post(format!("{}{endpoint}", self.base_url)).json(body).send().await?;
        Self::unwrap_return_code(response).await
    }

    async fn unwrap_return_code(response: reqwest::Response) -> Result<(), ActuatorError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(ActuatorError::Internal)
        } else if status.is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            Err(ActuatorError::Rejected(format!("{status}: {detail}")))
        } else {
            Err(ActuatorError::Unknown)
        }
    }
}
