//! Passkey server client implementation.

use super::{LoginVerifyResponse, PasskeyServer, RegisterVerifyResponse};
use crate::{
    error::ServerError,
    types::{
        AuthenticationCredential, CredentialCreationOptions, CredentialRequestOptions,
        RegistrationCredential,
    },
};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, error};
use url::Url;

/// HTTP client for a passkey server.
///
/// Every call is a single `POST` with a JSON body. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpPasskeyServer {
    client: Client,
    url: Url,
}

impl HttpPasskeyServer {
    /// Create a new passkey server client.
    pub fn new(url: Url) -> Self {
        Self::with_client(url, Client::new())
    }

    /// Create a new passkey server client using the given [`Client`].
    pub fn with_client(mut url: Url, client: Client) -> Self {
        // endpoints are joined relative to the base path
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }
        Self { client, url }
    }

    /// The base URL of the passkey server.
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, ServerError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url.join(endpoint)?;
        debug!(%url, "Calling passkey server");

        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, endpoint, "Passkey server request failed");
            return Err(ServerError::PasskeyServerStatus { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ServerError::UnexpectedServerResponse {
            endpoint,
            reason: err.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PasskeyServer for HttpPasskeyServer {
    async fn register_options(
        &self,
        username: &str,
    ) -> Result<CredentialCreationOptions, ServerError> {
        self.post("register/options", &json!({ "username": username })).await
    }

    async fn register_verify(
        &self,
        user_id: &str,
        username: &str,
        credential: &RegistrationCredential,
    ) -> Result<RegisterVerifyResponse, ServerError> {
        self.post(
            "register/verify",
            &json!({ "userId": user_id, "username": username, "cred": credential }),
        )
        .await
    }

    async fn login_options(&self) -> Result<CredentialRequestOptions, ServerError> {
        self.post("login/options", &json!({})).await
    }

    async fn login_verify(
        &self,
        credential: &AuthenticationCredential,
    ) -> Result<LoginVerifyResponse, ServerError> {
        self.post("login/verify", &json!({ "cred": credential })).await
    }
}
