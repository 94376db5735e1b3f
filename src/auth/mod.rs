//! Identity service: accounts, email verification, sign-in and phone codes

mod session;
mod types;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::sync::{Arc, RwLock};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use session::*;
pub use types::*;

/// Client for the identity service
#[derive(Debug, Clone)]
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    client: Client,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl IdentityClient {
    /// Create a new IdentityClient
    pub fn new(options: &ClientOptions, client: Client) -> Self {
        Self {
            base_url: options.identity_base_url.clone(),
            api_key: options.identity_api_key.clone(),
            client,
            session: Arc::new(RwLock::new(None)),
        }
    }

    fn accounts_url(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = Fetch::post(&self.client, &self.accounts_url(method))
            .query("key", &self.api_key)
            .json(body)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            let message = serde_json::from_str::<ServiceErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("status {}: {}", status, text));
            log::warn!("accounts:{} failed: {}", method, message);
            return Err(Error::auth(message));
        }

        Ok(response.json::<T>().await?)
    }

    fn store_session(&self, session: AuthSession) {
        let mut current = self.session.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(session);
    }

    fn id_token(&self) -> Result<String, Error> {
        self.session()
            .map(|s| s.id_token)
            .ok_or_else(|| Error::auth("Not logged in"))
    }

    /// Create an email/password account and sign it in
    pub async fn create_account(&self, email: &str, password: &str) -> Result<AuthSession, Error> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response: TokenResponse = self.call("signUp", &body).await?;
        let session = AuthSession::from(response);
        self.store_session(session.clone());
        Ok(session)
    }

    /// Send the verification mail for the signed-in account
    pub async fn send_email_verification(&self) -> Result<(), Error> {
        let body = json!({ "requestType": "VERIFY_EMAIL", "idToken": self.id_token()? });
        let _: serde_json::Value = self.call("sendOobCode", &body).await?;
        Ok(())
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, Error> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response: TokenResponse = self.call("signInWithPassword", &body).await?;
        let session = AuthSession::from(response);
        self.store_session(session.clone());
        Ok(session)
    }

    /// Fresh account record for the signed-in user
    pub async fn lookup(&self) -> Result<AccountInfo, Error> {
        let body = json!({ "idToken": self.id_token()? });
        let response: LookupResponse = self.call("lookup", &body).await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| Error::auth("Account not found"))
    }

    /// Text a verification code to a phone number
    pub async fn send_phone_code(
        &self,
        phone_number: &str,
        recaptcha_token: &str,
    ) -> Result<PhoneVerification, Error> {
        let body = json!({ "phoneNumber": phone_number, "recaptchaToken": recaptcha_token });
        let response: SendCodeResponse = self.call("sendVerificationCode", &body).await?;
        Ok(PhoneVerification {
            session_info: response.session_info,
            phone_number: phone_number.to_string(),
        })
    }

    /// Complete a phone sign-in with the texted code
    pub async fn confirm_phone_code(
        &self,
        verification: &PhoneVerification,
        code: &str,
    ) -> Result<AuthSession, Error> {
        let body = json!({ "sessionInfo": verification.session_info, "code": code });
        let response: TokenResponse = self.call("signInWithPhoneNumber", &body).await?;
        let session = AuthSession::from(response);
        self.store_session(session.clone());
        Ok(session)
    }

    /// Forget the local session. Tokens are stateless, so nothing is sent.
    pub fn sign_out(&self) {
        let mut current = self.session.write().unwrap_or_else(|e| e.into_inner());
        if current.take().is_some() {
            log::info!("signed out");
        }
    }

    /// Get the current session
    pub fn session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Set the session
    pub fn set_session(&self, session: AuthSession) {
        self.store_session(session);
    }
}
