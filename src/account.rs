//! Account flows built on the identity and document clients

use chrono::Utc;
use serde_json::json;

use crate::auth::{AuthSession, IdentityClient, PhoneVerification};
use crate::cache::{AddressCache, KeyValueStore};
use crate::config::ClientOptions;
use crate::documents::{DocumentClient, Fields, UserProfile};
use crate::error::{Error, ValidationError};

/// Role written to every self-registered profile
pub const CUSTOMER_ROLE: &str = "customer";

/// Registration form
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub mobile: String,
    pub dob: String,
}

impl SignUpForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let fields = [&self.email, &self.password, &self.name, &self.mobile, &self.dob];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

/// Sign-up, log-in and profile maintenance
#[derive(Debug, Clone)]
pub struct AccountService {
    identity: IdentityClient,
    documents: DocumentClient,
    users_collection: String,
}

impl AccountService {
    pub fn new(options: &ClientOptions, identity: IdentityClient, documents: DocumentClient) -> Self {
        Self {
            identity,
            documents,
            users_collection: options.users_collection.clone(),
        }
    }

    pub fn identity(&self) -> &IdentityClient {
        &self.identity
    }

    fn documents_for(&self, session: &AuthSession) -> DocumentClient {
        self.documents.with_auth(&session.id_token)
    }

    /// Register an account, mail the verification link and write the profile.
    ///
    /// The new account is signed out again; it can log in once the email is
    /// verified.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<AuthSession, Error> {
        form.validate()?;

        let email = form.email.trim();
        let session = self.identity.create_account(email, &form.password).await?;
        if let Err(e) = self.identity.send_email_verification().await {
            self.identity.sign_out();
            return Err(e);
        }

        let profile = UserProfile {
            email: email.to_string(),
            name: form.name.trim().to_string(),
            mobile: form.mobile.trim().to_string(),
            dob: form.dob.trim().to_string(),
            role: CUSTOMER_ROLE.to_string(),
            is_verified: false,
            created_at: Some(Utc::now()),
        };
        let result = self
            .documents_for(&session)
            .create_profile(&self.users_collection, &session.user_id, &profile)
            .await;

        self.identity.sign_out();
        result?;

        log::info!("registered {}", session.user_id);
        Ok(session)
    }

    /// Sign in, refusing accounts whose email is not verified yet
    pub async fn log_in(&self, email: &str, password: &str) -> Result<AuthSession, Error> {
        let session = self.identity.sign_in(email.trim(), password).await?;

        let account = match self.identity.lookup().await {
            Ok(account) => account,
            Err(e) => {
                self.identity.sign_out();
                return Err(e);
            }
        };
        if !account.email_verified {
            self.identity.sign_out();
            return Err(Error::auth("Please verify your email first"));
        }

        Ok(session)
    }

    /// Stored profile of the signed-in user. Without a stored document the
    /// profile only carries the account email.
    pub async fn load_profile(&self) -> Result<UserProfile, Error> {
        let session = self
            .identity
            .session()
            .ok_or_else(|| Error::auth("Not logged in"))?;

        let stored = self
            .documents_for(&session)
            .get_document(&self.users_collection, &session.user_id)
            .await?;

        let mut profile = match stored {
            Some(fields) => UserProfile::from_fields(fields)?,
            None => UserProfile::default(),
        };
        if profile.email.is_empty() {
            profile.email = session.email.clone().unwrap_or_default();
        }
        Ok(profile)
    }

    /// Change the editable profile fields of the signed-in user
    pub async fn update_profile(&self, name: &str, mobile: &str, dob: &str) -> Result<(), Error> {
        let session = self
            .identity
            .session()
            .ok_or_else(|| Error::auth("Not logged in"))?;

        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!(name));
        fields.insert("mobile".to_string(), json!(mobile));
        fields.insert("dob".to_string(), json!(dob));

        self.documents_for(&session)
            .update_document(&self.users_collection, &session.user_id, &fields)
            .await
    }

    /// Drop the session and everything stored on the device
    pub async fn log_out<S: KeyValueStore>(&self, cache: &AddressCache<S>) -> Result<(), Error> {
        self.identity.sign_out();
        cache.clear().await
    }

    /// Start a phone-number sign-in
    pub fn phone_sign_in(&self) -> PhoneSignIn {
        PhoneSignIn::new(self.identity.clone())
    }
}

/// Phone-number sign-in in two steps. The pending verification is held here
/// rather than in any shared state.
#[derive(Debug, Clone)]
pub struct PhoneSignIn {
    identity: IdentityClient,
    pending: Option<PhoneVerification>,
}

impl PhoneSignIn {
    pub fn new(identity: IdentityClient) -> Self {
        Self {
            identity,
            pending: None,
        }
    }

    /// Text a code to `phone_number`
    pub async fn start(&mut self, phone_number: &str, recaptcha_token: &str) -> Result<(), Error> {
        let verification = self
            .identity
            .send_phone_code(phone_number.trim(), recaptcha_token)
            .await?;
        self.pending = Some(verification);
        Ok(())
    }

    pub fn pending(&self) -> Option<&PhoneVerification> {
        self.pending.as_ref()
    }

    /// Confirm the texted code. The code must be exactly six digits.
    pub async fn verify(&mut self, code: &str) -> Result<AuthSession, Error> {
        let code = code.trim();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidOtp.into());
        }

        let verification = self
            .pending
            .as_ref()
            .ok_or_else(|| Error::auth("Session expired. Please try again."))?;

        let session = self.identity.confirm_phone_code(verification, code).await?;
        self.pending = None;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_form_requires_all_fields() {
        let mut form = SignUpForm {
            email: "asha@example.com".to_string(),
            password: "secret1".to_string(),
            name: "Asha".to_string(),
            mobile: "9999999999".to_string(),
            dob: "01/01/2000".to_string(),
        };
        assert_eq!(form.validate(), Ok(()));

        form.mobile = "  ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MissingFields));
    }

    #[tokio::test]
    async fn test_verify_checks_code_before_session() {
        let options = ClientOptions::default();
        let mut phone = PhoneSignIn::new(IdentityClient::new(&options, reqwest::Client::new()));

        let err = phone.verify("12345").await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidOtp)));

        let err = phone.verify("12a456").await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidOtp)));

        let err = phone.verify("123456").await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication error: Session expired. Please try again.");
    }
}
