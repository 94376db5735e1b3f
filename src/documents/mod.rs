//! Document service: one profile document per user

pub mod value;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

pub use value::Fields;

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(default)]
    fields: Option<Value>,
}

/// Client for the document service
#[derive(Debug, Clone)]
pub struct DocumentClient {
    base_url: String,
    project_id: String,
    client: Client,
    token: Option<String>,
}

impl DocumentClient {
    /// Create a new DocumentClient
    pub fn new(options: &ClientOptions, client: Client) -> Self {
        Self {
            base_url: options.documents_base_url.clone(),
            project_id: options.project_id.clone(),
            client,
            token: None,
        }
    }

    /// A copy of this client sending the given identity token
    pub fn with_auth(&self, id_token: &str) -> Self {
        Self {
            token: Some(id_token.to_string()),
            ..self.clone()
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url, self.project_id, collection, id
        )
    }

    fn authorize<'a>(&self, request: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_patch(&self, request: FetchBuilder<'_>, typed_fields: Value) -> Result<(), Error> {
        let response = self
            .authorize(request)
            .json(&json!({ "fields": typed_fields }))?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::document(format!("status {}: {}", status, text)));
        }
        Ok(())
    }

    /// Read a document; `None` when it does not exist
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Fields>, Error> {
        let request = Fetch::get(&self.client, &self.document_url(collection, id));
        let response = self.authorize(request).execute_raw().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::document(format!("status {}: {}", status, text)));
        }

        let document = response.json::<DocumentResponse>().await?;
        match document.fields {
            Some(fields) => Ok(Some(value::decode_fields(&fields)?)),
            None => Ok(Some(Fields::new())),
        }
    }

    /// Create or fully replace a document
    pub async fn set_document(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), Error> {
        let request = Fetch::patch(&self.client, &self.document_url(collection, id));
        self.send_patch(request, value::encode_fields(fields)).await
    }

    /// Change only the given fields of an existing document
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> Result<(), Error> {
        let mut request = Fetch::patch(&self.client, &self.document_url(collection, id))
            .query("currentDocument.exists", "true");
        for name in fields.keys() {
            request = request.query("updateMask.fieldPaths", name);
        }
        self.send_patch(request, value::encode_fields(fields)).await
    }
}

/// Profile stored for each customer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub mobile: String,

    #[serde(default)]
    pub dob: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub is_verified: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Plain fields, without `createdAt`
    pub fn to_fields(&self) -> Result<Fields, Error> {
        let mut value = serde_json::to_value(self)?;
        let fields = value
            .as_object_mut()
            .ok_or_else(|| Error::document("profile is not an object"))?;
        fields.remove("createdAt");
        Ok(fields.clone())
    }

    pub fn from_fields(fields: Fields) -> Result<Self, Error> {
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

impl DocumentClient {
    /// Write a new profile, stamping `createdAt` as a timestamp value
    pub async fn create_profile(
        &self,
        collection: &str,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<(), Error> {
        let mut typed = match value::encode_fields(&profile.to_fields()?) {
            Value::Object(map) => map,
            _ => return Err(Error::document("profile is not an object")),
        };
        typed.insert(
            "createdAt".to_string(),
            value::timestamp(profile.created_at.unwrap_or_else(Utc::now)),
        );

        let request = Fetch::patch(&self.client, &self.document_url(collection, user_id));
        self.send_patch(request, Value::Object(typed)).await
    }
}
