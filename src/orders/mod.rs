//! Order placement through the tabular REST API

mod cart;
mod types;

use reqwest::Client;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

pub use cart::*;
pub use types::*;

/// Client for the order tables
#[derive(Debug, Clone)]
pub struct OrdersClient {
    /// The base URL of the tabular service
    url: String,

    /// The API key, also the bearer token until a user token is set
    key: String,

    orders_table: String,
    items_table: String,

    /// HTTP client
    client: Client,

    token: Option<String>,
}

impl OrdersClient {
    /// Create a new OrdersClient
    pub fn new(options: &ClientOptions, client: Client) -> Self {
        Self {
            url: options.tabular_url.clone(),
            key: options.tabular_key.clone(),
            orders_table: options.orders_table.clone(),
            items_table: options.order_items_table.clone(),
            client,
            token: None,
        }
    }

    /// A copy of this client sending the given user token
    pub fn with_auth(&self, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..self.clone()
        }
    }

    /// Get the REST URL of a table
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    fn insert_request(&self, table: &str, prefer: &str) -> FetchBuilder<'_> {
        let token = self.token.as_deref().unwrap_or(&self.key);
        Fetch::post(&self.client, &self.table_url(table))
            .header("apikey", &self.key)
            .bearer_auth(token)
            .header("Prefer", prefer)
    }

    /// Insert an order header and return the stored row
    pub async fn insert_order(&self, order: &NewOrder) -> Result<OrderRow, Error> {
        let response = self
            .insert_request(&self.orders_table, "return=representation")
            .json(&[order])?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::database(format!("insert order: status {}: {}", status, text)));
        }

        let rows = response.json::<Vec<OrderRow>>().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::database("insert order returned no row"))
    }

    /// Insert the line items of an order
    pub async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), Error> {
        if items.is_empty() {
            return Ok(());
        }

        let response = self
            .insert_request(&self.items_table, "return=minimal")
            .json(items)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::database(format!("insert items: status {}: {}", status, text)));
        }
        Ok(())
    }
}
