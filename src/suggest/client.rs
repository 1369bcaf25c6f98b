use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use super::{Suggest, SuggestKind};
use crate::address::AddressRecord;
use crate::config::{ClientConfig, Credentials, ProviderErrorPolicy};
use crate::http::{HttpClient, ProviderError, Transport, with_retry};
use crate::record::Record;

/// Client for the DaData suggestion API.
pub struct DaData<T: Transport = HttpClient> {
    transport: T,
    config: ClientConfig,
}

impl DaData<HttpClient> {
    /// Client against the public API with the default retry policy.
    #[tracing::instrument(skip(credentials))]
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    #[tracing::instrument(skip(credentials))]
    pub fn with_config(credentials: &Credentials, config: ClientConfig) -> Result<Self> {
        let transport = HttpClient::with_credentials(credentials)?;
        Ok(Self::from_transport(transport, config))
    }
}

impl<T: Transport> DaData<T> {
    pub fn from_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Suggestions of any kind as plain records.
    #[tracing::instrument(skip(self))]
    pub async fn suggest(
        &self,
        kind: SuggestKind,
        query: &str,
        count: u32,
    ) -> Result<Vec<Record>> {
        let params = vec![
            ("query".to_string(), query.to_string()),
            ("count".to_string(), count.to_string()),
        ];
        let response = self.query("suggest", kind, &params).await?;

        let records: Vec<Record> = suggestions(response)
            .into_iter()
            .map(Record::from)
            .collect();
        debug!("Got {} {} suggestion(s)", records.len(), kind);

        Ok(records)
    }

    /// Lookup by identifier (KLADR/FIAS code, INN, BIC...) for any kind.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, kind: SuggestKind, query: &str) -> Result<Option<Record>> {
        let params = vec![("query".to_string(), query.to_string())];
        let response = self.query("findById", kind, &params).await?;

        if is_falsy(&response) {
            debug!("Empty response for {} lookup", kind);
            return Ok(None);
        }

        Ok(suggestions(response)
            .into_iter()
            .next()
            .filter(|first| !first.is_null())
            .map(Record::from))
    }

    /// Runs one query through the retry loop and settles the final response.
    async fn query(
        &self,
        method: &str,
        kind: SuggestKind,
        params: &[(String, String)],
    ) -> Result<Value> {
        let url = self.config.endpoint(method, kind.as_str());
        let operation_name = format!("{} {}", method, kind);

        let url = url.as_str();
        let response = with_retry(&operation_name, &self.config.retry, move || {
            self.transport.get_json(url, params)
        })
        .await?;

        self.settle(response)
    }

    /// Decides what a response that is still an error envelope after all
    /// attempts turns into.
    fn settle(&self, response: Value) -> Result<Value> {
        let Some(err) = ProviderError::from_response(&response) else {
            return Ok(response);
        };

        match self.config.provider_errors {
            ProviderErrorPolicy::Degrade => {
                debug!("Treating exhausted provider error as empty response: {}", err);
                Ok(Value::Null)
            }
            ProviderErrorPolicy::Fail => Err(err.into()),
        }
    }
}

#[async_trait]
impl<T: Transport> Suggest for DaData<T> {
    async fn suggest_address(&self, query: &str, count: u32) -> Result<Vec<AddressRecord>> {
        let records = self.suggest(SuggestKind::Address, query, count).await?;
        Ok(records.into_iter().map(AddressRecord::from).collect())
    }

    async fn find_address_by_id(&self, code: &str) -> Result<Option<AddressRecord>> {
        let record = self.find_by_id(SuggestKind::Address, code).await?;
        Ok(record.map(AddressRecord::from))
    }
}

/// Takes the `suggestions` list out of a response; anything else is empty.
fn suggestions(response: Value) -> Vec<Value> {
    match response {
        Value::Object(mut map) => match map.remove("suggestions") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
