use crate::client::traits::RecordStore;
use crate::client::types::{ErrorEnvelope, RecordsEnvelope, WriteEnvelope};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::models::{Collection, Fields, RawRecord};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Record store backed by the hosted Airtable REST API
pub struct AirtableClient {
    client: Client,
    base: Url,
    config: BackendConfig,
}

impl AirtableClient {
    /// Build a client with the bearer token baked into every request.
    /// No timeout is set; the transport default applies.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid base_url {:?}: {}", config.base_url, e),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::ConfigValidation {
                message: format!("base_url cannot hold a path: {}", config.base_url),
            });
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token)).map_err(
            |_| Error::ConfigValidation {
                message: "api_token contains characters not allowed in a header".to_string(),
            },
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!("rental-scout/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base,
            config: config.clone(),
        })
    }

    /// `{base_url}/{base_id}/{table}[/{id}]`, with each segment percent-encoded
    fn url(&self, collection: Collection, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.config.base_id)
                .push(self.config.table(collection));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Body of a success response, or the failure as a typed error
    async fn body(response: Response, collection: Collection, id: Option<&str>) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("{} {} request failed with status {}", collection, id.unwrap_or("*"), status);
            return Err(error_from_response(status, &body, collection, id));
        }

        debug!("Received {} bytes for {}", body.len(), collection);
        Ok(body)
    }

    async fn read<T: DeserializeOwned>(
        response: Response,
        collection: Collection,
        id: Option<&str>,
    ) -> Result<T> {
        let body = Self::body(response, collection, id).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn first_record(envelope: RecordsEnvelope, status_hint: &str) -> Result<RawRecord> {
        envelope
            .records
            .into_iter()
            .next()
            .ok_or_else(|| Error::Backend {
                status: 200,
                message: format!("{} response carried no records", status_hint),
            })
    }
}

/// Map a non-success response to an error. 404 on a single record is `NotFound`.
fn error_from_response(
    status: StatusCode,
    body: &str,
    collection: Collection,
    id: Option<&str>,
) -> Error {
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Error::NotFound {
                collection,
                id: id.to_string(),
            };
        }
    }

    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message())
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    Error::Backend {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list(&self, collection: Collection) -> Result<Vec<RawRecord>> {
        let url = self.url(collection, None);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("view", self.config.view.as_str())])
            .send()
            .await?;

        let envelope: RecordsEnvelope = Self::read(response, collection, None).await?;
        if let Some(offset) = &envelope.offset {
            // Only the first page is ever shown
            debug!("Ignoring pagination offset {} for {}", offset, collection);
        }

        info!("Fetched {} {}", envelope.records.len(), collection);
        Ok(envelope.records)
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<RawRecord> {
        let url = self.url(collection, Some(id));
        debug!("Fetching URL: {}", url);

        let response = self.client.get(url).send().await?;
        Self::read(response, collection, Some(id)).await
    }

    async fn create(&self, collection: Collection, fields: Fields) -> Result<RawRecord> {
        let response = self
            .client
            .post(self.url(collection, None))
            .json(&WriteEnvelope::create(&fields))
            .send()
            .await?;

        let envelope: RecordsEnvelope = Self::read(response, collection, None).await?;
        let record = Self::first_record(envelope, "create")?;
        info!("Created {} record {}", collection, record.id);
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> Result<RawRecord> {
        let response = self
            .client
            .patch(self.url(collection, None))
            .json(&WriteEnvelope::update(id, &fields))
            .send()
            .await?;

        let envelope: RecordsEnvelope = Self::read(response, collection, Some(id)).await?;
        let record = Self::first_record(envelope, "update")?;
        info!("Updated {} record {}", collection, record.id);
        Ok(record)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(collection, Some(id)))
            .send()
            .await?;

        // The confirmation body is not needed, and may be empty
        Self::body(response, collection, Some(id)).await?;
        info!("Deleted {} record {}", collection, id);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Airtable"
    }
}
