//! Supabase Storage gateway.
//!
//! Implements [`StorageGateway`] against the Supabase Storage REST API:
//!
//! - Listing: `POST {project}/storage/v1/object/list/{bucket}` with a JSON
//!   body carrying `prefix`, optional `limit`, and a `sortBy` clause.
//! - Public URLs: `{project}/storage/v1/object/public/{bucket}/{path}`, a
//!   pure string derivation — no request involved.
//!
//! Folder pseudo-entries come back with a null `id` and null timestamps,
//! which is why [`EntryDescriptor`] keeps both optional. An anon key, when
//! configured, is sent as the `apikey` header; anything beyond that (signed
//! URLs, RLS-scoped tokens) is out of scope.

use crate::config::{ConfigError, SupabaseConfig};
use crate::storage::{
    EntryDescriptor, SortColumn, SortOrder, SortSpec, StorageError, StorageGateway,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// HTTP gateway to one bucket of a Supabase Storage project.
#[derive(Debug, Clone)]
pub struct SupabaseGateway {
    http: reqwest::Client,
    project_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl SupabaseGateway {
    pub fn new(config: &SupabaseConfig, bucket: &str) -> Result<Self, ConfigError> {
        if config.project_url.is_empty() {
            return Err(ConfigError::Validation(
                "supabase.project_url is not configured".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Validation(format!("http client construction: {e}")))?;
        Ok(Self {
            http,
            project_url: config.project_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key: (!config.api_key.is_empty()).then(|| config.api_key.clone()),
        })
    }

    fn list_endpoint(&self) -> String {
        format!("{}/storage/v1/object/list/{}", self.project_url, self.bucket)
    }
}

/// Body of a list request, mirroring the storage API's JSON shape.
#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    offset: usize,
    #[serde(rename = "sortBy")]
    sort_by: SortByClause,
}

#[derive(Debug, Serialize)]
struct SortByClause {
    column: &'static str,
    order: &'static str,
}

impl From<SortSpec> for SortByClause {
    fn from(sort: SortSpec) -> Self {
        Self {
            column: match sort.column {
                SortColumn::Name => "name",
                SortColumn::CreatedAt => "created_at",
            },
            order: match sort.order {
                SortOrder::Ascending => "asc",
                SortOrder::Descending => "desc",
            },
        }
    }
}

/// One object/folder row of a list response. Extra fields the API returns
/// (`updated_at`, `metadata`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    id: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<ListedObject> for EntryDescriptor {
    fn from(obj: ListedObject) -> Self {
        Self {
            name: obj.name,
            id: obj.id,
            created_at: obj.created_at,
        }
    }
}

#[async_trait]
impl StorageGateway for SupabaseGateway {
    async fn list_entries(
        &self,
        path: &str,
        sort: SortSpec,
    ) -> Result<Vec<EntryDescriptor>, StorageError> {
        let body = ListRequest {
            prefix: path,
            limit: sort.limit,
            offset: 0,
            sort_by: sort.into(),
        };

        let mut request = self.http.post(self.list_endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Transient(format!("listing {path}: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(path.to_string())),
            status if !status.is_success() => Err(StorageError::Transient(format!(
                "listing {path}: store returned {status}"
            ))),
            _ => {
                let objects: Vec<ListedObject> = response
                    .json()
                    .await
                    .map_err(|e| StorageError::Transient(format!("listing {path}: {e}")))?;
                Ok(objects.into_iter().map(EntryDescriptor::from).collect())
            }
        }
    }

    fn resolve_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.project_url, self.bucket
        )
    }
}
