//! Generic CRUD over a per-user collection endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::fetch::ApiRequest;

/// A record served from a REST collection such as `/portfolios/skills/`.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Fields sent on create and update.
    type Form: Serialize + Send + Sync;
    /// Identifier used in detail URLs (numeric id or slug).
    type Key: Display + Send + Sync;

    /// Collection path, with leading and trailing slash.
    const PATH: &'static str;

    fn key(&self) -> Self::Key;
}

/// What a resource page needs from its data source.
///
/// Mutations report only success; callers re-fetch the list afterwards.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    type Item: Send;
    type Form: Send + Sync;
    type Key: Send + Sync;

    async fn list(&self) -> Result<Vec<Self::Item>, ApiError>;

    async fn create(&self, form: &Self::Form) -> Result<(), ApiError>;

    async fn update(&self, key: &Self::Key, form: &Self::Form) -> Result<(), ApiError>;

    async fn delete(&self, key: &Self::Key) -> Result<(), ApiError>;
}

pub fn detail_path(collection: &str, key: impl Display) -> String {
    format!("{}{}/", collection, key)
}

/// Typed client for one collection.
///
/// The inherent `create` and `update` decode the response as `R`, which only
/// works where the server echoes the full record. Through [`ResourceApi`] the
/// body is ignored.
pub struct Collection<R> {
    api: Arc<ApiClient>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> Collection<R> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            _marker: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<R>, ApiError> {
        self.api.execute_list(ApiRequest::get(R::PATH)).await
    }

    pub async fn get(&self, key: &R::Key) -> Result<R, ApiError> {
        self.api
            .execute(ApiRequest::get(&detail_path(R::PATH, key)))
            .await
    }

    pub async fn create(&self, form: &R::Form) -> Result<R, ApiError> {
        self.api.execute(ApiRequest::post(R::PATH).json(form)?).await
    }

    pub async fn update(&self, key: &R::Key, form: &R::Form) -> Result<R, ApiError> {
        self.api
            .execute(ApiRequest::put(&detail_path(R::PATH, key)).json(form)?)
            .await
    }

    pub async fn delete(&self, key: &R::Key) -> Result<(), ApiError> {
        self.api
            .execute_empty(ApiRequest::delete(&detail_path(R::PATH, key)))
            .await
    }
}

#[async_trait]
impl<R: Resource> ResourceApi for Collection<R> {
    type Item = R;
    type Form = R::Form;
    type Key = R::Key;

    async fn list(&self) -> Result<Vec<R>, ApiError> {
        Collection::list(self).await
    }

    async fn create(&self, form: &R::Form) -> Result<(), ApiError> {
        self.api
            .execute_empty(ApiRequest::post(R::PATH).json(form)?)
            .await
    }

    async fn update(&self, key: &R::Key, form: &R::Form) -> Result<(), ApiError> {
        self.api
            .execute_empty(ApiRequest::put(&detail_path(R::PATH, key)).json(form)?)
            .await
    }

    async fn delete(&self, key: &R::Key) -> Result<(), ApiError> {
        Collection::delete(self, key).await
    }
}
