//! DevFolio Blog client for Rust
//!
//! Posts are keyed by slug. Drafts are created with `status: draft` and
//! moved in and out of publication with [`BlogClient::publish`] and
//! [`BlogClient::unpublish`].

mod models;

pub use models::*;

use async_trait::async_trait;
use devfolio_auth::collection::detail_path;
use devfolio_auth::{ApiClient, ApiRequest, Collection, Resource, ResourceApi};
use log::info;
use std::sync::Arc;

pub use devfolio_auth::{ApiError, Result};

/// Blog client
#[derive(Debug, Clone)]
pub struct BlogClient {
    api: Arc<ApiClient>,
}

impl BlogClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Public listing. The server only ever returns published posts here.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<BlogPost>> {
        let request = filter
            .pairs()
            .into_iter()
            .fold(ApiRequest::get(BlogPost::PATH), |req, (key, value)| {
                req.query(key, value)
            });
        self.api.execute_list(request).await
    }

    /// The signed-in user's posts, optionally limited to one status.
    pub async fn my_posts(&self, status: Option<PostStatus>) -> Result<Vec<BlogPost>> {
        let request = ApiRequest::get("/blog/posts/my_posts/")
            .query_opt("status", status.map(|status| status.as_str()));
        self.api.execute_list(request).await
    }

    /// Full post with comments. Each call counts as a view.
    pub async fn get(&self, slug: &str) -> Result<BlogPost> {
        self.api
            .execute(ApiRequest::get(&detail_path(BlogPost::PATH, slug)))
            .await
    }

    pub async fn create(&self, form: &PostForm) -> Result<()> {
        self.api
            .execute_empty(ApiRequest::post(BlogPost::PATH).json(form)?)
            .await
    }

    pub async fn update(&self, slug: &str, form: &PostForm) -> Result<()> {
        self.api
            .execute_empty(ApiRequest::put(&detail_path(BlogPost::PATH, slug)).json(form)?)
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<()> {
        self.api
            .execute_empty(ApiRequest::delete(&detail_path(BlogPost::PATH, slug)))
            .await
    }

    /// Publish a draft. Publishing an already published post is a 400.
    pub async fn publish(&self, slug: &str) -> Result<BlogPost> {
        let path = format!("{}publish/", detail_path(BlogPost::PATH, slug));
        let post: BlogPost = self.api.execute(ApiRequest::post(&path)).await?;
        info!("Published {}", post.slug);
        Ok(post)
    }

    /// Move a post back to draft
    pub async fn unpublish(&self, slug: &str) -> Result<BlogPost> {
        let path = format!("{}unpublish/", detail_path(BlogPost::PATH, slug));
        let post: BlogPost = self.api.execute(ApiRequest::post(&path)).await?;
        info!("Unpublished {}", post.slug);
        Ok(post)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.categories_collection().list().await
    }

    pub async fn create_category(&self, form: &CategoryForm) -> Result<Category> {
        self.categories_collection().create(form).await
    }

    pub async fn tags(&self) -> Result<Vec<Tag>> {
        self.api.execute_list(ApiRequest::get("/blog/tags/")).await
    }

    /// The signed-in user's posts as a page data source
    pub fn mine(&self) -> MyPosts {
        MyPosts {
            client: self.clone(),
            collection: Collection::new(self.api.clone()),
        }
    }

    fn categories_collection(&self) -> Collection<Category> {
        Collection::new(self.api.clone())
    }
}

/// The signed-in user's posts, all statuses
#[derive(Clone)]
pub struct MyPosts {
    client: BlogClient,
    collection: Collection<BlogPost>,
}

impl MyPosts {
    pub fn client(&self) -> &BlogClient {
        &self.client
    }
}

#[async_trait]
impl ResourceApi for MyPosts {
    type Item = BlogPost;
    type Form = PostForm;
    type Key = String;

    async fn list(&self) -> Result<Vec<BlogPost>> {
        self.client.my_posts(None).await
    }

    async fn create(&self, form: &PostForm) -> Result<()> {
        ResourceApi::create(&self.collection, form).await
    }

    async fn update(&self, key: &String, form: &PostForm) -> Result<()> {
        ResourceApi::update(&self.collection, key, form).await
    }

    async fn delete(&self, key: &String) -> Result<()> {
        ResourceApi::delete(&self.collection, key).await
    }
}
