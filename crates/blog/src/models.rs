use chrono::{DateTime, Utc};
use devfolio_auth::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
    /// Also used when the payload carries no status, as list items do.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
            PostStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub posts_count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub posts_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A blog post.
///
/// List endpoints return a lighter shape; fields they omit take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub views_count: u32,
    #[serde(default)]
    pub reading_time: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}

/// Writable post fields; tags are sent by name and created on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: Option<i64>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub meta_description: String,
    pub meta_keywords: String,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: None,
            tags: Vec::new(),
            status: PostStatus::Draft,
            meta_description: String::new(),
            meta_keywords: String::new(),
        }
    }
}

impl PostForm {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }
}

impl From<&BlogPost> for PostForm {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            category: post.category,
            tags: post.tags.iter().map(|tag| tag.name.clone()).collect(),
            status: match post.status {
                PostStatus::Unknown => PostStatus::Draft,
                status => status,
            },
            meta_description: post.meta_description.clone(),
            meta_keywords: post.meta_keywords.clone(),
        }
    }
}

/// Query parameters of the public post listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author: Option<String>,
    pub status: Option<PostStatus>,
    pub category: Option<i64>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl PostFilter {
    /// Published posts of one author, as the public profile shows them.
    pub fn published_by(author: &str) -> Self {
        Self {
            author: Some(author.to_string()),
            status: Some(PostStatus::Published),
            ..Default::default()
        }
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    pub fn tag(mut self, slug: &str) -> Self {
        self.tag_slug = Some(slug.to_string());
        self
    }

    pub fn category_slug(mut self, slug: &str) -> Self {
        self.category_slug = Some(slug.to_string());
        self
    }

    pub fn ordering(mut self, field: &str) -> Self {
        self.ordering = Some(field.to_string());
        self
    }

    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(author) = &self.author {
            pairs.push(("author", author.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(slug) = &self.category_slug {
            pairs.push(("category_slug", slug.clone()));
        }
        if let Some(slug) = &self.tag_slug {
            pairs.push(("tag_slug", slug.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        pairs
    }
}

impl Resource for BlogPost {
    type Form = PostForm;
    type Key = String;
    const PATH: &'static str = "/blog/posts/";

    fn key(&self) -> String {
        self.slug.clone()
    }
}

impl Resource for Category {
    type Form = CategoryForm;
    type Key = String;
    const PATH: &'static str = "/blog/categories/";

    fn key(&self) -> String {
        self.slug.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_items_without_status_read_as_unknown() {
        let post: BlogPost = serde_json::from_str(
            r#"{"id": 1, "author_name": "jane", "title": "Hello", "slug": "hello",
                "excerpt": "", "cover_image": null, "category_name": null,
                "tags": [{"id": 1, "name": "rust", "slug": "rust", "posts_count": 1}],
                "views_count": 3, "reading_time": 1, "comments_count": 0,
                "published_at": null, "created_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(post.status, PostStatus::Unknown);
        assert_eq!(post.tag_names(), vec!["rust"]);
        assert_eq!(PostForm::from(&post).status, PostStatus::Draft);
    }

    #[test]
    fn filter_pairs_skip_unset_fields() {
        let filter = PostFilter::published_by("jane").search("tokio");
        assert_eq!(
            filter.pairs(),
            vec![
                ("author", "jane".to_string()),
                ("status", "published".to_string()),
                ("search", "tokio".to_string()),
            ]
        );
        assert!(PostFilter::default().pairs().is_empty());
    }

    #[test]
    fn new_posts_default_to_draft() {
        let form = PostForm::new("Title", "Body");
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["status"], "draft");
        assert!(value["category"].is_null());
    }
}
