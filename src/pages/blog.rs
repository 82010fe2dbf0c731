use devfolio_blog::{BlogClient, BlogPost, MyPosts, PostForm};

use super::resource::{messages, ResourcePage};
use super::tags::{TagInput, TagPolicy};
use super::{server_message, PageState};

/// The signed-in user's blog page
pub struct BlogPage {
    posts: ResourcePage<MyPosts>,
    tags: TagInput,
    // Set once the tag input was seeded or edited; until then a saved form
    // keeps its own tags.
    tags_in_use: bool,
}

impl BlogPage {
    pub fn new(client: &BlogClient) -> Self {
        Self {
            posts: ResourcePage::new(client.mine(), messages::POSTS),
            tags: TagInput::new(TagPolicy::Unique),
            tags_in_use: false,
        }
    }

    pub async fn load(&mut self) {
        self.posts.load().await
    }

    /// Start editing `post`: the tag input takes over its tags.
    pub fn edit(&mut self, post: &BlogPost) -> PostForm {
        let form = PostForm::from(post);
        self.tags = TagInput::with_tags(TagPolicy::Unique, form.tags.clone());
        self.tags_in_use = true;
        form
    }

    /// Save `form`. Once the tag input is in use its tags replace the
    /// form's. The input is cleared once the post was stored.
    pub async fn save(&mut self, mut form: PostForm, editing: Option<&String>) -> bool {
        if self.tags_in_use {
            form.tags = self.tags.tags().to_vec();
        }
        let saved = self.posts.submit(&form, editing).await;
        if saved {
            self.tags.clear();
            self.tags_in_use = false;
        }
        saved
    }

    pub async fn delete(&mut self, slug: &str, confirmed: bool) -> bool {
        self.posts.delete(&slug.to_string(), confirmed).await
    }

    pub async fn publish(&mut self, slug: &str) -> bool {
        let result = self.posts.source().client().publish(slug).await;
        self.posts
            .settle(result, "Post published successfully!", |err| {
                server_message(err).unwrap_or_else(|| "Failed to publish post".to_string())
            })
            .await
    }

    pub async fn unpublish(&mut self, slug: &str) -> bool {
        let result = self.posts.source().client().unpublish(slug).await;
        self.posts
            .settle(result, "Post unpublished successfully!", |_| {
                "Failed to unpublish post".to_string()
            })
            .await
    }

    pub fn posts(&self) -> &ResourcePage<MyPosts> {
        &self.posts
    }

    pub fn tags(&self) -> &TagInput {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagInput {
        self.tags_in_use = true;
        &mut self.tags
    }

    pub fn state(&self) -> &PageState {
        self.posts.state()
    }
}
