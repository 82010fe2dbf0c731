/// How a [`TagInput`] treats a tag it already holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPolicy {
    /// Adding an existing tag does nothing (blog tags).
    Unique,
    /// Every non-empty entry is appended (tech stack).
    AllowDuplicates,
}

/// Free-text list editor for tags and tech stacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInput {
    tags: Vec<String>,
    policy: TagPolicy,
}

impl TagInput {
    pub fn new(policy: TagPolicy) -> Self {
        Self {
            tags: Vec::new(),
            policy,
        }
    }

    /// Start from existing tags, e.g. when editing a record.
    pub fn with_tags(policy: TagPolicy, tags: Vec<String>) -> Self {
        Self { tags, policy }
    }

    /// Trim and add `raw`. Returns whether the list changed.
    pub fn add(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() {
            return false;
        }
        if self.policy == TagPolicy::Unique && self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.tags.len() {
            Some(self.tags.remove(index))
        } else {
            None
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
