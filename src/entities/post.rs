//! Blog posts / news items

use super::{CreateContext, Record, merge, merge_text};
use crate::core::error::{PortalResult, ValidationError};
use crate::core::validation::{filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

crate::impl_entity!(Post, "post", "posts",
    unique: ["slug"],
    fields: {
        "slug" => |p| Some(p.slug.clone()),
        "published" => |p| Some(p.published.to_string()),
        "author" => |p| p.author.clone(),
    }
);

impl Post {
    /// Flip the published flag, stamping `published_at` on first publish
    fn set_published(&mut self, published: bool, at: DateTime<Utc>) {
        self.published = published;
        if published && self.published_at.is_none() {
            self.published_at = Some(at);
        }
    }
}

fn slug_or_title(slug: Option<String>, title: &str) -> Result<String, ValidationError> {
    let slug = match filters::trim_opt(slug) {
        Some(slug) => slug,
        None => filters::slugify(title),
    };
    if slug.is_empty() {
        return Err(ValidationError::FieldError {
            field: "slug".to_string(),
            message: "could not derive a slug from the title".to_string(),
        });
    }
    Ok(slug)
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewPost {
    #[validate(length(max = 200), custom(function = "validators::not_blank"))]
    pub title: String,

    /// Derived from the title when absent
    #[validate(length(max = 200), custom(function = "validators::slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 500))]
    pub excerpt: Option<String>,

    #[validate(custom(function = "validators::not_blank"))]
    pub content: String,

    #[validate(length(max = 120))]
    pub author: Option<String>,

    #[validate(custom(function = "validators::link"))]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PostUpdate {
    #[validate(length(max = 200), custom(function = "validators::not_blank"))]
    pub title: Option<String>,

    #[validate(length(max = 200), custom(function = "validators::slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 500))]
    pub excerpt: Option<String>,

    #[validate(custom(function = "validators::not_blank"))]
    pub content: Option<String>,

    #[validate(length(max = 120))]
    pub author: Option<String>,

    #[validate(custom(function = "validators::link"))]
    pub cover_image_url: Option<String>,

    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,

    pub published: Option<bool>,
}

impl Record for Post {
    type Create = NewPost;
    type Update = PostUpdate;

    fn from_create(input: NewPost, ctx: &CreateContext) -> PortalResult<Self> {
        let slug = slug_or_title(input.slug, &input.title)?;

        let mut post = Post {
            id: ctx.id,
            created_at: ctx.now,
            updated_at: ctx.now,
            title: filters::trim(&input.title),
            slug,
            excerpt: filters::trim_opt(input.excerpt),
            content: input.content,
            author: filters::trim_opt(input.author),
            cover_image_url: filters::trim_opt(input.cover_image_url),
            tags: filters::tags(input.tags),
            published: false,
            published_at: None,
        };
        post.set_published(input.published, ctx.now);
        Ok(post)
    }

    fn apply_update(&mut self, input: PostUpdate) -> PortalResult<()> {
        merge(&mut self.title, input.title.map(|v| filters::trim(&v)));
        merge(&mut self.slug, input.slug);
        merge_text(&mut self.excerpt, input.excerpt);
        merge(&mut self.content, input.content);
        merge_text(&mut self.author, input.author);
        merge_text(&mut self.cover_image_url, input.cover_image_url);
        merge(&mut self.tags, input.tags.map(filters::tags));
        if let Some(published) = input.published {
            self.set_published(published, Utc::now());
        }
        Ok(())
    }

    fn publicly_visible(&self) -> bool {
        self.published
    }
}
