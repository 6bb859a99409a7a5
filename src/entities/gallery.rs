//! Gallery images

use super::{CreateContext, Record, merge, merge_text};
use crate::core::error::PortalResult;
use crate::core::validation::{filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub title: String,
    pub image_url: String,
    pub category: Option<String>,
    pub caption: Option<String>,
}

crate::impl_entity!(GalleryItem, "gallery item", "gallery",
    unique: [],
    fields: {
        "category" => |g| g.category.clone(),
    }
);

#[derive(Debug, Deserialize, Validate)]
pub struct NewGalleryItem {
    #[validate(length(max = 200), custom(function = "validators::not_blank"))]
    pub title: String,

    #[validate(custom(function = "validators::link"))]
    pub image_url: String,

    #[validate(length(max = 60))]
    pub category: Option<String>,

    #[validate(length(max = 500))]
    pub caption: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GalleryItemUpdate {
    #[validate(length(max = 200), custom(function = "validators::not_blank"))]
    pub title: Option<String>,

    #[validate(custom(function = "validators::link"))]
    pub image_url: Option<String>,

    #[validate(length(max = 60))]
    pub category: Option<String>,

    #[validate(length(max = 500))]
    pub caption: Option<String>,
}

impl Record for GalleryItem {
    type Create = NewGalleryItem;
    type Update = GalleryItemUpdate;

    fn from_create(input: NewGalleryItem, ctx: &CreateContext) -> PortalResult<Self> {
        Ok(GalleryItem {
            id: ctx.id,
            created_at: ctx.now,
            updated_at: ctx.now,
            title: filters::trim(&input.title),
            image_url: filters::trim(&input.image_url),
            category: filters::trim_opt(input.category).map(|c| c.to_lowercase()),
            caption: filters::trim_opt(input.caption),
        })
    }

    fn apply_update(&mut self, input: GalleryItemUpdate) -> PortalResult<()> {
        merge(&mut self.title, input.title.map(|v| filters::trim(&v)));
        merge(&mut self.image_url, input.image_url.map(|v| filters::trim(&v)));
        merge_text(&mut self.category, input.category.map(|c| c.to_lowercase()));
        merge_text(&mut self.caption, input.caption);
        Ok(())
    }
}
