use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

use super::{Entity, LifecycleService};
use crate::models::{BlogPost, BlogPostFilter, CreateBlogPostInput, UpdateBlogPostInput};

pub type BlogService = LifecycleService<BlogPost>;

impl Entity for BlogPost {
    type Create = CreateBlogPostInput;
    type Patch = UpdateBlogPostInput;
    type Filter = BlogPostFilter;

    const KIND: &'static str = "BlogPost";
    const KEY_NAME: &'static str = "slug";
    const DEFAULT_TAKE: i64 = 10;

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn requested_key(input: &CreateBlogPostInput) -> Option<&str> {
        Some(&input.slug)
    }

    fn build(input: CreateBlogPostInput, now: DateTime<Utc>) -> Self {
        let is_published = input.is_published.unwrap_or(false);
        Self {
            id: Uuid::new_v4(),
            slug: input.slug,
            title: input.title,
            excerpt: input.excerpt,
            content: input.content,
            cover_image: input.cover_image,
            seo_metadata: input.seo_metadata,
            is_published,
            published_at: is_published.then_some(now),
            translations: input.translations,
            created_at: now,
            updated_at: now,
        }
    }

    /// `published_at` is stamped on the first publish and survives unpublishing.
    fn merge(&mut self, patch: UpdateBlogPostInput, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = Some(excerpt);
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(cover) = patch.cover_image {
            self.cover_image = Some(cover);
        }
        if let Some(seo) = patch.seo_metadata {
            self.seo_metadata = Some(seo);
        }
        if let Some(publish) = patch.is_published {
            if publish && self.published_at.is_none() {
                self.published_at = Some(now);
            }
            self.is_published = publish;
        }
        if let Some(translations) = patch.translations {
            self.translations = Some(translations);
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &BlogPostFilter) -> bool {
        filter
            .is_published
            .is_none_or(|published| self.is_published == published)
    }

    /// Most recent first: by publication date for published listings,
    /// by creation date otherwise.
    fn listing_order(a: &Self, b: &Self, filter: &BlogPostFilter) -> Ordering {
        if filter.is_published == Some(true) {
            // Option orders None first; reversing puts undated posts last.
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        } else {
            b.created_at.cmp(&a.created_at)
        }
    }
}
