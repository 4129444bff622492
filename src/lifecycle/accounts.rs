use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

use super::{Entity, LifecycleService};
use crate::models::{CreateUserInput, User, UserFilter, UserPatch};

pub type AccountService = LifecycleService<User>;

impl Entity for User {
    type Create = CreateUserInput;
    type Patch = UserPatch;
    type Filter = UserFilter;

    const KIND: &'static str = "User";
    const KEY_NAME: &'static str = "clerkUserId";
    const DEFAULT_TAKE: i64 = 20;

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.clerk_user_id)
    }

    fn requested_key(input: &CreateUserInput) -> Option<&str> {
        Some(&input.clerk_user_id)
    }

    fn build(input: CreateUserInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            clerk_user_id: input.clerk_user_id,
            role: input.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        if let Some(role) = patch.role {
            self.role = role;
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter.role.is_none_or(|role| self.role == role)
    }

    fn listing_order(a: &Self, b: &Self, _filter: &UserFilter) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}
