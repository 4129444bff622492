use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::{
    error::ApiError,
    lifecycle::{
        accounts::AccountService, blog::BlogService, catalog::CatalogService, leads::LeadService,
    },
    models::{BlogPostFilter, DashboardStats, LeadFilter, LeadStatus, ServiceFilter, UserFilter},
};

/// DashboardService
///
/// Aggregates the admin dashboard counters. All counts are issued concurrently.
#[derive(Clone)]
pub struct DashboardService {
    catalog: CatalogService,
    blog: BlogService,
    leads: LeadService,
    accounts: AccountService,
}

impl DashboardService {
    pub fn new(
        catalog: CatalogService,
        blog: BlogService,
        leads: LeadService,
        accounts: AccountService,
    ) -> Self {
        Self {
            catalog,
            blog,
            leads,
            accounts,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.stats_at(Utc::now()).await
    }

    /// Computes the counters with month windows relative to `now`.
    pub async fn stats_at(&self, now: DateTime<Utc>) -> Result<DashboardStats, ApiError> {
        let (last_month_start, this_month_start) = month_bounds(now)?;

        let active = ServiceFilter {
            is_active: Some(true),
        };
        let published = BlogPostFilter {
            is_published: Some(true),
        };
        let drafts = BlogPostFilter {
            is_published: Some(false),
        };
        let by_status = |status: LeadStatus| LeadFilter {
            status: Some(status),
            ..LeadFilter::default()
        };
        let (new, contacted, qualified) = (
            by_status(LeadStatus::New),
            by_status(LeadStatus::Contacted),
            by_status(LeadStatus::Qualified),
        );
        let this_month = LeadFilter {
            created_from: Some(this_month_start),
            ..LeadFilter::default()
        };
        let last_month = LeadFilter {
            created_from: Some(last_month_start),
            created_before: Some(this_month_start),
            ..LeadFilter::default()
        };
        let all_services = ServiceFilter::default();
        let all_posts = BlogPostFilter::default();
        let all_leads = LeadFilter::default();
        let all_users = UserFilter::default();

        let (
            total_services,
            active_services,
            total_blog_posts,
            published_blog_posts,
            draft_blog_posts,
            total_leads,
            new_leads,
            contacted_leads,
            qualified_leads,
            leads_this_month,
            leads_last_month,
            total_users,
        ) = tokio::try_join!(
            self.catalog.count(&all_services),
            self.catalog.count(&active),
            self.blog.count(&all_posts),
            self.blog.count(&published),
            self.blog.count(&drafts),
            self.leads.count(&all_leads),
            self.leads.count(&new),
            self.leads.count(&contacted),
            self.leads.count(&qualified),
            self.leads.count(&this_month),
            self.leads.count(&last_month),
            self.accounts.count(&all_users),
        )?;

        Ok(DashboardStats {
            total_services,
            active_services,
            total_blog_posts,
            published_blog_posts,
            draft_blog_posts,
            total_leads,
            new_leads,
            contacted_leads,
            qualified_leads,
            leads_this_month,
            leads_last_month,
            total_users,
        })
    }
}

/// Start of the previous month and of the current month, both in UTC.
pub fn month_bounds(now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
    let (prev_year, prev_month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };

    let first_of = |year, month| {
        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ApiError::internal("invalid month boundary"))
    };

    Ok((first_of(prev_year, prev_month)?, first_of(now.year(), now.month())?))
}
