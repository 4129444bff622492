use agency_api::{
    Stores,
    dashboard::{DashboardService, month_bounds},
    lifecycle::LifecycleService,
    models::{
        BlogPost, CreateBlogPostInput, CreateLeadInput, CreateServiceInput, CreateUserInput,
        Lead, LeadStatus, Service, UpdateLeadInput, User,
    },
};
use chrono::{Duration, TimeZone, Utc};

#[test]
fn test_month_bounds_mid_year() {
    let now = Utc.with_ymd_and_hms(2025, 6, 17, 13, 45, 0).unwrap();
    let (last, this) = month_bounds(now).unwrap();

    assert_eq!(last, Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap());
    assert_eq!(this, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_month_bounds_wrap_into_previous_year() {
    let now = Utc.with_ymd_and_hms(2026, 1, 3, 8, 0, 0).unwrap();
    let (last, this) = month_bounds(now).unwrap();

    assert_eq!(last, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
    assert_eq!(this, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
}

#[tokio::test]
async fn test_stats_count_every_bucket() {
    let stores = Stores::in_memory();
    let catalog = LifecycleService::<Service>::new(stores.services);
    let blog = LifecycleService::<BlogPost>::new(stores.blog_posts);
    let leads = LifecycleService::<Lead>::new(stores.leads);
    let accounts = LifecycleService::<User>::new(stores.users);

    for (slug, active) in [("web", true), ("seo", false)] {
        catalog
            .create(CreateServiceInput {
                name: "Service".to_string(),
                slug: slug.to_string(),
                description: "A description long enough".to_string(),
                icon: None,
                order: None,
                starting_price: None,
                is_active: Some(active),
                translations: None,
            })
            .await
            .unwrap();
    }
    for (slug, published) in [("one", true), ("two", false), ("three", false)] {
        blog.create(CreateBlogPostInput {
            title: "Title".to_string(),
            slug: slug.to_string(),
            excerpt: None,
            content: "Some content here".to_string(),
            cover_image: None,
            seo_metadata: None,
            is_published: Some(published),
            translations: None,
        })
        .await
        .unwrap();
    }
    let mut lead_ids = Vec::new();
    for _ in 0..3 {
        let lead = leads
            .create(CreateLeadInput {
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                company: None,
                message: "I would like a quote.".to_string(),
            })
            .await
            .unwrap();
        lead_ids.push(lead.id);
    }
    leads
        .update(
            lead_ids[0],
            UpdateLeadInput {
                status: Some(LeadStatus::Contacted),
                ..UpdateLeadInput::default()
            },
        )
        .await
        .unwrap();
    accounts
        .create(CreateUserInput {
            clerk_user_id: "user_1".to_string(),
            role: None,
        })
        .await
        .unwrap();

    let dashboard = DashboardService::new(catalog, blog, leads, accounts);

    let stats = dashboard.stats().await.unwrap();
    assert_eq!(stats.total_services, 2);
    assert_eq!(stats.active_services, 1);
    assert_eq!(stats.total_blog_posts, 3);
    assert_eq!(stats.published_blog_posts, 1);
    assert_eq!(stats.draft_blog_posts, 2);
    assert_eq!(stats.total_leads, 3);
    assert_eq!(stats.new_leads, 2);
    assert_eq!(stats.contacted_leads, 1);
    assert_eq!(stats.qualified_leads, 0);
    assert_eq!(stats.leads_this_month, 3);
    assert_eq!(stats.leads_last_month, 0);
    assert_eq!(stats.total_users, 1);

    // Seen from next month, this month's leads land in the "last month" bucket.
    let (_, this_month_start) = month_bounds(Utc::now()).unwrap();
    let next_month = this_month_start + Duration::days(40);
    let later = dashboard.stats_at(next_month).await.unwrap();
    assert_eq!(later.leads_last_month, 3);
    assert_eq!(later.leads_this_month, 0);
    assert_eq!(later.total_leads, 3);
}
