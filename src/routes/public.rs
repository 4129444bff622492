use crate::operations::OperationDescriptor;

/// Public Operations
///
/// Operations any caller may invoke, with or without a credential. No token
/// is inspected for these, so they never see an identity.
///
/// Blog reads in this tier only ever return published posts; drafts are
/// reachable through the admin tier.
pub fn public_operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::public("health"),
        // Catalogue reads for the marketing site.
        OperationDescriptor::public("services"),
        OperationDescriptor::public("service"),
        OperationDescriptor::public("serviceBySlug"),
        // Published blog.
        OperationDescriptor::public("blogPosts"),
        OperationDescriptor::public("blogPostBySlug"),
        OperationDescriptor::public("blogPostsCount"),
        // Contact form submission. Fires the lead webhook.
        OperationDescriptor::public("createLead"),
    ]
}
