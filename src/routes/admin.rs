use crate::operations::OperationDescriptor;

/// Role required by every operation in this tier, read from the token's
/// public metadata.
pub const ADMIN_ROLE: &str = "admin";

const ADMIN_OPERATIONS: &[&str] = &[
    // Catalogue management
    "servicesCount",
    "createService",
    "updateService",
    "deleteService",
    // Blog management, drafts included
    "adminBlogPosts",
    "adminBlogPost",
    "adminBlogPostBySlug",
    "adminBlogPostsCount",
    "createBlogPost",
    "updateBlogPost",
    "deleteBlogPost",
    // Lead pipeline
    "leads",
    "lead",
    "leadsCount",
    "updateLead",
    "deleteLead",
    // Accounts
    "users",
    "user",
    "userByClerkId",
    "usersCount",
    "createUser",
    "updateUserRole",
    "deleteUser",
    "dashboardStats",
];

/// Admin Operations
///
/// Management operations for the admin panel. A valid token is not enough:
/// the identity must carry the `admin` role, otherwise the call is `Forbidden`.
pub fn admin_operations() -> Vec<OperationDescriptor> {
    ADMIN_OPERATIONS
        .iter()
        .map(|name| OperationDescriptor::restricted(*name, [ADMIN_ROLE]))
        .collect()
}
