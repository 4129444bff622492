use crate::operations::OperationDescriptor;

/// Authenticated Operations
///
/// Operations open to any caller with a verified token, whatever its role.
pub fn authenticated_operations() -> Vec<OperationDescriptor> {
    vec![
        // The caller's own identity, straight from the verified token.
        OperationDescriptor::authenticated("me"),
    ]
}
