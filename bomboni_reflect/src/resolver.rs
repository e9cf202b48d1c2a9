use prost_reflect::{DescriptorPool, ExtensionDescriptor, MessageDescriptor};

use crate::error::ResolutionError;

/// Resolves a Protobuf type URL or extension full name against a descriptor
/// pool supplied by the host. Read-only and safe to share across many codec
/// calls.
pub trait Resolver: Send + Sync {
    /// Resolves `Any.type_url` (e.g. `type.googleapis.com/google.protobuf.Duration`)
    /// to the descriptor of the message it embeds.
    fn find_message_by_url(&self, type_url: &str) -> Result<MessageDescriptor, ResolutionError>;

    /// Resolves a fully qualified extension name, as used inside a JSON
    /// object key of the form `[fully.qualified.name]`.
    fn find_extension_by_name(
        &self,
        full_name: &str,
    ) -> Result<ExtensionDescriptor, ResolutionError>;
}

/// Extracts the bare message type name from a type URL, i.e. everything
/// after the last `/`.
#[must_use]
pub fn type_name_from_url(type_url: &str) -> &str {
    match type_url.rsplit_once('/') {
        Some((_, name)) => name,
        None => type_url,
    }
}

/// The default [`Resolver`], backed directly by a `prost_reflect`
/// [`DescriptorPool`].
pub struct PoolResolver {
    pool: DescriptorPool,
}

impl PoolResolver {
    #[must_use]
    pub fn new(pool: DescriptorPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}

impl Resolver for PoolResolver {
    fn find_message_by_url(&self, type_url: &str) -> Result<MessageDescriptor, ResolutionError> {
        let name = type_name_from_url(type_url);
        self.pool
            .get_message_by_name(name)
            .ok_or_else(|| ResolutionError::UnknownTypeUrl {
                type_url: type_url.to_string(),
            })
    }

    fn find_extension_by_name(
        &self,
        full_name: &str,
    ) -> Result<ExtensionDescriptor, ResolutionError> {
        self.pool
            .all_extensions()
            .find(|ext| ext.full_name() == full_name)
            .ok_or_else(|| ResolutionError::UnknownExtension {
                name: full_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::type_name_from_url;

    #[test]
    fn strips_url_prefix() {
        assert_eq!(
            type_name_from_url("type.googleapis.com/google.protobuf.Duration"),
            "google.protobuf.Duration"
        );
        assert_eq!(type_name_from_url("google.protobuf.Duration"), "google.protobuf.Duration");
    }
}
