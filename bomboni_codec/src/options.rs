use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use bomboni_reflect::Resolver;

/// Options controlling [`crate::marshal`].
#[derive(Clone, Default)]
pub struct MarshalOptions {
    /// When set, the emitted JSON is pretty-printed with this indent string
    /// (spaces or tabs only) instead of the default compact form.
    pub indent: Option<String>,
    /// Emit fields that are absent/default instead of omitting them. Not
    /// honored for well-known-type custom shapes, which always follow their
    /// own rules.
    pub emit_unpopulated: bool,
    /// Resolver used to expand extension field names of the form
    /// `[fully.qualified.name]`.
    pub resolver: Option<Arc<dyn Resolver>>,
}

impl Debug for MarshalOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshalOptions")
            .field("indent", &self.indent)
            .field("emit_unpopulated", &self.emit_unpopulated)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Options controlling [`crate::unmarshal`].
#[derive(Clone, Default)]
pub struct UnmarshalOptions {
    /// Skip the post-decode check that all `required` (proto2) fields are
    /// set, and suppress the corresponding non-fatal errors.
    pub allow_partial: bool,
    /// Skip unknown fields instead of treating them as a fatal error.
    pub discard_unknown: bool,
    /// Resolver used for `Any.type_url` and extension field names.
    pub resolver: Option<Arc<dyn Resolver>>,
}

impl Debug for UnmarshalOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnmarshalOptions")
            .field("allow_partial", &self.allow_partial)
            .field("discard_unknown", &self.discard_unknown)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}
