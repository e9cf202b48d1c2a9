#![doc = include_str!("../../README.md")]

mod protobuf;
mod rpc;

/// Includes generated protobuf code.
/// Base path is specified with `OUT_DIR` environment variable.
#[macro_export]
macro_rules! include_proto {
    ($package: tt) => {
        include!(concat!(env!("OUT_DIR"), concat!("/", $package, ".rs")));
    };
}

/// Includes generated protobuf file descriptor set.
#[macro_export]
macro_rules! include_file_descriptor_set {
    () => {
        include_file_descriptor_set!("fd");
    };
    ($name:tt) => {
        include_bytes!(concat!(env!("OUT_DIR"), concat!("/", $name, ".fd")));
    };
}

#[allow(
    unused_qualifications,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_html_tags
)]
/// Generated Google protobuf and RPC types.
pub mod google {
    /// Generated Google protobuf message types.
    #[allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]
    pub mod protobuf {
        crate::include_proto!("google.protobuf");
    }
    /// Generated Google RPC status and error types.
    #[allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]
    pub mod rpc {
        crate::include_proto!("google.rpc");
    }
}

#[cfg(test)]
mod tests {
    use prost::Name;

    use super::google::rpc::Status;

    #[test]
    fn it_works() {
        assert_eq!(Status::type_url(), "type.googleapis.com/google.rpc.Status");
    }
}
