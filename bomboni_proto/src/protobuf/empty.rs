use crate::google::protobuf::Empty;

impl Empty {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}
