use crate::google::protobuf::Any;
use crate::google::rpc::{Code, Status};

impl Status {
    #[must_use]
    pub fn new(code: Code, message: String, details: Vec<Any>) -> Self {
        Self {
            code: code as i32,
            message,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_numeric_code() {
        let s = Status::new(Code::NotFound, "missing".to_string(), vec![]);
        assert_eq!(s.code, Code::NotFound as i32);
        assert_eq!(s.message, "missing");
    }
}
