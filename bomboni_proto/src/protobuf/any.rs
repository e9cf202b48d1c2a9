use crate::google::protobuf::Any;
use prost::{DecodeError, EncodeError, Message, Name};

impl Any {
    #[must_use]
    pub fn new(type_url: String, value: Vec<u8>) -> Self {
        Self { type_url, value }
    }

    pub fn pack_from<T>(message: &T) -> Result<Self, EncodeError>
    where
        T: Name,
    {
        let type_url = T::type_url();
        let mut value = Vec::new();
        Message::encode(message, &mut value)?;
        Ok(Self { type_url, value })
    }

    pub fn unpack_into<T>(self) -> Result<T, DecodeError>
    where
        T: Default + Name,
    {
        let expected_type_url = T::type_url();
        if expected_type_url != self.type_url {
            return Err(DecodeError::new(format!(
                "expected type URL `{}`, but got `{}`",
                expected_type_url, &self.type_url
            )));
        }
        T::decode(&*self.value)
    }
}

#[cfg(test)]
mod tests {
    use crate::google::rpc::Status;

    use super::*;

    #[test]
    fn it_works() {
        let msg = Status::new(crate::google::rpc::Code::InvalidArgument, "bad".into(), vec![]);
        let any = Any::pack_from(&msg).unwrap();
        let decoded: Status = any.unpack_into().unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn errors() {
        let any = Any::pack_from(&Status::default()).unwrap();
        assert!(any.unpack_into::<crate::google::protobuf::Empty>().is_err());
    }
}
