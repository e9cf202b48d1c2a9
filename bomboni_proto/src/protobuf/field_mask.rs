use crate::google::protobuf::FieldMask;

impl FieldMask {
    #[must_use]
    pub const fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|s| s.as_str() == path)
    }

    #[must_use]
    pub fn masks(&self, field_path: &str) -> bool {
        self.paths.iter().any(|path| {
            let mut field_steps = field_path.split('.');
            for path_step in path.split('.') {
                if Some(path_step) != field_steps.next() {
                    return false;
                }
            }
            true
        })
    }
}

impl<T, P> From<T> for FieldMask
where
    T: IntoIterator<Item = P>,
    P: ToString,
{
    fn from(paths: T) -> Self {
        Self {
            paths: paths.into_iter().map(|path| path.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_mask() {
        let fm = FieldMask::new(vec!["f.b".into(), "f.c".into()]);
        assert!(fm.contains("f.b"));
        assert!(fm.masks("f.b.d"));
        assert!(!fm.masks("f.d"));
        assert!(!fm.masks("f.d.a"));
    }
}
