//! Binary attachment as handed over by the transport layer.

/// An uploaded file: declared name, declared MIME type, declared size and the
/// raw payload. The declared size is what the carrier reported, which is what
/// decides whether the attachment counts as present.
#[derive(Clone, Debug, Default)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as i64;
        Self { name: name.into(), content_type, size, bytes }
    }

    /// A zero-sized carrier stands for "no file was attached".
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::UploadedFile;

    #[test]
    fn new_derives_size_from_payload() {
        let f = UploadedFile::new("facade", Some("image/jpeg".into()), vec![0u8; 42]);
        assert_eq!(f.size, 42);
        assert!(!f.is_empty());
    }

    #[test]
    fn zero_sized_carrier_counts_as_absent() {
        let f = UploadedFile::new("facade", None, Vec::new());
        assert!(f.is_empty());
    }
}
