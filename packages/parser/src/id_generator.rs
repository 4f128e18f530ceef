use crc32fast::Hasher;

/// Generate document ID from file path using CRC32
pub fn get_document_id(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential element ID generator for one parse of one stylesheet.
///
/// The seed combines the document ID with a fresh nonce, so two parses of
/// the same file never hand out the same ID.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(path: &str) -> Self {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        Self {
            seed: format!("{}-{}", get_document_id(path), &nonce[..12]),
            count: 0,
        }
    }

    /// Deterministic generator, for tests and fixtures
    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("/styles/app.css");
        let id2 = get_document_id("/styles/app.css");
        assert_eq!(id1, id2);

        let id3 = get_document_id("/styles/theme.css");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("/app.css");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(gen.seed()));
        assert!(gen.seed().starts_with(&get_document_id("/app.css")));
    }

    #[test]
    fn test_fresh_generators_do_not_collide() {
        let mut first = IdGenerator::new("/app.css");
        let mut second = IdGenerator::new("/app.css");
        assert_ne!(first.new_id(), second.new_id());
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let mut gen = IdGenerator::from_seed("fixture");
        assert_eq!(gen.new_id(), "fixture-1");
        assert_eq!(gen.new_id(), "fixture-2");
    }
}
