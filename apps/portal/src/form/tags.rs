use serde::Serialize;

/// Ordered, case-sensitive set of skill tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagCollection {
    tags: Vec<String>,
}

impl TagCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the trimmed tag unless it is blank or already present.
    /// Returns whether the collection changed.
    pub fn add(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagCollection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = TagCollection::new();
        for tag in iter {
            tags.add(tag.as_ref());
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims() {
        let mut tags = TagCollection::new();
        assert!(tags.add("  Rust "));
        assert_eq!(tags.as_slice(), &["Rust".to_string()]);
    }

    #[test]
    fn test_blank_and_duplicate_are_noops() {
        let mut tags: TagCollection = ["Rust", "Go"].into_iter().collect();
        let before = tags.clone();

        assert!(!tags.add(""));
        assert!(!tags.add("   "));
        assert!(!tags.add("Rust"));
        assert!(!tags.add(" Go "));

        assert_eq!(tags, before);
    }

    #[test]
    fn test_case_sensitive() {
        let mut tags = TagCollection::new();
        assert!(tags.add("Python"));
        assert!(tags.add("python"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut tags: TagCollection = ["Rust"].into_iter().collect();
        assert_eq!(tags.remove(3), None);
        assert_eq!(tags.remove(0).as_deref(), Some("Rust"));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_from_iter_dedups() {
        let tags: TagCollection = vec!["a", "b", "a", " "].into_iter().collect();
        assert_eq!(tags.len(), 2);
    }
}
