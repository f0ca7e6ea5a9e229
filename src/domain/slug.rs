// src/domain/slug.rs
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use std::{fmt, sync::Arc};

/// Entity variants that carry a slug. Uniqueness is scoped per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SluggableKind {
    Post,
    Category,
    Tag,
}

impl SluggableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SluggableKind::Post => "post",
            SluggableKind::Category => "category",
            SluggableKind::Tag => "tag",
        }
    }
}

impl fmt::Display for SluggableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(String);

impl Slug {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("slug cannot be empty".into()));
        }
        let allowed = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !allowed || value.starts_with('-') || value.ends_with('-') {
            return Err(DomainError::Validation(format!(
                "slug '{value}' must consist of lowercase letters, digits and inner hyphens"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// Turns a display name into the base slug. May return an empty string when
/// the input has no letters or digits.
pub trait SlugGenerator: Send + Sync {
    fn slugify(&self, input: &str) -> String;
}

#[async_trait]
pub trait SlugRegistry: Send + Sync {
    /// `exclude_id` removes the row being renamed from the check.
    async fn exists_by_slug(
        &self,
        kind: SluggableKind,
        slug: &Slug,
        exclude_id: Option<i64>,
    ) -> DomainResult<bool>;
}

/// Domain service producing slugs that are free at lookup time.
///
/// The lookup-then-write sequence is not atomic: the unique constraint on the
/// slug column rejects the losing writer of a race with a `Conflict`.
pub struct SlugAllocator {
    registry: Arc<dyn SlugRegistry>,
    generator: Arc<dyn SlugGenerator>,
}

impl SlugAllocator {
    pub fn new(registry: Arc<dyn SlugRegistry>, generator: Arc<dyn SlugGenerator>) -> Self {
        Self {
            registry,
            generator,
        }
    }

    pub async fn allocate(
        &self,
        kind: SluggableKind,
        display_name: &str,
        exclude_id: Option<i64>,
    ) -> DomainResult<Slug> {
        let base = self.generator.slugify(display_name);
        if base.is_empty() {
            return Err(DomainError::Validation(format!(
                "{kind} name must contain at least one letter or digit"
            )));
        }

        let mut candidate = Slug::new(base.clone())?;
        let mut counter = 1u64;

        while self
            .registry
            .exists_by_slug(kind, &candidate, exclude_id)
            .await?
        {
            tracing::debug!(kind = kind.as_str(), slug = %candidate, "slug taken, trying next suffix");
            candidate = Slug::new(format!("{base}-{counter}"))?;
            counter += 1;
        }

        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct LowercaseGenerator;

    impl SlugGenerator for LowercaseGenerator {
        fn slugify(&self, input: &str) -> String {
            input
                .split_whitespace()
                .map(|word| {
                    word.chars()
                        .filter(char::is_ascii_alphanumeric)
                        .collect::<String>()
                        .to_ascii_lowercase()
                })
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        }
    }

    #[derive(Default)]
    struct MapRegistry {
        taken: Mutex<HashMap<(SluggableKind, String), i64>>,
        lookups: Mutex<Vec<String>>,
    }

    impl MapRegistry {
        fn with(entries: &[(SluggableKind, &str, i64)]) -> Self {
            let registry = Self::default();
            {
                let mut taken = registry.taken.lock().unwrap();
                for (kind, slug, id) in entries {
                    taken.insert((*kind, (*slug).to_string()), *id);
                }
            }
            registry
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SlugRegistry for MapRegistry {
        async fn exists_by_slug(
            &self,
            kind: SluggableKind,
            slug: &Slug,
            exclude_id: Option<i64>,
        ) -> DomainResult<bool> {
            self.lookups.lock().unwrap().push(slug.to_string());
            let taken = self.taken.lock().unwrap();
            Ok(match taken.get(&(kind, slug.to_string())) {
                Some(owner) => exclude_id != Some(*owner),
                None => false,
            })
        }
    }

    struct FailingRegistry;

    #[async_trait]
    impl SlugRegistry for FailingRegistry {
        async fn exists_by_slug(
            &self,
            _kind: SluggableKind,
            _slug: &Slug,
            _exclude_id: Option<i64>,
        ) -> DomainResult<bool> {
            Err(DomainError::Persistence("connection refused".into()))
        }
    }

    fn allocator(registry: Arc<dyn SlugRegistry>) -> SlugAllocator {
        SlugAllocator::new(registry, Arc::new(LowercaseGenerator))
    }

    #[tokio::test]
    async fn free_base_is_returned_without_suffix() {
        let registry = Arc::new(MapRegistry::default());
        let slug = allocator(registry.clone())
            .allocate(SluggableKind::Post, "Hello World", None)
            .await
            .unwrap();
        assert_eq!(slug.as_str(), "hello-world");
        assert_eq!(registry.lookups(), vec!["hello-world".to_string()]);
    }

    #[tokio::test]
    async fn first_free_suffix_wins() {
        let registry = Arc::new(MapRegistry::with(&[
            (SluggableKind::Post, "hello-world", 1),
            (SluggableKind::Post, "hello-world-1", 2),
            (SluggableKind::Post, "hello-world-2", 3),
        ]));
        let slug = allocator(registry.clone())
            .allocate(SluggableKind::Post, "Hello World", None)
            .await
            .unwrap();
        assert_eq!(slug.as_str(), "hello-world-3");
        assert_eq!(
            registry.lookups(),
            vec!["hello-world", "hello-world-1", "hello-world-2", "hello-world-3"]
        );
    }

    #[tokio::test]
    async fn own_row_is_excluded_on_rename() {
        let registry = Arc::new(MapRegistry::with(&[(
            SluggableKind::Category,
            "career-tips",
            7,
        )]));
        let alloc = allocator(registry);

        let renamed = alloc
            .allocate(SluggableKind::Category, "Career Tips", Some(7))
            .await
            .unwrap();
        assert_eq!(renamed.as_str(), "career-tips");

        let other = alloc
            .allocate(SluggableKind::Category, "Career Tips", Some(8))
            .await
            .unwrap();
        assert_eq!(other.as_str(), "career-tips-1");
    }

    #[tokio::test]
    async fn uniqueness_is_scoped_per_kind() {
        let registry = Arc::new(MapRegistry::with(&[(SluggableKind::Tag, "rust", 1)]));
        let slug = allocator(registry)
            .allocate(SluggableKind::Category, "Rust", None)
            .await
            .unwrap();
        assert_eq!(slug.as_str(), "rust");
    }

    #[tokio::test]
    async fn empty_base_is_rejected_before_probing() {
        let registry = Arc::new(MapRegistry::default());
        let err = allocator(registry.clone())
            .allocate(SluggableKind::Tag, "!!! ???", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(registry.lookups().is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_is_not_treated_as_available() {
        let err = allocator(Arc::new(FailingRegistry))
            .allocate(SluggableKind::Post, "Anything", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[test]
    fn slug_rejects_invalid_shapes() {
        assert!(Slug::new("ok-slug-2").is_ok());
        assert!(Slug::new("").is_err());
        assert!(Slug::new("-leading").is_err());
        assert!(Slug::new("trailing-").is_err());
        assert!(Slug::new("Upper").is_err());
        assert!(Slug::new("with space").is_err());
    }
}
