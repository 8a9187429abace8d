//! Task selection chain: weighted choice among pluggable prompt providers
//! with anti-repeat restrictions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::tasks as tasks_repo;

const STORED_PROVIDER_WEIGHT: u32 = 5;
const CORPUS_PROVIDER_WEIGHT: u32 = 2;

/// Anti-repeat restrictions accumulated across one round-creation pass.
/// Each provider folds its own additions back in; the accumulator is passed
/// to the next selection.
#[derive(Debug, Clone, Default)]
pub struct Restriction {
    pub task_ids: HashSet<i64>,
    pub phrases: HashSet<String>,
}

impl Restriction {
    pub fn merge(&mut self, other: Restriction) {
        self.task_ids.extend(other.task_ids);
        self.phrases.extend(other.phrases);
    }
}

/// A painting prompt picked for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Set when the prompt came from the stored corpus.
    pub task_id: Option<i64>,
    pub text: String,
}

/// External text corpus collaborator. Implementations fetch phrases from
/// outside the room database (wordlists, web corpora).
#[async_trait]
pub trait CorpusSource: Send + Sync {
    fn name(&self) -> &str;
    /// Whether the source can produce phrases for the language at all.
    async fn has_content(&self, language: &str) -> bool;
    async fn fetch(
        &self,
        language: &str,
        excluded: &HashSet<String>,
    ) -> Result<String, DomainError>;
}

/// Closed provider set behind one capability:
/// `get_task(restriction) -> (task, restriction)`.
#[derive(Clone)]
pub enum TaskProvider {
    /// Prompts stored in the tasks table.
    Stored,
    /// Prompts pulled from an external corpus collaborator.
    Corpus(Arc<dyn CorpusSource>),
}

impl TaskProvider {
    pub async fn get_task<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        language: &str,
        restriction: &Restriction,
    ) -> Result<(TaskItem, Restriction), DomainError> {
        match self {
            TaskProvider::Stored => {
                let excluded: Vec<i64> = restriction.task_ids.iter().copied().collect();
                let task = tasks_repo::random_task(conn, language, &excluded)
                    .await?
                    .ok_or_else(|| {
                        DomainError::infra(
                            InfraErrorKind::Other("tasks".into()),
                            format!("stored corpus ran out of prompts for language {language}"),
                        )
                    })?;
                let mut addition = Restriction::default();
                addition.task_ids.insert(task.id);
                Ok((
                    TaskItem {
                        task_id: Some(task.id),
                        text: task.prepared_text(),
                    },
                    addition,
                ))
            }
            TaskProvider::Corpus(source) => {
                let phrase = source.fetch(language, &restriction.phrases).await?;
                let text = phrase.trim().to_lowercase();
                let mut addition = Restriction::default();
                addition.phrases.insert(text.clone());
                Ok((
                    TaskItem {
                        task_id: None,
                        text,
                    },
                    addition,
                ))
            }
        }
    }
}

/// Per-language provider registry, constructed once at process start and
/// passed by reference into round creation.
pub struct TaskRegistry {
    providers: HashMap<String, Vec<(TaskProvider, u32)>>,
}

impl TaskRegistry {
    /// Providers without eligible content for a language are excluded here,
    /// not at selection time.
    pub async fn build(
        db: &DatabaseConnection,
        languages: &[&str],
        corpus_sources: Vec<Arc<dyn CorpusSource>>,
    ) -> Result<Self, DomainError> {
        let mut providers: HashMap<String, Vec<(TaskProvider, u32)>> = HashMap::new();
        for language in languages {
            let mut list = Vec::new();
            if tasks_repo::count_tasks(db, language).await? > 0 {
                list.push((TaskProvider::Stored, STORED_PROVIDER_WEIGHT));
            }
            for source in &corpus_sources {
                if source.has_content(language).await {
                    list.push((TaskProvider::Corpus(source.clone()), CORPUS_PROVIDER_WEIGHT));
                }
            }
            if list.is_empty() {
                info!(language, "no task providers available, language disabled");
            } else {
                providers.insert((*language).to_string(), list);
            }
        }
        Ok(Self { providers })
    }

    pub fn supports(&self, language: &str) -> bool {
        self.providers.contains_key(language)
    }

    /// Weighted pick among the language's providers, then one prompt
    /// honoring the restriction accumulator; the provider's own restriction
    /// is folded back into the accumulator.
    pub async fn select_task<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        language: &str,
        restriction: &mut Restriction,
    ) -> Result<TaskItem, DomainError> {
        let providers = self.providers.get(language).ok_or_else(|| {
            DomainError::state(format!("no task providers for language {language}"))
        })?;
        let provider = weighted_pick(providers, &mut rand::rng());
        let (task, addition) = provider.get_task(conn, language, restriction).await?;
        restriction.merge(addition);
        Ok(task)
    }
}

fn weighted_pick<'a, R: Rng>(
    providers: &'a [(TaskProvider, u32)],
    rng: &mut R,
) -> &'a TaskProvider {
    let total: u32 = providers.iter().map(|(_, weight)| *weight).sum();
    let mut roll = rng.random_range(0..total);
    for (provider, weight) in providers {
        if roll < *weight {
            return provider;
        }
        roll -= weight;
    }
    &providers[providers.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WordlistSource {
        words: Vec<&'static str>,
    }

    #[async_trait]
    impl CorpusSource for WordlistSource {
        fn name(&self) -> &str {
            "wordlist"
        }

        async fn has_content(&self, language: &str) -> bool {
            language == "en"
        }

        async fn fetch(
            &self,
            _language: &str,
            excluded: &HashSet<String>,
        ) -> Result<String, DomainError> {
            self.words
                .iter()
                .find(|w| !excluded.contains(**w))
                .map(|w| (*w).to_string())
                .ok_or_else(|| {
                    DomainError::infra(InfraErrorKind::Other("corpus".into()), "wordlist exhausted")
                })
        }
    }

    #[tokio::test]
    async fn corpus_provider_folds_restrictions() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let provider = TaskProvider::Corpus(Arc::new(WordlistSource {
            words: vec!["Sunflower", "harbour"],
        }));

        let mut restriction = Restriction::default();
        let (first, addition) = provider.get_task(&db, "en", &restriction).await.unwrap();
        assert_eq!(first.text, "sunflower");
        assert!(first.task_id.is_none());
        restriction.merge(addition);

        let (second, _) = provider.get_task(&db, "en", &restriction).await.unwrap();
        assert_eq!(second.text, "harbour");
    }

    #[test]
    fn weighted_pick_covers_the_whole_range() {
        let providers = vec![(TaskProvider::Stored, 5u32), (TaskProvider::Stored, 2u32)];
        let mut rng = rand::rng();
        for _ in 0..100 {
            // Must never panic regardless of the roll.
            let _ = weighted_pick(&providers, &mut rng);
        }
    }

    #[tokio::test]
    async fn registry_excludes_empty_providers_at_construction() {
        use migration::MigratorTrait as _;

        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let sources: Vec<Arc<dyn CorpusSource>> = vec![Arc::new(WordlistSource {
            words: vec!["fox"],
        })];
        let registry = TaskRegistry::build(&db, &["en", "ru"], sources).await.unwrap();

        // No stored tasks anywhere and the wordlist only speaks English.
        assert!(registry.supports("en"));
        assert!(!registry.supports("ru"));
    }
}
