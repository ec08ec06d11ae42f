use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::config::CfKitConfig;
use crate::errors::CfError;
use crate::metrics;
use crate::mutation::{BatchMutator, MutationExecutor, MutationResult};
use crate::serializers::SharedSerializer;
use crate::template::factory::{ColumnFactory, DefaultColumnFactory};
use crate::template::updater::{ColumnFamilyUpdater, RowUpdater};
use crate::template::writer::ColumnWriter;

/// Owns the column family context and the pending mutation batch.
///
/// Unless `batched` is set, every update is executed as soon as its columns
/// have been queued. Batched templates accumulate until
/// [`execute_batch`](Self::execute_batch).
pub struct ColumnFamilyTemplate<K, N, F = DefaultColumnFactory> {
    keyspace: String,
    column_family: String,
    top_serializer: SharedSerializer<N>,
    factory: F,
    mutator: BatchMutator<K>,
    batched: bool,
    metrics_enabled: bool,
    executor: Arc<dyn MutationExecutor>,
}

impl<K, N> ColumnFamilyTemplate<K, N, DefaultColumnFactory> {
    pub fn new(
        keyspace: impl Into<String>,
        column_family: impl Into<String>,
        key_serializer: SharedSerializer<K>,
        top_serializer: SharedSerializer<N>,
        executor: Arc<dyn MutationExecutor>,
    ) -> Self {
        Self {
            keyspace: keyspace.into(),
            column_family: column_family.into(),
            top_serializer,
            factory: DefaultColumnFactory::new(),
            mutator: BatchMutator::new(key_serializer),
            batched: false,
            metrics_enabled: true,
            executor,
        }
    }

    pub fn from_config(
        config: &CfKitConfig,
        key_serializer: SharedSerializer<K>,
        top_serializer: SharedSerializer<N>,
        executor: Arc<dyn MutationExecutor>,
    ) -> Self {
        let template = &config.template;
        Self {
            keyspace: template.keyspace.clone(),
            column_family: template.column_family.clone(),
            top_serializer,
            factory: DefaultColumnFactory::with_ttl(template.default_ttl_secs),
            mutator: BatchMutator::new(key_serializer)
                .with_max_batch_size(template.max_batch_size)
                .with_metrics(config.observability.metrics_enabled),
            batched: template.batched,
            metrics_enabled: config.observability.metrics_enabled,
            executor,
        }
    }
}

impl<K, N, F> ColumnFamilyTemplate<K, N, F>
where
    K: Clone,
    F: ColumnFactory,
{
    pub fn with_factory<G: ColumnFactory>(self, factory: G) -> ColumnFamilyTemplate<K, N, G> {
        ColumnFamilyTemplate {
            keyspace: self.keyspace,
            column_family: self.column_family,
            top_serializer: self.top_serializer,
            factory,
            mutator: self.mutator,
            batched: self.batched,
            metrics_enabled: self.metrics_enabled,
            executor: self.executor,
        }
    }

    pub fn with_batched(mut self, batched: bool) -> Self {
        self.batched = batched;
        self
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn column_family(&self) -> &str {
        &self.column_family
    }

    pub fn key_serializer(&self) -> &SharedSerializer<K> {
        self.mutator.key_serializer()
    }

    pub fn top_serializer(&self) -> &SharedSerializer<N> {
        &self.top_serializer
    }

    pub fn is_batched(&self) -> bool {
        self.batched
    }

    pub fn pending(&self) -> usize {
        self.mutator.pending()
    }

    pub fn mutator(&self) -> &BatchMutator<K> {
        &self.mutator
    }

    pub fn writer(&self) -> ColumnWriter<'_, N, F> {
        ColumnWriter::new(&self.column_family, &self.top_serializer, &self.factory)
    }

    /// An updater positioned on `key`, queuing into this template's batch
    pub fn create_updater(&mut self, key: K) -> ColumnFamilyUpdater<'_, K, N, BatchMutator<K>, F> {
        let writer = ColumnWriter::new(&self.column_family, &self.top_serializer, &self.factory);
        let mut updater = ColumnFamilyUpdater::new(writer, &mut self.mutator);
        updater.add_key(key);
        updater
    }

    /// Run `f` against a fresh updater for `key`.
    ///
    /// Mutations queued by a failing closure are dropped. Returns `None` when
    /// the template is batched and execution was deferred.
    pub async fn update_with<U>(
        &mut self,
        key: K,
        f: U,
    ) -> Result<Option<MutationResult>, CfError>
    where
        U: FnOnce(&mut ColumnFamilyUpdater<'_, K, N, BatchMutator<K>, F>) -> Result<(), CfError>,
    {
        let checkpoint = self.mutator.pending();
        let outcome = {
            let mut updater = self.create_updater(key);
            f(&mut updater)
        };
        if let Err(err) = outcome {
            self.mutator.truncate(checkpoint);
            return Err(err);
        }
        self.flush_unless_batched().await
    }

    pub async fn update<U>(&mut self, key: K, updater: &U) -> Result<Option<MutationResult>, CfError>
    where
        U: RowUpdater<K, N, F>,
    {
        self.update_with(key, |u| updater.update(u)).await
    }

    pub async fn delete_column(&mut self, key: K, name: N) -> Result<Option<MutationResult>, CfError> {
        let writer = ColumnWriter::new(&self.column_family, &self.top_serializer, &self.factory);
        writer.delete_column(&mut self.mutator, key, name)?;
        self.flush_unless_batched().await
    }

    pub async fn delete_row(&mut self, key: K) -> Result<Option<MutationResult>, CfError> {
        let writer = ColumnWriter::new(&self.column_family, &self.top_serializer, &self.factory);
        writer.delete_row(&mut self.mutator, key)?;
        self.flush_unless_batched().await
    }

    async fn flush_unless_batched(&mut self) -> Result<Option<MutationResult>, CfError> {
        if self.batched {
            if self.metrics_enabled {
                metrics::set_pending(&self.column_family, self.mutator.pending());
            }
            return Ok(None);
        }
        self.execute_batch().await.map(Some)
    }

    /// Submit everything pending. The mutator is left empty whether or not
    /// execution succeeds.
    pub async fn execute_batch(&mut self) -> Result<MutationResult, CfError> {
        let batch = self.mutator.take_batch();
        if batch.is_empty() {
            return Ok(MutationResult::default());
        }

        let executor = self.executor.name().to_string();
        let start = Instant::now();
        let result = self.executor.execute(batch).await;
        let elapsed = start.elapsed().as_secs_f64();

        if self.metrics_enabled {
            metrics::record_batch(&executor, result.is_ok(), elapsed);
            metrics::set_pending(&self.column_family, 0);
        }

        match result {
            Ok(result) => {
                info!(
                    "Executed {} mutations on {} rows of {}.{} via {} in {:.2}ms",
                    result.mutations,
                    result.rows,
                    self.keyspace,
                    self.column_family,
                    executor,
                    result.latency_ms()
                );
                Ok(result)
            }
            Err(err) => {
                error!(
                    "Batch execution on {}.{} failed: {}",
                    self.keyspace, self.column_family, err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::config::TemplateConfig;
    use crate::mutation::InMemoryExecutor;
    use crate::serializers::{IntegerSerializer, Serializer, StringSerializer};
    use crate::template::factory::FixedClockColumnFactory;
    use crate::types::{MutationBatch, MutationOp};

    fn template(
        executor: Arc<InMemoryExecutor>,
    ) -> ColumnFamilyTemplate<String, String, FixedClockColumnFactory> {
        ColumnFamilyTemplate::new(
            "app",
            "Users",
            StringSerializer::get(),
            StringSerializer::get(),
            executor,
        )
        .with_factory(FixedClockColumnFactory::new(1_000))
    }

    fn read_string(executor: &InMemoryExecutor, key: &str, name: &str) -> Option<String> {
        executor
            .column("Users", key.as_bytes(), name.as_bytes())
            .map(|cell| StringSerializer.from_bytes(&cell.value).unwrap())
    }

    #[tokio::test]
    async fn test_unbatched_update_executes_immediately() {
        let executor = Arc::new(InMemoryExecutor::new());
        let mut template = template(executor.clone());

        let result = template
            .update_with("alice".to_string(), |u| {
                u.set_string("email".to_string(), "alice@example.com")?;
                u.set_integer("age".to_string(), 30)
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.mutations, 2);
        assert_eq!(result.rows, 1);
        assert_eq!(template.pending(), 0);
        assert_eq!(
            read_string(&executor, "alice", "email").as_deref(),
            Some("alice@example.com")
        );
        let age = executor.column("Users", b"alice", b"age").unwrap();
        assert_eq!(IntegerSerializer.from_bytes(&age.value).unwrap(), 30);
        assert_eq!(age.clock, 1_000);
    }

    #[tokio::test]
    async fn test_batched_update_defers_until_execute() {
        let executor = Arc::new(InMemoryExecutor::new());
        let mut template = template(executor.clone()).with_batched(true);

        for name in ["a", "b", "c"] {
            let deferred = template
                .update_with(name.to_string(), |u| u.set_boolean("seen".to_string(), true))
                .await
                .unwrap();
            assert!(deferred.is_none());
        }

        assert_eq!(template.pending(), 3);
        assert_eq!(executor.row_count("Users"), 0);

        let result = template.execute_batch().await.unwrap();
        assert_eq!(result.mutations, 3);
        assert_eq!(result.rows, 3);
        assert_eq!(template.pending(), 0);
        assert_eq!(executor.row_count("Users"), 3);
        assert_eq!(executor.stats().batches, 1);
    }

    #[tokio::test]
    async fn test_create_updater_starts_on_key() {
        let executor = Arc::new(InMemoryExecutor::new());
        let mut template = template(executor.clone()).with_batched(true);
        {
            let mut updater = template.create_updater("first".to_string());
            assert_eq!(updater.current_key(), Some(&"first".to_string()));
            updater.set_long("n".to_string(), 1).unwrap();
            updater.add_key("second".to_string());
            updater.set_long("n".to_string(), 2).unwrap();
        }
        assert_eq!(template.pending(), 2);
        let keys: Vec<_> = template
            .mutator()
            .mutations()
            .iter()
            .map(|m| m.key.clone())
            .collect();
        assert_eq!(keys, vec![b"first".to_vec(), b"second".to_vec()]);
    }

    #[tokio::test]
    async fn test_failed_closure_discards_its_mutations() {
        let executor = Arc::new(InMemoryExecutor::new());
        let mut template = template(executor.clone()).with_batched(true);
        template
            .update_with("keep".to_string(), |u| u.set_long("n".to_string(), 1))
            .await
            .unwrap();

        let err = template
            .update_with("drop".to_string(), |u| {
                u.set_long("n".to_string(), 2)?;
                Err(CfError::Serialization("bad value".to_string()))
            })
            .await
            .unwrap_err();

        assert_eq!(err, CfError::Serialization("bad value".to_string()));
        assert_eq!(template.pending(), 1);
        assert_eq!(template.mutator().mutations()[0].key, b"keep".to_vec());
    }

    struct ProfileUpdate {
        display_name: String,
        score: i64,
    }

    impl RowUpdater<String, String, FixedClockColumnFactory> for ProfileUpdate {
        fn update(
            &self,
            updater: &mut ColumnFamilyUpdater<'_, String, String, BatchMutator<String>, FixedClockColumnFactory>,
        ) -> Result<(), CfError> {
            updater.set_string("display_name".to_string(), self.display_name.clone())?;
            updater.set_long("score".to_string(), self.score)
        }
    }

    struct Untouched;

    impl RowUpdater<String, String, FixedClockColumnFactory> for Untouched {}

    #[tokio::test]
    async fn test_row_updater_hook() {
        let executor = Arc::new(InMemoryExecutor::new());
        let mut template = template(executor.clone());
        let profile = ProfileUpdate {
            display_name: "Bob".to_string(),
            score: 12,
        };

        let result = template.update("bob".to_string(), &profile).await.unwrap();
        assert_eq!(result.map(|r| r.mutations), Some(2));
        assert_eq!(read_string(&executor, "bob", "display_name").as_deref(), Some("Bob"));

        // the default hook queues nothing, so the flush is a no-op
        let noop = template.update("bob".to_string(), &Untouched).await.unwrap();
        assert_eq!(noop.map(|r| r.mutations), Some(0));
        assert_eq!(executor.stats().batches, 1);
    }

    #[tokio::test]
    async fn test_delete_column_and_row() {
        let executor = Arc::new(InMemoryExecutor::new());
        let mut template = ColumnFamilyTemplate::new(
            "app",
            "Users",
            StringSerializer::get(),
            StringSerializer::get(),
            executor.clone(),
        )
        .with_factory(FixedClockColumnFactory::new(10));
        template
            .update_with("carol".to_string(), |u| {
                u.set_string("a".to_string(), "1")?;
                u.set_string("b".to_string(), "2")
            })
            .await
            .unwrap();

        let mut later = template.with_factory(FixedClockColumnFactory::new(20));
        later
            .delete_column("carol".to_string(), "a".to_string())
            .await
            .unwrap();
        assert_eq!(read_string(&executor, "carol", "a"), None);
        assert_eq!(read_string(&executor, "carol", "b").as_deref(), Some("2"));

        later.delete_row("carol".to_string()).await.unwrap();
        assert!(executor.row("Users", b"carol").is_empty());
    }

    #[tokio::test]
    async fn test_from_config() {
        let mut config = CfKitConfig::default();
        config.template = TemplateConfig {
            keyspace: "ks".to_string(),
            column_family: "Events".to_string(),
            batched: true,
            default_ttl_secs: Some(60),
            max_batch_size: Some(1),
        };
        config.observability.metrics_enabled = false;

        let executor = Arc::new(InMemoryExecutor::new());
        let mut template: ColumnFamilyTemplate<i32, String> = ColumnFamilyTemplate::from_config(
            &config,
            IntegerSerializer::get(),
            StringSerializer::get(),
            executor,
        );
        assert_eq!(template.keyspace(), "ks");
        assert_eq!(template.column_family(), "Events");
        assert!(template.is_batched());
        assert!(!template.mutator().metrics_enabled());

        template
            .update_with(1, |u| u.set_string("kind".to_string(), "click"))
            .await
            .unwrap();
        match &template.mutator().mutations()[0].op {
            MutationOp::Insert(column) => assert_eq!(column.ttl, Some(60)),
            other => panic!("unexpected op {:?}", other),
        }

        let err = template
            .update_with(2, |u| u.set_string("kind".to_string(), "view"))
            .await
            .unwrap_err();
        assert_eq!(err, CfError::BatchFull { limit: 1 });
        assert_eq!(template.pending(), 1);
    }

    #[tokio::test]
    async fn test_disabled_metrics_skip_mutation_counter() {
        let mut config = CfKitConfig::default();
        config.template.column_family = "UncountedUsers".to_string();
        config.observability.metrics_enabled = false;

        let executor = Arc::new(InMemoryExecutor::new());
        let mut template: ColumnFamilyTemplate<String, String> = ColumnFamilyTemplate::from_config(
            &config,
            StringSerializer::get(),
            StringSerializer::get(),
            executor.clone(),
        );
        template
            .update_with("dave".to_string(), |u| u.set_long("n".to_string(), 1))
            .await
            .unwrap();
        template.delete_row("dave".to_string()).await.unwrap();

        assert_eq!(executor.stats().row_deletions, 1);
        for op in ["insert", "delete_row"] {
            let counted = metrics::MUTATION_COUNTER
                .with_label_values(&["UncountedUsers", op])
                .get();
            assert_eq!(counted, 0);
        }
    }

    struct FailingExecutor {
        seen: Mutex<usize>,
    }

    #[async_trait]
    impl MutationExecutor for FailingExecutor {
        async fn execute(&self, batch: MutationBatch) -> Result<MutationResult, CfError> {
            *self.seen.lock() += batch.len();
            Err(CfError::Execution("cluster unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_execution_failure_propagates_and_clears_batch() {
        let executor = Arc::new(FailingExecutor { seen: Mutex::new(0) });
        let mut template: ColumnFamilyTemplate<String, String> = ColumnFamilyTemplate::new(
            "app",
            "Users",
            StringSerializer::get(),
            StringSerializer::get(),
            executor.clone(),
        );

        let err = template
            .update_with("x".to_string(), |u| u.set_boolean("ok".to_string(), false))
            .await
            .unwrap_err();

        assert_eq!(err, CfError::Execution("cluster unavailable".to_string()));
        assert_eq!(*executor.seen.lock(), 1);
        assert_eq!(template.pending(), 0);
        assert_eq!(template.execute_batch().await.unwrap().mutations, 0);
    }
}
