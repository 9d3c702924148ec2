#[cfg(test)]
mod tests {
    use metaql::cluster::{
        BrokerLogDirs, ClusterClient, ClusterDescription, ClusterError, ClusterResult,
        ConfigResource, ConsumerGroupDescription, PartitionReassignment, ResourceConfig,
        SnapshotClient, TopicDescription,
    };
    use metaql::command::Command;
    use metaql::format::{JsonFormat, OutputFormat, RenderResult};
    use metaql::store::{MetadataStore, RowCursor, StoreError, TableError, TableResult, Value};
    use metaql::table::Table;
    use metaql::{
        CommandRegistry, Engine, EngineError, EngineResult, FormatRegistry, Registries,
        TableRegistry,
    };
    use rusqlite::Connection;
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/cluster.json");

    struct XyzTable {
        populated: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl Table for XyzTable {
        fn name(&self) -> &str {
            "xyz"
        }

        fn create_schema(&self, conn: &Connection) -> TableResult<()> {
            conn.execute_batch("CREATE TABLE xyz (id TEXT NOT NULL)")?;
            Ok(())
        }

        fn populate(&self, conn: &Connection, _client: &dyn ClusterClient) -> TableResult<()> {
            self.populated.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(TableError::Sqlite(rusqlite::Error::InvalidQuery));
            }
            conn.execute_batch("INSERT INTO xyz VALUES ('foo'), ('bar'), ('baz')")?;
            Ok(())
        }
    }

    /// Collects the first column of every row.
    struct RawFormat {
        outputs: Arc<Mutex<Vec<String>>>,
    }

    impl OutputFormat for RawFormat {
        fn render(&self, rows: &mut dyn RowCursor, _out: &mut dyn Write) -> RenderResult<()> {
            while let Some(row) = rows.next_row()? {
                self.outputs.lock().unwrap().push(row[0].to_string());
            }
            Ok(())
        }
    }

    struct XyzCommand;

    impl Command for XyzCommand {
        fn help(&self) -> &str {
            ""
        }

        fn execute(
            &self,
            args: &[String],
            _engine: &mut Engine,
            out: &mut dyn Write,
        ) -> EngineResult<()> {
            write!(out, "xyz{}", args.join(","))?;
            Ok(())
        }
    }

    struct Fixture {
        engine: Engine,
        populated: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
        outputs: Arc<Mutex<Vec<String>>>,
    }

    fn setup() -> Fixture {
        let populated = Arc::new(AtomicUsize::new(0));
        let fail = Arc::new(AtomicBool::new(false));
        let tables = TableRegistry::tables();
        tables
            .register_table(Arc::new(XyzTable {
                populated: Arc::clone(&populated),
                fail: Arc::clone(&fail),
            }))
            .unwrap();
        let store = MetadataStore::open_in_memory(&tables).unwrap();

        let outputs = Arc::new(Mutex::new(Vec::new()));
        let raw: Arc<dyn OutputFormat> = Arc::new(RawFormat {
            outputs: Arc::clone(&outputs),
        });
        let formats = FormatRegistry::formats();
        formats.register("raw", Arc::clone(&raw)).unwrap();

        let commands = CommandRegistry::commands();
        commands.register("xyz", Arc::new(XyzCommand)).unwrap();

        let engine = Engine::new(
            Box::new(SnapshotClient::default()),
            store,
            Arc::new(formats),
            Arc::new(commands),
            raw,
        );
        Fixture {
            engine,
            populated,
            fail,
            outputs,
        }
    }

    /// A sink that rejects every write.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_execute_sql_populates_once() {
        let mut fixture = setup();
        let mut out = Vec::new();

        fixture.engine.execute("SELECT id FROM xyz", &mut out).unwrap();
        assert_eq!(*fixture.outputs.lock().unwrap(), vec!["foo", "bar", "baz"]);
        fixture.outputs.lock().unwrap().clear();

        fixture.engine.execute("SELECT id FROM xyz", &mut out).unwrap();
        assert_eq!(*fixture.outputs.lock().unwrap(), vec!["foo", "bar", "baz"]);
        assert_eq!(fixture.populated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_execute_trims_query() {
        let mut fixture = setup();
        fixture
            .engine
            .execute("   SELECT id FROM xyz WHERE id = 'bar' ;  ", &mut Vec::new())
            .unwrap();
        assert_eq!(*fixture.outputs.lock().unwrap(), vec!["bar"]);
    }

    #[test]
    fn test_execute_command() {
        let mut fixture = setup();
        let mut out = Vec::new();
        fixture.engine.execute(":xyz", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "xyz");

        let mut out = Vec::new();
        fixture.engine.execute("  :xyz a  b ", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "xyza,b");
    }

    #[test]
    fn test_unknown_command() {
        let mut fixture = setup();
        let err = fixture.engine.execute(":nope 1", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownCommand(ref name) if name == "nope"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_init_all_tables() {
        let mut fixture = setup();
        fixture.engine.init_all_tables().unwrap();
        assert!(fixture.engine.store().is_initialized("xyz").unwrap());
        assert_eq!(fixture.populated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_uncataloged_reference_is_skipped() {
        let mut fixture = setup();
        fixture
            .engine
            .execute(
                "WITH t AS (SELECT 'cte' AS v) SELECT v FROM t",
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(*fixture.outputs.lock().unwrap(), vec!["cte"]);
        assert_eq!(fixture.populated.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_query_error_is_not_fatal() {
        let mut fixture = setup();
        let err = fixture
            .engine
            .execute("SELECT nope FROM xyz", &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::Query { .. })));
        assert!(!err.is_fatal());

        // The table itself was still materialized.
        assert!(fixture.engine.store().is_initialized("xyz").unwrap());
    }

    #[test]
    fn test_preparation_failure_then_retry() {
        let mut fixture = setup();
        fixture.fail.store(true, Ordering::SeqCst);

        let err = fixture
            .engine
            .execute("SELECT id FROM xyz", &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::TablePreparation { ref table, .. } if table == "xyz"));
        assert!(!err.is_fatal());
        assert!(!fixture.engine.store().is_initialized("xyz").unwrap());

        fixture.fail.store(false, Ordering::SeqCst);
        fixture
            .engine
            .execute("SELECT id FROM xyz", &mut Vec::new())
            .unwrap();
        assert_eq!(fixture.populated.load(Ordering::SeqCst), 2);
        assert_eq!(fixture.outputs.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_set_output_format() {
        let mut fixture = setup();
        assert_eq!(fixture.engine.output_format_name(), None);

        let err = fixture.engine.set_output_format_by_name("json").unwrap_err();
        assert!(matches!(err, EngineError::UnknownFormat(ref name) if name == "json"));

        fixture.engine.set_output_format_by_name("raw").unwrap();
        assert_eq!(fixture.engine.output_format_name(), Some("raw"));
    }

    #[test]
    fn test_output_failure_is_fatal() {
        let registries = Registries::with_defaults().unwrap();
        let client = SnapshotClient::from_file(FIXTURE).unwrap();
        let mut engine = Engine::from_registries(Box::new(client), &registries, "ssv").unwrap();

        let err = engine
            .execute("SELECT id FROM brokers", &mut BrokenPipe)
            .unwrap_err();
        assert!(err.is_fatal());

        let err = engine.execute(":help", &mut BrokenPipe).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_end_to_end_json() {
        let registries = Registries::with_defaults().unwrap();
        let client = SnapshotClient::from_file(FIXTURE).unwrap();
        let mut engine = Engine::from_registries(Box::new(client), &registries, "json").unwrap();
        assert_eq!(engine.output_format_name(), Some("json"));

        let mut out = Vec::new();
        engine
            .execute(
                "SELECT id AS ID, host AS HOST, is_controller AS IS_CONTROLLER FROM brokers ORDER BY id",
                &mut out,
            )
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[{\"ID\":1,\"HOST\":\"host1.com\",\"IS_CONTROLLER\":true},\
             {\"ID\":2,\"HOST\":\"host2.com\",\"IS_CONTROLLER\":false},\
             {\"ID\":3,\"HOST\":\"host3.com\",\"IS_CONTROLLER\":false}]\n"
        );
        engine.close().unwrap();
    }

    #[test]
    fn test_from_registries_unknown_format() {
        let registries = Registries::with_defaults().unwrap();
        let result = Engine::from_registries(Box::new(SnapshotClient::default()), &registries, "xml");
        assert!(matches!(result, Err(EngineError::UnknownFormat(_))));
    }

    type ShutdownLog = Arc<Mutex<Vec<&'static str>>>;

    /// Logs `store` once the store has released its tables.
    struct ShutdownTable {
        log: ShutdownLog,
    }

    impl Table for ShutdownTable {
        fn name(&self) -> &str {
            "shutdown"
        }

        fn create_schema(&self, conn: &Connection) -> TableResult<()> {
            conn.execute_batch("CREATE TABLE shutdown (id INTEGER)")?;
            Ok(())
        }

        fn populate(&self, _conn: &Connection, _client: &dyn ClusterClient) -> TableResult<()> {
            Ok(())
        }
    }

    impl Drop for ShutdownTable {
        fn drop(&mut self) {
            self.log.lock().unwrap().push("store");
        }
    }

    /// Snapshot-backed client that logs `client` on every close.
    struct RecordingClient {
        inner: SnapshotClient,
        log: ShutdownLog,
        fail_close: bool,
    }

    impl ClusterClient for RecordingClient {
        fn describe_cluster(&self) -> ClusterResult<ClusterDescription> {
            self.inner.describe_cluster()
        }

        fn list_topics(&self, include_internal: bool) -> ClusterResult<Vec<String>> {
            self.inner.list_topics(include_internal)
        }

        fn describe_topics(&self, topics: &[String]) -> ClusterResult<Vec<TopicDescription>> {
            self.inner.describe_topics(topics)
        }

        fn describe_log_dirs(&self, broker_ids: &[i32]) -> ClusterResult<Vec<BrokerLogDirs>> {
            self.inner.describe_log_dirs(broker_ids)
        }

        fn describe_configs(
            &self,
            resources: &[ConfigResource],
        ) -> ClusterResult<Vec<ResourceConfig>> {
            self.inner.describe_configs(resources)
        }

        fn list_consumer_groups(&self) -> ClusterResult<Vec<String>> {
            self.inner.list_consumer_groups()
        }

        fn describe_consumer_groups(
            &self,
            group_ids: &[String],
        ) -> ClusterResult<Vec<ConsumerGroupDescription>> {
            self.inner.describe_consumer_groups(group_ids)
        }

        fn list_partition_reassignments(&self) -> ClusterResult<Vec<PartitionReassignment>> {
            self.inner.list_partition_reassignments()
        }

        fn close(&mut self) -> ClusterResult<()> {
            self.log.lock().unwrap().push("client");
            if self.fail_close {
                return Err(ClusterError::remote("CLOSE_FAILED", "connection reset"));
            }
            Ok(())
        }
    }

    fn shutdown_engine(fail_close: bool) -> (Engine, ShutdownLog) {
        let log: ShutdownLog = Arc::new(Mutex::new(Vec::new()));
        let tables = TableRegistry::tables();
        tables
            .register_table(Arc::new(ShutdownTable {
                log: Arc::clone(&log),
            }))
            .unwrap();
        let store = MetadataStore::open_in_memory(&tables).unwrap();
        drop(tables);

        let client = RecordingClient {
            inner: SnapshotClient::default(),
            log: Arc::clone(&log),
            fail_close,
        };
        let engine = Engine::new(
            Box::new(client),
            store,
            Arc::new(FormatRegistry::with_defaults().unwrap()),
            Arc::new(CommandRegistry::commands()),
            Arc::new(JsonFormat),
        );
        (engine, log)
    }

    #[test]
    fn test_close_releases_store_then_client_once() {
        let (mut engine, log) = shutdown_engine(false);
        engine.execute("SELECT * FROM shutdown", &mut Vec::new()).unwrap();
        assert!(log.lock().unwrap().is_empty());

        engine.close().unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["store", "client"]);
    }

    #[test]
    fn test_close_reports_client_failure_after_closing_store() {
        let (engine, log) = shutdown_engine(true);

        let err = engine.close().unwrap_err();
        assert!(matches!(err, EngineError::Cluster(ClusterError::Remote { .. })));
        assert_eq!(*log.lock().unwrap(), vec!["store", "client"]);
    }

    #[test]
    fn test_statement_without_columns_prints_nothing_in_grid() {
        let registries = Registries::with_defaults().unwrap();
        let client = SnapshotClient::from_file(FIXTURE).unwrap();
        let mut engine = Engine::from_registries(Box::new(client), &registries, "table").unwrap();

        let mut out = Vec::new();
        engine
            .execute("CREATE TABLE scratch (x INTEGER)", &mut out)
            .unwrap();
        engine
            .execute("INSERT INTO scratch VALUES (7)", &mut out)
            .unwrap();
        assert!(out.is_empty());

        engine.set_output_format_by_name("ssv").unwrap();
        engine.execute("SELECT x FROM scratch", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "# x\n7\n");
    }

    #[test]
    fn test_value_passthrough() {
        let mut fixture = setup();
        fixture
            .engine
            .execute("SELECT NULL FROM xyz LIMIT 1", &mut Vec::new())
            .unwrap();
        assert_eq!(*fixture.outputs.lock().unwrap(), vec![Value::Null.to_string()]);
    }
}
