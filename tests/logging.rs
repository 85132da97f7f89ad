use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use zonedb::drivers::InMemoryTestDriver;
use zonedb::traits::DatabaseDriver;
use zonedb::{BackendConfig, ZoneDbBackend};

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines_with(&self, needle: &str) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

async fn backend_with(driver: &Arc<InMemoryTestDriver>, config: BackendConfig) -> ZoneDbBackend {
    ZoneDbBackend::with_driver(Arc::clone(driver) as Arc<dyn DatabaseDriver>, config)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_failed_statement_logs_one_error() {
    let (logs, _guard) = capture();
    let in_memory_test_driver =
        Arc::new(InMemoryTestDriver::new().with_failure("SET \"notified_serial\""));
    let mut backend = backend_with(&in_memory_test_driver, BackendConfig::default()).await;

    assert!(backend.set_notified(1, 2).await.is_err());

    assert_eq!(logs.lines_with("ERROR"), 1);
    assert_eq!(logs.lines_with("Operation failed"), 1);
}

#[tokio::test]
async fn test_unreachable_role_logs_one_error() {
    let (logs, _guard) = capture();
    let in_memory_test_driver = Arc::new(InMemoryTestDriver::new());
    let config = BackendConfig {
        host_write: "w1 w2".to_string(),
        ..BackendConfig::default()
    };
    let mut backend = backend_with(&in_memory_test_driver, config).await;

    in_memory_test_driver.kill_connections();
    in_memory_test_driver.set_unreachable("w1");
    in_memory_test_driver.set_unreachable("w2");

    assert!(backend.set_fresh(3).await.is_err());

    assert_eq!(logs.lines_with("ERROR"), 1);
    assert_eq!(logs.lines_with("Unable to connect to database host"), 2);
}

#[tokio::test]
async fn test_deprecated_host_warns_once() {
    let (logs, _guard) = capture();
    let in_memory_test_driver = Arc::new(InMemoryTestDriver::new());
    let config = BackendConfig::from_toml_str(r#"host = "shared1,shared2""#).unwrap();

    let backend = backend_with(&in_memory_test_driver, config).await;

    assert_eq!(backend.connected_host(zonedb::Role::Read), Some("shared1"));
    assert_eq!(backend.connected_host(zonedb::Role::Write), Some("shared1"));
    assert_eq!(logs.lines_with("Deprecated 'host' setting"), 1);
}
