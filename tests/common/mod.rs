#![allow(dead_code)]

use httpmock::MockServer;
use okx_client::core::kernel::{hmac_sha256_base64, Clock, FixedClock, RetryPolicy};
use okx_client::OkxBuilder;
use std::io;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_KEY: &str = "test-key";
pub const SECRET: &str = "test-secret";
pub const PASSPHRASE: &str = "test-pass";
pub const FIXED_MILLIS: i64 = 1_704_067_200_000;
pub const TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

/// Short timeout and retry delay so failure paths finish quickly
pub fn builder(server: &MockServer) -> OkxBuilder {
    OkxBuilder::new()
        .with_credentials(API_KEY.to_string(), SECRET.to_string(), PASSPHRASE.to_string())
        .with_base_url(server.base_url())
        .with_clock(Arc::new(FixedClock::from_millis(FIXED_MILLIS).unwrap()))
        .with_timeout(Duration::from_millis(300))
        .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(10)))
}

/// Expected `OK-ACCESS-SIGN` for a request signed at `TIMESTAMP`
pub fn expected_signature(method: &str, request_path: &str, body: &str) -> String {
    let prehash = format!("{}{}{}{}", TIMESTAMP, method, request_path, body);
    hmac_sha256_base64(SECRET, &prehash).unwrap()
}

/// Clock that moves forward one second on every reading and counts readings
#[derive(Default)]
pub struct SteppingClock {
    millis: AtomicI64,
    pub reads: AtomicU32,
}

impl SteppingClock {
    pub fn starting_at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
            reads: AtomicU32::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let millis = self.millis.fetch_add(1_000, Ordering::SeqCst);
        chrono::DateTime::from_timestamp_millis(millis).unwrap()
    }
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's log output into a buffer for the guard's lifetime
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
