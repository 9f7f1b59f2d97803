//! Shared helpers for the integration tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use hostbound::config::CrawlConfig;
use hostbound::crawler::{Coordinator, HttpFetcher, LinkParser};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write sink the test keeps a handle on after the coordinator takes
/// ownership of its clone.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds a coordinator wired to the real HTTP fetcher and HTML parser.
pub fn build_coordinator(config: &CrawlConfig) -> (Coordinator, SharedBuf) {
    let fetcher = HttpFetcher::new(config).expect("failed to build HTTP client");
    let buf = SharedBuf::default();
    let coordinator = Coordinator::new(
        config,
        Arc::new(fetcher),
        Arc::new(LinkParser::new()),
        Box::new(buf.clone()),
    )
    .expect("failed to build coordinator");
    (coordinator, buf)
}

/// Mounts an HTML page at the given path.
pub async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html"),
        )
        .mount(server)
        .await;
}
