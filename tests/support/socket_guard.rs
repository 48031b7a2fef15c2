//! Localhost mock origins for the YouTube and media.ccc.de integration tests.
//!
//! Each test stands up its own wiremock server and points a service at it
//! through `YoutubeService::with_base_url` or `MediaCccService::with_api_base`.
//! Sandboxes that forbid binding a localhost port cannot host that server, so
//! those tests skip with a note on stderr instead of failing. Setting
//! `PIPE_EXTRACTOR_REQUIRE_SOCKET_TESTS=1` turns the skip into a panic, for CI
//! runs that must exercise every mock origin.

use std::future::Future;
use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "PIPE_EXTRACTOR_REQUIRE_SOCKET_TESTS";

/// True when the environment demands that mock-origin tests run.
#[must_use]
pub fn mock_origin_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn localhost_bindable() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Starts a mock origin, or returns `None` when this host cannot bind one.
///
/// The skip note names the calling test's location.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    async move {
        if localhost_bindable() {
            return Some(MockServer::start().await);
        }

        let message = format!(
            "[mock-origin] cannot bind a localhost port for the test at {}:{}",
            caller.file(),
            caller.line()
        );
        assert!(
            !mock_origin_required(),
            "{message}; unset {REQUIRE_ENV} to allow skipping"
        );
        eprintln!("{message}; skipping. Set {REQUIRE_ENV}=1 to fail instead.");
        None
    }
}
