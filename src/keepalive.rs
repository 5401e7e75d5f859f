//! Self-ping task to defeat idle shutdown on the hosting platform.
//!
//! Some free hosts stop processes that receive no traffic. When a keepalive
//! URL is configured, a background task GETs it on a fixed interval for the
//! lifetime of the process. Failures are logged and ignored.

use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, warn};

/// Spawns the repeating self-ping task.
///
/// The first ping happens one full `period` after spawning.
pub fn spawn(http: reqwest::Client, url: String, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            match http.get(&url).send().await {
                Ok(response) => debug!("Keepalive ping: {}", response.status()),
                Err(e) => warn!("Keepalive ping to {} failed: {}", url, e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keepalive_pings_the_target() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .expect_at_least(2)
            .create_async()
            .await;

        let handle = spawn(
            reqwest::Client::new(),
            server.url(),
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        mock.assert_async().await;
    }
}
