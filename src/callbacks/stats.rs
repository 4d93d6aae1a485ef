//! Outcome counting callback.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::chain::{Callback, Chain};
use crate::error_handling::{categorize, OutcomeStats, Result};
use crate::message::Response;

/// Counts the outcome of every exchange passing through it.
///
/// Clones share the same counters, so one clone can sit in a transport while
/// another is read by the caller.
#[derive(Clone, Default)]
pub struct ExchangeStats {
    stats: Arc<OutcomeStats>,
}

impl ExchangeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared counters.
    pub fn stats(&self) -> &OutcomeStats {
        &self.stats
    }
}

impl Callback for ExchangeStats {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let result = chain.proceed(chain.request().clone()).await;
            self.stats.increment(categorize(&result));
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::testing::ScriptedSender;
    use crate::error_handling::{Error, Outcome};
    use crate::message::Request;
    use crate::transport::{Sender, Transport};
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn test_counts_outcomes_through_shared_clone() {
        let sender = ScriptedSender::new(vec![
            Ok(Response::new(StatusCode::OK)),
            Ok(Response::new(StatusCode::INTERNAL_SERVER_ERROR)),
            Err(Error::Cancelled),
        ]);
        let stats = ExchangeStats::new();
        let transport = Transport::with_sender(sender, [stats.clone()]);
        let request = Request::parse(Method::GET, "http://example.com/").unwrap();

        for _ in 0..3 {
            let _ = transport.send(request.clone()).await;
        }

        assert_eq!(stats.stats().get_count(Outcome::Success), 1);
        assert_eq!(stats.stats().get_count(Outcome::ServerError), 1);
        assert_eq!(stats.stats().get_count(Outcome::Cancelled), 1);
        assert_eq!(stats.stats().total(), 3);
        assert_eq!(stats.stats().total_failures(), 2);
    }
}
