//! Header-injecting callbacks.

use futures::future::BoxFuture;
use reqwest::header::{self, HeaderName, HeaderValue};

use crate::chain::{Callback, Chain};
use crate::error_handling::Result;
use crate::message::Response;

/// Appends one header to every outbound request.
///
/// Existing values for the same name are kept.
#[derive(Debug, Clone)]
pub struct AddHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl AddHeader {
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }

    /// Builds the callback from static strings.
    ///
    /// # Panics
    ///
    /// Panics if `name` or `value` is not a valid header name or value, like
    /// [`HeaderName::from_static`].
    pub fn from_static(name: &'static str, value: &'static str) -> Self {
        Self::new(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        )
    }
}

impl Callback for AddHeader {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let mut request = chain.request().clone();
            request
                .headers_mut()
                .append(self.name.clone(), self.value.clone());
            chain.proceed(request).await
        })
    }
}

/// Realistic browser request headers.
///
/// Mimics a modern Chrome navigation so requests do not stand out to
/// header-based bot detection. Headers the request already carries are left
/// alone.
#[derive(Debug, Clone)]
pub struct BrowserHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl BrowserHeaders {
    pub fn new() -> Self {
        let headers = vec![
            (
                header::ACCEPT,
                HeaderValue::from_static(
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
                ),
            ),
            (
                header::ACCEPT_LANGUAGE,
                HeaderValue::from_static("en-US,en;q=0.9"),
            ),
            (
                header::ACCEPT_ENCODING,
                HeaderValue::from_static("gzip, deflate, br"),
            ),
            (
                HeaderName::from_static("sec-fetch-dest"),
                HeaderValue::from_static("document"),
            ),
            (
                HeaderName::from_static("sec-fetch-mode"),
                HeaderValue::from_static("navigate"),
            ),
            (
                HeaderName::from_static("sec-fetch-site"),
                HeaderValue::from_static("none"),
            ),
            (
                HeaderName::from_static("sec-fetch-user"),
                HeaderValue::from_static("?1"),
            ),
            (
                header::UPGRADE_INSECURE_REQUESTS,
                HeaderValue::from_static("1"),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static("max-age=0")),
        ];
        Self { headers }
    }

    /// The header set applied to requests, in order.
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }
}

impl Default for BrowserHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl Callback for BrowserHeaders {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let mut request = chain.request().clone();
            for (name, value) in &self.headers {
                if !request.headers().contains_key(name) {
                    request.headers_mut().insert(name.clone(), value.clone());
                }
            }
            chain.proceed(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::testing::ScriptedSender;
    use crate::message::Request;
    use crate::transport::{Sender, Transport};
    use reqwest::Method;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_header_appends() {
        let sender = Arc::new(ScriptedSender::default());
        let transport = Transport::with_sender(
            Arc::clone(&sender),
            [
                AddHeader::from_static("x-tag", "one"),
                AddHeader::from_static("x-tag", "two"),
            ],
        );

        transport
            .send(Request::parse(Method::GET, "http://example.com/").unwrap())
            .await
            .unwrap();

        let seen = sender.seen.lock().unwrap();
        let values: Vec<_> = seen[0].headers().get_all("x-tag").iter().collect();
        assert_eq!(values, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_browser_headers_keep_existing_values() {
        let sender = Arc::new(ScriptedSender::default());
        let transport = Transport::with_sender(Arc::clone(&sender), [BrowserHeaders::new()]);

        let request = Request::parse(Method::GET, "http://example.com/")
            .unwrap()
            .with_header(header::ACCEPT, HeaderValue::from_static("application/json"));
        transport.send(request).await.unwrap();

        let seen = sender.seen.lock().unwrap();
        let headers = seen[0].headers();
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(header::ACCEPT_LANGUAGE).unwrap(), "en-US,en;q=0.9");
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "navigate");
        assert_eq!(headers.len(), BrowserHeaders::new().headers().len());
    }
}
