//! Resiliency Test Suite: Cancellation and Deadlines
//!
//! **Purpose:** Verify that a request's context bounds the network exchange.
//!
//! **What We're Testing:**
//! 1. A request whose deadline passes while the server stalls fails with
//!    `DeadlineExceeded` instead of waiting for the server
//! 2. Cancelling the context abandons an in-flight exchange
//! 3. A request whose context is already cancelled is never sent
//! 4. Callbacks can derive the context before proceeding

use std::sync::Arc;
use std::time::{Duration, Instant};

use httptest::{matchers::*, responders::*, Expectation, Server};
use reqchain::callbacks::Retry;
use reqchain::{callback_fn, transport, Callback, Chain, Context, Error, Request, Sender, Transport};
use reqwest::Method;

fn slow_server(delay: Duration) -> Server {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/slow"))
            .times(0..)
            .respond_with(delay_and_then(delay, status_code(200))),
    );
    server
}

fn slow_request(server: &Server, context: Context) -> Request {
    Request::parse(Method::GET, &server.url_str("/slow"))
        .expect("mock server URL should parse")
        .with_context(context)
}

#[tokio::test]
async fn test_deadline_abandons_stalled_exchange() {
    let server = slow_server(Duration::from_secs(5));
    let transport = Transport::new(Vec::<Arc<dyn Callback>>::new()).expect("Failed to build transport");

    let start = Instant::now();
    let result = transport
        .send(slow_request(
            &server,
            Context::new().with_timeout(Duration::from_millis(100)),
        ))
        .await;

    assert!(matches!(result, Err(Error::DeadlineExceeded)));
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_cancellation_abandons_in_flight_exchange() {
    let server = slow_server(Duration::from_secs(5));
    let transport = Transport::new(Vec::<Arc<dyn Callback>>::new()).expect("Failed to build transport");

    let context = Context::new();
    let request = slow_request(&server, context.clone());
    let pending = tokio::spawn(async move { transport.send(request).await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    context.cancel();

    let result = tokio::time::timeout(Duration::from_secs(4), pending)
        .await
        .expect("Cancelled exchange should finish promptly")
        .expect("Task should not panic");
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_already_cancelled_request_is_not_sent() {
    // No expectations: any request reaching the server fails the test.
    let server = Server::run();
    let transport = Transport::new(Vec::<Arc<dyn Callback>>::new()).expect("Failed to build transport");

    let context = Context::new();
    context.cancel();
    let request = Request::parse(Method::GET, &server.url_str("/"))
        .expect("mock server URL should parse")
        .with_context(context);

    let result = transport.send(request).await;
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_callback_can_tighten_deadline() {
    let server = slow_server(Duration::from_secs(5));
    let tighten = callback_fn(|chain: Chain| async move {
        let mut request = chain.request().clone();
        *request.context_mut() = request
            .context()
            .child()
            .with_timeout(Duration::from_millis(50));
        chain.proceed(request).await
    });
    let callbacks: Vec<Arc<dyn Callback>> = vec![Arc::new(tighten)];
    let transport = transport(callbacks).expect("Failed to build transport");

    let result = transport.send(slow_request(&server, Context::new())).await;
    assert!(matches!(result, Err(Error::DeadlineExceeded)));
}

#[tokio::test]
async fn test_retry_gives_up_when_cancelled() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/down"))
            .times(1)
            .respond_with(status_code(503)),
    );
    let transport = Transport::new([Retry::with_delays([Duration::from_secs(3600)])])
        .expect("Failed to build transport");

    let context = Context::new();
    let request = Request::parse(Method::GET, &server.url_str("/down"))
        .expect("mock server URL should parse")
        .with_context(context.clone());
    let pending = tokio::spawn(async move { transport.send(request).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    context.cancel();

    let result = pending.await.expect("Task should not panic");
    assert!(matches!(result, Err(Error::Cancelled)));
}
