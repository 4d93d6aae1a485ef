//! Senders and the transport adapter.
//!
//! A [`Sender`] performs the actual exchange of a request for a response.
//! [`ReqwestSender`] is the default one and goes to the network through a
//! `reqwest::Client`. [`Transport`] wraps any sender with an ordered list of
//! callbacks and is itself a `Sender`, so it can stand in wherever a sender is
//! expected.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;

use crate::chain::{Callback, Chain};
use crate::error_handling::{Error, Result};
use crate::message::{Request, Response};

/// Something that exchanges a request for a response.
pub trait Sender: Send + Sync + 'static {
    /// Sends `request` and waits for the response.
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response>>;
}

impl<S: Sender + ?Sized> Sender for Arc<S> {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        (**self).send(request)
    }
}

/// Sends requests over the network with a `reqwest::Client`.
///
/// Honours the request's [`Context`](crate::Context): a request whose context
/// is already cancelled or past its deadline is not sent, and one that is
/// cancelled or expires while in flight is abandoned.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    /// Creates a sender with the default client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new() -> Result<Self, crate::error_handling::InitializationError> {
        let client = crate::initialization::init_client(crate::config::DEFAULT_USER_AGENT)?;
        Ok(Self::from_client(client))
    }

    /// Uses an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn exchange(&self, request: Request) -> Result<Response> {
        let context = request.context().clone();
        if context.is_cancelled() {
            debug!("Not sending {} {}: context cancelled", request.method(), request.url());
            return Err(Error::Cancelled);
        }
        if context.is_expired() {
            debug!("Not sending {} {}: deadline passed", request.method(), request.url());
            return Err(Error::DeadlineExceeded);
        }

        let outbound = request.to_reqwest(&self.client)?;
        debug!("Sending {} {}", outbound.method(), outbound.url());

        let exchange = async {
            let response = self.client.execute(outbound).await?;
            Response::from_reqwest(response).await
        };

        let bounded = async {
            match context.deadline() {
                Some(deadline) => {
                    tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), exchange)
                        .await
                        .unwrap_or(Err(Error::DeadlineExceeded))
                }
                None => exchange.await,
            }
        };

        tokio::select! {
            result = bounded => {
                if matches!(result, Err(Error::DeadlineExceeded)) {
                    debug!("Abandoned {} {}: deadline passed", request.method(), request.url());
                }
                result
            }
            _ = context.cancelled() => {
                debug!("Abandoned {} {}: context cancelled", request.method(), request.url());
                Err(Error::Cancelled)
            }
        }
    }
}

impl Sender for ReqwestSender {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        self.exchange(request).boxed()
    }
}

/// Runs every request through an ordered list of callbacks before handing it
/// to a sender.
///
/// Callbacks run in the order given, first to last, on the way out, and see
/// the response last to first on the way back. The list is fixed at
/// construction; the transport never mutates it, so one transport can serve
/// many concurrent requests.
///
/// ## Example
///
/// ```rust,no_run
/// use reqchain::{callback_fn, Chain, Request, Sender, Transport};
/// use reqwest::header::HeaderValue;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Transport::new([callback_fn(|chain: Chain| async move {
///     let mut request = chain.request().clone();
///     request
///         .headers_mut()
///         .insert("x-request-source", HeaderValue::from_static("reqchain"));
///     chain.proceed(request).await
/// })])?;
///
/// let request = Request::parse(reqwest::Method::GET, "https://example.com/")?;
/// let response = transport.send(request).await?;
/// println!("{:?}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Transport {
    sender: Arc<dyn Sender>,
    callbacks: Arc<[Arc<dyn Callback>]>,
}

impl Transport {
    /// Wraps the default [`ReqwestSender`] with `callbacks`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP client cannot be built.
    pub fn new<I>(callbacks: I) -> Result<Self, crate::error_handling::InitializationError>
    where
        I: IntoIterator,
        I::Item: Callback,
    {
        Ok(Self::with_sender(ReqwestSender::new()?, callbacks))
    }

    /// Wraps `sender` with `callbacks`.
    pub fn with_sender<S, I>(sender: S, callbacks: I) -> Self
    where
        S: Sender,
        I: IntoIterator,
        I::Item: Callback,
    {
        Self::from_shared(
            Arc::new(sender),
            callbacks
                .into_iter()
                .map(|cb| Arc::new(cb) as Arc<dyn Callback>),
        )
    }

    /// Wraps an already shared sender with already shared, possibly
    /// heterogeneous callbacks.
    pub fn from_shared<I>(sender: Arc<dyn Sender>, callbacks: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Callback>>,
    {
        Self {
            sender,
            callbacks: callbacks.into_iter().collect(),
        }
    }

    /// Number of callbacks each request runs through.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether requests go straight to the sender.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl Sender for Transport {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        let chain = Chain::new(
            request.clone(),
            Arc::clone(&self.callbacks),
            Arc::clone(&self.sender),
        );
        chain.proceed(request)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

/// Wraps the default sender with `callbacks`.
///
/// Shorthand for [`Transport::new`] taking shared, possibly heterogeneous
/// callbacks.
///
/// # Errors
///
/// Returns an error if the default HTTP client cannot be built.
pub fn transport<I>(callbacks: I) -> Result<Transport, crate::error_handling::InitializationError>
where
    I: IntoIterator<Item = Arc<dyn Callback>>,
{
    Ok(with_transport(Arc::new(ReqwestSender::new()?), callbacks))
}

/// Wraps `sender` with shared, possibly heterogeneous callbacks.
pub fn with_transport<I>(sender: Arc<dyn Sender>, callbacks: I) -> Transport
where
    I: IntoIterator<Item = Arc<dyn Callback>>,
{
    Transport::from_shared(sender, callbacks)
}
