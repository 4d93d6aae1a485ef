//! The chain contract and its traversal.
//!
//! A [`Chain`] is the handle a callback receives. It exposes the request for
//! the current step and [`Chain::proceed`], which hands a (possibly replaced)
//! request to the next callback, or to the sender once every callback has run.
//!
//! Each step is a fresh, immutable `Chain` value. Nothing is shared between
//! steps except the read-only callback list and the sender, so a single
//! [`Transport`](crate::Transport) can drive any number of requests at once.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::context::Context;
use crate::error_handling::Result;
use crate::message::{Request, Response};
use crate::transport::Sender;


/// Observes, modifies and possibly short-circuits a request on its way out and
/// the response on its way back.
///
/// A callback usually reads [`Chain::request`], adjusts a copy of it, awaits
/// [`Chain::proceed`] and then inspects or rewrites the response. It may also
/// return a response or an error without calling `proceed`; no later callback
/// and no network send happens in that case. Calling `proceed` more than once
/// is allowed, e.g. to retry.
///
/// ## Example
///
/// ```rust
/// use futures::future::BoxFuture;
/// use reqchain::{Callback, Chain, Response, Result};
/// use reqwest::header::HeaderValue;
///
/// struct ApiKey(HeaderValue);
///
/// impl Callback for ApiKey {
///     fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
///         Box::pin(async move {
///             let mut request = chain.request().clone();
///             request.headers_mut().insert("x-api-key", self.0.clone());
///             chain.proceed(request).await
///         })
///     }
/// }
/// ```
pub trait Callback: Send + Sync + 'static {
    /// Handles one step of the chain.
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>>;
}

impl<C: Callback + ?Sized> Callback for Arc<C> {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        (**self).call(chain)
    }
}

/// Wraps a plain function or closure so it can be used as a [`Callback`].
#[derive(Clone)]
pub struct CallbackFn<F> {
    f: F,
}

impl<F, Fut> Callback for CallbackFn<F>
where
    F: Fn(Chain) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        (self.f)(chain).boxed()
    }
}

/// Turns a function taking a [`Chain`] into a [`Callback`].
///
/// ```rust
/// use reqchain::{callback_fn, Chain};
///
/// let passthrough = callback_fn(|chain: Chain| async move {
///     let request = chain.request().clone();
///     chain.proceed(request).await
/// });
/// # let _ = passthrough;
/// ```
pub fn callback_fn<F, Fut>(f: F) -> CallbackFn<F>
where
    F: Fn(Chain) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    CallbackFn { f }
}

/// One step of a request's traversal through the callback list.
///
/// `position` is the index of the callback the next [`proceed`](Self::proceed)
/// will invoke; once it reaches the end of the list, `proceed` sends the
/// request instead.
#[derive(Clone)]
pub struct Chain {
    position: usize,
    request: Request,
    callbacks: Arc<[Arc<dyn Callback>]>,
    sender: Arc<dyn Sender>,
}

impl Chain {
    pub(crate) fn new(
        request: Request,
        callbacks: Arc<[Arc<dyn Callback>]>,
        sender: Arc<dyn Sender>,
    ) -> Self {
        Self {
            position: 0,
            request,
            callbacks,
            sender,
        }
    }

    /// The request for this step.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The context carried by [`request`](Self::request).
    pub fn context(&self) -> &Context {
        self.request.context()
    }

    /// Index of the callback the next `proceed` will invoke.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of callbacks still to run before the request is sent.
    pub fn remaining(&self) -> usize {
        self.callbacks.len().saturating_sub(self.position)
    }

    /// Moves the chain on with `request`.
    ///
    /// Invokes the next callback with a new step holding `request`, or, when
    /// no callbacks remain, sends `request`. Whatever comes back is returned
    /// untouched.
    pub fn proceed(&self, request: Request) -> BoxFuture<'static, Result<Response>> {
        match self.callbacks.get(self.position) {
            Some(callback) => {
                let callback = Arc::clone(callback);
                let next = Chain {
                    position: self.position + 1,
                    request,
                    callbacks: Arc::clone(&self.callbacks),
                    sender: Arc::clone(&self.sender),
                };
                async move { callback.call(next).await }.boxed()
            }
            None => {
                let sender = Arc::clone(&self.sender);
                async move { sender.send(request).await }.boxed()
            }
        }
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("position", &self.position)
            .field("callbacks", &self.callbacks.len())
            .field("request", &self.request)
            .finish()
    }
}
