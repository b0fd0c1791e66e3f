//! Route handlers and their erased form.
//!
//! Every `async fn` handler has its own anonymous future type, yet the
//! router keeps them side by side in its per-method trees. Registration
//! therefore wraps each one in `FnHandler` and stores it as
//! `Arc<dyn ErasedHandler<S>>`:
//!
//! ```text
//! async fn get_customer(req: Request, state: AppState) -> … ← handler
//!        ↓ router.on(Method::Get, "/customers/{id}", get_customer)
//! get_customer.into_boxed_handler()                         ← blanket impl
//!        ↓
//! Arc::new(FnHandler(get_customer))                         ← stored as BoxedHandler<S>
//!        ↓
//! handler.call(req, state.clone())  at request time          ← one vtable dispatch
//!        ↓
//! Box::pin(async { get_customer(req, state).await.into_response() })
//! ```
//!
//! Each request pays one `Arc` clone for the handler and one clone of the
//! state `S`. State is expected to be a cheap handle (an `Arc` inside).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Future returned by an erased handler.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe call interface behind [`BoxedHandler`].
///
/// Public only because [`Handler::into_boxed_handler`] names it.
#[doc(hidden)]
pub trait ErasedHandler<S> {
    fn call(&self, req: Request, state: S) -> BoxFuture;
}

/// Shared, erased handler stored in the route trees.
#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S> + Send + Sync + 'static>;

/// Anything [`Router::on`](crate::Router::on) accepts.
///
/// You never implement this yourself. It is satisfied by any `async fn`
/// with the signature:
///
/// ```text
/// async fn name(req: Request, state: S) -> impl IntoResponse
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

mod private {
    pub trait Sealed<S> {}
}

impl<F, Fut, R, S> private::Sealed<S> for F
where
    F: Fn(Request, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Send + 'static,
{
}

impl<F, Fut, R, S> Handler<S> for F
where
    F: Fn(Request, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(FnHandler(self))
    }
}

/// Concrete handler `F` behind the erased interface.
struct FnHandler<F>(F);

impl<F, Fut, R, S> ErasedHandler<S> for FnHandler<F>
where
    F: Fn(Request, S) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, state: S) -> BoxFuture {
        let fut = (self.0)(req, state);
        Box::pin(async move { fut.await.into_response() })
    }
}
