//! Deferred pipelines.
//!
//! A [`Transform`] is a lazily evaluated chain of composition steps that ends
//! in an [`Outcome`]. Nothing runs until the pipeline is resolved or awaited.
//! The underlying future is shared, so resolving the same pipeline any number
//! of times (or from several tasks at once) drives each callback at most once
//! and every caller observes the same outcome.

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tracing::trace;

use crate::compose::{apply_namespace, Recover};
use crate::err::ErrInfo;
use crate::error::Result;
use crate::outcome::Outcome;

type Stage<T> = Shared<BoxFuture<'static, Result<Outcome<T>>>>;

/// A pending outcome that can be further composed.
pub struct Transform<T> {
    stage: Stage<T>,
}

impl<T> Clone for Transform<T> {
    fn clone(&self) -> Self {
        Self {
            stage: self.stage.clone(),
        }
    }
}

impl<T> fmt::Debug for Transform<T>
where
    T: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("resolved", &self.stage.peek().is_some())
            .finish()
    }
}

impl<T> Transform<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Pipeline over a future producing an outcome.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        Self::from_stage(future.map(Ok))
    }

    /// Pipeline that is already resolved.
    pub fn ready(outcome: Outcome<T>) -> Self {
        Self::from_stage(future::ready(Ok(outcome)))
    }

    fn from_stage<F>(future: F) -> Self
    where
        F: Future<Output = Result<Outcome<T>>> + Send + 'static,
    {
        Self {
            stage: future.boxed().shared(),
        }
    }

    /// Drives the chain to completion.
    ///
    /// Repeated calls return the cached outcome without rerunning callbacks.
    /// A conversion failure anywhere in the chain is reported here.
    pub async fn resolve(&self) -> Result<Outcome<T>> {
        if let Some(done) = self.stage.peek() {
            trace!("transform already resolved");
            return done.clone();
        }
        self.stage.clone().await
    }

    pub fn is_resolved(&self) -> bool {
        self.stage.peek().is_some()
    }

    /// Appends a stage that runs once this pipeline has resolved.
    fn chain<U, F, Fut>(&self, step: F) -> Transform<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Outcome<U>>> + Send + 'static,
    {
        let parent = self.stage.clone();
        Transform::from_stage(async move {
            let outcome = parent.await?;
            trace!(status = outcome.status().as_str(), "transform stage input ready");
            step(outcome).await
        })
    }

    pub fn on_ok<U, F>(&self, f: F) -> Transform<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(&T, &Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        self.chain(move |outcome| future::ready(Ok(outcome.on_ok(f))))
    }

    pub fn on_ok_async<U, F, Fut>(&self, f: F) -> Transform<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<U>> + Send + 'static,
    {
        self.chain(move |outcome| drive_ok(outcome, f))
    }

    pub fn on_fail<F>(&self, f: F) -> Transform<T>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> Outcome<T> + Send + 'static,
    {
        self.chain(move |outcome| future::ready(Ok(outcome.on_fail(f))))
    }

    pub fn on_fail_async<F, Fut>(&self, f: F) -> Transform<T>
    where
        F: FnOnce(ErrInfo, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        self.chain(move |outcome| drive_fail(outcome, f))
    }

    pub fn on_err<R, F>(&self, f: F) -> Transform<T>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> R + Send + 'static,
        R: Into<Recover<T>> + 'static,
    {
        self.chain(move |outcome| future::ready(outcome.on_err(f)))
    }

    pub fn on_err_named<R, F>(&self, name: impl Into<String>, f: F) -> Transform<T>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> R + Send + 'static,
        R: Into<Recover<T>> + 'static,
    {
        let name = name.into();
        self.chain(move |outcome| future::ready(outcome.on_err_named(&name, f)))
    }

    pub fn on_err_async<R, F, Fut>(&self, f: F) -> Transform<T>
    where
        F: FnOnce(ErrInfo, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<Recover<T>> + 'static,
    {
        self.chain(move |outcome| drive_err(outcome, None, f))
    }

    pub fn on_err_named_async<R, F, Fut>(&self, name: impl Into<String>, f: F) -> Transform<T>
    where
        F: FnOnce(ErrInfo, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<Recover<T>> + 'static,
    {
        let name = name.into();
        self.chain(move |outcome| drive_err(outcome, Some(name), f))
    }
}

impl<T> IntoFuture for Transform<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<Outcome<T>>;
    type IntoFuture = Stage<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.stage
    }
}

async fn drive_ok<T, U, F, Fut>(outcome: Outcome<T>, f: F) -> Result<Outcome<U>>
where
    T: Clone,
    F: FnOnce(T, Outcome<T>) -> Fut,
    Fut: Future<Output = Outcome<U>>,
{
    let data = match &outcome {
        Outcome::Success(success) => success.data().clone(),
        Outcome::Failure(failure) => return Ok(Outcome::Failure(failure.clone())),
    };
    Ok(f(data, outcome).await)
}

async fn drive_fail<T, F, Fut>(outcome: Outcome<T>, f: F) -> Result<Outcome<T>>
where
    F: FnOnce(ErrInfo, Outcome<T>) -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    let error = match &outcome {
        Outcome::Failure(failure) => failure.error().clone(),
        Outcome::Success(_) => return Ok(outcome),
    };
    Ok(f(error, outcome).await)
}

async fn drive_err<T, R, F, Fut>(
    outcome: Outcome<T>,
    name: Option<String>,
    f: F,
) -> Result<Outcome<T>>
where
    F: FnOnce(ErrInfo, Outcome<T>) -> Fut,
    Fut: Future<Output = R>,
    R: Into<Recover<T>>,
{
    let previous = match &outcome {
        Outcome::Failure(failure) => failure.clone(),
        Outcome::Success(_) => return Ok(outcome),
    };
    let recovered = f(previous.error().clone(), outcome).await;
    let next = recovered.into().into_outcome(&previous)?;
    Ok(apply_namespace(next, name.as_deref()))
}

impl<T> Outcome<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Lifts a finished outcome into a pipeline.
    pub fn into_transform(self) -> Transform<T> {
        Transform::ready(self)
    }

    /// Deferred [`on_ok`](Self::on_ok). `f` is invoked when the returned
    /// pipeline is first resolved, never on a failure.
    pub fn on_ok_async<U, F, Fut>(&self, f: F) -> Transform<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<U>> + Send + 'static,
    {
        Transform::from_stage(drive_ok(self.clone(), f))
    }

    pub fn on_fail_async<F, Fut>(&self, f: F) -> Transform<T>
    where
        F: FnOnce(ErrInfo, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        Transform::from_stage(drive_fail(self.clone(), f))
    }

    /// Deferred [`on_err`](Self::on_err). A result that is not error-like
    /// surfaces as a conversion error on resolve.
    pub fn on_err_async<R, F, Fut>(&self, f: F) -> Transform<T>
    where
        F: FnOnce(ErrInfo, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<Recover<T>> + 'static,
    {
        Transform::from_stage(drive_err(self.clone(), None, f))
    }

    pub fn on_err_named_async<R, F, Fut>(&self, name: impl Into<String>, f: F) -> Transform<T>
    where
        F: FnOnce(ErrInfo, Outcome<T>) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<Recover<T>> + 'static,
    {
        Transform::from_stage(drive_err(self.clone(), Some(name.into()), f))
    }
}
