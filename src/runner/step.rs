use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

use crate::driver::traits::Session;

/// One interaction performed against the session
#[async_trait]
pub trait Action: Send + Sync {
    async fn perform(&self, session: &dyn Session) -> Result<()>;
}

struct FnAction<F>(F);

#[async_trait]
impl<F> Action for FnAction<F>
where
    F: for<'a> Fn(&'a dyn Session) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    async fn perform(&self, session: &dyn Session) -> Result<()> {
        (self.0)(session).await
    }
}

/// A named, independently failable unit of interaction
#[derive(Clone)]
pub struct Step {
    name: String,
    required: bool,
    action: Arc<dyn Action>,
}

impl Step {
    pub fn new(name: impl Into<String>, action: impl Action + 'static) -> Self {
        Self {
            name: name.into(),
            required: false,
            action: Arc::new(action),
        }
    }

    /// Build a step from a closure returning a boxed future
    ///
    /// ```ignore
    /// Step::from_fn("Open home", |s| Box::pin(async move { s.navigate("/").await }));
    /// ```
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a dyn Session) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        Self::new(name, FnAction(f))
    }

    /// Failure of this step aborts the remaining run
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub async fn perform(&self, session: &dyn Session) -> Result<()> {
        self.action.perform(session).await
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
