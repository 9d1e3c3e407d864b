//! Scoped browser lifetime for a single scrape
//!
//! `BrowserSession` owns the Chrome process, its CDP handler task and its
//! profile directory. `with_browser` is the only way the renderer obtains a
//! browser: it launches, runs the caller's work, and closes on the way out.
//! If the surrounding future is dropped (cancellation), `Drop` still aborts
//! the handler, kills Chrome and removes the profile.

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::RenderError;
use crate::browser_profile::{BrowserProfile, create_unique_profile};
use crate::browser_setup::{LaunchOptions, launch_browser};

/// Browser, handler task and profile directory for one scrape
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Drops after `browser`, so the directory is removed once Chrome is gone
    profile: Option<BrowserProfile>,
    closed: bool,
}

impl BrowserSession {
    /// Launch a fresh browser with its own profile
    pub async fn launch(options: &LaunchOptions) -> Result<Self, RenderError> {
        let profile = create_unique_profile().map_err(|e| RenderError::Launch(format!("{e:#}")))?;
        let (browser, handler) = launch_browser(options, profile.path())
            .await
            .map_err(|e| RenderError::Launch(format!("{e:#}")))?;

        Ok(Self {
            browser,
            handler,
            profile: Some(profile),
            closed: false,
        })
    }

    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }
}

/// An engine owned for the length of one unit of work
///
/// `close` is the graceful path. Implementors must also release everything
/// in `Drop`, which is all that runs when the owning future is cancelled.
#[async_trait]
pub trait ScopedEngine: Send {
    type Target: ?Sized + Sync;

    fn target(&self) -> &Self::Target;

    /// Release the engine; errors are logged, never returned
    async fn close(&mut self);
}

#[async_trait]
impl ScopedEngine for BrowserSession {
    type Target = Browser;

    fn target(&self) -> &Browser {
        &self.browser
    }

    /// Graceful shutdown: close Chrome, wait for the process, stop the handler
    ///
    /// The profile directory is removed only after Chrome has exited so its
    /// file handles are released.
    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.browser.close().await {
            debug!("Browser close command failed (process may already be gone): {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed waiting for browser process to exit: {}", e);
        }
        self.handler.abort();
        self.profile.take();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("BrowserSession dropped before close - aborting handler and killing browser");
        }
        self.handler.abort();
        // Browser::drop kills a Chrome process that was not closed explicitly.
        // The profile field drops afterwards and removes the directory.
    }
}

/// Run `work` against a freshly launched browser and always tear it down
///
/// Teardown happens on success, on error, and on panic or cancellation via
/// `Drop`.
///
/// # Example
/// ```no_run
/// # use kodegen_tools_markscrape::renderer::{with_browser, RenderError};
/// # use kodegen_tools_markscrape::browser_setup::LaunchOptions;
/// # async fn demo() -> Result<(), RenderError> {
/// let version = with_browser(&LaunchOptions::default(), |browser| {
///     Box::pin(async move {
///         browser
///             .version()
///             .await
///             .map(|v| v.product)
///             .map_err(|e| RenderError::Extraction(e.to_string()))
///     })
/// })
/// .await?;
/// println!("{version}");
/// # Ok(())
/// # }
/// ```
pub async fn with_browser<T, F>(options: &LaunchOptions, work: F) -> Result<T, RenderError>
where
    F: for<'b> FnOnce(&'b Browser) -> BoxFuture<'b, Result<T, RenderError>>,
{
    with_engine(BrowserSession::launch(options), work).await
}

/// Acquire an engine, run `work` against it, then close it
///
/// A failed acquisition never reaches `work`. If this future is dropped
/// while `work` is pending, the engine's `Drop` does the teardown.
pub async fn with_engine<E, A, T, F>(acquire: A, work: F) -> Result<T, RenderError>
where
    E: ScopedEngine,
    A: Future<Output = Result<E, RenderError>>,
    F: for<'b> FnOnce(&'b E::Target) -> BoxFuture<'b, Result<T, RenderError>>,
{
    let mut engine = acquire.await?;
    let result = work(engine.target()).await;
    engine.close().await;
    result
}
