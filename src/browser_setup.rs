//! Locating, downloading and launching Chrome
//!
//! Discovery order: explicit path, `CHROMIUM_PATH`, well-known install
//! locations for the current platform, a `PATH` lookup, and finally a managed
//! Chromium download into the user cache directory.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::handler::Handler;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Per-launch browser settings
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Maps to `--ignore-certificate-errors`; set when the caller disabled TLS verification
    pub ignore_certificate_errors: bool,
    pub chrome_executable: Option<PathBuf>,
    /// CDP request timeout
    pub request_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            ignore_certificate_errors: false,
            chrome_executable: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// A place Chrome is commonly installed
#[derive(Debug, Clone, Copy)]
enum Candidate {
    Absolute(&'static str),
    /// Relative to the user's home directory
    Home(&'static str),
    /// Relative to the per-user local data directory (`%LOCALAPPDATA%`)
    LocalData(&'static str),
}

impl Candidate {
    fn resolve(self) -> Option<PathBuf> {
        match self {
            Self::Absolute(path) => Some(PathBuf::from(path)),
            Self::Home(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Self::LocalData(rest) => dirs::data_local_dir().map(|dir| dir.join(rest)),
        }
    }
}

#[cfg(target_os = "windows")]
const INSTALL_CANDIDATES: &[Candidate] = &[
    Candidate::Absolute(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
    Candidate::Absolute(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
    Candidate::LocalData(r"Google\Chrome\Application\chrome.exe"),
    Candidate::Absolute(r"C:\Program Files\Chromium\Application\chrome.exe"),
];

#[cfg(target_os = "macos")]
const INSTALL_CANDIDATES: &[Candidate] = &[
    Candidate::Absolute("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
    Candidate::Absolute("/Applications/Chromium.app/Contents/MacOS/Chromium"),
    Candidate::Home("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
    Candidate::Home("Applications/Chromium.app/Contents/MacOS/Chromium"),
    Candidate::Absolute("/opt/homebrew/bin/chromium"),
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const INSTALL_CANDIDATES: &[Candidate] = &[
    Candidate::Absolute("/usr/bin/google-chrome"),
    Candidate::Absolute("/usr/bin/google-chrome-stable"),
    Candidate::Absolute("/usr/bin/chromium"),
    Candidate::Absolute("/usr/bin/chromium-browser"),
    Candidate::Absolute("/snap/bin/chromium"),
    Candidate::Absolute("/usr/local/bin/chromium"),
    Candidate::Absolute("/opt/google/chrome/chrome"),
];

/// Upper bound on fetching managed Chromium during a launch
pub const MANAGED_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

const PATH_BINARIES: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Flags for a quiet, single-use browser
const CHROME_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-extensions",
    "--disable-notifications",
    "--disable-background-networking",
    "--disable-breakpad",
    "--disable-features=TranslateUI",
    "--password-store=basic",
    "--use-mock-keychain",
    "--mute-audio",
];

/// Find an installed Chrome/Chromium without downloading anything
///
/// # Errors
///
/// Fails when no candidate exists on disk.
pub async fn find_browser_executable(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        warn!("Configured Chrome executable does not exist: {}", path.display());
    }

    if let Some(path) = std::env::var_os("CHROMIUM_PATH").map(PathBuf::from) {
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!("CHROMIUM_PATH points to a missing file: {}", path.display());
    }

    if let Some(path) = INSTALL_CANDIDATES
        .iter()
        .filter_map(|candidate| candidate.resolve())
        .find(|path| path.exists())
    {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if let Some(path) = PATH_BINARIES.iter().find_map(|bin| which::which(bin).ok()) {
        info!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

fn managed_browser_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let fallback = std::env::temp_dir();
        warn!(
            "No user cache directory; storing managed Chromium under {}",
            fallback.display()
        );
        fallback
    });
    base.join("kodegen").join("markscrape").join("chromium")
}

/// Download Chromium into the user cache and return its executable
///
/// # Errors
///
/// Fails if the cache directory cannot be created or the download fails.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let dir = managed_browser_dir();
    info!("Fetching managed Chromium into {}", dir.display());

    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let options = BrowserFetcherOptions::builder()
        .with_path(&dir)
        .build()
        .context("Failed to build fetcher options")?;
    let installed = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to download Chromium")?;

    Ok(installed.executable_path)
}

/// Run `download` but give up after `limit`
///
/// Dropping the fetch on timeout leaves at most a partial directory behind,
/// which the next fetch overwrites.
async fn bounded_download<F>(download: F, limit: Duration) -> Result<PathBuf>
where
    F: Future<Output = Result<PathBuf>>,
{
    tokio::time::timeout(limit, download)
        .await
        .map_err(|_| anyhow::anyhow!("Chromium download exceeded {}s", limit.as_secs()))?
}

/// Known chromiumoxide deserialization noise for CDP events it does not model
fn is_benign_cdp_error(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

fn drive_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            match event {
                Ok(()) => {}
                Err(e) if is_benign_cdp_error(&e.to_string()) => {
                    trace!("Ignoring CDP deserialization error: {}", e);
                }
                Err(e) => error!("Browser handler error: {:?}", e),
            }
        }
        trace!("Browser handler finished");
    })
}

/// Launch a browser using `user_data_dir` as its profile
///
/// Returns the browser and the task driving its CDP connection. The caller
/// owns both and must abort the task once the browser is closed.
///
/// # Errors
///
/// Fails when no browser can be found or downloaded, or Chrome does not start.
pub async fn launch_browser(
    options: &LaunchOptions,
    user_data_dir: &Path,
) -> Result<(Browser, JoinHandle<()>)> {
    let executable = match find_browser_executable(options.chrome_executable.as_deref()).await {
        Ok(path) => path,
        Err(e) => {
            debug!("{}; falling back to managed download", e);
            bounded_download(download_managed_browser(), MANAGED_DOWNLOAD_TIMEOUT).await?
        }
    };

    let mut builder = BrowserConfigBuilder::default()
        .chrome_executable(executable)
        .user_data_dir(user_data_dir)
        .request_timeout(options.request_timeout)
        .window_size(1920, 1080)
        .args(CHROME_ARGS.iter().copied());

    builder = if options.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    if options.ignore_certificate_errors {
        builder = builder.arg("--ignore-certificate-errors");
    }

    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid browser configuration: {e}"))?;

    debug!("Launching browser with profile {}", user_data_dir.display());
    let (browser, handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    Ok((browser, drive_handler(handler)))
}
