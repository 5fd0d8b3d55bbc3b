//! Terminal feedback for doctour
//!
//! Spinners are drawn on stderr and suppressed when:
//! - `--quiet` flag is passed
//! - `DOCTOUR_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Initialize quiet mode from flags and environment
///
/// Call this once at startup with the --quiet flag value.
pub fn init_quiet_mode(quiet_flag: bool) {
    let env_quiet = std::env::var("DOCTOUR_QUIET")
        .map(|v| v == "1")
        .unwrap_or(false);
    QUIET_MODE
        .set(resolve_quiet(quiet_flag, env_quiet, std::io::stderr().is_terminal()))
        .ok();
}

fn resolve_quiet(quiet_flag: bool, env_quiet: bool, stderr_is_tty: bool) -> bool {
    quiet_flag || env_quiet || !stderr_is_tty
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Create a spinner that respects quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

fn finish(pb: Option<ProgressBar>, msg: String) {
    if let Some(pb) = pb {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        pb.finish_with_message(msg);
    }
}

pub fn finish_success(pb: Option<ProgressBar>, msg: impl Into<String>) {
    finish(pb, format!("✓ {}", msg.into()));
}

pub fn finish_error(pb: Option<ProgressBar>, msg: impl Into<String>) {
    finish(pb, format!("✗ {}", msg.into()));
}

/// Await an operation behind a spinner, reporting success or failure
pub async fn with_spinner_async<T, E: std::fmt::Display>(
    msg: impl Into<String>,
    success_msg: impl Into<String>,
    f: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let msg = msg.into();
    let success_msg = success_msg.into();
    let pb = spinner(&msg);

    match f.await {
        Ok(result) => {
            finish_success(pb, success_msg);
            Ok(result)
        }
        Err(e) => {
            finish_error(pb, format!("{}: {}", msg, e));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_when_flag_env_or_pipe() {
        assert!(resolve_quiet(true, false, true));
        assert!(resolve_quiet(false, true, true));
        assert!(resolve_quiet(false, false, false));
        assert!(!resolve_quiet(false, false, true));
    }

    #[tokio::test]
    async fn spinner_passes_result_through() {
        init_quiet_mode(true);
        let ok: Result<u8, String> = with_spinner_async("a", "b", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u8, String> =
            with_spinner_async("a", "b", async { Err("nope".to_string()) }).await;
        assert_eq!(err, Err("nope".to_string()));
    }
}
