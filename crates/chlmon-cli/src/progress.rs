use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Create a spinner for an in-flight request
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run a future behind a spinner. JSON mode stays silent so stdout remains
/// parseable.
pub async fn with_spinner<F, T>(message: &str, quiet: bool, future: F) -> T
where
    F: Future<Output = T>,
{
    if quiet {
        return future.await;
    }
    let pb = create_spinner(message);
    let result = future.await;
    pb.finish_and_clear();
    result
}
