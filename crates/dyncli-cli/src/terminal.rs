use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Sleep for `duration` while showing a spinner.
pub async fn wait_with_spinner(duration: Duration, message: &str) {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    tokio::time::sleep(duration).await;

    spinner.finish_and_clear();
}
