//! Progress bar construction shared by training and batch coding.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle, style::TemplateError};

const BAR_TEMPLATE: &str = "[{elapsed_precise}] {msg:<30!} {wide_bar} {pos}/{len}";

/// Creates a styled progress bar with elapsed time, a fixed-width message
/// label, and position/total counters.
///
/// # Arguments
///
/// * `size` - The total number of steps the progress bar represents.
/// * `msg` - The message label displayed alongside the progress bar.
///
/// # Errors
///
/// Returns a [`TemplateError`] if the progress bar style template is invalid.
pub(crate) fn progress_bar(
    size: u64,
    msg: impl Into<String>,
) -> Result<ProgressBar, TemplateError> {
    let pb = ProgressBar::new(size);
    let style = ProgressStyle::default_bar().template(BAR_TEMPLATE)?;

    pb.set_style(style);
    pb.set_message(msg.into());
    pb.enable_steady_tick(std::time::Duration::from_secs(1));

    Ok(pb)
}

/// A progress bar that never renders.
pub(crate) fn hidden_bar(size: u64) -> ProgressBar {
    let pb = ProgressBar::new(size);
    pb.set_draw_target(ProgressDrawTarget::hidden());
    pb
}

/// Visible bar when `show` is set, otherwise a hidden one.
pub(crate) fn bar_for(show: bool, size: u64, msg: &str) -> Result<ProgressBar, TemplateError> {
    if show {
        progress_bar(size, msg)
    } else {
        Ok(hidden_bar(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_bar_template_compiles() {
        let pb = bar_for(true, 3, "Training merges").expect("template should compile");
        pb.inc(2);
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(3));
        pb.finish_and_clear();
    }

    #[test]
    fn test_hidden_bar_counts_without_drawing() {
        let pb = bar_for(false, 5, "unused").expect("hidden bar never fails");
        assert!(pb.is_hidden());
        pb.inc(5);
        assert_eq!(pb.position(), 5);
    }
}
