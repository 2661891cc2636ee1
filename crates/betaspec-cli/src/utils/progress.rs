use betaspec::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// Renders generation progress on stderr as a point counter.
///
/// The bar handle is shared, so callbacks handed to the core update the same bar the
/// handler owns.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    /// A handler drawing to stderr, or tracking state silently when `quiet` is set.
    pub fn new(quiet: bool) -> Self {
        let target = if quiet {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(phase_style());
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |event| apply(&bar, event))
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_style(phase_style());
            bar.set_message(name);
            bar.enable_steady_tick(TICK);
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.set_style(points_style());
            bar.set_length(total_steps);
            bar.set_position(0);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(total) = bar.length() {
                bar.set_position(total);
            }
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

fn phase_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn points_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} {wide_bar} {pos}/{len} points [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
