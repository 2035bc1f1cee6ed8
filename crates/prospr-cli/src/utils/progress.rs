use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use prospr::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Drives one terminal progress bar from engine [`Progress`] events.
///
/// A phase shows as a spinner; a task inside it switches the bar to a window counter.
/// Each model pass restarts the counter and is named in the bar's prefix.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    fn with_bar(pb: ProgressBar) -> Self {
        let pb = pb
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_prefix("");
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::PassStart {
                    model,
                    index,
                    total,
                } => {
                    pb_guard.set_prefix(format!("[{}/{}] {}", index + 1, total, model));
                }
                Progress::TaskStart { total_steps } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                }
                Progress::TaskIncrement { steps } => {
                    pb_guard.inc(steps);
                }
                Progress::TaskFinish => {
                    let length = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < length {
                        pb_guard.set_position(length);
                    }
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{prefix:<20} [{bar:40.cyan/blue}] {pos}/{len} windows ({eta})",
        )
        .expect("Failed to create bar style template")
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap()
        })
        .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_bar(ProgressBar::with_draw_target(
            Some(0),
            ProgressDrawTarget::hidden(),
        ))
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = hidden_handler();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_windows_across_a_pass() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Crop Assembly",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Crop Assembly");
            assert!(!pb.is_finished());
        }

        callback(Progress::PassStart {
            model: "a".to_string(),
            index: 0,
            total: 3,
        });
        callback(Progress::TaskStart { total_steps: 9 });
        callback(Progress::TaskIncrement { steps: 2 });
        callback(Progress::TaskIncrement { steps: 2 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.prefix(), "[1/3] a");
            assert_eq!(pb.length(), Some(9));
            assert_eq!(pb.position(), 4);
        }

        callback(Progress::TaskFinish);
        assert_eq!(handler.pb.lock().unwrap().position(), 9);

        callback(Progress::PhaseFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.message(), "✓ Done");
        }
    }

    #[test]
    fn next_pass_restarts_the_counter() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Crop Assembly",
        });
        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskIncrement { steps: 4 });
        callback(Progress::TaskFinish);
        callback(Progress::PassStart {
            model: "b".to_string(),
            index: 1,
            total: 2,
        });
        callback(Progress::TaskStart { total_steps: 6 });

        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.prefix(), "[2/2] b");
        assert_eq!(pb.length(), Some(6));
        assert_eq!(pb.position(), 0);
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Coverage Check",
            });
            callback(Progress::TaskIncrement { steps: 1 });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }
}
