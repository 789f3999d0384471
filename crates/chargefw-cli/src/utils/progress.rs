use chargefw::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK: Duration = Duration::from_millis(80);
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const COUNTER_TEMPLATE: &str = "{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn counter_style() -> ProgressStyle {
    ProgressStyle::with_template(COUNTER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("=> ")
}

/// Terminal state shared between the handler and the callbacks it hands out.
struct Screen {
    bar: ProgressBar,
    phase: &'static str,
    failed: Vec<String>,
}

impl Screen {
    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => self.begin_phase(name),
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message(format!("✓ {}", self.phase));
            }
            Progress::TaskStart { total } => self.begin_counting(total),
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
                self.bar.finish();
            }
            Progress::MoleculeFailed { molecule, reason } => self.record_failure(molecule, reason),
        }
    }

    fn begin_phase(&mut self, name: &'static str) {
        self.phase = name;
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_style(spinner_style());
        self.bar.set_message(name);
        self.bar.enable_steady_tick(SPINNER_TICK);
    }

    fn begin_counting(&mut self, total: u64) {
        self.bar.disable_steady_tick();
        self.bar.reset();
        self.bar.set_length(total);
        self.bar.set_style(counter_style());
        self.bar.set_message("Molecules");
    }

    fn record_failure(&mut self, molecule: String, reason: String) {
        self.bar.println(format!("  ✗ {}: {}", molecule, reason));
        self.failed.push(molecule);
        self.bar
            .set_message(format!("Molecules ({} failed)", self.failed.len()));
    }
}

/// Shows workflow progress on stderr and remembers which molecules failed.
#[derive(Clone)]
pub struct CliProgressHandler {
    screen: Arc<Mutex<Screen>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(spinner_style());
        bar.finish_and_clear();

        Self {
            screen: Arc::new(Mutex::new(Screen {
                bar,
                phase: "",
                failed: Vec::new(),
            })),
        }
    }

    /// Names of the molecules reported as failed so far.
    pub fn failed_molecules(&self) -> Vec<String> {
        self.screen
            .lock()
            .map(|screen| screen.failed.clone())
            .unwrap_or_default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let screen = Arc::clone(&self.screen);
        Box::new(move |event: Progress| match screen.lock() {
            Ok(mut screen) => screen.apply(event),
            Err(_) => warn!("Progress display lock was poisoned; dropping event."),
        })
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
    use std::thread;

    fn bar(handler: &CliProgressHandler) -> ProgressBar {
        handler.screen.lock().unwrap().bar.clone()
    }

    #[test]
    fn new_handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::new();
        assert!(bar(&handler).is_finished());
        assert!(handler.failed_molecules().is_empty());
    }

    #[test]
    fn workflow_events_drive_phase_and_counter() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Charge Calculation" });
        assert_eq!(bar(&handler).message(), "Charge Calculation");
        assert!(!bar(&handler).is_finished());

        callback(Progress::TaskStart { total: 4 });
        callback(Progress::TaskIncrement);
        assert_eq!(bar(&handler).length(), Some(4));
        assert_eq!(bar(&handler).position(), 1);

        callback(Progress::TaskFinish);
        assert_eq!(bar(&handler).position(), 4);
        assert!(bar(&handler).is_finished());

        callback(Progress::PhaseFinish);
        assert_eq!(bar(&handler).message(), "✓ Charge Calculation");
    }

    #[test]
    fn failures_are_recorded_and_counted() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total: 2 });
        callback(Progress::MoleculeFailed {
            molecule: "1abc".to_string(),
            reason: "atoms 3 and 4 occupy the same position".to_string(),
        });

        assert_eq!(handler.failed_molecules(), vec!["1abc".to_string()]);
        assert_eq!(bar(&handler).message(), "Molecules (1 failed)");
    }

    #[test]
    fn callback_can_run_on_another_thread() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Preparation" });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(bar(&handler).is_finished());
        assert_eq!(bar(&handler).message(), "✓ Preparation");
    }
}
