/// Events emitted while a batch of molecules is processed.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total: u64 },
    TaskIncrement,
    TaskFinish,

    /// One molecule could not be processed; the batch continues.
    MoleculeFailed { molecule: String, reason: String },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        assert!(reporter.is_silent());
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(format!("{:?}", event));
        }));

        reporter.report(Progress::PhaseStart { name: "Preparation" });
        reporter.report(Progress::TaskStart { total: 2 });
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::MoleculeFailed {
            molecule: "1abc".to_string(),
            reason: "singular".to_string(),
        });
        assert!(!reporter.is_silent());
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen[3].contains("1abc"));
        assert!(seen[0].contains("Preparation"));
        assert!(seen[1].contains("total: 2"));
    }
}
