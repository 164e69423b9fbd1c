//! In-memory `log` backend for unit tests. Records are tagged with the
//! emitting thread so tests running in parallel only see their own lines.

use std::sync::{Mutex, OnceLock};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push((
            thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<&'static CaptureLogger> = OnceLock::new();

fn logger() -> &'static CaptureLogger {
    LOGGER.get_or_init(|| {
        let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger {
            records: Mutex::new(Vec::new()),
        }));
        log::set_logger(logger).unwrap();
        log::set_max_level(LevelFilter::Trace);
        logger
    })
}

/// Installs the logger on first use and drops earlier lines of this thread.
pub fn start() {
    let current = thread::current().id();
    logger().records.lock().unwrap().retain(|(id, _, _)| *id != current);
}

/// Lines logged by this thread at `level` since `start`.
pub fn lines(level: Level) -> Vec<String> {
    let current = thread::current().id();
    logger()
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, lvl, _)| *id == current && *lvl == level)
        .map(|(_, _, msg)| msg.clone())
        .collect()
}
