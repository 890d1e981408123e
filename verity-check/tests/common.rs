use std::sync::OnceLock;

use verity_common::observability::{LogFormat, LoggingSettings};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let settings = LoggingSettings {
            dir: Some(std::env::temp_dir().join("verity-tests")),
            emit_stderr: true,
            format: std::env::var("VERITY_LOG_FORMAT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(LogFormat::Text),
            filter: "debug".into(),
        };

        verity_common::observability::init_logging("verity-tests", &settings).unwrap_or_default()
    });
}
