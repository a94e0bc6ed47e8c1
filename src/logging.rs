use std::io::Write;

use env_logger::WriteStyle;
use log::{LevelFilter, SetLoggerError};

/// Installs the crate's `[RSIM | LEVEL]` logger.
///
/// Fails if another logger was already installed for this process.
pub fn try_init() -> Result<(), SetLoggerError> {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "[RSIM | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Always)
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .try_init()
}
