pub(crate) const DEFAULT_USER_AGENT: &str = concat!("atest/", env!("CARGO_PKG_VERSION"));

/// Default config files are `<stem>.toml` and `<stem>.json` in the working directory.
pub(crate) const CONFIG_FILE_STEM: &str = "atest";

pub(super) const DEFAULT_PATTERN: &str = "test-suite-*.yaml";
pub(super) const DEFAULT_DURATION: &str = "0";
pub(super) const DEFAULT_REQUEST_TIMEOUT: &str = "1m";
pub(super) const DEFAULT_THREAD: &str = "1";
pub(super) const DEFAULT_QPS: u32 = 5;
pub(super) const DEFAULT_BURST: u32 = 5;
