
/// Sends log output to the test harness, which only shows it for failing tests. Safe to call from
/// every test; only the first call installs the logger.
pub(crate) fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Trace, simplelog::Config::default());
}
