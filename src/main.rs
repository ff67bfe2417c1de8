//! trend-report binary entry point.

use anyhow::Result;

fn main() -> Result<()> {
    trend_report::cli::run()
}
