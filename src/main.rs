use std::io::Write;

use anyhow::Result;
use env_logger::{Env, Target};

use colab_notebook_setup::config::Config;
use colab_notebook_setup::runner;

fn main() -> Result<()> {
    // Parse configuration from command line and config files
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(&config.log_level))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(Target::Stdout)
        .init();

    for source in &config.sources {
        log::debug!("loaded config from {}", source.display());
    }

    // Per-file failures are reported in the log, not through the exit code
    runner::run(&config)?;

    Ok(())
}
