//! Sources command: show the effective source registry.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::sources::{sources_for, ListKind};

/// Run the sources command
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    print!("{}", render(&config));
    Ok(())
}

/// One block per list, in fetch order
pub fn render(config: &Config) -> String {
    let mut out = String::new();

    for (kind, path) in [
        (ListKind::White, &config.output.white),
        (ListKind::Black, &config.output.black),
    ] {
        out.push_str(&format!("{} list -> {}\n", kind, path.display()));
        for source in sources_for(&config.sources, kind) {
            out.push_str(&format!(
                "  [{}] {:<16} {}\n",
                source.format, source.name, source.url
            ));
        }
        if kind == ListKind::Black && config.daily.enabled {
            out.push_str(&format!(
                "  [HTML] {:<16} {} (last {} days)\n",
                config.daily.name, config.daily.url_template, config.daily.days
            ));
        }
    }

    out
}
