//! CLI command implementations.

mod compile;
mod info;
mod lint;

pub use compile::cmd_compile;
pub use info::cmd_info;
pub use lint::cmd_lint;

use std::path::Path;

use pal::Config;

/// Load config for the given project root, surfacing unknown-key
/// warnings from a local pal.toml in human mode.
pub(crate) fn load_config(root: Option<&Path>, json: bool) -> Config {
    if !json {
        if let Some(root) = root {
            let path = root.join("pal.toml");
            if path.exists() {
                if let Ok((_, warnings)) = pal::config::load_with_warnings(&path) {
                    crate::ui::print_config_warnings(&path, &warnings);
                }
            }
        }
    }
    pal::config::load_or_default(root)
}
