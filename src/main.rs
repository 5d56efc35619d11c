//! Standalone orbitview window.
//!
//! Usage: `orbitview [options.toml]`. Without an argument the built-in
//! defaults are used; `RUST_LOG` controls log output.

use std::path::Path;

use orbitview::{Options, Viewer};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => {
                log::info!("loaded options from {path}");
                options
            }
            Err(e) => {
                log::error!("{path}: {e}; using defaults");
                Options::default()
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("viewer exited: {e}");
        std::process::exit(1);
    }
}
