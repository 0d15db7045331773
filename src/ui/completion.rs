//! Shell completion output for arbflow

use clap::Command;
use clap_complete::{Generator, generate};

/// Write shell completions for `app` to stdout
pub fn print_completions<G: Generator>(generator: G, app: &mut Command) {
    generate(
        generator,
        app,
        app.get_name().to_string(),
        &mut std::io::stdout(),
    );
}

/// Render completions into a string
pub fn completion_script<G: Generator>(generator: G, app: &mut Command) -> String {
    let mut buffer = Vec::new();
    generate(generator, app, app.get_name().to_string(), &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}
