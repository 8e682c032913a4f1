//! streammark CLI: run the streamed-text normalization pipeline from a shell.
//!
//! Reads raw text from an argument or stdin and prints either normalized
//! markdown (default) or the rendered node tree as JSON (`--nodes`). The
//! binary exists for debugging the pipeline against captured stream buffers;
//! the host application calls the library directly.

use std::io::Read;

use clap::Parser;

use streammark::TypesetError;

/// Command-line arguments.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalize and render streamed chat markdown"
)]
struct Args {
    /// Text to process (reads stdin when omitted)
    text: Option<String>,

    /// Emit the rendered node tree as JSON instead of normalized markdown
    #[arg(long)]
    nodes: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (warn level by default; use RUST_LOG=debug for verbose)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()
        .ok();

    let args = Args::parse();
    let text = match args.text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if args.nodes {
        // No typesetting widget in the CLI; math passes through as raw LaTeX.
        let engine =
            |latex: &str, _display: bool| -> Result<String, TypesetError> { Ok(latex.to_string()) };
        let nodes = streammark::render_text_with_math_and_citations(&text, &engine);
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        println!("{}", streammark::normalize_streamed_text(&text));
    }
    Ok(())
}
