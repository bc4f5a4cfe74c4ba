//! # pixel-compare CLI
//!
//! Command-line interface for the pixel similarity engine.
//!
//! ## Usage
//! ```bash
//! pixel-compare pair before.png after.png
//! pixel-compare batch ./expected ./actual --threads 8 --output json
//! ```

mod cli;

use pixel_similarity::Result;

fn main() -> Result<()> {
    cli::run()
}
