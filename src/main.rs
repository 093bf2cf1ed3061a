//! # image-hygiene CLI
//!
//! Command-line interface for the image hygiene scanner.
//!
//! ## Usage
//! ```bash
//! image-hygiene scan ~/Pictures
//! image-hygiene scan ~/Pictures --threshold 60 --output json
//! image-hygiene scan ~/Pictures --auto-cleanup
//! ```

mod cli;

use image_hygiene::Result;

fn main() -> Result<()> {
    cli::run()
}
