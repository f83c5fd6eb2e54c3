//! Build script that renders the `dropkit(1)` man page from the CLI
//! definition.
//!
//! The page is written to `$OUT_DIR/dropkit.1`. Packaging copies it from
//! there into `share/man/man1/`, for example
//! `install -Dm644 "$OUT_DIR/dropkit.1" "$PREFIX/share/man/man1/dropkit.1"`.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

const MAN_PAGE: &str = "dropkit.1";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR was not set"))?;
    let page = out_dir.join(MAN_PAGE);

    let mut writer = BufWriter::new(File::create(&page)?);
    Man::new(cli::Cli::command()).render(&mut writer)?;
    writer.flush()?;
    Ok(())
}
