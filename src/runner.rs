use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use tracing::info;

use fmtwrite::config::{self, FmtConfig};
use fmtwrite::{ensure_dir, save_file};

use crate::cli::{Cli, Command, WriteArgs};

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Mkdir { dir } => handle_mkdir(dir),
        Command::Write(args) => handle_write(&config, args),
    }
}

fn load_config(path: Option<&Path>) -> Result<FmtConfig> {
    let Some(path) = path else {
        return Ok(FmtConfig::default());
    };
    let path = utf8(path.to_path_buf())?;
    config::load_from_path(&path)
}

fn handle_mkdir(dir: PathBuf) -> Result<()> {
    let dir = utf8(dir)?;
    ensure_dir(&dir)?;
    info!("ensured {}", dir);
    Ok(())
}

fn handle_write(config: &FmtConfig, args: WriteArgs) -> Result<()> {
    let dir = utf8(args.dir)?;
    if args.mkdir {
        ensure_dir(&dir)?;
    }

    let contents = read_input(args.input.as_deref())?;
    let options = config.write_options(args.format, args.print_width);
    let path = save_file(&config.toolchain(), &dir, &args.name, &contents, &options)?;

    println!("{}", path);
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading input {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading input from stdin")?;
            Ok(buf)
        }
    }
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("path {} is not valid UTF-8", path.display()))
}
