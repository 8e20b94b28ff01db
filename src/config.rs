//! Command-line and environment configuration.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use directories::BaseDirs;

use crate::catalog::CatalogSource;
use crate::db::DB_FILE_NAME;
use crate::search::DEFAULT_PAGE_SIZE;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".karaoke-songbook";
/// Log folder inside the data directory.
const LOG_DIR_NAME: &str = "logs";

#[derive(Parser, Debug)]
#[command(name = "karaoke-songbook", version, about = "Search a karaoke song list")]
pub struct CliArgs {
    /// Song list to load: a file path or an http(s) URL.
    #[arg(
        long,
        env = "KARAOKE_SONG_LIST",
        default_value = "SongList.txt",
        value_parser = parse_source
    )]
    pub source: CatalogSource,

    /// Directory holding the favorites database and logs.
    #[arg(long, env = "KARAOKE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Results per page when pagination is on.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Start with pagination switched on.
    #[arg(long)]
    pub paginate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Turn the vendor CSV export into an English-only song list.
    Convert {
        /// Semicolon-delimited CSV export.
        #[arg(long)]
        input: PathBuf,

        /// Where to write the song list.
        #[arg(long, default_value = "SongList.txt")]
        output: PathBuf,
    },
}

impl CliArgs {
    /// The configured data directory, or `~/.karaoke-songbook`.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

/// Resolve the default data directory inside the user's home.
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_DIR_NAME)
}

fn parse_source(raw: &str) -> Result<CatalogSource, String> {
    if raw.trim().is_empty() {
        return Err("song list source cannot be empty".to_string());
    }
    Ok(CatalogSource::parse(raw))
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        Ok(size) => Ok(size),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let args = CliArgs::try_parse_from(["karaoke-songbook", "--source", "SongList.txt"]).unwrap();
        assert_eq!(args.source, CatalogSource::File(PathBuf::from("SongList.txt")));
        assert_eq!(args.page_size, DEFAULT_PAGE_SIZE);
        assert!(!args.paginate);
        assert!(args.command.is_none());
    }

    #[test]
    fn url_sources_and_pagination_flags_parse() {
        let args = CliArgs::try_parse_from([
            "karaoke-songbook",
            "--source",
            "https://example.com/SongList.txt",
            "--page-size",
            "25",
            "--paginate",
            "--data-dir",
            "/tmp/songbook",
        ])
        .unwrap();
        assert!(matches!(args.source, CatalogSource::Url(_)));
        assert_eq!(args.page_size, 25);
        assert!(args.paginate);
        assert_eq!(args.data_dir().unwrap(), PathBuf::from("/tmp/songbook"));
        assert_eq!(
            db_path(&args.data_dir().unwrap()),
            PathBuf::from("/tmp/songbook").join(DB_FILE_NAME)
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(CliArgs::try_parse_from(["karaoke-songbook", "--page-size", "0"]).is_err());
    }

    #[test]
    fn convert_subcommand_parses() {
        let args = CliArgs::try_parse_from([
            "karaoke-songbook",
            "convert",
            "--input",
            "raw.csv",
            "--output",
            "public/SongList.txt",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Convert {
                input: PathBuf::from("raw.csv"),
                output: PathBuf::from("public/SongList.txt"),
            })
        );
    }
}
