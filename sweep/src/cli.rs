use clap::Parser;
use std::path::PathBuf;

/// Search a space of retrieval-experiment configurations over stored
/// features, recording results incrementally so an interrupted sweep can be
/// resumed without re-running finished experiments.
#[derive(Debug, Parser)]
#[command(name = "retri-sweep", version)]
pub struct Cli {
    /// Root directory to scan for per-run feature subdirectories
    #[arg(long = "fea_dir", visible_alias = "fd", value_name = "DIR")]
    pub fea_dir: PathBuf,

    /// Search-modules directory holding query_dict.toml
    #[arg(long = "search_modules", visible_alias = "sm", value_name = "DIR")]
    pub search_modules: PathBuf,

    /// Path of the persisted result document (read if present, rewritten
    /// after every completed experiment)
    #[arg(long = "save_path", visible_alias = "sp", value_name = "FILE")]
    pub save_path: PathBuf,
}
