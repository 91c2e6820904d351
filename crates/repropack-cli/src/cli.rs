//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use repropack_core::ArchiveFormat;
use repropack_core::SymlinkPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repropack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a reproducible archive from a directory
    Create(CreateArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Directory whose contents are archived
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Output archive path (.zip for zip, anything else for tar.gz)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path prepended to every entry name
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// How symlinks under the source are handled
    #[arg(long, value_enum, default_value_t = SymlinkArg::Preserve)]
    pub symlinks: SymlinkArg,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Store fixed permissions (0644 files, 0755 directories)
    #[arg(long)]
    pub no_preserve_permissions: bool,

    /// Archive format, overriding the output suffix
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Symlink policy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymlinkArg {
    /// Store symlinks as links (tar) or their file content (zip)
    Preserve,
    /// Archive what symlinks point to
    Follow,
    /// Fail on any symlink
    Reject,
}

impl From<SymlinkArg> for SymlinkPolicy {
    fn from(arg: SymlinkArg) -> Self {
        match arg {
            SymlinkArg::Preserve => Self::Preserve,
            SymlinkArg::Follow => Self::Follow,
            SymlinkArg::Reject => Self::Reject,
        }
    }
}

/// Archive format as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Gzip-compressed tar
    #[value(name = "tar.gz", alias = "tgz")]
    TarGz,
    /// Deflate zip
    Zip,
}

impl From<FormatArg> for ArchiveFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::TarGz => Self::TarGz,
            FormatArg::Zip => Self::Zip,
        }
    }
}
