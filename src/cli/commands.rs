use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ann",
    about = concat!("ann v", env!("CARGO_PKG_VERSION"), " - annotations for files and directories"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// Use this annotation database instead of the configured store
    #[arg(long, global = true, value_name = "DB")]
    pub store: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the annotation menu for a selection
    Menu(PathsArgs),
    /// Print the annotation menu for a folder background
    Background(BackgroundArgs),
    /// Edit the annotation shared by a selection
    Annotate(PathsArgs),
    /// Erase the annotations of a selection
    Erase(EraseArgs),
    /// Print an entry's annotation
    Show(ShowArgs),
    /// Print the emblems of each entry
    Emblems(PathsArgs),
}

#[derive(Args)]
pub struct PathsArgs {
    /// Files and directories making up the selection
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct BackgroundArgs {
    /// The folder whose background was clicked
    pub dir: String,
}

#[derive(Args)]
pub struct EraseArgs {
    /// Files and directories making up the selection
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub path: String,
}
