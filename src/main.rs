use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use minigit::areas::repository::Repository;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressed snapshot store",
    long_about = "Stores file snapshots as git-compatible blob, tree and commit objects, \
    keeps a binary index of staged files and moves HEAD along a single line of commits.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content or type of an object",
        group(ArgGroup::new("output").required(true).args(["pretty", "show_type"]))
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object type")]
        show_type: bool,
        #[arg(index = 1, help = "The object id")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the given files (or the whole working tree) as a new commit"
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(index = 1, help = "Files to include; defaults to every file")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "update-index",
        about = "Rebuild the index from the given files (or the whole working tree)"
    )]
    UpdateIndex {
        #[arg(index = 1)]
        paths: Vec<PathBuf>,
    },
    #[command(name = "ls-files", about = "List the files recorded in the index")]
    LsFiles {
        #[arg(short, long, help = "Show mode, object id and stage")]
        stage: bool,
        #[arg(long, help = "Accept an index whose checksum is missing or wrong")]
        no_verify: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn open_current_dir() -> Result<Repository> {
    let pwd = std::env::current_dir()?;

    Ok(Repository::new(
        &pwd.to_string_lossy(),
        Box::new(std::io::stdout()),
    )?)
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => open_current_dir()?,
            };

            repository.init()?
        }
        Commands::CatFile {
            pretty,
            show_type,
            sha,
        } => open_current_dir()?.cat_file(sha, *show_type && !*pretty)?,
        Commands::HashObject { write, file } => open_current_dir()?.hash_object(file, *write)?,
        Commands::Commit { message, paths } => {
            open_current_dir()?.commit(paths, message)?;
        }
        Commands::UpdateIndex { paths } => open_current_dir()?.write_index(paths)?,
        Commands::LsFiles { stage, no_verify } => {
            open_current_dir()?.ls_files(*stage, !*no_verify)?
        }
    }

    Ok(())
}
