use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use linediff::commands::diff::{DiffArgs, DiffRunner};
use linediff::core::PagerWriter;
use linediff::engine::hybrid::DiffOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "linediff",
    version = "0.1.0",
    about = "Hybrid line-level diff between two versions of a file",
    long_about = "Computes a line alignment between two versions of a text file. \
    Lines with equal normalized keys are matched exactly via a shortest edit script; \
    the remaining lines are linked by content and context similarity, so edited-in-place \
    lines are reported as modified rather than as a deletion plus an insertion.",
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
        name = "diff",
        about = "Print the edit script aligning OLD with NEW",
        long_about = "This command prints one token per line: 'x:y' for an exact match, \
        'x~y' for a similarity match, 'x-' for a deleted old line, and 'y+' for an \
        inserted new line. Indices are 0-based."
    )]
    Diff {
        #[arg(index = 1, help = "Path to the old version of the file")]
        old: PathBuf,
        #[arg(index = 2, help = "Path to the new version of the file")]
        new: PathBuf,
        #[arg(
            long,
            default_value_t = 0.6,
            help = "Minimum combined similarity for a fuzzy match, in [0, 1]"
        )]
        threshold: f64,
        #[arg(long, help = "Disable the fuzzy second pass (exact matches only)")]
        no_similarity: bool,
        #[arg(long, default_value_t = 0.6, help = "Weight of content similarity")]
        content_weight: f64,
        #[arg(long, default_value_t = 0.4, help = "Weight of context similarity")]
        context_weight: f64,
        #[arg(
            long,
            default_value_t = 4,
            help = "Lines of surrounding context per side fed into the context score"
        )]
        context_radius: usize,
        #[arg(long, help = "Compare raw lines without normalization")]
        no_normalize: bool,
        #[arg(long, help = "Print the SHA-1 digest of the edit script after the tokens")]
        hash: bool,
        #[arg(long, help = "Disable colored output")]
        plain: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Diff {
            old,
            new,
            threshold,
            no_similarity,
            content_weight,
            context_weight,
            context_radius,
            no_normalize,
            hash,
            plain,
        } => {
            let args = DiffArgs {
                old: old.clone(),
                new: new.clone(),
                options: DiffOptions {
                    similarity_threshold: *threshold,
                    use_similarity: !*no_similarity,
                    content_weight: *content_weight,
                    context_weight: *context_weight,
                    context_radius: *context_radius,
                },
                normalize: !*no_normalize,
                show_hash: *hash,
                plain: *plain,
            };

            if std::io::stdout().is_terminal() {
                let pager = minus::Pager::new();
                let runner = DiffRunner::new(Box::new(PagerWriter::new(pager.clone())));
                runner.run(&args)?;
                minus::page_all(pager)?;
            } else {
                let runner = DiffRunner::new(Box::new(std::io::stdout()));
                runner.run(&args)?;
            }
        }
    }

    Ok(())
}
