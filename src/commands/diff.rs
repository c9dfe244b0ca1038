use crate::engine::edit::EditOp;
use crate::engine::hybrid::{DiffOptions, HybridDiff};
use crate::preprocessing::{Normalizer, load_file};
use colored::Colorize;
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::PathBuf;

/// Everything the diff command needs for one run.
#[derive(Debug, Clone)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    pub options: DiffOptions,
    /// Normalize lines before comparison; off means keys are the raw lines.
    pub normalize: bool,
    /// Append the SHA-1 digest of the script after the operations.
    pub show_hash: bool,
    /// Print bare tokens without color.
    pub plain: bool,
}

pub struct DiffRunner {
    writer: RefCell<Box<dyn std::io::Write>>,
}

impl DiffRunner {
    pub fn new(writer: Box<dyn std::io::Write>) -> Self {
        DiffRunner {
            writer: RefCell::new(writer),
        }
    }

    fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn run(&self, args: &DiffArgs) -> anyhow::Result<()> {
        let normalizer = if args.normalize {
            Some(Normalizer::new()?)
        } else {
            None
        };

        let old_sequence = load_file(&args.old, normalizer.as_ref())?;
        let new_sequence = load_file(&args.new, normalizer.as_ref())?;

        let engine = HybridDiff::new(&old_sequence, &new_sequence, args.options.clone());
        let (script, digest) = engine.diff_with_digest()?;

        for op in script.ops() {
            if args.plain {
                writeln!(self.writer(), "{}", op.as_token())?;
            } else {
                writeln!(self.writer(), "{}", colorize(op))?;
            }
        }

        if args.show_hash {
            writeln!(self.writer(), "{digest}")?;
        }

        Ok(())
    }
}

fn colorize(op: &EditOp) -> String {
    let token = op.as_token();
    match op {
        EditOp::Match { .. } => token.normal(),
        EditOp::SimilarityMatch { .. } => token.yellow(),
        EditOp::Insert { .. } => token.green(),
        EditOp::Delete { .. } => token.red(),
    }
    .to_string()
}
