use clap::{Parser, Subcommand};
use form_schema as tool;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "form-schema",
    about = "Inspect and normalise declarative form schemas"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check a schema file for structural problems
    Lint {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the fields of a schema in creation (pre-)order
    Flatten {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Re-write a schema as pretty-printed JSON
    Format {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Lint { input } => {
            let schema = tool::read_schema(&input)?;
            println!(
                "{}: ok ({} fields)",
                input.display(),
                tool::count_fields(&schema)
            );
            Ok(())
        }
        Cmd::Flatten { input } => {
            let schema = tool::read_schema(&input)?;
            for visit in tool::preorder(&schema) {
                let node = visit.node;
                let binding = match (&node.key, &node.path) {
                    (Some(key), _) => format!(" key={}", key),
                    (None, Some(path)) => format!(" path={}", path),
                    (None, None) => String::new(),
                };
                println!(
                    "{}{} {}{}",
                    "  ".repeat(visit.depth),
                    node.field_type,
                    node.id.as_deref().unwrap_or("-"),
                    binding
                );
            }
            Ok(())
        }
        Cmd::Format { input, output } => {
            let schema = tool::read_schema(&input)?;
            tool::write_schema(&output, &schema)?;
            eprintln!("Wrote schema to {}", output.display());
            Ok(())
        }
    }
}
