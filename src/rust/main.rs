use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sdg_classify::{
    presenter, ClassifyMode, CsvEncoding, Displayed, HttpModelService, Operation, Orchestrator,
    ServiceConfig, Session, UploadedFile, WorkflowState,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base address of the classification service (overrides SDG_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify opinions typed on the command line or read from a file
    Classify {
        /// A csv, xlsx or xls file with one opinion per line or cell
        #[arg(short, long, conflicts_with = "texts")]
        file: Option<PathBuf>,
        /// Character encoding of a CSV file (UTF-8 or ISO-8859-1)
        #[arg(short, long, default_value = "UTF-8")]
        encoding: String,
        /// Opinions to classify
        texts: Vec<String>,
    },
    /// Retrain the model with a labeled dataset
    Retrain {
        /// The dataset, sent to the service as-is
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    sdg_classify::init_logger();
    let args = Args::parse();

    let mut config = ServiceConfig::from_env();
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    info!("Using service at {}", config.base_url);

    let orchestrator = Orchestrator::new(HttpModelService::new(config)?);
    let mut session = Session::new();
    let start_time = Instant::now();

    match args.command {
        Command::Classify { file, encoding, texts } => {
            session.select(Operation::Classify);
            match file {
                Some(path) => {
                    let encoding: CsvEncoding = encoding.parse()?;
                    let upload = UploadedFile::from_path(&path)
                        .with_context(|| format!("Cannot use {}", path.display()))?
                        .with_encoding(encoding);
                    session.set_file(upload);
                    session.set_mode(ClassifyMode::File);
                }
                None => {
                    session.remove_entry(0);
                    for text in texts {
                        session.add_entry();
                        session.update_entry(session.entries().len() - 1, text);
                    }
                }
            }
            println!("{}", Operation::Classify.progress_label());
            // The outcome is also recorded in the workflow state rendered below
            let _ = orchestrator.classify(session.classify_input()).await;
        }
        Command::Retrain { file } => {
            session.select(Operation::Retrain);
            let upload = UploadedFile::from_path(&file)
                .with_context(|| format!("Cannot use {}", file.display()))?;
            session.set_file(upload);
            println!("{}", Operation::Retrain.progress_label());
            let _ = orchestrator.retrain(session.retrain_file()).await;
        }
    }

    info!("Finished in {:.2?}", start_time.elapsed());
    render(&session.displayed(&orchestrator))
}

fn render(displayed: &Displayed) -> Result<()> {
    let failure = match displayed {
        Displayed::Classify(WorkflowState::Succeeded(outcomes)) => {
            println!("\nResults:");
            for line in presenter::describe_outcomes(outcomes) {
                println!("  {}", line);
            }
            None
        }
        Displayed::Retrain(WorkflowState::Succeeded(metrics)) => {
            println!("\nPerformance metrics:");
            for line in presenter::describe_metrics(metrics) {
                println!("  {}", line);
            }
            None
        }
        Displayed::Classify(WorkflowState::Failed(err)) | Displayed::Retrain(WorkflowState::Failed(err)) => {
            Some(err.clone())
        }
        _ => None,
    };

    match failure {
        Some(err) => {
            eprintln!("\nError ({:?}): {}", err.kind(), err);
            Err(err.into())
        }
        None => Ok(()),
    }
}
