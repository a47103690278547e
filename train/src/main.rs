use std::fs::File;
use std::io::{prelude::*, stderr, BufReader};
use std::path::PathBuf;

use clap::Parser;
use traghetto::{DataWriter, LiblinearTrainer, SolverType, TrainingDataReader};

#[derive(Parser, Debug)]
#[command(about = "A program to train linear models of Traghetto.")]
struct Args {
    /// Training data files with dictionary-indexed feature names
    #[arg(long, required = true)]
    data: Vec<PathBuf>,

    /// The file to write the trained model to
    #[arg(long)]
    model: PathBuf,

    /// The epsilon stopping criterion for classifier training
    #[arg(long, default_value = "0.01")]
    eps: f64,

    /// The cost hyperparameter for classifier training
    #[arg(long, default_value = "1.0")]
    cost: f64,

    /// The solver. {0, 1, 2, 3, 4, 5, 6, 7} (see LIBLINEAR documentation for more details)
    #[arg(long)]
    solver: SolverType,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading dataset...");
    let mut trainer = LiblinearTrainer::new();
    for path in args.data {
        eprintln!("Loading {path:?} ...");
        let f = BufReader::new(File::open(path)?);
        for (i, line) in TrainingDataReader::new(f).enumerate() {
            if i % 10000 == 0 {
                eprint!("# of instances: {i}\r");
                stderr().flush()?;
            }
            let line = line?;
            trainer.write_training_instance(line.features, &line.outcome)?;
        }
        eprintln!("# of instances: {}", trainer.n_instances());
    }

    eprintln!("Start training...");
    let model = trainer.train(args.eps, args.cost, args.solver)?;
    eprintln!("Finish training.");

    let mut f = zstd::Encoder::new(File::create(args.model)?, 19)?;
    f.multithread(args.zstd_workers)?;
    model.write(&mut f)?;
    f.finish()?;

    Ok(())
}
