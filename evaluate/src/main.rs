use std::collections::BTreeMap;
use std::fs::File;
use std::io::{stdin, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use traghetto::{Classifier, LinearClassifier, LinearModel, TrainingDataReader};

/// Metrics over training-data lines.
///
/// Each line already carries the outcome-history features of its gold context, so every metric
/// here scores one instance at a time with gold history. They do not measure greedy sequence
/// decoding, where the history consists of the model's own predictions.
#[derive(Clone, Debug, PartialEq)]
enum EvaluationMetric {
    GoldHistoryAccuracy,
    GoldHistoryOutcomeF1,
}

impl FromStr for EvaluationMetric {
    type Err = &'static str;
    fn from_str(metric: &str) -> Result<Self, Self::Err> {
        match metric {
            "instance" => Ok(Self::GoldHistoryAccuracy),
            "outcome" => Ok(Self::GoldHistoryOutcomeF1),
            _ => Err("Could not parse a metric value"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "A program to evaluate Traghetto models per instance with gold history.")]
struct Args {
    /// The model file to use when classifying instances
    #[arg(long)]
    model: PathBuf,

    /// Evaluation metric: {instance, outcome}.
    /// Both classify each line independently with the gold history it was written with.
    /// instance: accuracy over instances.
    /// outcome: precision and recall of each outcome.
    #[arg(long, default_value = "instance")]
    metric: EvaluationMetric,
}

#[derive(Default)]
struct OutcomeCounts {
    n_sys: usize,
    n_ref: usize,
    n_cor: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading model file...");
    let f = zstd::Decoder::new(File::open(args.model)?)?;
    let model = LinearModel::read(BufReader::new(f))?;
    let classifier = LinearClassifier::new(model);

    eprintln!("Start per-instance classification with gold history");

    let mut results = vec![];
    for line in TrainingDataReader::new(stdin().lock()) {
        let line = line?;
        let predicted = classifier.classify(line.features)?;
        results.push((line.outcome, predicted));
    }

    match args.metric {
        EvaluationMetric::GoldHistoryAccuracy => {
            let n_cor = results.iter().filter(|(r, h)| r == h).count();
            let accuracy = n_cor as f64 / results.len() as f64;
            println!("Per-instance accuracy (gold history): {}", accuracy);
            println!("Correct: {}, Total: {}", n_cor, results.len());
        }
        EvaluationMetric::GoldHistoryOutcomeF1 => {
            let mut counts: BTreeMap<String, OutcomeCounts> = BTreeMap::new();
            for (r, h) in results {
                if r == h {
                    counts.entry(r.clone()).or_default().n_cor += 1;
                }
                counts.entry(r).or_default().n_ref += 1;
                counts.entry(h).or_default().n_sys += 1;
            }
            for (outcome, c) in counts {
                let precision = c.n_cor as f64 / c.n_sys as f64;
                let recall = c.n_cor as f64 / c.n_ref as f64;
                let f1 = 2. * precision * recall / (precision + recall);
                println!(
                    "{}\tPrecision: {}\tRecall: {}\tF1: {}",
                    outcome, precision, recall, f1
                );
            }
        }
    }

    Ok(())
}
