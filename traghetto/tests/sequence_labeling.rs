use std::fs::File;
use std::io::{BufReader, BufWriter};

use traghetto::{
    EncodingClassifier, EncodingDataWriter, Feature, Instance, LinearClassifier, LinearModel,
    NameNumberEncoder, Orientation, TrainingDataReader, TrainingDataWriter, TrainingLine,
    ViterbiClassifier, ViterbiDataWriter, FEATURE_LOOKUP_FILE_NAME,
};

const CORPUS: &[&[(&str, &str)]] = &[
    &[("the", "D"), ("cat", "N"), ("sleeps", "V")],
    &[("a", "D"), ("dog", "N"), ("runs", "V")],
    &[("the", "D"), ("dog", "N"), ("sleeps", "V")],
    &[("a", "D"), ("cat", "N"), ("runs", "V")],
];

fn token_features(words: &[&str], i: usize) -> Vec<Feature> {
    let mut features = vec![Feature::new("Word", words[i])];
    if let Some(prev) = i.checked_sub(1).map(|j| words[j]) {
        features.push(Feature::window("Word", Orientation::Left, 1, prev));
    }
    features
}

fn sentence_features(words: &[&str]) -> Vec<Vec<Feature>> {
    (0..words.len()).map(|i| token_features(words, i)).collect()
}

/// Builds a model whose weights are co-occurrence counts of features and outcomes.
fn count_model(lines: &[TrainingLine]) -> LinearModel {
    let mut outcomes: Vec<String> = vec![];
    for line in lines {
        if !outcomes.contains(&line.outcome) {
            outcomes.push(line.outcome.clone());
        }
    }
    let mut weights: Vec<Vec<f64>> = vec![];
    for line in lines {
        let class = outcomes.iter().position(|o| o == &line.outcome).unwrap();
        for pair in &line.features {
            let index: usize = pair.name.parse().unwrap();
            if weights.len() <= index {
                weights.resize(index + 1, vec![0.0; outcomes.len()]);
            }
            weights[index][class] += pair.number;
        }
    }
    let bias = vec![0.0; outcomes.len()];
    LinearModel::new(outcomes, weights, bias).unwrap()
}

fn write_training_data(output_dir: &std::path::Path) -> String {
    let writer = EncodingDataWriter::new(
        NameNumberEncoder::new(true, true),
        TrainingDataWriter::new(vec![]),
    );
    let mut writer = ViterbiDataWriter::with_default_extractor(writer);
    for sentence in CORPUS {
        let words: Vec<&str> = sentence.iter().map(|(w, _)| *w).collect();
        let instances: Vec<Instance<String>> = sentence_features(&words)
            .into_iter()
            .zip(sentence.iter())
            .map(|(features, (_, tag))| Instance::new(features, tag.to_string()))
            .collect();
        let outcomes = writer.write_sequence(&instances).unwrap();
        assert_eq!(sentence.len(), outcomes.len());
    }
    let (_, data_writer) = writer.into_inner().finish(output_dir).unwrap();
    String::from_utf8(data_writer.into_inner().unwrap()).unwrap()
}

#[test]
fn test_train_persist_reload_decode() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_training_data(dir.path());
    assert!(dir.path().join(FEATURE_LOOKUP_FILE_NAME).exists());

    let lines: Vec<TrainingLine> = TrainingDataReader::new(data.as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(12, lines.len());
    assert_eq!("D", lines[0].outcome);
    // The first token of a sentence has one word feature and no history.
    assert_eq!(1, lines[0].features.len());

    let model_path = dir.path().join("model.bin");
    count_model(&lines)
        .write(BufWriter::new(File::create(&model_path).unwrap()))
        .unwrap();
    let model = LinearModel::read(BufReader::new(File::open(&model_path).unwrap())).unwrap();
    assert_eq!(&["D", "N", "V"], model.outcomes());

    let encoder = NameNumberEncoder::load(dir.path()).unwrap();
    assert!(!encoder.allow_new_features());
    let classifier = EncodingClassifier::new(encoder, LinearClassifier::new(model));
    let viterbi = ViterbiClassifier::with_default_extractor(classifier);

    for sentence in CORPUS {
        let words: Vec<&str> = sentence.iter().map(|(w, _)| *w).collect();
        let expected: Vec<&str> = sentence.iter().map(|(_, t)| *t).collect();
        let outcomes = viterbi.classify_sequence(&sentence_features(&words)).unwrap();
        assert_eq!(expected, outcomes);
    }

    // "bird" and "flies" are unseen; their outcomes come from the predicted history alone.
    let outcomes = viterbi
        .classify_sequence(&sentence_features(&["the", "bird", "flies"]))
        .unwrap();
    assert_eq!(vec!["D", "N", "V"], outcomes);
}

#[test]
fn test_lookup_file_is_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write_training_data(dir.path());

    let lookup = std::fs::read_to_string(dir.path().join(FEATURE_LOOKUP_FILE_NAME)).unwrap();
    let mut lines = lookup.lines();
    let count: usize = lines.next().unwrap().parse().unwrap();
    let names: Vec<&str> = lines.map(|l| l.split('\t').next().unwrap()).collect();

    assert_eq!(count, names.len());
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, names);
    assert!(names.contains(&"PreviousOutcome_L1_D"));
    assert!(names.contains(&"PreviousOutcomes_L1_2gram_L2R_N_D"));
    assert!(names.contains(&"Word_L1_the"));
}

#[cfg(feature = "train")]
#[test]
fn test_liblinear_round_trip() {
    use traghetto::{LiblinearTrainer, SolverType};

    let dir = tempfile::tempdir().unwrap();
    let writer =
        EncodingDataWriter::new(NameNumberEncoder::new(true, false), LiblinearTrainer::new());
    let mut writer = ViterbiDataWriter::with_default_extractor(writer);
    for _ in 0..5 {
        for sentence in CORPUS {
            let words: Vec<&str> = sentence.iter().map(|(w, _)| *w).collect();
            let instances: Vec<Instance<String>> = sentence_features(&words)
                .into_iter()
                .zip(sentence.iter())
                .map(|(features, (_, tag))| Instance::new(features, tag.to_string()))
                .collect();
            writer.write_sequence(&instances).unwrap();
        }
    }
    let (_, trainer) = writer.into_inner().finish(dir.path()).unwrap();
    let model = trainer
        .train(0.01, 1.0, SolverType::L2RegularizedL2LossSVCDual)
        .unwrap();

    let encoder = NameNumberEncoder::load(dir.path()).unwrap();
    let classifier = EncodingClassifier::new(encoder, LinearClassifier::new(model));
    let viterbi = ViterbiClassifier::with_default_extractor(classifier);
    for sentence in CORPUS {
        let words: Vec<&str> = sentence.iter().map(|(w, _)| *w).collect();
        let expected: Vec<&str> = sentence.iter().map(|(_, t)| *t).collect();
        assert_eq!(expected, viterbi.classify_sequence(&sentence_features(&words)).unwrap());
    }
}
