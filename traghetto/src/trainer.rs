use std::collections::BTreeMap;
use std::str::FromStr;

use liblinear::LibLinearModel;

use crate::dictionary::Dictionary;
use crate::encoder::NameNumberPair;
use crate::errors::{Result, TraghettoError};
use crate::instance::DataWriter;
use crate::linear::LinearModel;

/// Solver type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverType {
    /// L2-regularized logistic regression (primal).
    L2RegularizedLogistic = 0,

    /// L2-regularized L2-loss support vector classification (dual).
    L2RegularizedL2LossSVCDual = 1,

    /// L2-regularized L2-loss support vector classification (primal).
    L2RegularizedL2LossSVC = 2,

    /// L2-regularized L1-loss support vector classification (dual)
    L2RegularizedL1LossSVCDual = 3,

    /// support vector classification by Crammer and Singer
    CrammerSingerSVC = 4,

    /// L1-regularized L2-loss support vector classification
    L1RegularizedL2LossSVC = 5,

    /// L1-regularized logistic regression
    L1RegularizedLogistic = 6,

    /// L2-regularized logistic regression (dual).
    L2RegularizedLogisticDual = 7,
}

impl FromStr for SolverType {
    type Err = &'static str;

    /// Accepts LIBLINEAR's numeric codes and their lower-case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "l2r_lr" => Ok(Self::L2RegularizedLogistic),
            "1" | "l2r_l2loss_svc_dual" => Ok(Self::L2RegularizedL2LossSVCDual),
            "2" | "l2r_l2loss_svc" => Ok(Self::L2RegularizedL2LossSVC),
            "3" | "l2r_l1loss_svc_dual" => Ok(Self::L2RegularizedL1LossSVCDual),
            "4" | "mcsvm_cs" => Ok(Self::CrammerSingerSVC),
            "5" | "l1r_l2loss_svc" => Ok(Self::L1RegularizedL2LossSVC),
            "6" | "l1r_lr" => Ok(Self::L1RegularizedLogistic),
            "7" | "l2r_lr_dual" => Ok(Self::L2RegularizedLogisticDual),
            _ => Err("Unsupported solver type."),
        }
    }
}

impl From<SolverType> for liblinear::SolverType {
    fn from(solver: SolverType) -> Self {
        match solver {
            SolverType::L2RegularizedLogistic => Self::L2R_LR,
            SolverType::L2RegularizedL2LossSVCDual => Self::L2R_L2LOSS_SVC_DUAL,
            SolverType::L2RegularizedL2LossSVC => Self::L2R_L2LOSS_SVC,
            SolverType::L2RegularizedL1LossSVCDual => Self::L2R_L1LOSS_SVC_DUAL,
            SolverType::CrammerSingerSVC => Self::MCSVM_CS,
            SolverType::L1RegularizedL2LossSVC => Self::L1R_L2LOSS_SVC,
            SolverType::L1RegularizedLogistic => Self::L1R_LR,
            SolverType::L2RegularizedLogisticDual => Self::L2R_LR_DUAL,
        }
    }
}

/// Data writer that collects encoded instances and trains a [`LinearModel`] with LIBLINEAR.
///
/// Feature names must be dictionary indices, i.e., the encoder runs in compress mode.
///
/// # Examples
///
/// ```
/// use traghetto::{DataWriter, LiblinearTrainer, NameNumberPair, SolverType};
///
/// let mut trainer = LiblinearTrainer::new();
/// for _ in 0..5 {
///     trainer.write_training_instance(vec![NameNumberPair::new("0", 1.0)], &"A").unwrap();
///     trainer.write_training_instance(vec![NameNumberPair::new("1", 1.0)], &"B").unwrap();
/// }
/// let model = trainer.train(0.01, 1.0, SolverType::L2RegularizedL2LossSVCDual).unwrap();
/// assert_eq!("B", model.predict(&[NameNumberPair::new("1", 1.0)]).unwrap());
/// ```
#[derive(Default)]
pub struct LiblinearTrainer {
    outcome_ids: Dictionary,
    n_features: usize,
    xs: Vec<Vec<(u32, f64)>>,
    ys: Vec<f64>,
}

impl LiblinearTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_instances(&self) -> usize {
        self.ys.len()
    }

    /// One more than the largest feature index seen so far.
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_outcomes(&self) -> usize {
        self.outcome_ids.len()
    }

    /// Trains a model.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - The tolerance of the termination criterion.
    /// * `cost` - The parameter C.
    /// * `solver` - Solver type.
    ///
    /// # Errors
    ///
    /// [`TraghettoError::InvalidModel`] will be returned if no instance has been written or
    /// LIBLINEAR fails.
    pub fn train(self, epsilon: f64, cost: f64, solver: SolverType) -> Result<LinearModel> {
        if self.ys.is_empty() {
            return Err(TraghettoError::invalid_model("no training instance"));
        }
        let n_classes = self.outcome_ids.len();
        let outcomes = self.outcome_ids.names().to_vec();
        eprintln!(
            "# of instances: {}, # of features: {}, # of outcomes: {n_classes}",
            self.ys.len(),
            self.n_features,
        );

        // LIBLINEAR cannot separate a single class.
        if n_classes == 1 {
            return LinearModel::new(outcomes, vec![vec![0.0]; self.n_features], vec![0.0]);
        }

        let mut builder = liblinear::Builder::new();
        let training_input = liblinear::util::TrainingInput::from_sparse_features(self.ys, self.xs)
            .map_err(|e| TraghettoError::invalid_model(format!("liblinear error: {e:?}")))?;
        builder.problem().input_data(training_input).bias(1.0);
        builder
            .parameters()
            .solver_type(solver.into())
            .stopping_criterion(epsilon)
            .constraints_violation_cost(cost);
        liblinear::toggle_liblinear_stdout_output(false);
        let model = builder.build_model();
        liblinear::toggle_liblinear_stdout_output(true);
        let model = model.map_err(|e| TraghettoError::invalid_model(e.to_string()))?;

        let mut label_indices = Vec::with_capacity(n_classes);
        for class in 0..n_classes {
            let class = i32::try_from(class)?;
            let label_idx = model
                .labels()
                .iter()
                .position(|&label| label == class)
                .ok_or_else(|| {
                    TraghettoError::invalid_model(format!("class {class} is missing in the model"))
                })?;
            label_indices.push(i32::try_from(label_idx)?);
        }

        let bias: Vec<f64> = label_indices
            .iter()
            .map(|&idx| model.label_bias(idx))
            .collect();
        let mut weights: Vec<Vec<f64>> = Vec::with_capacity(self.n_features);
        for fid in 0..self.n_features {
            let fid = i32::try_from(fid + 1)?;
            weights.push(
                label_indices
                    .iter()
                    .map(|&idx| model.feature_coefficient(fid, idx))
                    .collect(),
            );
        }
        LinearModel::new(outcomes, weights, bias)
    }
}

impl<O> DataWriter<O> for LiblinearTrainer
where
    O: ToString,
{
    fn write_training_instance(
        &mut self,
        features: Vec<NameNumberPair>,
        outcome: &O,
    ) -> Result<()> {
        // Duplicate indices are summed and LIBLINEAR expects them in ascending order.
        let mut feature_vec = BTreeMap::new();
        for pair in features {
            let index: u32 = pair.name.parse().map_err(|_| {
                TraghettoError::invalid_argument(
                    "features",
                    format!("{:?} is not a feature index", pair.name),
                )
            })?;
            let fid = index.checked_add(1).ok_or_else(|| {
                TraghettoError::invalid_argument("features", "feature index is too large")
            })?;
            *feature_vec.entry(fid).or_insert(0.0) += pair.number;
            self.n_features = self.n_features.max(usize::try_from(fid)?);
        }
        let class = self.outcome_ids.get_or_insert(&outcome.to_string())?;
        self.xs.push(feature_vec.into_iter().collect());
        self.ys.push(f64::from(class));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str) -> NameNumberPair {
        NameNumberPair::new(name, 1.0)
    }

    #[test]
    fn test_solver_type_from_str() {
        assert_eq!(Ok(SolverType::L2RegularizedLogistic), "0".parse::<SolverType>());
        assert_eq!(Ok(SolverType::CrammerSingerSVC), "mcsvm_cs".parse::<SolverType>());
        assert!("8".parse::<SolverType>().is_err());
    }

    #[test]
    fn test_write_sums_duplicates() {
        let mut trainer = LiblinearTrainer::new();
        trainer
            .write_training_instance(
                vec![
                    NameNumberPair::new("4", 1.0),
                    NameNumberPair::new("0", 2.0),
                    NameNumberPair::new("4", 0.5),
                ],
                &"N",
            )
            .unwrap();
        trainer.write_training_instance(vec![], &"V").unwrap();
        trainer.write_training_instance(vec![], &"N").unwrap();

        assert_eq!(vec![vec![(1, 2.0), (5, 1.5)], vec![], vec![]], trainer.xs);
        assert_eq!(vec![0.0, 1.0, 0.0], trainer.ys);
        assert_eq!(5, trainer.n_features());
        assert_eq!(2, trainer.n_outcomes());
        assert_eq!(3, trainer.n_instances());
    }

    #[test]
    fn test_write_non_index_name() {
        let mut trainer = LiblinearTrainer::new();
        let result = trainer.write_training_instance(vec![pair("Word_cat")], &"N");

        assert_eq!(
            "InvalidArgumentError: features: \"Word_cat\" is not a feature index",
            &result.err().unwrap().to_string()
        );
        assert_eq!(0, trainer.n_instances());
    }

    #[test]
    fn test_train_empty() {
        let result = LiblinearTrainer::new().train(0.01, 1.0, SolverType::L2RegularizedLogistic);

        assert!(result.is_err());
    }

    #[test]
    fn test_train_single_outcome() {
        let mut trainer = LiblinearTrainer::new();
        trainer.write_training_instance(vec![pair("0"), pair("2")], &"O").unwrap();
        let model = trainer
            .train(0.01, 1.0, SolverType::L2RegularizedLogistic)
            .unwrap();

        assert_eq!(&["O".to_string()], model.outcomes());
        assert_eq!(3, model.num_features());
        assert_eq!("O", model.predict(&[pair("1")]).unwrap());
    }

    #[test]
    fn test_train_multiclass() {
        let mut trainer = LiblinearTrainer::new();
        for _ in 0..10 {
            trainer.write_training_instance(vec![pair("0")], &"A").unwrap();
            trainer.write_training_instance(vec![pair("1")], &"B").unwrap();
            trainer.write_training_instance(vec![pair("2")], &"C").unwrap();
        }
        let model = trainer
            .train(0.01, 1.0, SolverType::L2RegularizedL2LossSVCDual)
            .unwrap();

        assert_eq!(&["A", "B", "C"], model.outcomes());
        assert_eq!("A", model.predict(&[pair("0")]).unwrap());
        assert_eq!("B", model.predict(&[pair("1")]).unwrap());
        assert_eq!("C", model.predict(&[pair("2")]).unwrap());
    }

    #[test]
    fn test_train_binary() {
        let mut trainer = LiblinearTrainer::new();
        for _ in 0..10 {
            trainer.write_training_instance(vec![pair("0")], &"B").unwrap();
            trainer.write_training_instance(vec![pair("1")], &"A").unwrap();
        }
        let model = trainer
            .train(0.01, 1.0, SolverType::L2RegularizedLogistic)
            .unwrap();

        assert_eq!("B", model.predict(&[pair("0")]).unwrap());
        assert_eq!("A", model.predict(&[pair("1")]).unwrap());
    }
}
