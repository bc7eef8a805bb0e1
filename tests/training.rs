//! End-to-end training, prediction and evaluation.

use approx::assert_abs_diff_eq;
use logistic_regression::datasets::make_blobs;
use logistic_regression::metrics::{evaluate, ConfusionMatrix};
use logistic_regression::optim::{binary_cross_entropy, BinaryCrossEntropy, GradientDescent};
use logistic_regression::{
    BinaryClassifier, FeatureMatrix, Initialization, LogisticError, OneVsAllClassifier,
    OptimizerState, ParameterVector, SoftmaxClassifier, TrainingConfig,
};
use rstest::rstest;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_blobs() -> (FeatureMatrix<f64>, Vec<usize>) {
    let centers = vec![vec![-3.0, -3.0], vec![3.0, 3.0]];
    make_blobs(100, &centers, 0.7, 6).unwrap()
}

#[test]
fn test_binary_separable_reaches_full_accuracy() {
    init_logger();
    let (x, y) = two_blobs();
    let config = TrainingConfig::default().with_learning_rate(0.5).with_max_iterations(500);
    let mut clf = BinaryClassifier::new(config);
    clf.fit(&x, &y).unwrap();

    let report = clf.training_report().unwrap();
    assert!(report.iterations <= 500);
    assert!(report.state.is_terminal());
    assert_eq!(clf.score(&x, &y).unwrap(), 1.0);
}

#[test]
fn test_converged_step_never_increases_loss() {
    init_logger();
    let (x, y) = two_blobs();
    let config = TrainingConfig::default()
        .with_learning_rate(0.3)
        .with_max_iterations(5000)
        .with_convergence_tolerance(1e-4);
    let mut clf = BinaryClassifier::new(config);
    clf.fit(&x, &y).unwrap();

    let report = clf.training_report().unwrap();
    assert_eq!(report.state, OptimizerState::Converged);
    let n = report.loss_history.len();
    assert!(report.loss_history[n - 1] <= report.loss_history[n - 2] + 1e-12);
    assert!(report.final_loss <= report.loss_history[n - 2] + 1e-12);
}

#[test]
fn test_loss_is_non_negative_and_gradient_has_bias() {
    let (x, y) = two_blobs();
    for params in [[0.0, 0.0, 0.0], [1.0, -2.0, 0.5], [-50.0, 50.0, 3.0]] {
        let (loss, grad) = binary_cross_entropy(&x, &y, &params, Some(0.1));
        assert!(loss >= 0.0);
        assert_eq!(grad.len(), x.n_features() + 1);
    }
}

#[test]
fn test_optimizer_can_be_driven_directly() {
    let (x, y) = two_blobs();
    let objective = BinaryCrossEntropy::new(&x, &y, None);
    let mut optimizer = GradientDescent::new(0.5, 200, 1e-8);
    let result = optimizer.minimize(&objective, vec![0.0; 3]);
    assert!(result.final_loss < result.loss_history[0]);
    assert_eq!(result.params.len(), 3);
}

#[test]
fn test_training_is_deterministic() {
    let (x, y) = two_blobs();
    let config = TrainingConfig::default()
        .with_learning_rate(0.2)
        .with_initialization(Initialization::Random { seed: 3, scale: 0.05 });

    let mut a = BinaryClassifier::new(config.clone());
    let mut b = BinaryClassifier::new(config);
    a.fit(&x, &y).unwrap();
    b.fit(&x, &y).unwrap();

    assert_eq!(a.params(), b.params());
    assert_eq!(a.predict_proba_batch(&x).unwrap(), b.predict_proba_batch(&x).unwrap());
}

#[test]
fn test_one_vs_all_matches_binary_for_two_classes() {
    init_logger();
    let (x, y) = two_blobs();
    let config = TrainingConfig::default().with_learning_rate(0.5);

    let mut binary = BinaryClassifier::new(config.clone());
    binary.fit(&x, &y).unwrap();
    let mut ova = OneVsAllClassifier::new(2, config).unwrap();
    ova.fit(&x, &y).unwrap();

    assert_eq!(ova.predict_batch(&x).unwrap(), binary.predict_batch(&x).unwrap());

    // The positive member sees exactly the binary problem.
    let member = &ova.estimators()[1];
    let member_params = member.params().unwrap().as_slice();
    let binary_params = binary.params().unwrap().as_slice();
    for (a, b) in member_params.iter().zip(binary_params) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_one_vs_all_predictions_stay_in_domain(#[case] parallel: bool) {
    init_logger();
    let centers = vec![vec![0.0, 6.0], vec![6.0, -3.0], vec![-6.0, -3.0], vec![0.0, 0.0]];
    let (x, y) = make_blobs::<f64>(120, &centers, 0.6, 11).unwrap();
    let config = TrainingConfig::default().with_learning_rate(0.1).with_parallel(parallel);
    let mut clf = OneVsAllClassifier::new(4, config).unwrap();
    clf.fit(&x, &y).unwrap();

    for row in x.rows() {
        assert!(clf.predict(row).unwrap() < 4);
    }
    for probe in [[100.0, 100.0], [-100.0, 0.0], [0.0, -100.0]] {
        assert!(clf.predict(&probe).unwrap() < 4);
    }
}

#[test]
fn test_multiclass_models_evaluate_through_shared_metrics() {
    let centers = vec![vec![0.0, 5.0], vec![5.0, -3.0], vec![-5.0, -3.0]];
    let (x, y) = make_blobs::<f64>(90, &centers, 0.5, 2).unwrap();
    let config = TrainingConfig::default().with_learning_rate(0.1).with_max_iterations(2000);

    let mut ova = OneVsAllClassifier::new(3, config.clone()).unwrap();
    ova.fit(&x, &y).unwrap();
    let mut softmax = SoftmaxClassifier::new(3, config).unwrap();
    softmax.fit(&x, &y).unwrap();

    let ova_report = evaluate(&y, &ova.predict_batch(&x).unwrap()).unwrap();
    let softmax_report = evaluate(&y, &softmax.predict_batch(&x).unwrap()).unwrap();
    assert_eq!(ova_report.accuracy, 1.0);
    assert_eq!(softmax_report.accuracy, 1.0);
    assert_eq!(ova_report.confusion_matrix.total(), 90);
    assert_eq!(softmax_report.per_class.len(), 3);
}

#[test]
fn test_restored_parameters_predict_identically() {
    let (x, y) = two_blobs();
    let mut clf = BinaryClassifier::new(TrainingConfig::default());
    clf.fit(&x, &y).unwrap();

    let saved = clf.params().unwrap().as_slice().to_vec();
    let params = ParameterVector::from_flat(saved).unwrap();
    let restored = BinaryClassifier::from_params(params, TrainingConfig::default());
    assert_eq!(restored.predict_batch(&x).unwrap(), clf.predict_batch(&x).unwrap());
}

#[cfg(feature = "serde")]
#[test]
fn test_parameters_serialize_as_json() {
    let (x, y) = two_blobs();
    let mut clf = BinaryClassifier::new(TrainingConfig::default());
    clf.fit(&x, &y).unwrap();

    let json = serde_json::to_string(clf.params().unwrap()).unwrap();
    let params: ParameterVector<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(&params, clf.params().unwrap());

    let report_json = serde_json::to_string(clf.training_report().unwrap()).unwrap();
    assert!(report_json.contains("\"state\""));
}

#[test]
fn test_reference_metrics() {
    let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 1, 1, 1]).unwrap();
    assert_eq!(cm.get(0, 0), 1);
    assert_eq!(cm.get(0, 1), 1);
    assert_eq!(cm.get(1, 1), 2);
    assert_abs_diff_eq!(cm.accuracy(), 0.75);
    assert_abs_diff_eq!(cm.precision(1), 2.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cm.recall(1), 1.0);
}

#[test]
fn test_errors_surface_to_caller() {
    let (x, mut y) = two_blobs();
    let mut clf = BinaryClassifier::new(TrainingConfig::default());
    assert_eq!(
        clf.fit(&x, &y[..10]).unwrap_err(),
        LogisticError::LengthMismatch { expected: 100, got: 10 }
    );

    y[0] = 7;
    let mut ova = OneVsAllClassifier::new(2, TrainingConfig::default()).unwrap();
    assert_eq!(ova.fit(&x, &y), Err(LogisticError::LabelDomain { label: 7, n_classes: 2 }));

    assert!(matches!(
        evaluate(&[0, 1], &[1]),
        Err(LogisticError::LengthMismatch { .. })
    ));
}
