//! Experiment files and whole-run determinism.
//!
//! Two experiments, same config, same seed.
//! They must produce identical reports.

use dicelab_core::{
    config::{ExperimentConfig, DEFAULT_ROLLS, DEFAULT_SEED},
    error::DiceError,
    experiment::{Experiment, TOP_OUTCOMES},
    types::FaceValue,
};

const LOADED_PAIR: &str = r#"{
    "seed": 7,
    "rolls": 500,
    "trials": 3,
    "dice": [
        { "label": "fair", "faces": [1, 2, 3, 4, 5, 6] },
        { "label": "loaded", "faces": [1, 2, 3, 4, 5, 6],
          "weights": [{ "face": 6, "weight": 5.0 }] }
    ]
}"#;

#[test]
fn config_defaults_fill_missing_fields() {
    let config = ExperimentConfig::from_json(r#"{ "dice": [{ "faces": ["H", "T"], "copies": 3 }] }"#)
        .unwrap();
    assert_eq!(config.seed, DEFAULT_SEED);
    assert_eq!(config.rolls, DEFAULT_ROLLS);
    assert_eq!(config.trials, 1);
    assert_eq!(config.dice_count(), 3);
    assert_eq!(config.dice[0].faces, vec![FaceValue::from("H"), FaceValue::from("T")]);
}

#[test]
fn config_builds_weighted_dice_in_order() {
    let config = ExperimentConfig::from_json(LOADED_PAIR).unwrap();
    let dice = config.build_dice().unwrap();
    assert_eq!(dice.len(), 2);

    let six = FaceValue::Int(6);
    assert_eq!(dice[0].borrow().weight(&six), Some(1.0));
    assert_eq!(dice[1].borrow().weight(&six), Some(5.0));
    assert_eq!(dice[1].borrow().weight(&FaceValue::Int(1)), Some(1.0));
}

#[test]
fn copies_are_independent_dice() {
    let config = ExperimentConfig::fair(3, 6, 1, 10);
    let dice = config.build_dice().unwrap();
    assert_eq!(dice.len(), 3);

    dice[0].borrow_mut().set_weight(&FaceValue::Int(1), 9.0).unwrap();
    assert_eq!(dice[1].borrow().weight(&FaceValue::Int(1)), Some(1.0));
}

#[test]
fn invalid_configs_are_rejected() {
    let zero_rolls = ExperimentConfig::from_json(r#"{ "rolls": 0, "dice": [{ "faces": [1] }] }"#);
    assert!(matches!(zero_rolls, Err(DiceError::InvalidArgument { .. })));

    let no_dice = ExperimentConfig::from_json(r#"{ "dice": [] }"#);
    assert!(matches!(no_dice, Err(DiceError::InvalidArgument { .. })));

    let not_json = ExperimentConfig::from_json("dice: 2");
    assert!(matches!(not_json, Err(DiceError::Serialization(_))));

    let bad_face = ExperimentConfig::from_json(
        r#"{ "dice": [{ "faces": [1, 2], "weights": [{ "face": 3, "weight": 1.0 }] }] }"#,
    )
    .unwrap();
    assert!(matches!(bad_face.build_dice(), Err(DiceError::UnknownFace { .. })));
}

#[test]
fn overflowing_roll_totals_are_rejected() {
    let mut config = ExperimentConfig::fair(2, 6, 1, usize::MAX);
    config.trials = 2;
    let err = config.validate().unwrap_err();
    assert!(matches!(err, DiceError::InvalidArgument { .. }), "got {err:?}");
    assert!(Experiment::new(config).is_err());
}

#[test]
fn labels_follow_the_dice_columns() {
    let config = ExperimentConfig::from_json(
        r#"{ "dice": [{ "faces": [1, 2], "copies": 2 }, { "label": "loaded", "faces": [1, 2] }] }"#,
    )
    .unwrap();
    assert_eq!(config.die_labels(), vec!["die 0", "die 1", "loaded"]);

    let report = Experiment::new(ExperimentConfig::from_json(LOADED_PAIR).unwrap())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.dice_labels, vec!["fair", "loaded"]);
}

#[test]
fn load_reads_an_experiment_file() {
    let path = std::env::temp_dir().join(format!("dicelab-load-{}.json", std::process::id()));
    std::fs::write(&path, LOADED_PAIR).unwrap();

    let config = ExperimentConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.trials, 3);
    std::fs::remove_file(&path).ok();

    assert!(ExperimentConfig::load("/definitely/not/here.json").is_err());
}

#[test]
fn same_config_produces_identical_reports() {
    let config = ExperimentConfig::from_json(LOADED_PAIR).unwrap();
    let report_a = Experiment::new(config.clone()).unwrap().run().unwrap();
    let report_b = Experiment::new(config).unwrap().run().unwrap();

    assert_eq!(report_a, report_b);
    assert_eq!(
        serde_json::to_string(&report_a).unwrap(),
        serde_json::to_string(&report_b).unwrap()
    );
}

#[test]
fn different_seeds_produce_different_tables() {
    let mut a = Experiment::new(ExperimentConfig::fair(2, 6, 42, 200)).unwrap();
    let mut b = Experiment::new(ExperimentConfig::fair(2, 6, 99, 200)).unwrap();
    a.run().unwrap();
    b.run().unwrap();
    assert_ne!(a.last_table().unwrap(), b.last_table().unwrap(),
        "Different seeds produced identical tables: seed is not being used");
}

#[test]
fn report_totals_add_up() {
    let config = ExperimentConfig::from_json(LOADED_PAIR).unwrap();
    let report = Experiment::new(config).unwrap().run().unwrap();

    assert_eq!(report.trials.len(), 3);
    assert_eq!(report.dice, 2);
    let jackpots: usize = report.trials.iter().map(|t| t.jackpots).sum();
    assert_eq!(report.total_jackpots, jackpots);
    assert!((report.jackpot_rate - jackpots as f64 / 1500.0).abs() < 1e-12);

    for t in &report.trials {
        assert!(t.distinct_combinations <= t.distinct_permutations);
    }
    assert!(report.top_combinations.len() <= TOP_OUTCOMES);
    assert!(report.top_combinations.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(report.top_permutations.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn weight_changes_between_runs_apply() {
    let mut experiment = Experiment::new(ExperimentConfig::fair(3, 6, 5, 100)).unwrap();
    for die in experiment.dice() {
        let mut die = die.borrow_mut();
        for face in 2..=6 {
            die.set_weight(&FaceValue::Int(face), 0.0).unwrap();
        }
    }

    let report = experiment.run().unwrap();
    assert_eq!(report.total_jackpots, 100);
    assert_eq!(report.jackpot_rate, 1.0);
    assert_eq!(report.top_combinations.len(), 1);
    assert_eq!(report.top_combinations[0].outcome, vec![FaceValue::Int(1); 3]);
}

#[test]
fn default_test_config_runs() {
    let report = Experiment::new(ExperimentConfig::default_test()).unwrap().run().unwrap();
    assert_eq!(report.rolls, 100);
    assert_eq!(report.seed, DEFAULT_SEED);
}
