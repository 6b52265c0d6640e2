#![cfg(feature = "tensorboard")]

use ndarray::{ArrayD, IxDyn};
use trainlog::event::proto::summary_value::Value;
use trainlog::event::{find_event_files, read_events};
use trainlog::prelude::*;

fn only_event_file(logger: &dyn Logger) -> std::path::PathBuf {
    let files = find_event_files(logger.log_dir()).unwrap();
    assert_eq!(files.len(), 1);
    files.into_iter().next().unwrap()
}

#[test]
fn test_training_run_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let exp = dir.path().join("run1");
    let mut logger = TensorboardLogger::new(exp.to_str().unwrap()).unwrap();

    assert_eq!(logger.log_dir(), exp.as_path());
    assert!(logger.render().contains("run1"));

    for step in 0..5u64 {
        let loss = 1.0 / (step as f64 + 1.0);
        logger.log_scalar("train/loss", loss, Some(step)).unwrap();
    }
    logger
        .log_hparams(&Hparams::new().with("lr", 0.1).with("batch", 32))
        .unwrap();
    logger.flush().unwrap();

    let events = read_events(only_event_file(&logger)).unwrap();
    // file version + 5 scalars + hparams
    assert_eq!(events.len(), 7);

    let last_loss = events[5].as_summary().unwrap();
    assert_eq!(last_loss.value[0].tag, "train/loss");
    assert_eq!(events[5].step, 4);
    assert!(matches!(last_loss.value[0].value, Some(Value::SimpleValue(v)) if v == 0.2));

    let hparams = &events[6].as_summary().unwrap().value[0];
    assert_eq!(hparams.tag, "hparams");
    match &hparams.value {
        Some(Value::Tensor(t)) => {
            assert_eq!(t.string_val[0], b"batch: 32\n\tlr: 0.1".to_vec())
        }
        _ => panic!("expected a text tensor"),
    }
}

#[cfg(feature = "video")]
#[test]
fn test_video_logging_with_default_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggerConfig::new("videos")
        .with_log_root(dir.path())
        .with_default_fps(2);
    let mut logger = config.build().unwrap();

    let video = ArrayD::from_elem(IxDyn(&[4, 3, 1, 6, 6]), 0.75f32);
    logger
        .log_video("eval/rollout", &video, Some(3), &VideoOptions::new())
        .unwrap();

    let events = read_events(only_event_file(logger.as_ref())).unwrap();
    match &events[1].as_summary().unwrap().value[0].value {
        Some(Value::Image(image)) => {
            assert_eq!((image.width, image.height), (12, 12));
            assert!(image.encoded_image_string.starts_with(b"GIF89a"));
        }
        _ => panic!("expected an image summary"),
    }
}

#[test]
fn test_video_failure_does_not_block_scalars() {
    let dir = tempfile::tempdir().unwrap();
    let exp = dir.path().join("no_video");
    let mut logger = TensorboardLogger::with_video_probe(
        exp.to_str().unwrap(),
        EventFileBackend::new(),
        Box::new(|| false),
    )
    .unwrap();

    let video = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 1, 2, 2]));
    let err = logger
        .log_video("rollout", &video, None, &VideoOptions::new())
        .unwrap_err();
    assert!(err.is_missing_dependency());

    logger.log_scalar("loss", 0.5, Some(10)).unwrap();

    let events = read_events(only_event_file(&logger)).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].step, 10);
}

#[test]
fn test_get_logger_by_kind() {
    let dir = tempfile::tempdir().unwrap();
    let exp = dir.path().join(generate_exp_name("ppo", "cartpole"));
    let kind: LoggerKind = "tensorboard".parse().unwrap();

    let mut logger = get_logger(kind, exp.to_str().unwrap()).unwrap();
    logger.log_scalar("reward", 200.0, None).unwrap();

    assert_eq!(logger.log_dir(), exp.as_path());
    assert_eq!(logger.to_string(), logger.render());
}
