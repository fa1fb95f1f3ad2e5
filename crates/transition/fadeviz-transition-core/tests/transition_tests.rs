use approx::assert_abs_diff_eq;
use fadeviz_transition_core::{AnimatedSlider, SliderTransition, TransitionConfig};

#[test]
fn frame_sized_steps_are_monotonic_and_exact_at_the_end() {
    let mut tr = SliderTransition::toward_nearest_end(0.75, 1.0);
    let mut last = 0.75;
    let mut frames = 0;
    loop {
        let step = tr.step(1.0 / 60.0);
        frames += 1;
        assert!(step.value <= last);
        last = step.value;
        if step.finished {
            break;
        }
        assert!(frames < 120, "transition never finished");
    }
    assert_eq!(last, 0.0);
    assert!((59..=61).contains(&frames));
}

#[test]
fn restart_begins_from_current_value() {
    let cfg = TransitionConfig { seconds: 1.0 };
    let mut s = AnimatedSlider::new(0.4);
    s.start(&cfg);
    s.tick(0.5);
    assert_abs_diff_eq!(s.value(), 0.7, epsilon = 1e-6);
    // 0.7 is past the midpoint, so a restart heads back down
    s.start(&cfg);
    s.tick(0.5);
    assert_abs_diff_eq!(s.value(), 0.35, epsilon = 1e-6);
}

#[test]
fn negative_dt_does_not_rewind() {
    let mut tr = SliderTransition::new(0.0, 1.0, 1.0);
    tr.step(0.5);
    let step = tr.step(-10.0);
    assert_abs_diff_eq!(step.value, 0.5);
    assert!(!step.finished);
}

#[test]
fn config_defaults_to_one_second() {
    let cfg: TransitionConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, TransitionConfig::default());
    assert_eq!(cfg.seconds, 1.0);
}
