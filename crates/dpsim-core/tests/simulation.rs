use dpsim_core::{log_debug, log_info, Simulation};

#[test]
fn contexts_share_clock() {
    let mut sim = Simulation::new(0);
    let a = sim.create_context("a");
    let b = sim.create_context("b");

    a.schedule_wake(3.);
    b.schedule_wake(1.5);
    assert_eq!(sim.wake_count(), 2);
    assert_eq!(sim.next_wake(), Some(2));

    assert_eq!(sim.advance(), 2);
    assert_eq!(a.time(), 2);
    assert!(b.passed(1.5));
    assert!(!a.passed(3.));

    assert_eq!(sim.advance(), 1);
    assert_eq!(b.time(), 3);
    assert_eq!(b.elapsed_since(1.5), 1.5);
    assert_eq!(sim.context_names(), &["a".to_string(), "b".to_string()]);
}

#[test]
fn random_draws_are_reproducible() {
    let draw = |seed: u64| {
        let mut sim = Simulation::new(seed);
        let ctx = sim.create_context("rng");
        (0..16).map(|_| ctx.rand()).collect::<Vec<_>>()
    };
    assert_eq!(draw(42), draw(42));
    assert_ne!(draw(42), draw(43));
}

#[test]
fn degenerate_probabilities() {
    let mut sim = Simulation::new(7);
    let ctx = sim.create_context("rng");
    assert!((0..100).all(|_| !ctx.gen_bool(0.)));
    assert!((0..100).all(|_| ctx.gen_bool(1.)));
    let value: u32 = ctx.gen_range(5..6);
    assert_eq!(value, 5);
}

#[test]
fn logging_does_not_panic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut sim = Simulation::new(1);
    let ctx = sim.create_context("logger");
    log_info!(ctx, "plain message");
    log_debug!(ctx, "formatted {} {}", 1, "two");
    sim.advance();
}
