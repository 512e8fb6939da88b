//! End-to-end transition behavior through the public API.

use nebula::prelude::*;
use nebula::transition::TransitionState;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn target_snapshot(scheduler: &TransitionScheduler) -> Snapshot {
    match scheduler.state() {
        TransitionState::Active(active) => active.to().clone(),
        TransitionState::Idle => panic!("expected an active transition"),
    }
}

fn run_to_completion(scheduler: &mut TransitionScheduler, field: &mut ParticleField) -> u32 {
    let mut ticks = 0;
    while scheduler.is_active() {
        scheduler.tick(field);
        ticks += 1;
        assert!(ticks < 10_000, "transition never completed");
    }
    ticks
}

#[test]
fn test_full_size_sphere_to_spiral() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut field = ParticleField::new(25_000, Pattern::Sphere, &mut rng);
    let mut scheduler = TransitionScheduler::new(0.015).unwrap();

    let target = scheduler.begin(&mut field, &mut rng);
    assert_eq!(target, Pattern::Spiral);

    let TransitionState::Active(active) = scheduler.state() else {
        panic!("expected an active transition");
    };
    assert_eq!(active.from().position_floats().len(), 75_000);
    assert_eq!(active.to().position_floats().len(), 75_000);

    assert_eq!(run_to_completion(&mut scheduler, &mut field), 67);
    assert_eq!(field.pattern(), Pattern::Spiral);
}

#[test]
fn test_progress_never_decreases() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut field = ParticleField::new(200, Pattern::Helix, &mut rng);
    let mut scheduler = TransitionScheduler::new(0.015).unwrap();
    scheduler.begin(&mut field, &mut rng);

    let mut last = 0.0;
    loop {
        match scheduler.tick(&mut field) {
            TickOutcome::Blending { progress } => {
                assert!(progress >= last);
                last = progress;
            }
            TickOutcome::Completed { progress, .. } => {
                assert_eq!(progress, 1.0);
                break;
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}

#[test]
fn test_five_transitions_return_to_start() {
    let mut scene = Scene::new(&Config::new().with_particle_count(300).with_star_count(0).with_seed(3)).unwrap();
    let start = scene.pattern();
    let expected = [
        Pattern::Spiral,
        Pattern::Helix,
        Pattern::Grid,
        Pattern::Torus,
        Pattern::Sphere,
    ];

    for pattern in expected {
        assert_eq!(scene.trigger().pattern, pattern);
        while scene.scheduler().is_active() {
            scene.tick(1.0 / 60.0);
        }
        assert_eq!(scene.pattern(), pattern);
    }
    assert_eq!(scene.pattern(), start);
}

#[test]
fn test_progress_zero_matches_from_and_commit_matches_to() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut field = ParticleField::new(500, Pattern::Sphere, &mut rng);
    let before = field.snapshot();

    let mut scheduler = TransitionScheduler::new(0.015).unwrap();
    scheduler.begin(&mut field, &mut rng);
    assert_eq!(field.snapshot(), before);

    let to = target_snapshot(&scheduler);
    run_to_completion(&mut scheduler, &mut field);
    assert_eq!(field.snapshot(), to);
}

#[test]
fn test_retrigger_mid_transition_skips_ahead() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = ParticleField::new(400, Pattern::Sphere, &mut rng);
    let mut scheduler = TransitionScheduler::new(0.015).unwrap();

    scheduler.begin(&mut field, &mut rng);
    let spiral = target_snapshot(&scheduler);
    while scheduler.progress() < 0.4 {
        scheduler.tick(&mut field);
    }

    let target = scheduler.begin(&mut field, &mut rng);
    assert_eq!(target, Pattern::Helix);
    assert_eq!(field.pattern(), Pattern::Spiral);
    assert_eq!(field.snapshot(), spiral);
    assert_eq!(scheduler.progress(), 0.0);

    let helix = target_snapshot(&scheduler);
    run_to_completion(&mut scheduler, &mut field);
    assert_eq!(field.pattern(), Pattern::Helix);
    assert_eq!(field.snapshot(), helix);
}

#[test]
fn test_force_complete_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut field = ParticleField::new(100, Pattern::Grid, &mut rng);
    let mut scheduler = TransitionScheduler::new(0.015).unwrap();

    scheduler.begin(&mut field, &mut rng);
    for _ in 0..10 {
        scheduler.tick(&mut field);
    }

    assert_eq!(scheduler.force_complete(&mut field), Some(Pattern::Torus));
    let settled = field.snapshot();
    field.take_upload_flags();

    assert_eq!(scheduler.force_complete(&mut field), None);
    assert_eq!(field.snapshot(), settled);
    assert!(!field.upload_flags().any());
}

#[test]
fn test_idle_ticks_leave_field_alone() {
    let mut scene = Scene::new(&Config::new().with_particle_count(64).with_star_count(8).with_seed(7)).unwrap();
    let before = scene.field().snapshot();
    for _ in 0..30 {
        assert_eq!(scene.tick(1.0 / 60.0).transition, TickOutcome::Idle);
    }
    assert_eq!(scene.field().snapshot(), before);
}
