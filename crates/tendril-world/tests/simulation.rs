use tendril_core::{vec2, GroupId, SpeedProfile, Vec2, XorShift64};
use tendril_locomotion::{Gait, GaitStatus};
use tendril_viz::LedgerEvent;
use tendril_world::{InputEvent, InputFeed, Inputs, SimWorld, World, WorldBuilder, WorldConfig};

fn presets() -> [WorldConfig; 3] {
    [WorldConfig::spider(), WorldConfig::crawler(), WorldConfig::tentacles()]
}

fn build(config: WorldConfig, seed: u64) -> World {
    WorldBuilder::new().with_config(config).with_seed(seed).build().unwrap()
}

/// Pointer wandering across (and past) an 800x600 surface with occasional jumps.
fn pointer_path(seed: u64, ticks: usize) -> Vec<Vec2> {
    let mut rng = XorShift64::new(seed);
    let mut p = vec2(400.0, 300.0);
    (0..ticks)
        .map(|_| {
            if rng.next_f32() < 0.02 {
                p = vec2(rng.range_f32(-200.0, 1000.0), rng.range_f32(-200.0, 800.0));
            } else {
                p += vec2(rng.range_f32(-12.0, 12.0), rng.range_f32(-12.0, 12.0));
            }
            p
        })
        .collect()
}

#[test]
fn identical_seed_and_inputs_give_identical_hashes() {
    for config in presets() {
        let mut a = build(config.clone(), 42);
        let mut b = build(config, 42);
        for p in pointer_path(5, 600) {
            a.set_external_target(p.x, p.y);
            b.set_external_target(p.x, p.y);
            a.step();
            b.step();
            assert_eq!(a.step_hash(), b.step_hash(), "diverged at tick {}", a.tick_index());
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

#[test]
fn different_seeds_give_different_layouts() {
    let a = build(WorldConfig::tentacles(), 1);
    let b = build(WorldConfig::tentacles(), 2);
    assert_ne!(a.step_hash(), b.step_hash());
}

#[test]
fn joints_stay_finite_along_long_random_paths() {
    for config in presets() {
        let mut w = build(config, 9);
        for (i, p) in pointer_path(11, 3000).into_iter().enumerate() {
            w.set_external_target(p.x, p.y);
            if i == 1500 {
                w.reset_viewport(1280.0, 720.0).unwrap();
            }
            let s = w.step();
            assert!(s.max_residual.is_finite());
            for a in w.appendages() {
                assert!(a.chain().is_finite(), "appendage {} went non-finite at tick {i}", a.id().0);
            }
            assert!(w.body().pos.is_finite() && w.body().angle.is_finite());
        }
    }
}

#[test]
fn anchors_track_the_body_exactly() {
    for config in presets() {
        let mut w = build(config, 3);
        for p in pointer_path(4, 400) {
            w.set_external_target(p.x, p.y);
            w.step();
            for a in w.appendages() {
                assert_eq!(a.chain().anchor(), w.body().pos);
            }
        }
    }
}

#[test]
fn tips_sit_on_their_commanded_target() {
    for config in presets() {
        let mut w = build(config, 21);
        for p in pointer_path(8, 500) {
            w.set_external_target(p.x, p.y);
            w.step();
            let body = w.body().pos;
            for a in w.appendages() {
                let chain = a.chain();
                let expect = match a.gait() {
                    Gait::Step(g) if !g.is_stepping() => g.foot(),
                    Gait::Step(g) => chain.reachable(body, g.foot()),
                    Gait::Phased(g) => chain.reachable(body, g.tip()),
                    Gait::Reach(g) => g.tip(),
                };
                assert_eq!(chain.tip(), expect, "appendage {} status {:?}", a.id().0, a.status());
            }
        }
    }
}

#[test]
fn planted_feet_stay_under_their_tips_while_the_pointer_sweeps() {
    let mut w = build(WorldConfig::spider(), 12);
    let mut planted = 0u32;
    for tick in 0..600 {
        let x = if (tick / 100) % 2 == 0 { 780.0 } else { 20.0 };
        w.set_external_target(x, 300.0);
        w.step();
        for a in w.appendages() {
            let Gait::Step(g) = a.gait() else { unreachable!() };
            if g.is_stepping() { continue; }
            planted += 1;
            assert_eq!(a.chain().tip(), g.foot(), "leg {} at tick {tick}", a.id().0);
            assert!((g.foot() - w.body().pos).length() <= a.chain().total_length());
        }
    }
    assert!(planted > 0);
}

#[test]
fn resting_chains_settle_to_their_rest_length() {
    for config in [WorldConfig::spider(), WorldConfig::crawler()] {
        let mut w = build(config, 12);
        w.set_external_target(700.0, 300.0);
        for _ in 0..800 { w.step(); }
        for a in w.appendages() {
            let chain = a.chain();
            let tol = 0.01 * chain.rest_length();
            assert!(chain.residual() < tol, "appendage {} residual {} (rest {})", a.id().0, chain.residual(), chain.rest_length());
        }
    }
}

#[test]
fn reseed_with_same_dims_rebuilds_the_same_layout() {
    let mut w = build(WorldConfig::spider(), 77);
    let layout = |w: &World| -> Vec<(usize, f32)> {
        w.appendages().iter().map(|a| (a.joints().len(), a.chain().rest_length())).collect()
    };

    for p in pointer_path(1, 120) {
        w.set_external_target(p.x, p.y);
        w.step();
    }
    w.reset_viewport(1024.0, 768.0).unwrap();
    let first = layout(&w);
    for p in pointer_path(2, 120) {
        w.set_external_target(p.x, p.y);
        w.step();
    }
    w.reset_viewport(1024.0, 768.0).unwrap();

    assert_eq!(layout(&w), first);
    assert_eq!(w.generation(), 2);
    let c = vec2(512.0, 384.0);
    assert_eq!(w.body().pos, c);
    assert_eq!(w.body().vel, Vec2::ZERO);
    for a in w.appendages() {
        assert!(a.joints().iter().all(|j| *j == c));
        assert_eq!(a.status(), GaitStatus::Planted);
    }
}

#[test]
fn phased_limbs_share_one_phase() {
    let mut w = build(WorldConfig::crawler(), 5);
    for p in pointer_path(6, 300) {
        w.set_external_target(p.x, p.y);
        w.step();
        let phase = w.phase(GroupId(0)).unwrap();
        assert!((0.0..1.0).contains(&phase));
        for a in w.appendages() {
            match a.status() {
                GaitStatus::Phased { phase: p, .. } => assert_eq!(p, phase),
                other => panic!("unexpected status {other:?}"),
            }
        }
    }
}

#[test]
fn far_target_makes_legs_step_and_land() {
    let mut w = build(WorldConfig::spider(), 12);
    w.set_external_target(780.0, 300.0);
    let mut saw_stepping = false;
    for _ in 0..200 {
        let s = w.step();
        assert!(s.stepping <= s.appendages);
        saw_stepping |= s.stepping > 0;
    }
    assert!(saw_stepping);
    let began = w.ledger().iter().filter(|e| matches!(e, LedgerEvent::StepBegan { .. })).count();
    let landed = w.ledger().iter().filter(|e| matches!(e, LedgerEvent::StepLanded { .. })).count();
    assert!(began > 0 && landed > 0);
    assert!(landed <= began);
}

#[test]
fn feed_and_scripted_inputs_replay_identically() {
    let mut live = build(WorldConfig::tentacles(), 31);
    let mut replay = build(WorldConfig::tentacles(), 31);
    let feed = InputFeed::new();

    for (i, p) in pointer_path(13, 240).into_iter().enumerate() {
        let mut events = vec![InputEvent::SetTarget { x: p.x, y: p.y }];
        feed.set_target(p.x, p.y);
        if i == 100 {
            feed.resize(640.0, 480.0);
            events.push(InputEvent::Resize { width: 640.0, height: 480.0 });
        }
        if i == 180 {
            feed.set_profile(SpeedProfile::Slow);
            events.push(InputEvent::SetProfile { profile: SpeedProfile::Slow });
        }

        let s = live.step_from(&feed);
        replay.apply_inputs(&Inputs { tick_index: i as u64, events });
        let r = replay.step_once();

        assert_eq!(s.reseeded, r.reseeded);
        assert_eq!(live.step_hash(), r.hash, "diverged at tick {i}");
    }
    assert_eq!(live.generation(), 2);
    assert_eq!(live.profile(), SpeedProfile::Slow);
    assert_eq!(live.viewport().width, 640.0);
}

#[test]
fn resize_applies_before_the_pointer_of_the_same_frame() {
    let mut w = build(WorldConfig::tentacles(), 1);
    let feed = InputFeed::new();
    feed.resize(200.0, 100.0);
    feed.set_target(150.0, 50.0);
    let s = w.step_from(&feed);
    assert!(s.reseeded);
    assert_eq!(w.target(), vec2(150.0, 50.0));
    assert_eq!(w.viewport().height, 100.0);
}
