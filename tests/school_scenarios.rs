//! End-to-end behavior of a school driven through the public API

use fish_school::consts::{NODE_DIST, RADII};
use fish_school::outline::body_outline;
use fish_school::platform::FrameClock;
use fish_school::sim::{Bounds, FishId, School, SteeringParams, TickInput, VectorExt, tick};
use fish_school::{FishColor, Settings};
use glam::Vec2;

fn links_hold(school: &School) -> bool {
    school.fishes().iter().all(|fish| {
        fish.chunks()
            .windows(2)
            .all(|pair| (pair[0].position.distance(pair[1].position) - NODE_DIST).abs() < 1e-3)
    })
}

#[test]
fn school_of_hundred_keeps_its_shape() {
    let bounds = Bounds::new(100.0, 56.25).unwrap();
    let mut school = School::populate(2024, SteeringParams::default(), 100, bounds);
    let input = TickInput {
        bounds,
        ..Default::default()
    };
    for _ in 0..600 {
        tick(&mut school, &input, 1000.0 / 60.0);
    }
    assert_eq!(school.time_ticks, 600);
    assert!(links_hold(&school));
    let ids: Vec<u32> = school.fishes().iter().map(|f| f.id().0).collect();
    assert_eq!(ids, (1..=100).collect::<Vec<_>>());
    for fish in school.fishes() {
        assert!(fish.position().is_finite());
        let radii: Vec<f32> = fish.chunks().iter().map(|c| c.radius()).collect();
        let expected: Vec<f32> = RADII.iter().map(|r| r * NODE_DIST).collect();
        assert_eq!(radii, expected);
    }
}

#[test]
fn click_scatters_nearby_fish() {
    let mut school = School::new(1, SteeringParams::default());
    let ring: Vec<FishId> = (0..8)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            let offset = Vec2::from_angle(angle) * 3.0;
            // Tangential headings so nobody starts out pointing away
            school
                .spawn(Vec2::splat(50.0) + offset, offset.ccw_normal(), FishColor::Slate)
                .unwrap()
        })
        .collect();
    let far = school
        .spawn(Vec2::new(5.0, 95.0), Vec2::X, FishColor::Sage)
        .unwrap();

    let threat = Vec2::splat(50.0);
    let before: Vec<f32> = ring
        .iter()
        .map(|&id| school.fish(id).unwrap().position().distance(threat))
        .collect();

    let input = TickInput {
        threats: vec![threat],
        ..Default::default()
    };
    tick(&mut school, &input, 16.0);
    for _ in 0..60 {
        tick(&mut school, &TickInput::default(), 16.0);
    }

    assert!(school.fish(far).unwrap().fleeing().is_none());
    for (&id, start) in ring.iter().zip(before) {
        let fish = school.fish(id).unwrap();
        assert!(fish.fleeing().is_some());
        assert!(fish.position().distance(threat) > start);
    }
    assert!(links_hold(&school));
}

#[test]
fn pointer_obstacle_is_avoided() {
    let mut school = School::new(3, SteeringParams::default());
    let id = school
        .spawn(Vec2::new(40.0, 50.0), Vec2::X, FishColor::Coral)
        .unwrap();
    // Pointer slightly off the fish's path
    let input = TickInput {
        obstacles: vec![Vec2::new(45.0, 50.5)],
        ..Default::default()
    };
    let mut closest = f32::MAX;
    for _ in 0..200 {
        tick(&mut school, &input, 16.0);
        closest = closest.min(school.fish(id).unwrap().position().distance(input.obstacles[0]));
    }
    assert!(closest > 1.0, "came within {}", closest);
}

#[test]
fn frame_clock_drives_ticks() {
    let mut school = School::populate(8, SteeringParams::default(), 5, Bounds::default());
    let mut clock = FrameClock::default();
    let input = TickInput::default();
    for frame in 0..10 {
        if let Some(delta) = clock.frame(frame as f64 * 16.0) {
            tick(&mut school, &input, delta);
        }
    }
    assert_eq!(school.time_ticks, 9);
    assert!((school.elapsed_ms - 144.0).abs() < 1e-6);
}

#[test]
fn settings_build_a_school() {
    let settings = Settings::from_json(r#"{ "population": 7, "seed": 5, "width": 80 }"#).unwrap();
    let bounds = settings.bounds().unwrap();
    let school = School::populate(
        settings.seed.unwrap(),
        settings.steering,
        settings.population,
        bounds,
    );
    assert_eq!(school.len(), 7);
    assert!(school.fishes().iter().all(|f| bounds.contains(f.position())));
}

#[test]
fn snapshot_roundtrip_continues_identically() {
    let mut school = School::populate(77, SteeringParams::default(), 12, Bounds::default());
    for _ in 0..30 {
        tick(&mut school, &TickInput::default(), 16.0);
    }
    let json = serde_json::to_string(&school).unwrap();
    let mut restored: School = serde_json::from_str(&json).unwrap();

    for _ in 0..30 {
        tick(&mut school, &TickInput::default(), 16.0);
        tick(&mut restored, &TickInput::default(), 16.0);
    }
    for (a, b) in school.fishes().iter().zip(restored.fishes()) {
        assert_eq!(a.position(), b.position());
    }
    // Spawning continues on the same id and RNG stream
    let bounds = Bounds::default();
    let a = school.spawn_random(bounds);
    let b = restored.spawn_random(bounds);
    assert_eq!(a, b);
    assert_eq!(
        school.fish(a).unwrap().position(),
        restored.fish(b).unwrap().position()
    );
}

#[test]
fn outline_follows_the_body() {
    let mut school = School::populate(4, SteeringParams::default(), 3, Bounds::default());
    for _ in 0..50 {
        tick(&mut school, &TickInput::default(), 16.0);
    }
    for fish in school.fishes() {
        let outline = body_outline(fish.chunks());
        assert_eq!(outline.len(), 2 * fish.chunks().len() + 2);
        let head = fish.chunks()[0];
        // Nose sits one head radius in front of the head
        assert!((outline[0].distance(head.position) - head.radius()).abs() < 1e-4);
    }
}
