use asteroid_arena::consts::SIM_DT;
use asteroid_arena::settings::SpawnPolicy;
use asteroid_arena::sim::{Entity, Rgb};
use asteroid_arena::{Settings, TickInput, World, tick};
use glam::Vec2;

fn quiet_settings() -> Settings {
    let mut settings = Settings::default();
    settings.spawner.max_count = 0;
    settings
}

#[test]
fn shot_destroys_incoming_obstacle() {
    let mut settings = quiet_settings();
    settings.ship.reload_ticks = 0;
    let mut world = World::new(settings.clone());

    // Obstacle parked straight ahead of the ship's nose
    let obstacle = world.add(Entity::obstacle(
        Vec2::new(120.0, 0.0),
        0,
        0.0,
        &settings.obstacle,
    ));

    let projectile = world.fire().expect("no reload configured");
    let mut destroyed_at = None;
    for i in 0..60 {
        let summary = tick(&mut world, &TickInput::default(), SIM_DT);
        if summary.collisions.removed.contains(&obstacle) {
            destroyed_at = Some(i);
            break;
        }
    }

    assert!(destroyed_at.is_some(), "projectile never reached the obstacle");
    assert!(!world.contains(obstacle));
    // The projectile keeps flying after the hit
    assert!(world.contains(projectile));
}

#[test]
fn projectile_leaves_arena_and_is_culled() {
    let mut settings = quiet_settings();
    settings.ship.reload_ticks = 0;
    let mut world = World::new(settings);

    let projectile = world.fire().unwrap();
    // 150 u/s from x=20 reaches the 250 edge in a little over 1.5 s
    for _ in 0..60 {
        tick(&mut world, &TickInput::default(), SIM_DT);
    }

    assert!(!world.contains(projectile));
    assert_eq!(world.entity_count(), 1);
}

#[test]
fn spawned_obstacle_drifts_into_stationary_ship() {
    let mut settings = Settings::default();
    settings.arena.width = 100.0;
    settings.arena.height = 100.0;
    settings.spawner.countdown = 1;
    settings.spawner.policy = SpawnPolicy::Fixed {
        heading: 0,
        speed: 300.0,
    };
    let mut world = World::new(settings.clone());

    let mut obstacle = None;
    for _ in 0..30 {
        let summary = tick(&mut world, &TickInput::default(), SIM_DT);
        obstacle = obstacle.or(summary.spawned);
        if world.ship().unwrap().hit {
            break;
        }
    }

    let ship = world.ship().unwrap();
    assert!(ship.hit);
    assert_eq!(ship.color, settings.ship.hit_color);
    let obstacle = world.get(obstacle.unwrap()).expect("obstacles survive ship contact");
    assert!(obstacle.hit);
    assert_eq!(obstacle.color, Rgb::RED);
}

#[test]
fn spawner_cap_holds_over_long_runs() {
    let mut settings = Settings::default();
    settings.spawner.countdown = 5;
    settings.spawner.max_count = 3;
    settings.spawner.policy = SpawnPolicy::Scattered {
        seed: 9,
        heading_jitter: 10,
        min_speed: 0.0,
        max_speed: 0.0,
    };
    let mut world = World::new(settings);

    let mut spawned = Vec::new();
    for _ in 0..200 {
        if let Some(id) = tick(&mut world, &TickInput::default(), SIM_DT).spawned {
            spawned.push(id);
        }
    }

    assert_eq!(spawned.len(), 3);
    assert!(world.spawner().is_exhausted());
    assert_eq!(world.spawner().countdown(), 0);
}

#[test]
fn settings_file_drives_world() {
    let path = std::env::temp_dir().join(format!("arena-settings-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "arena": { "width": 300, "height": 200 }, "ship": { "reload_ticks": 2 } }"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let world = World::new(settings);
    assert!(world.is_in_bounds(Vec2::new(140.0, 90.0)));
    assert!(!world.is_in_bounds(Vec2::new(0.0, 100.0)));
    assert_eq!(world.ship().unwrap().reload_counter(), Some(2));
}
