//! Property tests for the session invariants

use drop_dash::consts::SIM_DT_MS;
use drop_dash::sim::{
    CollectibleKind, EntityKind, FrameDriver, GameEvent, GamePhase, GameState, ObstacleKind,
    Outcome, Rect, Scoring, TickInput, tick,
};
use drop_dash::Tuning;
use glam::Vec2;
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..300.0, 1.0f32..300.0)
        .prop_map(|(x, y, w, h)| Rect::from_corner(x, y, Vec2::new(w, h)))
}

fn obstacle_strategy() -> impl Strategy<Value = ObstacleKind> {
    prop_oneof![
        Just(ObstacleKind::Bush),
        Just(ObstacleKind::Pipe),
        Just(ObstacleKind::Seagull),
    ]
}

fn collectible_strategy() -> impl Strategy<Value = CollectibleKind> {
    prop_oneof![Just(CollectibleKind::Droplet), Just(CollectibleKind::Barrel)]
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn penalties_clamp_at_zero(
        start in 0u32..20,
        hits in prop::collection::vec(obstacle_strategy(), 0..30),
    ) {
        let mut scoring = Scoring::new(3.0);
        scoring.score = start;
        let mut expected = i64::from(start);
        for kind in hits {
            let delta = scoring.apply_penalty(kind.penalty());
            prop_assert!(delta <= 0);
            expected = (expected - i64::from(kind.penalty())).max(0);
            prop_assert_eq!(i64::from(scoring.score), expected);
        }
    }

    #[test]
    fn one_ramp_per_threshold(
        pickups in prop::collection::vec(collectible_strategy(), 0..60),
    ) {
        let tuning = Tuning::default();
        let mut scoring = Scoring::new(tuning.base_speed);
        let mut ramps = 0;
        for kind in pickups {
            ramps += scoring.add_points(kind.points(), &tuning);
        }
        let thresholds = scoring.score / tuning.ramp_every;
        prop_assert_eq!(ramps, thresholds);
        prop_assert_eq!(scoring.last_ramp_score, thresholds * tuning.ramp_every);
        let speed = tuning.base_speed + tuning.speed_increment * thresholds as f32;
        prop_assert!((scoring.speed - speed).abs() < 1e-3);
    }

    #[test]
    fn win_happens_exactly_once(
        pickups in prop::collection::vec(collectible_strategy(), 50..70),
    ) {
        let mut state = GameState::new(11, Tuning::default());
        state.start();
        let mut wins = 0;
        for kind in pickups {
            let bottom = if kind == CollectibleKind::Barrel { 80.0 } else { 100.0 };
            state.place_entity(EntityKind::Collectible(kind), 150.0, bottom);
            tick(&mut state, &TickInput::default());
            wins += state
                .drain_events()
                .iter()
                .filter(|e| matches!(
                    e,
                    GameEvent::PhaseChanged { to: GamePhase::Ended(Outcome::Won), .. }
                ))
                .count();
        }
        prop_assert_eq!(wins, 1);
        prop_assert_eq!(state.outcome(), Some(Outcome::Won));
        prop_assert!(state.score() >= 50);
    }

    #[test]
    fn pause_and_end_freeze_the_field(
        seed in any::<u64>(),
        warmup in 1usize..240,
        frozen in 1usize..120,
        end in any::<bool>(),
    ) {
        let mut state = GameState::new(seed, Tuning::default());
        let mut driver = FrameDriver::new();
        let mut input = TickInput { autopilot: true, ..Default::default() };
        state.start();
        for _ in 0..warmup {
            driver.advance(&mut state, &mut input, SIM_DT_MS);
        }
        prop_assume!(state.is_running());

        if end {
            state.end_game(Outcome::Lost);
        } else {
            state.pause();
        }
        let entities = state.entities.clone();
        let player = state.player;
        let score = state.score();
        let ticks = state.time_ticks;

        for _ in 0..frozen {
            let frame = driver.advance(&mut state, &mut input, SIM_DT_MS);
            prop_assert_eq!(frame.ticks, 0);
            prop_assert_eq!(frame.keep_running, !end);
        }
        prop_assert_eq!(&state.entities, &entities);
        prop_assert_eq!(state.player, player);
        prop_assert_eq!(state.score(), score);
        prop_assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), frames in 1usize..400) {
        let mut input = TickInput { autopilot: true, ..Default::default() };
        let mut a = GameState::new(seed, Tuning::default());
        let mut b = GameState::new(seed, Tuning::default());
        let mut driver_a = FrameDriver::new();
        let mut driver_b = FrameDriver::new();
        a.start();
        b.start();
        for _ in 0..frames {
            driver_a.advance(&mut a, &mut input, SIM_DT_MS);
            driver_b.advance(&mut b, &mut input, SIM_DT_MS);
        }
        prop_assert_eq!(&a.entities, &b.entities);
        prop_assert_eq!(a.score(), b.score());
        prop_assert_eq!(a.phase, b.phase);
    }
}
