//! Unit tests for ms-core primitives.

#[cfg(test)]
mod time {
    use crate::{MatchClock, MatchPhase, MatchTiming, SimTime};

    #[test]
    fn secs_round_up_to_next_ms() {
        assert_eq!(SimTime::ms_from_secs(1.0), 1_000);
        assert_eq!(SimTime::ms_from_secs(0.0001), 1);
        assert_eq!(SimTime::ms_from_secs(2.5004), 2_501);
    }

    #[test]
    fn negative_and_nan_secs_are_zero() {
        assert_eq!(SimTime::ms_from_secs(-3.0), 0);
        assert_eq!(SimTime::ms_from_secs(f64::NAN), 0);
    }

    #[test]
    fn since_saturates() {
        assert_eq!(SimTime(100).since(SimTime(400)), 0);
        assert_eq!(SimTime(400) - SimTime(100), 300);
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(12_345).to_string(), "12.345s");
    }

    #[test]
    fn default_match_ends_at_150s() {
        let t = MatchTiming::default();
        assert_eq!(t.end(), SimTime(150_000));
        assert_eq!(t.endgame_start(), SimTime(120_000));
    }

    #[test]
    fn phases() {
        let t = MatchTiming::default();
        assert_eq!(t.phase_at(SimTime(0)), MatchPhase::Auto);
        assert_eq!(t.phase_at(SimTime(15_000)), MatchPhase::Teleop);
        assert_eq!(t.phase_at(SimTime(119_999)), MatchPhase::Teleop);
        assert_eq!(t.phase_at(SimTime(120_000)), MatchPhase::Endgame);
        assert_eq!(t.phase_at(SimTime(150_000)), MatchPhase::Over);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut c = MatchClock::new(MatchTiming::default());
        c.advance(500);
        assert_eq!(c.advance_to(SimTime(200)), SimTime(500));
        assert_eq!(c.advance_to(SimTime(900)), SimTime(900));
    }

    #[test]
    fn clock_over_and_reset() {
        let mut c = MatchClock::new(MatchTiming { auto_secs: 1, teleop_secs: 1, endgame_secs: 0 });
        c.advance(1_999);
        assert!(!c.is_over());
        assert_eq!(c.remaining_ms(), 1);
        c.advance(1);
        assert!(c.is_over());
        assert_eq!(c.remaining_ms(), 0);
        c.reset();
        assert_eq!(c.now(), SimTime::ZERO);
    }
}

#[cfg(test)]
mod pose {
    use std::f64::consts::PI;

    use crate::{normalize_angle, Point, Pose};

    #[test]
    fn distance() {
        assert!((Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-9);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-9);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-9);
    }

    #[test]
    fn turn_takes_short_way() {
        let a = Pose::new(0.0, 0.0, 0.9 * PI);
        let b = Pose::new(0.0, 0.0, -0.9 * PI);
        assert!((a.turn_to(b) - 0.2 * PI).abs() < 1e-9);
    }
}

#[cfg(test)]
mod team {
    use crate::Alliance;

    #[test]
    fn parse_and_display() {
        assert_eq!("Red".parse::<Alliance>().unwrap(), Alliance::Red);
        assert_eq!(" blue ".parse::<Alliance>().unwrap(), Alliance::Blue);
        assert!("green".parse::<Alliance>().is_err());
        assert_eq!(Alliance::Blue.to_string(), "blue");
    }

    #[test]
    fn unknown_alliance_is_a_parse_error() {
        let err = "purple".parse::<Alliance>().unwrap_err();
        assert!(matches!(err, crate::CoreError::Parse(ref msg) if msg.contains("purple")));
    }

    #[test]
    fn opponent_and_score_key() {
        assert_eq!(Alliance::Red.opponent(), Alliance::Blue);
        assert_eq!(Alliance::Blue.score_key(), "blue_score");
    }
}

#[cfg(test)]
mod rng {
    use crate::AgentRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(7, 3);
        let mut b = AgentRng::new(7, 3);
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn different_index_different_stream() {
        let mut a = AgentRng::new(7, 0);
        let mut b = AgentRng::new(7, 1);
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut r = AgentRng::new(1, 0);
        let empty: [u8; 0] = [];
        assert!(r.choose(&empty).is_none());
    }
}
