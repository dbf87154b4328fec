//! Unit tests for ms-interact.

use ms_core::{Alliance, Pose, SimTime};
use ms_state::{apply_journal, CellPath, RobotState, StateSpace, Value, ValueChange, INTERACTABLES, ROBOTS};

use crate::stations::{pickup_station, scoring_goal, PICKUP, SCORE, STOCK};
use crate::{
    ActionCatalog, ActionKey, EffectScope, EntityRef, FnInteraction, InteractError,
    Interactable, Interaction, InteractionRegistry,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn world(registry: &InteractionRegistry, held: i64) -> StateSpace {
    let mut s = StateSpace::new();
    for key in ["score", "red_score", "blue_score"] {
        s.define(key, 0i64).unwrap();
    }
    s.create_sub_space(ROBOTS).unwrap();
    s.create_sub_space(INTERACTABLES).unwrap();
    let r = RobotState::new("r1", Alliance::Red, Pose::default()).with_gamepiece("note", held);
    s.register(ROBOTS, "r1", r.to_space()).unwrap();
    for obj in registry.iter() {
        s.register(INTERACTABLES, obj.name.clone(), obj.initial_state.clone()).unwrap();
    }
    s
}

fn scope<'a>(s: &'a StateSpace, target: &'a str) -> EffectScope<'a> {
    EffectScope {
        actor:  EntityRef { sub_space: ROBOTS, name: "r1", state: s.get(ROBOTS, "r1").unwrap() },
        target: EntityRef {
            sub_space: INTERACTABLES,
            name:      target,
            state:     s.get(INTERACTABLES, target).unwrap(),
        },
        global: s,
        now:    SimTime::ZERO,
    }
}

fn stations() -> InteractionRegistry {
    let mut reg = InteractionRegistry::new();
    reg.register(pickup_station("source", Pose::new(1.0, 1.0, 0.0), "note", 1).unwrap()).unwrap();
    reg.register(scoring_goal("speaker", Pose::new(9.0, 4.0, 0.0), "note", 2).unwrap()).unwrap();
    reg
}

fn run(reg: &InteractionRegistry, s: &mut StateSpace, target: &str, action: &str) -> Result<usize, InteractError> {
    let (_, interaction) = reg.resolve(target, action)?;
    let journal = interaction.effect(&scope(s, target))?;
    Ok(apply_journal(s, &journal)?)
}

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn duplicate_interactable_rejected() {
        let mut reg = stations();
        let dup = pickup_station("source", Pose::default(), "note", 3).unwrap();
        assert!(matches!(reg.register(dup), Err(InteractError::Duplicate { .. })));
    }

    #[test]
    fn duplicate_interaction_rejected() {
        let noop = || FnInteraction::new("noop", 0.0, |_| Ok(vec![]));
        let err = Interactable::new("box", Pose::default())
            .with_interaction("A", noop())
            .unwrap()
            .with_interaction("A", noop())
            .unwrap_err();
        assert!(matches!(err, InteractError::Duplicate { .. }));
    }

    #[test]
    fn resolve_unknown_is_not_found() {
        let reg = stations();
        assert!(matches!(reg.resolve("nowhere", PICKUP), Err(InteractError::NotFound { .. })));
        assert!(matches!(reg.resolve("source", "THROW"), Err(InteractError::NotFound { .. })));
    }

    #[test]
    fn action_keys_are_union() {
        let keys = stations().action_keys();
        assert_eq!(keys, vec![ActionKey::new("source", PICKUP), ActionKey::new("speaker", SCORE)]);
    }

    #[test]
    fn interaction_navigation_override() {
        let spot = Pose::new(5.0, 5.0, 1.0);
        let obj = Interactable::new("box", Pose::default())
            .with_interaction("A", FnInteraction::new("a", 0.0, |_| Ok(vec![])).at(spot))
            .unwrap()
            .with_interaction("B", FnInteraction::new("b", 0.0, |_| Ok(vec![])))
            .unwrap();
        let a = obj.interaction("A").unwrap();
        let b = obj.interaction("B").unwrap();
        assert_eq!(obj.navigation_for(a.as_ref()), spot);
        assert_eq!(obj.navigation_for(b.as_ref()), Pose::default());
    }
}

#[cfg(test)]
mod catalog {
    use super::*;

    #[test]
    fn wait_is_index_zero() {
        let cat = ActionCatalog::new(stations().action_keys());
        assert_eq!(cat.get(0), Some(&ActionKey::wait()));
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.index_of(&ActionKey::new("speaker", SCORE)), Some(2));
    }

    #[test]
    fn empty_game_still_has_wait() {
        let cat = ActionCatalog::new(Vec::new());
        assert_eq!(cat.len(), 1);
        assert!(cat.get(0).unwrap().is_wait());
    }

    #[test]
    fn explicit_wait_not_duplicated() {
        let cat = ActionCatalog::new(vec![ActionKey::wait(), ActionKey::new("a", "b")]);
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn labels() {
        assert_eq!(ActionKey::wait().label(), "WAIT");
        assert_eq!(ActionKey::new("source", PICKUP).label(), "source:PICKUP");
    }
}

#[cfg(test)]
mod stations {
    use super::*;

    #[test]
    fn pickup_then_score() {
        let reg = stations();
        let mut s = world(&reg, 0);
        run(&reg, &mut s, "source", PICKUP).unwrap();
        assert_eq!(s.cell(&CellPath::gamepiece("r1", "note")).unwrap(), &Value::Int(1));
        assert_eq!(s.cell(&CellPath::interactable("source", STOCK)).unwrap(), &Value::Int(0));

        run(&reg, &mut s, "speaker", SCORE).unwrap();
        assert_eq!(s.value("score"), Some(&Value::Int(2)));
        assert_eq!(s.value("red_score"), Some(&Value::Int(2)));
        assert_eq!(s.value("blue_score"), Some(&Value::Int(0)));
    }

    #[test]
    fn pickup_when_holding_is_infeasible() {
        let reg = stations();
        let mut s = world(&reg, 1);
        let err = run(&reg, &mut s, "source", PICKUP).unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn empty_station_is_infeasible() {
        let reg = stations();
        let mut s = world(&reg, 0);
        run(&reg, &mut s, "source", PICKUP).unwrap();
        run(&reg, &mut s, "speaker", SCORE).unwrap();
        assert!(run(&reg, &mut s, "source", PICKUP).unwrap_err().is_infeasible());
    }

    #[test]
    fn score_without_piece_is_infeasible() {
        let reg = stations();
        let before = world(&reg, 0);
        let mut s = before.clone();
        assert!(run(&reg, &mut s, "speaker", SCORE).unwrap_err().is_infeasible());
        assert_eq!(s, before);
    }
}

#[cfg(test)]
mod fn_interaction {
    use super::*;

    #[test]
    fn condition_false_is_infeasible() {
        let reg = stations();
        let s = world(&reg, 0);
        let i = FnInteraction::new("never", 1.0, |_| Ok(vec![])).when(|_| false);
        assert!(i.effect(&scope(&s, "source")).unwrap_err().is_infeasible());
    }

    #[test]
    fn effect_reads_global_and_time() {
        let reg = stations();
        let s = world(&reg, 0);
        let i = FnInteraction::new("stamp", 2.5, |sc| {
            let score = sc.global.value("score").and_then(Value::as_int).unwrap_or(-1);
            Ok(vec![ValueChange::set(CellPath::global("score"), score + sc.now.0 as i64)])
        });
        let sc = EffectScope { now: SimTime(40), ..scope(&s, "source") };
        assert_eq!(i.duration_estimate(&sc), 2.5);
        let journal = i.effect(&sc).unwrap();
        assert_eq!(journal[0].requested(), &Value::Int(40));
    }
}
