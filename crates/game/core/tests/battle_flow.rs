//! End-to-end battle scenarios driven only through the public API.

use std::sync::Arc;

use arena_core::{
    Action, ActionIdAllocator, ActionTrigger, AttackEffect, BattleConfig, BattleManager,
    BattleOutcome, BattleState, BuffEffect, Character, CharacterClass, ContextModifier,
    DamageOverTimeEffect, HealEffect, LogKind, Requirement, ShieldEffect, Side, StatBlock,
    StatBonus, StatKey, TickOutcome, TriggerCondition, TriggerEffect, TriggerKind,
};

fn loadout(ids: &mut ActionIdAllocator) -> Vec<Arc<Action>> {
    vec![
        Arc::new(Action::new(
            ids,
            "Slash",
            0,
            vec![AttackEffect::new(6).scaling(StatKey::Attack, 50).into()],
        )),
        Arc::new(Action::new(
            ids,
            "Venom",
            1,
            vec![DamageOverTimeEffect::new(3, 3).into()],
        )),
        Arc::new(Action::new(
            ids,
            "Brace",
            0,
            vec![
                ShieldEffect::new(6).into(),
                BuffEffect::new(StatKey::Defence, 2, 2, true).into(),
            ],
        )),
    ]
}

fn player(ids: &mut ActionIdAllocator) -> Character {
    let vampirism = ActionTrigger::new(
        "Vampirism",
        TriggerCondition::on(TriggerKind::OnDamageDealt)
            .with_requirement(Requirement::ActorHealthBelow(100)),
        TriggerEffect::ContextHeal { percent: 50 },
    );
    Character::builder()
        .name("Hero")
        .stats(StatBlock::default().clone_with(|s| s.speed = 30))
        .actions(loadout(ids))
        .class(
            CharacterClass::new("Vampire", StatBonus::new().with_attack(2))
                .with_trigger(vampirism),
        )
        .build()
        .expect("hero is complete")
}

fn enemy(ids: &mut ActionIdAllocator) -> Character {
    let bite = Action::new(ids, "Bite", 0, vec![AttackEffect::new(9).into()]);
    let lick = Action::new(ids, "Lick wounds", 0, vec![HealEffect::new(4).into()]);
    Character::builder()
        .name("Wolf")
        .stats(StatBlock::default().clone_with(|s| {
            s.speed = 35;
            s.max_hit_points = 90;
            s.hit_points = 90;
        }))
        .actions(vec![Arc::new(bite), Arc::new(lick)])
        .build()
        .expect("wolf is complete")
}

#[test]
fn battle_runs_to_a_decision() {
    let mut ids = ActionIdAllocator::new();
    let mut battle = BattleManager::new(player(&mut ids), enemy(&mut ids), 1).with_seed(42);
    battle.start_battle().expect("battle starts");

    let outcome = battle.run_to_end(10_000).expect("battle finishes");

    assert_eq!(battle.state(), BattleState::Ended);
    let last = battle.battle_log().last().expect("log is not empty");
    assert_eq!(last.kind, LogKind::Victory);
    match outcome {
        BattleOutcome::Winner(side) => {
            let loser = battle.character(side.opponent());
            let expected = if loser.stats().hit_points == 0 {
                format!("{} has been defeated!", loser.name())
            } else {
                format!("{} has run away!", loser.name())
            };
            assert_eq!(last.message, expected);
        }
        BattleOutcome::Draw => assert_eq!(
            battle.player().stats().hit_points,
            battle.ai().stats().hit_points
        ),
    }
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed| {
        let mut ids = ActionIdAllocator::new();
        let mut battle = BattleManager::new(player(&mut ids), enemy(&mut ids), 1).with_seed(seed);
        battle.start_battle().expect("battle starts");
        battle.run_to_end(10_000);
        battle.battle_log().entries().to_vec()
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn class_bonus_applies_when_the_battle_starts() {
    let mut ids = ActionIdAllocator::new();
    let mut battle = BattleManager::new(player(&mut ids), enemy(&mut ids), 1);
    battle.start_battle().expect("battle starts");
    assert_eq!(battle.player().stats().attack, 12);
}

#[test]
fn before_action_discount_reduces_energy_spent() {
    let mut ids = ActionIdAllocator::new();
    let costly = Arc::new(Action::new(&mut ids, "Costly", 4, Vec::new()));
    let thrift = ActionTrigger::new(
        "Thrift",
        TriggerCondition::on(TriggerKind::BeforeAction),
        TriggerEffect::ModifyContext(ContextModifier::Add(-3)),
    );
    let hero = Character::builder()
        .name("Hero")
        .stats(StatBlock::default().clone_with(|s| {
            s.energy = 5;
            s.speed = 100;
        }))
        .actions(vec![costly.clone(), costly.clone(), costly])
        .trigger(thrift)
        .build()
        .expect("hero is complete");
    let dummy = enemy(&mut ids);

    let config = BattleConfig::new();
    let mut battle = BattleManager::new(hero, dummy, 1).with_config(config);
    battle.start_battle().expect("battle starts");
    // out-of-battle refresh resets energy to the base value
    assert_eq!(battle.player().stats().energy, 5);

    assert_eq!(
        battle.advance_tick(),
        TickOutcome::Advanced {
            turns: vec![Side::Player]
        }
    );
    // +1 regen at start of turn, then 4 - 3 spent
    assert_eq!(battle.player().stats().energy, 5);
}
