//! Integration tests for the runtime
//!
//! These tests drive a small pantry through the public API:
//! - Composing stateless traits from stereotypes
//! - Moving machines through their lifecycle
//! - Gating behavior on current traits
//! - Routing calls by exact trait set
//! - Walking the observation hierarchy

use traitflux::machine::Snapshot;
use traitflux::{
    Bag, Composition, DispatchError, FnDispatch, GateOutcome, MethodDispatch, Stereotype, TraitBag, TraitMachine,
    TraitSet, Traited, World, can, can_with, compose, walk,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Phase {
    Sealed,
    Open,
    Empty,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Cap {
    Container,
    Edible,
    Selected,
    Used,
    Breakable,
    Pourable,
    Destroyable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Stuff {
    Flour,
    Sugar,
}

type Jar = TraitMachine<Phase, Cap, Stuff>;

fn container() -> Stereotype<Cap> {
    Stereotype::new("container", [Cap::Container, Cap::Selected, Cap::Used])
}

fn glass() -> Stereotype<Cap> {
    Stereotype::new("glass", [Cap::Breakable])
}

fn jar(name: &str) -> Jar {
    TraitMachine::builder(Phase::Sealed)
        .name(name)
        .final_state(Phase::Destroyed)
        .transition(Phase::Sealed, [Phase::Open, Phase::Destroyed])
        .transition(Phase::Open, [Phase::Empty, Phase::Destroyed])
        .transition(Phase::Empty, [Phase::Destroyed])
        .stereotype(container())
        .stereotype(glass())
        .exclude([Cap::Used])
        .stateful(Phase::Open, [Cap::Pourable, Cap::Destroyable])
        .stateful(Phase::Empty, [Cap::Destroyable])
        .bag(Bag::from_counts([(Stuff::Flour, 3)]))
        .build()
}

#[test]
fn test_compose_union_minus_excludes() {
    let traits = compose(
        [&container(), &glass()],
        &TraitSet::from([Cap::Edible]),
        &TraitSet::from([Cap::Used, Cap::Edible]),
    );
    assert_eq!(traits, TraitSet::from([Cap::Container, Cap::Selected, Cap::Breakable]));

    let nothing: TraitSet<Cap> = compose(Vec::<&Stereotype<Cap>>::new(), &TraitSet::new(), &TraitSet::new());
    assert!(nothing.is_empty());
}

#[test]
fn test_traits_follow_state() {
    let mut jar = jar("jar");
    let stateless = TraitSet::from([Cap::Container, Cap::Selected, Cap::Breakable]);

    assert_eq!(jar.traits(), &stateless);
    assert!(jar.flux_to(Phase::Open));
    assert_eq!(
        jar.traits(),
        &stateless.union(&TraitSet::from([Cap::Pourable, Cap::Destroyable]))
    );

    assert!(jar.flux_to(Phase::Empty));
    assert!(jar.has_trait(&Cap::Destroyable));
    assert!(!jar.has_trait(&Cap::Pourable));
    assert_eq!(jar.stateless_traits(), &stateless);
}

#[test]
fn test_refused_flux_changes_nothing() {
    let mut jar = jar("jar");
    let before = jar.traits().clone();

    assert!(!jar.flux_to(Phase::Empty));
    assert_eq!(jar.state(), &Phase::Sealed);
    assert_eq!(jar.traits(), &before);
}

#[test]
fn test_final_state_is_terminal() {
    let mut jar = jar("jar");
    assert!(jar.flux_to(Phase::Destroyed));
    assert!(jar.is_stuck());
    assert_eq!(jar.successors().count(), 0);

    for next in [Phase::Sealed, Phase::Open, Phase::Empty, Phase::Destroyed] {
        assert!(!jar.flux_to(next));
    }
    assert_eq!(jar.state(), &Phase::Destroyed);
}

#[test]
fn test_gated_destroy() {
    let mut destroy = can(Cap::Destroyable, "destroy", |_actor: &mut (), jar: &mut Jar| {
        jar.flux_to(Phase::Destroyed);
    });

    let mut jar = jar("jam");
    let outcome = destroy.invoke(&mut (), &mut jar);
    assert_eq!(
        outcome,
        GateOutcome::Refused {
            message: "destroy isn't available while jam Sealed".to_string()
        }
    );
    assert_eq!(jar.state(), &Phase::Sealed);

    jar.flux_to(Phase::Open);
    assert!(destroy.invoke(&mut (), &mut jar).is_performed());
    assert_eq!(jar.state(), &Phase::Destroyed);
}

#[test]
fn test_gated_pour_moves_stuff() {
    let mut pour = can_with(
        Cap::Pourable,
        "pour",
        |bowl: &mut Bag<Stuff>, jar: &mut Jar, amount: u32| {
            let taken = jar.bag.take(&Stuff::Flour, amount);
            bowl.add(Stuff::Flour, taken);
        },
    );

    let mut bowl = Bag::new();
    let mut jar = jar("flour");

    assert!(pour.invoke_with(&mut bowl, &mut jar, 2).is_refused());
    assert!(bowl.is_empty());

    jar.flux_to(Phase::Open);
    assert!(pour.invoke_with(&mut bowl, &mut jar, 2).is_performed());
    assert!(pour.invoke_with(&mut bowl, &mut jar, 2).is_performed());
    assert_eq!(bowl.count(&Stuff::Flour), 3);
    assert_eq!(jar.bag.count(&Stuff::Flour), 0);
}

#[test]
fn test_exact_set_dispatch() {
    let mut describe: FnDispatch<Cap, TraitSet<Cap>, (), &'static str> = FnDispatch::new("describe");
    describe.register([Cap::Container], |_, _| "a");
    describe.register([Cap::Container, Cap::Edible], |_, _| "b");

    assert_eq!(describe.dispatch(&mut TraitSet::from([Cap::Container]), ()), Ok("a"));
    assert_eq!(
        describe.dispatch(&mut TraitSet::from([Cap::Edible, Cap::Container]), ()),
        Ok("b")
    );

    let miss = describe.dispatch(&mut TraitSet::from([Cap::Container, Cap::Breakable]), ());
    assert_eq!(
        miss,
        Err(DispatchError::NoImplementation {
            operation: "describe".to_string(),
            traits: "{Container, Breakable}".to_string(),
        })
    );
}

#[test]
fn test_dispatch_follows_lifecycle() {
    let mut label: FnDispatch<Cap, Jar, (), String> = FnDispatch::new("label");
    label.register([Cap::Container, Cap::Selected, Cap::Breakable], |jar: &mut Jar, _| {
        format!("sealed {}", jar.name())
    });
    label.register(
        [Cap::Container, Cap::Selected, Cap::Breakable, Cap::Pourable, Cap::Destroyable],
        |jar: &mut Jar, _| format!("open {}", jar.name()),
    );

    let mut jar = jar("honey");
    assert_eq!(label.dispatch(&mut jar, ()).as_deref(), Ok("sealed honey"));
    jar.flux_to(Phase::Open);
    assert_eq!(label.dispatch(&mut jar, ()).as_deref(), Ok("open honey"));
    jar.flux_to(Phase::Empty);
    assert!(label.dispatch(&mut jar, ()).is_err());
}

#[test]
fn test_method_dispatch_per_operation() {
    struct Cook {
        log: Vec<String>,
    }

    let mut table: MethodDispatch<Cap, Cook, Jar, u32> = MethodDispatch::new();
    table.register(
        "use",
        [Cap::Container, Cap::Selected, Cap::Breakable, Cap::Pourable, Cap::Destroyable],
        |cook: &mut Cook, jar: &mut Jar, n: u32| {
            let taken = jar.bag.take(&Stuff::Flour, n);
            cook.log.push(format!("used {} from {}", taken, jar.name()));
        },
    );

    let mut cook = Cook { log: Vec::new() };
    let mut jar = jar("flour");

    assert!(table.dispatch("use", &mut cook, &mut jar, 1).is_err());
    jar.flux_to(Phase::Open);
    assert!(table.dispatch("use", &mut cook, &mut jar, 1).is_ok());
    assert!(table.dispatch("stir", &mut cook, &mut jar, 1).is_err());
    assert_eq!(cook.log, vec!["used 1 from flour"]);
}

#[test]
fn test_walk_pantry() {
    let mut world = World::new();
    let flour = world.spawn(jar("flour"));
    let sugar = world.spawn(jar("sugar"));
    let spice = world.spawn(jar("spice"));
    let rack = world.spawn_with_children(jar("rack"), [spice]);
    let shelf = world.spawn_with_children(jar("shelf"), [flour, sugar, rack]);

    let names: Vec<&str> = walk(&world, shelf)
        .filter_map(|id| world.get(id))
        .map(|m| m.name())
        .collect();
    assert_eq!(names, vec!["shelf", "flour", "sugar", "rack", "spice"]);
    assert_eq!(walk(&world, rack).count(), 2);
    assert_eq!(walk(&world, flour).count(), 1);
    assert_eq!(world.parent_of(spice), Some(rack));
}

#[test]
fn test_children_do_not_keep_each_other_alive() {
    let mut world = World::new();
    let lid = world.spawn(jar("lid"));
    let pot = world.spawn_with_children(jar("pot"), [lid]);

    world.despawn(pot);
    assert_eq!(world.parent_of(lid), None);
    assert!(world.contains(lid));

    world.despawn(lid);
    assert!(world.is_empty());
}

#[test]
fn test_clones_are_independent() {
    let mut original = jar("original");
    let mut copy = original.clone_as(Some("copy".to_string()));

    copy.flux_to(Phase::Open);
    copy.bag.add(Stuff::Sugar, 1);

    assert_eq!(original.state(), &Phase::Sealed);
    assert_eq!(original.bag.count(&Stuff::Sugar), 0);
    assert_eq!(copy.name(), "copy");

    original.flux_to(Phase::Destroyed);
    assert_eq!(copy.state(), &Phase::Open);

    let unnamed = original.clone_as(None);
    assert_ne!(unnamed.name(), original.name());
}

#[test]
fn test_trait_bag_prototype() {
    let recipe = Composition::new().stereotype(container()).include([Cap::Edible]).exclude([Cap::Used]);
    let sack: TraitBag<Cap, Stuff> = TraitBag::new(
        Some("sack".to_string()),
        &recipe,
        [Stuff::Flour, Stuff::Flour, Stuff::Sugar].into_iter().collect(),
    );

    assert_eq!(sack.traits(), &TraitSet::from([Cap::Container, Cap::Selected, Cap::Edible]));
    assert_eq!(sack.bag.count(&Stuff::Flour), 2);

    let mut other = sack.clone_as(None);
    other.bag.take(&Stuff::Flour, 2);
    assert_eq!(sack.bag.count(&Stuff::Flour), 2);
    assert_eq!(other.traits(), sack.traits());
}

#[test]
fn test_snapshot_restore_into_fresh_machine() {
    let mut used = jar("jam");
    used.flux_to(Phase::Open);
    used.bag.take(&Stuff::Flour, 1);

    let saved: Snapshot<Phase, Cap, Stuff> = used.snapshot();
    let mut restored = jar("blank");
    restored.restore(&saved).unwrap();

    assert_eq!(restored.name(), "jam");
    assert_eq!(restored.state(), &Phase::Open);
    assert_eq!(restored.traits(), used.traits());
    assert_eq!(restored.bag.count(&Stuff::Flour), 2);
}
