//! Pet adoption and release.

mod common;

use lamoland::game::errors::GameError;
use lamoland::game::ledger;

#[test]
fn adoption_validates_name_before_spending() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    // "Rex" is three characters; names must be 4..=20.
    let err = ledger::adopt_pet(&store, "alice", "jackaloaf", "Rex").unwrap_err();
    match err {
        GameError::Validation(_) => {}
        other => panic!("Expected Validation, got: {:?}", other),
    }
    assert_eq!(store.get_user("alice").expect("user").balance, 1000);
    assert!(store.list_pets("alice").expect("pets").is_empty());

    // "Rexy" passes and the jackaloaf costs 100.
    let outcome = ledger::adopt_pet(&store, "alice", "jackaloaf", "Rexy").expect("adopt");
    assert_eq!(outcome.balance, 900);
    assert_eq!(outcome.pet.name, "Rexy");
    assert_eq!(outcome.pet.species, "jackaloaf");

    let pets = store.list_pets("alice").expect("pets");
    assert_eq!(pets.len(), 1);
}

#[test]
fn unknown_species_is_not_found() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    let err = ledger::adopt_pet(&store, "alice", "dragon", "Smaug the Red").unwrap_err();
    match err {
        GameError::NotFound(_) => {}
        other => panic!("Expected NotFound, got: {:?}", other),
    }
    assert_eq!(store.get_user("alice").expect("user").balance, 1000);
}

#[test]
fn adoption_requires_sufficient_balance() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    // Four ember foxes at 250 drain the full 1000.
    for name in ["Ember", "Flare", "Sooty", "Ashen"] {
        ledger::adopt_pet(&store, "alice", "emberfox", name).expect("adopt");
    }
    let err = ledger::adopt_pet(&store, "alice", "emberfox", "Fifth").unwrap_err();
    match err {
        GameError::InsufficientBalance => {}
        other => panic!("Expected InsufficientBalance, got: {:?}", other),
    }
    assert_eq!(store.list_pets("alice").expect("pets").len(), 4);
    assert_eq!(store.get_user("alice").expect("user").balance, 0);
}

#[test]
fn release_takes_half_the_species_price() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    // Mossling costs 200; releasing it steals 100 more.
    let outcome = ledger::adopt_pet(&store, "alice", "mossling", "Mossy").expect("adopt");
    assert_eq!(outcome.balance, 800);

    let balance = ledger::release_pet(&store, "alice", outcome.pet.id).expect("release");
    assert_eq!(balance, 700);
    assert!(store.list_pets("alice").expect("pets").is_empty());
}

#[test]
fn release_fee_floors_at_zero() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    // Spend down to 0: four ember foxes at 250 each.
    let mut last_pet_id = 0;
    for name in ["Ember", "Flare", "Sooty", "Ashen"] {
        last_pet_id = ledger::adopt_pet(&store, "alice", "emberfox", name)
            .expect("adopt")
            .pet
            .id;
    }
    assert_eq!(store.get_user("alice").expect("user").balance, 0);

    // The 125 release fee cannot push the balance negative.
    let balance = ledger::release_pet(&store, "alice", last_pet_id).expect("release");
    assert_eq!(balance, 0);
    assert_eq!(store.list_pets("alice").expect("pets").len(), 3);
}

#[test]
fn releasing_someone_elses_pet_is_not_found() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");
    common::register(&store, "bob2");

    let outcome = ledger::adopt_pet(&store, "alice", "jackaloaf", "Rexy").expect("adopt");
    let err = ledger::release_pet(&store, "bob2", outcome.pet.id).unwrap_err();
    match err {
        GameError::NotFound(_) => {}
        other => panic!("Expected NotFound, got: {:?}", other),
    }
    assert_eq!(store.list_pets("alice").expect("pets").len(), 1);
}
