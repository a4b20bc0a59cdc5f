//! Account ledger: registration, credentials, purchases, adoption and the
//! cascading account delete.
//!
//! Every balance mutation commits atomically with its companion ownership
//! row (inventory entry, pet row, recipient credit), so no partial economic
//! state is ever observable.

use argon2::Argon2;
use log::info;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::game::catalog::STARTER_ITEM_IDS;
use crate::game::errors::GameError;
use crate::game::forum;
use crate::game::storage::{abort, tx_get_user, tx_insert, tx_put_user, tx_remove, GameStore};
use crate::game::types::{AdoptedPetRecord, GameRules, InventoryEntry, UserRecord};
use crate::logutil::escape_log;
use crate::metrics;
use crate::validation;

/// Result of a successful purchase.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub entry: InventoryEntry,
    pub balance: i64,
}

/// Result of a successful adoption.
#[derive(Debug, Clone)]
pub struct AdoptionOutcome {
    pub pet: AdoptedPetRecord,
    pub balance: i64,
}

fn hash_password(password: &str) -> Result<String, GameError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| GameError::Internal(format!("password hash failure: {}", e)))?;
    Ok(hash.to_string())
}

/// Register a new account: validated username and password, argon2 hash,
/// starting balance, and the free starter outfit, all in one commit.
pub fn register_user(
    store: &GameStore,
    username: &str,
    password: &str,
    rules: &GameRules,
) -> Result<UserRecord, GameError> {
    let validated = validation::validate_user_name(username)
        .map_err(|e| GameError::Validation(e.to_string()))?;
    validation::validate_password(password).map_err(|e| GameError::Validation(e.to_string()))?;

    let hash = hash_password(password)?;
    let record = UserRecord::new(&validated, &hash, rules);
    let user_key = GameStore::user_key(&validated);

    let mut starters = Vec::with_capacity(STARTER_ITEM_IDS.len());
    for item_id in STARTER_ITEM_IDS {
        let entry_id = store.next_id()?;
        let entry = InventoryEntry::new(entry_id, &validated, item_id);
        starters.push((GameStore::inventory_key(&validated, entry_id), entry));
    }

    store.commit_with_retry("register_user", |tx| {
        if tx.get(&user_key)?.is_some() {
            return Err(abort(GameError::Duplicate(
                "That username already exists. Please choose a different one.".to_string(),
            )));
        }
        tx_insert(tx, &user_key, &record)?;
        for (key, entry) in &starters {
            tx_insert(tx, key, entry)?;
        }
        Ok(())
    })?;

    info!("registered user {}", escape_log(&validated));
    Ok(record)
}

/// Verify a login attempt; returns (user if present, password match).
pub fn verify_password(
    store: &GameStore,
    username: &str,
    password: &str,
) -> Result<(Option<UserRecord>, bool), GameError> {
    let user = match store.get_user(username) {
        Ok(user) => user,
        Err(GameError::NotFound(_)) => return Ok((None, false)),
        Err(e) => return Err(e),
    };
    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| GameError::Internal(format!("corrupt password hash: {}", e)))?;
    let ok = Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok();
    Ok((Some(user), ok))
}

/// Overwrite an existing user's password hash (CLI password reset).
pub fn set_user_password(
    store: &GameStore,
    username: &str,
    new_password: &str,
) -> Result<(), GameError> {
    validation::validate_password(new_password)
        .map_err(|e| GameError::Validation(e.to_string()))?;
    let mut user = store.get_user(username)?;
    user.password_hash = hash_password(new_password)?;
    store.put_user(user)?;
    info!("password updated for {}", escape_log(username));
    Ok(())
}

/// Buy one catalog item: item must exist, balance must cover the price, and
/// the debit and new inventory row commit together.
pub fn purchase_item(
    store: &GameStore,
    username: &str,
    item_id: u32,
) -> Result<PurchaseOutcome, GameError> {
    let item = store.get_item(item_id)?;
    let entry_id = store.next_id()?;
    let entry = InventoryEntry::new(entry_id, username, item.id);
    let entry_key = GameStore::inventory_key(username, entry_id);
    let price = item.price;

    let balance = store.commit_with_retry("purchase_item", |tx| {
        let mut user = tx_get_user(tx, username)?;
        if user.balance < price {
            return Err(abort(GameError::InsufficientBalance));
        }
        user.balance -= price;
        user.touch();
        tx_put_user(tx, &user)?;
        tx_insert(tx, &entry_key, &entry)?;
        Ok(user.balance)
    })?;

    metrics::record_purchase();
    info!(
        "{} purchased item {} ({}) for {}",
        escape_log(username),
        item.id,
        item.name,
        price
    );
    Ok(PurchaseOutcome { entry, balance })
}

/// Adopt a pet: the chosen name is validated before anything else, then the
/// species price is debited alongside the new pet row.
pub fn adopt_pet(
    store: &GameStore,
    username: &str,
    species_code: &str,
    pet_name: &str,
) -> Result<AdoptionOutcome, GameError> {
    let name = validation::validate_pet_name(pet_name)
        .map_err(|e| GameError::Validation(e.to_string()))?;
    let species = store.get_species(species_code)?;

    let pet_id = store.next_id()?;
    let pet = AdoptedPetRecord::new(pet_id, username, &species.code, &name);
    let pet_key = GameStore::pet_key(username, pet_id);
    let price = species.price;

    let balance = store.commit_with_retry("adopt_pet", |tx| {
        let mut user = tx_get_user(tx, username)?;
        if user.balance < price {
            return Err(abort(GameError::InsufficientBalance));
        }
        user.balance -= price;
        user.touch();
        tx_put_user(tx, &user)?;
        tx_insert(tx, &pet_key, &pet)?;
        Ok(user.balance)
    })?;

    metrics::record_adoption();
    info!(
        "{} adopted a {} named {}",
        escape_log(username),
        species.code,
        escape_log(&name)
    );
    Ok(AdoptionOutcome { pet, balance })
}

/// Release a pet back to the wild. The departing pet steals half its species
/// price on the way out; the balance floors at zero rather than going
/// negative.
pub fn release_pet(store: &GameStore, username: &str, pet_id: u64) -> Result<i64, GameError> {
    let pet = store.get_pet(username, pet_id)?;
    let species = store.get_species(&pet.species)?;
    let fee = species.price / 2;
    let pet_key = GameStore::pet_key(username, pet_id);

    let balance = store.commit_with_retry("release_pet", |tx| {
        let mut user = tx_get_user(tx, username)?;
        user.balance = (user.balance - fee).max(0);
        user.touch();
        tx_put_user(tx, &user)?;
        tx_remove(tx, &pet_key)?;
        Ok(user.balance)
    })?;

    info!(
        "{} released pet {} ({}), fee {}",
        escape_log(username),
        pet_id,
        escape_log(&pet.name),
        fee
    );
    Ok(balance)
}

/// Recycle an owned item for half its catalog price.
pub fn recycle_item(store: &GameStore, username: &str, entry_id: u64) -> Result<i64, GameError> {
    let entry = store.get_inventory_entry(username, entry_id)?;
    let item = store.get_item(entry.item_id)?;
    let refund = item.price / 2;
    let entry_key = GameStore::inventory_key(username, entry_id);

    let balance = store.commit_with_retry("recycle_item", |tx| {
        let mut user = tx_get_user(tx, username)?;
        user.balance += refund;
        user.touch();
        tx_put_user(tx, &user)?;
        tx_remove(tx, &entry_key)?;
        Ok(user.balance)
    })?;

    info!(
        "{} recycled item entry {} for {}",
        escape_log(username),
        entry_id,
        refund
    );
    Ok(balance)
}

/// Delete an account and everything it owns: inventory, pets, owned topics
/// (with all their comments) and authored comments (with their reply
/// subtrees). The ids are collected first, then removed in one commit.
pub fn delete_account(store: &GameStore, username: &str) -> Result<(), GameError> {
    let user = store.get_user(username)?;

    let mut keys: Vec<Vec<u8>> = vec![GameStore::user_key(username)];
    for entry in store.list_inventory(username)? {
        keys.push(GameStore::inventory_key(username, entry.id));
    }
    for pet in store.list_pets(username)? {
        keys.push(GameStore::pet_key(username, pet.id));
    }

    let mut comment_ids = std::collections::BTreeSet::new();
    for topic in store.list_topics()? {
        if topic.author.eq_ignore_ascii_case(&user.username) {
            keys.push(GameStore::topic_key(topic.id));
            keys.push(GameStore::topic_title_key(&topic.title));
            for comment in store.list_comments_for_topic(topic.id)? {
                comment_ids.insert(comment.id);
            }
        }
    }
    for topic in store.list_topics()? {
        for comment in store.list_comments_for_topic(topic.id)? {
            if comment.author.eq_ignore_ascii_case(&user.username)
                && !comment_ids.contains(&comment.id)
            {
                comment_ids.insert(comment.id);
                for id in forum::collect_descendant_ids(store, comment.id)? {
                    comment_ids.insert(id);
                }
            }
        }
    }
    for id in &comment_ids {
        keys.push(GameStore::comment_key(*id));
    }

    store.commit_with_retry("delete_account", |tx| {
        for key in &keys {
            tx_remove(tx, key)?;
        }
        Ok(())
    })?;

    info!(
        "deleted account {} ({} records removed)",
        escape_log(username),
        keys.len()
    );
    Ok(())
}
