use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{error, warn};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
    TransactionalTree,
};
use sled::IVec;

use crate::game::catalog::{default_items, default_species};
use crate::game::errors::GameError;
use crate::game::types::{
    AdoptedPetRecord, CommentRecord, InventoryEntry, ItemRecord, SpeciesRecord, TopicRecord,
    UserRecord, CATALOG_SCHEMA_VERSION, COMMENT_SCHEMA_VERSION, INVENTORY_SCHEMA_VERSION,
    PET_SCHEMA_VERSION, TOPIC_SCHEMA_VERSION, USER_SCHEMA_VERSION,
};
use crate::metrics;

const TREE_RECORDS: &str = "lamoland";
const TREE_CATALOG: &str = "lamoland_catalog";

/// Bounded retry for commits that fail with a storage-level error. Domain
/// aborts are never retried; only the store reporting itself unhealthy is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up (minimum 1).
    pub attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Drive `attempt_fn` until it succeeds, aborts, or the attempt budget is
    /// spent. Exhaustion surfaces as [`GameError::StoreBusy`].
    pub fn run<T>(
        &self,
        op: &str,
        mut attempt_fn: impl FnMut() -> Result<T, TransactionError<GameError>>,
    ) -> Result<T, GameError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match attempt_fn() {
                Ok(value) => {
                    metrics::record_commit();
                    return Ok(value);
                }
                Err(TransactionError::Abort(err)) => return Err(err),
                Err(TransactionError::Storage(err)) => {
                    if attempt >= self.attempts {
                        metrics::record_commit_exhausted();
                        error!("{}: commit failed after {} attempts: {}", op, attempt, err);
                        return Err(GameError::StoreBusy);
                    }
                    metrics::record_commit_retry();
                    warn!(
                        "{}: transient store error on attempt {}: {}",
                        op, attempt, err
                    );
                    std::thread::sleep(self.delay);
                }
            }
        }
    }
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GameStoreBuilder {
    path: PathBuf,
    ensure_catalog_seed: bool,
    retry: RetryPolicy,
}

impl GameStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure_catalog_seed: true,
            retry: RetryPolicy::default(),
        }
    }

    /// Opt out of seeding the default catalog during initialization (useful
    /// for targeted tests).
    pub fn without_catalog_seed(mut self) -> Self {
        self.ensure_catalog_seed = false;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn open(self) -> Result<GameStore, GameError> {
        GameStore::open_with_options(self.path, self.ensure_catalog_seed, self.retry)
    }
}

/// Sled-backed persistence for users, ownership rows and the forum tree.
///
/// All mutable state lives in one `records` tree so every game operation can
/// run as a single serializable transaction over it; the immutable catalog
/// sits in its own tree and is only written by the startup seed.
pub struct GameStore {
    db: sled::Db,
    records: sled::Tree,
    catalog: sled::Tree,
    retry: RetryPolicy,
}

impl GameStore {
    /// Open (or create) the game store rooted at `path`. When
    /// `seed_catalog` is true the default item and species catalog is
    /// inserted for any id not already present.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open_with_options(path, true, RetryPolicy::default())
    }

    fn open_with_options<P: AsRef<Path>>(
        path: P,
        seed_catalog: bool,
        retry: RetryPolicy,
    ) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let records = db.open_tree(TREE_RECORDS)?;
        let catalog = db.open_tree(TREE_CATALOG)?;
        let store = Self {
            db,
            records,
            catalog,
            retry,
        };

        if seed_catalog {
            store.seed_catalog_if_needed()?;
        }

        Ok(store)
    }

    // ------------------------------------------------------------------
    // Key layout
    // ------------------------------------------------------------------

    pub(crate) fn user_key(username: &str) -> Vec<u8> {
        format!("user:{}", username.to_ascii_lowercase()).into_bytes()
    }

    pub(crate) fn inventory_key(username: &str, entry_id: u64) -> Vec<u8> {
        format!("inv:{}:{:020}", username.to_ascii_lowercase(), entry_id).into_bytes()
    }

    fn inventory_prefix(username: &str) -> Vec<u8> {
        format!("inv:{}:", username.to_ascii_lowercase()).into_bytes()
    }

    pub(crate) fn pet_key(username: &str, pet_id: u64) -> Vec<u8> {
        format!("pet:{}:{:020}", username.to_ascii_lowercase(), pet_id).into_bytes()
    }

    fn pet_prefix(username: &str) -> Vec<u8> {
        format!("pet:{}:", username.to_ascii_lowercase()).into_bytes()
    }

    pub(crate) fn topic_key(topic_id: u64) -> Vec<u8> {
        format!("topic:{:020}", topic_id).into_bytes()
    }

    /// Uniqueness index: lowercased title -> topic id (decimal bytes).
    pub(crate) fn topic_title_key(title: &str) -> Vec<u8> {
        format!("topic-title:{}", title.to_lowercase()).into_bytes()
    }

    pub(crate) fn comment_key(comment_id: u64) -> Vec<u8> {
        format!("comment:{:020}", comment_id).into_bytes()
    }

    fn item_key(item_id: u32) -> Vec<u8> {
        format!("item:{:04}", item_id).into_bytes()
    }

    fn species_key(code: &str) -> Vec<u8> {
        format!("species:{}", code.to_ascii_lowercase()).into_bytes()
    }

    pub(crate) fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    pub(crate) fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GameError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Monotonic id source for ownership rows, topics and comments.
    pub fn next_id(&self) -> Result<u64, GameError> {
        Ok(self.db.generate_id()?)
    }

    // ------------------------------------------------------------------
    // Transactional commit
    // ------------------------------------------------------------------

    /// Run `f` as a serializable transaction over the records tree, retrying
    /// storage-level failures per the configured [`RetryPolicy`]. Domain
    /// errors raised via [`abort`] pass through unchanged.
    pub fn commit_with_retry<T>(
        &self,
        op: &str,
        f: impl Fn(&TransactionalTree) -> ConflictableTransactionResult<T, GameError>,
    ) -> Result<T, GameError> {
        let value = self.retry.run(op, || self.records.transaction(&f))?;
        self.records.flush()?;
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert or update a user record outside of a transaction. Game
    /// operations that touch balances must go through [`commit_with_retry`]
    /// instead; this is for registration-free paths (CLI password reset,
    /// tests).
    pub fn put_user(&self, mut user: UserRecord) -> Result<(), GameError> {
        user.schema_version = USER_SCHEMA_VERSION;
        user.touch();
        let key = Self::user_key(&user.username);
        let bytes = Self::serialize(&user)?;
        self.records.insert(key, bytes)?;
        self.records.flush()?;
        Ok(())
    }

    /// Fetch a user record by username (case-insensitive).
    pub fn get_user(&self, username: &str) -> Result<UserRecord, GameError> {
        let key = Self::user_key(username);
        let Some(bytes) = self.records.get(&key)? else {
            return Err(GameError::NotFound(format!("user: {}", username)));
        };
        let record: UserRecord = Self::deserialize(bytes)?;
        if record.schema_version != USER_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "user",
                expected: USER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn user_exists(&self, username: &str) -> Result<bool, GameError> {
        Ok(self.records.contains_key(Self::user_key(username))?)
    }

    /// List all stored usernames (display case as registered).
    pub fn list_usernames(&self) -> Result<Vec<String>, GameError> {
        let mut names = Vec::new();
        for entry in self.records.scan_prefix(b"user:") {
            let (_, value) = entry?;
            let record: UserRecord = Self::deserialize(value)?;
            names.push(record.username);
        }
        Ok(names)
    }

    pub fn count_users(&self) -> Result<usize, GameError> {
        Ok(self.records.scan_prefix(b"user:").count())
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    fn put_item(&self, mut item: ItemRecord) -> Result<(), GameError> {
        item.schema_version = CATALOG_SCHEMA_VERSION;
        let key = Self::item_key(item.id);
        let bytes = Self::serialize(&item)?;
        self.catalog.insert(key, bytes)?;
        Ok(())
    }

    pub fn get_item(&self, item_id: u32) -> Result<ItemRecord, GameError> {
        let key = Self::item_key(item_id);
        let Some(bytes) = self.catalog.get(&key)? else {
            return Err(GameError::NotFound(format!("item: {}", item_id)));
        };
        Ok(Self::deserialize(bytes)?)
    }

    pub fn list_items(&self) -> Result<Vec<ItemRecord>, GameError> {
        let mut items = Vec::new();
        for entry in self.catalog.scan_prefix(b"item:") {
            let (_, value) = entry?;
            items.push(Self::deserialize(value)?);
        }
        Ok(items)
    }

    fn put_species(&self, mut species: SpeciesRecord) -> Result<(), GameError> {
        species.schema_version = CATALOG_SCHEMA_VERSION;
        let key = Self::species_key(&species.code);
        let bytes = Self::serialize(&species)?;
        self.catalog.insert(key, bytes)?;
        Ok(())
    }

    pub fn get_species(&self, code: &str) -> Result<SpeciesRecord, GameError> {
        let key = Self::species_key(code);
        let Some(bytes) = self.catalog.get(&key)? else {
            return Err(GameError::NotFound(format!("species: {}", code)));
        };
        Ok(Self::deserialize(bytes)?)
    }

    pub fn list_species(&self) -> Result<Vec<SpeciesRecord>, GameError> {
        let mut species = Vec::new();
        for entry in self.catalog.scan_prefix(b"species:") {
            let (_, value) = entry?;
            species.push(Self::deserialize(value)?);
        }
        Ok(species)
    }

    /// Insert any default catalog row whose id is not yet present. Existing
    /// rows are left untouched, so re-running on startup is a no-op.
    pub fn seed_catalog_if_needed(&self) -> Result<usize, GameError> {
        let mut inserted = 0usize;
        for item in default_items() {
            if !self.catalog.contains_key(Self::item_key(item.id))? {
                self.put_item(item)?;
                inserted += 1;
            }
        }
        for species in default_species() {
            if !self.catalog.contains_key(Self::species_key(&species.code))? {
                self.put_species(species)?;
                inserted += 1;
            }
        }
        if inserted > 0 {
            self.catalog.flush()?;
        }
        Ok(inserted)
    }

    // ------------------------------------------------------------------
    // Inventory and pets
    // ------------------------------------------------------------------

    /// Fetch one inventory entry, scoped to its owner's namespace. A foreign
    /// or missing id both come back as NotFound.
    pub fn get_inventory_entry(
        &self,
        username: &str,
        entry_id: u64,
    ) -> Result<InventoryEntry, GameError> {
        let key = Self::inventory_key(username, entry_id);
        let Some(bytes) = self.records.get(&key)? else {
            return Err(GameError::NotFound(format!("inventory entry: {}", entry_id)));
        };
        let record: InventoryEntry = Self::deserialize(bytes)?;
        if record.schema_version != INVENTORY_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "inventory entry",
                expected: INVENTORY_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// All inventory entries for a user, oldest purchase first.
    pub fn list_inventory(&self, username: &str) -> Result<Vec<InventoryEntry>, GameError> {
        let mut entries = Vec::new();
        for entry in self.records.scan_prefix(Self::inventory_prefix(username)) {
            let (_, value) = entry?;
            entries.push(Self::deserialize(value)?);
        }
        Ok(entries)
    }

    pub fn get_pet(&self, username: &str, pet_id: u64) -> Result<AdoptedPetRecord, GameError> {
        let key = Self::pet_key(username, pet_id);
        let Some(bytes) = self.records.get(&key)? else {
            return Err(GameError::NotFound(format!("pet: {}", pet_id)));
        };
        let record: AdoptedPetRecord = Self::deserialize(bytes)?;
        if record.schema_version != PET_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "pet",
                expected: PET_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn list_pets(&self, username: &str) -> Result<Vec<AdoptedPetRecord>, GameError> {
        let mut pets = Vec::new();
        for entry in self.records.scan_prefix(Self::pet_prefix(username)) {
            let (_, value) = entry?;
            pets.push(Self::deserialize(value)?);
        }
        Ok(pets)
    }

    // ------------------------------------------------------------------
    // Forum
    // ------------------------------------------------------------------

    pub fn get_topic(&self, topic_id: u64) -> Result<TopicRecord, GameError> {
        let key = Self::topic_key(topic_id);
        let Some(bytes) = self.records.get(&key)? else {
            return Err(GameError::NotFound(format!("topic: {}", topic_id)));
        };
        let record: TopicRecord = Self::deserialize(bytes)?;
        if record.schema_version != TOPIC_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "topic",
                expected: TOPIC_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// All topics, oldest first.
    pub fn list_topics(&self) -> Result<Vec<TopicRecord>, GameError> {
        let mut topics = Vec::new();
        for entry in self.records.scan_prefix(b"topic:") {
            let (_, value) = entry?;
            topics.push(Self::deserialize(value)?);
        }
        Ok(topics)
    }

    pub fn count_topics(&self) -> Result<usize, GameError> {
        Ok(self.records.scan_prefix(b"topic:").count())
    }

    pub fn get_comment(&self, comment_id: u64) -> Result<CommentRecord, GameError> {
        let key = Self::comment_key(comment_id);
        let Some(bytes) = self.records.get(&key)? else {
            return Err(GameError::NotFound(format!("comment: {}", comment_id)));
        };
        let record: CommentRecord = Self::deserialize(bytes)?;
        if record.schema_version != COMMENT_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "comment",
                expected: COMMENT_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// All comments attached to a topic, oldest first.
    pub fn list_comments_for_topic(&self, topic_id: u64) -> Result<Vec<CommentRecord>, GameError> {
        let mut comments = Vec::new();
        for entry in self.records.scan_prefix(b"comment:") {
            let (_, value) = entry?;
            let record: CommentRecord = Self::deserialize(value)?;
            if record.topic_id == topic_id {
                comments.push(record);
            }
        }
        Ok(comments)
    }

    /// Direct replies to a comment, oldest first.
    pub fn list_children(&self, comment_id: u64) -> Result<Vec<CommentRecord>, GameError> {
        let mut children = Vec::new();
        for entry in self.records.scan_prefix(b"comment:") {
            let (_, value) = entry?;
            let record: CommentRecord = Self::deserialize(value)?;
            if record.parent_id == Some(comment_id) {
                children.push(record);
            }
        }
        Ok(children)
    }

    pub fn count_comments(&self) -> Result<usize, GameError> {
        Ok(self.records.scan_prefix(b"comment:").count())
    }
}

// ============================================================================
// Transaction helpers
// ============================================================================

/// Shorthand for aborting a transaction with a domain error.
pub(crate) fn abort(err: GameError) -> ConflictableTransactionError<GameError> {
    ConflictableTransactionError::Abort(err)
}

pub(crate) fn tx_get_user(
    tx: &TransactionalTree,
    username: &str,
) -> ConflictableTransactionResult<UserRecord, GameError> {
    let key = GameStore::user_key(username);
    let Some(bytes) = tx.get(&key)? else {
        return Err(abort(GameError::NotFound(format!("user: {}", username))));
    };
    bincode::deserialize::<UserRecord>(&bytes).map_err(|e| abort(GameError::Bincode(e)))
}

pub(crate) fn tx_put_user(
    tx: &TransactionalTree,
    user: &UserRecord,
) -> ConflictableTransactionResult<(), GameError> {
    let key = GameStore::user_key(&user.username);
    let bytes = bincode::serialize(user).map_err(|e| abort(GameError::Bincode(e)))?;
    tx.insert(key, bytes)?;
    Ok(())
}

pub(crate) fn tx_insert<T: serde::Serialize>(
    tx: &TransactionalTree,
    key: &[u8],
    record: &T,
) -> ConflictableTransactionResult<(), GameError> {
    let bytes = bincode::serialize(record).map_err(|e| abort(GameError::Bincode(e)))?;
    tx.insert(key.to_vec(), bytes)?;
    Ok(())
}

pub(crate) fn tx_remove(
    tx: &TransactionalTree,
    key: &[u8],
) -> ConflictableTransactionResult<(), GameError> {
    tx.remove(key.to_vec())?;
    Ok(())
}
