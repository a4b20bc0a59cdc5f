use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const USER_SCHEMA_VERSION: u8 = 1;
pub const INVENTORY_SCHEMA_VERSION: u8 = 1;
pub const PET_SCHEMA_VERSION: u8 = 1;
pub const TOPIC_SCHEMA_VERSION: u8 = 1;
pub const COMMENT_SCHEMA_VERSION: u8 = 1;
pub const CATALOG_SCHEMA_VERSION: u8 = 1;

/// Maximum parent hops a comment may sit below its topic-level root.
pub const MAX_NESTING_LEVEL: u32 = 2;

/// Minigame identifiers known to the allowance gate.
pub const GAME_FEEDING_TIME: &str = "feeding_time";
pub const GAME_JACKALOAF_JUMP: &str = "jackaloaf_jump";

pub const KNOWN_GAMES: [&str; 2] = [GAME_FEEDING_TIME, GAME_JACKALOAF_JUMP];

/// Tunable economy rules. Defaults mirror the live site; the config layer
/// overrides them from the `[game]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    /// Balance granted to a freshly registered user.
    pub starting_balance: i64,
    /// Largest amount a single gift may carry.
    pub gift_cap: i64,
    /// Hours a sender must wait between gifts.
    pub gift_cooldown_hours: i64,
    /// Plays each minigame allows per calendar day.
    pub daily_plays: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            gift_cap: 100,
            gift_cooldown_hours: 4,
            daily_plays: 3,
        }
    }
}

// ============================================================================
// Catalog records (immutable, seeded)
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemSlot {
    Hair,
    Shirt,
    Pants,
    Shoes,
    Eyes,
    Mouth,
    Misc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemGender {
    Male,
    Female,
    Unisex,
}

/// One purchasable cosmetic. Color variants of the same garment share a
/// `base_id` and differ only in `css_filter` (and sometimes price).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: u32,
    pub base_id: u32,
    pub slot: ItemSlot,
    pub gender: ItemGender,
    pub name: String,
    pub price: i64,
    pub image: String,
    pub css_filter: Option<String>,
    pub schema_version: u8,
}

/// An adoptable pet species.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeciesRecord {
    pub code: String,
    pub display_name: String,
    pub price: i64,
    pub egg_image: String,
    pub pet_image: String,
    pub schema_version: u8,
}

// ============================================================================
// User state
// ============================================================================

/// Per-game daily allowance bookkeeping carried on the user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MinigameAllowance {
    pub game: String,
    pub last_played: NaiveDate,
    pub plays_left: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Display-cased username; lookups are case-insensitive via the store key.
    pub username: String,
    /// Argon2 hash in PHC string format.
    pub password_hash: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub avatar_image: Option<String>,
    pub profile_image: Option<String>,
    pub last_gift_at: Option<DateTime<Utc>>,
    pub minigames: Vec<MinigameAllowance>,
    pub schema_version: u8,
}

impl UserRecord {
    pub fn new(username: &str, password_hash: &str, rules: &GameRules) -> Self {
        let now = Utc::now();
        let today = now.date_naive();
        let minigames = KNOWN_GAMES
            .iter()
            .map(|game| MinigameAllowance {
                game: (*game).to_string(),
                last_played: today,
                plays_left: rules.daily_plays,
            })
            .collect();
        Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            balance: rules.starting_balance,
            created_at: now,
            updated_at: now,
            avatar_image: None,
            profile_image: None,
            last_gift_at: None,
            minigames,
            schema_version: USER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn allowance(&self, game: &str) -> Option<&MinigameAllowance> {
        self.minigames.iter().find(|a| a.game == game)
    }

    pub fn allowance_mut(&mut self, game: &str) -> Option<&mut MinigameAllowance> {
        self.minigames.iter_mut().find(|a| a.game == game)
    }
}

// ============================================================================
// Ownership rows
// ============================================================================

/// One purchase. Buying the same item twice yields two entries; recycling
/// removes exactly one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryEntry {
    pub id: u64,
    pub owner: String,
    pub item_id: u32,
    pub acquired_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl InventoryEntry {
    pub fn new(id: u64, owner: &str, item_id: u32) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            item_id,
            acquired_at: Utc::now(),
            schema_version: INVENTORY_SCHEMA_VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdoptedPetRecord {
    pub id: u64,
    pub owner: String,
    pub species: String,
    /// User-chosen display name, 4..=20 characters.
    pub name: String,
    pub adopted_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl AdoptedPetRecord {
    pub fn new(id: u64, owner: &str, species: &str, name: &str) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            species: species.to_string(),
            name: name.to_string(),
            adopted_at: Utc::now(),
            schema_version: PET_SCHEMA_VERSION,
        }
    }
}

// ============================================================================
// Forum records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicRecord {
    pub id: u64,
    /// Globally unique (case-insensitive).
    pub title: String,
    pub description: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl TopicRecord {
    pub fn new(id: u64, title: &str, description: &str, author: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
            schema_version: TOPIC_SCHEMA_VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: u64,
    pub topic_id: u64,
    /// `None` for a topic-level (root) comment.
    pub parent_id: Option<u64>,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl CommentRecord {
    pub fn new(id: u64, topic_id: u64, parent_id: Option<u64>, author: &str, text: &str) -> Self {
        Self {
            id,
            topic_id,
            parent_id,
            author: author.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
            schema_version: COMMENT_SCHEMA_VERSION,
        }
    }
}
