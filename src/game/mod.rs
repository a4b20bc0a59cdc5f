//! Lamoland game model and persistence.
//! Everything touching a balance, an inventory row, a pet, or the forum tree
//! lives here; the web layer calls in through these functions and never
//! reaches into the Sled trees directly.

pub mod allowance;
pub mod avatar;
pub mod catalog;
pub mod errors;
pub mod forum;
pub mod gifting;
pub mod ledger;
pub mod storage;
pub mod types;

pub use allowance::{award, reset_if_new_day, AwardOutcome};
pub use avatar::{remove_avatars, save_avatar, AvatarKind, MAX_AVATAR_BYTES};
pub use catalog::{
    default_items, default_species, list_items_grouped_by_base_id, list_species, STARTER_ITEM_IDS,
};
pub use errors::GameError;
pub use forum::{
    create_topic, delete_comment, delete_topic, nesting_level, post_comment, COMMENT_TEXT_MAX,
    TOPIC_DESCRIPTION_MAX, TOPIC_TITLE_MAX,
};
pub use gifting::{gift_state, send_gift, GiftState};
pub use ledger::{
    adopt_pet, delete_account, purchase_item, recycle_item, register_user, release_pet,
    set_user_password, verify_password, AdoptionOutcome, PurchaseOutcome,
};
pub use storage::{GameStore, GameStoreBuilder, RetryPolicy};
pub use types::*;
