//! Forum tree: topics with globally unique titles, and comments nested at
//! most [`MAX_NESTING_LEVEL`] parent hops below their root.
//!
//! A comment's nesting level is never cached; it is recomputed by walking
//! parent references on every reply attempt. Deletions collect the full
//! descendant subtree first and remove the whole id set in one commit.

use log::info;

use crate::game::errors::GameError;
use crate::game::storage::{abort, tx_insert, tx_remove, GameStore};
use crate::game::types::{CommentRecord, TopicRecord, MAX_NESTING_LEVEL};
use crate::logutil::escape_log;
use crate::metrics;
use crate::validation::sanitize_text;

pub const TOPIC_TITLE_MAX: usize = 120;
pub const TOPIC_DESCRIPTION_MAX: usize = 2000;
pub const COMMENT_TEXT_MAX: usize = 2000;

/// Create a topic. Titles are globally unique (case-insensitive); a clash
/// is reported with the exact message the topic form shows.
pub fn create_topic(
    store: &GameStore,
    author: &str,
    title: &str,
    description: &str,
) -> Result<TopicRecord, GameError> {
    let title = sanitize_text(title, TOPIC_TITLE_MAX)
        .map_err(|e| GameError::Validation(e.to_string()))?
        .trim()
        .to_string();
    if title.is_empty() {
        return Err(GameError::Validation("Title cannot be empty.".to_string()));
    }
    let description = sanitize_text(description, TOPIC_DESCRIPTION_MAX)
        .map_err(|e| GameError::Validation(e.to_string()))?
        .trim()
        .to_string();
    if description.is_empty() {
        return Err(GameError::Validation(
            "Description cannot be empty.".to_string(),
        ));
    }

    let topic_id = store.next_id()?;
    let record = TopicRecord::new(topic_id, &title, &description, author);
    let topic_key = GameStore::topic_key(topic_id);
    let title_key = GameStore::topic_title_key(&title);
    let title_value = topic_id.to_string().into_bytes();

    store.commit_with_retry("create_topic", |tx| {
        if tx.get(&title_key)?.is_some() {
            return Err(abort(GameError::Duplicate(
                "Topic already exists.".to_string(),
            )));
        }
        tx_insert(tx, &topic_key, &record)?;
        tx.insert(title_key.clone(), title_value.clone())?;
        Ok(())
    })?;

    info!(
        "{} created topic {} ({})",
        escape_log(author),
        topic_id,
        escape_log(&title)
    );
    Ok(record)
}

/// Number of parent hops from `comment` to its topic-level root.
pub fn nesting_level(store: &GameStore, comment: &CommentRecord) -> Result<u32, GameError> {
    let mut level = 0u32;
    let mut current = comment.parent_id;
    while let Some(parent_id) = current {
        level += 1;
        current = store.get_comment(parent_id)?.parent_id;
    }
    Ok(level)
}

/// Post a comment, optionally as a reply. A reply may only attach to a
/// parent sitting above the maximum depth, so no comment ever exceeds
/// [`MAX_NESTING_LEVEL`].
pub fn post_comment(
    store: &GameStore,
    author: &str,
    topic_id: u64,
    parent_id: Option<u64>,
    text: &str,
) -> Result<CommentRecord, GameError> {
    let text = sanitize_text(text, COMMENT_TEXT_MAX)
        .map_err(|e| GameError::Validation(e.to_string()))?
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(GameError::Validation(
            "Comment cannot be empty.".to_string(),
        ));
    }

    store.get_topic(topic_id)?;
    if let Some(pid) = parent_id {
        let parent = store.get_comment(pid)?;
        if parent.topic_id != topic_id {
            return Err(GameError::Validation(
                "Parent comment belongs to a different topic.".to_string(),
            ));
        }
        if nesting_level(store, &parent)? >= MAX_NESTING_LEVEL {
            return Err(GameError::Validation(format!(
                "Comments cannot be nested more than {} levels deep.",
                MAX_NESTING_LEVEL
            )));
        }
    }

    let comment_id = store.next_id()?;
    let record = CommentRecord::new(comment_id, topic_id, parent_id, author, &text);
    let comment_key = GameStore::comment_key(comment_id);
    let topic_key = GameStore::topic_key(topic_id);

    store.commit_with_retry("post_comment", |tx| {
        // The topic (and parent, for replies) may vanish between the checks
        // above and this commit.
        if tx.get(&topic_key)?.is_none() {
            return Err(abort(GameError::NotFound(format!("topic: {}", topic_id))));
        }
        if let Some(pid) = parent_id {
            if tx.get(GameStore::comment_key(pid))?.is_none() {
                return Err(abort(GameError::NotFound(format!("comment: {}", pid))));
            }
        }
        tx_insert(tx, &comment_key, &record)?;
        Ok(())
    })?;

    metrics::record_comment_posted();
    Ok(record)
}

/// All descendant comment ids of `comment_id`, post-order (each subtree's
/// leaves before their parent).
pub(crate) fn collect_descendant_ids(
    store: &GameStore,
    comment_id: u64,
) -> Result<Vec<u64>, GameError> {
    let mut ids = Vec::new();
    collect_into(store, comment_id, &mut ids)?;
    Ok(ids)
}

fn collect_into(store: &GameStore, comment_id: u64, out: &mut Vec<u64>) -> Result<(), GameError> {
    for child in store.list_children(comment_id)? {
        collect_into(store, child.id, out)?;
        out.push(child.id);
    }
    Ok(())
}

/// Delete a comment and its whole reply subtree. Only the author may
/// delete; the removal of all N descendants plus the comment itself is one
/// commit. Returns the number of comments removed.
pub fn delete_comment(
    store: &GameStore,
    acting_user: &str,
    comment_id: u64,
) -> Result<usize, GameError> {
    let comment = store.get_comment(comment_id)?;
    if !comment.author.eq_ignore_ascii_case(acting_user) {
        return Err(GameError::PermissionDenied(
            "Only the author can delete this comment.".to_string(),
        ));
    }

    let mut ids = collect_descendant_ids(store, comment_id)?;
    ids.push(comment_id);
    let keys: Vec<Vec<u8>> = ids.iter().map(|id| GameStore::comment_key(*id)).collect();

    store.commit_with_retry("delete_comment", |tx| {
        for key in &keys {
            tx_remove(tx, key)?;
        }
        Ok(())
    })?;

    info!(
        "{} deleted comment {} ({} comments removed)",
        escape_log(acting_user),
        comment_id,
        ids.len()
    );
    Ok(ids.len())
}

/// Delete a topic and every comment attached to it. Only the topic's owner
/// may delete. Returns the number of rows removed (topic plus comments).
pub fn delete_topic(
    store: &GameStore,
    acting_user: &str,
    topic_id: u64,
) -> Result<usize, GameError> {
    let topic = store.get_topic(topic_id)?;
    if !topic.author.eq_ignore_ascii_case(acting_user) {
        return Err(GameError::PermissionDenied(
            "Only the owner can delete this topic.".to_string(),
        ));
    }

    let comments = store.list_comments_for_topic(topic_id)?;
    let mut keys: Vec<Vec<u8>> = comments
        .iter()
        .map(|c| GameStore::comment_key(c.id))
        .collect();
    keys.push(GameStore::topic_key(topic_id));
    keys.push(GameStore::topic_title_key(&topic.title));

    store.commit_with_retry("delete_topic", |tx| {
        for key in &keys {
            tx_remove(tx, key)?;
        }
        Ok(())
    })?;

    info!(
        "{} deleted topic {} ({} comments removed)",
        escape_log(acting_user),
        topic_id,
        comments.len()
    );
    Ok(comments.len() + 1)
}
