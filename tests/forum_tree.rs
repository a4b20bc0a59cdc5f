//! Forum topics, nesting limits, and cascade deletion.

mod common;

use lamoland::game::errors::GameError;
use lamoland::game::forum;

#[test]
fn topic_titles_are_globally_unique() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");
    common::register(&store, "bob2");

    forum::create_topic(&store, "alice", "Show off your pets", "Post pics").expect("topic");

    // Same title from another user, different case, still collides.
    let err = forum::create_topic(&store, "bob2", "SHOW OFF YOUR PETS", "Mine too").unwrap_err();
    match err {
        GameError::Duplicate(msg) => assert_eq!(msg, "Topic already exists."),
        other => panic!("Expected Duplicate, got: {:?}", other),
    }
    assert_eq!(store.count_topics().expect("count"), 1);
}

#[test]
fn empty_title_or_description_is_rejected() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    assert!(matches!(
        forum::create_topic(&store, "alice", "   ", "Body"),
        Err(GameError::Validation(_))
    ));
    assert!(matches!(
        forum::create_topic(&store, "alice", "Title", ""),
        Err(GameError::Validation(_))
    ));
    assert_eq!(store.count_topics().expect("count"), 0);
}

#[test]
fn comments_nest_at_most_two_levels_deep() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");
    common::register(&store, "bob2");

    let topic = forum::create_topic(&store, "alice", "Nesting rules", "How deep?").expect("topic");

    // Level 0: top-level comment.
    let root = forum::post_comment(&store, "bob2", topic.id, None, "Top level").expect("root");
    assert_eq!(forum::nesting_level(&store, &root).expect("level"), 0);

    // Level 1: reply to the root.
    let reply =
        forum::post_comment(&store, "alice", topic.id, Some(root.id), "First reply").expect("l1");
    assert_eq!(forum::nesting_level(&store, &reply).expect("level"), 1);

    // Level 2: reply to the reply.
    let deep =
        forum::post_comment(&store, "bob2", topic.id, Some(reply.id), "Second reply").expect("l2");
    assert_eq!(forum::nesting_level(&store, &deep).expect("level"), 2);

    // Level 3 is rejected and no row is written.
    let err = forum::post_comment(&store, "alice", topic.id, Some(deep.id), "Too deep")
        .unwrap_err();
    match err {
        GameError::Validation(msg) => {
            assert_eq!(msg, "Comments cannot be nested more than 2 levels deep.");
        }
        other => panic!("Expected Validation, got: {:?}", other),
    }
    assert_eq!(
        store.list_comments_for_topic(topic.id).expect("list").len(),
        3
    );
}

#[test]
fn reply_parent_must_belong_to_the_same_topic() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    let first = forum::create_topic(&store, "alice", "First topic", "One").expect("topic");
    let second = forum::create_topic(&store, "alice", "Second topic", "Two").expect("topic");
    let comment =
        forum::post_comment(&store, "alice", first.id, None, "On the first").expect("comment");

    let err = forum::post_comment(&store, "alice", second.id, Some(comment.id), "Crossed")
        .unwrap_err();
    assert!(matches!(err, GameError::Validation(_)));
    assert!(store
        .list_comments_for_topic(second.id)
        .expect("list")
        .is_empty());
}

#[test]
fn deleting_a_comment_removes_its_whole_subtree() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");
    common::register(&store, "bob2");

    let topic = forum::create_topic(&store, "alice", "Cascade test", "Body").expect("topic");
    let root = forum::post_comment(&store, "alice", topic.id, None, "Root").expect("root");
    let child_a =
        forum::post_comment(&store, "bob2", topic.id, Some(root.id), "Child A").expect("a");
    forum::post_comment(&store, "alice", topic.id, Some(child_a.id), "Grandchild").expect("g");
    forum::post_comment(&store, "bob2", topic.id, Some(root.id), "Child B").expect("b");
    // A bystander outside the subtree.
    let bystander =
        forum::post_comment(&store, "bob2", topic.id, None, "Unrelated").expect("bystander");

    // Root + two children + one grandchild = 4 rows removed.
    let removed = forum::delete_comment(&store, "alice", root.id).expect("delete");
    assert_eq!(removed, 4);

    let remaining = store.list_comments_for_topic(topic.id).expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, bystander.id);
}

#[test]
fn only_the_author_may_delete_a_comment() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");
    common::register(&store, "bob2");

    let topic = forum::create_topic(&store, "alice", "Ownership", "Body").expect("topic");
    let comment = forum::post_comment(&store, "bob2", topic.id, None, "Mine").expect("comment");

    let err = forum::delete_comment(&store, "alice", comment.id).unwrap_err();
    match err {
        GameError::PermissionDenied(_) => {}
        other => panic!("Expected PermissionDenied, got: {:?}", other),
    }
    assert!(store.get_comment(comment.id).is_ok());
}

#[test]
fn topic_deletion_is_owner_gated_and_cascades() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");
    common::register(&store, "bob2");

    let topic = forum::create_topic(&store, "alice", "Goodbye topic", "Body").expect("topic");
    let root = forum::post_comment(&store, "bob2", topic.id, None, "One").expect("c1");
    forum::post_comment(&store, "alice", topic.id, Some(root.id), "Two").expect("c2");

    // Non-owner cannot delete.
    let err = forum::delete_topic(&store, "bob2", topic.id).unwrap_err();
    assert!(matches!(err, GameError::PermissionDenied(_)));

    // Owner removes the topic and both comments: 3 rows.
    let removed = forum::delete_topic(&store, "alice", topic.id).expect("delete");
    assert_eq!(removed, 3);
    assert!(matches!(
        store.get_topic(topic.id),
        Err(GameError::NotFound(_))
    ));
    assert!(matches!(
        store.get_comment(root.id),
        Err(GameError::NotFound(_))
    ));

    // The title is free again after deletion.
    forum::create_topic(&store, "bob2", "Goodbye topic", "Reborn").expect("title freed");
}

#[test]
fn empty_comment_text_is_rejected() {
    let (_dir, store) = common::open_store();
    common::register(&store, "alice");

    let topic = forum::create_topic(&store, "alice", "Empty comments", "Body").expect("topic");
    let err = forum::post_comment(&store, "alice", topic.id, None, "  \t ").unwrap_err();
    assert!(matches!(err, GameError::Validation(_)));
    assert!(store
        .list_comments_for_topic(topic.id)
        .expect("list")
        .is_empty());
}
