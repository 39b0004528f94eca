//! End-to-end scenarios exercised through `NodeFacade`, driven by an
//! in-process Raft engine double that commits immediately.

mod support;

use std::collections::BTreeMap;

use raftkv_api::facade::{NodeFacade, NodeFacadeImpl};
use raftkv_core::table::TableMeta;
use raftkv_core::{AttributeValue, CommandLogEntry, Item};

use support::{Fixture, InProcessRaftEngine};

fn attr_map(pairs: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn music_schema() -> TableMeta {
    TableMeta::new("Music", "Artist", Some("SongTitle".to_string()))
}

/// S1 - basic replication: a write committed by one node's FSM is visible
/// to a second node's FSM once it replays the same committed entry.
#[tokio::test]
async fn s1_basic_replication() {
    let fx = Fixture::new(0);
    let facade = NodeFacadeImpl::new(fx.engine.clone(), fx.fsm.clone());

    facade.propose_create_table(music_schema()).await.unwrap();
    let item = Item::new(attr_map(&[
        ("Artist", AttributeValue::S("Journey".into())),
        ("SongTitle", AttributeValue::S("Don't Stop Believin'".into())),
        ("Album", AttributeValue::S("Escape".into())),
        ("Year", AttributeValue::N(1981.0)),
    ]));
    facade.propose_put_item("Music".to_string(), item.clone()).await.unwrap();

    // Simulate node1 catching up by replaying the same committed log.
    let replica = Fixture::replay_onto(
        1,
        &[
            (1, CommandLogEntry::CreateTable { schema: music_schema() }),
            (2, CommandLogEntry::PutItem { table: "Music".to_string(), item: item.clone() }),
        ],
    );

    let key = attr_map(&[
        ("Artist", AttributeValue::S("Journey".into())),
        ("SongTitle", AttributeValue::S("Don't Stop Believin'".into())),
    ]);
    let key_item = Item::new(key);
    let fetched = replica.store().get(1, "Music", &raftkv_core::ItemKey::derive(&music_schema(), &key_item).unwrap()).unwrap();
    assert_eq!(fetched, Some(item));
}

/// S2 - a follower-role engine rejects writes with `NotLeader`, carrying
/// the leader hint, before ever touching the FSM.
#[tokio::test]
async fn s2_follower_write_rejection() {
    struct FollowerEngine(InProcessRaftEngine);

    #[async_trait::async_trait]
    impl raftkv_raft::RaftEngine for FollowerEngine {
        fn node_id(&self) -> u64 {
            self.0.node_id()
        }
        async fn propose(&self, _command: raftkv_core::CommandLogEntry) -> raftkv_core::RaftKvResult<raftkv_core::CommandResult> {
            Err(raftkv_core::RaftKvError::not_leader(Some(0), Some("127.0.0.1:8000".to_string())))
        }
        fn is_leader(&self) -> bool {
            false
        }
        fn current_leader(&self) -> Option<(u64, Option<String>)> {
            Some((0, Some("127.0.0.1:8000".to_string())))
        }
        fn current_term(&self) -> u64 {
            1
        }
        fn role_name(&self) -> String {
            "follower".to_string()
        }
        async fn initialize(&self, _members: BTreeMap<u64, String>) -> raftkv_core::RaftKvResult<()> {
            Ok(())
        }
        async fn add_voter(&self, _node_id: u64, _addr: String) -> raftkv_core::RaftKvResult<()> {
            Ok(())
        }
    }

    let fx = Fixture::new(1);
    let engine = std::sync::Arc::new(FollowerEngine(InProcessRaftEngine::new(1, fx.fsm.clone())));
    let facade = NodeFacadeImpl::new(engine, fx.fsm.clone());

    let item = Item::new(attr_map(&[("Artist", AttributeValue::S("Journey".into()))]));
    let err = facade.propose_put_item("Music".to_string(), item).await.unwrap_err();
    assert!(err.is_not_leader());

    assert!(fx.fsm.tables().get("Music").is_none());
}

/// S4 - LWW skip: a stale replay can never regress a record to an older
/// committed version, regardless of delivery order.
#[tokio::test]
async fn s4_lww_skip_keeps_higher_commit_index() {
    let fx = Fixture::new(0);
    fx.fsm.apply(1, CommandLogEntry::CreateTable { schema: music_schema() });

    let first = Item::new(attr_map(&[
        ("Artist", AttributeValue::S("Journey".into())),
        ("SongTitle", AttributeValue::S("Don't Stop Believin'".into())),
        ("Album", AttributeValue::S("Escape".into())),
    ]));
    let second = Item::new(attr_map(&[
        ("Artist", AttributeValue::S("Journey".into())),
        ("SongTitle", AttributeValue::S("Don't Stop Believin'".into())),
        ("Album", AttributeValue::S("Greatest Hits".into())),
    ]));

    // Apply the higher-index command first, then replay the stale one.
    fx.fsm.apply(3, CommandLogEntry::PutItem { table: "Music".to_string(), item: second.clone() });
    fx.fsm.apply(2, CommandLogEntry::PutItem { table: "Music".to_string(), item: first });

    let key_item = Item::new(attr_map(&[
        ("Artist", AttributeValue::S("Journey".into())),
        ("SongTitle", AttributeValue::S("Don't Stop Believin'".into())),
    ]));
    let key = raftkv_core::ItemKey::derive(&music_schema(), &key_item).unwrap();
    let stored = fx.fsm.store().get(0, "Music", &key).unwrap().unwrap();
    assert_eq!(stored, second);
}

/// S5 - query by partition key returns every item sharing it, regardless
/// of sort key.
#[tokio::test]
async fn s5_query_by_partition_key() {
    let fx = Fixture::new(0);
    fx.fsm.apply(1, CommandLogEntry::CreateTable { schema: music_schema() });

    let songs = [
        ("Journey", "Don't Stop Believin'"),
        ("Journey", "Separate Ways"),
        ("Queen", "Bohemian Rhapsody"),
    ];
    for (i, (artist, title)) in songs.iter().enumerate() {
        let item = Item::new(attr_map(&[
            ("Artist", AttributeValue::S((*artist).to_string())),
            ("SongTitle", AttributeValue::S((*title).to_string())),
        ]));
        fx.fsm.apply(2 + i as u64, CommandLogEntry::PutItem { table: "Music".to_string(), item });
    }

    let journey_items = fx.fsm.store().query(0, "Music", "Journey").unwrap();
    assert_eq!(journey_items.len(), 2);
    for item in &journey_items {
        assert_eq!(item.get("Artist"), Some(&AttributeValue::S("Journey".to_string())));
    }
}

/// S6 - deleting a table removes its schema and every one of its items.
#[tokio::test]
async fn s6_delete_table_cascades() {
    let fx = Fixture::new(0);
    fx.fsm.apply(1, CommandLogEntry::CreateTable { schema: music_schema() });
    let item = Item::new(attr_map(&[
        ("Artist", AttributeValue::S("Journey".into())),
        ("SongTitle", AttributeValue::S("Don't Stop Believin'".into())),
    ]));
    fx.fsm.apply(2, CommandLogEntry::PutItem { table: "Music".to_string(), item });

    let result = fx.fsm.apply(3, CommandLogEntry::DeleteTable { table: "Music".to_string() });
    assert_eq!(result, raftkv_core::CommandResult::TableDeleted);

    assert!(fx.fsm.tables().get("Music").is_none());
    let items = fx.fsm.store().query(0, "Music", "Journey");
    assert!(items.is_err() || items.unwrap().is_empty());
}

/// Property 5: deleting an absent key is not an error.
#[tokio::test]
async fn idempotent_delete_on_absent_key() {
    let fx = Fixture::new(0);
    fx.fsm.apply(1, CommandLogEntry::CreateTable { schema: music_schema() });

    let key_item = Item::new(attr_map(&[
        ("Artist", AttributeValue::S("Nobody".into())),
        ("SongTitle", AttributeValue::S("Nothing".into())),
    ]));
    let result = fx.fsm.apply(2, CommandLogEntry::DeleteItem { table: "Music".to_string(), key_item });
    assert_eq!(result, raftkv_core::CommandResult::ItemDeleted);
}
