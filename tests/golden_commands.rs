//! Golden tests for rendered syncer commands.
//!
//! A reference configuration must produce exactly these command strings;
//! any drift in flag order or quoting is a behavior change for every
//! deployment that runs them.

use std::collections::BTreeMap;

use portside::config::SyncerEntry;
use portside::environment::Environment;
use portside::syncers::default_registry;

fn syncers_config() -> BTreeMap<String, SyncerEntry> {
    serde_yaml_ng::from_str(
        r#"
mariadb:
  config:
    hostname: db
    username: app
    password: secret
    port: "3306"
    database: appdb
    ignore_tables: [cache]
postgres:
  config:
    hostname: pg
    username: app
    password: secret
    port: "5432"
    database: appdb
mongodb:
  config:
    hostname: mongo
    port: "27017"
    database: appdb
"#,
    )
    .unwrap()
}

fn rendered(syncer_id: &str, transfer_name: &str) -> (String, String) {
    let mut syncer = default_registry()
        .resolve(syncer_id, &syncers_config())
        .unwrap();
    syncer.set_transfer_name(transfer_name);

    let remote_env = Environment::new("acme", "production");
    let local_env = Environment::local("acme");

    let dump = syncer.remote_commands(&remote_env)[0].get_command().unwrap();
    let restore = syncer.local_commands(&local_env)[0].get_command().unwrap();
    (dump, restore)
}

#[test]
fn golden_mariadb_commands() {
    let (dump, restore) = rendered("mariadb", "/tmp/appdb.sql");
    insta::assert_snapshot!(
        dump,
        @"mysqldump -hdb -uapp -psecret -P3306 --ignore-table=appdb.cache appdb > /tmp/appdb.sql"
    );
    insta::assert_snapshot!(
        restore,
        @"mysql -hdb -uapp -psecret -P3306 appdb < /tmp/appdb.sql"
    );
}

#[test]
fn golden_postgres_commands() {
    let (dump, restore) = rendered("postgres", "/tmp/appdb.sql");
    insta::assert_snapshot!(
        dump,
        @"PGPASSWORD=secret pg_dump -hpg -Uapp -p5432 -dappdb --no-owner -f /tmp/appdb.sql"
    );
    insta::assert_snapshot!(
        restore,
        @"PGPASSWORD=secret psql -hpg -Uapp -p5432 -dappdb -f /tmp/appdb.sql"
    );
}

#[test]
fn golden_mongodb_commands() {
    let (dump, restore) = rendered("mongodb", "/tmp/appdb.archive");
    insta::assert_snapshot!(
        dump,
        @"mongodump --host mongo --port 27017 --db appdb --archive=/tmp/appdb.archive"
    );
    insta::assert_snapshot!(
        restore,
        @"mongorestore --host mongo --port 27017 --drop --archive=/tmp/appdb.archive"
    );
}
