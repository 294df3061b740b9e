use chrono::{DateTime, Utc};
use rqlmap::{Config, Db, SqliteClient};
use std::path::Path;

mod records {
    include!(concat!(env!("OUT_DIR"), "/records.rs"));
}

use records::{Membership, MembershipList, Role, User, UserList};

fn main() {
    env_logger::init();
    log::info!("Starting rqlmap basic-crud example");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Open the database named by `RQLMAP_DB`, or an in-memory one, and make
/// sure the tables exist.
fn open() -> rqlmap::Result<Db<SqliteClient>> {
    let client = match std::env::var("RQLMAP_DB") {
        Ok(path) => {
            log::info!("Opening database at: {path}");
            SqliteClient::open(Path::new(&path))?
        }
        Err(_) => SqliteClient::open_in_memory()?,
    };
    let config = Config {
        debug: std::env::var("RQLMAP_DEBUG").is_ok(),
    };
    let db = Db::new(client, config);
    db.create_table(&Role::default())?;
    db.create_table(&User::default())?;
    db.create_table(&Membership::default())?;
    Ok(db)
}

fn now() -> DateTime<Utc> {
    // the store keeps whole seconds
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default()
}

fn run() -> rqlmap::Result<()> {
    let db = open()?;

    let mut admin = Role {
        name: "admin".to_string(),
        ..Default::default()
    };
    db.add(&mut admin)?;
    log::info!("added role {} as id {}", admin.name, admin.id);

    let mut ringo = User {
        username: "ringo".to_string(),
        email: "ringo@example.com".to_string(),
        role: admin.id,
        last_seen: now(),
        ..Default::default()
    };
    db.add(&mut ringo)?;
    let mut paul = User {
        username: "paul".to_string(),
        email: "paul@example.com".to_string(),
        role: admin.id,
        ..Default::default()
    };
    db.add(&mut paul)?;

    ringo.email = "starr@example.com".to_string();
    db.update(&ringo)?;

    let mut loaded = User {
        id: ringo.id,
        ..Default::default()
    };
    db.load_self(&mut loaded)?;
    println!("reloaded: {loaded:?}");

    for group in ["drums", "vocals"] {
        let mut membership = Membership {
            user_id: ringo.id,
            group: group.to_string(),
            level: 1,
            ..Default::default()
        };
        db.save(&mut membership)?;
    }

    let mut users: UserList = Vec::new();
    db.list_query(&mut users, "order by username")?;
    for user in &users {
        println!("{:>3} {:<8} {}", user.id, user.username, user.email);
    }

    let mut memberships: MembershipList = Vec::new();
    db.list_query(&mut memberships, &format!("user_id = {}", ringo.id))?;
    println!("{} is in {} groups", ringo.username, memberships.len());

    db.delete(&paul)?;
    match db.load_self(&mut paul) {
        Err(e) if e.is_no_rows() => println!("{} is gone", paul.username),
        other => other?,
    }
    Ok(())
}
