//! Hand-written records shaped like generated ones, shared by unit tests.

use crate::record::Record;
use crate::value::{Receiver, ToValue, Value};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestStruct {
    pub id: i64,
    pub name: String,
    pub kind: i32,
    pub data: String,
    pub when: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Record for TestStruct {
    fn table_name(&self) -> &'static str {
        "test_structs"
    }

    fn key_names(&self) -> &'static [&'static str] {
        &["id"]
    }

    fn key_fields(&self) -> &'static [&'static str] {
        &["id"]
    }

    fn key_values(&self) -> Vec<Value> {
        vec![self.id.to_value()]
    }

    fn names(&self) -> &'static [&'static str] {
        &["id", "name", "kind", "data", "when", "modified"]
    }

    fn select_fields(&self) -> &'static str {
        "id,name,kind,data,ts,modified"
    }

    fn insert_fields(&self) -> &'static str {
        "name,kind,data,ts"
    }

    fn insert_values(&self) -> Vec<Value> {
        vec![
            self.name.to_value(),
            self.kind.to_value(),
            self.data.to_value(),
            self.when.to_value(),
        ]
    }

    fn update_values(&self) -> Vec<Value> {
        let mut values = self.insert_values();
        values.extend(self.key_values());
        values
    }

    fn receivers(&mut self) -> Vec<&mut dyn Receiver> {
        vec![
            &mut self.id as &mut dyn Receiver,
            &mut self.name as &mut dyn Receiver,
            &mut self.kind as &mut dyn Receiver,
            &mut self.data as &mut dyn Receiver,
            &mut self.when as &mut dyn Receiver,
            &mut self.modified as &mut dyn Receiver,
        ]
    }

    fn primary(&self) -> Option<i64> {
        Some(self.id)
    }

    fn set_primary(&mut self, id: i64) {
        self.id = id;
    }

    fn sql_create(&self) -> &'static str {
        "create table if not exists test_structs (\n  id integer primary key,\n  name text,\n  kind integer,\n  data text,\n  ts datetime,\n  modified datetime default current_timestamp\n);"
    }
}

/// Composite key of an integer and a text column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HasMany {
    pub id: i64,
    pub family: String,
    pub name: String,
    pub kind: i32,
}

impl Record for HasMany {
    fn table_name(&self) -> &'static str {
        "families"
    }

    fn key_names(&self) -> &'static [&'static str] {
        &["id", "family"]
    }

    fn key_fields(&self) -> &'static [&'static str] {
        &["id", "family"]
    }

    fn key_values(&self) -> Vec<Value> {
        vec![self.id.to_value(), self.family.to_value()]
    }

    fn names(&self) -> &'static [&'static str] {
        &["id", "family", "name", "kind"]
    }

    fn select_fields(&self) -> &'static str {
        "id,family,name,kind"
    }

    fn insert_fields(&self) -> &'static str {
        "name,kind"
    }

    fn insert_values(&self) -> Vec<Value> {
        vec![self.name.to_value(), self.kind.to_value()]
    }

    fn update_values(&self) -> Vec<Value> {
        let mut values = self.insert_values();
        values.extend(self.key_values());
        values
    }

    fn receivers(&mut self) -> Vec<&mut dyn Receiver> {
        vec![
            &mut self.id as &mut dyn Receiver,
            &mut self.family as &mut dyn Receiver,
            &mut self.name as &mut dyn Receiver,
            &mut self.kind as &mut dyn Receiver,
        ]
    }

    fn primary(&self) -> Option<i64> {
        None
    }

    fn set_primary(&mut self, _id: i64) {}

    fn sql_create(&self) -> &'static str {
        "create table if not exists families (\n  id integer,\n  family text,\n  name text,\n  kind integer,\n  primary key (id, family)\n);"
    }
}

/// No key at all
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    pub body: String,
}

impl Record for Note {
    fn table_name(&self) -> &'static str {
        "notes"
    }

    fn key_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn key_fields(&self) -> &'static [&'static str] {
        &[]
    }

    fn key_values(&self) -> Vec<Value> {
        Vec::new()
    }

    fn names(&self) -> &'static [&'static str] {
        &["body"]
    }

    fn select_fields(&self) -> &'static str {
        "body"
    }

    fn insert_fields(&self) -> &'static str {
        "body"
    }

    fn insert_values(&self) -> Vec<Value> {
        vec![self.body.to_value()]
    }

    fn update_values(&self) -> Vec<Value> {
        self.insert_values()
    }

    fn receivers(&mut self) -> Vec<&mut dyn Receiver> {
        vec![&mut self.body as &mut dyn Receiver]
    }

    fn primary(&self) -> Option<i64> {
        None
    }

    fn set_primary(&mut self, _id: i64) {}

    fn sql_create(&self) -> &'static str {
        "create table if not exists notes (\n  body text\n);"
    }
}
