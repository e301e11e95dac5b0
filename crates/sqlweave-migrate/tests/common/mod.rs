#![allow(dead_code)]

use sqlweave_migrate::prelude::*;

pub fn kinds(alterations: &[Alteration]) -> Vec<&'static str> {
    alterations.iter().map(Alteration::kind).collect()
}

/// `T(id int, name text)` with a unique index on `name`.
pub fn people_v1() -> Table {
    Table::new("T")
        .column(Column::new("id", "int").not_null())
        .column(Column::new("name", "text"))
        .index(TableIndex::unique("UQ", ["name"]))
}

/// `T(id int, name text not null, age int)` with the same unique index.
pub fn people_v2() -> Table {
    Table::new("T")
        .column(Column::new("id", "int").not_null())
        .column(Column::new("name", "text").not_null())
        .column(Column::new("age", "int"))
        .index(TableIndex::unique("UQ", ["name"]))
}

pub fn database(tables: Vec<Table>) -> Database {
    Database::new().schema(tables.into_iter().fold(Schema::new("public"), Schema::table))
}
