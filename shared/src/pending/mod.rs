pub mod pending_creation_table;
