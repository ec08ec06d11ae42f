use crate::types::{Mutation, MutationBatch, MutationOp};

/// Renders mutations as CQL against the compact-storage layout
/// `(key, column1, value)` of a dynamic column family
pub struct QueryBuilder;

impl QueryBuilder {
    fn blob(bytes: &[u8]) -> String {
        format!("0x{}", hex::encode(bytes))
    }

    fn table(keyspace: &str, column_family: &str) -> String {
        format!("{}.\"{}\"", keyspace, column_family.replace('"', "\"\""))
    }

    /// Build the statement for a single mutation
    pub fn build_statement(keyspace: &str, mutation: &Mutation) -> String {
        let table = Self::table(keyspace, &mutation.column_family);
        let key = Self::blob(&mutation.key);

        match &mutation.op {
            MutationOp::Insert(column) => {
                let mut query = format!(
                    "INSERT INTO {} (key, column1, value) VALUES ({}, {}, {}) USING TIMESTAMP {}",
                    table,
                    key,
                    Self::blob(&column.name),
                    Self::blob(&column.value),
                    column.clock
                );
                if let Some(ttl) = column.ttl {
                    query.push_str(&format!(" AND TTL {}", ttl));
                }
                query
            }
            MutationOp::DeleteColumn { name, clock } => format!(
                "DELETE FROM {} USING TIMESTAMP {} WHERE key = {} AND column1 = {}",
                table,
                clock,
                key,
                Self::blob(name)
            ),
            MutationOp::DeleteRow { clock } => format!(
                "DELETE FROM {} USING TIMESTAMP {} WHERE key = {}",
                table, clock, key
            ),
        }
    }

    /// Build an unlogged batch covering every mutation in order
    pub fn build_batch(keyspace: &str, batch: &MutationBatch) -> String {
        let statements = batch
            .iter()
            .map(|mutation| Self::build_statement(keyspace, mutation))
            .collect();
        Self::build_batch_statements(statements)
    }

    pub fn build_batch_statements(queries: Vec<String>) -> String {
        let mut batch = String::from("BEGIN UNLOGGED BATCH\n");
        for query in queries {
            batch.push_str(&format!("  {};\n", query));
        }
        batch.push_str("APPLY BATCH;");
        batch
    }
}
