use std::path::Path;

use anyhow::{bail, Result};
use authdb_schema::catalog::{self, TableDef};
use authdb_schema::{ddl, Backend};

use crate::output::{print_json, OutputFormat};

/// Run the `schema` command.
pub fn run_schema(config_path: &Path, backend: Option<Backend>) -> Result<()> {
    let backend = match backend {
        Some(backend) => backend,
        None => authdb_runtime_config::load_with_env(config_path)?.schema.backend,
    };
    tracing::debug!(%backend, "rendering schema");
    print!("{}", ddl::render_script(backend));
    Ok(())
}

/// Run the `describe` command.
pub fn run_describe(table: Option<&str>, format: OutputFormat) -> Result<()> {
    let tables = select_tables(table)?;
    match format {
        OutputFormat::Json => print_json(&tables),
        OutputFormat::Text => {
            for (i, def) in tables.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", describe_text(def));
            }
            Ok(())
        }
    }
}

fn select_tables(name: Option<&str>) -> Result<Vec<&'static TableDef>> {
    let Some(name) = name else {
        return Ok(catalog::tables().iter().collect());
    };
    match catalog::table(name) {
        Some(def) => Ok(vec![def]),
        None => {
            let known: Vec<_> = catalog::tables().iter().map(|t| t.name).collect();
            bail!("unknown table '{name}' (expected one of: {})", known.join(", "))
        }
    }
}

fn describe_text(def: &TableDef) -> String {
    let width = def.columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let mut out = format!("{}\n", def.name);
    for col in def.columns {
        let mut flags = Vec::new();
        if col.primary_key {
            flags.push("primary key".to_string());
        }
        if col.not_null {
            flags.push("not null".to_string());
        }
        if col.unique {
            flags.push("unique".to_string());
        }
        if let Some(fk) = def.foreign_key_for(col.name) {
            flags.push(format!(
                "-> {}.{} on delete {}",
                fk.references_table,
                fk.references_column,
                fk.on_delete.as_sql().to_lowercase()
            ));
        }
        out.push_str(&format!(
            "  {:<width$}  {:<9}  {}\n",
            col.name,
            col.kind.as_str(),
            flags.join(", ")
        ));
    }
    for idx in def.indexes {
        out.push_str(&format!("  index {} ({})\n", idx.name, idx.columns.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_lists_known_names() {
        let err = select_tables(Some("widgets")).unwrap_err().to_string();
        assert!(err.contains("widgets"));
        assert!(err.contains("users, sessions, accounts, verifications, subscriptions"));
    }

    #[test]
    fn no_filter_selects_every_table() {
        assert_eq!(select_tables(None).unwrap().len(), 5);
    }

    #[test]
    fn sessions_text_shows_cascade_and_indexes() {
        let text = describe_text(&catalog::SESSIONS);
        assert!(text.starts_with("sessions\n"));
        assert!(text.contains("-> users.id on delete cascade"));
        assert!(text.contains("index user_id_idx_sessions (user_id)"));
        assert!(text.contains("index token_idx (token)"));
    }
}
