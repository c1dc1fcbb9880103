//! CSV export backend - one file per table in the output directory

use super::{ExportBackend, ExportError};
use crate::aggregate::{AggregateTable, ServerSnapshot};
use crate::decode::flatten::MAX_SEGMENTS;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: PathBuf) -> Result<Self, ExportError> {
        std::fs::create_dir_all(&dir)?;
        log::info!("📝 Writing CSV exports to: {}", dir.display());
        Ok(Self { dir })
    }

    fn write_stats(&self, table: &AggregateTable) -> Result<(), ExportError> {
        let mut out = BufWriter::new(File::create(self.dir.join("stats.csv"))?);

        let mut header = vec![
            "category".to_string(),
            "subcategory".to_string(),
            "metric".to_string(),
        ];
        header.extend(table.columns().iter().cloned());
        write_row(&mut out, &header)?;

        for (key, cells) in table.rows() {
            let mut row = Vec::with_capacity(MAX_SEGMENTS + table.column_count());
            for i in 0..MAX_SEGMENTS {
                row.push(key.segments().get(i).cloned().unwrap_or_default());
            }
            for column in table.columns() {
                row.push(cells.get(column).copied().unwrap_or(0).to_string());
            }
            write_row(&mut out, &row)?;
        }

        out.flush()?;
        Ok(())
    }

    fn write_advancements(&self, table: &AggregateTable) -> Result<(), ExportError> {
        let mut out = BufWriter::new(File::create(self.dir.join("advancements.csv"))?);

        let mut header = vec!["advancement".to_string()];
        header.extend(table.columns().iter().cloned());
        write_row(&mut out, &header)?;

        for (key, cells) in table.rows() {
            let mut row = vec![key.to_string()];
            for column in table.columns() {
                row.push(cells.get(column).copied().unwrap_or(0).to_string());
            }
            write_row(&mut out, &row)?;
        }

        out.flush()?;
        Ok(())
    }

    fn write_economy(&self, snapshot: &ServerSnapshot) -> Result<(), ExportError> {
        let mut out = BufWriter::new(File::create(self.dir.join("economy.csv"))?);
        write_row(
            &mut out,
            &["player".to_string(), "money".to_string(), "waystones".to_string()],
        )?;

        let economy = &snapshot.economy;
        let players: BTreeSet<&String> = economy
            .money()
            .keys()
            .chain(economy.waystones().keys())
            .collect();

        for player in players {
            let money = economy.money().get(player).copied().unwrap_or(0);
            let waystones = economy.waystones().get(player).copied().unwrap_or(0);
            write_row(
                &mut out,
                &[player.clone(), money.to_string(), waystones.to_string()],
            )?;
        }

        out.flush()?;
        Ok(())
    }
}

impl ExportBackend for CsvExporter {
    fn write_snapshot(&mut self, snapshot: &ServerSnapshot) -> Result<(), ExportError> {
        self.write_stats(&snapshot.stats)?;
        self.write_advancements(&snapshot.advancements)?;
        self.write_economy(snapshot)?;
        log::info!(
            "✅ CSV export complete: {} stat rows, {} advancement rows, {} economy rows",
            snapshot.stats.row_count(),
            snapshot.advancements.row_count(),
            snapshot.economy.len()
        );
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "CSV"
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[String]) -> Result<(), ExportError> {
    let line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{}", line)?;
    Ok(())
}

/// Quote a field when it contains a delimiter, quote or newline.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{merge_stats, EconomyLedger};
    use crate::decode::{EconomyRecord, StatRecord};
    use crate::decode::RowKey;
    use std::collections::BTreeMap;

    fn snapshot() -> ServerSnapshot {
        let mut stats = AggregateTable::new();
        let mut record = StatRecord::default();
        record.values = BTreeMap::from([(RowKey::from_dotted("stats.cat.m"), 5)]);
        merge_stats(&mut stats, &record, "Alice");

        let mut other = StatRecord::default();
        other.values = BTreeMap::from([(RowKey::from_dotted("stats.cat.n"), 2)]);
        merge_stats(&mut stats, &other, "Bob");
        stats.fill_missing(0);

        let mut economy = EconomyLedger::new();
        economy.record(
            "Alice",
            &EconomyRecord {
                money: 12,
                waystone_count: 1,
            },
        );

        ServerSnapshot {
            stats,
            advancements: AggregateTable::new(),
            economy,
        }
    }

    #[test]
    fn test_stats_csv_layout_and_fill() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = CsvExporter::new(dir.path().to_path_buf()).unwrap();
        exporter.write_snapshot(&snapshot()).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("stats.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "category,subcategory,metric,Alice,Bob");
        // outer-join cell for Bob on Alice's row is written as 0
        assert!(lines.contains(&"stats,cat,m,5,0"));
        assert!(lines.contains(&"stats,cat,n,0,2"));
    }

    #[test]
    fn test_economy_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = CsvExporter::new(dir.path().to_path_buf()).unwrap();
        exporter.write_snapshot(&snapshot()).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("economy.csv")).unwrap();
        assert!(contents.contains("Alice,12,1"));
    }

    #[test]
    fn test_field_escaping() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
