use std::io::Write;

use ionfeat::PropertyTable;

use crate::util::text::truncate;

const INDENT: &str = "  ";

const KEY_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 44;

/// Writes a summary box for one property preset.
pub fn print_preset(out: &mut impl Write, table: &PropertyTable) -> std::io::Result<()> {
    let columns = if table.cation_properties().is_empty() {
        "none".to_string()
    } else {
        table.cation_properties().join(", ")
    };

    let rows = [
        ("Elements", table.element_count().to_string()),
        ("Cation columns", columns),
        (
            "Citation",
            table.citation().unwrap_or("none").to_string(),
        ),
    ];

    print_kv_table(out, &format!("Preset: {}", table.name()), &rows)
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) -> std::io::Result<()> {
    let k_line = "─".repeat(KEY_WIDTH + 2);
    let v_line = "─".repeat(VALUE_WIDTH + 2);

    writeln!(out, "{}┌─ {} ─┐", INDENT, truncate(title, KEY_WIDTH + VALUE_WIDTH))?;
    writeln!(out, "{}┌{}┬{}┐", INDENT, k_line, v_line)?;

    for (key, val) in rows {
        writeln!(
            out,
            "{}│ {:<key_w$} │ {:<val_w$} │",
            INDENT,
            truncate(key, KEY_WIDTH),
            truncate(val, VALUE_WIDTH),
            key_w = KEY_WIDTH,
            val_w = VALUE_WIDTH
        )?;
    }

    writeln!(out, "{}└{}┴{}┘", INDENT, k_line, v_line)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_box_lists_cation_columns() {
        let table = PropertyTable::preset("deml").unwrap();
        let mut buf = Vec::new();
        print_preset(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Preset: deml"));
        assert!(text.contains("total_ioniz"));
    }

    #[test]
    fn preset_without_columns_says_none() {
        let table = PropertyTable::preset("pymatgen").unwrap();
        let mut buf = Vec::new();
        print_preset(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("│ Cation columns     │ none"));
    }
}
