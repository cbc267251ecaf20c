use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::options::{CATEGORY_OPTIONS, PAYMENT_OPTIONS, RESPONSIBLE_OPTIONS};

pub fn run() -> Result<()> {
    for set in [PAYMENT_OPTIONS, CATEGORY_OPTIONS, RESPONSIBLE_OPTIONS] {
        let mut table = Table::new();
        table.set_header(vec!["#", "Value"]);
        for (i, value) in set.values.iter().enumerate() {
            let marker = if i == 0 { format!("{} (default)", i + 1) } else { (i + 1).to_string() };
            table.add_row(vec![Cell::new(marker), Cell::new(value)]);
        }
        let mut title = set.label.to_string();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        println!("{title}\n{table}\n");
    }
    Ok(())
}
