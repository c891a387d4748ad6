//! `obt list` rendering.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};
use obt_schema::InstallRecord;

/// Build the URL / TAG / PATH table for the given records.
pub fn history_table(records: &[InstallRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["URL", "TAG", "PATH"]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.source_url),
            Cell::new(&record.release_tag),
            Cell::new(record.install_path.display()),
        ]);
    }

    table
}
