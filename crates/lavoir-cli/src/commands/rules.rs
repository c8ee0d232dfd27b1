//! Rules command: list the predefined cleaning catalog.

use lavoir::error::Result;
use lavoir::rules::predefined_rules;

use crate::table;

pub fn run() -> Result<()> {
    let headers = vec![
        "ID".to_string(),
        "NAME".to_string(),
        "KIND".to_string(),
        "COLUMN".to_string(),
        "VALUE".to_string(),
    ];

    let rows: Vec<Vec<String>> = predefined_rules()
        .iter()
        .map(|def| {
            vec![
                def.id.to_string(),
                def.name.clone(),
                format!("{:?}", def.rule.kind),
                def.rule.column.clone(),
                def.rule.value.clone().unwrap_or_default(),
            ]
        })
        .collect();

    table::print_table(&headers, &rows);
    Ok(())
}
