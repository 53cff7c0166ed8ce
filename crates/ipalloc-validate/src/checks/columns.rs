//! Column contract of the output tables.

use ipalloc_model::Issue;
use ipalloc_transform::OutputFrame;

/// One issue per required column the frame lacks.
pub fn check_columns(frame: &OutputFrame) -> Vec<Issue> {
    let present = frame.data.get_column_names_owned();
    frame
        .table
        .columns()
        .iter()
        .filter(|required| !present.iter().any(|name| name.as_str() == **required))
        .map(|missing| Issue::MissingColumn {
            table: frame.name(),
            column: (*missing).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_transform::OutputTable;
    use polars::prelude::{Column, DataFrame};

    #[test]
    fn reports_each_missing_column() {
        let df = DataFrame::new(vec![
            Column::new("RIR".into(), vec!["APNIC"]),
            Column::new("ipv4".into(), vec![1u64]),
        ])
        .expect("frame");
        let issues = check_columns(&OutputFrame::new(OutputTable::RirShares, df));
        assert_eq!(
            issues,
            vec![
                Issue::MissingColumn {
                    table: "rir_shares".to_string(),
                    column: "Countries".to_string(),
                },
                Issue::MissingColumn {
                    table: "rir_shares".to_string(),
                    column: "percentv4".to_string(),
                },
            ]
        );
    }
}
