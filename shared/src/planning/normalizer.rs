//! Row normalizer: raw spreadsheet rows into validated item records

use crate::columns::{Column, ColumnMap};
use crate::error::ValidationError;
use crate::models::{ItemRecord, RawTable};
use crate::validation::{
    validate_average_sales, validate_moq, validate_non_negative, validate_required_text,
};

/// Validate and coerce every data row of `table`.
///
/// Blank rows and repeated header rows are skipped. The first invalid row
/// aborts the whole dataset.
pub fn normalize(table: &RawTable) -> Result<Vec<ItemRecord>, ValidationError> {
    let columns = ColumnMap::resolve(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (index, row) in table.rows.iter().enumerate() {
        if is_blank(row) || is_repeated_header(row, &columns) {
            continue;
        }
        records.push(normalize_row(row, index + 1, &columns)?);
    }
    Ok(records)
}

fn normalize_row(
    row: &[String],
    row_number: usize,
    columns: &ColumnMap,
) -> Result<ItemRecord, ValidationError> {
    let number = |column: Column| validate_non_negative(cell(row, columns, column), row_number, column);

    Ok(ItemRecord {
        item_code: validate_required_text(cell(row, columns, Column::Item), row_number, Column::Item)?,
        model: cell(row, columns, Column::Model).to_string(),
        supplier: cell(row, columns, Column::Supplier).to_string(),
        order_quantity: number(Column::Quantity)?,
        unit_price: number(Column::UnitPrice)?,
        stock_on_hand: number(Column::TotalStock)?,
        in_transit: number(Column::InTransit)?,
        avg_monthly_sales: validate_average_sales(cell(row, columns, Column::AverageSales), row_number)?,
        volume_cbm: number(Column::Volume)?,
        moq: validate_moq(cell(row, columns, Column::Moq), row_number)?,
    })
}

fn cell<'a>(row: &'a [String], columns: &ColumnMap, column: Column) -> &'a str {
    row.get(columns.index(column))
        .map(|value| value.trim())
        .unwrap_or("")
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|value| value.trim().is_empty())
}

fn is_repeated_header(row: &[String], columns: &ColumnMap) -> bool {
    Column::Item.matches(cell(row, columns, Column::Item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn headers() -> Vec<String> {
        [
            "Item",
            "Model",
            "Supplier",
            "Quantity",
            "Unit Price",
            "Total Stock",
            "In Transit",
            "Average Sales",
            "Volume",
            "MOQ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_valid_rows() {
        let table = RawTable::new(
            headers(),
            vec![
                row(&["ITEM001", "DM-1000", "Supplier A", "100", "150.00", "45", "20", "15", "0.05", "50"]),
                row(&["ITEM002", "OS-200", "Supplier B", "50", "800", "12", "5", "3", "0.15", "10"]),
            ],
        );
        let records = normalize(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item_code, "ITEM001");
        assert_eq!(records[0].unit_price, Decimal::from(150));
        assert_eq!(records[0].available_stock(), Some(Decimal::from(65)));
        assert_eq!(records[1].moq, 10);
    }

    #[test]
    fn test_normalize_skips_blank_and_repeated_header_rows() {
        let table = RawTable::new(
            headers(),
            vec![
                row(&["ITEM001", "M", "S", "1", "1", "1", "0", "1", "0", "1"]),
                row(&["", "", "", "", "", "", "", "", "", ""]),
                row(&["Item", "Model", "Supplier", "Quantity", "Unit Price", "Total Stock", "In Transit", "Average Sales", "Volume", "MOQ"]),
                row(&["ITEM002", "M", "S", "1", "1", "1", "0", "1", "0", "1"]),
            ],
        );
        assert_eq!(normalize(&table).unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_allows_duplicate_item_codes() {
        let table = RawTable::new(
            headers(),
            vec![
                row(&["ITEM001", "A", "S", "1", "1", "1", "0", "1", "0", "1"]),
                row(&["ITEM001", "B", "S", "1", "1", "1", "0", "1", "0", "1"]),
            ],
        );
        assert_eq!(normalize(&table).unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_row_numbers_count_skipped_rows() {
        let table = RawTable::new(
            headers(),
            vec![
                row(&["", "", "", "", "", "", "", "", "", ""]),
                row(&["ITEM001", "M", "S", "1", "1", "1", "0", "n/a", "0", "1"]),
            ],
        );
        assert_eq!(
            normalize(&table).unwrap_err(),
            ValidationError::NotNumeric {
                row: 2,
                column: Column::AverageSales,
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn test_normalize_short_row_reports_missing_value() {
        let table = RawTable::new(headers(), vec![row(&["ITEM001", "M", "S", "1"])]);
        assert_eq!(
            normalize(&table).unwrap_err(),
            ValidationError::MissingValue {
                row: 1,
                column: Column::UnitPrice
            }
        );
    }

    #[test]
    fn test_normalize_rejects_zero_moq() {
        let table = RawTable::new(
            headers(),
            vec![row(&["ITEM001", "M", "S", "1", "1", "1", "0", "1", "0", "0"])],
        );
        let err = normalize(&table).unwrap_err();
        assert_eq!(err.row(), Some(1));
        assert_eq!(err.column(), Column::Moq);
    }

    #[test]
    fn test_normalize_rejects_missing_item_code() {
        let table = RawTable::new(
            headers(),
            vec![row(&["  ", "M", "S", "1", "1", "1", "0", "1", "0", "1"])],
        );
        assert_eq!(
            normalize(&table).unwrap_err(),
            ValidationError::MissingValue {
                row: 1,
                column: Column::Item
            }
        );
    }

    #[test]
    fn test_normalize_missing_column() {
        let table = RawTable::new(vec!["Item".to_string()], vec![]);
        assert!(matches!(
            normalize(&table),
            Err(ValidationError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_out_of_range_values() {
        let table = RawTable::new(
            headers(),
            vec![
                row(&["ITEM001", "M", "S", "1", "1", "1", "0", "1", "0", "1"]),
                row(&["ITEM002", "M", "S", "1", "1", "5e28", "5e28", "1", "0", "1"]),
            ],
        );
        let err = normalize(&table).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { row: 2, .. }));
        assert_eq!(err.column(), Column::TotalStock);

        let table = RawTable::new(
            headers(),
            vec![row(&["ITEM001", "M", "S", "1", "1", "1000", "0", "0.0000000000000000000000000001", "0", "1"])],
        );
        let err = normalize(&table).unwrap_err();
        assert_eq!(err.row(), Some(1));
        assert_eq!(err.column(), Column::AverageSales);
    }
}
