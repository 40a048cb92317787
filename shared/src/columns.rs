//! Canonical spreadsheet columns and the header aliases each one accepts
//!
//! Purchasing spreadsheets arrive with headers in English or Portuguese,
//! often with embedded line breaks (`Estoque\nTotal `). Headers are compared
//! after [`normalize_header`], so `In Transit\nShipt` and `in_transit_shipt`
//! resolve to the same column.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The ten columns every purchasing dataset must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Item,
    Model,
    Supplier,
    Quantity,
    UnitPrice,
    TotalStock,
    InTransit,
    AverageSales,
    Volume,
    Moq,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Item,
        Column::Model,
        Column::Supplier,
        Column::Quantity,
        Column::UnitPrice,
        Column::TotalStock,
        Column::InTransit,
        Column::AverageSales,
        Column::Volume,
        Column::Moq,
    ];

    /// Display label used in error messages and exports
    pub fn label(&self) -> &'static str {
        match self {
            Column::Item => "Item",
            Column::Model => "Model",
            Column::Supplier => "Supplier",
            Column::Quantity => "Quantity",
            Column::UnitPrice => "Unit Price",
            Column::TotalStock => "Total Stock",
            Column::InTransit => "In Transit",
            Column::AverageSales => "Average Sales",
            Column::Volume => "Volume",
            Column::Moq => "MOQ",
        }
    }

    /// Header spellings accepted for this column
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Item => &["Item", "Item Code", "Código", "Codigo"],
            Column::Model => &["Model", "Modelo", "Produto", "Product"],
            Column::Supplier => &["Supplier", "Fornecedor"],
            Column::Quantity => &["Quantity", "Qty", "QTD", "Qtd Atual"],
            Column::UnitPrice => &[
                "Unit Price",
                "Price",
                "Preço FOB Unitário",
                "Preco FOB Unitario",
                "Preço Unitário",
                "Preco Unitario",
                "Preço FOB",
                "Preço Unit.",
                "Preço FOB Unit",
                "FOB Unit",
            ],
            Column::TotalStock => &["Total Stock", "Stock", "Estoque Total", "Estoque"],
            Column::InTransit => &[
                "In Transit",
                "In-Transit",
                "In Transit Shipt",
                "Em Trânsito",
                "Em Transito",
            ],
            Column::AverageSales => &[
                "Average Sales",
                "Avg Sales",
                "Vendas Médias",
                "Vendas Medias",
            ],
            Column::Volume => &["Volume", "CBM"],
            Column::Moq => &["MOQ"],
        }
    }

    /// Check a raw header against this column's aliases
    pub fn matches(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        !normalized.is_empty()
            && self
                .aliases()
                .iter()
                .any(|alias| normalize_header(alias) == normalized)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lowercase a header and collapse whitespace and underscores to single spaces
pub fn normalize_header(header: &str) -> String {
    header
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Position of each canonical column within a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; 10],
}

impl ColumnMap {
    /// Resolve every canonical column against a header row.
    ///
    /// The first header matching a column wins; unknown headers are ignored.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, ValidationError> {
        let mut indices = [0usize; 10];
        for column in Column::ALL {
            let position = headers
                .iter()
                .position(|header| column.matches(header.as_ref()))
                .ok_or(ValidationError::MissingColumn { column })?;
            indices[column as usize] = position;
        }
        Ok(Self { indices })
    }

    /// Index of `column` within the header row
    pub fn index(&self, column: Column) -> usize {
        self.indices[column as usize]
    }
}
