//! CSV input model

pub mod csv_row;

pub use csv_row::{parse_center_rows, CenterRow, NumberedRow};
