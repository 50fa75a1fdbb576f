//! 出力ブックのシリアライズ

pub mod excel_core;

pub use excel_core::{build_workbook, generate_excel_buffer};
