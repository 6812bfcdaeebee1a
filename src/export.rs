//! Excel export functionality.

use crate::models::audit::AuditLog;
use crate::models::contract::Contract;
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

fn write_headers(worksheet: &mut Worksheet, headers: &[(&str, f64)]) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, (header, width)) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

/// Export the contract list to an Excel file.
pub fn export_contracts_to_excel(contracts: &[Contract], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Contratos")?;

    let money_format = Format::new().set_num_format("R$ #,##0.00");

    let headers = [
        ("Número", 16.0),
        ("Objeto", 40.0),
        ("Empresa", 30.0),
        ("Status", 12.0),
        ("Valor", 16.0),
        ("Início", 12.0),
        ("Término", 12.0),
    ];
    write_headers(worksheet, &headers)?;

    for (idx, contract) in contracts.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &contract.number)?;
        worksheet.write_string(row, 1, &contract.title)?;
        worksheet.write_string(row, 2, contract.company_name.as_deref().unwrap_or(""))?;
        worksheet.write_string(row, 3, contract.status.label())?;
        worksheet.write_number_with_format(row, 4, contract.total_value, &money_format)?;
        worksheet.write_string(
            row,
            5,
            contract.start_date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default(),
        )?;
        worksheet.write_string(
            row,
            6,
            contract.end_date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default(),
        )?;
    }

    if !contracts.is_empty() {
        worksheet.autofilter(0, 0, contracts.len() as u32, (headers.len() - 1) as u16)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Export audit entries to an Excel file. Timestamps are written in local time.
pub fn export_audit_logs_to_excel(logs: &[AuditLog], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Auditoria")?;

    let headers = [
        ("Data/Hora", 20.0),
        ("Usuário", 25.0),
        ("Ação", 14.0),
        ("Entidade", 20.0),
        ("ID", 8.0),
        ("Detalhes", 60.0),
        ("IP", 16.0),
    ];
    write_headers(worksheet, &headers)?;

    for (idx, log) in logs.iter().enumerate() {
        let row = (idx + 1) as u32;
        let local = log.created_at.with_timezone(&Local);

        worksheet.write_string(row, 0, local.format("%d/%m/%Y %H:%M:%S").to_string())?;
        worksheet.write_string(row, 1, log.user_name.as_deref().unwrap_or("Sistema"))?;
        worksheet.write_string(row, 2, &log.action)?;
        worksheet.write_string(row, 3, &log.entity)?;
        match log.entity_id {
            Some(id) => worksheet.write_number(row, 4, id as f64)?,
            None => worksheet.write_string(row, 4, "")?,
        };
        worksheet.write_string(row, 5, log.details_summary())?;
        worksheet.write_string(row, 6, log.ip_address.as_deref().unwrap_or(""))?;
    }

    if !logs.is_empty() {
        worksheet.autofilter(0, 0, logs.len() as u32, (headers.len() - 1) as u16)?;
    }

    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Planilhas Excel", &["xlsx"])
        .save_file()
}

/// Open file dialog for a spreadsheet to import.
pub fn show_open_spreadsheet_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Planilhas", &crate::import_wizard::ALLOWED_EXTENSIONS)
        .pick_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contract::ContractStatus;

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("contratos");
        assert!(name.starts_with("contratos_"));
        assert!(name.ends_with(".xlsx"));
    }

    #[test]
    fn test_export_contracts_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contratos.xlsx");
        let contracts = vec![Contract {
            id: 1,
            number: "CT-001".to_string(),
            title: "Pavimentação".to_string(),
            description: None,
            company_id: None,
            company_name: Some("Construtora Alfa".to_string()),
            status: ContractStatus::Active,
            total_value: 1500.0,
            start_date: None,
            end_date: None,
            created_at: None,
        }];

        export_contracts_to_excel(&contracts, &path).unwrap();
        assert!(path.exists());
    }
}
