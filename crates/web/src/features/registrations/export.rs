use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, Table, TableCell, TableRow};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use storage::{dto::registration::RegistrationDetailResponse, models::Gender};

use crate::error::WebError;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const ATHLETE_HEADERS: [&str; 6] = ["№", "ФИО", "ИИН", "Дата рождения", "Пол", "Тренер"];
const JUDGE_HEADERS: [&str; 4] = ["№", "ФИО", "Категория", "Регион"];

/// Everything a printable snapshot of a registration shows.
pub struct RegistrationExport {
    pub detail: RegistrationDetailResponse,
    pub submitted_by: String,
}

impl RegistrationExport {
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.detail.registration.registration_number, extension)
    }

    /// Label/value pairs of the header block, in display order.
    fn info_rows(&self) -> Vec<(&'static str, String)> {
        let registration = &self.detail.registration;
        let tournament = &self.detail.tournament;

        let mut rows = vec![
            ("Номер заявки", registration.registration_number.clone()),
            ("Статус", registration.status.label_ru().to_string()),
            ("Регион", registration.region_name.clone()),
            ("Турнир", tournament.title.clone()),
            ("Категория", self.detail.category.label()),
            ("Место проведения", tournament.location.clone()),
            ("Дата турнира", tournament.start_date.format("%d.%m.%Y").to_string()),
            ("Дата подачи", registration.created_at.format("%d.%m.%Y").to_string()),
            ("Подал", self.submitted_by.clone()),
        ];

        if let Some(approved_at) = registration.approved_at {
            rows.push(("Одобрено", approved_at.format("%d.%m.%Y").to_string()));
            rows.push(("Одобрил", registration.approved_by.clone().unwrap_or_default()));
        }

        if let Some(reason) = &registration.rejection_reason {
            rows.push(("Причина отклонения", reason.clone()));
        }

        rows
    }

    fn athlete_rows(&self) -> Vec<[String; 6]> {
        self.detail
            .athletes
            .iter()
            .enumerate()
            .map(|(idx, a)| {
                [
                    (idx + 1).to_string(),
                    a.athlete_name.clone(),
                    a.athlete_iin.clone().unwrap_or_default(),
                    a.athlete_dob
                        .map(|d| d.format("%d.%m.%Y").to_string())
                        .unwrap_or_default(),
                    gender_label(a.athlete_gender).to_string(),
                    a.coach_name.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }

    fn judge_rows(&self) -> Vec<[String; 4]> {
        self.detail
            .judges
            .iter()
            .enumerate()
            .map(|(idx, j)| {
                [
                    (idx + 1).to_string(),
                    j.judge_name.clone(),
                    j.judge_category.clone(),
                    j.region_name
                        .clone()
                        .unwrap_or_else(|| self.detail.registration.region_name.clone()),
                ]
            })
            .collect()
    }
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Мужской",
        Gender::Female => "Женский",
    }
}

fn xlsx_error(error: XlsxError) -> WebError {
    WebError::InternalServerError(format!("Failed to build workbook: {}", error))
}

/// Workbook with Info, Athletes and Judges sheets.
pub fn to_xlsx(export: &RegistrationExport) -> Result<Vec<u8>, WebError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Информация").map_err(xlsx_error)?;
        sheet.set_column_width(0, 25).map_err(xlsx_error)?;
        sheet.set_column_width(1, 50).map_err(xlsx_error)?;
        sheet
            .write_string_with_format(0, 0, "Заявка на турнир", &bold)
            .map_err(xlsx_error)?;

        for (row, (label, value)) in (2u32..).zip(export.info_rows()) {
            sheet
                .write_string_with_format(row, 0, label, &bold)
                .map_err(xlsx_error)?;
            sheet.write_string(row, 1, &value).map_err(xlsx_error)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Спортсмены").map_err(xlsx_error)?;
        for (col, width) in (0u16..).zip([5, 30, 15, 15, 10, 30]) {
            sheet.set_column_width(col, width).map_err(xlsx_error)?;
        }
        write_table(sheet, &ATHLETE_HEADERS, &export.athlete_rows(), &bold)?;
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Судьи").map_err(xlsx_error)?;
        for (col, width) in (0u16..).zip([5, 30, 20, 25]) {
            sheet.set_column_width(col, width).map_err(xlsx_error)?;
        }
        write_table(sheet, &JUDGE_HEADERS, &export.judge_rows(), &bold)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn write_table<const N: usize>(
    sheet: &mut rust_xlsxwriter::Worksheet,
    headers: &[&str; N],
    rows: &[[String; N]],
    bold: &Format,
) -> Result<(), WebError> {
    for (col, header) in (0u16..).zip(headers) {
        sheet
            .write_string_with_format(0, col, *header, bold)
            .map_err(xlsx_error)?;
    }

    for (row, cells) in (1u32..).zip(rows) {
        for (col, value) in (0u16..).zip(cells) {
            sheet.write_string(row, col, value).map_err(xlsx_error)?;
        }
    }

    Ok(())
}

/// Word document with a header block and athlete/judge tables.
pub fn to_docx(export: &RegistrationExport) -> Result<Vec<u8>, WebError> {
    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text("ЗАЯВКА НА УЧАСТИЕ В ТУРНИРЕ").bold().size(32)),
        )
        .add_paragraph(Paragraph::new().align(AlignmentType::Center).add_run(
            Run::new().add_text(format!("№ {}", export.detail.registration.registration_number)),
        ));

    for (label, value) in export.info_rows().into_iter().skip(1) {
        let is_rejection = label == "Причина отклонения";
        let mut label_run = Run::new().add_text(format!("{}: ", label)).bold();
        let mut value_run = Run::new().add_text(value);
        if is_rejection {
            label_run = label_run.color("FF0000");
            value_run = value_run.color("FF0000");
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(label_run).add_run(value_run));
    }

    docx = docx
        .add_paragraph(heading("СПОРТСМЕНЫ"))
        .add_table(docx_table(&ATHLETE_HEADERS, &export.athlete_rows()))
        .add_paragraph(heading("СУДЬИ"))
        .add_table(docx_table(&JUDGE_HEADERS, &export.judge_rows()));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| WebError::InternalServerError(format!("Failed to build document: {}", e)))?;

    Ok(buffer.into_inner())
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(28))
}

fn docx_cell(text: &str, bold: bool) -> TableCell {
    let run = Run::new().add_text(if text.is_empty() { "-" } else { text });
    let run = if bold { run.bold() } else { run };
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}

fn docx_table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> Table {
    let mut table_rows = vec![TableRow::new(
        headers.iter().map(|h| docx_cell(h, true)).collect(),
    )];
    table_rows.extend(
        rows.iter()
            .map(|cells| TableRow::new(cells.iter().map(|c| docx_cell(c, false)).collect())),
    );
    Table::new(table_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use storage::models::{
        AgeCategory, AthleteRegistration, BowType, Registration, RegistrationJudge,
        RegistrationStatus, Tournament, TournamentCategory,
    };
    use uuid::Uuid;

    fn export(status: RegistrationStatus, rejection_reason: Option<&str>) -> RegistrationExport {
        let registration_id = Uuid::new_v4();
        let tournament_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let created_at = NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();

        RegistrationExport {
            detail: RegistrationDetailResponse {
                registration: Registration {
                    registration_id,
                    registration_number: "REG-2025-0007".into(),
                    user_id: Uuid::new_v4(),
                    region_id: Uuid::new_v4(),
                    region_name: "Алматы".into(),
                    tournament_category_id: category_id,
                    status,
                    approved_at: None,
                    approved_by: None,
                    rejection_reason: rejection_reason.map(str::to_string),
                    created_at,
                },
                tournament: Tournament {
                    tournament_id,
                    title: "Чемпионат РК".into(),
                    title_kk: None,
                    title_en: None,
                    description: None,
                    location: "Астана".into(),
                    start_date: Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap(),
                    end_date: Utc.with_ymd_and_hms(2025, 5, 12, 18, 0, 0).unwrap(),
                    is_registration_open: true,
                    registration_deadline: None,
                    organizing_region_id: None,
                    is_featured: false,
                    created_at,
                },
                category: TournamentCategory {
                    tournament_category_id: category_id,
                    tournament_id,
                    category: AgeCategory::Adults,
                    gender: Gender::Male,
                    bow_type: BowType::Recurve,
                },
                athletes: vec![AthleteRegistration {
                    athlete_registration_id: Uuid::new_v4(),
                    registration_id,
                    athlete_id: Uuid::new_v4(),
                    athlete_name: "Иван Петров".into(),
                    athlete_iin: Some("990101300123".into()),
                    athlete_dob: NaiveDate::from_ymd_opt(1999, 1, 1),
                    athlete_gender: Gender::Male,
                    coach_id: None,
                    coach_name: None,
                    created_at,
                }],
                judges: vec![RegistrationJudge {
                    registration_id,
                    judge_id: Uuid::new_v4(),
                    judge_name: "Сергей Ким".into(),
                    judge_category: "National".into(),
                    region_name: None,
                }],
                documents: Vec::new(),
                can_edit: true,
            },
            submitted_by: "almaty_rep".into(),
        }
    }

    #[test]
    fn test_info_rows_follow_status() {
        let pending = export(RegistrationStatus::Pending, None);
        let labels: Vec<&str> = pending.info_rows().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels.first(), Some(&"Номер заявки"));
        assert!(!labels.contains(&"Причина отклонения"));

        let rejected = export(RegistrationStatus::Rejected, Some("Нет медсправки"));
        let rows = rejected.info_rows();
        assert_eq!(
            rows.last(),
            Some(&("Причина отклонения", "Нет медсправки".to_string()))
        );
        assert!(rows.contains(&("Статус", "Отклонено".to_string())));
        assert!(rows.contains(&("Дата турнира", "10.05.2025".to_string())));
    }

    #[test]
    fn test_judge_without_region_falls_back_to_registration_region() {
        let rows = export(RegistrationStatus::Pending, None).judge_rows();
        assert_eq!(rows[0][3], "Алматы");
    }

    #[test]
    fn test_athlete_row_formatting() {
        let rows = export(RegistrationStatus::Pending, None).athlete_rows();
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[0][3], "01.01.1999");
        assert_eq!(rows[0][4], "Мужской");
        assert_eq!(rows[0][5], "");
    }

    #[test]
    fn test_file_name_uses_registration_number() {
        assert_eq!(
            export(RegistrationStatus::Pending, None).file_name("xlsx"),
            "REG-2025-0007.xlsx"
        );
    }

    #[test]
    fn test_exports_are_zip_containers() {
        let export = export(RegistrationStatus::Approved, None);

        let xlsx = to_xlsx(&export).unwrap();
        assert!(xlsx.starts_with(b"PK"));

        let docx = to_docx(&export).unwrap();
        assert!(docx.starts_with(b"PK"));
    }
}
