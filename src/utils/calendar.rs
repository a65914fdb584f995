//! Grilla de calendario para los reportes diarios
//!
//! Genera las celdas del calendario mensual de una unidad: días con reporte,
//! días pasados sin reporte y días futuros deshabilitados.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Celda de la grilla mensual
#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell {
    /// Día del mes; `None` para las celdas de relleno
    pub day: Option<u32>,
    pub css_class: String,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<Uuid>,
}

impl CalendarCell {
    fn empty() -> Self {
        Self {
            day: None,
            css_class: "empty-day".to_string(),
            disabled: true,
            report_id: None,
        }
    }
}

/// Nombres de meses para los encabezados de navegación
pub const MESES_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Cantidad de días del mes indicado
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("mes válido");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("mes válido");
    next.signed_duration_since(first).num_days() as u32
}

/// Genera las celdas del calendario para `(year, month)`.
///
/// La semana comienza en lunes. Se rellenan celdas vacías antes del día 1
/// y al final hasta completar un múltiplo de 7.
pub fn month_cells(
    year: i32,
    month: u32,
    today: NaiveDate,
    reports_by_day: &HashMap<u32, Uuid>,
) -> Vec<CalendarCell> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("mes válido");
    let first_weekday = first.weekday().num_days_from_monday();
    let num_days = days_in_month(year, month);

    let mut cells = Vec::with_capacity(42);

    for _ in 0..first_weekday {
        cells.push(CalendarCell::empty());
    }

    for day in 1..=num_days {
        let current = NaiveDate::from_ymd_opt(year, month, day).expect("día válido");
        let mut css_class = String::from("day");
        let mut disabled = false;
        let mut report_id = None;

        if current == today {
            css_class.push_str(" today");
        }

        if let Some(id) = reports_by_day.get(&day) {
            css_class.push_str(" done");
            report_id = Some(*id);
        } else if current < today {
            css_class.push_str(" missing");
        } else {
            disabled = true;
        }

        cells.push(CalendarCell {
            day: Some(day),
            css_class,
            disabled,
            report_id,
        });
    }

    while cells.len() % 7 != 0 {
        cells.push(CalendarCell::empty());
    }

    cells
}

/// Navegación mes anterior / mes siguiente
pub fn adjacent_months(year: i32, month: u32) -> ((i32, u32), (i32, u32)) {
    let prev = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
    let next = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_cells_multiple_of_seven() {
        for month in 1..=12 {
            let cells = month_cells(2025, month, date(2025, 6, 15), &HashMap::new());
            assert_eq!(cells.len() % 7, 0, "mes {}", month);
        }
    }

    #[test]
    fn test_done_missing_and_future() {
        let today = date(2025, 6, 15);
        let mut reports = HashMap::new();
        let report_id = Uuid::new_v4();
        reports.insert(10, report_id);

        let cells = month_cells(2025, 6, today, &reports);
        let days: Vec<&CalendarCell> = cells.iter().filter(|c| c.day.is_some()).collect();

        let done = days.iter().find(|c| c.day == Some(10)).unwrap();
        assert!(done.css_class.contains("done"));
        assert_eq!(done.report_id, Some(report_id));

        let missing = days.iter().find(|c| c.day == Some(5)).unwrap();
        assert!(missing.css_class.contains("missing"));

        let future = days.iter().find(|c| c.day == Some(20)).unwrap();
        assert!(future.disabled);

        let today_cell = days.iter().find(|c| c.day == Some(15)).unwrap();
        assert!(today_cell.css_class.contains("today"));
    }

    #[test]
    fn test_adjacent_months_wraps_year() {
        assert_eq!(adjacent_months(2025, 1), ((2024, 12), (2025, 2)));
        assert_eq!(adjacent_months(2025, 12), ((2025, 11), (2026, 1)));
    }
}
