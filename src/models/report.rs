//! Modelo de reportes de checklist
//!
//! Plantillas dinámicas de preguntas por unidad, un reporte diario por unidad
//! y entradas validadas según el tipo de pregunta.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Respuestas válidas para preguntas Bueno/Malo
pub const ANSWER_GOOD: &str = "Bueno";
pub const ANSWER_BAD: &str = "Malo";

/// Tipo de pregunta
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Bueno/Malo
    GoodBad = 1,
    /// Opciones predefinidas
    MultipleChoice = 2,
    /// Numérico
    Numeric = 3,
}

/// Pregunta de la plantilla dinámica de reportes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportTemplateItem {
    pub id: Uuid,
    pub label: String,
    pub question_type: QuestionType,
    pub category_id: Uuid,
}

/// Opción disponible para preguntas de opción múltiple
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportItemOption {
    pub id: Uuid,
    pub question_id: Uuid,
    pub value: String,
    pub triggers_alert: bool,
}

/// Regla de alerta para respuestas numéricas.
/// Se activa cuando el valor cae bajo el mínimo o sobre el máximo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NumericAlertRule {
    pub id: Uuid,
    pub question_id: Uuid,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub description: String,
}

impl NumericAlertRule {
    /// Devuelve true si el valor viola alguna condición de la regla
    pub fn is_triggered(&self, value: &str) -> bool {
        let val: f64 = match value.trim().parse() {
            Ok(v) => v,
            Err(_) => return false,
        };

        if let Some(min) = self.min_value {
            if val < min as f64 {
                return true;
            }
        }
        if let Some(max) = self.max_value {
            if val > max as f64 {
                return true;
            }
        }
        false
    }
}

/// Reporte diario de una unidad. Único por (unidad, fecha).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub date: NaiveDate,
    pub author_id: Uuid,
    pub comment: Option<String>,
    pub editable: bool,
    pub created_at: DateTime<Utc>,
}

/// Entrada de checklist. Única por (reporte, pregunta).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportEntry {
    pub id: Uuid,
    pub report_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub comment: Option<String>,
}

/// Valida una respuesta según el tipo de pregunta.
///
/// - Bueno/Malo: conjunto cerrado {"Bueno", "Malo"}
/// - Opción múltiple: pertenencia a las opciones configuradas
/// - Numérica: la respuesta debe parsear como número
pub fn validate_answer(
    question_type: QuestionType,
    answer: &str,
    options: &[ReportItemOption],
) -> Result<(), String> {
    let val = answer.trim();

    match question_type {
        QuestionType::GoodBad => {
            if val == ANSWER_GOOD || val == ANSWER_BAD {
                Ok(())
            } else {
                Err(format!(
                    "Para preguntas Bueno/Malo la respuesta debe ser \"{}\" o \"{}\".",
                    ANSWER_GOOD, ANSWER_BAD
                ))
            }
        }
        QuestionType::MultipleChoice => {
            if options.iter().any(|option| option.value == val) {
                Ok(())
            } else {
                let values: Vec<&str> =
                    options.iter().map(|option| option.value.as_str()).collect();
                Err(format!(
                    "Respuesta inválida. Debe ser una de: {}",
                    values.join(", ")
                ))
            }
        }
        QuestionType::Numeric => {
            if val.parse::<f64>().is_ok() {
                Ok(())
            } else {
                Err("Para preguntas numéricas la respuesta debe ser un número.".to_string())
            }
        }
    }
}

/// Determina si una respuesta debe generar alerta según el tipo de pregunta
pub fn should_trigger_alert(
    question_type: QuestionType,
    answer: &str,
    options: &[ReportItemOption],
    rules: &[NumericAlertRule],
) -> bool {
    let val = answer.trim();

    match question_type {
        QuestionType::GoodBad => val == ANSWER_BAD,
        QuestionType::MultipleChoice => options
            .iter()
            .any(|option| option.value == val && option.triggers_alert),
        QuestionType::Numeric => rules.iter().any(|rule| rule.is_triggered(val)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: &str, triggers_alert: bool) -> ReportItemOption {
        ReportItemOption {
            id: Uuid::new_v4(),
            question_id: Uuid::new_v4(),
            value: value.to_string(),
            triggers_alert,
        }
    }

    fn rule(min: Option<i64>, max: Option<i64>) -> NumericAlertRule {
        NumericAlertRule {
            id: Uuid::new_v4(),
            question_id: Uuid::new_v4(),
            min_value: min,
            max_value: max,
            description: "Presión fuera de rango".to_string(),
        }
    }

    #[test]
    fn test_good_bad_answers() {
        assert!(validate_answer(QuestionType::GoodBad, "Bueno", &[]).is_ok());
        assert!(validate_answer(QuestionType::GoodBad, " Malo ", &[]).is_ok());
        assert!(validate_answer(QuestionType::GoodBad, "Regular", &[]).is_err());
        assert!(validate_answer(QuestionType::GoodBad, "", &[]).is_err());
    }

    #[test]
    fn test_multiple_choice_membership() {
        let options = vec![option("Lleno", false), option("Medio", false), option("Vacío", true)];
        assert!(validate_answer(QuestionType::MultipleChoice, "Medio", &options).is_ok());
        assert!(validate_answer(QuestionType::MultipleChoice, "Otro", &options).is_err());
    }

    #[test]
    fn test_numeric_parsing() {
        assert!(validate_answer(QuestionType::Numeric, "42", &[]).is_ok());
        assert!(validate_answer(QuestionType::Numeric, "3.5", &[]).is_ok());
        assert!(validate_answer(QuestionType::Numeric, "-10", &[]).is_ok());
        assert!(validate_answer(QuestionType::Numeric, "cuarenta", &[]).is_err());
    }

    #[test]
    fn test_alert_on_bad_answer() {
        assert!(should_trigger_alert(QuestionType::GoodBad, "Malo", &[], &[]));
        assert!(!should_trigger_alert(QuestionType::GoodBad, "Bueno", &[], &[]));
    }

    #[test]
    fn test_alert_on_flagged_option() {
        let options = vec![option("Lleno", false), option("Vacío", true)];
        assert!(should_trigger_alert(QuestionType::MultipleChoice, "Vacío", &options, &[]));
        assert!(!should_trigger_alert(QuestionType::MultipleChoice, "Lleno", &options, &[]));
    }

    #[test]
    fn test_numeric_rule_ranges() {
        let bounded = rule(Some(30), Some(60));
        assert!(bounded.is_triggered("20"));
        assert!(bounded.is_triggered("75"));
        assert!(!bounded.is_triggered("45"));

        let only_min = rule(Some(10), None);
        assert!(only_min.is_triggered("5"));
        assert!(!only_min.is_triggered("50"));

        // Valores no numéricos nunca activan la regla
        assert!(!bounded.is_triggered("abc"));
    }

    #[test]
    fn test_alert_on_any_rule() {
        let rules = vec![rule(Some(30), None), rule(None, Some(100))];
        assert!(should_trigger_alert(QuestionType::Numeric, "20", &[], &rules));
        assert!(should_trigger_alert(QuestionType::Numeric, "150", &[], &rules));
        assert!(!should_trigger_alert(QuestionType::Numeric, "50", &[], &rules));
    }
}
