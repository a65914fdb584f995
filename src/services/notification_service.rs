//! Servicio de notificaciones por correo
//!
//! Los envíos son de mejor esfuerzo: un fallo SMTP se registra en el log y
//! se descarta, nunca bloquea la operación principal.

use chrono::{Duration, NaiveDate};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::EnvironmentConfig;

/// Documento por vencer o vencido, para el resumen diario
#[derive(Debug, Clone)]
pub struct ExpiringDocument {
    pub short_name: String,
    pub expiration_date: NaiveDate,
}

/// Construye el transporte SMTP desde la configuración.
/// Sin `SMTP_HOST` no hay transporte y los envíos se omiten.
pub fn build_mailer(config: &EnvironmentConfig) -> Option<SmtpTransport> {
    let host = config.smtp_host.as_deref()?;

    let mut builder = match SmtpTransport::starttls_relay(host) {
        Ok(builder) => builder.port(config.smtp_port),
        Err(e) => {
            tracing::error!("No se pudo configurar SMTP contra '{}': {}", host, e);
            return None;
        }
    };

    if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    Some(builder.build())
}

pub struct NotificationService {
    mailer: Option<SmtpTransport>,
    from: String,
}

impl NotificationService {
    pub fn new(mailer: Option<SmtpTransport>, from: String) -> Self {
        Self { mailer, from }
    }

    /// Envía un correo. Los errores se registran y se descartan.
    pub fn send(&self, to: &str, subject: &str, body: &str) {
        let Some(mailer) = &self.mailer else {
            tracing::debug!("SMTP no configurado; se omite correo a {}", to);
            return;
        };

        let from: Mailbox = match self.from.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::error!("Dirección de origen inválida '{}': {}", self.from, e);
                return;
            }
        };
        let to_mailbox: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::warn!("Dirección de destino inválida '{}': {}", to, e);
                return;
            }
        };

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .body(body.to_string());

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("No se pudo construir el correo para {}: {}", to, e);
                return;
            }
        };

        if let Err(e) = mailer.send(&message) {
            tracing::warn!("Fallo el envío de correo a {}: {}", to, e);
        } else {
            tracing::info!("Correo enviado a {}", to);
        }
    }

    /// Correo de alerta para un reporte con respuestas que llaman la atención
    pub fn send_report_alert(
        &self,
        to: &str,
        unit_number: &str,
        date: NaiveDate,
        alerts: &[(String, String)],
    ) {
        let mut lines = vec![
            format!(
                "El reporte diario de la unidad {} del {} registró respuestas que requieren atención:",
                unit_number,
                date.format("%d/%m/%Y")
            ),
            String::new(),
        ];
        for (question, answer) in alerts {
            lines.push(format!("- {}: {}", question, answer));
        }
        lines.push(String::new());
        lines.push("Este es un mensaje automático. Por favor, no responda a este correo.".to_string());

        self.send(
            to,
            &format!("Alerta de reporte diario - Unidad {}", unit_number),
            &lines.join("\n"),
        );
    }
}

/// Fechas de aviso: 30 y 20 días antes, y cada día desde 14 hasta el mismo día
pub fn notice_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let mut days: Vec<i64> = vec![30, 20];
    days.extend((0..=14).rev());
    days.into_iter()
        .map(|offset| today + Duration::days(offset))
        .collect()
}

/// Redacta el resumen de documentos por vencer y vencidos
pub fn compose_expiration_digest(
    upcoming: &[ExpiringDocument],
    expired: &[ExpiringDocument],
) -> String {
    let mut lines = vec![
        "Estimado(a):".to_string(),
        String::new(),
        "Le informamos que, de acuerdo con los registros del sistema, existen documentos que \
         se encuentran próximos a vencer o ya han vencido. A continuación, se detalla el estado \
         actualizado:"
            .to_string(),
        String::new(),
    ];

    if !upcoming.is_empty() {
        lines.push("Documentos próximos a vencer:".to_string());
        lines.push(String::new());
        for doc in upcoming {
            lines.push(format!(
                "- {} (vence el {})",
                doc.short_name,
                doc.expiration_date.format("%d/%m/%Y")
            ));
        }
        lines.push(String::new());
    }

    if !expired.is_empty() {
        lines.push("Documentos ya vencidos:".to_string());
        lines.push(String::new());
        for doc in expired {
            lines.push(format!(
                "- {} (venció el {})",
                doc.short_name,
                doc.expiration_date.format("%d/%m/%Y")
            ));
        }
        lines.push(String::new());
    }

    lines.push(
        "Le recomendamos revisar y gestionar esta situación a la brevedad para asegurar el \
         cumplimiento de los requisitos correspondientes."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Este es un mensaje automático. Por favor, no responda a este correo.".to_string());
    lines.push("Atentamente,".to_string());
    lines.push("Equipo de Informática".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_dates_window() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let dates = notice_dates(today);

        // 30, 20 y 14..=0 → 17 fechas
        assert_eq!(dates.len(), 17);
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()));
        assert!(dates.contains(&today));
        // 15 días antes no está en la ventana
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
    }

    #[test]
    fn test_digest_sections() {
        let upcoming = vec![ExpiringDocument {
            short_name: "SOAP B-1".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        }];
        let expired = vec![ExpiringDocument {
            short_name: "Revisión técnica M-2".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        }];

        let digest = compose_expiration_digest(&upcoming, &expired);
        assert!(digest.contains("Documentos próximos a vencer:"));
        assert!(digest.contains("SOAP B-1 (vence el 01/07/2025)"));
        assert!(digest.contains("Documentos ya vencidos:"));
        assert!(digest.contains("Revisión técnica M-2 (venció el 01/05/2025)"));
    }

    #[test]
    fn test_digest_omits_empty_sections() {
        let digest = compose_expiration_digest(&[], &[]);
        assert!(!digest.contains("Documentos próximos a vencer:"));
        assert!(!digest.contains("Documentos ya vencidos:"));
    }
}
