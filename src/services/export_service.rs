//! Exportación imprimible de reportes
//!
//! Renderiza el documento imprimible de un reporte diario. El original
//! convertía este HTML a PDF con una herramienta del sistema; aquí se sirve
//! el documento renderizado directamente.

use chrono::NaiveDate;

/// Entrada ya resuelta con la etiqueta de su pregunta
pub struct PrintableEntry {
    pub question_label: String,
    pub answer: String,
    pub comment: Option<String>,
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renderiza el documento imprimible de un reporte diario
pub fn render_report_document(
    unit_number: &str,
    unit_description: &str,
    date: NaiveDate,
    author_name: &str,
    general_comment: Option<&str>,
    entries: &[PrintableEntry],
) -> String {
    let mut rows = String::new();
    for entry in entries {
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&entry.question_label),
            escape_html(&entry.answer),
            escape_html(entry.comment.as_deref().unwrap_or("")),
        ));
    }

    let comment_block = match general_comment {
        Some(comment) if !comment.trim().is_empty() => format!(
            "    <p><strong>Comentario general:</strong> {}</p>\n",
            escape_html(comment)
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
  <head>
    <meta charset="utf-8">
    <title>Reporte {unit_number} - {date}</title>
    <style>
      body {{ font-family: sans-serif; margin: 2rem; }}
      h1 {{ font-size: 1.4rem; }}
      table {{ width: 100%; border-collapse: collapse; margin-top: 1rem; }}
      th, td {{ border: 1px solid #444; padding: 0.4rem; text-align: left; }}
      th {{ background: #eee; }}
    </style>
  </head>
  <body>
    <h1>Reporte diario de unidad</h1>
    <p><strong>Unidad:</strong> {unit_number} - {unit_description}</p>
    <p><strong>Fecha:</strong> {date}</p>
    <p><strong>Autor:</strong> {author_name}</p>
{comment_block}    <table>
      <thead>
        <tr><th>Ítem</th><th>Respuesta</th><th>Comentario</th></tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </body>
</html>
"#,
        unit_number = escape_html(unit_number),
        unit_description = escape_html(unit_description),
        date = date.format("%d/%m/%Y"),
        author_name = escape_html(author_name),
        comment_block = comment_block,
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_entries_and_escapes() {
        let entries = vec![PrintableEntry {
            question_label: "Luces <altas>".to_string(),
            answer: "Bueno".to_string(),
            comment: None,
        }];

        let html = render_report_document(
            "B-1",
            "Bomba",
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            "Juan Pérez",
            Some("Sin novedades"),
            &entries,
        );

        assert!(html.contains("Luces &lt;altas&gt;"));
        assert!(html.contains("15/06/2025"));
        assert!(html.contains("Sin novedades"));
        assert!(html.contains("<table>"));
    }
}
