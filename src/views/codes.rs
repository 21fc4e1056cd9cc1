use chrono::DateTime;
use maud::{html, Markup};

use crate::auth::codes::IssuedAuthCode;
use crate::db::codes::CodeRow;
use crate::views::layout;

/// Overview of outstanding one-time authorization codes. When a code was
/// just issued its raw URL and key are shown here, exactly once.
pub fn codes_page(rows: &[CodeRow], just_issued: Option<&IssuedAuthCode>) -> Markup {
    layout::page(
        "URLs de autorización",
        html! {
            h1 { "URLs de autorización" }

            form method="post" action="/authorize/codes" {
                button type="submit" { "Generar URL" }
            }

            @if let Some(issued) = just_issued {
                div {
                    h2 { "Nueva URL generada" }
                    p { "URL de autorización: " code { (issued.url) } }
                    p { "Clave: " code { (issued.key) } }
                    p { "Guardala ahora: no se vuelve a mostrar." }
                }
            }

            table border="1" {
                thead {
                    tr {
                        th { "Id" }
                        th { "Creada" }
                        th { "Expira" }
                    }
                }
                tbody {
                    @if rows.is_empty() {
                        tr { td colspan="3" { "Sin códigos vigentes" } }
                    }
                    @for row in rows {
                        tr {
                            td { (row.id) }
                            td { (format_ts(row.created_at)) }
                            td { (format_ts(row.expires_at)) }
                        }
                    }
                }
            }

            p { a href="/shipments" { "Volver a envíos" } }
        },
    )
}

fn format_ts(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => secs.to_string(),
    }
}
