use maud::{html, Markup};
use url::form_urlencoded;

use crate::domain::shipment::{DELIVERY_BUSINESS, DELIVERY_RESIDENTIAL};
use crate::domain::FieldFilter;
use crate::store::Snapshot;
use crate::views::layout;

const PAGE_SIZES: [usize; 3] = [10, 25, 50];

pub fn dashboard_page(snap: &Snapshot) -> Markup {
    layout::page(
        "Envíos",
        html! {
            h1 { "Envíos" }
            (filter_form(snap))
            p { (snap.total) " envíos en total" }
            (rows_table(snap))
            (pagination(snap))
            p {
                a href="/shipments/export.xlsx" { "Exportar página actual" }
                " · "
                a href="/authorize/codes" { "URLs de autorización" }
            }
        },
    )
}

fn filter_form(snap: &Snapshot) -> Markup {
    let criteria = &snap.criteria;
    let facets = &snap.facets;

    html! {
        form method="get" action="/shipments" {
            fieldset {
                legend { "Filtros de búsqueda" }

                label { "Tipo de envío "
                    select name="deliveryPreferences" {
                        option value="" selected[criteria.delivery_preferences == FieldFilter::Any] {
                            "Todos los tipos de envío"
                        }
                        option value=(DELIVERY_RESIDENTIAL)
                            selected[criteria.delivery_preferences.value() == Some(DELIVERY_RESIDENTIAL)] {
                            "Residential"
                        }
                        option value=(DELIVERY_BUSINESS)
                            selected[criteria.delivery_preferences.value() == Some(DELIVERY_BUSINESS)] {
                            "Business"
                        }
                    }
                }

                (facet_select("sellerAddress", "Origen", "Todos los orígenes",
                    &facets.seller_address, &criteria.seller_address))
                (facet_select("seller", "Vendedor", "Todos los vendedores",
                    &facets.seller, &criteria.seller))
                (facet_select("deliveryTime", "Fecha estimada", "Todas las fechas",
                    &facets.delivery_time, &criteria.delivery_time))
                (facet_select("status", "Estado", "Todos los estados",
                    &facets.status, &criteria.status))

                label { "Buscar "
                    input type="search" name="q" value=(snap.query_input) placeholder="Buscar envío";
                }

                label { "Por página "
                    select name="size" {
                        @for size in PAGE_SIZES {
                            option value=(size) selected[criteria.page.size == size] { (size) }
                        }
                    }
                }

                button type="submit" { "Filtrar" }
            }
        }
    }
}

fn facet_select(
    name: &str,
    label: &str,
    all_label: &str,
    options: &[String],
    current: &FieldFilter,
) -> Markup {
    html! {
        label { (label) " "
            select name=(name) {
                option value="" selected[*current == FieldFilter::Any] { (all_label) }
                @for opt in options {
                    option value=(opt) selected[current.value() == Some(opt.as_str())] { (opt) }
                }
            }
        }
    }
}

fn rows_table(snap: &Snapshot) -> Markup {
    html! {
        table border="1" {
            thead {
                tr {
                    th { "Código de envío" }
                    th { "Destino" }
                    th { "Zip" }
                    th { "Comprador" }
                    th { "Vendedor" }
                    th { "Origen" }
                    th { "Envío" }
                }
            }
            tbody {
                @if snap.rows.is_empty() {
                    tr { td colspan="7" { "Sin envíos para los filtros actuales" } }
                }
                @for row in &snap.rows {
                    tr {
                        td { (row.core_data.id) }
                        td { (row.core_data.address) }
                        td { (row.core_data.zip_code) }
                        td { (row.core_data.buyer) }
                        td { (row.core_data.seller) }
                        td { (row.core_data.seller_address) }
                        td { (row.core_data.delivery_preferences) }
                    }
                }
            }
        }
    }
}

fn pagination(snap: &Snapshot) -> Markup {
    let page = snap.criteria.page;
    let has_next = ((page.index + 1) * page.size) < snap.total as usize;

    html! {
        p {
            @if page.index > 0 {
                a href=(shipments_href(snap, page.index - 1)) { "« Anterior" }
                " "
            }
            "Página " (page.index + 1)
            @if has_next {
                " "
                a href=(shipments_href(snap, page.index + 1)) { "Siguiente »" }
            }
        }
    }
}

/// Link to another page of the same view: current filters and search text
/// ride along, only the page number changes.
fn shipments_href(snap: &Snapshot, page_index: usize) -> String {
    let criteria = &snap.criteria;
    let mut qs = form_urlencoded::Serializer::new(String::new());

    if let Some(v) = criteria.delivery_preferences.value() {
        qs.append_pair("deliveryPreferences", v);
    }
    if let Some(v) = criteria.seller_address.value() {
        qs.append_pair("sellerAddress", v);
    }
    if let Some(v) = criteria.seller.value() {
        qs.append_pair("seller", v);
    }
    if let Some(v) = criteria.delivery_time.value() {
        qs.append_pair("deliveryTime", v);
    }
    if let Some(v) = criteria.status.value() {
        qs.append_pair("status", v);
    }
    if !snap.query_input.is_empty() {
        qs.append_pair("q", &snap.query_input);
    }
    qs.append_pair("size", &criteria.page.size.to_string());
    qs.append_pair("page", &page_index.to_string());

    format!("/shipments?{}", qs.finish())
}
