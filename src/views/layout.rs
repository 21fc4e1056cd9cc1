use maud::{html, Markup, DOCTYPE};

/// Bare page skeleton. Styling and navigation are someone else's problem;
/// this dashboard is plain markup on purpose.
pub fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}
