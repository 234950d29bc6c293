//! Default Typst page template.
//!
//! `{{TITLE}}` and `{{BODY}}` are substituted by [`super::resolve`].

const TEMPLATE: &str = r#"#set page(paper: "a4", flipped: true, margin: 1.5cm)
#set text(size: 9pt)
#show table.cell.where(y: 0): set text(weight: "bold")

= {{TITLE}}

{{BODY}}
"#;

pub fn template() -> &'static str {
    TEMPLATE
}
