//! Demo HTML pages

use std::sync::Arc;

use axum::{extract::State, response::Html};
use quick_xml::escape::escape;

use crate::{AppState, Employee};

/// Employee directory with contacts; the contacts hold a phone number and an
/// invalid SNILS that extraction must not report.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(&state.employees))
}

/// Bare list of employee numbers
pub async fn employees(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_employees(&state.employees))
}

pub fn render_index(employees: &[Employee]) -> String {
    let items: String = employees
        .iter()
        .map(|e| {
            format!(
                "            <li>{} - СНИЛС: <b>{}</b></li>\n",
                escape(e.name.as_str()),
                escape(e.snils.as_str())
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Тестовый сервер СНИЛС</title>
</head>
<body>
    <h1>Тестовая база сотрудников</h1>

    <h2>Сотрудники:</h2>
    <ul>
{items}    </ul>

    <h2>Контакты:</h2>
    <p>Телефон: 123-456-789 (это не СНИЛС)</p>
    <p>Невалидный СНИЛС: 999-888-777 00</p>
</body>
</html>
"#
    )
}

pub fn render_employees(employees: &[Employee]) -> String {
    let items: String = employees
        .iter()
        .map(|e| format!("    <li>{}</li>\n", escape(e.snils.as_str())))
        .collect();

    format!(
        "<h1>Страница сотрудников</h1>\n<p>СНИЛС сотрудников:</p>\n<ul>\n{items}</ul>\n"
    )
}
