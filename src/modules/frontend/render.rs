//! Server-side HTML for the three views. Everything interpolated is escaped.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::state::{View, ViewState};
use crate::modules::release::model::Release;
use crate::modules::release::validator::REQUIRED_FIELDS;

pub enum ListContent {
    Loaded(Vec<Release>),
    Failed(String),
}

/// Keeps only releases whose date starts with exactly `year`, in case the
/// server-side prefix filter ever lets something through.
pub fn filter_by_year(releases: &[Release], year: i32) -> Vec<&Release> {
    let year = year.to_string();
    releases
        .iter()
        .filter(|r| r.year() == Some(year.as_str()))
        .collect()
}

fn layout(state: &ViewState, main: &str) -> String {
    let mut nav = String::new();
    for view in View::ALL {
        let class = if view == state.view { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            "<a href=\"{}\"{}>{}</a>",
            view.path(),
            class,
            text(view.label())
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Release Tracker</title>\n\
         <link rel=\"stylesheet\" href=\"/assets/styles.css\">\n\
         <script src=\"/assets/app.js\" defer></script>\n</head>\n<body>\n\
         <header><h1>Release Tracker</h1><nav>{nav}</nav></header>\n\
         <main>\n{main}\n<p id=\"messageArea\" class=\"message\" role=\"status\"></p>\n</main>\n\
         </body>\n</html>\n"
    )
}

fn year_selector(state: &ViewState) -> String {
    let mut options = String::new();
    for year in state.year_options() {
        let selected = if year == state.selected_year { " selected" } else { "" };
        let _ = write!(options, "<option value=\"{year}\"{selected}>{year}</option>");
    }

    format!(
        "<form id=\"yearForm\" method=\"get\" action=\"/\">\
         <label for=\"year-selector\">Year</label> \
         <select id=\"year-selector\" name=\"year\">{options}</select>\
         <noscript><button type=\"submit\">Show</button></noscript></form>"
    )
}

fn release_item(release: &Release) -> String {
    format!(
        "<li class=\"release-item\"><strong>{}</strong>\
         <p>Director: {}</p><p>Genre: {} | Studio: {}</p><p>Release Date: {}</p></li>",
        text(&release.title),
        text(&release.director),
        text(&release.genre),
        text(&release.studio),
        text(&release.release_date),
    )
}

pub fn list_page(state: &ViewState, content: &ListContent) -> String {
    let year = state.selected_year;
    let items = match content {
        ListContent::Failed(message) => {
            format!("<li class=\"status status-error\">Error: {}</li>", text(message))
        }
        ListContent::Loaded(releases) => {
            let visible = filter_by_year(releases, year);
            if visible.is_empty() {
                format!("<li class=\"status\">No releases found for {year}.</li>")
            } else {
                visible.into_iter().map(release_item).collect()
            }
        }
    };

    let main = format!(
        "<section id=\"listView\">{}\
         <h2>Releases in <span id=\"currentYearDisplay\">{year}</span></h2>\
         <ul id=\"releasesList\">{items}</ul></section>",
        year_selector(state)
    );
    layout(state, &main)
}

fn field_label(field: &str) -> &'static str {
    match field {
        "title" => "Title",
        "director" => "Director",
        "genre" => "Genre",
        "studio" => "Studio",
        _ => "Release date",
    }
}

pub fn form_page(state: &ViewState) -> String {
    let mut inputs = String::new();
    for field in REQUIRED_FIELDS {
        let input_type = if field == "releaseDate" { "date" } else { "text" };
        let _ = write!(
            inputs,
            "<label for=\"{field}Input\">{label}</label>\
             <input id=\"{field}Input\" name=\"{name}\" type=\"{input_type}\" required>",
            label = field_label(field),
            name = attr(field),
        );
    }

    let main = format!(
        "<section id=\"formView\"><h2>Add a release</h2>\
         <form id=\"releaseForm\">{inputs}<button type=\"submit\">Submit</button></form></section>"
    );
    layout(state, &main)
}

pub fn bulk_page(state: &ViewState) -> String {
    let header = REQUIRED_FIELDS
        .iter()
        .map(|f| field_label(f))
        .collect::<Vec<_>>()
        .join(";");

    let main = format!(
        "<section id=\"bulkView\"><h2>Bulk entry</h2>\
         <div id=\"authStatus\"><p>Admin credentials are required to submit.</p>\
         <button id=\"startButton\" type=\"button\">Start entry</button></div>\
         <div id=\"dataEntryContainer\" hidden>\
         <p>One release per line, fields separated by semicolons: <code>{}</code></p>\
         <form id=\"bulkEntryForm\"><textarea id=\"csvInput\" rows=\"12\"></textarea>\
         <button id=\"submitButton\" type=\"submit\">Submit all</button></form></div></section>",
        text(&header)
    );
    layout(state, &main)
}
