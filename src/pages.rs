//! HTML page builders.
//!
//! Pages are assembled with `format!`; every value that comes from Spotify or
//! from the request goes through [`escape_html`] first. Chart markup is
//! produced by [`crate::chart`] and embedded as is.

use std::fmt::Write;

use axum::http::StatusCode;

use crate::{
    types::{ArtistRecord, Feature, FeaturePlot, JoinedTrack, Search, TimeRange},
    utils::{escape_html, shorten},
};

/// Row counts offered on the data views.
pub const NUM_CHOICES: [usize; 3] = [10, 25, 50];

const STYLE: &str = r#"
        * { box-sizing: border-box; }
        body { font-family: -apple-system, 'Helvetica Neue', Helvetica, Arial, sans-serif; margin: 0; background: #f5f5f7; color: #1d1d1f; }
        .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
        nav a { margin-right: 0.75rem; color: #1db954; text-decoration: none; }
        nav a.active { font-weight: 700; text-decoration: underline; }
        .plots { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 1rem; margin: 1.5rem 0; }
        .plot h3 { margin: 0 0 0.5rem; text-transform: capitalize; font-weight: 500; }
        table { border-collapse: collapse; width: 100%; background: #fff; }
        th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #d2d2d7; text-align: left; }
        th { text-transform: capitalize; }
        td img { width: 48px; height: 48px; object-fit: cover; }
        .genres li { margin-bottom: 0.2rem; }
        button { background: #1db954; color: #fff; border: 0; border-radius: 2rem; padding: 0.8rem 2rem; font-size: 1rem; cursor: pointer; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

pub fn data_url(time_range: TimeRange, search: Search, num: usize) -> String {
    format!(
        "/user_data?time_range={}&search={}&num={}",
        time_range.as_str(),
        search.as_str(),
        num
    )
}

fn nav(active_range: TimeRange, active_search: Search, num: usize) -> String {
    let mut out = String::from("<nav>\n");
    for search in [Search::Tracks, Search::Artists] {
        let class = if search == active_search { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            r#"<a{class} href="{}">Top {}</a>"#,
            data_url(active_range, search, num),
            search.as_str()
        );
    }
    out.push_str("<br>\n");
    for range in TimeRange::ALL {
        let class = if range == active_range { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            r#"<a{class} href="{}">{}</a>"#,
            data_url(range, active_search, num),
            range.label()
        );
    }
    out.push_str("<br>\nShow ");
    for choice in NUM_CHOICES {
        let class = if choice == num { " class=\"active\"" } else { "" };
        let _ = write!(
            out,
            r#"<a{class} href="{}">{choice}</a>"#,
            data_url(active_range, active_search, choice)
        );
    }
    out.push_str("\n</nav>\n");
    out
}

fn image_cell(url: Option<&str>) -> String {
    match url {
        Some(url) => format!(r#"<td><img src="{}" alt=""></td>"#, escape_html(url)),
        None => "<td></td>".to_string(),
    }
}

pub fn landing_page() -> String {
    layout(
        "Tastegraph",
        r#"<h1>Tastegraph</h1>
<p>See what you have been listening to: your top tracks with their audio features, and your top artists and genres.</p>
<form action="/login" method="post">
    <button type="submit">Log in with Spotify</button>
</form>"#,
    )
}

pub struct TracksView<'a> {
    pub rows: &'a [JoinedTrack],
    pub plots: &'a [FeaturePlot],
    pub time_range: TimeRange,
    pub num: usize,
}

pub fn tracks_page(view: &TracksView<'_>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Your top tracks</h1>");
    body.push_str(&nav(view.time_range, Search::Tracks, view.num));

    body.push_str("<div class=\"plots\">\n");
    for plot in view.plots {
        let _ = writeln!(
            body,
            "<div class=\"plot\"><h3>{}</h3>{}</div>",
            plot.feature.name(),
            plot.svg
        );
    }
    body.push_str("</div>\n");

    body.push_str(
        "<table>\n<tr><th>#</th><th></th><th>Song</th><th>Artists</th><th>Album</th><th>Popularity</th>",
    );
    for feature in Feature::TABLE_COLUMNS {
        let _ = write!(body, "<th>{}</th>", feature.name());
    }
    body.push_str("</tr>\n");
    for (i, row) in view.rows.iter().take(view.num).enumerate() {
        let _ = write!(
            body,
            "<tr><td>{}</td>{}<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            i + 1,
            image_cell(row.img.as_deref()),
            escape_html(&shorten(&row.song)),
            escape_html(&shorten(&row.artists.join(", "))),
            escape_html(&shorten(&row.album)),
            row.popularity,
        );
        for feature in Feature::TABLE_COLUMNS {
            let _ = write!(body, "<td>{:.2}</td>", row.value(feature));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table>\n");

    layout("Top tracks", &body)
}

pub struct ArtistsView<'a> {
    pub rows: &'a [ArtistRecord],
    pub top_genres: &'a [(String, usize)],
    pub time_range: TimeRange,
    pub num: usize,
}

pub fn artists_page(view: &ArtistsView<'_>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Your top artists</h1>");
    body.push_str(&nav(view.time_range, Search::Artists, view.num));

    if !view.top_genres.is_empty() {
        body.push_str("<h2>Top genre words</h2>\n<ol class=\"genres\">\n");
        for (word, count) in view.top_genres {
            let _ = writeln!(body, "<li>{} ({count})</li>", escape_html(word));
        }
        body.push_str("</ol>\n");
    }

    body.push_str(
        "<table>\n<tr><th>#</th><th></th><th>Artist</th><th>Genres</th><th>Popularity</th></tr>\n",
    );
    for (i, row) in view.rows.iter().take(view.num).enumerate() {
        let _ = writeln!(
            body,
            "<tr><td>{}</td>{}<td>{}</td><td>{}</td><td>{}</td></tr>",
            i + 1,
            image_cell(row.image.as_deref()),
            escape_html(&shorten(&row.artist)),
            escape_html(&row.genres.join(", ")),
            row.popularity,
        );
    }
    body.push_str("</table>\n");

    layout("Top artists", &body)
}

/// Shown for an unrecognised `search` value.
pub fn fallback_page() -> String {
    r#"<a href="/">Home</a>"#.to_string()
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(
        title,
        &format!(
            "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Home</a></p>",
            status.as_u16(),
            escape_html(title),
            escape_html(message)
        ),
    )
}
