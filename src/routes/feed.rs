// ABOUTME: Server-rendered workout feed with pagination and the generate-today action
// ABOUTME: Renders the embedded HTML template, escaping every stored value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Feed routes
//!
//! `GET /?page=N` shows page `N` of the most-recent-first feed (page 0 is the
//! newest). When today has no record a form posts to `/generate-today`, which
//! generates and stores the record, then redirects back to page 0. Failures
//! are rendered in place with the message and a retry button.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use html_escape::encode_text;
use serde::Deserialize;
use tracing::{info, warn};
use wodx_core::models::{DailyWorkout, WorkoutSection};
use wodx_core::pagination::FeedPage;

use crate::resources::ServerResources;

const FEED_TEMPLATE: &str = include_str!("templates/feed.html");

/// Query string of the feed page
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Zero-based page index, 0 is the most recent
    pub page: Option<usize>,
}

/// Everything the feed template needs
#[derive(Debug)]
pub struct FeedView<'a> {
    /// Page to display
    pub page: &'a FeedPage<DailyWorkout>,
    /// Whether today already has a record
    pub has_today: bool,
    /// Error to show above the feed
    pub error: Option<&'a str>,
}

/// Feed routes implementation
pub struct FeedRoutes;

impl FeedRoutes {
    /// Create the feed routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_feed))
            .route("/generate-today", post(Self::handle_generate_today))
            .with_state(resources)
    }

    async fn handle_feed(
        State(resources): State<Arc<ServerResources>>,
        query: Result<Query<FeedQuery>, QueryRejection>,
    ) -> Response {
        // Unparseable page numbers fall back to the newest page
        let page = query.ok().and_then(|Query(q)| q.page).unwrap_or(0);
        Self::render(&resources, page, StatusCode::OK, None).await
    }

    async fn handle_generate_today(State(resources): State<Arc<ServerResources>>) -> Response {
        match resources.workflow.generate_today().await {
            Ok(outcome) => {
                info!(
                    date = %outcome.workout.date,
                    created = outcome.created,
                    "Generate-today completed"
                );
                Redirect::to("/?page=0").into_response()
            }
            Err(e) => {
                warn!(code = ?e.code, error = %e.message, "Generate-today failed");
                let status = StatusCode::from_u16(e.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Self::render(&resources, 0, status, Some(&e.message)).await
            }
        }
    }

    async fn render(
        resources: &ServerResources,
        page: usize,
        status: StatusCode,
        error: Option<&str>,
    ) -> Response {
        match resources.workflow.feed(page, resources.page_size()).await {
            Ok((feed, has_today)) => {
                let view = FeedView {
                    page: &feed,
                    has_today,
                    error,
                };
                (status, Html(render_feed(&view))).into_response()
            }
            Err(e) => {
                warn!(code = ?e.code, error = %e.message, "Failed to load feed");
                let empty = FeedPage::empty(resources.page_size());
                let view = FeedView {
                    page: &empty,
                    has_today: false,
                    error: Some(error.unwrap_or(&e.message)),
                };
                let status = StatusCode::from_u16(e.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Html(render_feed(&view))).into_response()
            }
        }
    }
}

/// Render the full feed document
#[must_use]
pub fn render_feed(view: &FeedView<'_>) -> String {
    let error = view.error.map_or_else(String::new, |message| {
        format!(
            r#"<div class="error">Error: {}</div>"#,
            encode_text(message)
        )
    });

    // The generate form doubles as the retry button after a failure
    let generate = if view.has_today && view.error.is_none() {
        String::new()
    } else {
        r#"<form method="post" action="/generate-today"><button type="submit">Generate Today's Workout</button></form>"#
            .to_owned()
    };

    let cards = if view.page.items.is_empty() {
        if view.error.is_some() {
            String::new()
        } else {
            r#"<p class="empty">No workouts yet.</p>"#.to_owned()
        }
    } else {
        view.page.items.iter().map(render_card).collect()
    };

    FEED_TEMPLATE
        .replace("{{ERROR}}", &error)
        .replace("{{NAV}}", &render_nav(view.page))
        .replace("{{GENERATE}}", &generate)
        .replace("{{CARDS}}", &cards)
}

/// Previous goes back in time (older page), Next forward (newer page)
fn render_nav(page: &FeedPage<DailyWorkout>) -> String {
    if page.total_pages == 0 {
        return String::new();
    }

    let previous = if page.has_older() {
        format!(r#"<a href="/?page={}">Previous</a>"#, page.page + 1)
    } else {
        r#"<span class="disabled">Previous</span>"#.to_owned()
    };
    let next = if page.has_newer() {
        format!(r#"<a href="/?page={}">Next</a>"#, page.page - 1)
    } else {
        r#"<span class="disabled">Next</span>"#.to_owned()
    };

    format!(
        r#"<nav class="nav">{previous}<span class="position">Page {} of {}</span>{next}</nav>"#,
        page.page + 1,
        page.total_pages
    )
}

fn render_card(workout: &DailyWorkout) -> String {
    let mut html = String::from(r#"<article class="card">"#);
    let _ = write!(
        html,
        r#"<h2>{}</h2><span class="badge {}">{}</span>"#,
        workout.date,
        workout.kind.as_str(),
        workout.kind.label()
    );

    for section in workout.sections() {
        render_section(&mut html, section);
    }

    if let Some(notes) = workout.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = write!(
            html,
            r#"<div class="notes"><strong>Notes:</strong> {}</div>"#,
            encode_text(notes)
        );
    }

    html.push_str("</article>");
    html
}

fn render_section(html: &mut String, section: &WorkoutSection) {
    let _ = write!(
        html,
        r#"<div class="section"><h3>{}</h3><p>{}</p>"#,
        encode_text(&section.title),
        encode_text(&section.description)
    );

    if let Some(exercises) = section.exercises.as_ref().filter(|e| !e.is_empty()) {
        html.push_str("<ul>");
        for exercise in exercises {
            let _ = write!(html, "<li>{}</li>", encode_text(exercise));
        }
        html.push_str("</ul>");
    }

    if let Some(minutes) = section.duration.filter(|m| *m > 0) {
        let _ = write!(html, r#"<span class="duration">Duration: {minutes} min</span>"#);
    }

    html.push_str("</div>");
}
