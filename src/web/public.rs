//! Public marketing pages
//!
//! Lists come through the public read cache. A list that fails to load is
//! shown as empty; only the blog detail page turns a failure into an error
//! page.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use super::static_files::PLACEHOLDER_IMAGE;
use super::{not_found_page, page_context, render, AppState, Notice, WebError};
use crate::client::ClientError;
use crate::markdown;
use crate::models::{BlogPost, ContactForm, ContactMessage, GalleryEntry, Testimonial};
use crate::resource::{display_date, validate_contact, Filter, Resource, CATEGORY_OPTIONS};

const HOME_POSTS: usize = 3;
const HOME_GALLERY_IMAGES: usize = 6;
const RELATED_POSTS: usize = 3;

/// Blog post as shown on cards
#[derive(Debug, Serialize)]
struct BlogCard {
    id: String,
    title: String,
    description: String,
    date: String,
    image_url: String,
}

/// Gallery entry as shown on the portfolio
#[derive(Debug, Serialize)]
struct GalleryCard {
    title: String,
    description: String,
    category: &'static str,
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CategoryButton {
    value: &'static str,
    label: &'static str,
    active: bool,
}

fn blog_card(state: &AppState, post: &BlogPost) -> BlogCard {
    BlogCard {
        id: post.id.clone(),
        title: post.title.clone(),
        description: post.description.clone(),
        date: display_date(post.created_at),
        image_url: post
            .image
            .as_deref()
            .map(|file| state.client.image_url(file))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
    }
}

fn gallery_card(state: &AppState, entry: &GalleryEntry) -> GalleryCard {
    GalleryCard {
        title: entry.title.clone(),
        description: entry.description.clone(),
        category: entry.category.label(),
        images: entry
            .image_url
            .iter()
            .map(|file| state.client.image_url(file))
            .collect(),
    }
}

/// Newest first; undated posts last
fn newest_first(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Public list, empty when the backend is unreachable
async fn public_list<R: Resource>(state: &AppState) -> Vec<R> {
    let backend = state.public_backend::<R>();
    match state.cache.list(&*backend).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(kind = R::KIND.label(), error = %e, "Failed to load public list");
            Vec::new()
        }
    }
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let (mut posts, testimonials, gallery) = futures::join!(
        public_list::<BlogPost>(&state),
        public_list::<Testimonial>(&state),
        public_list::<GalleryEntry>(&state),
    );
    newest_first(&mut posts);

    let latest: Vec<BlogCard> = posts
        .iter()
        .take(HOME_POSTS)
        .map(|post| blog_card(&state, post))
        .collect();
    let preview: Vec<String> = gallery
        .iter()
        .flat_map(|entry| entry.image_url.iter())
        .take(HOME_GALLERY_IMAGES)
        .map(|file| state.client.image_url(file))
        .collect();

    let mut context = page_context(&state, "/");
    context.insert("posts", &latest);
    context.insert("testimonials", &testimonials);
    context.insert("gallery_preview", &preview);
    render(&state, "home.html", &context)
}

#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    category: Option<String>,
}

/// GET /portfolio?category=
pub async fn portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> Result<Html<String>, WebError> {
    let entries = public_list::<GalleryEntry>(&state).await;
    let filter = Filter::new().with_category(query.category.as_deref());
    let cards: Vec<GalleryCard> = filter
        .apply(&entries)
        .into_iter()
        .map(|entry| gallery_card(&state, entry))
        .collect();

    let selected = filter.category().unwrap_or("all");
    let mut buttons = vec![CategoryButton {
        value: "all",
        label: "All",
        active: selected == "all",
    }];
    buttons.extend(CATEGORY_OPTIONS.iter().map(|&(value, label)| CategoryButton {
        value,
        label,
        active: selected == value,
    }));

    let mut context = page_context(&state, "/portfolio");
    context.insert("entries", &cards);
    context.insert("categories", &buttons);
    render(&state, "portfolio.html", &context)
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    render(&state, "about.html", &page_context(&state, "/about"))
}

/// GET /blog
pub async fn blog_list(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let mut posts = public_list::<BlogPost>(&state).await;
    newest_first(&mut posts);
    let cards: Vec<BlogCard> = posts.iter().map(|post| blog_card(&state, post)).collect();

    let mut context = page_context(&state, "/blog");
    context.insert("posts", &cards);
    render(&state, "blog_list.html", &context)
}

/// GET /blog/{id}
pub async fn blog_detail(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let backend = state.public_backend::<BlogPost>();
    let post = match state.cache.get(&*backend, &id).await {
        Ok(post) => post,
        Err(e) if e.is_not_found() => return Ok(not_found_page(&state, uri.path())),
        Err(e) => return Err(e.into()),
    };

    let mut others = public_list::<BlogPost>(&state).await;
    others.retain(|other| other.id != post.id);
    newest_first(&mut others);
    let related: Vec<BlogCard> = others
        .iter()
        .take(RELATED_POSTS)
        .map(|other| blog_card(&state, other))
        .collect();

    let details: Vec<String> = post
        .detailed_page_image
        .iter()
        .map(|file| state.client.image_url(file))
        .collect();

    let mut context = page_context(&state, uri.path());
    context.insert("post", &blog_card(&state, &post));
    context.insert("content_html", &markdown::render(&post.content));
    context.insert("meta_description", &markdown::summary(&post.content, 160));
    context.insert("detail_images", &details);
    context.insert("related", &related);
    Ok(render(&state, "blog_detail.html", &context)?.into_response())
}

fn contact_response(
    state: &AppState,
    status: StatusCode,
    form: &ContactForm,
    notice: Option<Notice>,
) -> Result<Response, WebError> {
    let mut context = page_context(state, "/contact");
    context.insert("form", form);
    context.insert("notice", &notice);
    Ok((status, render(state, "contact.html", &context)?).into_response())
}

/// GET /contact
pub async fn contact_page(State(state): State<AppState>) -> Result<Response, WebError> {
    contact_response(&state, StatusCode::OK, &ContactForm::default(), None)
}

/// Wording of a failed contact submission
fn contact_failure(error: &ClientError) -> String {
    match error {
        ClientError::Network(_) => {
            "Network error. Please check your connection and try again.".to_string()
        }
        ClientError::Backend {
            message: Some(message),
            ..
        } => message.clone(),
        _ => "Something went wrong. Please try again later.".to_string(),
    }
}

/// POST /contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Response, WebError> {
    if let Err(e) = validate_contact(&form) {
        let notice = Notice::error(e.to_string());
        return contact_response(&state, StatusCode::UNPROCESSABLE_ENTITY, &form, Some(notice));
    }

    let payload = ContactMessage::payload(&form);
    let result = state
        .client
        .send::<serde_json::Value>(reqwest::Method::POST, "contacts", Some(payload), None)
        .await;

    match result {
        Ok(_) => {
            tracing::info!("Contact message received");
            contact_response(
                &state,
                StatusCode::OK,
                &ContactForm::default(),
                Some(Notice::success("Thank you! We'll be in touch soon.")),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to send contact message");
            let status = match e {
                ClientError::Network(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            contact_response(&state, status, &form, Some(Notice::error(contact_failure(&e))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_newest_first_puts_undated_last() {
        let mut posts = vec![
            crate::resource::testing::blog("old", "Old", ""),
            crate::resource::testing::blog("undated", "Undated", ""),
            crate::resource::testing::blog("new", "New", ""),
        ];
        posts[0].created_at = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        posts[2].created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        newest_first(&mut posts);

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_contact_failure_wording() {
        assert_eq!(
            contact_failure(&ClientError::Network("x".into())),
            "Network error. Please check your connection and try again."
        );
        assert_eq!(
            contact_failure(&ClientError::Backend {
                status: 400,
                message: Some("Email already used".into())
            }),
            "Email already used"
        );
        assert_eq!(
            contact_failure(&ClientError::Backend {
                status: 500,
                message: None
            }),
            "Something went wrong. Please try again later."
        );
    }
}
